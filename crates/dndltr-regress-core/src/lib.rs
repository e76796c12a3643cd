// crates/dndltr-regress-core/src/lib.rs
// ============================================================================
// Module: dndltr Regression Core
// Description: Suite discovery, emulator invocation, and exact comparison.
// Purpose: Drive the emulator over the ROM corpus and judge every frame.
// Dependencies: serde, thiserror, tracing
// ============================================================================

//! ## Overview
//! The core crate runs the `dndltr` emulator over a corpus of test ROMs and
//! compares each rendered `output.bmp` byte for byte with a recorded
//! reference. Suites run one at a time, cases run one at a time, and the first
//! failure halts the whole run.
//!
//! The crate performs no console output. Progress is emitted as
//! [`RunEvent`]s through a [`ReportSink`], and the emulator is reached through
//! the [`EmulatorRunner`] trait so the driver can be exercised without a real
//! binary.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod compare;
pub mod discovery;
pub mod driver;
pub mod invoke;
pub mod layout;
pub mod report;
pub mod suite;

// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use compare::Comparison;
pub use compare::compare_artifacts;
pub use discovery::DiscoveryError;
pub use discovery::DiscoveryOrder;
pub use discovery::discover_cases;
pub use discovery::discover_suites;
pub use driver::Driver;
pub use driver::PlanError;
pub use driver::RunError;
pub use driver::RunPlan;
pub use invoke::EmulatorArgs;
pub use invoke::EmulatorRunner;
pub use invoke::ExitOutcome;
pub use invoke::InvokeError;
pub use invoke::ProcessRunner;
pub use invoke::StderrMode;
pub use layout::Case;
pub use layout::ResultCode;
pub use layout::Suite;
pub use report::CaseFailure;
pub use report::ReportSink;
pub use report::RunEvent;
pub use report::RunSummary;
pub use suite::OutputGuard;
pub use suite::SuiteOutcome;
pub use suite::evaluate_case;
pub use suite::run_suite;
