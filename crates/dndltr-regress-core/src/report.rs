// crates/dndltr-regress-core/src/report.rs
// ============================================================================
// Module: Run Reporting
// Description: Typed progress events emitted while the driver runs.
// Purpose: Decouple run orchestration from how results are rendered.
// Dependencies: std
// ============================================================================

//! ## Overview
//! The driver never writes text. It emits [`RunEvent`]s to a [`ReportSink`],
//! in the order they happen, and the sink decides how to render them. A sink
//! failing to record an event aborts the run; suite teardown still happens.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use crate::compare::Comparison;
use crate::discovery::DiscoveryError;
use crate::invoke::InvokeError;
use crate::layout::Case;
use crate::layout::ResultCode;
use crate::layout::Suite;

// ============================================================================
// SECTION: Case Failures
// ============================================================================

/// Why a case failed.
#[derive(Debug)]
pub enum CaseFailure {
    /// The emulator exited with a non-zero status.
    Exited {
        /// Emulator exit status.
        code: i32,
    },
    /// The emulator succeeded but its output did not match.
    Mismatch {
        /// Comparison detail.
        comparison: Comparison,
    },
    /// The emulator terminated without an exit status.
    Signaled,
    /// The emulator was killed after exceeding the time limit.
    TimedOut {
        /// Configured limit.
        limit: Duration,
    },
    /// The emulator could not be started or awaited.
    Launch {
        /// Invocation error.
        error: InvokeError,
    },
    /// A previous output artifact could not be removed, so the case was not run.
    StaleOutput {
        /// Output artifact path.
        path: PathBuf,
        /// Removal error.
        error: io::Error,
    },
}

impl CaseFailure {
    /// Returns the result code this failure propagates.
    #[must_use]
    pub const fn code(&self) -> ResultCode {
        match self {
            Self::Exited {
                code,
            } => ResultCode::new(*code),
            Self::Mismatch {
                ..
            } => ResultCode::MISMATCH,
            Self::Signaled
            | Self::TimedOut {
                ..
            }
            | Self::Launch {
                ..
            }
            | Self::StaleOutput {
                ..
            } => ResultCode::HARNESS_FAULT,
        }
    }
}

// ============================================================================
// SECTION: Summary
// ============================================================================

/// Aggregate outcome of a run.
///
/// # Invariants
/// - `code` is [`ResultCode::SUCCESS`] iff `failed_suite` is `None` and no
///   discovery fault occurred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Overall result code.
    pub code: ResultCode,
    /// Suites that passed every case.
    pub suites_passed: usize,
    /// Cases that passed, across all suites.
    pub cases_passed: usize,
    /// Name of the suite that halted the run, if any.
    pub failed_suite: Option<String>,
}

impl RunSummary {
    /// Returns true when every suite passed.
    #[must_use]
    pub const fn passed(&self) -> bool {
        self.code.is_success()
    }
}

// ============================================================================
// SECTION: Events
// ============================================================================

/// Progress events in emission order.
#[derive(Debug)]
pub enum RunEvent<'a> {
    /// The tests directory could not be listed; no suite runs.
    DiscoveryFailed {
        /// Listing error.
        error: &'a DiscoveryError,
    },
    /// A suite is about to run.
    SuiteStarted {
        /// Suite being entered.
        suite: &'a Suite,
    },
    /// The suite directory could not be listed.
    CaseDiscoveryFailed {
        /// Suite whose cases could not be listed.
        suite: &'a Suite,
        /// Listing error.
        error: &'a DiscoveryError,
    },
    /// A case ran and matched its expected artifact.
    CasePassed {
        /// Owning suite.
        suite: &'a Suite,
        /// Passing case.
        case: &'a Case,
    },
    /// A case failed; the run halts after this suite.
    CaseFailed {
        /// Owning suite.
        suite: &'a Suite,
        /// Failing case.
        case: &'a Case,
        /// Failure detail.
        failure: &'a CaseFailure,
    },
    /// Every case in the suite passed.
    SuitePassed {
        /// Passing suite.
        suite: &'a Suite,
    },
    /// The suite failed with `code`.
    SuiteFailed {
        /// Failing suite.
        suite: &'a Suite,
        /// Propagated result code.
        code: ResultCode,
    },
    /// The run is over.
    Finished {
        /// Final summary.
        summary: &'a RunSummary,
    },
}

// ============================================================================
// SECTION: Sink Interface
// ============================================================================

/// Receives run events.
pub trait ReportSink {
    /// Records one event.
    ///
    /// # Errors
    ///
    /// Returns an I/O error when the event cannot be recorded.
    fn report(&mut self, event: &RunEvent<'_>) -> io::Result<()>;
}
