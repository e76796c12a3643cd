// crates/dndltr-regress-core/src/suite.rs
// ============================================================================
// Module: Suite Execution
// Description: Runs every case of one suite with guaranteed teardown.
// Purpose: Execute, compare, and clean up the output artifact per suite.
// Dependencies: tracing
// ============================================================================

//! ## Overview
//! A suite run holds an [`OutputGuard`] for the suite's output artifact from
//! entry to exit. The guard removes the artifact when it is dropped, so
//! teardown happens on every path out of the suite: success, first case
//! failure, or an error returned with `?`.
//!
//! ## Invariants
//! - At most one output artifact exists per suite at a time.
//! - A stale artifact is removed before each case is invoked; a case whose
//!   stale artifact cannot be removed fails without invoking the emulator.
//! - Cases run in discovery order; the first failure stops the suite.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::io;
use std::io::ErrorKind;
use std::path::Path;
use std::path::PathBuf;

use tracing::debug;
use tracing::warn;

use crate::compare::compare_artifacts;
use crate::discovery::DiscoveryOrder;
use crate::discovery::discover_cases;
use crate::invoke::EmulatorRunner;
use crate::invoke::ExitOutcome;
use crate::layout::Case;
use crate::layout::ResultCode;
use crate::layout::Suite;
use crate::report::CaseFailure;
use crate::report::ReportSink;
use crate::report::RunEvent;

// ============================================================================
// SECTION: Output Guard
// ============================================================================

/// Scope guard that owns a suite's output artifact path.
///
/// # Invariants
/// - The artifact does not exist after the guard is dropped, unless removal
///   itself failed (logged).
#[derive(Debug)]
pub struct OutputGuard {
    /// Output artifact path.
    path: PathBuf,
}

impl OutputGuard {
    /// Takes ownership of the output artifact at `path`.
    #[must_use]
    pub fn acquire(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
        }
    }

    /// Returns the guarded path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Removes the artifact if present.
    ///
    /// # Errors
    ///
    /// Returns the I/O error when an existing artifact cannot be removed.
    pub fn clear(&self) -> io::Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "removed output artifact");
                Ok(())
            }
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
            Err(error) => Err(error),
        }
    }
}

impl Drop for OutputGuard {
    fn drop(&mut self) {
        if let Err(error) = self.clear() {
            warn!(path = %self.path.display(), %error, "teardown could not remove output artifact");
        }
    }
}

// ============================================================================
// SECTION: Case Evaluation
// ============================================================================

/// Runs one case and compares its output.
///
/// # Errors
///
/// Returns the [`CaseFailure`] when the emulator fails or the output does not
/// match the expected artifact.
pub fn evaluate_case<R>(suite: &Suite, case: &Case, runner: &R) -> Result<(), CaseFailure>
where
    R: EmulatorRunner + ?Sized,
{
    let outcome = runner.run_case(suite, case).map_err(|error| CaseFailure::Launch {
        error,
    })?;
    match outcome {
        ExitOutcome::Exited(0) => {}
        ExitOutcome::Exited(code) => {
            return Err(CaseFailure::Exited {
                code,
            });
        }
        ExitOutcome::Signaled => return Err(CaseFailure::Signaled),
        ExitOutcome::TimedOut(limit) => {
            return Err(CaseFailure::TimedOut {
                limit,
            });
        }
    }
    let expected = case.expected_artifact(suite);
    let comparison = compare_artifacts(&suite.output_artifact(), &expected);
    if comparison.is_match() {
        return Ok(());
    }
    debug!(case = %case.name, expected = %expected.display(), reason = %comparison, "output mismatch");
    Err(CaseFailure::Mismatch {
        comparison,
    })
}

// ============================================================================
// SECTION: Suite Execution
// ============================================================================

/// Per-suite result handed back to the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuiteOutcome {
    /// Suite result code.
    pub code: ResultCode,
    /// Cases that passed before the suite finished or halted.
    pub cases_passed: usize,
}

/// Runs all cases of `suite`, reporting each outcome to `sink`.
///
/// # Errors
///
/// Returns the sink's I/O error when an event cannot be recorded. The output
/// artifact is removed before the error propagates.
pub fn run_suite<R, S>(
    suite: &Suite,
    order: DiscoveryOrder,
    runner: &R,
    sink: &mut S,
) -> io::Result<SuiteOutcome>
where
    R: EmulatorRunner + ?Sized,
    S: ReportSink + ?Sized,
{
    let guard = OutputGuard::acquire(suite.output_artifact());
    let cases = match discover_cases(suite, order) {
        Ok(cases) => cases,
        Err(error) => {
            sink.report(&RunEvent::CaseDiscoveryFailed {
                suite,
                error: &error,
            })?;
            return Ok(SuiteOutcome {
                code: ResultCode::HARNESS_FAULT,
                cases_passed: 0,
            });
        }
    };

    let mut cases_passed = 0;
    for case in &cases {
        let evaluated = match guard.clear() {
            Ok(()) => evaluate_case(suite, case, runner),
            Err(error) => {
                warn!(path = %guard.path().display(), %error, "stale output artifact could not be removed");
                Err(CaseFailure::StaleOutput {
                    path: guard.path().to_path_buf(),
                    error,
                })
            }
        };
        match evaluated {
            Ok(()) => {
                cases_passed += 1;
                sink.report(&RunEvent::CasePassed {
                    suite,
                    case,
                })?;
            }
            Err(failure) => {
                sink.report(&RunEvent::CaseFailed {
                    suite,
                    case,
                    failure: &failure,
                })?;
                return Ok(SuiteOutcome {
                    code: failure.code(),
                    cases_passed,
                });
            }
        }
    }
    Ok(SuiteOutcome {
        code: ResultCode::SUCCESS,
        cases_passed,
    })
}
