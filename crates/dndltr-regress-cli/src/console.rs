// crates/dndltr-regress-cli/src/console.rs
// ============================================================================
// Module: Console Reporter
// Description: Renders run events as the harness's console report.
// Purpose: Keep the line-oriented report on stdout and fault detail on stderr.
// Dependencies: dndltr-regress-core
// ============================================================================

//! ## Overview
//! [`ConsoleReporter`] turns [`RunEvent`]s into the report lines scripts and
//! CI logs depend on. Report lines go to the report stream. Harness faults
//! (discovery errors, launch failures, time limits, signals, undeletable
//! output artifacts) get one extra `Error:` line on the diagnostics stream so
//! the report itself stays in its fixed shape.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io;
use std::io::Write;

use dndltr_regress_core::CaseFailure;
use dndltr_regress_core::ReportSink;
use dndltr_regress_core::RunEvent;

use crate::t;

// ============================================================================
// SECTION: Reporter
// ============================================================================

/// Writes the console report.
pub struct ConsoleReporter<O, E> {
    /// Report stream (stdout in the binary).
    out: O,
    /// Diagnostics stream (stderr in the binary).
    err: E,
}

impl<O, E> ConsoleReporter<O, E>
where
    O: Write,
    E: Write,
{
    /// Creates a reporter writing report lines to `out` and faults to `err`.
    pub const fn new(out: O, err: E) -> Self {
        Self {
            out,
            err,
        }
    }

    /// Consumes the reporter and returns both streams.
    pub fn into_inner(self) -> (O, E) {
        (self.out, self.err)
    }

    /// Writes one report line and flushes it.
    fn line(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.out, "{message}")?;
        self.out.flush()
    }

    /// Writes one diagnostics line.
    fn error(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.err, "{message}")
    }
}

impl<O, E> ReportSink for ConsoleReporter<O, E>
where
    O: Write,
    E: Write,
{
    fn report(&mut self, event: &RunEvent<'_>) -> io::Result<()> {
        match event {
            RunEvent::DiscoveryFailed {
                error,
            } => self.error(&t!("run.error.discovery", error = error)),
            RunEvent::SuiteStarted {
                suite,
            } => self.line(&t!("run.suite.started", suite = suite.name)),
            RunEvent::CaseDiscoveryFailed {
                suite,
                error,
            } => self.error(&t!("run.error.case_discovery", suite = suite.name, error = error)),
            RunEvent::CasePassed {
                case,
                ..
            } => self.line(&t!("run.case.passed", case = case.name)),
            RunEvent::CaseFailed {
                case,
                failure,
                ..
            } => {
                match failure {
                    CaseFailure::Mismatch {
                        ..
                    } => return self.line(&t!("run.case.mismatch", case = case.name)),
                    CaseFailure::Exited {
                        ..
                    } => {}
                    CaseFailure::Signaled => {
                        self.error(&t!("run.error.signaled", case = case.name))?;
                    }
                    CaseFailure::TimedOut {
                        limit,
                    } => {
                        self.error(&t!(
                            "run.error.timed_out",
                            case = case.name,
                            limit = limit.as_secs_f64()
                        ))?;
                    }
                    CaseFailure::Launch {
                        error,
                    } => {
                        self.error(&t!("run.error.launch", case = case.name, error = error))?;
                    }
                    CaseFailure::StaleOutput {
                        path,
                        error,
                    } => {
                        self.error(&t!(
                            "run.error.stale_output",
                            case = case.name,
                            path = path.display(),
                            error = error
                        ))?;
                    }
                }
                self.line(&t!("run.case.failed", case = case.name, code = failure.code()))
            }
            RunEvent::SuitePassed {
                suite,
            } => self.line(&t!("run.suite.passed", suite = suite.name)),
            RunEvent::SuiteFailed {
                suite,
                code,
            } => self.line(&t!("run.suite.failed", suite = suite.name, code = code)),
            RunEvent::Finished {
                summary,
            } => {
                if summary.passed() {
                    self.line(&t!("run.all_passed"))
                } else {
                    self.line(&t!("run.some_failed"))
                }
            }
        }
    }
}
