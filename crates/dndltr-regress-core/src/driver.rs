// crates/dndltr-regress-core/src/driver.rs
// ============================================================================
// Module: Run Driver
// Description: Sequential suite orchestration with stop-at-first-failure.
// Purpose: Turn a run plan into events and a final result code.
// Dependencies: thiserror, tracing
// ============================================================================

//! ## Overview
//! The driver walks suites strictly in order:
//!
//! ```text
//! START -> RUNNING_SUITE -> SUITE_PASSED -> (next suite) ... -> DONE
//!                        -> SUITE_FAILED -> HALT
//! ```
//!
//! There are no retries. The first failing suite's code becomes the overall
//! code and no further suite is entered. A tests directory that cannot be
//! listed ends the run with [`ResultCode::HARNESS_FAULT`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io;
use std::path::PathBuf;

use thiserror::Error;
use tracing::info;

use crate::discovery::DiscoveryError;
use crate::discovery::DiscoveryOrder;
use crate::discovery::discover_suites;
use crate::invoke::EmulatorRunner;
use crate::layout::ResultCode;
use crate::layout::Suite;
use crate::report::ReportSink;
use crate::report::RunEvent;
use crate::report::RunSummary;
use crate::suite::run_suite;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Failures resolving which suites a plan covers.
#[derive(Debug, Error)]
pub enum PlanError {
    /// The tests directory could not be listed.
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),
    /// Suites were selected by name but do not exist.
    #[error("unknown suite(s): {}", .0.join(", "))]
    UnknownSuites(Vec<String>),
}

/// Failures that abort a run outside the reported-result convention.
#[derive(Debug, Error)]
pub enum RunError {
    /// Selected suites do not exist.
    #[error("unknown suite(s): {}", .0.join(", "))]
    UnknownSuites(Vec<String>),
    /// The report sink failed.
    #[error("failed to record run progress: {0}")]
    Report(#[from] io::Error),
}

// ============================================================================
// SECTION: Plan
// ============================================================================

/// What to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPlan {
    /// Directory whose subdirectories are suites.
    pub tests_dir: PathBuf,
    /// Visit order for suites and cases.
    pub order: DiscoveryOrder,
    /// Suite names to run; empty means all.
    pub selected: Vec<String>,
}

impl RunPlan {
    /// Creates a plan covering every suite under `tests_dir`.
    #[must_use]
    pub fn new(tests_dir: impl Into<PathBuf>) -> Self {
        Self {
            tests_dir: tests_dir.into(),
            order: DiscoveryOrder::default(),
            selected: Vec::new(),
        }
    }

    /// Discovers the suites this plan covers, in visit order.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError`] when the tests directory cannot be listed or a
    /// selected suite does not exist.
    pub fn suites(&self) -> Result<Vec<Suite>, PlanError> {
        let suites = discover_suites(&self.tests_dir, self.order)?;
        if self.selected.is_empty() {
            return Ok(suites);
        }
        let unknown: Vec<String> = self
            .selected
            .iter()
            .filter(|name| !suites.iter().any(|suite| &suite.name == *name))
            .cloned()
            .collect();
        if !unknown.is_empty() {
            return Err(PlanError::UnknownSuites(unknown));
        }
        Ok(suites.into_iter().filter(|suite| self.selected.contains(&suite.name)).collect())
    }
}

// ============================================================================
// SECTION: Driver
// ============================================================================

/// Runs a [`RunPlan`] against an emulator runner.
#[derive(Debug)]
pub struct Driver<'a, R: ?Sized> {
    /// Plan to execute.
    plan: &'a RunPlan,
    /// Emulator runner used for every case.
    runner: &'a R,
}

impl<'a, R> Driver<'a, R>
where
    R: EmulatorRunner + ?Sized,
{
    /// Creates a driver for `plan` using `runner`.
    #[must_use]
    pub const fn new(plan: &'a RunPlan, runner: &'a R) -> Self {
        Self {
            plan,
            runner,
        }
    }

    /// Executes the plan, emitting events to `sink`.
    ///
    /// # Errors
    ///
    /// Returns [`RunError::UnknownSuites`] before any suite runs when the
    /// selection names a missing suite, and [`RunError::Report`] when the sink
    /// fails. Test failures are not errors; they are reported in the summary.
    pub fn run<S>(&self, sink: &mut S) -> Result<RunSummary, RunError>
    where
        S: ReportSink + ?Sized,
    {
        let mut summary = RunSummary {
            code: ResultCode::SUCCESS,
            suites_passed: 0,
            cases_passed: 0,
            failed_suite: None,
        };
        let suites = match self.plan.suites() {
            Ok(suites) => suites,
            Err(PlanError::UnknownSuites(names)) => return Err(RunError::UnknownSuites(names)),
            Err(PlanError::Discovery(error)) => {
                sink.report(&RunEvent::DiscoveryFailed {
                    error: &error,
                })?;
                summary.code = ResultCode::HARNESS_FAULT;
                sink.report(&RunEvent::Finished {
                    summary: &summary,
                })?;
                return Ok(summary);
            }
        };

        for suite in &suites {
            sink.report(&RunEvent::SuiteStarted {
                suite,
            })?;
            let outcome = run_suite(suite, self.plan.order, self.runner, sink)?;
            summary.cases_passed += outcome.cases_passed;
            if !outcome.code.is_success() {
                info!(suite = %suite.name, code = outcome.code.get(), "suite failed; halting run");
                summary.code = outcome.code;
                summary.failed_suite = Some(suite.name.clone());
                sink.report(&RunEvent::SuiteFailed {
                    suite,
                    code: outcome.code,
                })?;
                break;
            }
            summary.suites_passed += 1;
            sink.report(&RunEvent::SuitePassed {
                suite,
            })?;
        }

        sink.report(&RunEvent::Finished {
            summary: &summary,
        })?;
        Ok(summary)
    }
}
