// crates/dndltr-regress-core/tests/common/mod.rs
// ============================================================================
// Module: Core Test Helpers
// Description: Scratch corpora, a scripted emulator, and a recording sink.
// Purpose: Exercise the driver without spawning a real emulator.
// Dependencies: dndltr-regress-core, tempfile
// ============================================================================

//! Shared helpers for core integration tests.

#![allow(dead_code, reason = "Each test binary uses a different subset of helpers.")]

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;

use dndltr_regress_core::Case;
use dndltr_regress_core::EmulatorRunner;
use dndltr_regress_core::ExitOutcome;
use dndltr_regress_core::InvokeError;
use dndltr_regress_core::ReportSink;
use dndltr_regress_core::RunEvent;
use dndltr_regress_core::Suite;
use tempfile::TempDir;

// ============================================================================
// SECTION: Corpus Builder
// ============================================================================

/// Scratch corpus rooted in a temporary directory.
pub struct Corpus {
    /// Owns the temporary root.
    dir: TempDir,
}

impl Corpus {
    /// Creates an empty corpus with a `tests/` directory.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp corpus");
        fs::create_dir_all(dir.path().join("tests")).expect("create tests dir");
        Self {
            dir,
        }
    }

    /// Returns the corpus root.
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Returns the tests directory.
    pub fn tests_dir(&self) -> PathBuf {
        self.root().join("tests")
    }

    /// Creates a suite directory with an `expected/` subdirectory.
    pub fn suite(&self, name: &str) -> PathBuf {
        let dir = self.tests_dir().join(name);
        fs::create_dir_all(dir.join("expected")).expect("create suite dir");
        dir
    }

    /// Adds a case ROM and its expected bitmap to `suite`.
    pub fn case(&self, suite: &str, rom: &str, expected: &[u8]) {
        let dir = self.suite(suite);
        fs::write(dir.join(rom), b"NES\x1a").expect("write rom");
        let stem = rom.strip_suffix(".nes").expect("rom name ends with .nes");
        fs::write(dir.join("expected").join(format!("{stem}.bmp")), expected)
            .expect("write expected");
    }

    /// Adds a case ROM without an expected bitmap.
    pub fn case_without_expected(&self, suite: &str, rom: &str) {
        let dir = self.suite(suite);
        fs::write(dir.join(rom), b"NES\x1a").expect("write rom");
    }

    /// Returns true when `suite` still holds an output artifact.
    pub fn has_output(&self, suite: &str) -> bool {
        self.tests_dir().join(suite).join("output.bmp").exists()
    }
}

// ============================================================================
// SECTION: Scripted Emulator
// ============================================================================

/// What the scripted emulator does for one case.
#[derive(Clone)]
pub enum Behavior {
    /// Write these bytes to `output.bmp` and exit 0.
    Render(Vec<u8>),
    /// Exit with this status without touching `output.bmp`.
    Exit(i32),
    /// Write these bytes to `output.bmp`, then exit with this status.
    RenderThenExit(Vec<u8>, i32),
    /// Terminate without an exit status.
    Signal,
}

/// Emulator stand-in keyed by case file name.
pub struct ScriptedRunner {
    /// Behavior per case name.
    script: BTreeMap<String, Behavior>,
    /// Fallback for unscripted cases.
    fallback: Behavior,
    /// Invocations as `suite/case`.
    pub calls: RefCell<Vec<String>>,
}

impl ScriptedRunner {
    /// Creates a runner whose unscripted cases behave like `fallback`.
    pub fn new(fallback: Behavior) -> Self {
        Self {
            script: BTreeMap::new(),
            fallback,
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Scripts `behavior` for `case`.
    pub fn on(mut self, case: &str, behavior: Behavior) -> Self {
        self.script.insert(case.to_string(), behavior);
        self
    }

    /// Returns the recorded invocations.
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl EmulatorRunner for ScriptedRunner {
    fn run_case(&self, suite: &Suite, case: &Case) -> Result<ExitOutcome, InvokeError> {
        self.calls.borrow_mut().push(format!("{}/{}", suite.name, case.name));
        let behavior = self.script.get(&case.name).unwrap_or(&self.fallback).clone();
        let output = suite.output_artifact();
        match behavior {
            Behavior::Render(bytes) => {
                fs::write(output, bytes).expect("write output");
                Ok(ExitOutcome::Exited(0))
            }
            Behavior::Exit(code) => Ok(ExitOutcome::Exited(code)),
            Behavior::RenderThenExit(bytes, code) => {
                fs::write(output, bytes).expect("write output");
                Ok(ExitOutcome::Exited(code))
            }
            Behavior::Signal => Ok(ExitOutcome::Signaled),
        }
    }
}

// ============================================================================
// SECTION: Recording Sink
// ============================================================================

/// Sink that renders events into console-shaped lines.
#[derive(Default)]
pub struct RecordingSink {
    /// Rendered lines in emission order.
    pub lines: Vec<String>,
}

impl ReportSink for RecordingSink {
    fn report(&mut self, event: &RunEvent<'_>) -> io::Result<()> {
        let line = match event {
            RunEvent::DiscoveryFailed {
                error,
            } => format!("DISCOVERY FAILED: {error}"),
            RunEvent::SuiteStarted {
                suite,
            } => format!("SUITE: {}", suite.name),
            RunEvent::CaseDiscoveryFailed {
                suite,
                ..
            } => format!("  CASE DISCOVERY FAILED: {}", suite.name),
            RunEvent::CasePassed {
                case,
                ..
            } => format!("  SUCCESS: Test {} passed", case.name),
            RunEvent::CaseFailed {
                case,
                failure,
                ..
            } => format!("  FAIL: Test {} failed: {}", case.name, failure.code()),
            RunEvent::SuitePassed {
                suite,
            } => format!("SUCCESS: Test suite {} passed", suite.name),
            RunEvent::SuiteFailed {
                suite,
                code,
            } => format!("FAIL: Test suite {} failed: {code}", suite.name),
            RunEvent::Finished {
                summary,
            } => {
                if summary.passed() {
                    "SUCCESS: All tests passed".to_string()
                } else {
                    "FAIL: Some or all tests failed".to_string()
                }
            }
        };
        self.lines.push(line);
        Ok(())
    }
}

/// Sink that fails on the first event of a chosen kind.
pub struct FailingSink {
    /// Fail once a case event is reported.
    pub fail_on_case: bool,
}

impl ReportSink for FailingSink {
    fn report(&mut self, event: &RunEvent<'_>) -> io::Result<()> {
        let is_case = matches!(event, RunEvent::CasePassed { .. } | RunEvent::CaseFailed { .. });
        if self.fail_on_case && is_case {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink closed"));
        }
        Ok(())
    }
}
