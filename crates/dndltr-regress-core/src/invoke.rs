// crates/dndltr-regress-core/src/invoke.rs
// ============================================================================
// Module: Emulator Invocation
// Description: Runs the external emulator once per case.
// Purpose: Hide process spawning behind a runner trait the driver can swap.
// Dependencies: serde, thiserror, tracing
// ============================================================================

//! ## Overview
//! The emulator is an opaque collaborator driven by its command line:
//!
//! ```text
//! <binary> <absolute-case-path> -f <frames> [-x <scale>]
//! ```
//!
//! Exit status `0` means the emulator rendered [`OUTPUT_ARTIFACT`] into its
//! working directory. The [`ProcessRunner`] sets that working directory on the
//! child only; the harness process never changes directory.
//!
//! [`OUTPUT_ARTIFACT`]: crate::layout::OUTPUT_ARTIFACT

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::ffi::OsString;
use std::io;
use std::path::Path;
use std::path::PathBuf;
use std::process::Child;
use std::process::Command;
use std::process::ExitStatus;
use std::process::Stdio;
use std::thread;
use std::time::Duration;
use std::time::Instant;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;
use tracing::warn;

use crate::layout::Case;
use crate::layout::Suite;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Frame count passed to the emulator when none is configured.
pub const DEFAULT_FRAMES: u32 = 100;
/// Smallest resolution scale the emulator accepts.
pub const MIN_SCALE: u8 = 1;
/// Largest resolution scale the emulator accepts.
pub const MAX_SCALE: u8 = 5;
/// Poll interval while waiting on a child under a timeout.
const WAIT_POLL_INTERVAL: Duration = Duration::from_millis(10);

// ============================================================================
// SECTION: Types
// ============================================================================

/// What happens to the emulator's standard error stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StderrMode {
    /// Pass through to the harness's stderr.
    #[default]
    Inherit,
    /// Discard.
    Null,
}

impl StderrMode {
    /// Returns the matching child stdio handle.
    fn stdio(self) -> Stdio {
        match self {
            Self::Inherit => Stdio::inherit(),
            Self::Null => Stdio::null(),
        }
    }
}

/// Emulator arguments that follow the case path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmulatorArgs {
    /// Number of frames to run before rendering (`-f`).
    pub frames: u32,
    /// Optional resolution scale (`-x`).
    pub scale: Option<u8>,
}

impl Default for EmulatorArgs {
    fn default() -> Self {
        Self {
            frames: DEFAULT_FRAMES,
            scale: None,
        }
    }
}

impl EmulatorArgs {
    /// Builds the full argument vector for `case_path`.
    #[must_use]
    pub fn argv(&self, case_path: &Path) -> Vec<OsString> {
        let mut argv = vec![
            case_path.as_os_str().to_os_string(),
            OsString::from("-f"),
            OsString::from(self.frames.to_string()),
        ];
        if let Some(scale) = self.scale {
            argv.push(OsString::from("-x"));
            argv.push(OsString::from(scale.to_string()));
        }
        argv
    }
}

/// How an emulator invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitOutcome {
    /// The process exited with a status code (`0` is success).
    Exited(i32),
    /// The process was terminated without an exit code (e.g. by a signal).
    Signaled,
    /// The process outlived the configured limit and was killed.
    TimedOut(Duration),
}

/// Invocation failures raised before an exit outcome exists.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum InvokeError {
    /// The emulator could not be started.
    #[error("failed to start {program}: {source}")]
    Spawn {
        /// Program that failed to start.
        program: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// Waiting on the emulator failed.
    #[error("failed to wait on {program}: {source}")]
    Wait {
        /// Program being waited on.
        program: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
}

// ============================================================================
// SECTION: Runner Interface
// ============================================================================

/// Runs the emulator for one case.
pub trait EmulatorRunner {
    /// Invokes the emulator on `case` with `suite`'s directory as working
    /// directory and blocks until it finishes.
    ///
    /// # Errors
    ///
    /// Returns [`InvokeError`] when the emulator cannot be started or awaited.
    fn run_case(&self, suite: &Suite, case: &Case) -> Result<ExitOutcome, InvokeError>;
}

// ============================================================================
// SECTION: Process Runner
// ============================================================================

/// Spawns the real emulator binary as a child process.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    /// Emulator executable.
    program: PathBuf,
    /// Arguments following the case path.
    args: EmulatorArgs,
    /// Child stderr handling.
    stderr: StderrMode,
    /// Optional per-case time limit.
    timeout: Option<Duration>,
}

impl ProcessRunner {
    /// Creates a runner for `program` with default arguments.
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: EmulatorArgs::default(),
            stderr: StderrMode::default(),
            timeout: None,
        }
    }

    /// Sets the arguments following the case path.
    #[must_use]
    pub fn with_args(mut self, args: EmulatorArgs) -> Self {
        self.args = args;
        self
    }

    /// Sets how the child's stderr is handled.
    #[must_use]
    pub fn with_stderr(mut self, stderr: StderrMode) -> Self {
        self.stderr = stderr;
        self
    }

    /// Sets the per-case time limit.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the emulator executable path.
    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Blocks on `child`, killing it once `limit` elapses.
    fn wait_with_limit(&self, child: &mut Child, limit: Duration) -> Result<ExitOutcome, InvokeError> {
        let started = Instant::now();
        loop {
            if let Some(status) = child.try_wait().map_err(|source| self.wait_error(source))? {
                return Ok(outcome_from_status(status));
            }
            if started.elapsed() >= limit {
                warn!(program = %self.program.display(), limit_secs = limit.as_secs_f64(), "emulator timed out; killing");
                let killed = child.kill();
                let status = child.wait().map_err(|source| self.wait_error(source))?;
                if let Err(error) = killed {
                    debug!(program = %self.program.display(), %error, "kill failed; emulator had already exited");
                    return Ok(outcome_from_status(status));
                }
                return Ok(ExitOutcome::TimedOut(limit));
            }
            thread::sleep(WAIT_POLL_INTERVAL);
        }
    }

    /// Wraps a wait failure with the program path.
    fn wait_error(&self, source: io::Error) -> InvokeError {
        InvokeError::Wait {
            program: self.program.clone(),
            source,
        }
    }
}

impl EmulatorRunner for ProcessRunner {
    fn run_case(&self, suite: &Suite, case: &Case) -> Result<ExitOutcome, InvokeError> {
        let argv = self.args.argv(&case.path);
        debug!(
            program = %self.program.display(),
            case = %case.path.display(),
            cwd = %suite.dir.display(),
            "invoking emulator"
        );
        let mut child = Command::new(&self.program)
            .args(&argv)
            .current_dir(&suite.dir)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(self.stderr.stdio())
            .spawn()
            .map_err(|source| InvokeError::Spawn {
                program: self.program.clone(),
                source,
            })?;
        let outcome = match self.timeout {
            Some(limit) => self.wait_with_limit(&mut child, limit)?,
            None => outcome_from_status(child.wait().map_err(|source| self.wait_error(source))?),
        };
        if let ExitOutcome::Exited(code) = outcome
            && code != 0
        {
            debug!(
                case = %case.name,
                code,
                meaning = describe_emulator_exit(code).unwrap_or("unknown"),
                "emulator reported failure"
            );
        }
        Ok(outcome)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Maps a finished process status onto an [`ExitOutcome`].
fn outcome_from_status(status: ExitStatus) -> ExitOutcome {
    status.code().map_or(ExitOutcome::Signaled, ExitOutcome::Exited)
}

/// Names the failure categories the emulator reports through its exit code.
#[must_use]
pub const fn describe_emulator_exit(code: i32) -> Option<&'static str> {
    match code {
        1 => Some("invalid arguments"),
        2 => Some("SDL initialization failed"),
        3 => Some("ROM load failed"),
        4 => Some("ROM initialization failed"),
        _ => None,
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
