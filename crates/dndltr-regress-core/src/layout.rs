// crates/dndltr-regress-core/src/layout.rs
// ============================================================================
// Module: Corpus Layout
// Description: Fixed on-disk layout of the regression corpus.
// Purpose: Name suites, cases, and artifacts by explicit path joins.
// Dependencies: std
// ============================================================================

//! ## Overview
//! The regression corpus has a fixed shape that must be preserved bit-exact:
//!
//! ```text
//! <root>/bin/dndltr_d
//! <root>/tests/<suite>/<case>.nes
//! <root>/tests/<suite>/expected/<case>.bmp
//! ```
//!
//! The emulator writes [`OUTPUT_ARTIFACT`] into its working directory, which
//! the harness sets to the suite directory. Every path is derived from an
//! explicit base; nothing here consults the process working directory.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::path::Path;
use std::path::PathBuf;

// ============================================================================
// SECTION: Layout Constants
// ============================================================================

/// Directory under the corpus root holding one subdirectory per suite.
pub const TESTS_DIR: &str = "tests";
/// Default emulator location relative to the corpus root.
pub const DEFAULT_BINARY: &str = "bin/dndltr_d";
/// Subdirectory of a suite holding the expected artifacts.
pub const EXPECTED_DIR: &str = "expected";
/// File-name suffix identifying case inputs.
pub const INPUT_EXTENSION: &str = ".nes";
/// File-name suffix of expected artifacts.
pub const EXPECTED_EXTENSION: &str = ".bmp";
/// Fixed name of the file the emulator renders into its working directory.
pub const OUTPUT_ARTIFACT: &str = "output.bmp";

// ============================================================================
// SECTION: Suite
// ============================================================================

/// A named group of cases sharing one directory and one `expected/` tree.
///
/// # Invariants
/// - `dir` is `<tests_dir>/<name>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suite {
    /// Directory name of the suite.
    pub name: String,
    /// Suite directory.
    pub dir: PathBuf,
}

impl Suite {
    /// Builds a suite rooted at `tests_dir/name`.
    #[must_use]
    pub fn new(tests_dir: &Path, name: impl Into<String>) -> Self {
        let name = name.into();
        let dir = tests_dir.join(&name);
        Self {
            name,
            dir,
        }
    }

    /// Returns the directory holding expected artifacts.
    #[must_use]
    pub fn expected_dir(&self) -> PathBuf {
        self.dir.join(EXPECTED_DIR)
    }

    /// Returns the path the emulator writes its rendered output to.
    #[must_use]
    pub fn output_artifact(&self) -> PathBuf {
        self.dir.join(OUTPUT_ARTIFACT)
    }

    /// Builds the case named `file_name` inside this suite.
    #[must_use]
    pub fn case(&self, file_name: impl Into<String>) -> Case {
        let name = file_name.into();
        let path = self.dir.join(&name);
        Case {
            name,
            path,
        }
    }
}

// ============================================================================
// SECTION: Case
// ============================================================================

/// A single ROM input processed by one emulator invocation.
///
/// # Invariants
/// - `name` ends with [`INPUT_EXTENSION`].
/// - `path` is the suite directory joined with `name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Case {
    /// Input file name, e.g. `nestest.nes`.
    pub name: String,
    /// Path to the input file.
    pub path: PathBuf,
}

impl Case {
    /// Returns the expected artifact file name (`foo.nes` becomes `foo.bmp`).
    #[must_use]
    pub fn expected_file_name(&self) -> String {
        let stem = self.name.strip_suffix(INPUT_EXTENSION).unwrap_or(&self.name);
        format!("{stem}{EXPECTED_EXTENSION}")
    }

    /// Returns the expected artifact path under the suite's `expected/` directory.
    #[must_use]
    pub fn expected_artifact(&self, suite: &Suite) -> PathBuf {
        suite.expected_dir().join(self.expected_file_name())
    }
}

// ============================================================================
// SECTION: Result Codes
// ============================================================================

/// Outcome code carried from a failing case up to the process exit status.
///
/// # Invariants
/// - `0` is success; every other value is a failure.
/// - Values other than the sentinels are emulator exit codes passed through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResultCode(i32);

impl ResultCode {
    /// Every case of every suite passed.
    pub const SUCCESS: Self = Self(0);
    /// Output artifact did not match the expected artifact.
    pub const MISMATCH: Self = Self(-1);
    /// The harness itself could not carry out the run (filesystem, spawn,
    /// signal, or timeout).
    pub const HARNESS_FAULT: Self = Self(-2);

    /// Wraps a raw code.
    #[must_use]
    pub const fn new(code: i32) -> Self {
        Self(code)
    }

    /// Returns the raw code.
    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }

    /// Returns true for [`ResultCode::SUCCESS`].
    #[must_use]
    pub const fn is_success(self) -> bool {
        self.0 == 0
    }

    /// Truncates the code to an 8-bit process exit status (`-1` becomes `255`).
    #[must_use]
    pub fn exit_status(self) -> u8 {
        u8::try_from(self.0.rem_euclid(256)).unwrap_or(u8::MAX)
    }
}

impl fmt::Display for ResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

/// Unit tests for layout path derivation and exit-status mapping.
#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::ResultCode;
    use super::Suite;

    /// Expected artifacts swap `.nes` for `.bmp` under `expected/`.
    #[test]
    fn expected_artifact_swaps_extension() {
        let suite = Suite::new(Path::new("/corpus/tests"), "ppu");
        let case = suite.case("sprite_hit.nes");
        assert_eq!(case.path, Path::new("/corpus/tests/ppu/sprite_hit.nes"));
        assert_eq!(
            case.expected_artifact(&suite),
            Path::new("/corpus/tests/ppu/expected/sprite_hit.bmp")
        );
    }

    /// Only the trailing input extension is substituted.
    #[test]
    fn expected_name_only_replaces_trailing_extension() {
        let suite = Suite::new(Path::new("tests"), "mappers");
        let case = suite.case("a.nes.b.nes");
        assert_eq!(case.expected_file_name(), "a.nes.b.bmp");
    }

    /// The output artifact sits directly in the suite directory.
    #[test]
    fn output_artifact_lives_in_suite_dir() {
        let suite = Suite::new(Path::new("tests"), "cpu");
        assert_eq!(suite.output_artifact(), Path::new("tests/cpu/output.bmp"));
    }

    /// Negative sentinels wrap into the 8-bit exit status range.
    #[test]
    fn exit_status_wraps_negative_sentinels() {
        assert_eq!(ResultCode::SUCCESS.exit_status(), 0);
        assert_eq!(ResultCode::MISMATCH.exit_status(), 255);
        assert_eq!(ResultCode::HARNESS_FAULT.exit_status(), 254);
        assert_eq!(ResultCode::new(7).exit_status(), 7);
        assert_eq!(ResultCode::new(300).exit_status(), 44);
    }
}
