// crates/dndltr-regress-core/src/compare.rs
// ============================================================================
// Module: Artifact Comparison
// Description: Exact byte comparison of output and expected artifacts.
// Purpose: Decide whether a rendered frame matches its recorded reference.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Comparison is a pure function of the two files' bytes. No image decoding
//! takes place: any byte difference, including a length difference, is a
//! mismatch. A missing or unreadable file is also a mismatch, never a pass.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::fs::File;
use std::io;
use std::io::ErrorKind;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Chunk size used when streaming both artifacts.
const CHUNK_BYTES: usize = 64 * 1024;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Result of comparing an output artifact against its expected artifact.
#[derive(Debug)]
pub enum Comparison {
    /// Both files hold identical bytes.
    Match,
    /// Contents diverge at `offset` (the shorter length when one is a prefix).
    Differs {
        /// First differing byte offset.
        offset: u64,
    },
    /// The emulator did not leave an output artifact behind.
    OutputMissing,
    /// No expected artifact is recorded for the case.
    ExpectedMissing,
    /// One of the files exists but could not be read.
    Unreadable {
        /// File that failed to read.
        path: PathBuf,
        /// Underlying I/O error.
        error: io::Error,
    },
}

impl Comparison {
    /// Returns true only for [`Comparison::Match`].
    #[must_use]
    pub const fn is_match(&self) -> bool {
        matches!(self, Self::Match)
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Match => write!(f, "identical"),
            Self::Differs {
                offset,
            } => write!(f, "contents differ at byte {offset}"),
            Self::OutputMissing => write!(f, "output artifact missing"),
            Self::ExpectedMissing => write!(f, "expected artifact missing"),
            Self::Unreadable {
                path,
                error,
            } => write!(f, "unable to read {}: {error}", path.display()),
        }
    }
}

// ============================================================================
// SECTION: Comparison
// ============================================================================

/// Compares `output` with `expected` byte for byte.
#[must_use]
pub fn compare_artifacts(output: &Path, expected: &Path) -> Comparison {
    let mut output_file = match open(output, Comparison::OutputMissing) {
        Ok(file) => file,
        Err(comparison) => return comparison,
    };
    let mut expected_file = match open(expected, Comparison::ExpectedMissing) {
        Ok(file) => file,
        Err(comparison) => return comparison,
    };

    let mut left = vec![0u8; CHUNK_BYTES];
    let mut right = vec![0u8; CHUNK_BYTES];
    let mut offset: u64 = 0;
    loop {
        let left_len = match fill(&mut output_file, &mut left) {
            Ok(len) => len,
            Err(error) => return unreadable(output, error),
        };
        let right_len = match fill(&mut expected_file, &mut right) {
            Ok(len) => len,
            Err(error) => return unreadable(expected, error),
        };
        let common = left_len.min(right_len);
        if let Some(index) = left[.. common].iter().zip(&right[.. common]).position(|(a, b)| a != b)
        {
            return Comparison::Differs {
                offset: offset + widen(index),
            };
        }
        if left_len != right_len {
            return Comparison::Differs {
                offset: offset + widen(common),
            };
        }
        if left_len == 0 {
            return Comparison::Match;
        }
        offset += widen(left_len);
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Opens `path`, mapping a missing file to `missing`.
fn open(path: &Path, missing: Comparison) -> Result<File, Comparison> {
    match File::open(path) {
        Ok(file) => Ok(file),
        Err(error) if error.kind() == ErrorKind::NotFound => Err(missing),
        Err(error) => Err(unreadable(path, error)),
    }
}

/// Builds an [`Comparison::Unreadable`] for `path`.
fn unreadable(path: &Path, error: io::Error) -> Comparison {
    Comparison::Unreadable {
        path: path.to_path_buf(),
        error,
    }
}

/// Reads until `buf` is full or the reader is exhausted.
fn fill(reader: &mut impl Read, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled ..]) {
            Ok(0) => break,
            Ok(read) => filled += read,
            Err(error) if error.kind() == ErrorKind::Interrupted => {}
            Err(error) => return Err(error),
        }
    }
    Ok(filled)
}

/// Converts a chunk-local length into a file offset.
fn widen(len: usize) -> u64 {
    u64::try_from(len).unwrap_or(u64::MAX)
}
