// crates/dndltr-regress-core/src/discovery.rs
// ============================================================================
// Module: Suite and Case Discovery
// Description: Enumerates suites under the tests directory and cases per suite.
// Purpose: Turn the corpus directory tree into an ordered run plan.
// Dependencies: serde, thiserror, tracing
// ============================================================================

//! ## Overview
//! Suites are the immediate subdirectories of the tests directory. Cases are
//! the regular files in a suite directory whose name ends with
//! [`INPUT_EXTENSION`]. Both listings are non-recursive and, by default,
//! sorted by name so repeated runs visit the corpus in the same order.
//!
//! ## Invariants
//! - Discovery never changes the process working directory.
//! - Entries whose names are not valid UTF-8 are skipped.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::layout::Case;
use crate::layout::INPUT_EXTENSION;
use crate::layout::Suite;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Order in which discovered suites and cases are visited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscoveryOrder {
    /// Sort by name (byte order).
    #[default]
    Sorted,
    /// Keep whatever order the directory listing reports.
    Listing,
}

impl DiscoveryOrder {
    /// Returns the canonical label used in config files and CLI flags.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sorted => "sorted",
            Self::Listing => "listing",
        }
    }
}

/// Discovery failures.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// The directory could not be listed.
    #[error("unable to list {path}: {source}")]
    ReadDir {
        /// Directory being listed.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
}

// ============================================================================
// SECTION: Discovery
// ============================================================================

/// Lists the suites under `tests_dir`.
///
/// # Errors
///
/// Returns [`DiscoveryError::ReadDir`] when `tests_dir` cannot be listed.
pub fn discover_suites(
    tests_dir: &Path,
    order: DiscoveryOrder,
) -> Result<Vec<Suite>, DiscoveryError> {
    let mut names = list_names(tests_dir, |path| path.is_dir())?;
    apply_order(&mut names, order);
    debug!(tests_dir = %tests_dir.display(), count = names.len(), "discovered suites");
    Ok(names.into_iter().map(|name| Suite::new(tests_dir, name)).collect())
}

/// Lists the cases inside `suite`.
///
/// # Errors
///
/// Returns [`DiscoveryError::ReadDir`] when the suite directory cannot be listed.
pub fn discover_cases(suite: &Suite, order: DiscoveryOrder) -> Result<Vec<Case>, DiscoveryError> {
    let mut names = list_names(&suite.dir, |path| path.is_file())?;
    names.retain(|name| name.ends_with(INPUT_EXTENSION));
    apply_order(&mut names, order);
    debug!(suite = %suite.name, count = names.len(), "discovered cases");
    Ok(names.into_iter().map(|name| suite.case(name)).collect())
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns the UTF-8 names of entries in `dir` whose path satisfies `keep`.
fn list_names(dir: &Path, keep: impl Fn(&Path) -> bool) -> Result<Vec<String>, DiscoveryError> {
    let read_error = |source| DiscoveryError::ReadDir {
        path: dir.to_path_buf(),
        source,
    };
    let mut names = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_error)? {
        let entry = entry.map_err(read_error)?;
        let path = entry.path();
        if !keep(&path) {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(raw) => debug!(entry = %raw.to_string_lossy(), "skipping entry with non UTF-8 name"),
        }
    }
    Ok(names)
}

/// Reorders `names` in place according to `order`.
fn apply_order(names: &mut [String], order: DiscoveryOrder) {
    if order == DiscoveryOrder::Sorted {
        names.sort_unstable();
    }
}
