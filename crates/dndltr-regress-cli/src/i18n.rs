// crates/dndltr-regress-cli/src/i18n.rs
// ============================================================================
// Module: CLI Message Catalog
// Description: Message catalog and translation utilities for the CLI.
// Purpose: Centralize user-facing strings, including the console report lines.
// Dependencies: Standard library collections and formatting utilities.
// ============================================================================

//! ## Overview
//! Every line `dndltr-regress` prints comes from this catalog. The console
//! report lines are part of the harness contract: scripts grep for
//! `SUCCESS: All tests passed`, so their templates must not drift.
//! All runtime output should be routed through the [`t!`](crate::t) macro.
//!
//! ## Invariants
//! - The catalog is initialized once and read-only thereafter.
//! - Missing keys fall back to the key itself.
//! - Placeholder substitutions preserve deterministic order.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// SECTION: Types
// ============================================================================

/// A formatted message argument captured by the [`macro@crate::t`] macro.
///
/// # Invariants
/// - `key` matches a placeholder name without braces (for example, `suite`).
/// - `value` is preformatted and should be safe for display.
#[derive(Clone)]
pub struct MessageArg {
    /// The placeholder name used in message templates (e.g., `"suite"`).
    pub key: &'static str,
    /// The formatted string value to substitute for this placeholder.
    pub value: String,
}

impl MessageArg {
    /// Constructs a new [`MessageArg`] from a key and displayable value.
    pub fn new(key: &'static str, value: impl Into<String>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// Static English catalog entries.
const CATALOG_EN: &[(&str, &str)] = &[
    ("main.version", "dndltr-regress {version}"),
    ("main.cwd_failed", "Failed to resolve the working directory: {error}"),
    ("logging.init_failed", "Failed to initialize logging: {error}"),
    ("output.stream.stdout", "stdout"),
    ("output.stream.stderr", "stderr"),
    ("output.stream.unknown", "output"),
    ("output.write_failed", "Failed to write to {stream}: {error}"),
    ("config.load_failed", "Failed to load config: {error}"),
    ("config.validate.ok", "Config OK"),
    ("run.suite.started", "SUITE: {suite}"),
    ("run.suite.passed", "SUCCESS: Test suite {suite} passed"),
    ("run.suite.failed", "FAIL: Test suite {suite} failed: {code}"),
    ("run.case.passed", "  SUCCESS: Test {case} passed"),
    ("run.case.failed", "  FAIL: Test {case} failed: {code}"),
    ("run.case.mismatch", "  FAIL: Test {case} failed: output does not match expected"),
    ("run.all_passed", "SUCCESS: All tests passed"),
    ("run.some_failed", "FAIL: Some or all tests failed"),
    ("run.unknown_suites", "Unknown suite(s): {suites}"),
    ("run.error.discovery", "Error: unable to discover suites: {error}"),
    ("run.error.case_discovery", "Error: unable to discover cases in suite {suite}: {error}"),
    ("run.error.launch", "Error: test {case} could not be run: {error}"),
    ("run.error.timed_out", "Error: test {case} exceeded the {limit}s time limit"),
    ("run.error.signaled", "Error: test {case} was terminated by a signal"),
    (
        "run.error.stale_output",
        "Error: test {case} could not be run: stale output {path} could not be removed: {error}",
    ),
    ("list.failed", "Failed to list suites: {error}"),
    ("list.case_failed", "Failed to list cases in suite {suite}: {error}"),
    ("list.none", "No suites found under {path}"),
    ("list.suite", "{suite} ({count} cases)"),
    ("list.case", "  {case}"),
];

/// Returns the message catalog.
pub(crate) fn catalog() -> &'static HashMap<&'static str, &'static str> {
    static CATALOG_EN_MAP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    CATALOG_EN_MAP.get_or_init(|| CATALOG_EN.iter().copied().collect())
}

/// Returns the raw catalog entries in declaration order.
#[cfg(test)]
pub(crate) const fn catalog_entries() -> &'static [(&'static str, &'static str)] {
    CATALOG_EN
}

// ============================================================================
// SECTION: Translation
// ============================================================================

/// Translates `key` while substituting `args`.
///
/// Placeholders are filled in one pass; substituted values are never rescanned.
#[must_use]
pub fn translate(key: &str, args: Vec<MessageArg>) -> String {
    let template = catalog().get(key).copied().unwrap_or(key);
    if args.is_empty() {
        return template.to_string();
    }

    let mut result = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        result.push_str(&rest[.. open]);
        let tail = &rest[open ..];
        let Some(close) = tail.find('}') else {
            rest = tail;
            break;
        };
        let name = &tail[1 .. close];
        match args.iter().find(|arg| arg.key == name) {
            Some(arg) => result.push_str(&arg.value),
            None => result.push_str(&tail[..= close]),
        }
        rest = &tail[close + 1 ..];
    }
    result.push_str(rest);
    result
}

// ============================================================================
// SECTION: Macro
// ============================================================================

/// Formats a catalog message from a key and named arguments.
///
/// # Arguments
///
/// - `$key` must match a catalog entry.
/// - Named arguments are substituted into `{placeholder}` positions.
///
/// # Returns
///
/// A [`String`] with placeholders substituted.
#[macro_export]
macro_rules! t {
    ($key:literal $(, $name:ident = $value:expr )* $(,)?) => {{
        let args = ::std::vec![
            $(
                $crate::i18n::MessageArg::new(stringify!($name), $value.to_string()),
            )*
        ];
        $crate::i18n::translate($key, args)
    }};
}
