// crates/dndltr-regress-cli/src/logging.rs
// ============================================================================
// Module: Logging Setup
// Description: Installs the global tracing subscriber for the CLI.
// Purpose: Route diagnostics to stderr so the stdout report stays clean.
// Dependencies: tracing, tracing-subscriber
// ============================================================================

//! ## Overview
//! Diagnostics are filtered by [`LOG_ENV`] using `tracing-subscriber`'s
//! `EnvFilter` syntax and default to [`DEFAULT_LOG_FILTER`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use tracing_subscriber::EnvFilter;
use tracing_subscriber::FmtSubscriber;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "DNDLTR_REGRESS_LOG";
/// Filter applied when [`LOG_ENV`] is unset or empty.
pub const DEFAULT_LOG_FILTER: &str = "warn";

// ============================================================================
// SECTION: Setup
// ============================================================================

/// Builds the filter from `value`, falling back to [`DEFAULT_LOG_FILTER`].
///
/// # Errors
///
/// Returns the parser message when `value` is not a valid filter directive.
pub fn build_filter(value: Option<&str>) -> Result<EnvFilter, String> {
    let directives = value.map(str::trim).filter(|value| !value.is_empty()).unwrap_or(DEFAULT_LOG_FILTER);
    EnvFilter::try_new(directives).map_err(|err| format!("invalid {LOG_ENV} value: {err}"))
}

/// Installs the stderr subscriber using the filter from [`LOG_ENV`].
///
/// # Errors
///
/// Returns a message when the filter is malformed or a global subscriber is
/// already installed.
pub fn init_logging() -> Result<(), String> {
    let value = std::env::var(LOG_ENV).ok();
    let filter = build_filter(value.as_deref())?;
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).map_err(|err| err.to_string())
}
