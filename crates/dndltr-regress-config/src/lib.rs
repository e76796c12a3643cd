// crates/dndltr-regress-config/src/lib.rs
// ============================================================================
// Module: dndltr Regression Config
// Description: Configuration model for the regression harness.
// Purpose: Load, validate, and wire harness settings into core types.
// Dependencies: dndltr-regress-core, serde, thiserror, toml
// ============================================================================

//! ## Overview
//! Canonical configuration for `dndltr-regress`: an optional TOML file plus
//! command-line overrides, validated once and converted into a
//! [`dndltr_regress_core::RunPlan`] and [`dndltr_regress_core::ProcessRunner`].

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod config_tests;

// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use config::CONFIG_ENV_VAR;
pub use config::ConfigError;
pub use config::ConfigOverrides;
pub use config::DEFAULT_CONFIG_NAME;
pub use config::DiscoveryConfig;
pub use config::EmulatorConfig;
pub use config::HarnessConfig;
pub use config::MAX_CONFIG_FILE_BYTES;
pub use config::PathsConfig;
pub use config::ResolvedPaths;
pub use config::read_env_strict;
pub use config::resolve_config_path;
