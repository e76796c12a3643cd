// crates/dndltr-regress-config/src/config_tests.rs
// ============================================================================
// Module: Config Unit Tests
// Description: Unit coverage for config parsing, validation, and overrides.
// Purpose: Ensure bad settings fail closed and defaults match the corpus contract.
// Dependencies: dndltr-regress-core
// ============================================================================

//! ## Overview
//! Unit coverage for config parsing, validation, and overrides.
//! Invariants:
//! - Defaults reproduce `bin/dndltr_d <case> -f 100` over `tests/`.
//! - Out-of-range settings are rejected after overrides are applied.

#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    reason = "Test-only assertions favor direct unwrap/expect for clarity."
)]

use std::path::Path;
use std::path::PathBuf;

use dndltr_regress_core::DiscoveryOrder;
use dndltr_regress_core::StderrMode;

use super::config::ConfigError;
use super::config::ConfigOverrides;
use super::config::HarnessConfig;
use super::config::resolve_config_path;

/// Defaults point at the fixed corpus layout.
#[test]
fn defaults_match_corpus_layout() {
    let config = HarnessConfig::default();
    config.validate().unwrap();
    let paths = config.resolve_paths(Path::new("/corpus"));
    assert_eq!(paths.root, Path::new("/corpus"));
    assert_eq!(paths.tests_dir, Path::new("/corpus/tests"));
    assert_eq!(paths.binary, Path::new("/corpus/bin/dndltr_d"));
    assert_eq!(config.emulator.frames, 100);
    assert_eq!(config.emulator.scale, None);
    assert_eq!(config.emulator.stderr, StderrMode::Inherit);
    assert_eq!(config.discovery.order, DiscoveryOrder::Sorted);
}

/// A complete document parses into every section.
#[test]
fn full_document_parses() {
    let config = HarnessConfig::from_toml_str(
        r#"
[paths]
root = "corpus"
tests_dir = "roms"
binary = "/opt/dndltr/dndltr_d"

[emulator]
frames = 240
scale = 2
timeout_secs = 30
stderr = "null"

[discovery]
order = "listing"
"#,
    )
    .unwrap();
    config.validate().unwrap();
    let paths = config.resolve_paths(Path::new("/work"));
    assert_eq!(paths.root, Path::new("/work/corpus"));
    assert_eq!(paths.tests_dir, Path::new("/work/corpus/roms"));
    assert_eq!(paths.binary, Path::new("/opt/dndltr/dndltr_d"));
    assert_eq!(config.emulator.frames, 240);
    assert_eq!(config.emulator.scale, Some(2));
    assert_eq!(config.emulator.timeout_secs, Some(30));
    assert_eq!(config.emulator.stderr, StderrMode::Null);
    assert_eq!(config.discovery.order, DiscoveryOrder::Listing);
}

/// Unknown keys are rejected rather than ignored.
#[test]
fn unknown_keys_are_rejected() {
    let err = HarnessConfig::from_toml_str("[emulator]\nframez = 10\n").unwrap_err();
    assert!(err.contains("framez"), "unexpected message: {err}");
}

/// Zero frames are invalid.
#[test]
fn zero_frames_are_invalid() {
    let config = HarnessConfig::from_toml_str("[emulator]\nframes = 0\n").unwrap();
    assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
}

/// Scale must stay within the emulator's accepted range.
#[test]
fn scale_outside_range_is_invalid() {
    for scale in [0u8, 6] {
        let mut config = HarnessConfig::default();
        config.emulator.scale = Some(scale);
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))), "scale {scale}");
    }
    let mut config = HarnessConfig::default();
    config.emulator.scale = Some(5);
    config.validate().unwrap();
}

/// A zero timeout is invalid.
#[test]
fn zero_timeout_is_invalid() {
    let mut config = HarnessConfig::default();
    config.emulator.timeout_secs = Some(0);
    assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
}

/// Overrides replace file values and are validated.
#[test]
fn overrides_replace_values_and_revalidate() {
    let mut config = HarnessConfig::default();
    let overrides = ConfigOverrides {
        root: Some(PathBuf::from("/elsewhere")),
        frames: Some(60),
        order: Some(DiscoveryOrder::Listing),
        quiet_emulator: true,
        ..ConfigOverrides::default()
    };
    config.apply(&overrides).unwrap();
    assert_eq!(config.paths.root.as_deref(), Some(Path::new("/elsewhere")));
    assert_eq!(config.emulator.frames, 60);
    assert_eq!(config.discovery.order, DiscoveryOrder::Listing);
    assert_eq!(config.emulator.stderr, StderrMode::Null);

    let bad = ConfigOverrides {
        scale: Some(9),
        ..ConfigOverrides::default()
    };
    assert!(config.apply(&bad).is_err());
}

/// Explicit paths beat the environment, which beats the search directory.
#[test]
fn config_path_resolution_order() {
    let dir = Path::new("/definitely/not/here");
    assert_eq!(
        resolve_config_path(Some(Path::new("a.toml")), Some("b.toml"), dir),
        Some(PathBuf::from("a.toml"))
    );
    assert_eq!(resolve_config_path(None, Some("b.toml"), dir), Some(PathBuf::from("b.toml")));
    assert_eq!(resolve_config_path(None, None, dir), None);
}

/// The run plan and runner carry the configured settings.
#[test]
fn run_plan_uses_resolved_tests_dir() {
    let config = HarnessConfig::default();
    let paths = config.resolve_paths(Path::new("/corpus"));
    let plan = config.run_plan(&paths, vec!["ppu".to_string()]);
    assert_eq!(plan.tests_dir, Path::new("/corpus/tests"));
    assert_eq!(plan.selected, vec!["ppu".to_string()]);
    let runner = config.runner(&paths);
    assert_eq!(runner.program(), Path::new("/corpus/bin/dndltr_d"));
}
