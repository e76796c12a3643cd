// crates/dndltr-regress-config/src/config.rs
// ============================================================================
// Module: Harness Configuration
// Description: TOML-backed harness settings with validation and overrides.
// Purpose: Produce a validated run plan and emulator runner from config.
// Dependencies: dndltr-regress-core, serde, thiserror, toml, tracing
// ============================================================================

//! ## Overview
//! Configuration is optional. When no file is found every setting falls back
//! to the corpus defaults, which reproduce the emulator contract exactly:
//! `<root>/bin/dndltr_d <case> -f 100` over `<root>/tests`.
//!
//! Resolution order for the file is: explicit path, then the
//! `DNDLTR_REGRESS_CONFIG` environment variable, then
//! `dndltr-regress.toml` in the search directory. Command-line overrides are
//! applied on top and the merged result is validated once.
//!
//! ## Invariants
//! - Files larger than [`MAX_CONFIG_FILE_BYTES`] are rejected.
//! - Unknown keys are rejected.
//! - A validated config always yields a runnable plan.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use dndltr_regress_core::DiscoveryOrder;
use dndltr_regress_core::EmulatorArgs;
use dndltr_regress_core::ProcessRunner;
use dndltr_regress_core::RunPlan;
use dndltr_regress_core::StderrMode;
use dndltr_regress_core::invoke::DEFAULT_FRAMES;
use dndltr_regress_core::invoke::MAX_SCALE;
use dndltr_regress_core::invoke::MIN_SCALE;
use dndltr_regress_core::layout::DEFAULT_BINARY;
use dndltr_regress_core::layout::TESTS_DIR;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Config file name looked up in the search directory.
pub const DEFAULT_CONFIG_NAME: &str = "dndltr-regress.toml";
/// Environment variable naming a config file.
pub const CONFIG_ENV_VAR: &str = "DNDLTR_REGRESS_CONFIG";
/// Maximum accepted config file size in bytes.
pub const MAX_CONFIG_FILE_BYTES: usize = 256 * 1024;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration failures.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("unable to read config {path}: {error}")]
    Io {
        /// Config file path.
        path: PathBuf,
        /// Underlying error text.
        error: String,
    },
    /// The config file exceeds the size limit.
    #[error("config {path} exceeds {limit} bytes")]
    TooLarge {
        /// Config file path.
        path: PathBuf,
        /// Size limit in bytes.
        limit: usize,
    },
    /// The config file is not valid TOML for this schema.
    #[error("unable to parse config {path}: {error}")]
    Parse {
        /// Config file path.
        path: PathBuf,
        /// Parser message.
        error: String,
    },
    /// An environment variable is malformed.
    #[error("{0}")]
    Env(String),
    /// A setting is out of range.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Config Types
// ============================================================================

/// Top-level harness configuration (`dndltr-regress.toml`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HarnessConfig {
    /// Corpus locations.
    #[serde(default)]
    pub paths: PathsConfig,
    /// Emulator invocation settings.
    #[serde(default)]
    pub emulator: EmulatorConfig,
    /// Discovery settings.
    #[serde(default)]
    pub discovery: DiscoveryConfig,
    /// File this config was loaded from, if any.
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

/// Corpus locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PathsConfig {
    /// Corpus root; relative values resolve against the working directory.
    #[serde(default)]
    pub root: Option<PathBuf>,
    /// Tests directory, relative to the root.
    #[serde(default = "default_tests_dir")]
    pub tests_dir: PathBuf,
    /// Emulator executable, relative to the root.
    #[serde(default = "default_binary")]
    pub binary: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            root: None,
            tests_dir: default_tests_dir(),
            binary: default_binary(),
        }
    }
}

/// Emulator invocation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EmulatorConfig {
    /// Frames to run before the emulator renders `output.bmp`.
    #[serde(default = "default_frames")]
    pub frames: u32,
    /// Optional resolution scale.
    #[serde(default)]
    pub scale: Option<u8>,
    /// Optional per-case time limit in seconds.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    /// Emulator stderr handling.
    #[serde(default)]
    pub stderr: StderrMode,
}

impl Default for EmulatorConfig {
    fn default() -> Self {
        Self {
            frames: default_frames(),
            scale: None,
            timeout_secs: None,
            stderr: StderrMode::default(),
        }
    }
}

/// Discovery settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DiscoveryConfig {
    /// Visit order for suites and cases.
    #[serde(default)]
    pub order: DiscoveryOrder,
}

/// Command-line values that replace config file values when present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    /// Corpus root.
    pub root: Option<PathBuf>,
    /// Emulator executable.
    pub binary: Option<PathBuf>,
    /// Frame count.
    pub frames: Option<u32>,
    /// Resolution scale.
    pub scale: Option<u8>,
    /// Time limit in seconds.
    pub timeout_secs: Option<u64>,
    /// Discovery order.
    pub order: Option<DiscoveryOrder>,
    /// Silence emulator stderr.
    pub quiet_emulator: bool,
}

/// Absolute locations derived from a config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    /// Corpus root.
    pub root: PathBuf,
    /// Tests directory.
    pub tests_dir: PathBuf,
    /// Emulator executable.
    pub binary: PathBuf,
}

// ============================================================================
// SECTION: Loading
// ============================================================================

impl HarnessConfig {
    /// Loads configuration, falling back to defaults when no file is found.
    ///
    /// `explicit` wins over [`CONFIG_ENV_VAR`], which wins over
    /// [`DEFAULT_CONFIG_NAME`] inside `search_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a named file cannot be read or parsed, the
    /// environment variable is malformed, or validation fails.
    pub fn load(explicit: Option<&Path>, search_dir: &Path) -> Result<Self, ConfigError> {
        let env_value = read_env_nonempty(CONFIG_ENV_VAR)?;
        let Some(path) = resolve_config_path(explicit, env_value.as_deref(), search_dir) else {
            debug!("no config file found; using defaults");
            let config = Self::default();
            config.validate()?;
            return Ok(config);
        };
        Self::load_file(&path)
    }

    /// Loads and validates the config file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when reading, parsing, or validation fails.
    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let bytes = read_with_limit(path)?;
        let content = std::str::from_utf8(&bytes).map_err(|_| ConfigError::Parse {
            path: path.to_path_buf(),
            error: "config must be utf-8".to_string(),
        })?;
        let mut config = Self::from_toml_str(content).map_err(|error| ConfigError::Parse {
            path: path.to_path_buf(),
            error,
        })?;
        config.source = Some(path.to_path_buf());
        config.validate()?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Parses a TOML document without validating it.
    ///
    /// # Errors
    ///
    /// Returns the parser message when the document does not fit the schema.
    pub fn from_toml_str(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|err| err.to_string())
    }

    /// Checks every setting against the emulator's accepted ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.paths.tests_dir.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("paths.tests_dir must not be empty".to_string()));
        }
        if self.paths.binary.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("paths.binary must not be empty".to_string()));
        }
        if self.emulator.frames == 0 {
            return Err(ConfigError::Invalid("emulator.frames must be greater than zero".to_string()));
        }
        if let Some(scale) = self.emulator.scale
            && !(MIN_SCALE ..= MAX_SCALE).contains(&scale)
        {
            return Err(ConfigError::Invalid(format!(
                "emulator.scale must be between {MIN_SCALE} and {MAX_SCALE}"
            )));
        }
        if self.emulator.timeout_secs == Some(0) {
            return Err(ConfigError::Invalid(
                "emulator.timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Applies command-line overrides and revalidates.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when an override is out of range.
    pub fn apply(&mut self, overrides: &ConfigOverrides) -> Result<(), ConfigError> {
        if let Some(root) = &overrides.root {
            self.paths.root = Some(root.clone());
        }
        if let Some(binary) = &overrides.binary {
            self.paths.binary = binary.clone();
        }
        if let Some(frames) = overrides.frames {
            self.emulator.frames = frames;
        }
        if overrides.scale.is_some() {
            self.emulator.scale = overrides.scale;
        }
        if overrides.timeout_secs.is_some() {
            self.emulator.timeout_secs = overrides.timeout_secs;
        }
        if let Some(order) = overrides.order {
            self.discovery.order = order;
        }
        if overrides.quiet_emulator {
            self.emulator.stderr = StderrMode::Null;
        }
        self.validate()
    }

    /// Resolves corpus locations against `cwd`.
    #[must_use]
    pub fn resolve_paths(&self, cwd: &Path) -> ResolvedPaths {
        let root = self.paths.root.as_ref().map_or_else(|| cwd.to_path_buf(), |root| cwd.join(root));
        ResolvedPaths {
            tests_dir: root.join(&self.paths.tests_dir),
            binary: root.join(&self.paths.binary),
            root,
        }
    }

    /// Builds the run plan for `selected` suites (empty selects all).
    #[must_use]
    pub fn run_plan(&self, paths: &ResolvedPaths, selected: Vec<String>) -> RunPlan {
        RunPlan {
            tests_dir: paths.tests_dir.clone(),
            order: self.discovery.order,
            selected,
        }
    }

    /// Builds the emulator runner.
    #[must_use]
    pub fn runner(&self, paths: &ResolvedPaths) -> ProcessRunner {
        ProcessRunner::new(&paths.binary)
            .with_args(EmulatorArgs {
                frames: self.emulator.frames,
                scale: self.emulator.scale,
            })
            .with_stderr(self.emulator.stderr)
            .with_timeout(self.emulator.timeout_secs.map(Duration::from_secs))
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Picks the config file to load, if any.
#[must_use]
pub fn resolve_config_path(
    explicit: Option<&Path>,
    env_value: Option<&str>,
    search_dir: &Path,
) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    if let Some(value) = env_value {
        return Some(PathBuf::from(value));
    }
    let candidate = search_dir.join(DEFAULT_CONFIG_NAME);
    candidate.is_file().then_some(candidate)
}

/// Reads an environment variable and enforces UTF-8 validity.
///
/// # Errors
///
/// Returns [`ConfigError::Env`] when the value is not valid UTF-8.
pub fn read_env_strict(name: &str) -> Result<Option<String>, ConfigError> {
    std::env::var_os(name).map_or(Ok(None), |raw| {
        raw.into_string().map(Some).map_err(|_| ConfigError::Env(format!("{name} must be valid UTF-8")))
    })
}

/// Reads an environment variable and rejects empty values.
fn read_env_nonempty(name: &str) -> Result<Option<String>, ConfigError> {
    match read_env_strict(name)? {
        Some(value) if value.trim().is_empty() => {
            Err(ConfigError::Env(format!("{name} must not be empty")))
        }
        other => Ok(other),
    }
}

/// Reads `path` while enforcing [`MAX_CONFIG_FILE_BYTES`].
fn read_with_limit(path: &Path) -> Result<Vec<u8>, ConfigError> {
    let io_error = |err: std::io::Error| ConfigError::Io {
        path: path.to_path_buf(),
        error: err.to_string(),
    };
    let file = File::open(path).map_err(io_error)?;
    let limit = u64::try_from(MAX_CONFIG_FILE_BYTES).unwrap_or(u64::MAX);
    let mut bytes = Vec::new();
    file.take(limit.saturating_add(1)).read_to_end(&mut bytes).map_err(io_error)?;
    if bytes.len() > MAX_CONFIG_FILE_BYTES {
        return Err(ConfigError::TooLarge {
            path: path.to_path_buf(),
            limit: MAX_CONFIG_FILE_BYTES,
        });
    }
    Ok(bytes)
}

/// Default tests directory.
fn default_tests_dir() -> PathBuf {
    PathBuf::from(TESTS_DIR)
}

/// Default emulator path.
fn default_binary() -> PathBuf {
    PathBuf::from(DEFAULT_BINARY)
}

/// Default frame count.
const fn default_frames() -> u32 {
    DEFAULT_FRAMES
}
