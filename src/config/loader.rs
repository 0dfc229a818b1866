//! Configuration file loading with precedence handling.

use crate::import::encoding::DEFAULT_SAMPLE_BYTES;
use crate::text::{ChapterIndexer, DEFAULT_CHAPTER_PATTERN};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "TXTREADER_CONFIG";

/// Environment variable overriding the library directory.
pub const LIBRARY_DIR_ENV: &str = "TXTREADER_LIBRARY_DIR";

/// Default debounce window for position writes, in milliseconds.
pub const DEFAULT_DEBOUNCE_MS: u64 = 200;

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Failed to read config file (permissions, not a file, ...).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML or unknown keys.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },

    /// `chapter_pattern` is not a valid regular expression.
    #[error("Invalid chapter pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The rejected pattern.
        pattern: String,
        /// Regex compiler message.
        reason: String,
    },
}

/// TOML configuration file structure.
///
/// All fields are optional; missing ones fall back to defaults.
/// Corresponds to `~/.config/txtreader/config.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Where the catalog and normalized artifacts live.
    #[serde(default)]
    pub library_dir: Option<PathBuf>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,

    /// Debounce window for position writes.
    #[serde(default)]
    pub position_debounce_ms: Option<u64>,

    /// Leading bytes sampled for charset detection.
    #[serde(default)]
    pub detection_sample_bytes: Option<usize>,

    /// Regular expression matching chapter headings.
    #[serde(default)]
    pub chapter_pattern: Option<String>,
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// Library directory.
    pub library_dir: PathBuf,
    /// Path to log file.
    pub log_file_path: PathBuf,
    /// Debounce window in milliseconds.
    pub position_debounce_ms: u64,
    /// Detection sample size in bytes.
    pub detection_sample_bytes: usize,
    /// Chapter heading pattern.
    pub chapter_pattern: String,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            library_dir: default_library_dir(),
            log_file_path: default_log_path(),
            position_debounce_ms: DEFAULT_DEBOUNCE_MS,
            detection_sample_bytes: DEFAULT_SAMPLE_BYTES,
            chapter_pattern: DEFAULT_CHAPTER_PATTERN.to_string(),
        }
    }
}

impl ResolvedConfig {
    /// Debounce window as a [`Duration`].
    pub fn position_debounce(&self) -> Duration {
        Duration::from_millis(self.position_debounce_ms)
    }

    /// Compile the configured heading pattern.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPattern`] if the pattern does not compile.
    pub fn chapter_indexer(&self) -> Result<ChapterIndexer, ConfigError> {
        ChapterIndexer::new(&self.chapter_pattern).map_err(|e| ConfigError::InvalidPattern {
            pattern: self.chapter_pattern.clone(),
            reason: e.to_string(),
        })
    }

    /// Location of the catalog file.
    pub fn catalog_path(&self) -> PathBuf {
        self.library_dir.join("catalog.json")
    }

    /// Directory holding normalized book artifacts.
    pub fn artifact_dir(&self) -> PathBuf {
        self.library_dir.join("books")
    }
}

/// Resolve default library directory.
///
/// Returns `~/.local/share/txtreader` on Linux, the platform data directory
/// elsewhere, or `./txtreader` when none can be determined.
pub fn default_library_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("txtreader"))
        .unwrap_or_else(|| PathBuf::from("txtreader"))
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/txtreader/txtreader.log` on Unix-like systems,
/// falling back to the current directory.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("txtreader").join("txtreader.log")
    } else {
        PathBuf::from("txtreader.log")
    }
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if file doesn't exist (not an error - use defaults).
///
/// # Errors
///
/// Returns error if file exists but has read or parse errors.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some(config))
}

/// Resolve default config file path (`~/.config/txtreader/config.toml`).
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("txtreader").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `TXTREADER_CONFIG` environment variable
/// 3. Default path `~/.config/txtreader/config.toml`
///
/// # Errors
///
/// Returns error only if a config file exists but cannot be read or parsed.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Ok(env_path) = std::env::var(CONFIG_ENV) {
        return load_config_file(PathBuf::from(env_path));
    }

    if let Some(default_path) = default_config_path() {
        return load_config_file(default_path);
    }

    Ok(None)
}

/// Apply environment variable overrides (`TXTREADER_LIBRARY_DIR`).
pub fn apply_env_overrides(mut config: ResolvedConfig) -> ResolvedConfig {
    if let Some(dir) = std::env::var_os(LIBRARY_DIR_ENV).filter(|v| !v.is_empty()) {
        config.library_dir = PathBuf::from(dir);
    }

    config
}

/// Merge config file into defaults to create resolved config.
pub fn merge_config(config_file: Option<ConfigFile>) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return defaults;
    };

    ResolvedConfig {
        library_dir: config.library_dir.unwrap_or(defaults.library_dir),
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
        position_debounce_ms: config
            .position_debounce_ms
            .unwrap_or(defaults.position_debounce_ms),
        detection_sample_bytes: config
            .detection_sample_bytes
            .unwrap_or(defaults.detection_sample_bytes),
        chapter_pattern: config.chapter_pattern.unwrap_or(defaults.chapter_pattern),
    }
}

/// Apply CLI argument overrides to resolved config.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest)
pub fn apply_cli_overrides(
    mut config: ResolvedConfig,
    library_dir_override: Option<PathBuf>,
) -> ResolvedConfig {
    if let Some(dir) = library_dir_override {
        config.library_dir = dir;
    }

    config
}

/// Run the full precedence chain.
///
/// # Errors
///
/// Propagates [`load_config_with_precedence`] failures.
pub fn resolve_config(
    config_path: Option<PathBuf>,
    library_dir_override: Option<PathBuf>,
) -> Result<ResolvedConfig, ConfigError> {
    let file = load_config_with_precedence(config_path)?;
    let config = apply_env_overrides(merge_config(file));
    Ok(apply_cli_overrides(config, library_dir_override))
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
