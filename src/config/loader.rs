//! Configuration file loading with precedence handling.

use super::manifest::{builtin_manifests, ManifestPreset};
use crate::ledger::{
    LedgerSettings, PreviousRangeSearch, SplitTailLength, DEFAULT_MARGIN_TOP, DEFAULT_ROW_HEIGHT,
};
use crate::viewer::{ViewerSettings, DEFAULT_MARGIN_LEFT, DEFAULT_REGION_WIDTH};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use thiserror::Error;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "ROWLEDGER_CONFIG";

/// Environment variable selecting a manifest preset.
pub const MANIFEST_ENV_VAR: &str = "ROWLEDGER_MANIFEST";

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Failed to read config file (file may not exist or have permission issues).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML syntax.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },

    /// Selected manifest is neither built in nor defined in the config file.
    #[error("Unknown manifest: {0}")]
    UnknownManifest(String),
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, hardcoded defaults are used.
/// Corresponds to `~/.config/rowledger/config.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Initial per-row height in page pixels.
    #[serde(default)]
    pub default_height: Option<f64>,

    /// Offset of the top of row 0.
    #[serde(default)]
    pub margin_top: Option<f64>,

    /// Left edge of the requested viewer region.
    #[serde(default)]
    pub margin_left: Option<f64>,

    /// Width of the requested viewer region.
    #[serde(default)]
    pub region_width: Option<f64>,

    /// Manifest preset to start with.
    #[serde(default)]
    pub manifest: Option<String>,

    /// Previous-range search used by gap corrections.
    #[serde(default)]
    pub previous_range_search: Option<PreviousRangeSearch>,

    /// Tail length rule used when a correction splits a range.
    #[serde(default)]
    pub split_tail_length: Option<SplitTailLength>,

    /// Default tracing filter when `RUST_LOG` is unset.
    #[serde(default)]
    pub log_level: Option<String>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,

    /// Additional manifest presets (`[manifests.<name>]`).
    #[serde(default)]
    pub manifests: Option<HashMap<String, ManifestPreset>>,
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    /// Initial per-row height.
    pub default_height: f64,
    /// Offset of the top of row 0.
    pub margin_top: f64,
    /// Left edge of the viewer region.
    pub margin_left: f64,
    /// Width of the viewer region.
    pub region_width: f64,
    /// Selected manifest, if any.
    pub manifest: Option<String>,
    /// Previous-range search.
    pub previous_range_search: PreviousRangeSearch,
    /// Split tail length rule.
    pub split_tail_length: SplitTailLength,
    /// Default tracing filter.
    pub log_level: String,
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
    /// Known manifest presets (built-in plus config file).
    pub manifests: BTreeMap<String, ManifestPreset>,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            default_height: DEFAULT_ROW_HEIGHT,
            margin_top: DEFAULT_MARGIN_TOP,
            margin_left: DEFAULT_MARGIN_LEFT,
            region_width: DEFAULT_REGION_WIDTH,
            manifest: None,
            previous_range_search: PreviousRangeSearch::default(),
            split_tail_length: SplitTailLength::default(),
            log_level: "info".to_string(),
            log_file_path: default_log_path(),
            manifests: builtin_manifests(),
        }
    }
}

impl ResolvedConfig {
    /// Settings for a fresh ledger.
    pub fn ledger_settings(&self) -> LedgerSettings {
        LedgerSettings {
            default_height: self.default_height,
            margin_top: self.margin_top,
            previous_range_search: self.previous_range_search,
            split_tail_length: self.split_tail_length,
        }
    }

    /// Geometry for viewer regions.
    pub fn viewer_settings(&self) -> ViewerSettings {
        ViewerSettings {
            margin_left: self.margin_left,
            region_width: self.region_width,
        }
    }
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/rowledger/rowledger.log` on Unix-like systems,
/// or appropriate platform path on other systems.
///
/// If state directory cannot be determined, falls back to current directory.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("rowledger").join("rowledger.log")
    } else {
        PathBuf::from("rowledger.log")
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

/// Resolve default config file path.
///
/// Returns `~/.config/rowledger/config.toml` on Unix, appropriate path on other platforms.
/// Returns `None` if home directory cannot be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("rowledger").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `ROWLEDGER_CONFIG` environment variable
/// 3. Default path `~/.config/rowledger/config.toml`
///
/// Missing config files are NOT errors - defaults are used.
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

    if let Ok(env_path) = std::env::var(CONFIG_ENV_VAR) {
        return load_config_file(PathBuf::from(env_path));
    }

    if let Some(default_path) = default_config_path() {
        return load_config_file(default_path);
    }

    Ok(None)
}

/// Switch the config to a manifest preset.
///
/// Overwrites `default_height`, `margin_top` and `region_width` with the
/// preset's geometry.
///
/// # Errors
///
/// Returns `ConfigError::UnknownManifest` if no preset has that name.
pub fn select_manifest(
    mut config: ResolvedConfig,
    name: &str,
) -> Result<ResolvedConfig, ConfigError> {
    let preset = config
        .manifests
        .get(name)
        .ok_or_else(|| ConfigError::UnknownManifest(name.to_string()))?;

    config.default_height = preset.default_height;
    config.margin_top = preset.margin_top;
    config.region_width = preset.width;
    config.manifest = Some(name.to_string());

    Ok(config)
}

/// Merge config file into defaults to create resolved config.
///
/// For each field in `ConfigFile`, if `Some(value)`, use it; otherwise use default.
/// File-defined manifests are added to (and may replace) the built-in ones.
/// A selected manifest's geometry wins over the file's own sizes.
///
/// # Errors
///
/// Returns `ConfigError::UnknownManifest` if the file selects a manifest that
/// does not exist.
pub fn merge_config(config_file: Option<ConfigFile>) -> Result<ResolvedConfig, ConfigError> {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return Ok(defaults);
    };

    let mut manifests = defaults.manifests;
    manifests.extend(config.manifests.unwrap_or_default());

    let merged = ResolvedConfig {
        default_height: config.default_height.unwrap_or(defaults.default_height),
        margin_top: config.margin_top.unwrap_or(defaults.margin_top),
        margin_left: config.margin_left.unwrap_or(defaults.margin_left),
        region_width: config.region_width.unwrap_or(defaults.region_width),
        manifest: None,
        previous_range_search: config
            .previous_range_search
            .unwrap_or(defaults.previous_range_search),
        split_tail_length: config
            .split_tail_length
            .unwrap_or(defaults.split_tail_length),
        log_level: config.log_level.unwrap_or(defaults.log_level),
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
        manifests,
    };

    match config.manifest {
        Some(name) => select_manifest(merged, &name),
        None => Ok(merged),
    }
}

/// Apply environment variable overrides to resolved config.
///
/// Checks for:
/// - `ROWLEDGER_MANIFEST`: select a manifest preset
///
/// # Errors
///
/// Returns `ConfigError::UnknownManifest` if the variable names an unknown preset.
pub fn apply_env_overrides(config: ResolvedConfig) -> Result<ResolvedConfig, ConfigError> {
    match std::env::var(MANIFEST_ENV_VAR) {
        Ok(name) if !name.is_empty() => select_manifest(config, &name),
        _ => Ok(config),
    }
}

/// Overrides supplied on the command line.
///
/// Only flags the user actually passed are `Some`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliOverrides {
    /// `--manifest`
    pub manifest: Option<String>,
    /// `--default-height`
    pub default_height: Option<f64>,
    /// `--margin-top`
    pub margin_top: Option<f64>,
}

/// Apply CLI argument overrides to resolved config.
///
/// CLI args have the highest precedence and override all other sources.
/// The manifest is applied first so explicit sizes win over its geometry.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest)
///
/// # Errors
///
/// Returns `ConfigError::UnknownManifest` for an unknown `--manifest`.
pub fn apply_cli_overrides(
    config: ResolvedConfig,
    overrides: CliOverrides,
) -> Result<ResolvedConfig, ConfigError> {
    let mut config = match overrides.manifest {
        Some(name) => select_manifest(config, &name)?,
        None => config,
    };

    if let Some(height) = overrides.default_height {
        config.default_height = height;
    }

    if let Some(margin) = overrides.margin_top {
        config.margin_top = margin;
    }

    Ok(config)
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
