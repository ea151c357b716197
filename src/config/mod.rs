//! Configuration module.
//!
//! Defaults → config file → environment → CLI arguments, resolved into a
//! [`ResolvedConfig`] that hands out ledger and viewer settings.

pub mod loader;
pub mod manifest;

pub use loader::{
    apply_cli_overrides, apply_env_overrides, default_config_path, default_log_path,
    load_config_file, load_config_with_precedence, merge_config, select_manifest, CliOverrides,
    ConfigError, ConfigFile, ResolvedConfig,
};
pub use manifest::{builtin_manifests, ManifestPreset};
