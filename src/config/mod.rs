//! Configuration module.
//!
//! Precedence: defaults → TOML file → environment → CLI flags.

pub mod loader;

pub use loader::{
    apply_cli_overrides, apply_env_overrides, load_config_with_precedence, merge_config,
    ConfigError, ConfigFile, ResolvedConfig,
};

use std::path::PathBuf;

/// Resolve the full configuration from every source.
///
/// # Errors
///
/// Returns error if a config file exists but cannot be read or parsed, or if
/// the merged settings are out of range.
pub fn resolve(
    config_path: Option<PathBuf>,
    policy_override: Option<crate::layout::LayoutPolicy>,
    width_override: Option<f64>,
) -> Result<ResolvedConfig, ConfigError> {
    let file = load_config_with_precedence(config_path)?;
    let config = apply_env_overrides(merge_config(file));
    let config = apply_cli_overrides(config, policy_override, width_override);
    config.validate()?;
    Ok(config)
}
