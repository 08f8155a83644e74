//! Configuration file loading with precedence handling.

use crate::layout::{params, LayoutParams, LayoutPolicy};
use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;
use tracing::warn;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "SHEETLINE_CONFIG";

/// Environment variable overriding the layout policy.
pub const POLICY_ENV: &str = "SHEETLINE_POLICY";

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

    /// A setting is out of range after all sources were merged.
    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue {
        /// Offending setting.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, hardcoded defaults are used.
/// Corresponds to `~/.config/sheetline/config.toml`:
///
/// ```toml
/// policy = "strong"
/// gap = 3
/// bottom_margin = 5
/// default_cell_height = 20
/// view_width = 1000.0
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Layout policy (`weak`, `strong` or `ordinal`).
    #[serde(default)]
    pub policy: Option<LayoutPolicy>,

    /// Vertical gap inserted for a jump in time.
    #[serde(default)]
    pub gap: Option<i32>,

    /// Space below the lowest interval.
    #[serde(default)]
    pub bottom_margin: Option<i32>,

    /// Ticks in one second.
    #[serde(default)]
    pub ticks_per_second: Option<i64>,

    /// Strong layout height for short recordings.
    #[serde(default)]
    pub min_scroll_pixels: Option<i32>,

    /// Strong layout height for long recordings.
    #[serde(default)]
    pub max_scroll_pixels: Option<i32>,

    /// Preferred height of an interval without an explicit one.
    #[serde(default)]
    pub default_cell_height: Option<i32>,

    /// Pixel width of the timeline viewport.
    #[serde(default)]
    pub view_width: Option<f64>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    /// Layout policy.
    pub policy: LayoutPolicy,
    /// Vertical gap for a jump in time.
    pub gap: i32,
    /// Space below the lowest interval.
    pub bottom_margin: i32,
    /// Ticks in one second.
    pub ticks_per_second: i64,
    /// Strong layout height for short recordings.
    pub min_scroll_pixels: i32,
    /// Strong layout height for long recordings.
    pub max_scroll_pixels: i32,
    /// Preferred height of an interval without an explicit one.
    pub default_cell_height: i32,
    /// Pixel width of the timeline viewport.
    pub view_width: f64,
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
}

/// Preferred interval height when nothing else is configured.
pub const DEFAULT_CELL_HEIGHT: i32 = 20;

/// Viewport width when nothing else is configured.
pub const DEFAULT_VIEW_WIDTH: f64 = 1000.0;

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            policy: LayoutPolicy::default(),
            gap: params::DEFAULT_GAP,
            bottom_margin: params::DEFAULT_BOTTOM_MARGIN,
            ticks_per_second: params::DEFAULT_TICKS_PER_SECOND,
            min_scroll_pixels: params::DEFAULT_MIN_SCROLL_PIXELS,
            max_scroll_pixels: params::DEFAULT_MAX_SCROLL_PIXELS,
            default_cell_height: DEFAULT_CELL_HEIGHT,
            view_width: DEFAULT_VIEW_WIDTH,
            log_file_path: default_log_path(),
        }
    }
}

impl ResolvedConfig {
    /// Layout constants described by this configuration.
    pub fn layout_params(&self) -> LayoutParams {
        LayoutParams {
            gap: self.gap,
            bottom_margin: self.bottom_margin,
            ticks_per_second: self.ticks_per_second,
            min_scroll_pixels: self.min_scroll_pixels,
            max_scroll_pixels: self.max_scroll_pixels,
        }
    }

    /// Reject settings the layout engine cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn invalid(field: &'static str, reason: impl Into<String>) -> Result<(), ConfigError> {
            Err(ConfigError::InvalidValue {
                field,
                reason: reason.into(),
            })
        }

        if self.ticks_per_second <= 0 {
            return invalid("ticks_per_second", format!("must be > 0 (got {})", self.ticks_per_second));
        }
        if self.gap < 0 {
            return invalid("gap", format!("must be >= 0 (got {})", self.gap));
        }
        if self.bottom_margin < 0 {
            return invalid("bottom_margin", format!("must be >= 0 (got {})", self.bottom_margin));
        }
        if self.default_cell_height < 0 {
            return invalid(
                "default_cell_height",
                format!("must be >= 0 (got {})", self.default_cell_height),
            );
        }
        if !self.view_width.is_finite() || self.view_width < 0.0 {
            return invalid("view_width", format!("must be a finite value >= 0 (got {})", self.view_width));
        }
        Ok(())
    }
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/sheetline/sheetline.log` on Unix-like systems,
/// or appropriate platform path on other systems.
///
/// If state directory cannot be determined, falls back to current directory.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("sheetline").join("sheetline.log")
    } else {
        PathBuf::from("sheetline.log")
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
/// Returns `~/.config/sheetline/config.toml` on Unix, appropriate path on other platforms.
/// Returns `None` if home directory cannot be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("sheetline").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `SHEETLINE_CONFIG` environment variable
/// 3. Default path `~/.config/sheetline/config.toml`
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

    if let Ok(env_path) = std::env::var(CONFIG_ENV) {
        return load_config_file(PathBuf::from(env_path));
    }

    if let Some(default_path) = default_config_path() {
        return load_config_file(default_path);
    }

    Ok(None)
}

/// Apply environment variable overrides to resolved config.
///
/// Checks `SHEETLINE_POLICY`. An unknown policy name is logged and ignored.
pub fn apply_env_overrides(mut config: ResolvedConfig) -> ResolvedConfig {
    if let Ok(value) = std::env::var(POLICY_ENV) {
        match value.parse::<LayoutPolicy>() {
            Ok(policy) => config.policy = policy,
            Err(err) => warn!(error = %err, "Ignoring {}", POLICY_ENV),
        }
    }

    config
}

/// Merge config file into defaults to create resolved config.
///
/// For each field in `ConfigFile`, if `Some(value)`, use it; otherwise use default.
pub fn merge_config(config_file: Option<ConfigFile>) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return defaults;
    };

    ResolvedConfig {
        policy: config.policy.unwrap_or(defaults.policy),
        gap: config.gap.unwrap_or(defaults.gap),
        bottom_margin: config.bottom_margin.unwrap_or(defaults.bottom_margin),
        ticks_per_second: config.ticks_per_second.unwrap_or(defaults.ticks_per_second),
        min_scroll_pixels: config.min_scroll_pixels.unwrap_or(defaults.min_scroll_pixels),
        max_scroll_pixels: config.max_scroll_pixels.unwrap_or(defaults.max_scroll_pixels),
        default_cell_height: config
            .default_cell_height
            .unwrap_or(defaults.default_cell_height),
        view_width: config.view_width.unwrap_or(defaults.view_width),
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
    }
}

/// Apply CLI argument overrides to resolved config.
///
/// CLI args have the highest precedence and override all other sources.
/// Only applies overrides for flags that were explicitly set by the user.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest)
pub fn apply_cli_overrides(
    mut config: ResolvedConfig,
    policy_override: Option<LayoutPolicy>,
    width_override: Option<f64>,
) -> ResolvedConfig {
    if let Some(policy) = policy_override {
        config.policy = policy;
    }

    if let Some(width) = width_override {
        config.view_width = width;
    }

    config
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
