//! Configuration file loading with precedence handling.

use crate::grid::LayoutConfig;
use crate::host::RemeasureConfig;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Environment variable naming an alternate config file.
pub const CONFIG_ENV_VAR: &str = "VGRID_CONFIG";

/// Environment variable overriding the log file path.
pub const LOG_ENV_VAR: &str = "VGRID_LOG";

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Config file path contains invalid UTF-8 or cannot be resolved.
    #[error("Invalid config path: {0}")]
    InvalidPath(String),

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
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, hardcoded defaults are used.
/// Corresponds to `~/.config/vgrid/config.toml`:
///
/// ```toml
/// log_file_path = "/tmp/vgrid.log"
///
/// [grid]
/// min_item_width = 40
/// max_columns = 4
/// gap = 1
///
/// [remeasure]
/// frames = 2
/// delay_ms = 120
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,

    /// Grid layout section.
    #[serde(default)]
    pub grid: Option<GridSection>,

    /// Remeasure trigger section.
    #[serde(default)]
    pub remeasure: Option<RemeasureSection>,
}

/// `[grid]` section: layout parameters in terminal cells.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct GridSection {
    /// Minimum card width.
    #[serde(default)]
    pub min_item_width: Option<usize>,
    /// Lower bound on the column count.
    #[serde(default)]
    pub min_columns: Option<usize>,
    /// Upper bound on the column count.
    #[serde(default)]
    pub max_columns: Option<usize>,
    /// Spacing between cards, both axes.
    #[serde(default)]
    pub gap: Option<usize>,
    /// Extra rows mounted above and below the viewport.
    #[serde(default)]
    pub overscan: Option<usize>,
    /// Height assumed for rows not yet measured.
    #[serde(default)]
    pub estimate_row_height: Option<usize>,
}

/// `[remeasure]` section.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RemeasureSection {
    /// Consecutive frames to remeasure on after a layout change.
    #[serde(default)]
    pub frames: Option<usize>,
    /// Delay of the late remeasure, in milliseconds.
    #[serde(default)]
    pub delay_ms: Option<u64>,
}

/// Layout defaults for the terminal host, in cells.
pub fn terminal_layout() -> LayoutConfig {
    LayoutConfig {
        min_item_width: 32,
        min_columns: 1,
        max_columns: None,
        gap: 1,
        overscan: 2,
        estimate_row_height: 6,
    }
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
/// The layout is not validated here; the grid rejects invalid values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// Grid layout parameters.
    pub layout: LayoutConfig,
    /// Remeasure trigger tuning.
    pub remeasure: RemeasureConfig,
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            layout: terminal_layout(),
            remeasure: RemeasureConfig::default(),
            log_file_path: default_log_path(),
        }
    }
}

/// Grid overrides taken from the command line. `None` leaves a value alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GridOverrides {
    /// `--min-item-width`
    pub min_item_width: Option<usize>,
    /// `--max-columns`
    pub max_columns: Option<usize>,
    /// `--gap`
    pub gap: Option<usize>,
    /// `--overscan`
    pub overscan: Option<usize>,
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/vgrid/vgrid.log` on Unix-like systems,
/// or appropriate platform path on other systems.
///
/// If state directory cannot be determined, falls back to current directory.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("vgrid").join("vgrid.log")
    } else {
        PathBuf::from("vgrid.log")
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

    // Missing file is not an error - use defaults
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
/// Returns `~/.config/vgrid/config.toml` on Unix, appropriate path on other platforms.
/// Returns `None` if home directory cannot be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("vgrid").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `VGRID_CONFIG` environment variable
/// 3. Default path `~/.config/vgrid/config.toml`
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
        if env_path.is_empty() {
            return Err(ConfigError::InvalidPath(format!("{CONFIG_ENV_VAR} is empty")));
        }
        return load_config_file(PathBuf::from(env_path));
    }

    if let Some(default_path) = default_config_path() {
        return load_config_file(default_path);
    }

    Ok(None)
}

/// Apply environment variable overrides to resolved config.
///
/// Checks for:
/// - `VGRID_LOG`: Override log file path
pub fn apply_env_overrides(mut config: ResolvedConfig) -> ResolvedConfig {
    if let Ok(path) = std::env::var(LOG_ENV_VAR) {
        if !path.is_empty() {
            config.log_file_path = PathBuf::from(path);
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

    let grid = config.grid.unwrap_or_default();
    let base = defaults.layout;
    let layout = LayoutConfig {
        min_item_width: grid.min_item_width.unwrap_or(base.min_item_width),
        min_columns: grid.min_columns.unwrap_or(base.min_columns),
        max_columns: grid.max_columns.or(base.max_columns),
        gap: grid.gap.unwrap_or(base.gap),
        overscan: grid.overscan.unwrap_or(base.overscan),
        estimate_row_height: grid
            .estimate_row_height
            .unwrap_or(base.estimate_row_height),
    };

    let remeasure = config.remeasure.unwrap_or_default();
    let remeasure = RemeasureConfig {
        frames: remeasure.frames.unwrap_or(defaults.remeasure.frames),
        delay: remeasure
            .delay_ms
            .map(Duration::from_millis)
            .unwrap_or(defaults.remeasure.delay),
    };

    ResolvedConfig {
        layout,
        remeasure,
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
    }
}

/// Apply CLI argument overrides to resolved config.
///
/// CLI args have the highest precedence and override all other sources.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest)
pub fn apply_cli_overrides(mut config: ResolvedConfig, overrides: GridOverrides) -> ResolvedConfig {
    if let Some(width) = overrides.min_item_width {
        config.layout.min_item_width = width;
    }

    if let Some(max) = overrides.max_columns {
        config.layout.max_columns = Some(max);
    }

    if let Some(gap) = overrides.gap {
        config.layout.gap = gap;
    }

    if let Some(overscan) = overrides.overscan {
        config.layout.overscan = overscan;
    }

    config
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
