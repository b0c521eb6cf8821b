//! Tests for configuration file loading.

use super::*;
use serial_test::serial;
use std::env;
use std::fs;

#[test]
fn default_config_path_contains_vgrid_config_toml() {
    let path = default_config_path().expect("Should have default path");
    let path_str = path.to_string_lossy();
    assert!(
        path_str.contains("vgrid") && path_str.ends_with("config.toml"),
        "Path should contain 'vgrid' and end with 'config.toml', got: {}",
        path_str
    );
}

#[test]
fn default_log_path_ends_with_vgrid_log() {
    let path = default_log_path();
    assert!(
        path.to_string_lossy().ends_with("vgrid.log"),
        "Default log path should end with 'vgrid.log', got: {:?}",
        path
    );
}

#[test]
fn load_config_file_returns_ok_none_for_missing_file() {
    let result = load_config_file("/nonexistent/path/to/config.toml");
    assert_eq!(
        result,
        Ok(None),
        "Missing config file should return Ok(None), not an error"
    );
}

#[test]
fn load_config_file_parses_valid_toml() {
    let config_path = env::temp_dir().join("vgrid_test_config.toml");

    let toml_content = r#"
log_file_path = "/tmp/vgrid-test.log"

[grid]
min_item_width = 40
max_columns = 4
gap = 2
overscan = 3
estimate_row_height = 8

[remeasure]
frames = 3
delay_ms = 250
"#;

    fs::write(&config_path, toml_content).expect("Failed to write test config");

    let config = load_config_file(&config_path)
        .expect("Should successfully parse valid TOML")
        .expect("Should return Some(ConfigFile) for existing file");

    assert_eq!(config.log_file_path, Some(PathBuf::from("/tmp/vgrid-test.log")));
    let grid = config.grid.expect("grid section");
    assert_eq!(grid.min_item_width, Some(40));
    assert_eq!(grid.max_columns, Some(4));
    assert_eq!(grid.gap, Some(2));
    assert_eq!(grid.overscan, Some(3));
    assert_eq!(grid.estimate_row_height, Some(8));
    assert_eq!(grid.min_columns, None);
    let remeasure = config.remeasure.expect("remeasure section");
    assert_eq!(remeasure.frames, Some(3));
    assert_eq!(remeasure.delay_ms, Some(250));

    fs::remove_file(config_path).ok();
}

#[test]
fn load_config_file_returns_error_for_invalid_toml() {
    let config_path = env::temp_dir().join("vgrid_test_invalid.toml");
    fs::write(&config_path, "this is not valid TOML ][}{").expect("Failed to write invalid config");

    let result = load_config_file(&config_path);
    match result {
        Err(ConfigError::ParseError { path, reason: _ }) => {
            assert_eq!(path, config_path);
        }
        _ => panic!("Expected ParseError, got {:?}", result),
    }

    fs::remove_file(config_path).ok();
}

#[test]
fn config_file_rejects_unknown_fields() {
    let result: Result<ConfigFile, _> = toml::from_str("theme = \"dark\"\n");
    assert!(result.is_err(), "Unknown top-level key should be rejected");

    let result: Result<ConfigFile, _> = toml::from_str("[grid]\ncolumns = 3\n");
    assert!(result.is_err(), "Unknown grid key should be rejected");
}

#[test]
fn merge_config_uses_defaults_when_none() {
    assert_eq!(merge_config(None), ResolvedConfig::default());
}

#[test]
fn resolved_config_default_uses_terminal_layout() {
    let config = ResolvedConfig::default();
    assert_eq!(config.layout.min_item_width, 32);
    assert_eq!(config.layout.gap, 1);
    assert_eq!(config.layout.overscan, 2);
    assert_eq!(config.layout.estimate_row_height, 6);
    assert_eq!(config.layout.max_columns, None);
    assert!(config.layout.validate().is_ok());
    assert_eq!(config.remeasure, RemeasureConfig::default());
}

#[test]
fn merge_config_partial_grid_section_keeps_other_defaults() {
    let config_file = ConfigFile {
        log_file_path: None,
        grid: Some(GridSection {
            max_columns: Some(3),
            ..GridSection::default()
        }),
        remeasure: Some(RemeasureSection {
            delay_ms: Some(50),
            ..RemeasureSection::default()
        }),
    };

    let resolved = merge_config(Some(config_file));
    let defaults = ResolvedConfig::default();
    assert_eq!(resolved.layout.max_columns, Some(3));
    assert_eq!(resolved.layout.min_item_width, defaults.layout.min_item_width);
    assert_eq!(resolved.layout.gap, defaults.layout.gap);
    assert_eq!(resolved.remeasure.delay, Duration::from_millis(50));
    assert_eq!(resolved.remeasure.frames, defaults.remeasure.frames);
    assert_eq!(resolved.log_file_path, defaults.log_file_path);
}

#[test]
fn config_file_log_path_overrides_default() {
    let custom_path = PathBuf::from("/custom/path/to/app.log");
    let config_file = ConfigFile {
        log_file_path: Some(custom_path.clone()),
        grid: None,
        remeasure: None,
    };

    let resolved = merge_config(Some(config_file));
    assert_eq!(resolved.log_file_path, custom_path);
}

/// RAII guard to ensure environment variable cleanup even under test parallelism.
struct EnvGuard(&'static str);

impl EnvGuard {
    fn new(name: &'static str) -> Self {
        env::remove_var(name);
        EnvGuard(name)
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        env::remove_var(self.0);
    }
}

#[test]
#[serial(vgrid_log)]
fn apply_env_overrides_respects_vgrid_log() {
    let _guard = EnvGuard::new(LOG_ENV_VAR);
    env::set_var(LOG_ENV_VAR, "/tmp/from-env.log");

    let result = apply_env_overrides(ResolvedConfig::default());
    assert_eq!(result.log_file_path, PathBuf::from("/tmp/from-env.log"));
}

#[test]
#[serial(vgrid_log)]
fn apply_env_overrides_no_change_when_env_var_not_set() {
    let _guard = EnvGuard::new(LOG_ENV_VAR);

    let base = ResolvedConfig::default();
    assert_eq!(apply_env_overrides(base.clone()), base);
}

#[test]
#[serial(vgrid_config)]
fn load_config_with_precedence_prefers_explicit_path() {
    let _guard = EnvGuard::new(CONFIG_ENV_VAR);
    let temp_dir = env::temp_dir();

    let explicit_path = temp_dir.join("vgrid_explicit.toml");
    fs::write(&explicit_path, "[grid]\ngap = 7\n").expect("Failed to write explicit config");

    let env_path = temp_dir.join("vgrid_env.toml");
    fs::write(&env_path, "[grid]\ngap = 9\n").expect("Failed to write env config");
    env::set_var(CONFIG_ENV_VAR, env_path.to_str().expect("utf-8 temp path"));

    let config = load_config_with_precedence(Some(explicit_path.clone()))
        .expect("load")
        .expect("explicit config present");
    assert_eq!(
        config.grid.and_then(|g| g.gap),
        Some(7),
        "Should use explicit path, not VGRID_CONFIG env var"
    );

    fs::remove_file(explicit_path).ok();
    fs::remove_file(env_path).ok();
}

#[test]
#[serial(vgrid_config)]
fn load_config_with_precedence_uses_env_var_when_no_explicit_path() {
    let _guard = EnvGuard::new(CONFIG_ENV_VAR);
    let env_path = env::temp_dir().join("vgrid_env_only.toml");
    fs::write(&env_path, "[grid]\noverscan = 5\n").expect("Failed to write env config");
    env::set_var(CONFIG_ENV_VAR, env_path.to_str().expect("utf-8 temp path"));

    let config = load_config_with_precedence(None)
        .expect("load")
        .expect("env config present");
    assert_eq!(config.grid.and_then(|g| g.overscan), Some(5));

    fs::remove_file(env_path).ok();
}

#[test]
#[serial(vgrid_config)]
fn load_config_with_precedence_rejects_empty_env_var() {
    let _guard = EnvGuard::new(CONFIG_ENV_VAR);
    env::set_var(CONFIG_ENV_VAR, "");

    assert!(matches!(
        load_config_with_precedence(None),
        Err(ConfigError::InvalidPath(_))
    ));
}

#[test]
fn apply_cli_overrides_no_overrides() {
    let base = ResolvedConfig::default();
    assert_eq!(apply_cli_overrides(base.clone(), GridOverrides::default()), base);
}

#[test]
fn apply_cli_overrides_sets_only_given_fields() {
    let overrides = GridOverrides {
        min_item_width: Some(50),
        max_columns: Some(2),
        gap: None,
        overscan: Some(0),
    };
    let result = apply_cli_overrides(ResolvedConfig::default(), overrides);

    assert_eq!(result.layout.min_item_width, 50);
    assert_eq!(result.layout.max_columns, Some(2));
    assert_eq!(result.layout.gap, terminal_layout().gap);
    assert_eq!(result.layout.overscan, 0);
}

#[test]
#[serial(vgrid_log)]
fn precedence_chain_full_defaults_to_cli() {
    let _guard = EnvGuard::new(LOG_ENV_VAR);

    let config_file = ConfigFile {
        log_file_path: Some(PathBuf::from("/from/file.log")),
        grid: Some(GridSection {
            min_item_width: Some(20),
            gap: Some(3),
            ..GridSection::default()
        }),
        remeasure: None,
    };
    env::set_var(LOG_ENV_VAR, "/from/env.log");

    let resolved = merge_config(Some(config_file));
    let resolved = apply_env_overrides(resolved);
    let resolved = apply_cli_overrides(
        resolved,
        GridOverrides {
            min_item_width: Some(60),
            ..GridOverrides::default()
        },
    );

    assert_eq!(resolved.log_file_path, PathBuf::from("/from/env.log"));
    assert_eq!(resolved.layout.min_item_width, 60, "CLI beats file");
    assert_eq!(resolved.layout.gap, 3, "file beats defaults");
    assert_eq!(resolved.layout.overscan, terminal_layout().overscan);
}
