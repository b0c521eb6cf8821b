//! Configuration module.
//!
//! [`loader`] resolves settings from defaults, the TOML config file,
//! environment variables and CLI flags. [`keybindings`] maps keys to actions.

pub mod keybindings;
pub mod loader;

pub use keybindings::KeyBindings;
pub use loader::{
    apply_cli_overrides, apply_env_overrides, load_config_with_precedence, merge_config,
    ConfigError, GridOverrides, ResolvedConfig,
};
