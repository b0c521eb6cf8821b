//! Card grid styling.

use ratatui::style::{Color, Modifier, Style};

// ===== ColorConfig =====

/// Configuration for color output.
///
/// Determines whether colors should be enabled or disabled based on:
/// - `--no-color` CLI flag
/// - `NO_COLOR` environment variable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorConfig {
    enabled: bool,
}

impl ColorConfig {
    /// Create a ColorConfig from CLI args and environment.
    ///
    /// Priority (first match wins):
    /// 1. `--no-color` flag (disables colors)
    /// 2. `NO_COLOR` env var (any value disables colors)
    /// 3. Default: colors enabled
    pub fn from_env_and_args(no_color_flag: bool) -> Self {
        let enabled = !no_color_flag && std::env::var_os("NO_COLOR").is_none();
        Self { enabled }
    }

    /// Colors explicitly on or off.
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Check if colors are enabled.
    pub fn colors_enabled(self) -> bool {
        self.enabled
    }
}

// ===== CardStyles =====

/// Styles of the card grid and status bar.
///
/// Without colors, selection and errors are still distinguishable through
/// modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardStyles {
    /// Card title in the top border.
    pub title: Style,
    /// Field names.
    pub field_key: Style,
    /// Field values.
    pub field_value: Style,
    /// Border of an ordinary card.
    pub border: Style,
    /// Border of the selected card.
    pub selected_border: Style,
    /// Border and text of a malformed-record card.
    pub error: Style,
    /// Status bar background.
    pub status: Style,
    /// LIVE marker while input is streaming.
    pub live: Style,
}

impl CardStyles {
    /// Styles for the given color configuration.
    pub fn with_color_config(config: ColorConfig) -> Self {
        if config.colors_enabled() {
            Self {
                title: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                field_key: Style::default().fg(Color::DarkGray),
                field_value: Style::default(),
                border: Style::default().fg(Color::Gray),
                selected_border: Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                error: Style::default().fg(Color::Red),
                status: Style::default().fg(Color::Black).bg(Color::Gray),
                live: Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            }
        } else {
            Self {
                title: Style::default().add_modifier(Modifier::BOLD),
                field_key: Style::default(),
                field_value: Style::default(),
                border: Style::default(),
                selected_border: Style::default().add_modifier(Modifier::REVERSED),
                error: Style::default().add_modifier(Modifier::ITALIC),
                status: Style::default().add_modifier(Modifier::REVERSED),
                live: Style::default().add_modifier(Modifier::BOLD),
            }
        }
    }
}

impl Default for CardStyles {
    fn default() -> Self {
        Self::with_color_config(ColorConfig::from_env_and_args(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial(no_color)]
    fn color_config_respects_no_color_flag() {
        let config = ColorConfig::from_env_and_args(true);
        assert!(!config.colors_enabled(), "--no-color flag should disable colors");
    }

    #[test]
    #[serial(no_color)]
    fn color_config_no_color_env_any_value_disables() {
        std::env::set_var("NO_COLOR", "");
        let config = ColorConfig::from_env_and_args(false);
        std::env::remove_var("NO_COLOR");
        assert!(!config.colors_enabled(), "NO_COLOR with empty string should disable colors");
    }

    #[test]
    #[serial(no_color)]
    fn color_config_enables_colors_by_default() {
        std::env::remove_var("NO_COLOR");
        assert!(ColorConfig::from_env_and_args(false).colors_enabled());
    }

    #[test]
    fn selected_border_differs_from_plain_border_without_colors() {
        let styles = CardStyles::with_color_config(ColorConfig::new(false));
        assert_ne!(styles.border, styles.selected_border);
        assert_ne!(styles.field_value, styles.error);
    }

    #[test]
    fn colored_styles_use_distinct_error_color() {
        let styles = CardStyles::with_color_config(ColorConfig::new(true));
        assert_eq!(styles.error.fg, Some(Color::Red));
    }
}
