use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::engine::StepPolicy;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub scroll: ScrollConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub keymap: KeymapConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Data directory path (log file lives here)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

/// Knobs consumed by the scroll engine and the input normalization layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrollConfig {
    /// Wheel direction: 1 = normal, -1 = reverse
    #[serde(default = "default_wheel_direction")]
    pub wheel_direction: i32,
    /// Step divisor for wheel scrolling (1-20, larger = slower and smoother)
    #[serde(default = "default_divisor")]
    pub wheel_divisor: u32,
    /// Wheel step multiplier without modifiers (1-10)
    #[serde(default = "default_normal_multiplier")]
    pub normal_multiplier: u32,
    /// Wheel step multiplier while Alt is held (1-10)
    #[serde(default = "default_speed_multiplier")]
    pub speed_multiplier: u32,
    /// Step divisor for page/line commands (1-20)
    #[serde(default = "default_divisor")]
    pub command_divisor: u32,
    /// Distance multiplier for page/line commands (1-10)
    #[serde(default = "default_command_multiplier")]
    pub command_multiplier: u32,
    /// Number of lines moved by the line scroll commands
    #[serde(default = "default_line_count")]
    pub line_count: u32,
    /// Per-frame cap of page commands, percent of the distance (1-10)
    #[serde(default = "default_factor")]
    pub page_factor: u32,
    /// Per-frame cap of line commands, percent of the distance (1-10)
    #[serde(default = "default_factor")]
    pub line_factor: u32,
    /// Step size policy: "divided" or "capped"
    #[serde(default)]
    pub step_policy: StepPolicy,
    /// Fallback per-frame cap for the capped policy (0 = none)
    #[serde(default)]
    pub max_step: f64,
    /// Add `divisor - 1` to pending distance when a merge reverses direction
    #[serde(default = "default_true")]
    pub sign_flip_bonus: bool,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            wheel_direction: default_wheel_direction(),
            wheel_divisor: default_divisor(),
            normal_multiplier: default_normal_multiplier(),
            speed_multiplier: default_speed_multiplier(),
            command_divisor: default_divisor(),
            command_multiplier: default_command_multiplier(),
            line_count: default_line_count(),
            page_factor: default_factor(),
            line_factor: default_factor(),
            step_policy: StepPolicy::default(),
            max_step: 0.0,
            sign_flip_bonus: default_true(),
        }
    }
}

impl ScrollConfig {
    /// Check every knob against its allowed range
    pub fn validate(&self) -> crate::Result<()> {
        if self.wheel_direction != 1 && self.wheel_direction != -1 {
            return Err(crate::Error::Config(format!(
                "scroll.wheel_direction must be 1 or -1, got {}",
                self.wheel_direction
            )));
        }
        check_range("scroll.wheel_divisor", self.wheel_divisor, 1, 20)?;
        check_range("scroll.normal_multiplier", self.normal_multiplier, 1, 10)?;
        check_range("scroll.speed_multiplier", self.speed_multiplier, 1, 10)?;
        check_range("scroll.command_divisor", self.command_divisor, 1, 20)?;
        check_range("scroll.command_multiplier", self.command_multiplier, 1, 10)?;
        check_range("scroll.line_count", self.line_count, 1, u32::MAX)?;
        check_range("scroll.page_factor", self.page_factor, 1, 10)?;
        check_range("scroll.line_factor", self.line_factor, 1, 10)?;
        if !self.max_step.is_finite() || self.max_step < 0.0 {
            return Err(crate::Error::Config(format!(
                "scroll.max_step must be a non-negative number, got {}",
                self.max_step
            )));
        }
        Ok(())
    }
}

fn check_range(field: &str, value: u32, min: u32, max: u32) -> crate::Result<()> {
    if value < min || value > max {
        return Err(crate::Error::Config(format!(
            "{} must be within {}..={}, got {}",
            field, min, max, value
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Idle tick rate in milliseconds
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
    /// Frame rate while an animation is running
    #[serde(default = "default_animation_fps")]
    pub animation_fps: u32,
    /// Virtual pixels per terminal row
    #[serde(default = "default_cell_height")]
    pub cell_height_px: u32,
    /// Virtual pixels per terminal column
    #[serde(default = "default_cell_width")]
    pub cell_width_px: u32,
    /// Wheel sensitivity in percent, applied before deltas reach the engine
    #[serde(default = "default_scroll_sensitivity")]
    pub scroll_sensitivity: u32,
    /// Rows kept between the cursor and the viewport edge
    #[serde(default = "default_autoscroll_margin")]
    pub autoscroll_margin: u32,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
            animation_fps: default_animation_fps(),
            cell_height_px: default_cell_height(),
            cell_width_px: default_cell_width(),
            scroll_sensitivity: default_scroll_sensitivity(),
            autoscroll_margin: default_autoscroll_margin(),
        }
    }
}

/// Keymap configuration using Vim-style notation
/// Format: "j", "k", "<C-f>" (Ctrl+f), "<S-h>" (Shift+h), "<Tab>", "gg", "zz"
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeymapConfig {
    /// Quit the application
    #[serde(default = "default_key_quit")]
    pub quit: String,
    /// Move cursor down one line
    #[serde(default = "default_key_cursor_down")]
    pub cursor_down: String,
    /// Move cursor up one line
    #[serde(default = "default_key_cursor_up")]
    pub cursor_up: String,
    /// Scroll one page down
    #[serde(default = "default_key_page_down")]
    pub page_down: String,
    /// Scroll one page up
    #[serde(default = "default_key_page_up")]
    pub page_up: String,
    /// Scroll `line_count` lines down
    #[serde(default = "default_key_line_down")]
    pub line_down: String,
    /// Scroll `line_count` lines up
    #[serde(default = "default_key_line_up")]
    pub line_up: String,
    /// Scroll left by the line command distance
    #[serde(default = "default_key_line_left")]
    pub line_left: String,
    /// Scroll right by the line command distance
    #[serde(default = "default_key_line_right")]
    pub line_right: String,
    /// Jump to the top of the buffer
    #[serde(default = "default_key_jump_to_top")]
    pub jump_to_top: String,
    /// Jump to the bottom of the buffer
    #[serde(default = "default_key_jump_to_bottom")]
    pub jump_to_bottom: String,
    /// Center the viewport on the cursor
    #[serde(default = "default_key_center_cursor")]
    pub center_cursor: String,
    /// Focus the other pane
    #[serde(default = "default_key_focus_next")]
    pub focus_next: String,
    /// Toggle linked (fan-out) scrolling across panes
    #[serde(default = "default_key_toggle_linked")]
    pub toggle_linked: String,
    /// Close the focused pane (stops its animation)
    #[serde(default = "default_key_close_pane")]
    pub close_pane: String,
}

impl Default for KeymapConfig {
    fn default() -> Self {
        Self {
            quit: default_key_quit(),
            cursor_down: default_key_cursor_down(),
            cursor_up: default_key_cursor_up(),
            page_down: default_key_page_down(),
            page_up: default_key_page_up(),
            line_down: default_key_line_down(),
            line_up: default_key_line_up(),
            line_left: default_key_line_left(),
            line_right: default_key_line_right(),
            jump_to_top: default_key_jump_to_top(),
            jump_to_bottom: default_key_jump_to_bottom(),
            center_cursor: default_key_center_cursor(),
            focus_next: default_key_focus_next(),
            toggle_linked: default_key_toggle_linked(),
            close_pane: default_key_close_pane(),
        }
    }
}

// Default keymap values (Vim-style notation)
fn default_key_quit() -> String { "q".to_string() }
fn default_key_cursor_down() -> String { "j".to_string() }
fn default_key_cursor_up() -> String { "k".to_string() }
fn default_key_page_down() -> String { "<C-f>".to_string() }
fn default_key_page_up() -> String { "<C-b>".to_string() }
fn default_key_line_down() -> String { "<C-e>".to_string() }
fn default_key_line_up() -> String { "<C-y>".to_string() }
fn default_key_line_left() -> String { "H".to_string() }
fn default_key_line_right() -> String { "L".to_string() }
fn default_key_jump_to_top() -> String { "gg".to_string() }
fn default_key_jump_to_bottom() -> String { "G".to_string() }
fn default_key_center_cursor() -> String { "zz".to_string() }
fn default_key_focus_next() -> String { "<Tab>".to_string() }
fn default_key_toggle_linked() -> String { "=".to_string() }
fn default_key_close_pane() -> String { "x".to_string() }

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("smoothscroll")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_wheel_direction() -> i32 {
    1
}

fn default_divisor() -> u32 {
    7
}

fn default_normal_multiplier() -> u32 {
    1
}

fn default_speed_multiplier() -> u32 {
    5
}

fn default_command_multiplier() -> u32 {
    1
}

fn default_line_count() -> u32 {
    20
}

fn default_factor() -> u32 {
    3
}

fn default_tick_rate() -> u64 {
    100
}

fn default_animation_fps() -> u32 {
    60
}

fn default_cell_height() -> u32 {
    16
}

fn default_cell_width() -> u32 {
    8
}

fn default_scroll_sensitivity() -> u32 {
    40
}

fn default_autoscroll_margin() -> u32 {
    2
}

/// Expand tilde (~) in path to user's home directory
fn expand_tilde(path: &std::path::Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(stripped) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        } else if path_str == "~" {
            if let Some(home) = dirs::home_dir() {
                return home;
            }
        }
    }
    path.to_path_buf()
}

impl AppConfig {
    /// Load configuration from file or return defaults
    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from an explicit path, falling back to defaults
    pub fn load_from(path: &std::path::Path) -> crate::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.scroll.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> crate::Result<()> {
        self.save_to(&Self::config_path())
    }

    /// Save configuration to an explicit path
    pub fn save_to(&self, path: &std::path::Path) -> crate::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the configuration file path
    /// Always uses ~/.config/smoothscroll/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("smoothscroll")
            .join("config.toml")
    }

    /// Get the data directory (with tilde expansion)
    pub fn data_dir(&self) -> PathBuf {
        expand_tilde(&self.general.data_dir)
    }

    /// Get the log file path used while the viewer owns the terminal
    pub fn log_path(&self) -> PathBuf {
        self.data_dir().join("smoothscroll.log")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scroll_config() {
        let config = ScrollConfig::default();
        assert_eq!(config.wheel_direction, 1);
        assert_eq!(config.wheel_divisor, 7);
        assert_eq!(config.normal_multiplier, 1);
        assert_eq!(config.speed_multiplier, 5);
        assert_eq!(config.line_count, 20);
        assert_eq!(config.step_policy, StepPolicy::Divided);
        assert!(config.sign_flip_bonus);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let config = ScrollConfig {
            wheel_divisor: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("scroll.wheel_divisor"));

        let config = ScrollConfig {
            wheel_direction: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = ScrollConfig {
            speed_multiplier: 11,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = ScrollConfig {
            max_step: -1.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [scroll]
            wheel_divisor = 12
            step_policy = "capped"
            "#,
        )
        .unwrap();
        assert_eq!(config.scroll.wheel_divisor, 12);
        assert_eq!(config.scroll.command_divisor, 7);
        assert_eq!(config.scroll.step_policy, StepPolicy::Capped);
        assert_eq!(config.ui.animation_fps, 60);
        assert_eq!(config.keymap.center_cursor, "zz");
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = std::env::temp_dir().join(format!("smoothscroll-test-{}", uuid::Uuid::new_v4()));
        let path = dir.join("config.toml");

        let mut config = AppConfig::default();
        config.scroll.wheel_direction = -1;
        config.ui.cell_height_px = 20;
        config.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded.scroll, config.scroll);
        assert_eq!(loaded.ui.cell_height_px, 20);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_load_missing_file_returns_defaults() {
        let path = std::env::temp_dir().join("smoothscroll-does-not-exist/config.toml");
        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.scroll, ScrollConfig::default());
    }
}
