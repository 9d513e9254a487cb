use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::utils;

/// Current configuration version
pub const CURRENT_CONFIG_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_database_path")]
    pub database_path: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub key_bindings: KeyBindings,
    #[serde(default = "default_current_theme")]
    pub current_theme: String,
    #[serde(default)]
    pub themes: HashMap<String, Theme>,
    #[serde(default)]
    pub canvas: CanvasSettings,
    #[serde(default = "default_config_version")]
    pub config_version: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyBindings {
    #[serde(default = "default_quit")]
    pub quit: String,
    #[serde(default = "default_new")]
    pub new: String,
    #[serde(default = "default_edit")]
    pub edit: String,
    #[serde(default = "default_save")]
    pub save: String,
    #[serde(default = "default_delete")]
    pub delete: String,
    #[serde(default = "default_list_up")]
    pub list_up: String,
    #[serde(default = "default_list_down")]
    pub list_down: String,
    #[serde(default = "default_tab_left")]
    pub tab_left: String,
    #[serde(default = "default_tab_right")]
    pub tab_right: String,
    #[serde(default = "default_help")]
    pub help: String,
    #[serde(default = "default_toggle_task_status")]
    pub toggle_task_status: String,
    #[serde(default = "default_add_time")]
    pub add_time: String,
    #[serde(default = "default_remove_time")]
    pub remove_time: String,
    #[serde(default = "default_prev_day")]
    pub prev_day: String,
    #[serde(default = "default_next_day")]
    pub next_day: String,
    #[serde(default = "default_today")]
    pub today: String,
    #[serde(default = "default_switch_field")]
    pub switch_field: String,
    #[serde(default = "default_pen")]
    pub pen: String,
    #[serde(default = "default_eraser")]
    pub eraser: String,
    #[serde(default = "default_clear_canvas")]
    pub clear_canvas: String,
    #[serde(default = "default_clear_all")]
    pub clear_all: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    #[serde(default = "default_fg")]
    pub fg: String,
    #[serde(default = "default_bg")]
    pub bg: String,
    #[serde(default = "default_highlight_bg")]
    pub highlight_bg: String,
    #[serde(default = "default_highlight_fg")]
    pub highlight_fg: String,
    #[serde(default = "default_tab_bg")]
    pub tab_bg: String,
    #[serde(default = "default_ink")]
    pub ink: String,
}

/// Annotation surface parameters, in logical units (one unit is one braille dot
/// in the terminal view)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasSettings {
    #[serde(default = "default_canvas_width")]
    pub width: u32,
    #[serde(default = "default_canvas_height")]
    pub height: u32,
    /// Backing pixels per logical unit
    #[serde(default = "default_pixel_ratio")]
    pub pixel_ratio: f32,
    #[serde(default = "default_pen_width")]
    pub pen_width: f32,
    #[serde(default = "default_eraser_width")]
    pub eraser_width: f32,
    #[serde(default = "default_pen_color")]
    pub pen_color: String,
    #[serde(default = "default_blur")]
    pub blur: f32,
}

impl Default for Config {
    fn default() -> Self {
        let mut themes = HashMap::new();

        // Example custom theme for users to see how to define themes
        themes.insert("paper".to_string(), Theme {
            fg: "black".to_string(),
            bg: "white".to_string(),
            highlight_bg: "#1f2937".to_string(),
            highlight_fg: "white".to_string(),
            tab_bg: "gray".to_string(),
            ink: "#1f2937".to_string(),
        });

        Self {
            database_path: default_database_path(),
            log_level: default_log_level(),
            key_bindings: KeyBindings::default(),
            current_theme: default_current_theme(),
            themes,
            canvas: CanvasSettings::default(),
            config_version: Some(CURRENT_CONFIG_VERSION),
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            quit: default_quit(),
            new: default_new(),
            edit: default_edit(),
            save: default_save(),
            delete: default_delete(),
            list_up: default_list_up(),
            list_down: default_list_down(),
            tab_left: default_tab_left(),
            tab_right: default_tab_right(),
            help: default_help(),
            toggle_task_status: default_toggle_task_status(),
            add_time: default_add_time(),
            remove_time: default_remove_time(),
            prev_day: default_prev_day(),
            next_day: default_next_day(),
            today: default_today(),
            switch_field: default_switch_field(),
            pen: default_pen(),
            eraser: default_eraser(),
            clear_canvas: default_clear_canvas(),
            clear_all: default_clear_all(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            fg: default_fg(),
            bg: default_bg(),
            highlight_bg: default_highlight_bg(),
            highlight_fg: default_highlight_fg(),
            tab_bg: default_tab_bg(),
            ink: default_ink(),
        }
    }
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            width: default_canvas_width(),
            height: default_canvas_height(),
            pixel_ratio: default_pixel_ratio(),
            pen_width: default_pen_width(),
            eraser_width: default_eraser_width(),
            pen_color: default_pen_color(),
            blur: default_blur(),
        }
    }
}

impl CanvasSettings {
    /// Pen colour as straight RGBA
    pub fn pen_rgba(&self) -> image::Rgba<u8> {
        use crate::tui::widgets::color::parse_color;
        match parse_color(&self.pen_color) {
            ratatui::style::Color::Rgb(r, g, b) => image::Rgba([r, g, b, 255]),
            _ => image::Rgba([31, 41, 55, 255]),
        }
    }
}

impl Theme {
    /// Get preset themes that are always available
    pub fn get_preset_themes() -> HashMap<String, Theme> {
        let mut themes = HashMap::new();

        themes.insert("default".to_string(), Theme::default());

        themes.insert("dark".to_string(), Theme {
            fg: "white".to_string(),
            bg: "black".to_string(),
            highlight_bg: "cyan".to_string(),
            highlight_fg: "black".to_string(),
            tab_bg: "gray".to_string(),
            ink: "lightyellow".to_string(),
        });

        themes.insert("light".to_string(), Theme {
            fg: "black".to_string(),
            bg: "white".to_string(),
            highlight_bg: "blue".to_string(),
            highlight_fg: "white".to_string(),
            tab_bg: "gray".to_string(),
            ink: "blue".to_string(),
        });

        themes
    }
}

// Default value functions
fn default_database_path() -> String {
    // Fallback only; the profile's path is applied at load time
    if let Some(data_dir) = utils::get_data_dir(utils::Profile::Prod) {
        data_dir.join("daybook.db").to_string_lossy().to_string()
    } else {
        "~/.local/share/daybook/daybook.db".to_string()
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_quit() -> String {
    "q".to_string()
}

fn default_new() -> String {
    "n".to_string()
}

fn default_edit() -> String {
    "e".to_string()
}

fn default_save() -> String {
    "Ctrl+s".to_string()
}

fn default_delete() -> String {
    "d".to_string()
}

fn default_list_up() -> String {
    "k".to_string()
}

fn default_list_down() -> String {
    "j".to_string()
}

fn default_tab_left() -> String {
    "Left".to_string()
}

fn default_tab_right() -> String {
    "Right".to_string()
}

fn default_help() -> String {
    "F1".to_string()
}

fn default_toggle_task_status() -> String {
    "Space".to_string()
}

fn default_add_time() -> String {
    "+".to_string()
}

fn default_remove_time() -> String {
    "-".to_string()
}

fn default_prev_day() -> String {
    "[".to_string()
}

fn default_next_day() -> String {
    "]".to_string()
}

fn default_today() -> String {
    "t".to_string()
}

fn default_switch_field() -> String {
    "Tab".to_string()
}

fn default_pen() -> String {
    "p".to_string()
}

fn default_eraser() -> String {
    "x".to_string()
}

fn default_clear_canvas() -> String {
    "c".to_string()
}

fn default_clear_all() -> String {
    "C".to_string()
}

fn default_current_theme() -> String {
    "default".to_string()
}

fn default_fg() -> String {
    "white".to_string()
}

fn default_bg() -> String {
    "black".to_string()
}

fn default_highlight_bg() -> String {
    "blue".to_string()
}

fn default_highlight_fg() -> String {
    "white".to_string()
}

fn default_tab_bg() -> String {
    "gray".to_string()
}

fn default_ink() -> String {
    "lightcyan".to_string()
}

fn default_canvas_width() -> u32 {
    80
}

fn default_canvas_height() -> u32 {
    40
}

fn default_pixel_ratio() -> f32 {
    2.0
}

fn default_pen_width() -> f32 {
    2.0
}

fn default_eraser_width() -> f32 {
    12.0
}

fn default_pen_color() -> String {
    "#1f2937".to_string()
}

fn default_blur() -> f32 {
    1.0
}

fn default_config_version() -> Option<u32> {
    Some(CURRENT_CONFIG_VERSION)
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config directory: {0}")]
    ConfigDirError(String),
    #[error("Failed to read config file: {0}")]
    ReadError(String),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Failed to write config file: {0}")]
    WriteError(String),
    #[error("Invalid canvas settings: {0}")]
    InvalidCanvas(String),
}

impl Config {
    /// Load configuration from the profile's config file, creating it with
    /// defaults if missing
    pub fn load_with_profile(profile: utils::Profile) -> Result<Self, ConfigError> {
        let config_path = Self::get_config_path(profile)?;
        let mut config = Self::load_from_path(&config_path)?;
        // Keep the database inside the profile's data dir
        config.database_path = Self::default_database_path_for_profile(profile);
        Ok(config)
    }

    /// Load configuration from an explicit file, creating it with defaults if missing
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let config = if path.exists() {
            let contents =
                fs::read_to_string(path).map_err(|e| ConfigError::ReadError(e.to_string()))?;
            toml::from_str::<Config>(&contents)?
        } else {
            let mut config = Config::default();
            if let Err(e) = config.save_to_path(path) {
                eprintln!("ERROR: Failed to save config file: {}", e);
                eprintln!("Config path: {:?}", path);
                return Err(e);
            }
            config
        };
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to the profile's config file
    pub fn save_with_profile(&mut self, profile: utils::Profile) -> Result<(), ConfigError> {
        let config_path = Self::get_config_path(profile)?;
        self.save_to_path(&config_path)
    }

    pub fn save_to_path(&mut self, path: &Path) -> Result<(), ConfigError> {
        self.config_version = Some(CURRENT_CONFIG_VERSION);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError(e.to_string()))?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::WriteError(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, toml_string).map_err(|e| ConfigError::WriteError(e.to_string()))?;

        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let c = &self.canvas;
        if c.width == 0 || c.height == 0 {
            return Err(ConfigError::InvalidCanvas(
                "width and height must be positive".to_string(),
            ));
        }
        if !(c.pixel_ratio.is_finite() && c.pixel_ratio > 0.0) {
            return Err(ConfigError::InvalidCanvas(format!(
                "pixel_ratio must be positive, got {}",
                c.pixel_ratio
            )));
        }
        if !(c.pen_width > 0.0 && c.eraser_width > 0.0) {
            return Err(ConfigError::InvalidCanvas(
                "pen_width and eraser_width must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Get the path to the config file
    pub fn get_config_path(profile: utils::Profile) -> Result<PathBuf, ConfigError> {
        let config_dir = utils::get_config_dir(profile).ok_or_else(|| {
            ConfigError::ConfigDirError("Could not determine config directory".to_string())
        })?;
        Ok(config_dir.join("config.toml"))
    }

    fn default_database_path_for_profile(profile: utils::Profile) -> String {
        if let Some(data_dir) = utils::get_data_dir(profile) {
            data_dir.join("daybook.db").to_string_lossy().to_string()
        } else {
            match profile {
                utils::Profile::Dev => "~/.local/share/daybook-dev/daybook.db".to_string(),
                utils::Profile::Prod => "~/.local/share/daybook/daybook.db".to_string(),
            }
        }
    }

    /// Get the expanded database path (with ~ expansion)
    pub fn get_database_path(&self) -> PathBuf {
        utils::expand_path(&self.database_path)
    }

    /// Get the currently active theme, falling back to the default preset
    pub fn get_active_theme(&self) -> Theme {
        if let Some(theme) = self.themes.get(&self.current_theme) {
            theme.clone()
        } else if let Some(theme) = Theme::get_preset_themes().get(&self.current_theme) {
            theme.clone()
        } else {
            Theme::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_created_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("daybook").join("config.toml");

        let config = Config::load_from_path(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.canvas, CanvasSettings::default());
        assert_eq!(config.key_bindings.pen, "p");
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "current_theme = \"dark\"\n[canvas]\nwidth = 120\n").unwrap();

        let config = Config::load_from_path(&path).unwrap();
        assert_eq!(config.canvas.width, 120);
        assert_eq!(config.canvas.height, default_canvas_height());
        assert_eq!(config.get_active_theme().highlight_bg, "cyan");
    }

    #[test]
    fn test_rejects_degenerate_canvas() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[canvas]\npixel_ratio = 0.0\n").unwrap();

        assert!(matches!(
            Config::load_from_path(&path),
            Err(ConfigError::InvalidCanvas(_))
        ));
    }

    #[test]
    fn test_pen_colour_parses_hex() {
        let settings = CanvasSettings::default();
        assert_eq!(settings.pen_rgba(), image::Rgba([0x1f, 0x29, 0x37, 255]));
    }

    #[test]
    fn test_unknown_theme_falls_back() {
        let config = Config {
            current_theme: "nope".to_string(),
            ..Config::default()
        };
        assert_eq!(config.get_active_theme().fg, "white");
    }
}
