use crate::error::ConfigError;
use crate::render::{Palette, Rgb};
use log::{info, warn};
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub grid: GridConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub visual: VisualConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize)]
pub struct GridConfig {
    #[serde(default = "default_rows")]
    pub rows: usize,
    /// Side length of the square drawing area
    #[serde(default = "default_width_px")]
    pub width_px: u32,
}

#[derive(Debug, Deserialize)]
pub struct SearchConfig {
    /// Search steps shown per rendered frame
    #[serde(default = "default_steps_per_frame")]
    pub steps_per_frame: usize,
    #[serde(default = "default_clear_before_run")]
    pub clear_before_run: bool,
}

#[derive(Debug, Deserialize)]
pub struct VisualConfig {
    #[serde(default = "default_window_title")]
    pub window_title: String,
    #[serde(default = "default_show_grid_lines")]
    pub show_grid_lines: bool,
    #[serde(default)]
    pub colors: ColorConfig,
}

/// Cell colors as `#rrggbb`
#[derive(Debug, Deserialize)]
pub struct ColorConfig {
    #[serde(default = "default_empty")]
    pub empty: String,
    #[serde(default = "default_start")]
    pub start: String,
    #[serde(default = "default_end")]
    pub end: String,
    #[serde(default = "default_barrier")]
    pub barrier: String,
    #[serde(default = "default_frontier")]
    pub frontier: String,
    #[serde(default = "default_visited")]
    pub visited: String,
    #[serde(default = "default_path")]
    pub path: String,
    #[serde(default = "default_grid_lines")]
    pub grid_lines: String,
}

#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// env_logger filter used when RUST_LOG is unset
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default)]
    pub enable_action_log: bool,
    #[serde(default = "default_action_log_path")]
    pub action_log_path: String,
}

// Default values
fn default_rows() -> usize { 50 }
fn default_width_px() -> u32 { 800 }
fn default_steps_per_frame() -> usize { 1 }
fn default_clear_before_run() -> bool { true }
fn default_window_title() -> String { "A* Pathfinding Visualizer".to_string() }
fn default_show_grid_lines() -> bool { true }
fn default_empty() -> String { "#eceff4".to_string() }
fn default_start() -> String { "#a3be8c".to_string() }
fn default_end() -> String { "#bf616a".to_string() }
fn default_barrier() -> String { "#2e3440".to_string() }
fn default_frontier() -> String { "#88c0d0".to_string() }
fn default_visited() -> String { "#b48ead".to_string() }
fn default_path() -> String { "#ebcb8b".to_string() }
fn default_grid_lines() -> String { "#4c566a".to_string() }
fn default_level() -> String { "info".to_string() }
fn default_action_log_path() -> String { "action_log.json".to_string() }

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            rows: default_rows(),
            width_px: default_width_px(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            steps_per_frame: default_steps_per_frame(),
            clear_before_run: default_clear_before_run(),
        }
    }
}

impl Default for VisualConfig {
    fn default() -> Self {
        Self {
            window_title: default_window_title(),
            show_grid_lines: default_show_grid_lines(),
            colors: ColorConfig::default(),
        }
    }
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            empty: default_empty(),
            start: default_start(),
            end: default_end(),
            barrier: default_barrier(),
            frontier: default_frontier(),
            visited: default_visited(),
            path: default_path(),
            grid_lines: default_grid_lines(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            enable_action_log: false,
            action_log_path: default_action_log_path(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            search: SearchConfig::default(),
            visual: VisualConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl ColorConfig {
    pub fn palette(&self) -> Result<Palette, ConfigError> {
        Ok(Palette {
            empty: Rgb::from_hex(&self.empty)?,
            start: Rgb::from_hex(&self.start)?,
            end: Rgb::from_hex(&self.end)?,
            barrier: Rgb::from_hex(&self.barrier)?,
            frontier: Rgb::from_hex(&self.frontier)?,
            visited: Rgb::from_hex(&self.visited)?,
            path: Rgb::from_hex(&self.path)?,
            grid_lines: Rgb::from_hex(&self.grid_lines)?,
        })
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Load configuration from file, or use defaults if file doesn't exist
    pub fn load() -> Self {
        if !Path::new(CONFIG_FILE).exists() {
            info!("No {} found, using default configuration", CONFIG_FILE);
            return Config::default();
        }
        match Self::from_file(CONFIG_FILE) {
            Ok(config) => {
                info!("Loaded configuration from {}", CONFIG_FILE);
                config
            }
            Err(e) => {
                warn!("Failed to load {}: {}; using default configuration", CONFIG_FILE, e);
                Config::default()
            }
        }
    }

    /// Configured palette, falling back to the default on a bad color
    pub fn palette(&self) -> Palette {
        self.visual.colors.palette().unwrap_or_else(|e| {
            warn!("{}; using default palette", e);
            Palette::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.grid.rows, 50);
        assert_eq!(config.grid.width_px, 800);
        assert_eq!(config.search.steps_per_frame, 1);
        assert!(!config.logging.enable_action_log);
        assert_eq!(config.palette(), Palette::default());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = Config::from_toml(
            r##"
[grid]
rows = 20

[visual.colors]
path = "#ffff00"
"##,
        )
        .unwrap();
        assert_eq!(config.grid.rows, 20);
        assert_eq!(config.grid.width_px, 800);
        assert_eq!(config.palette().path, Rgb(255, 255, 0));
        assert_eq!(config.palette().start, Palette::default().start);
    }

    #[test]
    fn bad_color_falls_back() {
        let config = Config::from_toml("[visual.colors]\nend = \"red\"\n").unwrap();
        assert!(config.visual.colors.palette().is_err());
        assert_eq!(config.palette(), Palette::default());
    }

    #[test]
    fn malformed_toml_is_an_error() {
        assert!(matches!(
            Config::from_toml("[grid\nrows = 1"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            Config::from_file("/nonexistent/pathviz.toml"),
            Err(ConfigError::Io(_))
        ));
    }
}
