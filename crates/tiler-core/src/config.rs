// ABOUTME: Layout configuration handling.
// ABOUTME: Loads and saves per-tree layout options from TOML config files.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Size of the grab handle drawn in the middle of a divider.
///
/// Stored for a horizontal bar (`width` runs along the bar); vertical bars
/// swap the two values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HandleGeometry {
    pub width: f64,
    pub height: f64,
}

impl Default for HandleGeometry {
    fn default() -> Self {
        Self {
            width: 1.0,
            height: 1.0,
        }
    }
}

/// Options owned by one layout tree. Never shared between trees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutOptions {
    /// Thickness of every divider bar in pixels
    pub divider_thickness: f64,

    /// Touch-friendly grab handles on dividers (None disables them)
    pub handles: Option<HandleGeometry>,

    /// Quiet window for coalescing container resize notifications
    pub resize_debounce_ms: u64,

    /// Keep the drag indicator between the two sibling panes while dragging
    pub clamp_drag: bool,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            divider_thickness: 5.0,
            handles: Some(HandleGeometry::default()),
            resize_debounce_ms: 200,
            clamp_drag: true,
        }
    }
}

impl LayoutOptions {
    /// Options with zero-width dividers, handy when pixel math should add up
    /// without a divider term.
    pub fn borderless() -> Self {
        Self {
            divider_thickness: 0.0,
            ..Self::default()
        }
    }

    pub fn resize_debounce(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.resize_debounce_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Options applied to every layout tree created from this config
    pub layout: LayoutOptions,

    /// Container dimensions used when none are given
    pub width: f64,
    pub height: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            layout: LayoutOptions::default(),
            width: 1200.0,
            height: 800.0,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    #[error("Invalid config value: {0}")]
    Invalid(String),
}

impl Config {
    /// Get the default config file path (~/.config/tiler/config.toml)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("tiler").join("config.toml"))
    }

    /// Load config from a path
    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from default path, or return default config if not found
    pub fn load_or_default() -> Self {
        Self::default_path()
            .and_then(|path| Self::load(&path).ok())
            .unwrap_or_default()
    }

    /// Save config to a path
    pub fn save(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let thickness = self.layout.divider_thickness;
        if !thickness.is_finite() || thickness < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "divider_thickness must be a non-negative number, got {thickness}"
            )));
        }
        if !(self.width.is_finite() && self.height.is_finite())
            || self.width < 0.0
            || self.height < 0.0
        {
            return Err(ConfigError::Invalid(format!(
                "container size must be non-negative, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }
}
