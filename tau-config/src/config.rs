//! The `Config` struct and its persistence.
//!
//! Covers:
//! - `load` / `save` for the default path, `load_from` / `save_to` for explicit paths
//!   (YAML file I/O with atomic write)
//! - XDG-style path helpers (`config_path`, `config_dir`)

use crate::{Color, LogLevel};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration for the grid front-end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    // --- Font Settings ---
    /// Font family name (None picks the first available monospace family)
    #[serde(default)]
    pub font_family: Option<String>,

    /// Font size in pixels
    #[serde(default = "crate::defaults::font_size")]
    pub font_size: f32,

    // --- Cell Metrics ---
    /// Width of a single grid cell in pixels
    #[serde(default = "crate::defaults::cell_width")]
    pub cell_width: u32,

    /// Height of a single grid cell in pixels
    #[serde(default = "crate::defaults::cell_height")]
    pub cell_height: u32,

    /// Distance from the glyph baseline to the bottom of the cell in pixels
    #[serde(default = "crate::defaults::cell_baseline")]
    pub cell_baseline: u32,

    // --- Default Highlight ---
    /// Foreground of highlight 0 until the editor sends its own defaults
    #[serde(default = "crate::defaults::default_foreground")]
    pub default_foreground: Color,

    /// Background of highlight 0 until the editor sends its own defaults
    #[serde(default = "crate::defaults::default_background")]
    pub default_background: Color,

    /// Special (underline) color of highlight 0
    #[serde(default = "crate::defaults::default_special")]
    pub default_special: Color,

    // --- Cursor Overlay ---
    #[serde(default = "crate::defaults::cursor_color")]
    pub cursor_color: Color,

    /// Opacity of the cursor overlay (0.0-1.0)
    #[serde(default = "crate::defaults::cursor_opacity")]
    pub cursor_opacity: f32,

    /// Thickness in pixels of horizontal and vertical cursor shapes
    #[serde(default = "crate::defaults::cursor_thin_size")]
    pub cursor_thin_size: u32,

    // --- Headless Viewport ---
    #[serde(default = "crate::defaults::viewport_width")]
    pub viewport_width: u32,

    #[serde(default = "crate::defaults::viewport_height")]
    pub viewport_height: u32,

    // --- Logging ---
    #[serde(default)]
    pub log_level: LogLevel,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            font_family: None,
            font_size: crate::defaults::font_size(),
            cell_width: crate::defaults::cell_width(),
            cell_height: crate::defaults::cell_height(),
            cell_baseline: crate::defaults::cell_baseline(),
            default_foreground: crate::defaults::default_foreground(),
            default_background: crate::defaults::default_background(),
            default_special: crate::defaults::default_special(),
            cursor_color: crate::defaults::cursor_color(),
            cursor_opacity: crate::defaults::cursor_opacity(),
            cursor_thin_size: crate::defaults::cursor_thin_size(),
            viewport_width: crate::defaults::viewport_width(),
            viewport_height: crate::defaults::viewport_height(),
            log_level: LogLevel::default(),
        }
    }
}

impl Config {
    /// Load configuration from the default path, creating it when missing.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();
        log::info!("Config path: {:?}", config_path);

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            log::info!(
                "Config file not found, creating default at {:?}",
                config_path
            );
            let config = Self::default();
            if let Err(e) = config.save() {
                log::error!("Failed to save default config: {}", e);
                return Err(e);
            }
            Ok(config)
        }
    }

    /// Load configuration from an explicit file.
    pub fn load_from(path: &Path) -> Result<Self> {
        log::info!("Loading config from {:?}", path);
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let mut config: Config = serde_yaml_ng::from_str(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        config.sanitize();
        Ok(config)
    }

    /// Save configuration to the default path.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    /// Save configuration to an explicit file.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let yaml = serde_yaml_ng::to_string(self)?;

        // Atomic save: write to temp file then rename to prevent corruption on crash
        let temp_path = path.with_extension("yaml.tmp");
        fs::write(&temp_path, &yaml)?;
        fs::rename(&temp_path, path)?;

        Ok(())
    }

    /// Get the configuration directory (using XDG convention)
    pub fn config_dir() -> PathBuf {
        #[cfg(target_os = "windows")]
        {
            dirs::config_dir()
                .map(|dir| dir.join("tau"))
                .unwrap_or_else(|| PathBuf::from("."))
        }
        #[cfg(not(target_os = "windows"))]
        {
            dirs::home_dir()
                .map(|home| home.join(".config").join("tau"))
                .unwrap_or_else(|| PathBuf::from("."))
        }
    }

    /// Get the configuration file path
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.yaml")
    }

    /// Clamp values that would make the grid unusable.
    fn sanitize(&mut self) {
        if self.cell_width == 0 || self.cell_height == 0 {
            log::warn!(
                "Cell metrics {}x{} are invalid, using defaults",
                self.cell_width,
                self.cell_height
            );
            self.cell_width = crate::defaults::cell_width();
            self.cell_height = crate::defaults::cell_height();
        }
        if self.cell_baseline >= self.cell_height {
            self.cell_baseline = crate::defaults::cell_baseline().min(self.cell_height - 1);
        }
        self.cursor_opacity = self.cursor_opacity.clamp(0.0, 1.0);
        if self.font_size <= 0.0 {
            self.font_size = crate::defaults::font_size();
        }
    }
}
