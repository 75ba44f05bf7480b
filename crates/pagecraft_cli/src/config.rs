//! `pagecraft.toml` handling
//!
//! The file is optional. Every field has a default, and command-line flags
//! override whatever the file sets.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const CONFIG_FILE: &str = "pagecraft.toml";

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct PagecraftConfig {
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub sheet: SheetConfig,
}

/// Settings for `pagecraft render`
#[derive(Debug, Deserialize, Serialize)]
pub struct RenderConfig {
    /// Output edge length in pixels
    #[serde(default = "default_size")]
    pub size: u32,
    /// Tint for `currentColor`
    #[serde(default = "default_color")]
    pub color: String,
}

fn default_size() -> u32 {
    48
}

fn default_color() -> String {
    "#1f1f1f".to_string()
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            size: default_size(),
            color: default_color(),
        }
    }
}

/// Settings for `pagecraft sheet`
#[derive(Debug, Deserialize, Serialize)]
pub struct SheetConfig {
    #[serde(default = "default_cell")]
    pub cell: f32,
    #[serde(default = "default_gap")]
    pub gap: f32,
    /// Prefix for generated ids, so several sheets can share a page
    #[serde(default = "default_id_prefix")]
    pub id_prefix: String,
}

fn default_cell() -> f32 {
    24.0
}

fn default_gap() -> f32 {
    8.0
}

fn default_id_prefix() -> String {
    "sheet".to_string()
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            cell: default_cell(),
            gap: default_gap(),
            id_prefix: default_id_prefix(),
        }
    }
}

impl PagecraftConfig {
    /// Load `pagecraft.toml` from a directory, falling back to defaults
    pub fn load_from_dir(path: &Path) -> Result<Self> {
        let config_path = path.join(CONFIG_FILE);

        if !config_path.exists() {
            tracing::debug!("no {} in {}, using defaults", CONFIG_FILE, path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;

        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse {}", config_path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: PagecraftConfig = toml::from_str(content)?;
        if config.render.size == 0 {
            anyhow::bail!("render.size must be greater than 0");
        }
        if config.sheet.cell <= 0.0 || config.sheet.gap < 0.0 {
            anyhow::bail!("sheet.cell must be positive and sheet.gap non-negative");
        }
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}
