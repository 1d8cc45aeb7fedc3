//! Layout constants, optionally loaded from TOML.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid layout config: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Pixel dimensions and limits used by layout and interaction.
///
/// Every field is optional in TOML; missing keys take the browser-surface
/// defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Height of a block bar.
    pub block_height: f64,
    /// Vertical space between rows.
    pub row_gap: f64,
    /// Space above row 0 inside a lane.
    pub lane_top_padding: f64,
    /// Space below the last row inside a lane.
    pub lane_bottom_padding: f64,
    pub lane_min_height: f64,
    /// Height of the axis band between the two lanes.
    pub axis_height: f64,
    /// Width of the resize grip at each end of a block.
    pub handle_width: f64,
    /// Extra hit margin around the deletion target.
    pub delete_buffer: f64,
    /// Upper bound on the packer's row scan.
    pub max_row_search: usize,
    pub trash_size: f64,
    /// Distance of the deletion target from the surface's bottom-right corner.
    pub trash_margin: f64,
    pub font_size: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            block_height: 34.0,
            row_gap: 12.0,
            lane_top_padding: 10.0,
            lane_bottom_padding: 20.0,
            lane_min_height: 100.0,
            axis_height: 80.0,
            handle_width: 16.0,
            delete_buffer: 30.0,
            max_row_search: 1000,
            trash_size: 64.0,
            trash_margin: 16.0,
            font_size: 12.0,
        }
    }
}

impl LayoutConfig {
    /// Preset for character-cell surfaces where one pixel is one cell.
    pub fn terminal() -> Self {
        Self {
            block_height: 1.0,
            row_gap: 0.0,
            lane_top_padding: 1.0,
            lane_bottom_padding: 1.0,
            lane_min_height: 4.0,
            axis_height: 3.0,
            handle_width: 1.0,
            delete_buffer: 1.0,
            max_row_search: 1000,
            trash_size: 3.0,
            trash_margin: 1.0,
            font_size: 1.0,
        }
    }

    /// Distance between the tops of consecutive rows.
    pub fn row_height(&self) -> f64 {
        self.block_height + self.row_gap
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }
}
