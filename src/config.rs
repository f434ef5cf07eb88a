//! Export Settings - JSON configuration with defaults for every field

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::archive::Compression;
use crate::scale::ScaleMode;

pub const DEFAULT_FILENAME: &str = "polygon_export";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportSettings {
    /// File name stem for artifacts and archive entries
    #[serde(default = "default_filename")]
    pub filename: String,
    #[serde(default)]
    pub compression: Compression,
    #[serde(default)]
    pub scale_mode: ScaleMode,
    /// Value of the DBF `ID` attribute
    #[serde(default = "default_record_id")]
    pub record_id: u32,
}

fn default_filename() -> String { DEFAULT_FILENAME.to_string() }
fn default_record_id() -> u32 { 1 }

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            filename: default_filename(),
            compression: Compression::default(),
            scale_mode: ScaleMode::default(),
            record_id: default_record_id(),
        }
    }
}

impl ExportSettings {
    /// Load from a JSON file. A missing file yields defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}
