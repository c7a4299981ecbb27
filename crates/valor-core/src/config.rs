//! Engine configuration, persisted as JSON next to the save files.
//!
//! Everything defaults to "on"; a missing or unreadable config file falls
//! back to the defaults with a log line rather than failing setup.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Master switch; a disabled engine records statistics but awards nothing.
    pub enabled: bool,
    /// Whether first-achiever ribbon variants are in play.
    pub award_first_ribbons: bool,
    /// Directory scanned for ribbon pack files at setup, if any.
    pub pack_directory: Option<PathBuf>,
    /// Ribbon codes disabled by the user.
    pub disabled_codes: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            award_first_ribbons: true,
            pack_directory: None,
            disabled_codes: Vec::new(),
        }
    }
}

impl EngineConfig {
    /// Load from a JSON file, falling back to defaults on any failure.
    pub fn load_or_default(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(config) => config,
                Err(e) => {
                    log::error!("config file {} is invalid: {e}, using defaults", path.display());
                    Self::default()
                }
            },
            Err(e) => {
                log::info!("no config at {} ({e}), using defaults", path.display());
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        let text = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        fs::write(path, text)
    }
}
