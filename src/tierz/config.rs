use crate::error::{Result, TierzError};
use crate::export::ExportFormat;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILENAME: &str = "config.json";

pub const KEYS: &[&str] = &["catalog_path", "export_format"];

/// Configuration for tierz, stored as `config.json` in the data directory.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TierzConfig {
    /// Custom catalog JSON used instead of the bundled one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog_path: Option<PathBuf>,

    #[serde(default)]
    pub export_format: ExportFormat,
}

impl TierzConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(TierzError::Io)?;
        let config: TierzConfig =
            serde_json::from_str(&content).map_err(TierzError::Serialization)?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();
        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(TierzError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(TierzError::Serialization)?;
        fs::write(config_path, content).map_err(TierzError::Io)?;
        Ok(())
    }

    /// Display value of `key`, `None` for unknown keys.
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "catalog_path" => Some(
                self.catalog_path
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(bundled)".to_string()),
            ),
            "export_format" => Some(self.export_format.to_string()),
            _ => None,
        }
    }

    /// Sets `key` from user input. An empty `catalog_path` restores the bundled catalog.
    pub fn set(&mut self, key: &str, value: &str) -> std::result::Result<(), String> {
        match key {
            "catalog_path" => {
                let value = value.trim();
                self.catalog_path = if value.is_empty() {
                    None
                } else {
                    Some(PathBuf::from(value))
                };
                Ok(())
            }
            "export_format" => {
                self.export_format = value.parse()?;
                Ok(())
            }
            _ => Err(format!(
                "Unknown config key: {} (expected one of: {})",
                key,
                KEYS.join(", ")
            )),
        }
    }
}
