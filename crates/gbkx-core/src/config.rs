//! Configuration module
//!
//! The configuration is a small JSON record in the user's home directory. It
//! is loaded once per run and handed to whatever needs it; nothing here keeps
//! global state.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Code page used when neither the command line nor the config names one (GBK)
pub const DEFAULT_CODE_PAGE: &str = "936";

/// File name of the configuration record inside the home directory
pub const CONFIG_FILE_NAME: &str = ".gbkx_config.json";

/// Persistent configuration record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Path to the 7-Zip executable, `None` means auto-detect
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sevenzip_path: Option<PathBuf>,
    /// Default code page used to decode archive filenames
    #[serde(default = "default_code_page", deserialize_with = "deserialize_code_page")]
    pub encoding: String,
    /// Keys this version does not know about, kept so a save does not drop them
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

fn default_code_page() -> String {
    DEFAULT_CODE_PAGE.to_string()
}

/// Code page written either as a string or, by hand, as a bare number
#[derive(Deserialize)]
#[serde(untagged)]
enum CodePageValue {
    Text(String),
    Number(u32),
}

fn deserialize_code_page<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match CodePageValue::deserialize(deserializer)? {
        CodePageValue::Text(text) => text,
        CodePageValue::Number(number) => number.to_string(),
    })
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sevenzip_path: None,
            encoding: default_code_page(),
            extra: serde_json::Map::new(),
        }
    }
}

/// Reads and writes the configuration record at a fixed path
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// Store backed by an explicit file path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `~/.gbkx_config.json`
    pub fn default_location() -> Result<Self> {
        let home = dirs::home_dir()
            .ok_or_else(|| Error::Config("Unable to determine home directory".to_string()))?;
        Ok(Self::new(home.join(CONFIG_FILE_NAME)))
    }

    /// Get the configuration file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the configuration, propagating read and parse errors.
    ///
    /// A missing file is not an error and yields the defaults.
    pub fn try_load(&self) -> Result<Config> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "No configuration file, using defaults");
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(&self.path)?;
        let config: Config = serde_json::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))?;

        Ok(config)
    }

    /// Load the configuration or use defaults if loading fails
    pub fn load(&self) -> Config {
        match self.try_load() {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %self.path.display(), "Failed to load configuration: {}", e);
                Config::default()
            }
        }
    }

    /// Save configuration to file.
    ///
    /// The record is written to a temporary file beside the target and renamed
    /// into place.
    pub fn save(&self, config: &Config) -> Result<()> {
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent)?;

        let mut contents = serde_json::to_string_pretty(config)?;
        contents.push('\n');

        let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
        tmp.write_all(contents.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;

        debug!(path = %self.path.display(), "Configuration saved");
        Ok(())
    }
}
