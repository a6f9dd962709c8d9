use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::catalog::RemovalStrategy;
use crate::error::{CatalogError, Result};

const CONFIG_FILE: &str = "config.toml";
const DEFAULT_DATA_FILE: &str = "dados.bin";

/// Written by `food-index config init`.
const DEFAULT_CONFIG_TEMPLATE: &str = r#"# food-index configuration file
# Location: ~/.food-index/config.toml

[data]
# Binary catalog file. Relative paths are resolved against this directory.
# Default: "dados.bin"
path = "dados.bin"

[index]
# How a category repairs its energy/protein indexes after a food is removed:
#   "rebuild"  - clear both indexes and re-insert every remaining food
#   "surgical" - unlink only the removed food from each index
# Default: "rebuild"
removal = "rebuild"
"#;

/// Contents of `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub index: IndexConfig,
}

/// `[data]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_path")]
    pub path: PathBuf,
}

fn default_data_path() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_FILE)
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: default_data_path(),
        }
    }
}

/// `[index]` table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndexConfig {
    #[serde(default)]
    pub removal: RemovalStrategy,
}

impl Config {
    /// Location of the config file inside `base_dir`.
    pub fn path(base_dir: &Path) -> PathBuf {
        base_dir.join(CONFIG_FILE)
    }

    /// Read the config under `base_dir`. No file means all defaults.
    pub fn load(base_dir: &Path) -> Result<Self> {
        let path = Self::path(base_dir);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e.into()),
        };
        toml::from_str(&content).map_err(|e| CatalogError::ConfigParse {
            path,
            message: e.to_string(),
        })
    }

    /// Write the config under `base_dir`, creating the directory if needed.
    /// Returns the file written.
    pub fn save(&self, base_dir: &Path) -> Result<PathBuf> {
        let rendered = toml::to_string_pretty(self)?;
        fs::create_dir_all(base_dir)?;
        let path = Self::path(base_dir);
        fs::write(&path, rendered)?;
        tracing::debug!(path = %path.display(), "config saved");
        Ok(path)
    }

    /// Write the commented template unless a config file already exists.
    /// Returns `false` when an existing file was left untouched.
    pub fn init(base_dir: &Path) -> Result<bool> {
        fs::create_dir_all(base_dir)?;
        let created = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(Self::path(base_dir));
        match created {
            Ok(mut file) => {
                file.write_all(DEFAULT_CONFIG_TEMPLATE.as_bytes())?;
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Data file, resolved against `base_dir` when relative
    pub fn data_path(&self, base_dir: &Path) -> PathBuf {
        if self.data.path.is_absolute() {
            self.data.path.clone()
        } else {
            base_dir.join(&self.data.path)
        }
    }

    /// Get a config value by dot-notation key
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "data.path" => Some(self.data.path.display().to_string()),
            "index.removal" => Some(self.index.removal.as_str().to_string()),
            _ => None,
        }
    }

    /// Set a config value by dot-notation key
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "data.path" => {
                let trimmed = value.trim();
                if trimmed.is_empty() {
                    return Err(invalid(key, value, "a non-empty path"));
                }
                self.data.path = PathBuf::from(trimmed);
                Ok(())
            }
            "index.removal" => {
                self.index.removal = RemovalStrategy::parse(value)
                    .ok_or_else(|| invalid(key, value, "\"rebuild\" or \"surgical\""))?;
                Ok(())
            }
            _ => Err(CatalogError::ConfigKeyNotFound {
                key: key.to_string(),
            }),
        }
    }

    /// List all config keys with their current values
    pub fn list(&self) -> Vec<(String, String)> {
        ["data.path", "index.removal"]
            .into_iter()
            .filter_map(|key| self.get(key).map(|value| (key.to_string(), value)))
            .collect()
    }
}

fn invalid(key: &str, value: &str, expected: &str) -> CatalogError {
    CatalogError::InvalidConfigValue {
        key: key.to_string(),
        value: value.to_string(),
        expected: expected.to_string(),
    }
}
