use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::debug;

use crate::core::{
    errors::BudgetError,
    utils::{ensure_dir, write_atomic, PathResolver},
};

const DEFAULT_AMOUNT_PRECISION: usize = 2;
const MAX_AMOUNT_PRECISION: usize = 8;

/// User preferences for the shell. The ledger itself is never stored here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_dir: Option<PathBuf>,
    #[serde(default = "Config::default_amount_precision")]
    pub amount_precision: usize,
    #[serde(default = "Config::default_color")]
    pub color: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            export_dir: None,
            amount_precision: DEFAULT_AMOUNT_PRECISION,
            color: true,
        }
    }
}

impl Config {
    pub const KEYS: [&'static str; 3] = ["export_dir", "amount_precision", "color"];

    fn default_amount_precision() -> usize {
        DEFAULT_AMOUNT_PRECISION
    }

    fn default_color() -> bool {
        true
    }

    /// Updates a single key from its textual form.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), BudgetError> {
        let value = value.trim();
        match key.trim().to_ascii_lowercase().as_str() {
            "export_dir" => {
                self.export_dir = if value.is_empty() || value == "-" {
                    None
                } else {
                    Some(PathBuf::from(value))
                };
            }
            "amount_precision" => {
                let precision = value.parse::<usize>().map_err(|_| {
                    BudgetError::ConfigError(format!(
                        "amount_precision must be a whole number, got `{}`",
                        value
                    ))
                })?;
                if precision > MAX_AMOUNT_PRECISION {
                    return Err(BudgetError::ConfigError(format!(
                        "amount_precision must be at most {}",
                        MAX_AMOUNT_PRECISION
                    )));
                }
                self.amount_precision = precision;
            }
            "color" => {
                self.color = parse_bool(value).ok_or_else(|| {
                    BudgetError::ConfigError(format!("color expects on/off, got `{}`", value))
                })?;
            }
            other => {
                return Err(BudgetError::ConfigError(format!(
                    "unknown config key `{}` (expected one of: {})",
                    other,
                    Self::KEYS.join(", ")
                )))
            }
        }
        Ok(())
    }

    /// Where `export` writes when no explicit path is given.
    pub fn export_target(&self, base: &Path) -> PathBuf {
        self.export_dir
            .clone()
            .unwrap_or_else(|| PathResolver::export_dir_in(base))
    }
}

/// Loads and saves [`Config`] as JSON under the application directory.
pub struct ConfigManager {
    base: PathBuf,
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Self {
        Self::with_base_dir(PathResolver::base_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Self {
        let path = PathResolver::config_file_in(&base);
        Self { base, path }
    }

    /// Reads the config file, falling back to defaults when it is absent.
    pub fn load(&self) -> Result<Config, BudgetError> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            let config = serde_json::from_str(&data)
                .map_err(|err| BudgetError::ConfigError(err.to_string()))?;
            debug!(path = %self.path.display(), "config loaded");
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), BudgetError> {
        ensure_dir(&self.base)?;
        let json = serde_json::to_string_pretty(config)?;
        write_atomic(&self.path, &json)?;
        debug!(path = %self.path.display(), "config saved");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn base_dir(&self) -> &Path {
        &self.base
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Some(true),
        "off" | "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_loads_defaults() {
        let temp = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path().join("home"));
        let config = manager.load().unwrap();
        assert_eq!(config, Config::default());
        assert!(!manager.path().exists());
    }

    #[test]
    fn save_then_load_preserves_values() {
        let temp = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path().join("home"));
        let mut config = Config::default();
        config.set_value("amount_precision", "3").unwrap();
        config.set_value("export_dir", "/tmp/exports").unwrap();
        config.set_value("color", "off").unwrap();

        manager.save(&config).unwrap();
        assert_eq!(manager.load().unwrap(), config);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let temp = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf());
        fs::write(manager.path(), r#"{ "color": false }"#).unwrap();

        let config = manager.load().unwrap();
        assert!(!config.color);
        assert_eq!(config.amount_precision, 2);
        assert!(config.export_dir.is_none());
    }

    #[test]
    fn set_value_rejects_bad_input() {
        let mut config = Config::default();
        assert!(config.set_value("amount_precision", "two").is_err());
        assert!(config.set_value("amount_precision", "12").is_err());
        assert!(config.set_value("color", "maybe").is_err());
        assert!(config.set_value("theme", "dark").is_err());
        assert_eq!(config, Config::default());
    }

    #[test]
    fn export_target_defaults_under_base() {
        let base = PathBuf::from("/data/budget");
        let mut config = Config::default();
        assert_eq!(config.export_target(&base), base.join("exports"));
        config.set_value("export_dir", "/srv/out").unwrap();
        assert_eq!(config.export_target(&base), PathBuf::from("/srv/out"));
    }
}
