use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::model::UserId;

pub const CONFIG_FILE_NAME: &str = "config.json";
const DATA_DIR_NAME: &str = ".calorie_tracker";

/// `~/.calorie_tracker`
pub fn default_data_dir() -> Result<PathBuf> {
    let home_dir = dirs::home_dir().ok_or_else(|| anyhow!("Could not determine home directory"))?;
    Ok(home_dir.join(DATA_DIR_NAME))
}

/// Settings read from `config.json` in the data directory.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Owner used when no `--user` is passed.
    pub default_user: Option<String>,
    pub log_level: String,
    /// Day count of multi-day summary tables.
    pub days_in_table: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_user: None,
            log_level: "info".to_string(),
            days_in_table: 7,
        }
    }
}

impl AppConfig {
    /// Loads `config.json` from `dir`; a missing file yields the defaults.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE_NAME);
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
        let config: AppConfig =
            serde_json::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, dir: &Path) -> Result<()> {
        fs::create_dir_all(dir)?;
        let content = serde_json::to_string_pretty(self)?;
        fs::write(dir.join(CONFIG_FILE_NAME), content)?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.days_in_table == 0 {
            return Err(anyhow!("days_in_table must be at least 1"));
        }
        Ok(())
    }

    /// Picks the owner: explicit flag, then config, then `$USER`.
    pub fn resolve_user(&self, explicit: Option<&str>) -> Result<UserId> {
        let name = explicit
            .map(str::to_string)
            .or_else(|| self.default_user.clone())
            .or_else(|| std::env::var("USER").ok())
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(|| anyhow!("No user given; pass --user or set default_user in {}", CONFIG_FILE_NAME))?;
        Ok(UserId::new(name.trim()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(dir.path()).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.days_in_table, 7);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), r#"{ "default_user": "sam" }"#).unwrap();
        let config = AppConfig::load(dir.path()).unwrap();
        assert_eq!(config.default_user.as_deref(), Some("sam"));
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            default_user: Some("kim".to_string()),
            log_level: "debug".to_string(),
            days_in_table: 14,
        };
        config.save(dir.path()).unwrap();
        assert_eq!(AppConfig::load(dir.path()).unwrap(), config);
    }

    #[test]
    fn test_zero_days_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), r#"{ "days_in_table": 0 }"#).unwrap();
        assert!(AppConfig::load(dir.path()).is_err());
    }

    #[test]
    fn test_explicit_user_wins() {
        let config = AppConfig {
            default_user: Some("kim".to_string()),
            ..AppConfig::default()
        };
        assert_eq!(config.resolve_user(Some("lee")).unwrap(), UserId::new("lee"));
        assert_eq!(config.resolve_user(None).unwrap(), UserId::new("kim"));
    }
}
