use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{BilledError, Result};

pub const SETTINGS_FILE: &str = "settings.json";
pub const SESSION_FILE: &str = "session.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub data_dir: String,
    /// Database file name inside `data_dir`. Empty disables the data store.
    #[serde(default = "default_store")]
    pub store: String,
    /// Owners hidden from the admin review buckets.
    #[serde(default = "default_test_accounts")]
    pub test_accounts: Vec<String>,
    /// Show every owner's reports in the review buckets.
    #[serde(default)]
    pub inspection_mode: bool,
}

fn default_store() -> String {
    "billed.db".to_string()
}

fn default_test_accounts() -> Vec<String> {
    vec![
        "employee@test.tld".to_string(),
        "admin@test.tld".to_string(),
    ]
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir().to_string_lossy().to_string(),
            store: default_store(),
            test_accounts: default_test_accounts(),
            inspection_mode: false,
        }
    }
}

impl Settings {
    pub fn data_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir)
    }

    /// Path of the report database, or `None` when no store is configured.
    pub fn store_path(&self) -> Option<PathBuf> {
        let name = self.store.trim();
        if name.is_empty() {
            None
        } else {
            Some(self.data_path().join(name))
        }
    }

    pub fn session_path(&self) -> PathBuf {
        self.data_path().join(SESSION_FILE)
    }
}

pub fn default_config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("billed")
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Documents")
        .join("billed")
}

pub fn load_settings(config_dir: &Path) -> Settings {
    let path = config_dir.join(SETTINGS_FILE);
    if path.exists() {
        let content = std::fs::read_to_string(&path).unwrap_or_default();
        serde_json::from_str(&content).unwrap_or_default()
    } else {
        Settings::default()
    }
}

pub fn save_settings(config_dir: &Path, settings: &Settings) -> Result<()> {
    std::fs::create_dir_all(config_dir)?;
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| BilledError::Settings(e.to_string()))?;
    std::fs::write(config_dir.join(SETTINGS_FILE), format!("{json}\n"))?;
    Ok(())
}

pub fn shellexpand_path(path: &str) -> String {
    if path.starts_with('~') {
        if let Some(home) = dirs::home_dir() {
            return path.replacen('~', &home.to_string_lossy(), 1);
        }
    }
    std::fs::canonicalize(path)
        .unwrap_or_else(|_| PathBuf::from(path))
        .to_string_lossy()
        .to_string()
}
