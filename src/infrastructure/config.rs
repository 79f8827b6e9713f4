//! Application configuration

use std::env;
use std::path::PathBuf;

use anyhow::Result;

/// Application configuration loaded from environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Directory holding faction data files (one JSON document per faction)
    pub data_dir: PathBuf,
    /// Directory holding saved army lists (one JSON record per list)
    pub lists_dir: PathBuf,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let data_dir = PathBuf::from(
            env::var("ROSTERFORGE_DATA_DIR").unwrap_or_else(|_| "./data/factions".to_string()),
        );
        let lists_dir = PathBuf::from(
            env::var("ROSTERFORGE_LISTS_DIR").unwrap_or_else(|_| "./data/lists".to_string()),
        );
        Ok(Self {
            data_dir,
            lists_dir,
        })
    }
}
