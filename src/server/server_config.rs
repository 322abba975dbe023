use std::{fs, net::SocketAddr, path::{Path, PathBuf}};
use serde::{Serialize, Deserialize};
use toml;
use anyhow::{self, Context};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory the wallet is imported from at startup and exported to.
    pub dump_dir: PathBuf,
    /// Maximum number of payments per history file.
    #[serde(default = "StorageConfig::default_history_records")]
    pub history_records: usize,
}

impl StorageConfig {
    fn default_history_records() -> usize {
        100
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub bind: SocketAddr,
    pub storage: StorageConfig,
}

impl AppConfig {
    pub fn read(filepath: impl AsRef<Path>) -> anyhow::Result<Self> {
        let file_content = fs::read_to_string(filepath)
            .with_context(|| "failed to read config file")?;
        Self::parse(&file_content)
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let config = toml::from_str(content)
            .with_context(|| "failed to parse config file")?;
        return Ok(config);
    }
}
