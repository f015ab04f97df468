use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Server address (e.g., "0.0.0.0:9999")
    #[serde(default = "default_addr")]
    pub addr: String,
    /// Root directory for public assets; uploaded images live in
    /// `<data_dir>/public/img`
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// URL scheme used when building Content-Location headers
    #[serde(default = "default_scheme")]
    pub scheme: String,
    /// Maximum size of an uploaded image in bytes (default: 2MB)
    #[serde(default = "default_max_image_size")]
    pub max_image_size: usize,
    /// Logging configuration
    #[serde(default)]
    pub log: LogConfig,
    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LogConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file
    #[serde(default = "default_db_file")]
    pub file: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            file: default_db_file(),
        }
    }
}

// Default value functions
fn default_addr() -> String {
    "0.0.0.0:9999".to_string()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_scheme() -> String {
    "http".to_string()
}

fn default_max_image_size() -> usize {
    2 * 1024 * 1024 // 2MB
}

fn default_db_file() -> PathBuf {
    PathBuf::from("./data/staffdir.db")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            addr: default_addr(),
            data_dir: default_data_dir(),
            scheme: default_scheme(),
            max_image_size: default_max_image_size(),
            log: LogConfig::default(),
            database: DatabaseConfig::default(),
        }
    }
}

impl DatabaseConfig {
    /// Generate database connection URL
    pub fn connection_url(&self) -> String {
        format!("sqlite://{}?mode=rwc", self.file.display())
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Directory that uploaded image files are stored in
    pub fn image_dir(&self) -> PathBuf {
        self.data_dir.join("public").join("img")
    }
}
