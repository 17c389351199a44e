//! Configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

use conversation::DEFAULT_DECK_FILE_NAME;
use database::Database;

/// Bot configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Telegram bot token.
    pub token: String,
    /// SQLite database URL.
    pub database_url: String,
    /// Directory that must exist before the database file can be created.
    pub database_dir: Option<PathBuf>,
    /// Maximum pooled connections.
    pub pool_size: u32,
    /// Attachment name of delivered decks.
    pub deck_file_name: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `TELOXIDE_TOKEN` | Telegram bot token | (required) |
    /// | `SQLITE_PATH` | Database file path or `sqlite:` URL | `./data/slayd.db` |
    /// | `SQLITE_POOL_SIZE` | Maximum pooled connections | `20` |
    /// | `DECK_FILE_NAME` | Attachment name of delivered decks | `slayd.pptx` |
    pub fn from_env() -> Result<Self, ConfigError> {
        let token = env::var("TELOXIDE_TOKEN").map_err(|_| ConfigError::MissingToken)?;

        let path = env::var("SQLITE_PATH").unwrap_or_else(|_| "./data/slayd.db".to_string());
        let (database_url, database_dir) = database_location(&path);

        let pool_size = match env::var("SQLITE_POOL_SIZE") {
            Ok(raw) => parse_pool_size(&raw)?,
            Err(_) => Database::DEFAULT_POOL_SIZE,
        };

        let deck_file_name =
            env::var("DECK_FILE_NAME").unwrap_or_else(|_| DEFAULT_DECK_FILE_NAME.to_string());

        Ok(Self {
            token,
            database_url,
            database_dir,
            pool_size,
            deck_file_name,
        })
    }
}

/// Turn `SQLITE_PATH` into a connection URL.
///
/// Plain paths are opened read-write-create; `sqlite:` URLs are used as given.
fn database_location(path: &str) -> (String, Option<PathBuf>) {
    if path.starts_with("sqlite:") {
        return (path.to_string(), None);
    }

    let dir = PathBuf::from(path)
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .map(PathBuf::from);
    (format!("sqlite:{}?mode=rwc", path), dir)
}

fn parse_pool_size(raw: &str) -> Result<u32, ConfigError> {
    match raw.trim().parse::<u32>() {
        Ok(size) if size > 0 => Ok(size),
        _ => Err(ConfigError::InvalidPoolSize(raw.to_string())),
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("TELOXIDE_TOKEN environment variable is required")]
    MissingToken,

    #[error("Invalid SQLITE_POOL_SIZE: {0:?}")]
    InvalidPoolSize(String),
}
