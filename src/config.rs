use std::path::PathBuf;
use std::sync::OnceLock;

use crate::error::{Error, Result};

static DATA_DIR: OnceLock<PathBuf> = OnceLock::new();

pub const API_KEY_VAR: &str = "YOUTUBE_API_KEY";
pub const API_BASE_URL_VAR: &str = "YOUTUBE_API_BASE_URL";
pub const DEFAULT_API_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

/// Get the base data directory (~/.channel-tally/)
pub fn data_dir() -> &'static PathBuf {
    DATA_DIR.get_or_init(|| {
        std::env::var("CHANNEL_TALLY_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join(".channel-tally")
            })
    })
}

/// Get the .env file path
pub fn env_file_path() -> PathBuf {
    data_dir().join(".env")
}

/// Load environment variables from the data directory's .env file
pub fn load_env() {
    let env_path = env_file_path();
    if env_path.exists() {
        let _ = dotenvy::from_path(&env_path);
    } else {
        // Try current directory as fallback
        let _ = dotenvy::dotenv();
    }
}

/// Get the YouTube Data API key from the environment
pub fn youtube_api_key() -> Option<String> {
    std::env::var(API_KEY_VAR).ok()
}

/// Get the YouTube Data API base URL
pub fn api_base_url() -> String {
    std::env::var(API_BASE_URL_VAR).unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string())
}

/// Pick the API key: an explicit flag wins over the environment
pub fn resolve_api_key(flag: Option<String>) -> Result<String> {
    let key = flag.or_else(youtube_api_key).ok_or(Error::ApiKeyMissing)?;
    validate_api_key(&key)?;
    Ok(key.trim().to_string())
}

/// Reject empty credentials
pub fn validate_api_key(key: &str) -> Result<()> {
    if key.trim().is_empty() {
        return Err(Error::ApiKeyMissing);
    }
    Ok(())
}

/// Create necessary directories if they don't exist
pub fn ensure_directories() -> Result<()> {
    std::fs::create_dir_all(data_dir())?;
    Ok(())
}

/// Render the .env line that persists the API key
pub fn api_key_env_line(api_key: &str) -> String {
    format!("{}={}\n", API_KEY_VAR, api_key.trim())
}
