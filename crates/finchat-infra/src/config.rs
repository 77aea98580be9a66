//! Configuration loader for finchat.
//!
//! Reads `config.toml` from the data directory (`~/.finchat/` by default)
//! and deserializes it into [`ChatbotConfig`]. Falls back to defaults when
//! the file is missing or malformed. An explicitly named file is stricter:
//! problems with it are returned as errors.

use std::path::{Path, PathBuf};

use finchat_types::config::ChatbotConfig;
use finchat_types::error::ConfigError;

/// Name of the config file inside the data directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "FINCHAT_DATA_DIR";

/// Environment variable overriding `base_url`.
pub const BASE_URL_ENV: &str = "FINCHAT_BASE_URL";

/// Resolve the data directory.
///
/// `FINCHAT_DATA_DIR` wins, then `~/.finchat`, then `./.finchat`.
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".finchat");
    }

    PathBuf::from(".finchat")
}

/// Load configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`ChatbotConfig::default()`].
/// - If the file exists but fails to read or parse, logs a warning and returns the default.
pub async fn load_config(data_dir: &Path) -> ChatbotConfig {
    let config_path = data_dir.join(CONFIG_FILE_NAME);

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return ChatbotConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return ChatbotConfig::default();
        }
    };

    match toml::from_str::<ChatbotConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            ChatbotConfig::default()
        }
    }
}

/// Load configuration from an explicitly chosen file.
pub async fn load_config_file(path: &Path) -> Result<ChatbotConfig, ConfigError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

    toml::from_str(&content).map_err(|e| ConfigError::Parse {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Apply `base_url` overrides. The command-line flag beats the environment.
pub fn apply_base_url_override(
    config: &mut ChatbotConfig,
    from_env: Option<String>,
    from_flag: Option<String>,
) {
    if let Some(base_url) = from_flag.or(from_env).filter(|url| !url.trim().is_empty()) {
        config.base_url = base_url;
    }
}

/// Read the `FINCHAT_BASE_URL` override, if set.
pub fn base_url_from_env() -> Option<String> {
    std::env::var(BASE_URL_ENV).ok()
}
