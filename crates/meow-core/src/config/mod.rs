mod channels;
mod defaults;
mod replies;

#[cfg(test)]
mod tests;

pub use channels::*;
pub use replies::*;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::MeowError;
use defaults::*;

/// Environment variable that supplies the completion API key.
pub const API_KEY_ENV: &str = "API_KEY";

/// Top-level meow configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub meow: MeowConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub whatsapp: WhatsAppConfig,
    #[serde(default)]
    pub pairing: PairingConfig,
    #[serde(default)]
    pub diagnostics: DiagnosticsConfig,
    #[serde(default)]
    pub replies: Replies,
}

/// General relay settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeowConfig {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for MeowConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

/// Completion provider settings (OpenAI-compatible completions endpoint).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_openai_base_url")]
    pub base_url: String,
    #[serde(default = "default_completion_model")]
    pub model: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_openai_base_url(),
            model: default_completion_model(),
        }
    }
}

/// Diagnostic commands run for `!status` and `!speedtest`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosticsConfig {
    #[serde(default = "default_status_command")]
    pub status_command: Vec<String>,
    #[serde(default = "default_speedtest_command")]
    pub speedtest_command: Vec<String>,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            status_command: default_status_command(),
            speedtest_command: default_speedtest_command(),
        }
    }
}

impl Config {
    /// Expanded data directory.
    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(shellexpand(&self.meow.data_dir))
    }

    /// Directory for the log file.
    pub fn logs_dir(&self) -> PathBuf {
        self.data_dir().join("logs")
    }

    /// WhatsApp session database path.
    pub fn session_db_path(&self) -> PathBuf {
        if self.whatsapp.session_db.is_empty() {
            self.data_dir().join("whatsapp_session").join("whatsapp.db")
        } else {
            PathBuf::from(shellexpand(&self.whatsapp.session_db))
        }
    }

    /// Fill unset values from the environment.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if self.provider.api_key.is_empty() {
            if let Some(key) = lookup(API_KEY_ENV).filter(|k| !k.is_empty()) {
                self.provider.api_key = key;
            }
        }
    }
}

/// Expand `~` to home directory.
pub fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return format!("{}/{rest}", home.to_string_lossy());
        }
    }
    path.to_string()
}

/// Where a loaded configuration came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    File,
    /// The file did not exist.
    Defaults,
}

/// Load configuration from a TOML file.
///
/// Falls back to defaults if the file does not exist. Environment
/// overrides are applied either way. Nothing is logged here, since this
/// runs before the subscriber is installed; callers report the source.
pub fn load(path: &str) -> Result<(Config, ConfigSource), MeowError> {
    let (mut config, source) = load_file(Path::new(path))?;
    config.apply_env_overrides(|name| std::env::var(name).ok());
    Ok((config, source))
}

fn load_file(path: &Path) -> Result<(Config, ConfigSource), MeowError> {
    if !path.exists() {
        return Ok((Config::default(), ConfigSource::Defaults));
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| MeowError::Config(format!("failed to read {}: {}", path.display(), e)))?;

    let config = toml::from_str(&content)
        .map_err(|e| MeowError::Config(format!("failed to parse config: {}", e)))?;
    Ok((config, ConfigSource::File))
}
