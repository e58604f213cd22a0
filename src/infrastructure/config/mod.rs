//! Application configuration (YAML) and environment overrides
//!
//! This is the bootstrap config of the process. Per-place plugin settings
//! live in the data file instead, see `application::config`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::application::errors::ConfigError;
use crate::domain::entities::{Channel, Guild};

/// Bot configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct AppConfig {
    pub bot: BotConfig,
    #[serde(default)]
    pub plugins: PluginsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub adapters: AdaptersConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct BotConfig {
    pub name: String,
    /// JSON data file holding the token and the layered plugin settings
    pub data_file: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct PluginsConfig {
    /// Plugins to load, in dispatch order
    pub load: Vec<String>,
}

impl Default for PluginsConfig {
    fn default() -> Self {
        Self {
            load: vec!["echo".to_string(), "ping".to_string()],
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct AdaptersConfig {
    #[serde(default)]
    pub console: ConsoleConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ConsoleConfig {
    pub enabled: bool,
    /// Guild the console channel belongs to; a DM channel when unset
    pub guild_id: Option<String>,
    pub channel_id: String,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            guild_id: Some("console-guild".to_string()),
            channel_id: "console".to_string(),
        }
    }
}

impl ConsoleConfig {
    /// The channel console input is posted in
    pub fn channel(&self) -> Channel {
        match &self.guild_id {
            Some(guild_id) => Channel::text(&self.channel_id, Guild::new(guild_id)),
            None => Channel::dm(&self.channel_id),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bot: BotConfig {
                name: "herald-bot".to_string(),
                data_file: PathBuf::from("data.json"),
            },
            plugins: PluginsConfig::default(),
            logging: LoggingConfig::default(),
            adapters: AdaptersConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config: {}", e)))?;

        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self)
            .map_err(|e| ConfigError::Parse(format!("Failed to serialize config: {}", e)))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bot.data_file.as_os_str().is_empty() {
            return Err(ConfigError::MissingField("bot.data-file".to_string()));
        }
        if self.adapters.console.enabled && self.adapters.console.channel_id.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "adapters.console.channel-id must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Apply `HERALD_DATA_FILE` and `HERALD_LOG` from the environment
    pub fn apply_env(&mut self) {
        if let Ok(path) = std::env::var("HERALD_DATA_FILE") {
            self.bot.data_file = PathBuf::from(path);
        }

        if let Ok(level) = std::env::var("HERALD_LOG") {
            self.logging.level = level;
        }
    }

    pub fn load_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }
}
