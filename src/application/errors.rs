//! Application layer errors

use thiserror::Error;

/// General bot errors
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Plugin error: {0}")]
    Plugin(#[from] PluginError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Failures of the chat transport (send/edit/delete)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("{operation} failed: {reason}")]
    Operation {
        operation: &'static str,
        reason: String,
    },

    #[error("Transport closed")]
    Closed,
}

impl TransportError {
    pub fn send(reason: impl Into<String>) -> Self {
        Self::Operation { operation: "send", reason: reason.into() }
    }

    pub fn edit(reason: impl Into<String>) -> Self {
        Self::Operation { operation: "edit", reason: reason.into() }
    }

    pub fn delete(reason: impl Into<String>) -> Self {
        Self::Operation { operation: "delete", reason: reason.into() }
    }
}

/// Plugin loading and execution errors
#[derive(Error, Debug)]
pub enum PluginError {
    #[error("Failed to load plugin: {0}")]
    Load(String),

    #[error("Plugin '{0}' already registered")]
    Duplicate(String),

    #[error("Handler failed: {0}")]
    Handler(String),
}

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        StorageError::Serialization(e.to_string())
    }
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Parse error: {0}")]
    Parse(String),
}
