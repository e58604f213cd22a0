//! Command parser - Splits `<prefix><name> <args...>` messages

use regex_lite::Regex;

use crate::application::errors::PluginError;

/// A parsed command invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub name: String,
    pub args: Vec<String>,
    /// Everything after the command name, whitespace preserved inside
    pub rest: String,
}

/// Parses prefixed commands out of message text
pub struct CommandParser {
    pattern: Regex,
}

impl CommandParser {
    pub fn new(prefix: impl Into<String>) -> Result<Self, PluginError> {
        let prefix = prefix.into();
        let pattern = Regex::new(&format!(
            r"(?s)^\s*{}([A-Za-z0-9_-]+)(?:\s+(.*))?$",
            regex_lite::escape(&prefix)
        ))
        .map_err(|e| PluginError::Load(format!("Invalid command prefix '{}': {}", prefix, e)))?;

        Ok(Self { pattern })
    }

    pub fn parse(&self, text: &str) -> Option<Command> {
        let caps = self.pattern.captures(text)?;
        let name = caps.get(1)?.as_str().to_lowercase();
        let rest = caps.get(2).map(|m| m.as_str().trim()).unwrap_or("").to_string();
        let args = rest.split_whitespace().map(str::to_string).collect();

        Some(Command { name, args, rest })
    }

    /// Parse `text` and keep it only when it invokes `name`
    pub fn parse_named(&self, text: &str, name: &str) -> Option<Command> {
        self.parse(text).filter(|cmd| cmd.name == name)
    }
}
