//! Configuration file support for shelltree.
//!
//! Everything has a default; a TOML file only needs the keys it changes:
//!
//! ```toml
//! delimiter = "db>"
//! option_sigil = "@"
//! name = "dbshell"
//! ```

use std::path::Path;

use serde::Deserialize;
use tracing::warn;

/// Session configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Prompt written before each line is read. A single space follows it.
    pub delimiter: String,
    /// Leading character that marks a flag token (`@force`).
    pub option_sigil: char,
    /// First token that renders help instead of running a command.
    pub help_command: String,
    /// Printed when the first token matches no command.
    pub invalid_command_message: String,
    /// Title shown at the top of the command overview.
    pub name: Option<String>,
    /// Shown next to `name` in the overview title.
    pub version: Option<String>,
    /// Free text shown under the overview title.
    pub info: Option<String>,
    /// Offer a close command name when the first token is unknown.
    pub suggest_similar: bool,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            delimiter: "->".to_string(),
            option_sigil: '@',
            help_command: "help".to_string(),
            invalid_command_message: "Invalid Command".to_string(),
            name: None,
            version: None,
            info: None,
            suggest_similar: true,
        }
    }
}

impl ShellConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load config from a specific path.
    /// Returns default config if the file doesn't exist or is invalid.
    pub fn load_from_path(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match Self::from_toml_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "failed to parse config, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read config, using defaults");
                Self::default()
            }
        }
    }
}
