//! Error types for command registration and line parsing.

use thiserror::Error;

/// Misconfiguration caught when a command is registered, before any input is
/// read.
#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error(
        "command '{command}': required parameter '{label}' follows optional parameter '{optional}'"
    )]
    RequiredAfterOptional {
        command: String,
        label: String,
        optional: String,
    },

    #[error("command '{command}': rest parameter '{label}' must be the last parameter")]
    RestNotLast { command: String, label: String },

    #[error("could not create alias {alias} for {command}. {alias} was already taken")]
    DuplicateAlias { command: String, alias: String },
}

/// Why an input line could not be turned into an invocation.
#[derive(Debug, Error)]
pub enum ParseError {
    /// No registered command matches the first token.
    #[error("unknown command '{0}'")]
    NotFound(String),

    /// The command matched but its flags or positional tokens did not.
    #[error("{reason}")]
    Invalid { reason: String },

    /// A custom converter rejected a token. Reported like an action failure.
    #[error("parameter '{label}' could not convert '{token}': {cause:#}")]
    Conversion {
        label: String,
        token: String,
        cause: anyhow::Error,
    },
}

impl ParseError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        ParseError::Invalid {
            reason: reason.into(),
        }
    }
}
