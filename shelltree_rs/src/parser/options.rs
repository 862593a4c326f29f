//! Lift sigil-prefixed flag tokens out of the positional stream.

use crate::command::Command;
use crate::error::ParseError;
use crate::types::Flags;

/// Flags asserted on the line and the positional tokens left over.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedOptions {
    pub flags: Flags,
    pub remaining: Vec<String>,
}

/// Split `tokens` into flag uses and positional tokens (order preserved).
///
/// Every declared option appears in the result, unset unless asserted. A
/// flag the command does not declare rejects the whole line.
pub fn extract_options(
    command: &Command,
    tokens: &[String],
    sigil: char,
) -> Result<ExtractedOptions, ParseError> {
    let (found, remaining): (Vec<&String>, Vec<&String>) =
        tokens.iter().partition(|token| token.starts_with(sigil));
    let remaining: Vec<String> = remaining.into_iter().cloned().collect();

    if command.options().is_empty() {
        if let Some(flag) = found.first() {
            return Err(ParseError::invalid(format!(
                "'{}' does not take options, got {}",
                command.name(),
                flag
            )));
        }
        return Ok(ExtractedOptions {
            flags: Flags::new(),
            remaining,
        });
    }

    let mut flags = Flags::declared(command.options().iter().map(|o| o.label.as_str()));
    for token in found {
        let label = &token[sigil.len_utf8()..];
        if !flags.assert(label) {
            return Err(ParseError::invalid(format!(
                "unknown option {} for '{}'",
                token,
                command.name()
            )));
        }
    }

    Ok(ExtractedOptions { flags, remaining })
}
