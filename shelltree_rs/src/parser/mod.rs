//! Line parsing: tokens → command → flags → bound parameters.
//!
//! # Module Structure
//!
//! - [`tokenize`] - quote-aware splitting of the raw line
//! - [`resolve`] - recursive subcommand resolution with parent fallback
//! - [`options`] - flag extraction and validation
//! - [`params`] - arity checks and type coercion
//! - `helpers` - did-you-mean suggestions
//!
//! # Usage
//!
//! ```
//! use shelltree::{Action, CommandSpec, Parameter, Registry};
//! use shelltree::parser::{parse_invocation, tokenize};
//!
//! let mut registry = Registry::new();
//! registry
//!     .insert(
//!         "sum",
//!         CommandSpec::new(Action::noop())
//!             .option("round")
//!             .parameter(Parameter::new("values").number().rest()),
//!     )
//!     .unwrap();
//!
//! let tokens = tokenize("sum 1 @round 2");
//! let invocation = parse_invocation(&tokens, &registry, '@').unwrap();
//! assert_eq!(invocation.command.name(), "sum");
//! assert!(invocation.flags.is_set("round"));
//! assert_eq!(invocation.params.list("values").map(|v| v.len()), Some(2));
//! ```

mod helpers;
pub mod options;
pub mod params;
pub mod resolve;
pub mod tokenize;

use std::sync::Arc;

use tracing::debug;

use crate::command::{Command, Registry};
use crate::error::ParseError;
use crate::types::{Flags, Params};

pub(crate) use helpers::suggest_similar_command;
pub use options::{ExtractedOptions, extract_options};
pub use params::bind_parameters;
pub use resolve::{Resolution, resolve};
pub use tokenize::tokenize;

/// A fully parsed line, ready to dispatch.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub command: Arc<Command>,
    /// The tokens that named the command, e.g. `["do", "something"]`.
    pub path: Vec<String>,
    pub params: Params,
    pub flags: Flags,
}

/// Run resolution, flag extraction and binding over `tokens`.
pub fn parse_invocation(
    tokens: &[String],
    registry: &Registry,
    sigil: char,
) -> Result<Invocation, ParseError> {
    let resolution = resolve(tokens, registry)
        .ok_or_else(|| ParseError::NotFound(tokens.first().cloned().unwrap_or_default()))?;
    let command = resolution.command;
    debug!(
        command = command.name(),
        consumed = resolution.consumed,
        remaining = resolution.remaining.len(),
        "resolved command"
    );

    let ExtractedOptions { flags, remaining } =
        extract_options(command, resolution.remaining, sigil)?;
    let params = bind_parameters(command, &remaining)?;

    Ok(Invocation {
        command: Arc::clone(command),
        path: tokens[..resolution.consumed].to_vec(),
        params,
        flags,
    })
}
