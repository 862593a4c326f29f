//! # shelltree
//!
//! **Embeddable command interpreter** - register a tree of commands, then let
//! a prompt loop read lines, resolve them and run their actions.
//!
//! ## Features
//!
//! - **Nested commands** - subcommands at any depth, falling back to the
//!   deepest match when a token is not a subcommand
//! - **Aliases** - alternate names, checked for collisions at registration
//! - **Flags** - `@name` tokens anywhere on the line, validated per command
//! - **Typed parameters** - required, optional and rest arity with string,
//!   number, boolean or custom coercion
//! - **Uniform actions** - immediate or async handlers, awaited the same way;
//!   failures and panics are reported and the loop continues
//! - **Help** - overview and per-command usage, pluggable renderer
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use shelltree::{Action, CommandSpec, Parameter, Shell};
//! use tokio::io::BufReader;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let mut shell = Shell::new();
//! shell
//!     .add_command(
//!         "sum",
//!         CommandSpec::new(Action::sync(|params, _| {
//!             let total: f64 = params
//!                 .list("values")
//!                 .unwrap_or_default()
//!                 .iter()
//!                 .filter_map(|v| v.as_number())
//!                 .sum();
//!             println!("{total}");
//!             Ok(())
//!         }))
//!         .parameter(Parameter::new("values").number().rest()),
//!     )?
//!     .add_exit_command("exit")?;
//!
//! shell
//!     .show(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Parsing Without a Session
//!
//! ```rust
//! use shelltree::{Action, CommandSpec, Parameter, Registry};
//! use shelltree::parser::{parse_invocation, tokenize};
//!
//! let mut registry = Registry::new();
//! registry
//!     .insert(
//!         "greet",
//!         CommandSpec::new(Action::noop())
//!             .option("loud")
//!             .parameter(Parameter::new("name")),
//!     )
//!     .unwrap();
//!
//! let tokens = tokenize(r#"greet "Ada Lovelace" @loud"#);
//! let invocation = parse_invocation(&tokens, &registry, '@').unwrap();
//! assert_eq!(invocation.params.str("name"), Some("Ada Lovelace"));
//! assert!(invocation.flags.is_set("loud"));
//! ```

// ============================================================================
// Core Modules
// ============================================================================

/// Command declarations, validated commands and the name/alias registry.
///
/// # Key Types
///
/// - [`CommandSpec`] - builder for a full command declaration
/// - [`CommandEntry`] - a full declaration or a bare action
/// - [`Command`] - validated, registered command
/// - [`Registry`] - one level of the command tree
pub mod command;

/// Session settings and TOML loading.
pub mod config;

/// Action invocation with uniform completion.
pub mod dispatch;

/// Registration and parse errors.
pub mod error;

/// Help rendering.
pub mod help;

/// Tokenizing, command resolution, flag extraction and parameter binding.
pub mod parser;

/// The interactive session.
pub mod shell;

/// Parsed values handed to actions.
pub mod types;

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use command::{
    Action, ActionFuture, ActionOutcome, Command, CommandEntry, CommandOption, CommandSpec,
    Converter, ParamKind, Parameter, Registry,
};
pub use config::ShellConfig;
pub use error::{ParseError, RegistrationError};
pub use help::{HelpRenderer, TableHelp};
pub use parser::Invocation;
pub use shell::{LineOutcome, SessionState, Shell, ShellHandle};
pub use types::{Flags, Params, Value};
