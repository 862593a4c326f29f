//! Command model: declarations, validated commands and the registry tree.
//!
//! - `action`: handler type and its completion contract
//! - `parameter`: positional parameters and type coercion
//! - `option`: boolean flag declarations
//! - `spec`: `CommandSpec` builder, `CommandEntry` shorthand, canonical `Command`
//! - `registry`: name/alias lookup at one nesting level

mod action;
mod option;
mod parameter;
mod registry;
mod spec;

pub use action::{Action, ActionFuture, ActionOutcome};
pub use option::CommandOption;
pub use parameter::{Converter, ParamKind, Parameter};
pub use registry::Registry;
pub use spec::{Command, CommandEntry, CommandSpec};
