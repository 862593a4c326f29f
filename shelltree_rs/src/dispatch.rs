//! Invoke a parsed command's action and wait for it to settle.
//!
//! Immediate and deferred actions are awaited the same way. Errors and
//! panics come back as `Err` so the session can report them and move on.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use anyhow::anyhow;
use futures::FutureExt;
use tracing::debug;

use crate::command::Command;
use crate::types::{Flags, Params};

/// Run `command`'s action once with the bound parameters and flags.
pub async fn dispatch(command: &Command, params: Params, flags: Flags) -> anyhow::Result<()> {
    debug!(
        command = command.name(),
        params = %params.to_json(),
        flags = ?flags,
        "dispatching"
    );

    let action = command.action();
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| action.invoke(params, flags)))
        .map_err(|payload| panicked(command, payload.as_ref()))?;

    AssertUnwindSafe(outcome.into_future())
        .catch_unwind()
        .await
        .map_err(|payload| panicked(command, payload.as_ref()))?
}

fn panicked(command: &Command, payload: &(dyn Any + Send)) -> anyhow::Error {
    let message = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    anyhow!("command '{}' panicked: {}", command.name(), message)
}
