//! Command handlers and their completion contract.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::{self, BoxFuture};

use crate::types::{Flags, Params};

/// Future returned by a deferred action.
pub type ActionFuture = BoxFuture<'static, anyhow::Result<()>>;

/// What an action hands back when invoked.
pub enum ActionOutcome {
    /// The side effect already happened.
    Done(anyhow::Result<()>),
    /// The side effect completes when the future settles.
    Pending(ActionFuture),
}

impl ActionOutcome {
    /// Uniform view for the dispatcher: immediate outcomes become an
    /// already-resolved future.
    pub fn into_future(self) -> ActionFuture {
        match self {
            ActionOutcome::Done(result) => future::ready(result).boxed(),
            ActionOutcome::Pending(fut) => fut,
        }
    }
}

impl From<anyhow::Result<()>> for ActionOutcome {
    fn from(result: anyhow::Result<()>) -> Self {
        ActionOutcome::Done(result)
    }
}

impl fmt::Debug for ActionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionOutcome::Done(result) => f.debug_tuple("Done").field(result).finish(),
            ActionOutcome::Pending(_) => f.write_str("Pending(..)"),
        }
    }
}

type ActionFn = dyn Fn(Params, Flags) -> ActionOutcome + Send + Sync;

/// A command handler, called with the bound parameters and flags.
///
/// ```
/// use shelltree::Action;
///
/// let hello = Action::sync(|params, _flags| {
///     println!("hello {}", params.str("name").unwrap_or("world"));
///     Ok(())
/// });
///
/// let later = Action::future(|_params, _flags| async move {
///     Ok(())
/// });
/// # let _ = (hello, later);
/// ```
#[derive(Clone)]
pub struct Action(Arc<ActionFn>);

impl Action {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Params, Flags) -> ActionOutcome + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Action that completes on return.
    pub fn sync<F>(f: F) -> Self
    where
        F: Fn(Params, Flags) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self::new(move |params, flags| ActionOutcome::Done(f(params, flags)))
    }

    /// Action that completes when the returned future settles.
    pub fn future<F, Fut>(f: F) -> Self
    where
        F: Fn(Params, Flags) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        Self::new(move |params, flags| ActionOutcome::Pending(f(params, flags).boxed()))
    }

    pub fn noop() -> Self {
        Self::sync(|_, _| Ok(()))
    }

    pub fn invoke(&self, params: Params, flags: Flags) -> ActionOutcome {
        (self.0)(params, flags)
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Action(..)")
    }
}
