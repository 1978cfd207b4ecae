//! Dispatcher: entry point that owns a validated command tree

use crate::core::{
    command::Command,
    context::{CancellationToken, Context},
    validate::Validator,
};
use crate::error::Result;
use tracing::{debug, instrument};

/// Owns a validated command tree and resolves token sequences against it
///
/// The tree is read-only after construction, so one dispatcher can serve any
/// number of calls, including concurrent ones from different threads. Every
/// call builds its own [`Context`].
#[derive(Debug)]
pub struct Dispatcher {
    root: Command,
}

impl Dispatcher {
    /// Accept `root` after checking the whole tree with `validator`
    pub fn new(root: Command, validator: &Validator) -> Result<Self> {
        validator.validate(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Command {
        &self.root
    }

    /// Dispatch the tokens that followed the program name
    pub fn dispatch<I, S>(&self, tokens: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dispatch_with(&Context::new(), tokens)
    }

    /// Dispatch with a cancellation token visible to the action
    pub fn dispatch_cancellable<I, S>(&self, cancellation: CancellationToken, tokens: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dispatch_with(&Context::new().with_cancellation(cancellation), tokens)
    }

    /// Dispatch on top of a caller-supplied context
    #[instrument(skip_all, fields(root = %self.root.name()))]
    pub fn dispatch_with<I, S>(&self, ctx: &Context<'_>, tokens: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tokens: Vec<String> = tokens.into_iter().map(Into::into).collect();
        debug!("Dispatching {} token(s)", tokens.len());
        self.root.execute(ctx, &tokens)
    }
}
