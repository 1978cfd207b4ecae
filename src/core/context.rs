//! Execution context handed to actions
//!
//! A [`Context`] is a stack of immutable layers. Every dispatch level borrows
//! its parent's context and adds a new layer on top with the values it
//! resolved; nothing below is ever mutated. Lookups read the innermost layer
//! first and fall back outward, so a flag declared on the root is visible to
//! an action several levels down unless a nearer command shadows it.

use crate::core::{
    arguments::ArgumentValues,
    command::Command,
    flags::{FlagValue, FlagValues},
};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Cooperative cancellation signal shared between a host and its actions
///
/// The dispatcher only forwards it; actions decide when to look at it.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Layered bag of resolved values for one dispatch call
#[derive(Debug, Default)]
pub struct Context<'a> {
    parent: Option<&'a Context<'a>>,
    command: Option<&'a Command>,
    flags: FlagValues,
    arguments: ArgumentValues,
    cancellation: Option<CancellationToken>,
}

impl<'a> Context<'a> {
    /// Empty root context
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a cancellation token to this layer
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Layer resolved flag values for `command` on top of this context
    pub fn with_command<'b>(&'b self, command: &'b Command, flags: FlagValues) -> Context<'b> {
        Context {
            parent: Some(self),
            command: Some(command),
            flags,
            arguments: ArgumentValues::new(),
            cancellation: None,
        }
    }

    /// Layer arbitrary values on top of this context
    ///
    /// Dispatch uses this for bound positional values; it also lets an action
    /// be exercised without a command tree.
    pub fn with_values<'b>(&'b self, flags: FlagValues, arguments: ArgumentValues) -> Context<'b> {
        Context {
            parent: Some(self),
            command: None,
            flags,
            arguments,
            cancellation: None,
        }
    }

    fn layers(&self) -> impl Iterator<Item = &Context<'a>> {
        std::iter::successors(Some(self), |ctx| ctx.parent)
    }

    /// Nearest resolved value for a flag
    pub fn flag(&self, name: &str) -> Option<&FlagValue> {
        self.layers().find_map(|ctx| ctx.flags.get(name))
    }

    /// String view of a flag; "" when absent
    pub fn string_flag(&self, name: &str) -> String {
        self.flag(name).map(ToString::to_string).unwrap_or_default()
    }

    /// Integer view of a flag; 0 when absent or not an integer
    pub fn int_flag(&self, name: &str) -> i64 {
        self.flag(name).and_then(FlagValue::as_int).unwrap_or(0)
    }

    /// Nearest bound value for a positional argument; "" when absent
    pub fn argument(&self, name: &str) -> &str {
        self.layers()
            .find(|ctx| ctx.arguments.contains(name))
            .map_or("", |ctx| ctx.arguments.get(name))
    }

    /// All visible flag values, inner layers overriding outer ones
    pub fn flags(&self) -> FlagValues {
        let layers: Vec<_> = self.layers().collect();
        let mut merged = FlagValues::new();
        for ctx in layers.into_iter().rev() {
            merged.extend_from(&ctx.flags);
        }
        merged
    }

    /// All visible positional values, inner layers overriding outer ones
    pub fn arguments(&self) -> ArgumentValues {
        let layers: Vec<_> = self.layers().collect();
        let mut merged = ArgumentValues::new();
        for ctx in layers.into_iter().rev() {
            merged.extend_from(&ctx.arguments);
        }
        merged
    }

    /// Command whose action is running, if dispatched through a tree
    pub fn command(&self) -> Option<&Command> {
        self.commands().next()
    }

    /// Invoking commands, innermost first
    pub fn commands(&self) -> impl Iterator<Item = &'a Command> {
        self.layers().filter_map(|ctx| ctx.command)
    }

    /// Cancellation token supplied by the host, if any
    pub fn cancellation(&self) -> Option<&CancellationToken> {
        self.layers().find_map(|ctx| ctx.cancellation.as_ref())
    }

    /// Whether the host has requested cancellation
    pub fn is_cancelled(&self) -> bool {
        self.cancellation().is_some_and(CancellationToken::is_cancelled)
    }
}
