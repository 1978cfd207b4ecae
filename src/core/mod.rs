//! Command dispatch engine
//!
//! Contains the command tree, flag parsing and coercion, positional binding,
//! the layered execution context and the dispatcher that ties them together.

pub mod arguments;
pub mod command;
pub mod context;
pub mod dispatch;
pub mod flags;
pub mod help;
pub mod validate;

pub use arguments::{ArgumentValues, PositionalArgument};
pub use command::{Action, ActionFn, Body, Command, CommandConfig, action_fn};
pub use context::{CancellationToken, Context};
pub use dispatch::Dispatcher;
pub use flags::{Flag, FlagValue, FlagValues, Flags, ParseOutput};
pub use help::{Help, SelfHelp, render_help};
pub use validate::Validator;
