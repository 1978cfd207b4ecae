//! # cmdtree
//!
//! A library for building hierarchical command-line applications: a tree of
//! named commands, each with typed flags, positional arguments, and either an
//! action or further sub-commands.
//!
//! ## Features
//!
//! - Integer, string and enum flags in `-name value` form
//! - Ordered positional arguments with optional defaults
//! - Exact-match sub-command selection
//! - Layered, immutable execution context handed to actions
//! - Tree shape checked when commands are built, names checked by the dispatcher
//!
//! ## Example
//!
//! ```no_run
//! use cmdtree::core::{CommandConfig, Dispatcher, Flag, PositionalArgument, Validator};
//!
//! let say = CommandConfig::new("say")
//!     .flag("voice", Flag::string("default", "who is speaking"))
//!     .argument(PositionalArgument::required("input"))
//!     .action_fn(|ctx, _| {
//!         println!("{}: {}", ctx.string_flag("voice"), ctx.argument("input"));
//!         Ok(())
//!     })
//!     .build()?;
//! let app = CommandConfig::new("app").child(say).build()?;
//!
//! let dispatcher = Dispatcher::new(app, &Validator::new()?)?;
//! dispatcher.dispatch(["say", "-voice", "robot", "hello"])?;
//! # Ok::<(), cmdtree::error::CliError>(())
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod error;

pub use crate::core::{Command, CommandConfig, Context, Dispatcher, Flag, Flags};
pub use error::{CliError, ExitError, Result};

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging with appropriate verbosity
///
/// `RUST_LOG` takes precedence when set. Logs go to stderr so they never mix
/// with action output.
pub fn setup_logging(debug: bool) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if debug {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("warn")
        }
    });

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(true)
                .compact(),
        )
        .with(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}
