//! Host argument parsing for the demo binary
//!
//! clap only handles the host's own switches. Everything after them is kept
//! verbatim and handed to the command tree.

use clap::Parser;

/// cmdtree - hierarchical command dispatch demo
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(name = "cmdtree", disable_help_flag = true, disable_version_flag = true)]
pub struct Args {
    /// Enable debug output
    #[arg(long)]
    pub debug: bool,

    /// Tokens dispatched to the command tree
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub tokens: Vec<String>,
}

/// Parse command line arguments
pub fn parse_args() -> Args {
    Args::parse()
}
