//! Command-line interface module
//!
//! Host argument parsing, the demo command tree and error reporting.

pub mod args;
pub mod commands;

pub use args::{Args, parse_args};
pub use commands::{build_tree, execute, report_fatal};
