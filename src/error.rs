//! Error types for command dispatch
//!
//! Every failure the engine can produce is a variant of [`CliError`]. Errors
//! bubble up through the recursive dispatch chain unchanged; the host decides
//! how to present them and which exit status to use.

use thiserror::Error;

/// Main error type for building and dispatching a command tree
#[derive(Error, Debug)]
pub enum CliError {
    /// The tree was built with an invalid shape or invalid descriptors
    #[error("Configuration error in command '{command}': {message}")]
    Configuration { command: String, message: String },

    /// No child matched the selector token, or no selector was given
    #[error("{}", describe_selector(.command, .selector.as_deref()))]
    UnknownSubcommand {
        command: String,
        selector: Option<String>,
    },

    /// A required positional slot had neither a token nor a default
    #[error("missing required argument {name}")]
    MissingArgument { command: String, name: String },

    /// A flag token could not be parsed or coerced
    #[error(transparent)]
    FlagParse(#[from] FlagParseError),

    /// Error returned by an action, carried unmodified
    #[error(transparent)]
    Action(anyhow::Error),
}

fn describe_selector(command: &str, selector: Option<&str>) -> String {
    match selector {
        None => "must specify a sub-command, try 'help'".to_string(),
        Some(name) => format!("invalid sub-command name '{name}' for '{command}'"),
    }
}

/// Flag scanning and coercion failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FlagParseError {
    #[error("flag provided but not defined: -{flag} (command '{command}')")]
    Unknown { command: String, flag: String },

    #[error("flag needs an argument: -{flag}")]
    MissingValue { flag: String },

    #[error("invalid value '{value}' for flag -{flag}: expected an integer")]
    InvalidInteger { flag: String, value: String },

    #[error("invalid value '{value}' for flag -{flag}: possible values are {}", .allowed.join(", "))]
    NotAllowed {
        flag: String,
        value: String,
        allowed: Vec<String>,
    },
}

/// Sentinel an action returns to request a specific process exit status
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("0x{0:x}")]
pub struct ExitError(pub u32);

impl ExitError {
    /// Returned when the process should exit immediately
    pub const DEAD: ExitError = ExitError(0xdece_a5ed);

    /// Process exit status for this sentinel
    ///
    /// Only the low byte survives on most platforms; a low byte of zero is
    /// reported as 1 so the sentinel never reads as success.
    pub fn code(self) -> u8 {
        match (self.0 & 0xff) as u8 {
            0 => 1,
            code => code,
        }
    }
}

impl CliError {
    /// Create a new configuration error
    pub fn configuration(command: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Configuration {
            command: command.into(),
            message: message.into(),
        }
    }

    /// Create an error for a missing sub-command selector
    pub fn missing_subcommand(command: impl Into<String>) -> Self {
        Self::UnknownSubcommand {
            command: command.into(),
            selector: None,
        }
    }

    /// Create an error for a selector that matched no child
    pub fn unknown_subcommand(command: impl Into<String>, selector: impl Into<String>) -> Self {
        Self::UnknownSubcommand {
            command: command.into(),
            selector: Some(selector.into()),
        }
    }

    /// Create a new missing argument error
    pub fn missing_argument(command: impl Into<String>, name: impl Into<String>) -> Self {
        Self::MissingArgument {
            command: command.into(),
            name: name.into(),
        }
    }

    /// Whether the error stems from bad user input rather than the tree or an action
    pub fn is_usage(&self) -> bool {
        matches!(
            self,
            Self::UnknownSubcommand { .. } | Self::MissingArgument { .. } | Self::FlagParse(_)
        )
    }

    /// Exit status a host should use for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Action(err) => err.downcast_ref::<ExitError>().map_or(1, |exit| exit.code()),
            _ if self.is_usage() => 2,
            _ => 1,
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, CliError>;
