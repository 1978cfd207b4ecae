//! Configuration for the demo host
//!
//! Collects the host settings derived from the process arguments.

use crate::{cli::Args, error::CliError};
use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Enable debug logging
    pub debug: bool,
    /// Name of the root command
    pub program_name: String,
    /// Tokens handed to the dispatcher
    pub tokens: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debug: false,
            program_name: "cmdtree".to_string(),
            tokens: Vec::new(),
        }
    }
}

impl Config {
    /// Create configuration from command line arguments
    pub fn from_args(args: &Args) -> Result<Self, CliError> {
        let config = Self {
            debug: args.debug,
            tokens: args.tokens.clone(),
            ..Self::default()
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), CliError> {
        if self.program_name.trim().is_empty() {
            return Err(CliError::configuration(
                "<host>",
                "program name must not be empty",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_args() {
        let args = Args {
            debug: true,
            tokens: vec!["say".to_string(), "hi".to_string()],
        };
        let config = Config::from_args(&args).unwrap();

        assert!(config.debug);
        assert_eq!(config.program_name, "cmdtree");
        assert_eq!(config.tokens, vec!["say", "hi"]);
    }

    #[test]
    fn test_validate_rejects_blank_program_name() {
        let config = Config {
            program_name: "  ".to_string(),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
