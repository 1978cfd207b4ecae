//! Tree validation
//!
//! [`Command::new`](crate::core::Command::new) only checks the shape of a single
//! node. The [`Validator`] walks a finished tree and checks names and flag
//! descriptors before a [`Dispatcher`](crate::core::Dispatcher) accepts it.

use crate::core::{command::Command, flags::Flag};
use crate::error::{CliError, Result};
use regex::Regex;
use std::collections::HashSet;
use tracing::{debug, instrument, warn};

/// Name and descriptor checks for a command tree
#[derive(Debug, Clone)]
pub struct Validator {
    /// Pattern for command names
    re_command: Regex,
    /// Pattern for flag and positional argument names
    re_identifier: Regex,
}

impl Validator {
    /// Create a new validator
    pub fn new() -> Result<Self> {
        Ok(Self {
            re_command: Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_.:-]*$").map_err(|e| {
                CliError::configuration("<validator>", format!("Failed to compile regex: {e}"))
            })?,
            re_identifier: Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_-]*$").map_err(|e| {
                CliError::configuration("<validator>", format!("Failed to compile regex: {e}"))
            })?,
        })
    }

    /// Validate `root` and every command below it
    #[instrument(skip(self, root), fields(root = %root.name()))]
    pub fn validate(&self, root: &Command) -> Result<()> {
        let mut visited = 0usize;
        self.validate_command(root, &mut visited)?;
        debug!("Validated {} command(s)", visited);
        Ok(())
    }

    fn validate_command(&self, command: &Command, visited: &mut usize) -> Result<()> {
        *visited += 1;
        let name = command.name();

        if !self.re_command.is_match(name) {
            return Err(CliError::configuration(
                name,
                format!("invalid command name '{name}'"),
            ));
        }

        for (flag_name, flag) in command.flags().iter() {
            self.validate_flag(name, flag_name, flag)?;
        }

        let mut seen_optional = false;
        for argument in command.arguments() {
            if !self.re_identifier.is_match(&argument.name) {
                return Err(CliError::configuration(
                    name,
                    format!("invalid positional argument name '{}'", argument.name),
                ));
            }
            if argument.is_required() && seen_optional {
                warn!(
                    "Command '{}': required argument '{}' follows an optional one and can never use its default",
                    name, argument.name
                );
            }
            seen_optional |= !argument.is_required();
        }

        let mut names = HashSet::new();
        for child in command.children() {
            if !names.insert(child.name()) {
                warn!(
                    "Command '{}' has more than one child named '{}'; only the first is reachable",
                    name,
                    child.name()
                );
            }
            self.validate_command(child, visited)?;
        }

        Ok(())
    }

    fn validate_flag(&self, command: &str, name: &str, flag: &Flag) -> Result<()> {
        if !self.re_identifier.is_match(name) {
            return Err(CliError::configuration(
                command,
                format!("invalid flag name '{name}'"),
            ));
        }

        if let Flag::Enum {
            default,
            possible_values,
            ..
        } = flag
        {
            if possible_values.is_empty() {
                return Err(CliError::configuration(
                    command,
                    format!("enum flag -{name} has no possible values"),
                ));
            }
            if !default.is_empty() && !possible_values.contains(default) {
                return Err(CliError::configuration(
                    command,
                    format!(
                        "default '{default}' of enum flag -{name} is not one of: {}",
                        possible_values.join(", ")
                    ),
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{
        arguments::PositionalArgument,
        command::{CommandConfig, action_fn},
    };

    fn leaf(name: &str) -> CommandConfig {
        CommandConfig::new(name).action(action_fn(|_, _| Ok(())))
    }

    #[test]
    fn test_valid_tree() {
        let root = CommandConfig::new("app")
            .flag("format", Flag::enumeration("plain", ["plain", "upper"], ""))
            .child(
                leaf("say")
                    .flag("count", Flag::integer(1, ""))
                    .argument(PositionalArgument::required("input"))
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap();

        assert!(Validator::new().unwrap().validate(&root).is_ok());
    }

    #[test]
    fn test_rejects_bad_command_name() {
        let root = CommandConfig::new("app")
            .child(leaf("-say").build().unwrap())
            .build()
            .unwrap();

        let err = Validator::new().unwrap().validate(&root).unwrap_err();
        assert!(err.to_string().contains("invalid command name '-say'"));
    }

    #[test]
    fn test_rejects_bad_flag_name() {
        let root = leaf("app")
            .flag("-voice", Flag::string("", ""))
            .build()
            .unwrap();
        assert!(Validator::new().unwrap().validate(&root).is_err());
    }

    #[test]
    fn test_rejects_enum_default_outside_choices() {
        let root = leaf("app")
            .flag("style", Flag::enumeration("loud", ["quiet"], ""))
            .build()
            .unwrap();

        let err = Validator::new().unwrap().validate(&root).unwrap_err();
        assert!(matches!(err, CliError::Configuration { .. }));
    }

    #[test]
    fn test_rejects_enum_without_choices() {
        let root = leaf("app")
            .flag("style", Flag::enumeration("", Vec::<String>::new(), ""))
            .build()
            .unwrap();
        assert!(Validator::new().unwrap().validate(&root).is_err());
    }

    #[test]
    fn test_duplicate_children_are_allowed() {
        let root = CommandConfig::new("app")
            .child(leaf("say").build().unwrap())
            .child(leaf("say").build().unwrap())
            .build()
            .unwrap();
        assert!(Validator::new().unwrap().validate(&root).is_ok());
    }
}
