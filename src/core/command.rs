//! Command tree nodes and actions
//!
//! A [`Command`] either runs a single [`Action`] or selects one of its child
//! commands. Which of the two is fixed when the command is built: a config
//! with both, or with neither, is rejected by [`Command::new`].

use crate::core::{
    arguments::{self, PositionalArgument},
    context::Context,
    flags::{Flag, Flags},
};
use crate::error::{CliError, Result};
use std::fmt;
use tracing::{debug, instrument};

/// Executable behavior at the end of a dispatch
///
/// `args` holds the tokens left after positional binding; an action may treat
/// them as variadic input.
pub trait Action: Send + Sync {
    fn execute(&self, ctx: &Context<'_>, args: &[String]) -> anyhow::Result<()>;
}

/// Action backed by a closure, see [`action_fn`]
pub struct ActionFn<F>(F);

impl<F> Action for ActionFn<F>
where
    F: Fn(&Context<'_>, &[String]) -> anyhow::Result<()> + Send + Sync,
{
    fn execute(&self, ctx: &Context<'_>, args: &[String]) -> anyhow::Result<()> {
        (self.0)(ctx, args)
    }
}

/// Wrap a closure as an [`Action`]
pub fn action_fn<F>(f: F) -> ActionFn<F>
where
    F: Fn(&Context<'_>, &[String]) -> anyhow::Result<()> + Send + Sync,
{
    ActionFn(f)
}

/// Settings for a new command, validated by [`Command::new`]
#[derive(Default)]
pub struct CommandConfig {
    /// Name used for child selection and help
    pub name: String,
    /// One-line description for help
    pub short: String,
    /// Long description for help
    pub long: String,
    pub flags: Flags,
    pub arguments: Vec<PositionalArgument>,
    pub children: Vec<Command>,
    pub action: Option<Box<dyn Action>>,
}

impl CommandConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn short(mut self, short: impl Into<String>) -> Self {
        self.short = short.into();
        self
    }

    #[must_use]
    pub fn long(mut self, long: impl Into<String>) -> Self {
        self.long = long.into();
        self
    }

    #[must_use]
    pub fn flag(mut self, name: impl Into<String>, flag: Flag) -> Self {
        self.flags.insert(name, flag);
        self
    }

    #[must_use]
    pub fn flags(mut self, flags: Flags) -> Self {
        self.flags = self.flags.copy_and_merge(&flags);
        self
    }

    #[must_use]
    pub fn argument(mut self, argument: PositionalArgument) -> Self {
        self.arguments.push(argument);
        self
    }

    #[must_use]
    pub fn child(mut self, child: Command) -> Self {
        self.children.push(child);
        self
    }

    #[must_use]
    pub fn action(mut self, action: impl Action + 'static) -> Self {
        self.action = Some(Box::new(action));
        self
    }

    /// Use a closure as the action
    #[must_use]
    pub fn action_fn<F>(self, f: F) -> Self
    where
        F: Fn(&Context<'_>, &[String]) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.action(action_fn(f))
    }

    /// Shorthand for [`Command::new`]
    pub fn build(self) -> Result<Command> {
        Command::new(self)
    }
}

/// What a command does once its flags are parsed
pub enum Body {
    Run(Box<dyn Action>),
    Children(Vec<Command>),
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Run(_) => f.write_str("Run(<action>)"),
            Self::Children(children) => f
                .debug_list()
                .entries(children.iter().map(Command::name))
                .finish(),
        }
    }
}

/// One node of the command tree
#[derive(Debug)]
pub struct Command {
    name: String,
    short: String,
    long: String,
    flags: Flags,
    arguments: Vec<PositionalArgument>,
    body: Body,
}

impl Command {
    /// Build a command, rejecting configs that have both an action and
    /// children, neither, or an unnamed positional argument
    pub fn new(config: CommandConfig) -> Result<Self> {
        let CommandConfig {
            name,
            short,
            long,
            flags,
            arguments,
            children,
            action,
        } = config;

        let body = match (action, children.is_empty()) {
            (Some(_), false) => {
                return Err(CliError::configuration(
                    name,
                    "unable to create a command with both an action and children",
                ));
            }
            (None, true) => {
                return Err(CliError::configuration(
                    name,
                    "missing either an action or children",
                ));
            }
            (Some(action), true) => Body::Run(action),
            (None, false) => Body::Children(children),
        };

        if let Some(position) = arguments.iter().position(|arg| arg.name.is_empty()) {
            return Err(CliError::configuration(
                name,
                format!("positional argument #{} has no name", position + 1),
            ));
        }

        Ok(Self {
            name,
            short,
            long,
            flags,
            arguments,
            body,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn short(&self) -> &str {
        &self.short
    }

    pub fn long(&self) -> &str {
        &self.long
    }

    pub fn flags(&self) -> &Flags {
        &self.flags
    }

    pub fn arguments(&self) -> &[PositionalArgument] {
        &self.arguments
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    /// Child commands; empty for commands that run an action
    pub fn children(&self) -> &[Command] {
        match &self.body {
            Body::Children(children) => children,
            Body::Run(_) => &[],
        }
    }

    pub fn has_action(&self) -> bool {
        matches!(self.body, Body::Run(_))
    }

    /// Child whose name equals `name` exactly; the first one wins
    pub fn find_child(&self, name: &str) -> Option<&Command> {
        self.children().iter().find(|child| child.name == name)
    }

    /// Resolve `tokens` against this command and run the selected action
    #[instrument(skip(self, ctx), fields(command = %self.name))]
    pub fn execute(&self, ctx: &Context<'_>, tokens: &[String]) -> Result<()> {
        let parsed = self.flags.parse(&self.name, tokens)?;
        let ctx = ctx.with_command(self, parsed.values);

        match &self.body {
            Body::Run(action) => self.run(&ctx, action.as_ref(), &parsed.remaining),
            Body::Children(children) => self.child(&ctx, children, &parsed.remaining),
        }
    }

    fn run(&self, ctx: &Context<'_>, action: &dyn Action, tokens: &[String]) -> Result<()> {
        let (values, leftover) = arguments::bind(&self.name, &self.arguments, tokens)?;
        let ctx = ctx.with_values(Default::default(), values);

        debug!("Running action for '{}' with {} extra token(s)", self.name, leftover.len());
        action.execute(&ctx, leftover).map_err(CliError::Action)
    }

    fn child(&self, ctx: &Context<'_>, children: &[Command], tokens: &[String]) -> Result<()> {
        let Some((selector, rest)) = tokens.split_first() else {
            return Err(CliError::missing_subcommand(&self.name));
        };

        let child = children
            .iter()
            .find(|child| child.name == *selector)
            .ok_or_else(|| CliError::unknown_subcommand(&self.name, selector.as_str()))?;

        debug!("'{}' selected sub-command '{}'", self.name, child.name);
        child.execute(ctx, rest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn noop() -> impl Action {
        action_fn(|_, _| Ok(()))
    }

    fn tokens(input: &[&str]) -> Vec<String> {
        input.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_new_rejects_action_and_children() {
        let child = CommandConfig::new("child").action(noop()).build().unwrap();
        let err = CommandConfig::new("both")
            .action(noop())
            .child(child)
            .build()
            .unwrap_err();

        assert!(matches!(err, CliError::Configuration { ref command, .. } if command == "both"));
    }

    #[test]
    fn test_new_rejects_empty_command() {
        let err = CommandConfig::new("empty").build().unwrap_err();
        assert!(matches!(err, CliError::Configuration { .. }));
    }

    #[test]
    fn test_new_rejects_unnamed_argument() {
        let err = CommandConfig::new("cmd")
            .argument(PositionalArgument::required(""))
            .action(noop())
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("has no name"));
    }

    #[test]
    fn test_child_selection_is_exact() {
        let root = CommandConfig::new("app")
            .child(CommandConfig::new("say").action(noop()).build().unwrap())
            .build()
            .unwrap();

        assert!(root.find_child("say").is_some());
        for selector in ["sa", "SAY", "say ", "says"] {
            let err = root
                .execute(&Context::new(), &tokens(&[selector]))
                .unwrap_err();
            assert!(matches!(err, CliError::UnknownSubcommand { selector: Some(_), .. }));
        }
    }

    #[test]
    fn test_execute_without_selector() {
        let root = CommandConfig::new("app")
            .child(CommandConfig::new("say").action(noop()).build().unwrap())
            .build()
            .unwrap();

        let err = root.execute(&Context::new(), &[]).unwrap_err();
        assert_eq!(err.to_string(), "must specify a sub-command, try 'help'");
    }

    #[test]
    fn test_parent_flags_not_rescanned_after_selector() {
        let root = CommandConfig::new("app")
            .flag("level", Flag::integer(0, "verbosity"))
            .child(CommandConfig::new("run").action(noop()).build().unwrap())
            .build()
            .unwrap();

        // `run` declares no flags, so its tokens pass straight to the action
        assert!(root
            .execute(&Context::new(), &tokens(&["run", "-level", "3"]))
            .is_ok());

        let err = root
            .execute(&Context::new(), &tokens(&["-level", "x", "run"]))
            .unwrap_err();
        assert!(matches!(err, CliError::FlagParse(_)));
    }

    #[test]
    fn test_action_receives_leftover_tokens() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);

        let cmd = CommandConfig::new("echo")
            .argument(PositionalArgument::required("first"))
            .action_fn(move |ctx, args| {
                let mut seen = sink.lock().unwrap();
                seen.push(ctx.argument("first").to_string());
                seen.extend(args.iter().cloned());
                Ok(())
            })
            .build()
            .unwrap();

        cmd.execute(&Context::new(), &tokens(&["a", "b", "c"]))
            .unwrap();
        assert_eq!(*seen.lock().unwrap(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_action_error_passes_through() {
        let cmd = CommandConfig::new("fail")
            .action_fn(|_, _| Err(anyhow::anyhow!("no luck")))
            .build()
            .unwrap();

        let err = cmd.execute(&Context::new(), &[]).unwrap_err();
        match err {
            CliError::Action(inner) => assert_eq!(inner.to_string(), "no luck"),
            other => panic!("Expected action error, got {other:?}"),
        }
    }

    #[test]
    fn test_context_carries_invoking_commands() {
        let names = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&names);

        let root = CommandConfig::new("app")
            .child(
                CommandConfig::new("leaf")
                    .action_fn(move |ctx, _| {
                        let mut names = sink.lock().unwrap();
                        names.extend(ctx.commands().map(|c| c.name().to_string()));
                        Ok(())
                    })
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap();

        root.execute(&Context::new(), &tokens(&["leaf"])).unwrap();
        assert_eq!(*names.lock().unwrap(), vec!["leaf", "app"]);
    }
}
