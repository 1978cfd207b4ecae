//! Plain-text help rendering
//!
//! Depth 0 describes a command in full and lists its children, each rendered
//! at depth 1. Depth 1 gives a summary with flags and arguments. Anything
//! deeper is a single line.

use crate::core::{
    arguments::PositionalArgument,
    command::{Action, Command},
    context::Context,
    flags::{Flag, FlagValue},
};
use std::io::Write;

/// Something that can describe itself at a given nesting depth
pub trait Help {
    fn help(&self, depth: usize, buf: &mut String);
}

/// Full help text for `helper`
pub fn render_help(helper: &dyn Help) -> String {
    let mut buf = String::new();
    helper.help(0, &mut buf);
    buf
}

impl Help for Command {
    fn help(&self, depth: usize, buf: &mut String) {
        match depth {
            0 => self.help_full(buf),
            1 => self.help_summary(buf),
            _ => {
                buf.push_str(&summary_line(self));
                buf.push('\n');
            }
        }
    }
}

impl Command {
    fn help_full(&self, buf: &mut String) {
        buf.push_str(self.name());
        if !self.short().is_empty() {
            buf.push(' ');
            buf.push_str(self.short());
        }
        buf.push('\n');

        if !self.long().is_empty() {
            buf.push_str(self.long());
            buf.push('\n');
        }

        self.help_options(2, buf);

        if !self.children().is_empty() {
            buf.push_str("\ncommands\n");
            for child in self.children() {
                child.help(1, buf);
            }
        }
    }

    fn help_summary(&self, buf: &mut String) {
        buf.push_str(&summary_line(self));
        buf.push('\n');

        if !self.long().is_empty() {
            buf.push('\n');
            buf.push_str(self.long());
            buf.push('\n');
        }

        self.help_options(2, buf);
    }

    fn help_options(&self, indent: usize, buf: &mut String) {
        if !self.flags().is_empty() {
            buf.push_str(&format!("\n{}Flags:\n", " ".repeat(indent)));
            for (name, flag) in self.flags().iter() {
                buf.push_str(&flag_help(indent + 2, name, flag));
                buf.push('\n');
            }
        }

        if !self.arguments().is_empty() {
            buf.push_str(&format!("\n{}Arguments:\n", " ".repeat(indent)));
            for argument in self.arguments() {
                buf.push_str(&argument_help(indent + 2, argument));
                buf.push('\n');
            }
        }
    }
}

fn summary_line(command: &Command) -> String {
    if command.short().is_empty() {
        command.name().to_string()
    } else {
        format!("{} -- {}", command.name(), command.short())
    }
}

fn flag_help(indent: usize, name: &str, flag: &Flag) -> String {
    let mut line = format!(
        "{}-{} [{}] - {}",
        " ".repeat(indent),
        name,
        flag.kind_name(),
        flag.description()
    );

    match flag.default_value() {
        FlagValue::String(s) if s.is_empty() => {}
        default => line.push_str(&format!(" (default '{default}')")),
    }

    if !flag.possible_values().is_empty() {
        line.push('\n');
        line.push_str(&" ".repeat(indent + name.len() + 2));
        line.push_str("Possible Values: ");
        line.push_str(&flag.possible_values().join(", "));
    }

    line
}

fn argument_help(indent: usize, argument: &PositionalArgument) -> String {
    let mut line = format!("{}{}", " ".repeat(indent), argument.name);
    if !argument.description.is_empty() {
        line.push_str(" - ");
        line.push_str(&argument.description);
    }
    match &argument.default_value {
        Some(default) => line.push_str(&format!(" (default '{default}')")),
        None => line.push_str(" (required)"),
    }
    line
}

/// Action that prints help for the command it was reached through
///
/// Describes the nearest invoking command that has children, so a `help`
/// child prints its parent's help. Falls back to the invoking command itself.
#[derive(Debug, Default, Clone, Copy)]
pub struct SelfHelp;

impl SelfHelp {
    /// Help text this action would print for `ctx`
    pub fn render(ctx: &Context<'_>) -> Option<String> {
        let target = ctx
            .commands()
            .find(|command| !command.children().is_empty())
            .or_else(|| ctx.commands().next())?;
        Some(render_help(target))
    }
}

impl Action for SelfHelp {
    fn execute(&self, ctx: &Context<'_>, _args: &[String]) -> anyhow::Result<()> {
        let text = Self::render(ctx)
            .ok_or_else(|| anyhow::anyhow!("help needs to be reached through a command"))?;
        let mut out = std::io::stdout().lock();
        writeln!(out, "{text}")?;
        Ok(())
    }
}
