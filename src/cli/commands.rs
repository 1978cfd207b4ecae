//! Demo command tree and the fatal-error bridge for the CLI

use crate::{
    config::Config,
    core::{Command, CommandConfig, Dispatcher, Flag, PositionalArgument, SelfHelp, Validator},
    error::{CliError, ExitError, Result},
};
use anyhow::Context as _;
use std::io::Write;
use std::process::ExitCode;
use tracing::{debug, instrument};

/// Build the demo tree rooted at `program_name`
pub fn build_tree(program_name: &str) -> Result<Command> {
    let say = CommandConfig::new("say")
        .short("prints the given input to the standard output")
        .flag("voice", Flag::string("default", "label printed before the input"))
        .flag("count", Flag::integer(1, "number of times to print the input"))
        .argument(PositionalArgument::required("input").description("text to print"))
        .action_fn(|ctx, _| {
            let style = ctx.string_flag("style");
            let mut line = format!("{}: {}", ctx.string_flag("voice"), ctx.argument("input"));
            if style == "upper" {
                line = line.to_uppercase();
            }

            let mut out = std::io::stdout().lock();
            for _ in 0..ctx.int_flag("count").max(0) {
                if ctx.is_cancelled() {
                    anyhow::bail!("say was cancelled");
                }
                writeln!(out, "{line}")?;
            }
            Ok(())
        })
        .build()?;

    let echo = CommandConfig::new("echo")
        .short("prints every remaining token on one line")
        .action_fn(|_, args| {
            writeln!(std::io::stdout().lock(), "{}", args.join(" "))?;
            Ok(())
        })
        .build()?;

    let exit = CommandConfig::new("exit")
        .short("fails with the given exit status")
        .flag("code", Flag::integer(1, "status to exit with"))
        .action_fn(|ctx, _| {
            let code = u32::try_from(ctx.int_flag("code"))
                .context("exit status must not be negative")?;
            Err(ExitError(code).into())
        })
        .build()?;

    let help = CommandConfig::new("help")
        .short("shows this help")
        .action(SelfHelp)
        .build()?;

    CommandConfig::new(program_name)
        .short("hierarchical command dispatch demo")
        .flag(
            "style",
            Flag::enumeration("plain", ["plain", "upper"], "output style for say"),
        )
        .child(say)
        .child(echo)
        .child(exit)
        .child(help)
        .build()
}

/// Validate the demo tree and dispatch the configured tokens
#[instrument(skip(config))]
pub fn execute(config: &Config) -> Result<()> {
    let validator = Validator::new()?;
    let dispatcher = Dispatcher::new(build_tree(&config.program_name)?, &validator)?;

    debug!("Dispatching tokens: {:?}", config.tokens);
    dispatcher.dispatch(&config.tokens)
}

/// Report an error that ended the program and pick the exit status
pub fn report_fatal(err: &CliError) -> ExitCode {
    debug!(usage = err.is_usage(), "Fatal error: {:?}", err);
    eprintln!("FATAL ERROR: {err}");
    ExitCode::from(err.exit_code())
}
