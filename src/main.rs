#![allow(clippy::cargo_common_metadata)]
use cmdtree::{cli, config::Config, setup_logging};
use std::process::ExitCode;

fn main() -> ExitCode {
    // Parse host arguments; everything else goes to the command tree
    let args = cli::parse_args();

    if let Err(e) = setup_logging(args.debug) {
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }

    let result = Config::from_args(&args).and_then(|config| cli::execute(&config));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => cli::report_fatal(&err),
    }
}
