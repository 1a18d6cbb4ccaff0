//! operator-config: Postgres operator configuration resolution
//!
//! Entry point for the operator-config application.

use operator_config::config::{Cli, Command, OutputFormat, write_default_config};
use std::process::ExitCode;

mod app;
mod run;

use app::{exit_code, print_config_hint, setup_tracing};

/// Main entry point.
///
/// Excluded from coverage as it's the thin wrapper around testable components.
#[cfg(not(tarpaulin_include))]
fn main() -> ExitCode {
    let cli = Cli::parse_args();

    match &cli.command {
        Some(Command::Init { output }) => return handle_init(output),
        Some(Command::Defaults) => return handle_defaults(cli.format),
        None => {}
    }

    setup_tracing(cli.verbose);

    match run::execute(&cli) {
        Ok(rendered) => {
            println!("{rendered}");
            exit_code::SUCCESS
        }
        Err(e) => {
            eprintln!("Configuration error: {e}");
            print_config_hint(&e);
            exit_code::for_error(&e)
        }
    }
}

/// Handles the `init` subcommand.
fn handle_init(output: &std::path::Path) -> ExitCode {
    match write_default_config(output) {
        Ok(()) => {
            println!("Configuration template written to: {}", output.display());
            exit_code::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            exit_code::CONFIG_ERROR
        }
    }
}

/// Handles the `defaults` subcommand.
fn handle_defaults(format: OutputFormat) -> ExitCode {
    match run::render_defaults(format) {
        Ok(rendered) => {
            println!("{rendered}");
            exit_code::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            exit_code::for_error(&e)
        }
    }
}
