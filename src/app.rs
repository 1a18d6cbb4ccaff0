//! Application startup and utilities.
//!
//! This module contains exit codes, tracing setup, and error hints
//! that support the main entry point.

use operator_config::config::{ConfigError, rule};
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Application exit codes.
pub mod exit_code {
    use std::process::ExitCode;

    use operator_config::config::ConfigError;

    /// Success (exit code 0).
    pub const SUCCESS: ExitCode = ExitCode::SUCCESS;

    /// Configuration error (exit code 1) - unreadable file, parse error, invariant violation.
    pub const CONFIG_ERROR: ExitCode = ExitCode::FAILURE;

    /// Output error (exit code 2) - the resolved configuration could not be rendered.
    ///
    /// Note: This is a function rather than a constant because `ExitCode::from()` is not `const fn`.
    pub fn output_error() -> ExitCode {
        ExitCode::from(2)
    }

    /// Maps a pipeline error to its exit code.
    pub fn for_error(error: &ConfigError) -> ExitCode {
        match error {
            ConfigError::Render { .. } => output_error(),
            _ => CONFIG_ERROR,
        }
    }
}

/// Prints helpful hints for common configuration errors.
pub fn print_config_hint(error: &ConfigError) {
    match error {
        ConfigError::InvariantViolation { rule: r, .. } if *r == rule::POOLER_USER_NOT_SUPERUSER => {
            eprintln!(
                "\nSet connection_pooler.user to a role other than users.super_username \
                 (defaults: 'pooler' and 'postgres')."
            );
        }
        ConfigError::FileRead { .. } => {
            eprintln!("\nRun 'operator-config init' to generate a configuration template.");
        }
        _ => {}
    }
}

/// Sets up the tracing subscriber for logging.
///
/// Logs go to stderr so that stdout carries only the rendered configuration.
pub fn setup_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
