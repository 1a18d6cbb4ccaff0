//! CLI argument parsing using clap.
//!
//! Defines the command-line interface with all options and subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// operator-config: resolves Postgres operator configuration
///
/// Reads a partially populated configuration, fills in defaults, checks
/// cross-field rules and prints the resolved configuration.
#[derive(Debug, Parser)]
#[command(name = "operator-config")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to the raw configuration file (TOML, or JSON with a .json extension).
    /// Without it, an empty configuration is resolved.
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, short, value_enum, default_value_t = OutputFormat::Json, global = true)]
    pub format: OutputFormat,

    /// Also require min_instances <= max_instances when both are limited
    #[arg(long = "check-instance-bounds")]
    pub check_instance_bounds: bool,

    /// Enable verbose logging
    #[arg(long, short)]
    pub verbose: bool,
}

/// Subcommands for operator-config
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a configuration template
    Init {
        /// Output path for the configuration file
        #[arg(long, short, default_value = "operator-config.toml")]
        output: PathBuf,
    },

    /// Print the default table
    Defaults,
}

/// Rendering format for resolved output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON
    #[value(name = "json")]
    Json,
    /// TOML
    #[value(name = "toml")]
    Toml,
}

impl OutputFormat {
    /// Returns the format name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Toml => "toml",
        }
    }
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator (useful for testing).
    pub fn parse_from_iter<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(iter)
    }

    /// Returns true if this is the init command.
    #[must_use]
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Some(Command::Init { .. }))
    }
}
