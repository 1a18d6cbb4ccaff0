//! Application execution logic.
//!
//! Loads the raw configuration named on the command line, adopts it through
//! the resolution pipeline and renders the result.

use serde::Serialize;

use operator_config::config::{
    Cli, ConfigError, InstanceBounds, OutputFormat, RawConfiguration, Validator, defaults,
};
use operator_config::publish::EffectiveConfig;

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Printable form of the default table.
#[derive(Debug, Serialize)]
struct DefaultTableDocument {
    version: u32,
    field: Vec<defaults::DefaultEntry>,
}

/// Loads, resolves, validates and renders the configuration.
///
/// # Errors
///
/// Returns an error if:
/// - The config file cannot be read or parsed
/// - The resolved configuration violates an invariant
/// - The result cannot be rendered in the requested format
pub fn execute(cli: &Cli) -> Result<String, ConfigError> {
    let raw = load_raw(cli)?;

    let effective = EffectiveConfig::new(build_validator(cli));
    let resolved = effective.adopt(&raw)?;

    render(resolved.as_ref(), cli.format)
}

/// Loads the raw configuration, or an empty one if no file was given.
fn load_raw(cli: &Cli) -> Result<RawConfiguration, ConfigError> {
    cli.config.as_ref().map_or_else(
        || {
            tracing::debug!("No config file given, resolving defaults only");
            Ok(RawConfiguration::default())
        },
        |path| {
            tracing::debug!("Loading config file: {}", path.display());
            RawConfiguration::load(path)
        },
    )
}

/// Builds the validator selected by the CLI flags.
fn build_validator(cli: &Cli) -> Validator {
    let validator = Validator::standard();
    if cli.check_instance_bounds {
        validator.with(InstanceBounds)
    } else {
        validator
    }
}

/// Renders the default table.
///
/// # Errors
///
/// Returns an error if the table cannot be rendered.
pub fn render_defaults(format: OutputFormat) -> Result<String, ConfigError> {
    let document = DefaultTableDocument {
        version: defaults::TABLE_VERSION,
        field: defaults::table(),
    };
    render(&document, format)
}

fn render<T: Serialize + ?Sized>(value: &T, format: OutputFormat) -> Result<String, ConfigError> {
    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(value).map_err(|e| e.to_string()),
        OutputFormat::Toml => toml::to_string_pretty(value).map_err(|e| e.to_string()),
    };

    rendered.map_err(|reason| ConfigError::Render {
        format: format.as_str(),
        reason,
    })
}
