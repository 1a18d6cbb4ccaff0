//! Configuration resolution for the Postgres operator.
//!
//! This module provides:
//! - Raw, partially populated input ([`RawConfiguration`])
//! - The default table ([`defaults`]) built from field descriptors ([`FieldSpec`])
//! - The resolver ([`ResolvedConfiguration::resolve`])
//! - Cross-field validation ([`Validator`], [`Invariant`])
//! - CLI argument parsing ([`Cli`], [`Command`])
//! - Configuration file generation ([`write_default_config`])
//!
//! # Pipeline
//!
//! Resolution runs in a single pass, leaves first:
//!
//! 1. **Default table** - one descriptor per defaulted field
//! 2. **Resolver** - pure and total; absent values take their default, floored
//!    values are raised to their floor
//! 3. **Validator** - runs strictly after resolution and is the only step
//!    that can fail
//!
//! # Field Kinds
//!
//! - **Defaulted**: empty strings, unset booleans and unset or zero integers
//!   are replaced by the table default. Set values are kept verbatim.
//! - **Floored**: defaulted, then `max(value, floor)`. An explicit value below
//!   the floor is raised silently apart from a warning log event.
//! - **Pass-through**: collections, opaque strings and durations are copied or
//!   re-typed. Empty is a legitimate value.
//!
//! # Boolean Defaults
//!
//! Defaulted booleans distinguish "unset" from `false`: an explicit `false`
//! is kept even when the default is `true`.

mod cli;
pub mod defaults;
mod error;
mod field;
mod raw;
mod resolved;
mod validate;

#[cfg(test)]
mod raw_tests;
#[cfg(test)]
mod resolved_tests;

use std::path::Path;

pub use cli::{Cli, Command, OutputFormat};
pub use error::{ConfigError, rule};
pub use field::{FieldSpec, RawValue, Section};
pub use raw::{
    CloudSection, ConnectionPoolerSection, DebugSection, GeneralSection, KubernetesSection,
    LoadBalancerSection, LoggingRestApiSection, LogicalBackupSection, PodResourcesSection,
    RawConfiguration, ScalyrSection, TeamsApiSection, TimeoutsSection, UsersSection,
    default_config_template,
};
pub use resolved::{
    CloudConfig, ConnectionPoolerConfig, DebugConfig, GeneralConfig, KubernetesConfig,
    LoadBalancerConfig, LoggingRestApiConfig, LogicalBackupConfig, PodResourcesConfig,
    ResolvedConfiguration, ScalyrConfig, TeamsApiConfig, TimeoutsConfig, UsersConfig,
};
pub use validate::{InstanceBounds, Invariant, PoolerUserNotSuperuser, Validator};

/// Writes the configuration template to a file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    std::fs::write(path, default_config_template()).map_err(|e| ConfigError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}
