//! Error types for configuration loading, rendering and validation.

use std::path::PathBuf;

use thiserror::Error;

/// Error type for configuration operations.
///
/// A missing value is never an error: absent fields are always resolved from
/// the default table. Only file handling, parsing, rendering and cross-field
/// invariants can fail.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("Failed to read config file '{}': {source}", path.display())]
    FileRead {
        /// Path to the config file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse the TOML configuration.
    #[error("Failed to parse TOML config: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to parse the JSON configuration.
    #[error("Failed to parse JSON config: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Failed to write configuration file (for init command).
    #[error("Failed to write config file '{}': {source}", path.display())]
    FileWrite {
        /// Path to the config file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to render a configuration in the requested output format.
    #[error("Failed to render configuration as {format}: {reason}")]
    Render {
        /// Output format name
        format: &'static str,
        /// Reason for the failure
        reason: String,
    },

    /// A cross-field rule does not hold for the resolved configuration.
    ///
    /// Fatal to adopting the configuration. Retrying with the same input
    /// yields the same violation.
    #[error("Configuration invariant '{rule}' violated ({}): {message}", fields.join(", "))]
    InvariantViolation {
        /// Name of the violated rule, see [`rule`]
        rule: &'static str,
        /// Dotted paths of the conflicting fields
        fields: &'static [&'static str],
        /// Description including the conflicting values
        message: String,
    },
}

/// Well-known rule names for `InvariantViolation` errors.
///
/// Use these constants for compile-time safety when matching rule names.
pub mod rule {
    /// The connection pooler user must differ from the superuser.
    pub const POOLER_USER_NOT_SUPERUSER: &str = "pooler_user_not_superuser";
    /// `min_instances` must not exceed `max_instances` when both are limited.
    pub const INSTANCE_BOUNDS: &str = "instance_bounds";
}

impl ConfigError {
    /// Creates an `InvariantViolation` error for a rule.
    #[must_use]
    pub fn violation(
        rule: &'static str,
        fields: &'static [&'static str],
        message: impl Into<String>,
    ) -> Self {
        Self::InvariantViolation {
            rule,
            fields,
            message: message.into(),
        }
    }

    /// Returns `true` if this error is a cross-field invariant violation.
    #[must_use]
    pub const fn is_invariant_violation(&self) -> bool {
        matches!(self, Self::InvariantViolation { .. })
    }
}
