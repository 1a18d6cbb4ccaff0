//! Cross-field validation of resolved configurations.
//!
//! # Design
//!
//! - **Independent rules**: each [`Invariant`] checks one relationship and
//!   knows nothing about the others.
//! - **After resolution only**: a [`Validator`] takes a
//!   [`ResolvedConfiguration`], so every default is already applied when a
//!   rule compares fields.
//! - **Typed failure**: a violation is returned as
//!   [`ConfigError::InvariantViolation`]; the caller decides whether to halt
//!   startup or keep the previous configuration.

use tracing::debug;

use super::error::{ConfigError, rule};
use super::raw::RawConfiguration;
use super::resolved::ResolvedConfiguration;

/// A rule spanning more than one configuration field.
///
/// Invariants must be `Send + Sync` so a validator can be shared by a reload task.
pub trait Invariant: Send + Sync {
    /// Rule name reported in violations.
    fn name(&self) -> &'static str;

    /// Checks the rule against a resolved configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvariantViolation`] if the rule does not hold.
    fn check(&self, config: &ResolvedConfiguration) -> Result<(), ConfigError>;
}

/// The connection pooler must not log in as the superuser.
///
/// Pooled connections would otherwise run with superuser privileges.
#[derive(Debug, Clone, Copy, Default)]
pub struct PoolerUserNotSuperuser;

impl Invariant for PoolerUserNotSuperuser {
    fn name(&self) -> &'static str {
        rule::POOLER_USER_NOT_SUPERUSER
    }

    fn check(&self, config: &ResolvedConfiguration) -> Result<(), ConfigError> {
        let pooler_user = &config.connection_pooler.user;
        if *pooler_user == config.users.super_username {
            return Err(ConfigError::violation(
                self.name(),
                &["connection_pooler.user", "users.super_username"],
                format!(
                    "connection pooler user is not allowed to be the same as the superuser, \
                     username: {pooler_user}"
                ),
            ));
        }
        Ok(())
    }
}

/// `min_instances` must not exceed `max_instances`.
///
/// Negative values mean "no limit" and are never compared.
#[derive(Debug, Clone, Copy, Default)]
pub struct InstanceBounds;

impl Invariant for InstanceBounds {
    fn name(&self) -> &'static str {
        rule::INSTANCE_BOUNDS
    }

    fn check(&self, config: &ResolvedConfiguration) -> Result<(), ConfigError> {
        let min = config.general.min_instances;
        let max = config.general.max_instances;

        if min >= 0 && max >= 0 && min > max {
            return Err(ConfigError::violation(
                self.name(),
                &["general.min_instances", "general.max_instances"],
                format!("min_instances ({min}) must be <= max_instances ({max})"),
            ));
        }
        Ok(())
    }
}

/// Ordered set of invariants applied to a resolved configuration.
///
/// # Examples
///
/// ```
/// use operator_config::config::{
///     InstanceBounds, RawConfiguration, ResolvedConfiguration, Validator,
/// };
///
/// let validator = Validator::standard().with(InstanceBounds);
/// let resolved = ResolvedConfiguration::resolve(&RawConfiguration::default());
///
/// assert_eq!(validator.len(), 2);
/// assert!(validator.validate(&resolved).is_ok());
/// ```
#[derive(Default)]
pub struct Validator {
    invariants: Vec<Box<dyn Invariant>>,
}

impl Validator {
    /// Creates a validator with no rules (accepts everything).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a validator with the rules every configuration must satisfy.
    #[must_use]
    pub fn standard() -> Self {
        Self::new().with(PoolerUserNotSuperuser)
    }

    /// Registers an additional rule, checked after the existing ones.
    #[must_use]
    pub fn with<I: Invariant + 'static>(mut self, invariant: I) -> Self {
        self.invariants.push(Box::new(invariant));
        self
    }

    /// Returns the number of registered rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.invariants.len()
    }

    /// Returns true if no rules are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.invariants.is_empty()
    }

    /// Returns the rule names in check order.
    pub fn rule_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.invariants.iter().map(|invariant| invariant.name())
    }

    /// Checks every rule in registration order.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError::InvariantViolation`] encountered.
    pub fn validate(&self, config: &ResolvedConfiguration) -> Result<(), ConfigError> {
        for invariant in &self.invariants {
            invariant.check(config)?;
            debug!(rule = invariant.name(), "Invariant holds");
        }
        Ok(())
    }

    /// Resolves a raw configuration, then checks every rule against the result.
    ///
    /// Validation never interleaves with field coalescing.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError::InvariantViolation`] encountered.
    pub fn resolve(&self, raw: &RawConfiguration) -> Result<ResolvedConfiguration, ConfigError> {
        let resolved = ResolvedConfiguration::resolve(raw);
        self.validate(&resolved)?;
        Ok(resolved)
    }
}

impl std::fmt::Debug for Validator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Validator")
            .field("rules", &self.rule_names().collect::<Vec<_>>())
            .finish()
    }
}
