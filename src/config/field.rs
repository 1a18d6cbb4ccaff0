//! Field descriptors and the coalescing rule shared by every defaulted field.
//!
//! # Design
//!
//! - **One rule**: [`FieldSpec::resolve`] is the only place a raw value is
//!   replaced by a default or raised to a floor. Every defaulted field in the
//!   resolver goes through it.
//! - **Presence per type**: [`RawValue`] decides when a raw value counts as
//!   set. Empty strings, unset booleans and unset or zero integers are absent.
//! - **Descriptors are data**: adding a field is one [`FieldSpec`] constant in
//!   [`super::defaults`], not new branching logic.

use std::fmt;

use serde::Serialize;
use tracing::warn;

/// Configuration section a field belongs to.
///
/// The string form matches the section key in raw configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    /// Top-level operator settings
    General,
    /// System user names
    Users,
    /// Kubernetes object settings
    Kubernetes,
    /// Default resource requests and limits for Postgres pods
    PostgresPodResources,
    /// Wait intervals and timeouts
    Timeouts,
    /// Load balancer and DNS settings
    LoadBalancer,
    /// Cloud provider settings
    AwsOrGcp,
    /// Logical backup job settings
    LogicalBackup,
    /// Debug switches
    Debug,
    /// External team directory
    TeamsApi,
    /// Logging REST API
    LoggingRestApi,
    /// Telemetry sidecar
    Scalyr,
    /// Connection pooler deployment
    ConnectionPooler,
}

impl Section {
    /// Returns the section key as used in configuration files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Users => "users",
            Self::Kubernetes => "kubernetes",
            Self::PostgresPodResources => "postgres_pod_resources",
            Self::Timeouts => "timeouts",
            Self::LoadBalancer => "load_balancer",
            Self::AwsOrGcp => "aws_or_gcp",
            Self::LogicalBackup => "logical_backup",
            Self::Debug => "debug",
            Self::TeamsApi => "teams_api",
            Self::LoggingRestApi => "logging_rest_api",
            Self::Scalyr => "scalyr",
            Self::ConnectionPooler => "connection_pooler",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A raw field value that may or may not be set.
pub trait RawValue {
    /// Type of the value once resolved.
    type Resolved;

    /// Returns the value if it counts as set, `None` if it must be defaulted.
    fn present(&self) -> Option<Self::Resolved>;
}

impl RawValue for String {
    type Resolved = Self;

    fn present(&self) -> Option<Self> {
        (!self.is_empty()).then(|| self.clone())
    }
}

impl RawValue for Option<bool> {
    type Resolved = bool;

    fn present(&self) -> Option<bool> {
        *self
    }
}

impl RawValue for Option<i32> {
    type Resolved = i32;

    fn present(&self) -> Option<i32> {
        self.filter(|value| *value != 0)
    }
}

/// Descriptor for a field that has a default and optionally a floor.
///
/// `T` is the borrowed form of the resolved type (`str` for strings), so
/// descriptors can be `const`.
#[derive(Debug)]
pub struct FieldSpec<T: ?Sized + 'static> {
    /// Section the field lives in
    pub section: Section,
    /// Field key within the section
    pub name: &'static str,
    /// Value used when the raw field is absent
    pub default: &'static T,
    /// Minimum enforced even for explicit values
    pub floor: Option<&'static T>,
}

impl<T: ?Sized + 'static> FieldSpec<T> {
    /// Describes a field that falls back to `default` when absent.
    #[must_use]
    pub const fn defaulted(section: Section, name: &'static str, default: &'static T) -> Self {
        Self {
            section,
            name,
            default,
            floor: None,
        }
    }

    /// Describes a field that falls back to `default` and never drops below `floor`.
    #[must_use]
    pub const fn floored(
        section: Section,
        name: &'static str,
        default: &'static T,
        floor: &'static T,
    ) -> Self {
        Self {
            section,
            name,
            default,
            floor: Some(floor),
        }
    }

    /// Returns the dotted path of the field, e.g. `users.super_username`.
    #[must_use]
    pub fn path(&self) -> String {
        format!("{}.{}", self.section, self.name)
    }
}

impl<T> FieldSpec<T>
where
    T: ?Sized + ToOwned + 'static,
    T::Owned: PartialOrd + fmt::Display,
{
    /// Resolves a raw value against this descriptor.
    ///
    /// The raw value wins when present, otherwise the default is used. If the
    /// descriptor has a floor, the result is `max(candidate, floor)`.
    pub fn resolve<R>(&self, raw: &R) -> T::Owned
    where
        R: RawValue<Resolved = T::Owned>,
    {
        let candidate = raw.present().unwrap_or_else(|| self.default.to_owned());

        let Some(floor) = self.floor else {
            return candidate;
        };

        let floor = floor.to_owned();
        if candidate < floor {
            warn!(
                field = %self.path(),
                supplied = %candidate,
                floor = %floor,
                "Value below floor, raising to floor"
            );
            return floor;
        }

        candidate
    }
}
