//! Default table for every resolvable configuration field.
//!
//! Each constant is a [`FieldSpec`] that the resolver applies to the matching
//! raw field. Changing a default here is a backward-compatibility-relevant
//! change: bump [`TABLE_VERSION`] and note it in the changelog.

use std::fmt;

use serde::Serialize;

use super::field::{FieldSpec, Section};

/// Version of the default table.
pub const TABLE_VERSION: u32 = 1;

/// Minimum number of connection pooler instances.
pub const POOLER_MIN_INSTANCES: i32 = 2;

/// Default maximum number of database connections opened by the pooler.
pub const POOLER_MAX_DB_CONNECTIONS: i32 = 60;

// general

pub const ENABLE_CRD_VALIDATION: FieldSpec<bool> =
    FieldSpec::defaulted(Section::General, "enable_crd_validation", &true);
pub const DOCKER_IMAGE: FieldSpec<str> = FieldSpec::defaulted(
    Section::General,
    "docker_image",
    "registry.opensource.zalan.do/acid/spilo-12:1.6-p3",
);
pub const SHM_VOLUME: FieldSpec<bool> = FieldSpec::defaulted(Section::General, "shm_volume", &true);

// users

pub const SUPER_USERNAME: FieldSpec<str> =
    FieldSpec::defaulted(Section::Users, "super_username", "postgres");
pub const REPLICATION_USERNAME: FieldSpec<str> =
    FieldSpec::defaulted(Section::Users, "replication_username", "standby");

// kubernetes

pub const POD_SERVICE_ACCOUNT_NAME: FieldSpec<str> =
    FieldSpec::defaulted(Section::Kubernetes, "pod_service_account_name", "postgres-pod");
pub const CLUSTER_DOMAIN: FieldSpec<str> =
    FieldSpec::defaulted(Section::Kubernetes, "cluster_domain", "cluster.local");
pub const ENABLE_POD_DISRUPTION_BUDGET: FieldSpec<bool> =
    FieldSpec::defaulted(Section::Kubernetes, "enable_pod_disruption_budget", &true);
pub const ENABLE_INIT_CONTAINERS: FieldSpec<bool> =
    FieldSpec::defaulted(Section::Kubernetes, "enable_init_containers", &true);
pub const ENABLE_SIDECARS: FieldSpec<bool> =
    FieldSpec::defaulted(Section::Kubernetes, "enable_sidecars", &true);
pub const SHARE_PGSOCKET_WITH_SIDECARS: FieldSpec<bool> =
    FieldSpec::defaulted(Section::Kubernetes, "share_pgsocket_with_sidecars", &false);
pub const POD_ROLE_LABEL: FieldSpec<str> =
    FieldSpec::defaulted(Section::Kubernetes, "pod_role_label", "spilo-role");
pub const CLUSTER_NAME_LABEL: FieldSpec<str> =
    FieldSpec::defaulted(Section::Kubernetes, "cluster_name_label", "cluster-name");
pub const POD_MANAGEMENT_POLICY: FieldSpec<str> =
    FieldSpec::defaulted(Section::Kubernetes, "pod_management_policy", "ordered_ready");
pub const POD_ANTIAFFINITY_TOPOLOGY_KEY: FieldSpec<str> = FieldSpec::defaulted(
    Section::Kubernetes,
    "pod_antiaffinity_topology_key",
    "kubernetes.io/hostname",
);

// postgres_pod_resources

pub const DEFAULT_CPU_REQUEST: FieldSpec<str> =
    FieldSpec::defaulted(Section::PostgresPodResources, "default_cpu_request", "100m");
pub const DEFAULT_MEMORY_REQUEST: FieldSpec<str> =
    FieldSpec::defaulted(Section::PostgresPodResources, "default_memory_request", "100Mi");
pub const DEFAULT_CPU_LIMIT: FieldSpec<str> =
    FieldSpec::defaulted(Section::PostgresPodResources, "default_cpu_limit", "1");
pub const DEFAULT_MEMORY_LIMIT: FieldSpec<str> =
    FieldSpec::defaulted(Section::PostgresPodResources, "default_memory_limit", "500Mi");
pub const MIN_CPU_LIMIT: FieldSpec<str> =
    FieldSpec::defaulted(Section::PostgresPodResources, "min_cpu_limit", "250m");
pub const MIN_MEMORY_LIMIT: FieldSpec<str> =
    FieldSpec::defaulted(Section::PostgresPodResources, "min_memory_limit", "250Mi");

// logical_backup

pub const LOGICAL_BACKUP_SCHEDULE: FieldSpec<str> =
    FieldSpec::defaulted(Section::LogicalBackup, "schedule", "30 00 * * *");
pub const LOGICAL_BACKUP_DOCKER_IMAGE: FieldSpec<str> = FieldSpec::defaulted(
    Section::LogicalBackup,
    "docker_image",
    "registry.opensource.zalan.do/acid/logical-backup",
);

// connection_pooler

pub const POOLER_NUMBER_OF_INSTANCES: FieldSpec<i32> = FieldSpec::floored(
    Section::ConnectionPooler,
    "number_of_instances",
    &POOLER_MIN_INSTANCES,
    &POOLER_MIN_INSTANCES,
);
pub const POOLER_SCHEMA: FieldSpec<str> =
    FieldSpec::defaulted(Section::ConnectionPooler, "schema", "pooler");
pub const POOLER_USER: FieldSpec<str> =
    FieldSpec::defaulted(Section::ConnectionPooler, "user", "pooler");
pub const POOLER_IMAGE: FieldSpec<str> = FieldSpec::defaulted(
    Section::ConnectionPooler,
    "image",
    "registry.opensource.zalan.do/acid/pgbouncer",
);
pub const POOLER_MODE: FieldSpec<str> =
    FieldSpec::defaulted(Section::ConnectionPooler, "mode", "transaction");
pub const POOLER_DEFAULT_CPU_REQUEST: FieldSpec<str> =
    FieldSpec::defaulted(Section::ConnectionPooler, "default_cpu_request", "500m");
pub const POOLER_DEFAULT_MEMORY_REQUEST: FieldSpec<str> =
    FieldSpec::defaulted(Section::ConnectionPooler, "default_memory_request", "100Mi");
pub const POOLER_DEFAULT_CPU_LIMIT: FieldSpec<str> =
    FieldSpec::defaulted(Section::ConnectionPooler, "default_cpu_limit", "1");
pub const POOLER_DEFAULT_MEMORY_LIMIT: FieldSpec<str> =
    FieldSpec::defaulted(Section::ConnectionPooler, "default_memory_limit", "100Mi");
pub const POOLER_MAX_DB_CONNECTIONS_FIELD: FieldSpec<i32> = FieldSpec::defaulted(
    Section::ConnectionPooler,
    "max_db_connections",
    &POOLER_MAX_DB_CONNECTIONS,
);

/// One row of the default table in printable form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DefaultEntry {
    /// Section the field lives in
    pub section: Section,
    /// Field key within the section
    pub name: &'static str,
    /// Default value, formatted
    pub default: String,
    /// Floor value, formatted, if the field has one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub floor: Option<String>,
}

impl<T: ?Sized + fmt::Display + 'static> FieldSpec<T> {
    /// Returns the printable table row for this descriptor.
    #[must_use]
    pub fn entry(&self) -> DefaultEntry {
        DefaultEntry {
            section: self.section,
            name: self.name,
            default: self.default.to_string(),
            floor: self.floor.map(ToString::to_string),
        }
    }
}

impl fmt::Display for DefaultEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{} = {}", self.section, self.name, self.default)?;
        if let Some(ref floor) = self.floor {
            write!(f, " (floor {floor})")?;
        }
        Ok(())
    }
}

/// Returns every defaulted field in table order.
#[must_use]
pub fn table() -> Vec<DefaultEntry> {
    vec![
        ENABLE_CRD_VALIDATION.entry(),
        DOCKER_IMAGE.entry(),
        SHM_VOLUME.entry(),
        SUPER_USERNAME.entry(),
        REPLICATION_USERNAME.entry(),
        POD_SERVICE_ACCOUNT_NAME.entry(),
        CLUSTER_DOMAIN.entry(),
        ENABLE_POD_DISRUPTION_BUDGET.entry(),
        ENABLE_INIT_CONTAINERS.entry(),
        ENABLE_SIDECARS.entry(),
        SHARE_PGSOCKET_WITH_SIDECARS.entry(),
        POD_ROLE_LABEL.entry(),
        CLUSTER_NAME_LABEL.entry(),
        POD_MANAGEMENT_POLICY.entry(),
        POD_ANTIAFFINITY_TOPOLOGY_KEY.entry(),
        DEFAULT_CPU_REQUEST.entry(),
        DEFAULT_MEMORY_REQUEST.entry(),
        DEFAULT_CPU_LIMIT.entry(),
        DEFAULT_MEMORY_LIMIT.entry(),
        MIN_CPU_LIMIT.entry(),
        MIN_MEMORY_LIMIT.entry(),
        LOGICAL_BACKUP_SCHEDULE.entry(),
        LOGICAL_BACKUP_DOCKER_IMAGE.entry(),
        POOLER_NUMBER_OF_INSTANCES.entry(),
        POOLER_SCHEMA.entry(),
        POOLER_USER.entry(),
        POOLER_IMAGE.entry(),
        POOLER_MODE.entry(),
        POOLER_DEFAULT_CPU_REQUEST.entry(),
        POOLER_DEFAULT_MEMORY_REQUEST.entry(),
        POOLER_DEFAULT_CPU_LIMIT.entry(),
        POOLER_DEFAULT_MEMORY_LIMIT.entry(),
        POOLER_MAX_DB_CONNECTIONS_FIELD.entry(),
    ]
}
