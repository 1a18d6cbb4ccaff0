//! Raw configuration as supplied by the configuration store.
//!
//! Defines the partially populated input structure with serde. Every field is
//! optional: an empty file is a legal raw configuration.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use super::ConfigError;

/// Root of the externally supplied configuration.
///
/// Immutable once handed to the resolver. Sections default to empty so that
/// partial documents parse.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfiguration {
    /// Top-level operator settings
    #[serde(default)]
    pub general: GeneralSection,

    /// System user names
    #[serde(default)]
    pub users: UsersSection,

    /// Kubernetes object settings
    #[serde(default)]
    pub kubernetes: KubernetesSection,

    /// Default pod resources
    #[serde(default)]
    pub postgres_pod_resources: PodResourcesSection,

    /// Wait intervals and timeouts
    #[serde(default)]
    pub timeouts: TimeoutsSection,

    /// Load balancer settings
    #[serde(default)]
    pub load_balancer: LoadBalancerSection,

    /// Cloud provider settings
    #[serde(default)]
    pub aws_or_gcp: CloudSection,

    /// Logical backup settings
    #[serde(default)]
    pub logical_backup: LogicalBackupSection,

    /// Debug switches
    #[serde(default)]
    pub debug: DebugSection,

    /// Teams API settings
    #[serde(default)]
    pub teams_api: TeamsApiSection,

    /// Logging REST API settings
    #[serde(default)]
    pub logging_rest_api: LoggingRestApiSection,

    /// Scalyr sidecar settings
    #[serde(default)]
    pub scalyr: ScalyrSection,

    /// Connection pooler settings
    #[serde(default)]
    pub connection_pooler: ConnectionPoolerSection,
}

/// General operator settings.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
#[allow(clippy::struct_excessive_bools)] // Mirrors the operator's feature switches
pub struct GeneralSection {
    pub enable_crd_validation: Option<bool>,
    pub enable_lazy_spilo_upgrade: bool,
    pub etcd_host: String,
    pub kubernetes_use_configmaps: bool,
    pub docker_image: String,
    pub workers: u32,
    pub min_instances: i32,
    pub max_instances: i32,
    /// Seconds
    pub resync_period: u64,
    /// Seconds
    pub repair_period: u64,
    pub set_memory_request_to_limit: bool,
    pub shm_volume: Option<bool>,
    pub sidecar_images: BTreeMap<String, String>,
    /// Opaque container documents, passed through untouched
    pub sidecar_containers: Vec<serde_json::Value>,
}

/// System user names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UsersSection {
    pub super_username: String,
    pub replication_username: String,
}

/// Kubernetes object settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KubernetesSection {
    pub pod_service_account_name: String,
    pub pod_service_account_definition: String,
    pub pod_service_account_role_binding_definition: String,
    /// Seconds
    pub pod_terminate_grace_period: u64,
    pub spilo_privileged: bool,
    pub spilo_fsgroup: Option<i64>,
    pub watched_namespace: String,
    pub pdb_name_format: String,
    pub enable_pod_disruption_budget: Option<bool>,
    pub secret_name_template: String,
    pub cluster_domain: String,
    pub oauth_token_secret_name: String,
    pub infrastructure_roles_secret_name: String,
    pub pod_role_label: String,
    pub cluster_labels: BTreeMap<String, String>,
    pub inherited_labels: Vec<String>,
    pub downscaler_annotations: Vec<String>,
    pub cluster_name_label: String,
    pub node_readiness_label: BTreeMap<String, String>,
    pub custom_pod_annotations: BTreeMap<String, String>,
    pub pod_priority_class_name: String,
    pub pod_environment_configmap: String,
    /// Seconds
    pub master_pod_move_timeout: u64,
    pub enable_pod_antiaffinity: bool,
    pub pod_antiaffinity_topology_key: String,
    pub pod_management_policy: String,
    pub enable_init_containers: Option<bool>,
    pub enable_sidecars: Option<bool>,
    pub share_pgsocket_with_sidecars: Option<bool>,
}

/// Default resource requests and limits for Postgres pods.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PodResourcesSection {
    pub default_cpu_request: String,
    pub default_memory_request: String,
    pub default_cpu_limit: String,
    pub default_memory_limit: String,
    pub min_cpu_limit: String,
    pub min_memory_limit: String,
}

/// Wait intervals and timeouts, all in seconds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimeoutsSection {
    pub resource_check_interval: u64,
    pub resource_check_timeout: u64,
    pub pod_label_wait_timeout: u64,
    pub pod_deletion_wait_timeout: u64,
    pub ready_wait_interval: u64,
    pub ready_wait_timeout: u64,
}

/// Load balancer and DNS settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoadBalancerSection {
    pub db_hosted_zone: String,
    pub enable_master_load_balancer: bool,
    pub enable_replica_load_balancer: bool,
    pub custom_service_annotations: BTreeMap<String, String>,
    pub master_dns_name_format: String,
    pub replica_dns_name_format: String,
}

/// Cloud provider settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CloudSection {
    pub wal_s3_bucket: String,
    pub aws_region: String,
    pub log_s3_bucket: String,
    pub kube_iam_role: String,
    pub additional_secret_mount: String,
    pub additional_secret_mount_path: String,
}

/// Logical backup job settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogicalBackupSection {
    pub schedule: String,
    pub docker_image: String,
    pub s3_bucket: String,
    pub s3_region: String,
    pub s3_endpoint: String,
    pub s3_access_key_id: String,
    pub s3_secret_access_key: String,
    pub s3_sse: String,
}

/// Debug switches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DebugSection {
    pub debug_logging: bool,
    pub enable_database_access: bool,
}

/// External team directory settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TeamsApiSection {
    pub enable_teams_api: bool,
    pub teams_api_url: String,
    pub team_api_role_configuration: BTreeMap<String, String>,
    pub enable_team_superuser: bool,
    pub enable_admin_role_for_users: bool,
    pub team_admin_role: String,
    pub pam_role_name: String,
    pub pam_configuration: String,
    pub protected_role_names: Vec<String>,
    pub postgres_superuser_teams: Vec<String>,
}

/// Logging REST API settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingRestApiSection {
    pub api_port: i32,
    pub ring_log_lines: i32,
    pub cluster_history_entries: i32,
}

/// Scalyr log shipping sidecar settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScalyrSection {
    pub api_key: String,
    pub image: String,
    pub server_url: String,
    pub cpu_request: String,
    pub memory_request: String,
    pub cpu_limit: String,
    pub memory_limit: String,
}

/// Connection pooler settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConnectionPoolerSection {
    pub number_of_instances: Option<i32>,
    pub schema: String,
    pub user: String,
    pub image: String,
    pub mode: String,
    pub default_cpu_request: String,
    pub default_memory_request: String,
    pub default_cpu_limit: String,
    pub default_memory_limit: String,
    pub max_db_connections: Option<i32>,
}

impl RawConfiguration {
    /// Loads a raw configuration from a file.
    ///
    /// Files with a `.json` extension are parsed as JSON, everything else as TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        if is_json {
            Self::parse_json(&content)
        } else {
            Self::parse_toml(&content)
        }
    }

    /// Parses a raw configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }

    /// Parses a raw configuration from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is invalid.
    pub fn parse_json(content: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(content).map_err(ConfigError::from)
    }
}

/// Generates a commented configuration template.
#[must_use]
pub fn default_config_template() -> String {
    r#"# Operator configuration
#
# Every key is optional. Empty or missing values fall back to the built-in
# defaults (run `operator-config defaults` to list them). Durations are in
# seconds.

[general]
# docker_image = "registry.opensource.zalan.do/acid/spilo-12:1.6-p3"
# enable_crd_validation = true
# shm_volume = true
# workers = 8
# min_instances = -1
# max_instances = -1
# resync_period = 1800
# repair_period = 300

[users]
# super_username = "postgres"
# replication_username = "standby"

[kubernetes]
# pod_service_account_name = "postgres-pod"
# cluster_domain = "cluster.local"
# pod_role_label = "spilo-role"
# cluster_name_label = "cluster-name"
# pod_management_policy = "ordered_ready"
# enable_pod_antiaffinity = false
# pod_antiaffinity_topology_key = "kubernetes.io/hostname"
# pod_terminate_grace_period = 300
# master_pod_move_timeout = 1200

[postgres_pod_resources]
# default_cpu_request = "100m"
# default_memory_request = "100Mi"
# default_cpu_limit = "1"
# default_memory_limit = "500Mi"
# min_cpu_limit = "250m"
# min_memory_limit = "250Mi"

[timeouts]
# resource_check_interval = 3
# resource_check_timeout = 600
# pod_label_wait_timeout = 600
# pod_deletion_wait_timeout = 600
# ready_wait_interval = 4
# ready_wait_timeout = 30

[logical_backup]
# schedule = "30 00 * * *"
# docker_image = "registry.opensource.zalan.do/acid/logical-backup"
# s3_bucket = "my-bucket-url"

[connection_pooler]
# Values below 2 are raised to 2
# number_of_instances = 2
# schema = "pooler"
# Must differ from users.super_username
# user = "pooler"
# image = "registry.opensource.zalan.do/acid/pgbouncer"
# mode = "transaction"
# default_cpu_request = "500m"
# default_memory_request = "100Mi"
# default_cpu_limit = "1"
# default_memory_limit = "100Mi"
# max_db_connections = 60
"#
    .to_string()
}
