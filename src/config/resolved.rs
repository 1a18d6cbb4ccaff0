//! Resolved configuration: every defaulted field populated.
//!
//! [`ResolvedConfiguration::resolve`] is the resolver. It is pure and total:
//! each section copies pass-through fields, re-types durations and sends every
//! defaulted field through its descriptor in [`super::defaults`]. Cross-field
//! rules are not checked here; see [`super::validate`].

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use serde::Serialize;
use tracing::debug;

use super::defaults as d;
use super::raw::{
    CloudSection, ConnectionPoolerSection, DebugSection, GeneralSection, KubernetesSection,
    LoadBalancerSection, LoggingRestApiSection, LogicalBackupSection, PodResourcesSection,
    RawConfiguration, ScalyrSection, TeamsApiSection, TimeoutsSection, UsersSection,
};

/// Fully resolved configuration ready for the control loop.
///
/// Field names match [`RawConfiguration`], so a rendered instance can be read
/// back as raw input. Never mutated after construction; a reload produces a
/// new instance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedConfiguration {
    pub general: GeneralConfig,
    pub users: UsersConfig,
    pub kubernetes: KubernetesConfig,
    pub postgres_pod_resources: PodResourcesConfig,
    pub timeouts: TimeoutsConfig,
    pub load_balancer: LoadBalancerConfig,
    pub aws_or_gcp: CloudConfig,
    pub logical_backup: LogicalBackupConfig,
    pub debug: DebugConfig,
    pub teams_api: TeamsApiConfig,
    pub logging_rest_api: LoggingRestApiConfig,
    pub scalyr: ScalyrConfig,
    pub connection_pooler: ConnectionPoolerConfig,
}

/// Durations render as whole seconds, the unit raw files use.
mod seconds {
    use std::time::Duration;

    use serde::Serializer;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[allow(clippy::struct_excessive_bools)] // Mirrors the operator's feature switches
pub struct GeneralConfig {
    pub enable_crd_validation: bool,
    pub enable_lazy_spilo_upgrade: bool,
    pub etcd_host: String,
    pub kubernetes_use_configmaps: bool,
    pub docker_image: String,
    pub workers: u32,
    pub min_instances: i32,
    pub max_instances: i32,
    #[serde(serialize_with = "seconds::serialize")]
    pub resync_period: Duration,
    #[serde(serialize_with = "seconds::serialize")]
    pub repair_period: Duration,
    pub set_memory_request_to_limit: bool,
    pub shm_volume: bool,
    pub sidecar_images: BTreeMap<String, String>,
    pub sidecar_containers: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UsersConfig {
    pub super_username: String,
    pub replication_username: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[allow(clippy::struct_excessive_bools)] // Mirrors the operator's feature switches
pub struct KubernetesConfig {
    pub pod_service_account_name: String,
    pub pod_service_account_definition: String,
    pub pod_service_account_role_binding_definition: String,
    #[serde(serialize_with = "seconds::serialize")]
    pub pod_terminate_grace_period: Duration,
    pub spilo_privileged: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spilo_fsgroup: Option<i64>,
    pub watched_namespace: String,
    pub pdb_name_format: String,
    pub enable_pod_disruption_budget: bool,
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
    #[serde(serialize_with = "seconds::serialize")]
    pub master_pod_move_timeout: Duration,
    pub enable_pod_antiaffinity: bool,
    pub pod_antiaffinity_topology_key: String,
    pub pod_management_policy: String,
    pub enable_init_containers: bool,
    pub enable_sidecars: bool,
    pub share_pgsocket_with_sidecars: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PodResourcesConfig {
    pub default_cpu_request: String,
    pub default_memory_request: String,
    pub default_cpu_limit: String,
    pub default_memory_limit: String,
    pub min_cpu_limit: String,
    pub min_memory_limit: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeoutsConfig {
    #[serde(serialize_with = "seconds::serialize")]
    pub resource_check_interval: Duration,
    #[serde(serialize_with = "seconds::serialize")]
    pub resource_check_timeout: Duration,
    #[serde(serialize_with = "seconds::serialize")]
    pub pod_label_wait_timeout: Duration,
    #[serde(serialize_with = "seconds::serialize")]
    pub pod_deletion_wait_timeout: Duration,
    #[serde(serialize_with = "seconds::serialize")]
    pub ready_wait_interval: Duration,
    #[serde(serialize_with = "seconds::serialize")]
    pub ready_wait_timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadBalancerConfig {
    pub db_hosted_zone: String,
    pub enable_master_load_balancer: bool,
    pub enable_replica_load_balancer: bool,
    pub custom_service_annotations: BTreeMap<String, String>,
    pub master_dns_name_format: String,
    pub replica_dns_name_format: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CloudConfig {
    pub wal_s3_bucket: String,
    pub aws_region: String,
    pub log_s3_bucket: String,
    pub kube_iam_role: String,
    pub additional_secret_mount: String,
    pub additional_secret_mount_path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogicalBackupConfig {
    pub schedule: String,
    pub docker_image: String,
    pub s3_bucket: String,
    pub s3_region: String,
    pub s3_endpoint: String,
    pub s3_access_key_id: String,
    pub s3_secret_access_key: String,
    pub s3_sse: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DebugConfig {
    pub debug_logging: bool,
    pub enable_database_access: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamsApiConfig {
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

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoggingRestApiConfig {
    pub api_port: i32,
    pub ring_log_lines: i32,
    pub cluster_history_entries: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScalyrConfig {
    pub api_key: String,
    pub image: String,
    pub server_url: String,
    pub cpu_request: String,
    pub memory_request: String,
    pub cpu_limit: String,
    pub memory_limit: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionPoolerConfig {
    pub number_of_instances: i32,
    pub schema: String,
    pub user: String,
    pub image: String,
    pub mode: String,
    pub default_cpu_request: String,
    pub default_memory_request: String,
    pub default_cpu_limit: String,
    pub default_memory_limit: String,
    pub max_db_connections: i32,
}

impl fmt::Display for ResolvedConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Config {{ image: {}, workers: {}, super_username: {}, pooler: {}x {} as {}, \
             backup_schedule: '{}', teams_api: {} }}",
            self.general.docker_image,
            self.general.workers,
            self.users.super_username,
            self.connection_pooler.number_of_instances,
            self.connection_pooler.mode,
            self.connection_pooler.user,
            self.logical_backup.schedule,
            self.teams_api.enable_teams_api,
        )
    }
}

impl From<&RawConfiguration> for ResolvedConfiguration {
    fn from(raw: &RawConfiguration) -> Self {
        Self::resolve(raw)
    }
}

impl ResolvedConfiguration {
    /// Resolves a raw configuration.
    ///
    /// Never fails: every absent value has a default. The result has not been
    /// checked for cross-field consistency yet.
    #[must_use]
    pub fn resolve(raw: &RawConfiguration) -> Self {
        let resolved = Self {
            general: resolve_general(&raw.general),
            users: resolve_users(&raw.users),
            kubernetes: resolve_kubernetes(&raw.kubernetes),
            postgres_pod_resources: resolve_pod_resources(&raw.postgres_pod_resources),
            timeouts: resolve_timeouts(&raw.timeouts),
            load_balancer: resolve_load_balancer(&raw.load_balancer),
            aws_or_gcp: resolve_cloud(&raw.aws_or_gcp),
            logical_backup: resolve_logical_backup(&raw.logical_backup),
            debug: resolve_debug(&raw.debug),
            teams_api: resolve_teams_api(&raw.teams_api),
            logging_rest_api: resolve_logging_rest_api(&raw.logging_rest_api),
            scalyr: resolve_scalyr(&raw.scalyr),
            connection_pooler: resolve_connection_pooler(&raw.connection_pooler),
        };

        debug!("Resolved configuration: {resolved}");
        resolved
    }
}

fn resolve_general(raw: &GeneralSection) -> GeneralConfig {
    GeneralConfig {
        enable_crd_validation: d::ENABLE_CRD_VALIDATION.resolve(&raw.enable_crd_validation),
        enable_lazy_spilo_upgrade: raw.enable_lazy_spilo_upgrade,
        etcd_host: raw.etcd_host.clone(),
        kubernetes_use_configmaps: raw.kubernetes_use_configmaps,
        docker_image: d::DOCKER_IMAGE.resolve(&raw.docker_image),
        workers: raw.workers,
        min_instances: raw.min_instances,
        max_instances: raw.max_instances,
        resync_period: Duration::from_secs(raw.resync_period),
        repair_period: Duration::from_secs(raw.repair_period),
        set_memory_request_to_limit: raw.set_memory_request_to_limit,
        shm_volume: d::SHM_VOLUME.resolve(&raw.shm_volume),
        sidecar_images: raw.sidecar_images.clone(),
        sidecar_containers: raw.sidecar_containers.clone(),
    }
}

fn resolve_users(raw: &UsersSection) -> UsersConfig {
    UsersConfig {
        super_username: d::SUPER_USERNAME.resolve(&raw.super_username),
        replication_username: d::REPLICATION_USERNAME.resolve(&raw.replication_username),
    }
}

fn resolve_kubernetes(raw: &KubernetesSection) -> KubernetesConfig {
    KubernetesConfig {
        pod_service_account_name: d::POD_SERVICE_ACCOUNT_NAME
            .resolve(&raw.pod_service_account_name),
        pod_service_account_definition: raw.pod_service_account_definition.clone(),
        pod_service_account_role_binding_definition: raw
            .pod_service_account_role_binding_definition
            .clone(),
        pod_terminate_grace_period: Duration::from_secs(raw.pod_terminate_grace_period),
        spilo_privileged: raw.spilo_privileged,
        spilo_fsgroup: raw.spilo_fsgroup,
        watched_namespace: raw.watched_namespace.clone(),
        pdb_name_format: raw.pdb_name_format.clone(),
        enable_pod_disruption_budget: d::ENABLE_POD_DISRUPTION_BUDGET
            .resolve(&raw.enable_pod_disruption_budget),
        secret_name_template: raw.secret_name_template.clone(),
        cluster_domain: d::CLUSTER_DOMAIN.resolve(&raw.cluster_domain),
        oauth_token_secret_name: raw.oauth_token_secret_name.clone(),
        infrastructure_roles_secret_name: raw.infrastructure_roles_secret_name.clone(),
        pod_role_label: d::POD_ROLE_LABEL.resolve(&raw.pod_role_label),
        cluster_labels: raw.cluster_labels.clone(),
        inherited_labels: raw.inherited_labels.clone(),
        downscaler_annotations: raw.downscaler_annotations.clone(),
        cluster_name_label: d::CLUSTER_NAME_LABEL.resolve(&raw.cluster_name_label),
        node_readiness_label: raw.node_readiness_label.clone(),
        custom_pod_annotations: raw.custom_pod_annotations.clone(),
        pod_priority_class_name: raw.pod_priority_class_name.clone(),
        pod_environment_configmap: raw.pod_environment_configmap.clone(),
        master_pod_move_timeout: Duration::from_secs(raw.master_pod_move_timeout),
        enable_pod_antiaffinity: raw.enable_pod_antiaffinity,
        pod_antiaffinity_topology_key: d::POD_ANTIAFFINITY_TOPOLOGY_KEY
            .resolve(&raw.pod_antiaffinity_topology_key),
        pod_management_policy: d::POD_MANAGEMENT_POLICY.resolve(&raw.pod_management_policy),
        enable_init_containers: d::ENABLE_INIT_CONTAINERS.resolve(&raw.enable_init_containers),
        enable_sidecars: d::ENABLE_SIDECARS.resolve(&raw.enable_sidecars),
        share_pgsocket_with_sidecars: d::SHARE_PGSOCKET_WITH_SIDECARS
            .resolve(&raw.share_pgsocket_with_sidecars),
    }
}

fn resolve_pod_resources(raw: &PodResourcesSection) -> PodResourcesConfig {
    PodResourcesConfig {
        default_cpu_request: d::DEFAULT_CPU_REQUEST.resolve(&raw.default_cpu_request),
        default_memory_request: d::DEFAULT_MEMORY_REQUEST.resolve(&raw.default_memory_request),
        default_cpu_limit: d::DEFAULT_CPU_LIMIT.resolve(&raw.default_cpu_limit),
        default_memory_limit: d::DEFAULT_MEMORY_LIMIT.resolve(&raw.default_memory_limit),
        min_cpu_limit: d::MIN_CPU_LIMIT.resolve(&raw.min_cpu_limit),
        min_memory_limit: d::MIN_MEMORY_LIMIT.resolve(&raw.min_memory_limit),
    }
}

const fn resolve_timeouts(raw: &TimeoutsSection) -> TimeoutsConfig {
    TimeoutsConfig {
        resource_check_interval: Duration::from_secs(raw.resource_check_interval),
        resource_check_timeout: Duration::from_secs(raw.resource_check_timeout),
        pod_label_wait_timeout: Duration::from_secs(raw.pod_label_wait_timeout),
        pod_deletion_wait_timeout: Duration::from_secs(raw.pod_deletion_wait_timeout),
        ready_wait_interval: Duration::from_secs(raw.ready_wait_interval),
        ready_wait_timeout: Duration::from_secs(raw.ready_wait_timeout),
    }
}

fn resolve_load_balancer(raw: &LoadBalancerSection) -> LoadBalancerConfig {
    LoadBalancerConfig {
        db_hosted_zone: raw.db_hosted_zone.clone(),
        enable_master_load_balancer: raw.enable_master_load_balancer,
        enable_replica_load_balancer: raw.enable_replica_load_balancer,
        custom_service_annotations: raw.custom_service_annotations.clone(),
        master_dns_name_format: raw.master_dns_name_format.clone(),
        replica_dns_name_format: raw.replica_dns_name_format.clone(),
    }
}

fn resolve_cloud(raw: &CloudSection) -> CloudConfig {
    CloudConfig {
        wal_s3_bucket: raw.wal_s3_bucket.clone(),
        aws_region: raw.aws_region.clone(),
        log_s3_bucket: raw.log_s3_bucket.clone(),
        kube_iam_role: raw.kube_iam_role.clone(),
        additional_secret_mount: raw.additional_secret_mount.clone(),
        additional_secret_mount_path: raw.additional_secret_mount_path.clone(),
    }
}

fn resolve_logical_backup(raw: &LogicalBackupSection) -> LogicalBackupConfig {
    LogicalBackupConfig {
        schedule: d::LOGICAL_BACKUP_SCHEDULE.resolve(&raw.schedule),
        docker_image: d::LOGICAL_BACKUP_DOCKER_IMAGE.resolve(&raw.docker_image),
        s3_bucket: raw.s3_bucket.clone(),
        s3_region: raw.s3_region.clone(),
        s3_endpoint: raw.s3_endpoint.clone(),
        s3_access_key_id: raw.s3_access_key_id.clone(),
        s3_secret_access_key: raw.s3_secret_access_key.clone(),
        s3_sse: raw.s3_sse.clone(),
    }
}

const fn resolve_debug(raw: &DebugSection) -> DebugConfig {
    DebugConfig {
        debug_logging: raw.debug_logging,
        enable_database_access: raw.enable_database_access,
    }
}

fn resolve_teams_api(raw: &TeamsApiSection) -> TeamsApiConfig {
    TeamsApiConfig {
        enable_teams_api: raw.enable_teams_api,
        teams_api_url: raw.teams_api_url.clone(),
        team_api_role_configuration: raw.team_api_role_configuration.clone(),
        enable_team_superuser: raw.enable_team_superuser,
        enable_admin_role_for_users: raw.enable_admin_role_for_users,
        team_admin_role: raw.team_admin_role.clone(),
        pam_role_name: raw.pam_role_name.clone(),
        pam_configuration: raw.pam_configuration.clone(),
        protected_role_names: raw.protected_role_names.clone(),
        postgres_superuser_teams: raw.postgres_superuser_teams.clone(),
    }
}

const fn resolve_logging_rest_api(raw: &LoggingRestApiSection) -> LoggingRestApiConfig {
    LoggingRestApiConfig {
        api_port: raw.api_port,
        ring_log_lines: raw.ring_log_lines,
        cluster_history_entries: raw.cluster_history_entries,
    }
}

fn resolve_scalyr(raw: &ScalyrSection) -> ScalyrConfig {
    ScalyrConfig {
        api_key: raw.api_key.clone(),
        image: raw.image.clone(),
        server_url: raw.server_url.clone(),
        cpu_request: raw.cpu_request.clone(),
        memory_request: raw.memory_request.clone(),
        cpu_limit: raw.cpu_limit.clone(),
        memory_limit: raw.memory_limit.clone(),
    }
}

fn resolve_connection_pooler(raw: &ConnectionPoolerSection) -> ConnectionPoolerConfig {
    ConnectionPoolerConfig {
        number_of_instances: d::POOLER_NUMBER_OF_INSTANCES.resolve(&raw.number_of_instances),
        schema: d::POOLER_SCHEMA.resolve(&raw.schema),
        user: d::POOLER_USER.resolve(&raw.user),
        image: d::POOLER_IMAGE.resolve(&raw.image),
        mode: d::POOLER_MODE.resolve(&raw.mode),
        default_cpu_request: d::POOLER_DEFAULT_CPU_REQUEST.resolve(&raw.default_cpu_request),
        default_memory_request: d::POOLER_DEFAULT_MEMORY_REQUEST
            .resolve(&raw.default_memory_request),
        default_cpu_limit: d::POOLER_DEFAULT_CPU_LIMIT.resolve(&raw.default_cpu_limit),
        default_memory_limit: d::POOLER_DEFAULT_MEMORY_LIMIT.resolve(&raw.default_memory_limit),
        max_db_connections: d::POOLER_MAX_DB_CONNECTIONS_FIELD.resolve(&raw.max_db_connections),
    }
}
