//! Tests for the resolver.

use super::raw::RawConfiguration;
use super::resolved::ResolvedConfiguration;

/// Helper to parse a TOML raw configuration
fn raw(content: &str) -> RawConfiguration {
    RawConfiguration::parse_toml(content).unwrap()
}

/// Helper to resolve a TOML raw configuration
fn resolve(content: &str) -> ResolvedConfiguration {
    ResolvedConfiguration::resolve(&raw(content))
}

/// A raw configuration with every field set to a non-default value
const FULLY_POPULATED: &str = r#"
[general]
enable_crd_validation = false
enable_lazy_spilo_upgrade = true
etcd_host = "etcd.example:2379"
kubernetes_use_configmaps = true
docker_image = "example/spilo:custom"
workers = 16
min_instances = 1
max_instances = 5
resync_period = 1800
repair_period = 300
set_memory_request_to_limit = true
shm_volume = false
sidecar_images = { logger = "example/logger:1" }
sidecar_containers = [{ name = "exporter", image = "example/exporter:2" }]

[users]
super_username = "root"
replication_username = "replica"

[kubernetes]
pod_service_account_name = "custom-pod"
pod_service_account_definition = "{ kind: ServiceAccount }"
pod_service_account_role_binding_definition = "{ kind: RoleBinding }"
pod_terminate_grace_period = 60
spilo_privileged = true
spilo_fsgroup = 103
watched_namespace = "databases"
pdb_name_format = "pdb-{cluster}"
enable_pod_disruption_budget = false
secret_name_template = "{username}.{cluster}"
cluster_domain = "cluster.example"
oauth_token_secret_name = "default/oauth"
infrastructure_roles_secret_name = "infra-roles"
pod_role_label = "role"
cluster_labels = { application = "db" }
inherited_labels = ["team"]
downscaler_annotations = ["downscaler/downtime"]
cluster_name_label = "name"
node_readiness_label = { ready = "true" }
custom_pod_annotations = { owner = "dba" }
pod_priority_class_name = "critical"
pod_environment_configmap = "pod-env"
master_pod_move_timeout = 1200
enable_pod_antiaffinity = true
pod_antiaffinity_topology_key = "topology.kubernetes.io/zone"
pod_management_policy = "parallel"
enable_init_containers = false
enable_sidecars = false
share_pgsocket_with_sidecars = true

[postgres_pod_resources]
default_cpu_request = "200m"
default_memory_request = "200Mi"
default_cpu_limit = "2"
default_memory_limit = "1Gi"
min_cpu_limit = "500m"
min_memory_limit = "500Mi"

[timeouts]
resource_check_interval = 3
resource_check_timeout = 600
pod_label_wait_timeout = 600
pod_deletion_wait_timeout = 600
ready_wait_interval = 4
ready_wait_timeout = 30

[load_balancer]
db_hosted_zone = "db.example.com"
enable_master_load_balancer = true
enable_replica_load_balancer = true
custom_service_annotations = { internal = "true" }
master_dns_name_format = "{cluster}.{team}.{hostedzone}"
replica_dns_name_format = "{cluster}-repl.{team}.{hostedzone}"

[aws_or_gcp]
wal_s3_bucket = "wal-bucket"
aws_region = "eu-central-1"
log_s3_bucket = "log-bucket"
kube_iam_role = "iam-role"
additional_secret_mount = "secret"
additional_secret_mount_path = "/meta/credentials"

[logical_backup]
schedule = "0 1 * * *"
docker_image = "example/logical-backup:1"
s3_bucket = "backup-bucket"
s3_region = "eu-west-1"
s3_endpoint = "https://s3.example.com"
s3_access_key_id = "key-id"
s3_secret_access_key = "secret-key"
s3_sse = "AES256"

[debug]
debug_logging = true
enable_database_access = true

[teams_api]
enable_teams_api = true
teams_api_url = "https://teams.example.com/api/"
team_api_role_configuration = { log_statement = "all" }
enable_team_superuser = true
enable_admin_role_for_users = true
team_admin_role = "admin"
pam_role_name = "zalandos"
pam_configuration = "https://info.example.com/oauth2/tokeninfo?access_token= uid realm=/employees"
protected_role_names = ["admin"]
postgres_superuser_teams = ["postgres_superusers"]

[logging_rest_api]
api_port = 8080
ring_log_lines = 100
cluster_history_entries = 1000

[scalyr]
api_key = "scalyr-key"
image = "example/scalyr:1"
server_url = "https://upload.example.com"
cpu_request = "100m"
memory_request = "50Mi"
cpu_limit = "1"
memory_limit = "500Mi"

[connection_pooler]
number_of_instances = 5
schema = "bouncer"
user = "bouncer"
image = "example/pgbouncer:1"
mode = "session"
default_cpu_request = "300m"
default_memory_request = "64Mi"
default_cpu_limit = "2"
default_memory_limit = "256Mi"
max_db_connections = 120
"#;

mod floor_tests;
