//! Tests for raw configuration parsing.

use super::raw::{RawConfiguration, default_config_template};

mod parsing {
    use super::*;

    #[test]
    fn empty_document_is_legal() {
        let config = RawConfiguration::parse_toml("").unwrap();
        assert_eq!(config, RawConfiguration::default());
    }

    #[test]
    fn partial_sections() {
        let toml = r#"
            [general]
            docker_image = "example/spilo:1"
            workers = 4

            [connection_pooler]
            number_of_instances = 3
        "#;

        let config = RawConfiguration::parse_toml(toml).unwrap();

        assert_eq!(config.general.docker_image, "example/spilo:1");
        assert_eq!(config.general.workers, 4);
        assert_eq!(config.connection_pooler.number_of_instances, Some(3));
        assert!(config.connection_pooler.user.is_empty());
        assert_eq!(config.users, crate::config::UsersSection::default());
    }

    #[test]
    fn unset_booleans_stay_unset() {
        let toml = r"
            [kubernetes]
            enable_sidecars = false
        ";

        let config = RawConfiguration::parse_toml(toml).unwrap();

        assert_eq!(config.kubernetes.enable_sidecars, Some(false));
        assert_eq!(config.kubernetes.enable_init_containers, None);
        assert_eq!(config.general.shm_volume, None);
    }

    #[test]
    fn collections() {
        let toml = r#"
            [kubernetes]
            inherited_labels = ["application", "environment"]

            [kubernetes.cluster_labels]
            application = "spilo"

            [teams_api]
            protected_role_names = ["admin"]

            [general.sidecar_images]
            logger = "example/logger:1"
        "#;

        let config = RawConfiguration::parse_toml(toml).unwrap();

        assert_eq!(
            config.kubernetes.inherited_labels,
            vec!["application", "environment"]
        );
        assert_eq!(
            config.kubernetes.cluster_labels.get("application").map(String::as_str),
            Some("spilo")
        );
        assert_eq!(config.teams_api.protected_role_names, vec!["admin"]);
        assert_eq!(config.general.sidecar_images.len(), 1);
    }

    #[test]
    fn sidecar_containers_are_opaque_documents() {
        let toml = r#"
            [[general.sidecar_containers]]
            name = "exporter"
            image = "example/exporter:2"

            [general.sidecar_containers.resources]
            cpu = "50m"
        "#;

        let config = RawConfiguration::parse_toml(toml).unwrap();
        let container = &config.general.sidecar_containers[0];

        assert_eq!(container["name"], "exporter");
        assert_eq!(container["resources"]["cpu"], "50m");
    }

    #[test]
    fn json_document() {
        let json = r#"{
            "users": { "super_username": "root" },
            "connection_pooler": { "user": "bouncer", "max_db_connections": 10 },
            "kubernetes": { "spilo_fsgroup": 103 }
        }"#;

        let config = RawConfiguration::parse_json(json).unwrap();

        assert_eq!(config.users.super_username, "root");
        assert_eq!(config.connection_pooler.user, "bouncer");
        assert_eq!(config.connection_pooler.max_db_connections, Some(10));
        assert_eq!(config.kubernetes.spilo_fsgroup, Some(103));
    }
}

mod errors {
    use super::*;
    use crate::config::ConfigError;

    #[test]
    fn unknown_section_rejected() {
        let result = RawConfiguration::parse_toml("[unknown]\nkey = 1");
        assert!(matches!(result, Err(ConfigError::TomlParse(_))));
    }

    #[test]
    fn unknown_field_rejected() {
        let toml = r#"
            [users]
            superuser = "postgres"
        "#;
        let result = RawConfiguration::parse_toml(toml);
        assert!(matches!(result, Err(ConfigError::TomlParse(_))));
    }

    #[test]
    fn wrong_type_rejected() {
        let toml = r#"
            [connection_pooler]
            number_of_instances = "two"
        "#;
        let result = RawConfiguration::parse_toml(toml);
        assert!(matches!(result, Err(ConfigError::TomlParse(_))));
    }

    #[test]
    fn negative_duration_rejected() {
        let toml = r"
            [timeouts]
            ready_wait_timeout = -1
        ";
        let result = RawConfiguration::parse_toml(toml);
        assert!(matches!(result, Err(ConfigError::TomlParse(_))));
    }

    #[test]
    fn invalid_json_rejected() {
        let result = RawConfiguration::parse_json("{ \"users\": ");
        assert!(matches!(result, Err(ConfigError::JsonParse(_))));
    }
}

mod loading {
    use std::io::Write;

    use tempfile::{Builder, NamedTempFile, tempdir};

    use super::*;
    use crate::config::{ConfigError, write_default_config};

    #[test]
    fn load_toml_file() {
        let mut file = Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[users]\nsuper_username = \"admin\"").unwrap();

        let config = RawConfiguration::load(file.path()).unwrap();
        assert_eq!(config.users.super_username, "admin");
    }

    #[test]
    fn load_json_file_by_extension() {
        let mut file = Builder::new().suffix(".JSON").tempfile().unwrap();
        writeln!(file, r#"{{"users": {{"replication_username": "replica"}}}}"#).unwrap();

        let config = RawConfiguration::load(file.path()).unwrap();
        assert_eq!(config.users.replication_username, "replica");
    }

    #[test]
    fn missing_file_returns_file_read_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        let result = RawConfiguration::load(&path);
        assert!(matches!(result, Err(ConfigError::FileRead { .. })));
    }

    #[test]
    fn written_template_loads_as_empty_configuration() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("operator-config.toml");

        write_default_config(&path).unwrap();
        let config = RawConfiguration::load(&path).unwrap();

        assert_eq!(config, RawConfiguration::default());
    }

    #[test]
    fn write_to_missing_directory_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("config.toml");

        let result = write_default_config(&path);
        assert!(matches!(result, Err(ConfigError::FileWrite { .. })));
    }
}

mod template {
    use super::*;

    #[test]
    fn template_parses() {
        assert!(RawConfiguration::parse_toml(&default_config_template()).is_ok());
    }

    #[test]
    fn template_mentions_every_defaulted_section() {
        let template = default_config_template();
        for section in [
            "[general]",
            "[users]",
            "[kubernetes]",
            "[postgres_pod_resources]",
            "[logical_backup]",
            "[connection_pooler]",
        ] {
            assert!(template.contains(section), "missing {section}");
        }
    }
}
