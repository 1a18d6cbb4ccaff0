//! Tests for configuration publication.

use std::sync::Arc;

use tokio_stream::StreamExt;

use super::*;
use crate::config::{InstanceBounds, rule};

fn raw(content: &str) -> RawConfiguration {
    RawConfiguration::parse_toml(content).unwrap()
}

mod adopt {
    use super::*;

    #[test]
    fn nothing_published_initially() {
        let effective = EffectiveConfig::default();
        assert!(effective.current().is_none());
    }

    #[test]
    fn valid_configuration_is_published() {
        let effective = EffectiveConfig::default();

        let adopted = effective.adopt(&raw("[general]\nworkers = 4")).unwrap();

        let current = effective.current().unwrap();
        assert!(Arc::ptr_eq(&adopted, &current));
        assert_eq!(current.general.workers, 4);
    }

    #[test]
    fn rejected_first_load_publishes_nothing() {
        let effective = EffectiveConfig::default();

        let result = effective.adopt(&raw("[connection_pooler]\nuser = \"postgres\""));

        assert!(matches!(
            result,
            Err(ConfigError::InvariantViolation {
                rule: rule::POOLER_USER_NOT_SUPERUSER,
                ..
            })
        ));
        assert!(effective.current().is_none());
    }

    #[test]
    fn rejected_reload_keeps_last_known_good() {
        let effective = EffectiveConfig::default();
        let good = effective.adopt(&raw("[general]\nworkers = 4")).unwrap();

        let result = effective.adopt(&raw(
            "[general]\nworkers = 8\n[connection_pooler]\nuser = \"postgres\"",
        ));

        assert!(result.is_err());
        let current = effective.current().unwrap();
        assert!(Arc::ptr_eq(&good, &current));
        assert_eq!(current.general.workers, 4);
    }

    #[test]
    fn reload_replaces_without_mutating_previous() {
        let effective = EffectiveConfig::default();
        let first = effective.adopt(&raw("[general]\nworkers = 4")).unwrap();

        let second = effective.adopt(&raw("[general]\nworkers = 8")).unwrap();

        assert_eq!(first.general.workers, 4);
        assert_eq!(second.general.workers, 8);
        assert!(Arc::ptr_eq(&effective.current().unwrap(), &second));
    }

    #[test]
    fn custom_validator_is_applied() {
        let effective = EffectiveConfig::new(Validator::standard().with(InstanceBounds));

        let result = effective.adopt(&raw("[general]\nmin_instances = 3\nmax_instances = 1"));

        assert!(result.is_err());
        assert_eq!(effective.validator().len(), 2);
    }
}

mod readers {
    use super::*;

    #[test]
    fn subscriber_sees_swap() {
        let effective = EffectiveConfig::default();
        let mut receiver = effective.subscribe();
        assert!(!receiver.has_changed().unwrap());

        effective.adopt(&RawConfiguration::default()).unwrap();

        assert!(receiver.has_changed().unwrap());
        let published = receiver.borrow_and_update().clone().unwrap();
        assert_eq!(published.users.super_username, "postgres");
    }

    #[test]
    fn rejected_adoption_does_not_notify() {
        let effective = EffectiveConfig::default();
        let receiver = effective.subscribe();

        let _ = effective.adopt(&raw("[connection_pooler]\nuser = \"postgres\""));

        assert!(!receiver.has_changed().unwrap());
    }

    #[tokio::test]
    async fn updates_stream_yields_current_then_new() {
        let effective = EffectiveConfig::default();
        effective.adopt(&raw("[general]\nworkers = 1")).unwrap();

        let mut updates = Box::pin(effective.updates());

        let first = updates.next().await.unwrap();
        assert_eq!(first.general.workers, 1);

        effective.adopt(&raw("[general]\nworkers = 2")).unwrap();

        let second = updates.next().await.unwrap();
        assert_eq!(second.general.workers, 2);
    }

    #[tokio::test]
    async fn updates_stream_skips_unpublished_state() {
        let effective = EffectiveConfig::default();
        let mut updates = Box::pin(effective.updates());

        effective.adopt(&raw("[general]\nworkers = 3")).unwrap();

        let first = updates.next().await.unwrap();
        assert_eq!(first.general.workers, 3);
    }
}
