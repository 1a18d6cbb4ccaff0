//! Tests for the pooler instance floor.

use super::*;

fn instances(raw_value: Option<i32>) -> i32 {
    let mut config = RawConfiguration::default();
    config.connection_pooler.number_of_instances = raw_value;
    ResolvedConfiguration::resolve(&config)
        .connection_pooler
        .number_of_instances
}

#[test]
fn absent_resolves_to_floor() {
    assert_eq!(instances(None), 2);
}

#[test]
fn one_is_raised_to_two() {
    assert_eq!(instances(Some(1)), 2);
}

#[test]
fn five_is_kept() {
    assert_eq!(instances(Some(5)), 5);
}

#[test]
fn never_below_floor() {
    for n in [i32::MIN, -100, -1, 0, 1, 2, 3, 10, i32::MAX] {
        let resolved = instances(Some(n));
        assert!(resolved >= 2, "{n} resolved to {resolved}");
        if n >= 2 {
            assert_eq!(resolved, n);
        }
    }
}

#[test]
fn floor_from_toml() {
    let config = resolve(
        r"
        [connection_pooler]
        number_of_instances = 1
    ",
    );

    assert_eq!(config.connection_pooler.number_of_instances, 2);
}
