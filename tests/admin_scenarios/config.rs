//! Configuration Tests
//!
//! File, environment and builder layers.

use std::io::Write;

use crate::*;

#[test]
fn test_config_file_drives_admin() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
max_scan_iterations = 3

[pool]
max_total = 2
min_idle = 0
min_evictable_idle_time_ms = 0

[demo]
count = 25
filter = "2"
"#
    )
    .unwrap();

    let config = AdminConfig::from_toml_file(file.path()).unwrap();
    assert_eq!(config.demo.count, 25);
    assert_eq!(config.demo.scan_pattern, "key:*");

    let admin = KvAdmin::builder().config(config).in_memory().unwrap();
    admin.populate(25);
    assert_eq!(admin.pool_state().max_total, 2);

    // 25 keys need 4 pages at COUNT 7; the guard allows 3
    assert_eq!(admin.scan_keys("*", 7).status(), Status::Error);
    assert!(admin.scan_keys("*", 10).is_success());
}

#[test]
fn test_missing_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = AdminConfig::from_toml_file(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn test_malformed_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[connection]\nport = \"not a number\"").unwrap();

    let err = AdminConfig::from_toml_file(file.path()).unwrap_err();
    assert!(err.is_config());
}

#[test]
fn test_invalid_values_rejected_before_any_operation() {
    let mut config = AdminConfig::default();
    config.pool.max_total = 0;
    assert!(KvAdmin::builder().config(config).in_memory().is_err());

    let mut config = AdminConfig::default();
    config.connection.timeout_ms = 0;
    assert!(KvAdmin::connect(&config).unwrap_err().is_config());
}

#[test]
fn test_builder_overrides() {
    let builder = KvAdmin::builder()
        .host("cache.internal")
        .port(6390)
        .password("")
        .tls(true)
        .max_scan_iterations(99)
        .max_connections(3);

    let settings = builder.settings();
    assert_eq!(settings.connection.host, "cache.internal");
    assert_eq!(settings.connection.port, 6390);
    assert!(settings.connection.password.is_none());
    assert!(settings.connection.tls);
    assert_eq!(settings.max_scan_iterations, Some(99));
    assert_eq!(settings.pool.max_total, 3);
    assert_eq!(settings.pool.min_idle, 2);
}

#[test]
fn test_redis_client_builds_without_connecting() {
    let mut config = AdminConfig::default();
    config.connection.host = "127.0.0.1".into();
    config.connection.port = 1;
    config.connection.timeout_ms = 200;
    config.pool.min_idle = 0;
    config.pool.max_wait_ms = 300;

    let admin = KvAdmin::connect(&config).unwrap();
    assert_eq!(admin.pool_state().idle, 0);

    let report = admin.ping();
    assert_eq!(report.status(), Status::Error);
    assert!(report.error().unwrap().starts_with("transport error"));
}
