//! Enumeration Tests
//!
//! list_keys uses a single KEYS *; scan_keys follows SCAN cursors.

use crate::*;

// =============================================================================
// LIST TESTS
// =============================================================================

#[test]
fn test_list_keys_returns_everything() {
    let admin = admin_for(store_with(&["a", "b:1", "c"]));

    let report = admin.list_keys();
    assert!(report.is_success());
    assert_eq!(report.operation(), Operation::ListKeys);
    assert_eq!(report.count(), Some(3));
    assert_eq!(sorted_keys(&report), ["a", "b:1", "c"]);
    assert_eq!(admin.store().command_count("KEYS"), 1);
}

#[test]
fn test_list_keys_on_empty_store() {
    let admin = create_admin();

    let report = admin.list_keys();
    assert!(report.is_success());
    assert_eq!(report.count(), Some(0));
}

// =============================================================================
// SCAN TESTS
// =============================================================================

#[test]
fn test_scan_agrees_with_list_for_every_hint() {
    let admin = create_admin();
    admin.populate(37);
    let listed = sorted_keys(&admin.list_keys());

    for hint in [1, 2, 5, 36, 37, 38, 1000] {
        let report = admin.scan_keys("*", hint);
        assert!(report.is_success(), "hint {}", hint);
        assert_eq!(sorted_keys(&report), listed, "hint {}", hint);
    }
}

#[test]
fn test_scan_page_count_follows_hint() {
    let admin = create_admin();
    admin.populate(10);
    admin.store().reset_command_counts();

    let report = admin.scan_keys("key:*", 3);
    assert_eq!(report.pages(), Some(4));
    assert_eq!(admin.store().command_count("SCAN"), 4);
}

#[test]
fn test_scan_pattern_is_glob() {
    let admin = admin_for(store_with(&["key:1", "key:12", "key:2", "user:1", "key:x"]));

    assert_eq!(sorted_keys(&admin.scan_keys("key:?", 2)), ["key:1", "key:2", "key:x"]);
    assert_eq!(sorted_keys(&admin.scan_keys("key:[0-9]*", 2)), ["key:1", "key:12", "key:2"]);
    assert_eq!(sorted_keys(&admin.scan_keys("*:1", 2)), ["key:1", "user:1"]);
}

#[test]
fn test_scan_with_sparse_matches_crosses_empty_pages() {
    let mut keys: Vec<String> = (0..50).map(|i| format!("noise:{:02}", i)).collect();
    keys.push("zz:target".to_string());
    let refs: Vec<&str> = keys.iter().map(String::as_str).collect();
    let admin = admin_for(store_with(&refs));

    let report = admin.scan_keys("zz:*", 5);
    assert_eq!(report.keys().unwrap(), ["zz:target"]);
    assert_eq!(report.pages(), Some(11));
}

#[test]
fn test_scan_zero_hint_is_error() {
    let admin = create_admin();
    admin.populate(3);

    let report = admin.scan_keys("*", 0);
    assert_eq!(report.status(), Status::Error);
    assert!(report.keys().is_none());
}

#[test]
fn test_scan_iteration_guard() {
    let mut config = AdminConfig::default();
    config.pool.min_idle = 0;
    config.max_scan_iterations = Some(2);
    let admin = KvAdmin::builder().config(config).in_memory().unwrap();
    admin.populate(10);

    let report = admin.scan_keys("*", 2);
    assert_eq!(report.status(), Status::Error);
    assert!(report.error().unwrap().contains("scan aborted"));

    assert!(admin.scan_keys("*", 10).is_success());
}
