//! Populate Tests
//!
//! populate(n) clears the store and writes key:<i> → value:<i>.

use crate::*;

#[test]
fn test_populate_writes_sample_entries() {
    let admin = create_admin();

    let report = admin.populate(3);
    assert!(report.is_success());
    assert_eq!(report.operation(), Operation::Populate);

    let snapshot = admin.store().snapshot();
    assert_eq!(snapshot.len(), 3);
    for i in 0..3 {
        assert_eq!(snapshot[&format!("key:{}", i)], format!("value:{}", i));
    }
}

#[test]
fn test_populate_removes_unrelated_keys() {
    let store = store_with(&["session:a", "session:b", "cache:x"]);
    let admin = admin_for(store);

    assert!(admin.populate(2).is_success());
    let keys: Vec<_> = admin.store().snapshot().into_keys().collect();
    assert_eq!(keys, ["key:0", "key:1"]);
}

#[test]
fn test_populate_zero_empties_store() {
    let admin = admin_for(store_with(&["a", "b"]));

    let report = admin.populate(0);
    assert!(report.is_success());
    assert_eq!(report.count(), Some(0));
    assert!(admin.store().is_empty());
}

#[test]
fn test_populate_twice_is_idempotent() {
    let admin = create_admin();

    admin.populate(10);
    admin.populate(10);
    assert_eq!(admin.store().len(), 10);
}

#[test]
fn test_populate_against_offline_store() {
    let admin = create_admin();
    admin.store().set_online(false);

    let report = admin.populate(5);
    assert_eq!(report.status(), Status::Error);
    assert!(report.count().is_none());
    assert!(report.error().unwrap().contains("connection refused"));
}
