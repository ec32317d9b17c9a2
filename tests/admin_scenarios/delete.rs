//! Delete-by-Filter Tests
//!
//! delete_by_filter(f) removes every key containing f and reports how many
//! keys it selected.

use crate::*;
use proptest::prelude::*;

#[test]
fn test_delete_substring_anywhere_in_key() {
    let admin = create_admin();
    admin.populate(120);

    let report = admin.delete_by_filter("10");
    assert!(report.is_success());
    assert_eq!(report.operation(), Operation::DeleteByFilter);
    // key:10, key:100..=key:109, key:110
    assert_eq!(report.deleted_count(), Some(12));
    assert_eq!(admin.store().len(), 108);
    assert!(admin
        .store()
        .snapshot()
        .keys()
        .all(|key| !key.contains("10")));
}

#[test]
fn test_delete_uses_single_del() {
    let admin = create_admin();
    admin.populate(30);
    admin.store().reset_command_counts();

    admin.delete_by_filter("1");
    assert_eq!(admin.store().command_count("KEYS"), 1);
    assert_eq!(admin.store().command_count("DEL"), 1);
}

#[test]
fn test_delete_without_matches() {
    let admin = create_admin();
    admin.populate(5);
    admin.store().reset_command_counts();

    let report = admin.delete_by_filter("nope");
    assert!(report.is_success());
    assert_eq!(report.deleted_count(), Some(0));
    assert_eq!(admin.store().command_count("DEL"), 0);
    assert_eq!(admin.store().len(), 5);
}

#[test]
fn test_delete_on_empty_store() {
    let admin = create_admin();

    let report = admin.delete_by_filter("key");
    assert!(report.is_success());
    assert_eq!(report.deleted_count(), Some(0));
}

#[test]
fn test_filter_is_literal_not_glob() {
    let admin = admin_for(store_with(&["a*b", "axb", "a?b"]));

    let report = admin.delete_by_filter("*");
    assert_eq!(report.deleted_count(), Some(1));
    let keys: Vec<_> = admin.store().snapshot().into_keys().collect();
    assert_eq!(keys, ["a?b", "axb"]);
}

#[test]
fn test_delete_against_offline_store() {
    let admin = create_admin();
    admin.populate(3);
    admin.store().set_online(false);

    let report = admin.delete_by_filter("key");
    assert_eq!(report.status(), Status::Error);
    assert!(report.deleted_count().is_none());

    admin.store().set_online(true);
    assert_eq!(admin.store().len(), 3);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn delete_count_matches_substring_selection(count in 0u64..150, filter in "[0-9]{1,2}") {
        let admin = create_admin();
        admin.populate(count);

        let expected = (0..count).filter(|i| format!("key:{}", i).contains(&filter)).count();
        let report = admin.delete_by_filter(filter.as_str());

        prop_assert!(report.is_success());
        prop_assert_eq!(report.deleted_count(), Some(expected as u64));
        prop_assert_eq!(admin.store().len() as u64, count - expected as u64);
        admin.close();
    }
}
