//! Fetch Tests

use crate::*;

#[test]
fn test_fetch_existing_key() {
    let admin = create_admin();
    admin.populate(3);

    let report = admin.fetch("key:2");
    assert!(report.is_success());
    assert_eq!(report.operation(), Operation::Fetch);
    assert_eq!(report.key(), Some("key:2"));
    assert_eq!(report.value(), Some("value:2"));
}

#[test]
fn test_fetch_missing_key_is_success_without_value() {
    let admin = create_admin();

    let report = admin.fetch("ghost");
    assert_eq!(report.status(), Status::Success);
    assert_eq!(report.key(), Some("ghost"));
    assert!(report.value().is_none());

    let doc = report.to_document();
    assert!(doc.get("value").is_none());
    assert_eq!(doc["key"], "ghost");
}

#[test]
fn test_fetch_empty_value_is_present() {
    let admin = create_admin();
    admin.store().connect().unwrap().set("blank", "").unwrap();

    let report = admin.fetch("blank");
    assert_eq!(report.value(), Some(""));
}
