//! Report Envelope Tests
//!
//! Every operation returns a report with status and elapsed time; errors
//! never escape as panics or Err.

use crate::*;

#[test]
fn test_success_document_shape() {
    let admin = create_admin();
    admin.populate(2);

    let doc = admin.scan_keys("key:*", 10).to_document();
    assert_eq!(doc["operation"], "scan_keys");
    assert_eq!(doc["status"], "success");
    assert_eq!(doc["count"], 2);
    assert_eq!(doc["pages"], 1);
    assert!(doc["elapsedMillis"].is_u64());
    assert!(doc.get("error").is_none());
}

#[test]
fn test_error_document_shape() {
    let admin = create_admin();
    admin.store().set_online(false);

    let doc = admin.list_keys().to_document();
    assert_eq!(doc["status"], "error");
    assert_eq!(doc["error"], "transport error: connection refused");
    assert!(doc["elapsedMillis"].is_u64());
    assert!(doc.get("keys").is_none());
    assert!(doc.get("count").is_none());
}

#[test]
fn test_fetch_document_fields() {
    let admin = create_admin();
    admin.populate(2);

    let doc = admin.fetch("key:1").to_document();
    let expected = serde_json::json!({
        "elapsedMillis": doc["elapsedMillis"],
        "key": "key:1",
        "operation": "fetch",
        "status": "success",
        "value": "value:1",
    });
    assert_eq!(doc, expected);

    let missing = admin.fetch("key:9").to_document();
    assert!(missing.get("value").is_none());
    assert_eq!(missing["key"], "key:9");
}

#[test]
fn test_summary_strips_keys() {
    let admin = create_admin();
    admin.populate(4);

    let report = admin.list_keys();
    let summary = report.summary_document();
    assert!(summary.get("keys").is_none());
    assert_eq!(summary["count"], 4);
    assert!(report.to_document().get("keys").is_some());
}

#[test]
fn test_every_operation_reports_error_when_offline() {
    let admin = create_admin();
    admin.store().set_online(false);

    let reports = [
        admin.populate(1),
        admin.list_keys(),
        admin.scan_keys("*", 10),
        admin.delete_by_filter("x"),
        admin.fetch("key:0"),
        admin.ping(),
    ];
    for report in &reports {
        assert_eq!(report.status(), Status::Error, "{}", report.operation());
        assert!(report.error().is_some());
    }
    assert_eq!(admin.pool_state().active, 0);
}

#[test]
fn test_operations_after_close_report_errors() {
    let admin = create_admin();
    admin.close();
    admin.close();

    let report = admin.ping();
    assert_eq!(report.status(), Status::Error);
    assert_eq!(report.error(), Some("connection pool is closed"));
}

#[test]
fn test_execute_dispatches_commands() {
    let admin = create_admin();

    assert_eq!(admin.execute(Command::Populate { count: 4 }).count(), Some(4));
    assert_eq!(admin.execute(Command::ListKeys).count(), Some(4));
    assert_eq!(
        admin.execute(Command::delete_by_filter("key:0")).deleted_count(),
        Some(1)
    );
    assert_eq!(admin.execute(Command::scan("*", 2)).count(), Some(3));
    assert!(admin.execute(Command::Ping).is_success());
}
