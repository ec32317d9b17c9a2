//! Admin Scenario Test Suite
//!
//! End-to-end tests of the `KvAdmin` facade against the in-process store.
//! Each module covers one operation; `reports` checks the envelope shared by
//! all of them and `config` the layered configuration.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test admin_scenarios
//!
//! # Deletion tests only
//! cargo test --test admin_scenarios delete::
//! ```

use kvadmin::prelude::*;
use kvadmin::kvadmin_core::StoreConnection;
use kvadmin::{MemoryConnector, MemoryStore};

// Test modules
pub mod config;
pub mod delete;
pub mod enumerate;
pub mod fetch;
pub mod populate;
pub mod reports;

// =============================================================================
// SHARED TEST UTILITIES
// =============================================================================

/// Admin over a fresh store; see [`admin_for`].
pub fn create_admin() -> KvAdmin<MemoryConnector> {
    admin_for(MemoryStore::new())
}

/// Admin over `store` with no warm connections and a short borrow wait.
pub fn admin_for(store: MemoryStore) -> KvAdmin<MemoryConnector> {
    let mut config = AdminConfig::default();
    config.pool.min_idle = 0;
    config.pool.max_wait_ms = 200;
    KvAdmin::builder()
        .config(config)
        .with_store(store)
        .expect("default config is valid")
}

/// Store holding exactly `keys`, each mapped to `"v"`.
pub fn store_with(keys: &[&str]) -> MemoryStore {
    let store = MemoryStore::new();
    let mut conn = store.connect().expect("store is online");
    for key in keys {
        conn.set(key, "v").expect("seed write");
    }
    store
}

/// Sorted copy of a report's keys.
pub fn sorted_keys(report: &OperationReport) -> Vec<String> {
    let mut keys = report.keys().expect("report has keys").to_vec();
    keys.sort();
    keys
}

// =============================================================================
// REFERENCE SEQUENCE
// =============================================================================

#[test]
fn test_reference_sequence() {
    let admin = create_admin();

    let report = admin.populate(5);
    assert_eq!(report.status(), Status::Success);
    assert_eq!(report.count(), Some(5));

    let report = admin.scan_keys("key:*", 10);
    assert_eq!(report.count(), Some(5));
    assert_eq!(
        sorted_keys(&report),
        ["key:0", "key:1", "key:2", "key:3", "key:4"]
    );

    let report = admin.delete_by_filter("3");
    assert_eq!(report.deleted_count(), Some(1));

    let report = admin.fetch("key:3");
    assert_eq!(report.status(), Status::Success);
    assert!(report.value().is_none());

    let report = admin.fetch("key:1");
    assert_eq!(report.value(), Some("value:1"));

    admin.close();
}
