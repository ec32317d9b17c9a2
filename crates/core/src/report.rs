//! Operation reports
//!
//! Every public kvadmin operation returns an [`OperationReport`] instead of a
//! `Result`: the report carries status, elapsed time and the
//! operation-specific payload, and is the only error channel the caller sees.
//!
//! ## Document Format
//!
//! Reports serialize to a key-ordered JSON object with camelCase names.
//! Absent fields are omitted:
//!
//! ```json
//! {
//!   "count": 5,
//!   "elapsedMillis": 3,
//!   "keys": ["key:0", "key:1", "key:2", "key:3", "key:4"],
//!   "operation": "scan_keys",
//!   "pages": 1,
//!   "status": "success"
//! }
//! ```
//!
//! On error, payload fields are dropped and `error` is set:
//!
//! ```json
//! {
//!   "elapsedMillis": 2001,
//!   "error": "transport error: connection refused",
//!   "operation": "populate",
//!   "status": "error"
//! }
//! ```

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::time::Instant;

use crate::error::Result;
use crate::types::{Key, Value};

/// Outcome of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Operation completed
    Success,
    /// Operation failed; see [`OperationReport::error`]
    Error,
}

/// Which operation produced a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Clear the store and write sample entries
    Populate,
    /// Full enumeration in one request
    ListKeys,
    /// Cursor-based enumeration
    ScanKeys,
    /// Delete keys containing a substring
    DeleteByFilter,
    /// Single-key read
    Fetch,
    /// Connectivity check
    Ping,
}

impl Operation {
    /// Stable snake_case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Populate => "populate",
            Operation::ListKeys => "list_keys",
            Operation::ScanKeys => "scan_keys",
            Operation::DeleteByFilter => "delete_by_filter",
            Operation::Fetch => "fetch",
            Operation::Ping => "ping",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Uniform result envelope.
///
/// Reports are immutable once returned; build them with [`ReportBuilder`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationReport {
    operation: Operation,
    status: Status,
    elapsed_millis: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    deleted_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    keys: Option<Vec<Key>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    key: Option<Key>,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pages: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl OperationReport {
    /// Operation that produced this report.
    pub fn operation(&self) -> Operation {
        self.operation
    }

    /// Success or Error.
    pub fn status(&self) -> Status {
        self.status
    }

    /// Shorthand for `status() == Status::Success`.
    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }

    /// Milliseconds from operation start to completion.
    pub fn elapsed_millis(&self) -> u64 {
        self.elapsed_millis
    }

    /// Entries written (populate) or keys enumerated (list/scan).
    pub fn count(&self) -> Option<u64> {
        self.count
    }

    /// Keys selected for deletion.
    pub fn deleted_count(&self) -> Option<u64> {
        self.deleted_count
    }

    /// Enumerated keys, in the order the store returned them.
    pub fn keys(&self) -> Option<&[Key]> {
        self.keys.as_deref()
    }

    /// Key that was fetched.
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Fetched value; `None` when the key does not exist.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// SCAN round trips issued.
    pub fn pages(&self) -> Option<u64> {
        self.pages
    }

    /// Error message when status is Error.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Full report as a key-ordered JSON object.
    pub fn to_document(&self) -> serde_json::Value {
        let fields: BTreeMap<String, serde_json::Value> = match serde_json::to_value(self) {
            Ok(serde_json::Value::Object(map)) => map.into_iter().collect(),
            _ => BTreeMap::new(),
        };
        serde_json::Value::Object(fields.into_iter().collect())
    }

    /// Report as a document with the `keys` field stripped for display.
    pub fn summary_document(&self) -> serde_json::Value {
        let mut doc = self.to_document();
        if let serde_json::Value::Object(map) = &mut doc {
            map.remove("keys");
        }
        doc
    }
}

/// In-progress report.
///
/// Created when an operation starts; the clock runs from [`ReportBuilder::start`]
/// until [`ReportBuilder::finish`]. On failure every payload field is
/// discarded so an Error report never carries partial results.
#[derive(Debug)]
pub struct ReportBuilder {
    started: Instant,
    report: OperationReport,
}

impl ReportBuilder {
    /// Start timing an operation.
    pub fn start(operation: Operation) -> Self {
        Self {
            started: Instant::now(),
            report: OperationReport {
                operation,
                status: Status::Success,
                elapsed_millis: 0,
                count: None,
                deleted_count: None,
                keys: None,
                key: None,
                value: None,
                pages: None,
                error: None,
            },
        }
    }

    /// Set the count field.
    pub fn count(&mut self, count: u64) -> &mut Self {
        self.report.count = Some(count);
        self
    }

    /// Set the enumerated keys; also sets `count`.
    pub fn keys(&mut self, keys: Vec<Key>) -> &mut Self {
        self.report.count = Some(keys.len() as u64);
        self.report.keys = Some(keys);
        self
    }

    /// Set the deleted count.
    pub fn deleted_count(&mut self, deleted: u64) -> &mut Self {
        self.report.deleted_count = Some(deleted);
        self
    }

    /// Set the fetched key.
    pub fn key(&mut self, key: impl Into<Key>) -> &mut Self {
        self.report.key = Some(key.into());
        self
    }

    /// Set the fetched value.
    pub fn value(&mut self, value: Option<Value>) -> &mut Self {
        self.report.value = value;
        self
    }

    /// Set the number of SCAN round trips.
    pub fn pages(&mut self, pages: u64) -> &mut Self {
        self.report.pages = Some(pages);
        self
    }

    /// Stop the clock and seal the report.
    pub fn finish(self, outcome: Result<()>) -> OperationReport {
        let mut report = self.report;
        report.elapsed_millis = u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX);

        if let Err(e) = outcome {
            report.status = Status::Error;
            report.error = Some(e.to_string());
            report.count = None;
            report.deleted_count = None;
            report.keys = None;
            report.key = None;
            report.value = None;
            report.pages = None;
        }

        report
    }
}
