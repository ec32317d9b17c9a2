//! The report boundary.

use kvadmin_core::{Operation, OperationReport, ReportBuilder, Result};
use tracing::{debug, warn};

/// Run `body` as a reported operation.
///
/// The body fills in payload fields as it goes and returns `Err` on the first
/// failure; the error is logged once here and becomes the report's `error`.
pub(crate) fn reported<F>(operation: Operation, body: F) -> OperationReport
where
    F: FnOnce(&mut ReportBuilder) -> Result<()>,
{
    let mut builder = ReportBuilder::start(operation);
    let outcome = body(&mut builder);
    if let Err(e) = &outcome {
        warn!(%operation, error = %e, "operation failed");
    }

    let report = builder.finish(outcome);
    debug!(
        %operation,
        status = ?report.status(),
        elapsed_ms = report.elapsed_millis(),
        "operation finished"
    );
    report
}
