//! Report rendering.

use clap::ArgMatches;
use kvadmin::{OperationReport, Status};

/// How reports are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Indented JSON
    Pretty,
    /// One JSON object per line
    Json,
}

/// Output settings shared by every mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputOptions {
    pub mode: OutputMode,
    /// Print enumerated keys instead of just their count
    pub show_keys: bool,
}

impl OutputOptions {
    pub fn from_matches(matches: &ArgMatches) -> Self {
        Self {
            mode: if matches.get_flag("json") {
                OutputMode::Json
            } else {
                OutputMode::Pretty
            },
            show_keys: matches.get_flag("show-keys"),
        }
    }
}

/// Render a report. Keys are left out unless `show_keys` is set.
pub fn format_report(report: &OperationReport, options: OutputOptions) -> String {
    let doc = if options.show_keys {
        report.to_document()
    } else {
        report.summary_document()
    };
    let rendered = match options.mode {
        OutputMode::Pretty => serde_json::to_string_pretty(&doc),
        OutputMode::Json => serde_json::to_string(&doc),
    };
    rendered.unwrap_or_else(|e| format_error(&e.to_string(), options.mode))
}

/// Render an error that never reached an operation.
pub fn format_error(message: &str, mode: OutputMode) -> String {
    match mode {
        OutputMode::Pretty => format!("(error) {}", message),
        OutputMode::Json => serde_json::json!({ "status": "error", "error": message }).to_string(),
    }
}

/// Print a report; Error reports go to stderr. Returns the exit code.
pub fn emit(report: &OperationReport, options: OutputOptions) -> i32 {
    let rendered = format_report(report, options);
    match report.status() {
        Status::Success => {
            println!("{}", rendered);
            0
        }
        Status::Error => {
            eprintln!("{}", rendered);
            1
        }
    }
}
