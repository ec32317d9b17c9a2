//! Core types for kvadmin
//!
//! This crate defines the vocabulary shared by every other kvadmin crate:
//!
//! - [`Key`], [`Value`], [`Cursor`] and [`ScanPage`]: the store's data model
//! - [`Pattern`] (server-side glob) and [`Filter`] (client-side substring)
//! - [`OperationReport`]: the uniform result envelope
//! - [`StoreConnection`]: the command surface a transport must provide
//! - [`Error`]: the error taxonomy, collapsed into reports at the boundary

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod pattern;
pub mod report;
pub mod traits;
pub mod types;

pub use error::{Error, Result};
pub use pattern::{Filter, Pattern};
pub use report::{Operation, OperationReport, ReportBuilder, Status};
pub use traits::StoreConnection;
pub use types::{Cursor, Key, ScanPage, Value};
