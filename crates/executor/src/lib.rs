//! Command execution layer for kvadmin
//!
//! The [`Executor`] owns the connection pool and turns each [`Command`] into
//! an [`OperationReport`]. Work is split between two components that borrow
//! the pool:
//!
//! - [`KeyEnumerator`]: cursor-based `SCAN` paging and full `KEYS` listing
//! - [`BulkMutator`]: populate, delete-by-substring, single-key fetch
//!
//! Every public operation goes through one report boundary: the clock starts
//! on entry, any [`Error`](kvadmin_core::Error) becomes an Error report, and
//! nothing is returned to the caller as `Err`.
//!
//! # Example
//!
//! ```ignore
//! use kvadmin_executor::{Command, Executor};
//! use kvadmin_pool::{Pool, PoolConfig};
//!
//! let executor = Executor::new(Pool::new(connector, PoolConfig::default())?);
//!
//! let report = executor.execute(Command::Populate { count: 5 });
//! assert!(report.is_success());
//!
//! let report = executor.execute(Command::scan("key:*", 10));
//! assert_eq!(report.count(), Some(5));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod command;
mod enumerator;
mod executor;
mod mutator;
mod report;

pub use command::Command;
pub use enumerator::{list_all, scan_all, KeyEnumerator, ScanOptions, ScanOutcome};
pub use executor::Executor;
pub use mutator::{sample_key, sample_value, BulkMutator};

pub use kvadmin_core::{Filter, Operation, OperationReport, Pattern, Status};
