//! The Executor: single entry point for every command.

use kvadmin_core::{Operation, OperationReport, StoreConnection};
use kvadmin_pool::{Connector, Pool, PoolState};
use tracing::debug;

use crate::command::Command;
use crate::enumerator::{KeyEnumerator, ScanOptions};
use crate::mutator::BulkMutator;
use crate::report::reported;

/// Owns the connection pool and dispatches [`Command`]s.
///
/// Every call returns an [`OperationReport`]; failures never surface as
/// `Err`. The executor is `Sync` when the connector is, so one instance can
/// serve several threads.
pub struct Executor<M: Connector> {
    pool: Pool<M>,
    scan_options: ScanOptions,
}

impl<M: Connector> Executor<M> {
    /// Executor over `pool` with default scan options.
    pub fn new(pool: Pool<M>) -> Self {
        Self {
            pool,
            scan_options: ScanOptions::default(),
        }
    }

    /// Replace the scan options used by [`Command::ScanKeys`].
    pub fn with_scan_options(mut self, options: ScanOptions) -> Self {
        self.scan_options = options;
        self
    }

    /// Execute a command.
    pub fn execute(&self, command: Command) -> OperationReport {
        debug!(operation = %command.operation(), "executing");
        match command {
            Command::Populate { count } => self.mutator().populate(count),
            Command::DeleteByFilter { filter } => self.mutator().delete_by_filter(&filter),
            Command::ListKeys => self.enumerator().list_all(),
            Command::ScanKeys { pattern, page_hint } => {
                self.enumerator().scan(&pattern, page_hint)
            }
            Command::Fetch { key } => self.mutator().fetch(&key),
            Command::Ping => self.ping(),
        }
    }

    /// Round trip to the store on a pooled connection.
    pub fn ping(&self) -> OperationReport {
        reported(Operation::Ping, |_| {
            let mut conn = self.pool.get()?;
            conn.ping()
        })
    }

    /// Enumerator borrowing this executor's pool.
    pub fn enumerator(&self) -> KeyEnumerator<'_, M> {
        KeyEnumerator::new(&self.pool).with_options(self.scan_options)
    }

    /// Mutator borrowing this executor's pool.
    pub fn mutator(&self) -> BulkMutator<'_, M> {
        BulkMutator::new(&self.pool)
    }

    /// The pool.
    pub fn pool(&self) -> &Pool<M> {
        &self.pool
    }

    /// Pool occupancy.
    pub fn pool_state(&self) -> PoolState {
        self.pool.state()
    }

    /// Scan options in effect.
    pub fn scan_options(&self) -> &ScanOptions {
        &self.scan_options
    }

    /// Close the pool. Later commands report `PoolClosed` errors.
    pub fn close(&self) {
        self.pool.close();
    }
}
