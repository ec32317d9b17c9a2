//! Key enumeration: cursor-based scans and full listings.

use std::collections::HashSet;

use kvadmin_core::{
    Cursor, Error, Key, Operation, OperationReport, Pattern, Result, StoreConnection,
};
use kvadmin_pool::{Connector, Pool};
use tracing::debug;

use crate::report::reported;

/// Knobs for cursor enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScanOptions {
    /// Abort with [`Error::ScanLimitExceeded`] after this many page requests
    /// without seeing the terminal cursor. `None` trusts the store.
    pub max_iterations: Option<u64>,
    /// Drop keys the store returns more than once. Off by default: a key
    /// present for the whole scan may legitimately be reported twice.
    pub dedup: bool,
}

impl ScanOptions {
    /// Set the iteration guard.
    pub fn max_iterations(mut self, limit: Option<u64>) -> Self {
        self.max_iterations = limit;
        self
    }

    /// Enable or disable duplicate suppression.
    pub fn dedup(mut self, on: bool) -> Self {
        self.dedup = on;
        self
    }
}

/// Result of draining a scan.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScanOutcome {
    /// Keys in the order the store returned them
    pub keys: Vec<Key>,
    /// Page requests issued
    pub pages: u64,
}

/// Drain `SCAN` on one connection, starting from cursor `"0"` and stopping
/// when the store hands back `"0"` again.
///
/// Pages may be empty while the cursor is still live; those are followed like
/// any other. The pattern is evaluated by the store.
pub fn scan_all<C>(
    conn: &mut C,
    pattern: &Pattern,
    page_hint: usize,
    options: &ScanOptions,
) -> Result<ScanOutcome>
where
    C: StoreConnection + ?Sized,
{
    if page_hint == 0 {
        return Err(Error::InvalidArgument(
            "scan page hint must be at least 1".into(),
        ));
    }

    let mut seen = options.dedup.then(HashSet::new);
    let mut outcome = ScanOutcome::default();
    let mut cursor = Cursor::start();

    loop {
        if let Some(limit) = options.max_iterations {
            if outcome.pages >= limit {
                return Err(Error::ScanLimitExceeded {
                    iterations: outcome.pages,
                });
            }
        }

        let page = conn.scan(&cursor, pattern, page_hint)?;
        outcome.pages += 1;
        debug!(
            cursor = %cursor,
            next = %page.cursor,
            batch = page.keys.len(),
            "scan page"
        );

        match seen.as_mut() {
            Some(seen) => outcome
                .keys
                .extend(page.keys.into_iter().filter(|key| seen.insert(key.clone()))),
            None => outcome.keys.extend(page.keys),
        }

        if page.cursor.is_terminal() {
            return Ok(outcome);
        }
        cursor = page.cursor;
    }
}

/// Every key in the store, via one `KEYS *`.
///
/// Blocks the server for the duration on real deployments; prefer
/// [`scan_all`] for anything larger than a test fixture.
pub fn list_all<C>(conn: &mut C) -> Result<Vec<Key>>
where
    C: StoreConnection + ?Sized,
{
    conn.keys(&Pattern::all())
}

/// Reported key enumeration over a borrowed pool.
pub struct KeyEnumerator<'a, M: Connector> {
    pool: &'a Pool<M>,
    options: ScanOptions,
}

impl<'a, M: Connector> KeyEnumerator<'a, M> {
    /// Enumerator with default [`ScanOptions`].
    pub fn new(pool: &'a Pool<M>) -> Self {
        Self {
            pool,
            options: ScanOptions::default(),
        }
    }

    /// Replace the scan options.
    pub fn with_options(mut self, options: ScanOptions) -> Self {
        self.options = options;
        self
    }

    /// Current scan options.
    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    /// All keys matching `pattern`, gathered page by page.
    ///
    /// Reports `keys`, `count` and `pages` on success. A failure on any page
    /// discards the keys gathered so far.
    pub fn scan(&self, pattern: &Pattern, page_hint: usize) -> OperationReport {
        reported(Operation::ScanKeys, |report| {
            let mut conn = self.pool.get()?;
            let outcome = scan_all(&mut *conn, pattern, page_hint, &self.options)?;
            debug!(%pattern, keys = outcome.keys.len(), pages = outcome.pages, "scan complete");
            report.pages(outcome.pages).keys(outcome.keys);
            Ok(())
        })
    }

    /// Every key in the store in one request.
    pub fn list_all(&self) -> OperationReport {
        reported(Operation::ListKeys, |report| {
            let mut conn = self.pool.get()?;
            report.keys(list_all(&mut *conn)?);
            Ok(())
        })
    }
}
