//! Bulk writes, deletes and single-key reads.

use kvadmin_core::{Filter, Key, Operation, OperationReport, Result, StoreConnection};
use kvadmin_pool::{Connector, Pool};
use tracing::{debug, info};

use crate::enumerator::list_all;
use crate::report::reported;

/// Key written by `populate` at index `i`.
pub fn sample_key(i: u64) -> Key {
    format!("key:{}", i)
}

/// Value written by `populate` at index `i`.
pub fn sample_value(i: u64) -> String {
    format!("value:{}", i)
}

/// Remove every key. Returns how many the store confirmed.
fn clear<C>(conn: &mut C) -> Result<u64>
where
    C: StoreConnection + ?Sized,
{
    let existing = list_all(conn)?;
    if existing.is_empty() {
        return Ok(0);
    }
    conn.del(&existing)
}

/// Reported mutations over a borrowed pool.
pub struct BulkMutator<'a, M: Connector> {
    pool: &'a Pool<M>,
}

impl<'a, M: Connector> BulkMutator<'a, M> {
    /// Mutator over `pool`.
    pub fn new(pool: &'a Pool<M>) -> Self {
        Self { pool }
    }

    /// Replace the store contents with `count` sample entries.
    ///
    /// Clears all keys first, then writes `key:<i>` → `value:<i>` one at a
    /// time. A failed write stops the run; entries already written stay.
    pub fn populate(&self, count: u64) -> OperationReport {
        reported(Operation::Populate, |report| {
            let mut conn = self.pool.get()?;
            let cleared = clear(&mut *conn)?;
            for i in 0..count {
                conn.set(&sample_key(i), &sample_value(i))?;
            }
            info!(count, cleared, "populated store");
            report.count(count);
            Ok(())
        })
    }

    /// Delete every key containing `filter` as a substring.
    ///
    /// The selection comes from one full listing and is removed with a single
    /// `DEL`. `deletedCount` is the size of the selection; keys that vanished
    /// in between are not subtracted.
    pub fn delete_by_filter(&self, filter: &Filter) -> OperationReport {
        reported(Operation::DeleteByFilter, |report| {
            let mut conn = self.pool.get()?;
            let selected: Vec<Key> = list_all(&mut *conn)?
                .into_iter()
                .filter(|key| filter.matches(key))
                .collect();

            if !selected.is_empty() {
                let confirmed = conn.del(&selected)?;
                debug!(selected = selected.len(), confirmed, "DEL confirmed");
            }
            info!(%filter, deleted = selected.len(), "deleted matching keys");
            report.deleted_count(selected.len() as u64);
            Ok(())
        })
    }

    /// Read one key. A missing key is a success with no `value`.
    pub fn fetch(&self, key: &str) -> OperationReport {
        reported(Operation::Fetch, |report| {
            let mut conn = self.pool.get()?;
            let value = conn.get(key)?;
            report.key(key).value(value);
            Ok(())
        })
    }
}
