//! Store command surface
//!
//! [`StoreConnection`] is the seam between the enumeration/mutation logic and
//! a concrete transport. Each method is one round trip to the store.

use crate::error::Result;
use crate::pattern::Pattern;
use crate::types::{Cursor, Key, ScanPage, Value};

/// One live connection to a key-value store.
///
/// Implementations translate each call into a single store command and map
/// failures onto [`Error::Transport`](crate::Error::Transport) (network) or
/// [`Error::Store`](crate::Error::Store) (command rejected).
pub trait StoreConnection {
    /// `PING`
    fn ping(&mut self) -> Result<()>;

    /// `SET key value`, overwriting any existing value.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// `GET key`; `None` when the key does not exist.
    fn get(&mut self, key: &str) -> Result<Option<Value>>;

    /// `DEL key [key ...]`; returns how many keys the store removed.
    ///
    /// Callers must not pass an empty slice.
    fn del(&mut self, keys: &[Key]) -> Result<u64>;

    /// `KEYS pattern`: every matching key in one reply.
    fn keys(&mut self, pattern: &Pattern) -> Result<Vec<Key>>;

    /// `SCAN cursor MATCH pattern COUNT count`: one page.
    fn scan(&mut self, cursor: &Cursor, pattern: &Pattern, count: usize) -> Result<ScanPage>;

    /// False once the connection is known to be unusable.
    ///
    /// Checked without a round trip when a connection goes back to the pool.
    fn is_open(&self) -> bool {
        true
    }
}
