//! Memory-backed store
//!
//! # Design
//!
//! - `RwLock<BTreeMap>`: stable iteration order, so a SCAN cursor can name
//!   the last key it returned and resume strictly after it
//! - Cursors are opaque (`k` + base64 of that key). Removing keys behind the
//!   cursor never moves the keys ahead of it, so a key present for the whole
//!   enumeration is returned; keys added or removed meanwhile may or may not be
//! - Per-command counters let callers observe how many round trips an
//!   operation issued
//! - `set_online(false)` simulates an outage: connects and commands fail with
//!   a transport error and open connections report themselves broken

use std::collections::{BTreeMap, HashMap};
use std::ops::Bound;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use parking_lot::{Mutex, RwLock};
use tracing::debug;

use kvadmin_core::{Cursor, Error, Key, Pattern, Result, ScanPage, StoreConnection, Value};
use kvadmin_pool::Connector;

#[derive(Debug)]
struct Inner {
    data: RwLock<BTreeMap<Key, Value>>,
    online: AtomicBool,
    commands: Mutex<HashMap<&'static str, u64>>,
}

/// Shared in-memory key-value store.
///
/// Cloning is cheap; clones share the same data.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

impl MemoryStore {
    /// Create an empty, online store.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                data: RwLock::new(BTreeMap::new()),
                online: AtomicBool::new(true),
                commands: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Open a connection to this store.
    pub fn connect(&self) -> Result<MemoryConnection> {
        self.ensure_online()?;
        Ok(MemoryConnection {
            store: self.clone(),
        })
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.inner.data.read().len()
    }

    /// True if no keys are stored.
    pub fn is_empty(&self) -> bool {
        self.inner.data.read().is_empty()
    }

    /// Copy of every entry, in key order.
    pub fn snapshot(&self) -> BTreeMap<Key, Value> {
        self.inner.data.read().clone()
    }

    /// Simulate the store going away (`false`) or coming back (`true`).
    pub fn set_online(&self, online: bool) {
        debug!(online, "memory store availability changed");
        self.inner.online.store(online, Ordering::SeqCst);
    }

    /// True unless [`set_online(false)`](Self::set_online) is in effect.
    pub fn is_online(&self) -> bool {
        self.inner.online.load(Ordering::SeqCst)
    }

    /// How many times `command` (e.g. `"SCAN"`) has been executed.
    pub fn command_count(&self, command: &str) -> u64 {
        self.inner.commands.lock().get(command).copied().unwrap_or(0)
    }

    /// Reset all command counters.
    pub fn reset_command_counts(&self) {
        self.inner.commands.lock().clear();
    }

    fn ensure_online(&self) -> Result<()> {
        if self.is_online() {
            Ok(())
        } else {
            Err(Error::Transport("connection refused".into()))
        }
    }

    fn record(&self, command: &'static str) -> Result<()> {
        self.ensure_online()?;
        *self.inner.commands.lock().entry(command).or_insert(0) += 1;
        Ok(())
    }

    fn scan_page(&self, cursor: &Cursor, pattern: &Pattern, count: usize) -> Result<ScanPage> {
        let resume_after = decode_cursor(cursor)?;
        if count == 0 {
            return Err(Error::Store("ERR syntax error".into()));
        }

        let lower = match &resume_after {
            Some(last) => Bound::Excluded(last.as_str()),
            None => Bound::Unbounded,
        };
        let data = self.inner.data.read();
        let mut remaining = data.range::<str, _>((lower, Bound::Unbounded)).map(|(key, _)| key);
        let page: Vec<&Key> = remaining.by_ref().take(count).collect();

        let cursor = match page.last() {
            Some(last) if remaining.next().is_some() => encode_cursor(last),
            _ => Cursor::start(),
        };
        let keys = page
            .into_iter()
            .filter(|key| pattern.matches(key))
            .cloned()
            .collect();

        Ok(ScanPage::new(cursor, keys))
    }
}

const CURSOR_PREFIX: char = 'k';

fn encode_cursor(last: &str) -> Cursor {
    Cursor::new(format!("{}{}", CURSOR_PREFIX, URL_SAFE_NO_PAD.encode(last)))
}

/// `None` for the start cursor, else the key to resume after.
fn decode_cursor(cursor: &Cursor) -> Result<Option<Key>> {
    if cursor.is_terminal() {
        return Ok(None);
    }
    let invalid = || Error::Store("ERR invalid cursor".into());
    let encoded = cursor.as_str().strip_prefix(CURSOR_PREFIX).ok_or_else(invalid)?;
    let bytes = URL_SAFE_NO_PAD.decode(encoded).map_err(|_| invalid())?;
    String::from_utf8(bytes).map(Some).map_err(|_| invalid())
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

/// A connection to a [`MemoryStore`].
#[derive(Debug, Clone)]
pub struct MemoryConnection {
    store: MemoryStore,
}

impl MemoryConnection {
    /// Store this connection talks to.
    pub fn store(&self) -> &MemoryStore {
        &self.store
    }
}

impl StoreConnection for MemoryConnection {
    fn ping(&mut self) -> Result<()> {
        self.store.record("PING")
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.store.record("SET")?;
        self.store
            .inner
            .data
            .write()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn get(&mut self, key: &str) -> Result<Option<Value>> {
        self.store.record("GET")?;
        Ok(self.store.inner.data.read().get(key).cloned())
    }

    fn del(&mut self, keys: &[Key]) -> Result<u64> {
        self.store.record("DEL")?;
        if keys.is_empty() {
            return Err(Error::Store(
                "ERR wrong number of arguments for 'del' command".into(),
            ));
        }
        let mut data = self.store.inner.data.write();
        let removed = keys.iter().filter(|key| data.remove(key.as_str()).is_some()).count();
        Ok(removed as u64)
    }

    fn keys(&mut self, pattern: &Pattern) -> Result<Vec<Key>> {
        self.store.record("KEYS")?;
        Ok(self
            .store
            .inner
            .data
            .read()
            .keys()
            .filter(|key| pattern.matches(key))
            .cloned()
            .collect())
    }

    fn scan(&mut self, cursor: &Cursor, pattern: &Pattern, count: usize) -> Result<ScanPage> {
        self.store.record("SCAN")?;
        self.store.scan_page(cursor, pattern, count)
    }

    fn is_open(&self) -> bool {
        self.store.is_online()
    }
}

/// Pool connection factory for a [`MemoryStore`].
#[derive(Debug, Clone, Default)]
pub struct MemoryConnector {
    store: MemoryStore,
}

impl MemoryConnector {
    /// Connector for an existing store.
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }

    /// Store behind this connector.
    pub fn store(&self) -> &MemoryStore {
        &self.store
    }
}

impl Connector for MemoryConnector {
    type Connection = MemoryConnection;

    fn connect(&self) -> Result<MemoryConnection> {
        self.store.connect()
    }
}
