//! Main entry point for kvadmin.
//!
//! This module provides the `KvAdmin` struct, which owns the connection pool
//! and exposes every administrative operation.

use std::fmt;

use kvadmin_executor::{Command, Executor};
use kvadmin_pool::{Connector, Pool, PoolState};
use kvadmin_redis::RedisConnector;
use kvadmin_storage::{MemoryConnector, MemoryStore};
use tracing::info;

use kvadmin_core::{Filter, OperationReport, Pattern};

use crate::config::AdminConfig;
use crate::error::Result;

/// An administrative client for one key-value store.
///
/// Create one with [`KvAdmin::connect`], [`KvAdmin::builder`] or, for tests,
/// [`KvAdmin::in_memory`]. Every operation returns an [`OperationReport`];
/// only setup can fail with `Err`.
///
/// # Example
///
/// ```ignore
/// use kvadmin::prelude::*;
///
/// let admin = KvAdmin::builder().host("localhost").port(6379).connect()?;
///
/// admin.populate(1000);
/// let report = admin.delete_by_filter("10");
/// println!("{}", report.to_document());
///
/// admin.close();
/// ```
pub struct KvAdmin<M: Connector = RedisConnector> {
    executor: Executor<M>,
}

impl<M: Connector> fmt::Debug for KvAdmin<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KvAdmin")
            .field("pool", &self.pool_state())
            .field("scan_options", self.executor.scan_options())
            .finish()
    }
}

impl KvAdmin<RedisConnector> {
    /// Build a Redis-backed client from a complete configuration.
    ///
    /// Validates the configuration and creates the pool. No connection is
    /// opened until the first operation.
    pub fn connect(config: &AdminConfig) -> Result<Self> {
        let connector = RedisConnector::new(config.connection_config())?;
        info!(url = %connector.config().url(), "configured redis client");
        Self::with_connector(connector, config)
    }

    /// Create a builder for client configuration.
    pub fn builder() -> KvAdminBuilder {
        KvAdminBuilder::new()
    }
}

impl KvAdmin<MemoryConnector> {
    /// Client over a fresh in-process store.
    pub fn in_memory() -> Result<Self> {
        Self::with_store(MemoryStore::new())
    }

    /// Client over an existing in-process store.
    pub fn with_store(store: MemoryStore) -> Result<Self> {
        KvAdminBuilder::new().with_store(store)
    }

    /// The in-process store behind this client.
    pub fn store(&self) -> &MemoryStore {
        self.executor.pool().connector().store()
    }
}

impl<M: Connector> KvAdmin<M> {
    /// Client over any connection factory.
    pub fn with_connector(connector: M, config: &AdminConfig) -> Result<Self> {
        config.validate()?;
        let pool = Pool::new(connector, config.pool_config())?;
        Ok(Self {
            executor: Executor::new(pool).with_scan_options(config.scan_options()),
        })
    }

    /// Clear the store and write `count` entries `key:<i>` → `value:<i>`.
    pub fn populate(&self, count: u64) -> OperationReport {
        self.executor.mutator().populate(count)
    }

    /// Every key, via a single `KEYS *`.
    pub fn list_keys(&self) -> OperationReport {
        self.executor.enumerator().list_all()
    }

    /// Keys matching `pattern`, via cursor-based `SCAN` with `COUNT page_hint`.
    pub fn scan_keys(&self, pattern: impl Into<Pattern>, page_hint: usize) -> OperationReport {
        self.executor.enumerator().scan(&pattern.into(), page_hint)
    }

    /// Delete every key containing `filter`.
    pub fn delete_by_filter(&self, filter: impl Into<Filter>) -> OperationReport {
        self.executor.mutator().delete_by_filter(&filter.into())
    }

    /// Read one key.
    pub fn fetch(&self, key: &str) -> OperationReport {
        self.executor.mutator().fetch(key)
    }

    /// Round trip to the store.
    pub fn ping(&self) -> OperationReport {
        self.executor.ping()
    }

    /// Run a [`Command`].
    pub fn execute(&self, command: Command) -> OperationReport {
        self.executor.execute(command)
    }

    /// The underlying executor.
    pub fn executor(&self) -> &Executor<M> {
        &self.executor
    }

    /// Pool occupancy.
    pub fn pool_state(&self) -> PoolState {
        self.executor.pool_state()
    }

    /// Close the pool.
    ///
    /// Safe to call more than once. Operations after `close` report
    /// `PoolClosed`.
    pub fn close(&self) {
        self.executor.close();
    }
}

/// Builder for client configuration.
///
/// Starts from [`AdminConfig::default`]; explicit setters override whatever
/// the base configuration says.
///
/// ```ignore
/// let admin = KvAdmin::builder()
///     .config(AdminConfig::from_toml_file("kvadmin.toml")?)
///     .from_env()?
///     .host("10.0.0.7")
///     .max_scan_iterations(10_000)
///     .connect()?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct KvAdminBuilder {
    config: AdminConfig,
}

impl KvAdminBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: AdminConfig) -> Self {
        self.config = config;
        self
    }

    /// Apply `REDIS_*` and `KVADMIN_*` environment overrides.
    pub fn from_env(mut self) -> Result<Self> {
        self.config.apply_env()?;
        Ok(self)
    }

    /// Set the server host.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.connection.host = host.into();
        self
    }

    /// Set the server port.
    pub fn port(mut self, port: u16) -> Self {
        self.config.connection.port = port;
        self
    }

    /// Set the password. Empty disables AUTH.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.config.connection.password = Some(password.into()).filter(|p| !p.is_empty());
        self
    }

    /// Enable or disable TLS.
    pub fn tls(mut self, on: bool) -> Self {
        self.config.connection.tls = on;
        self
    }

    /// Guard scans against cursors that never terminate.
    pub fn max_scan_iterations(mut self, limit: u64) -> Self {
        self.config.max_scan_iterations = Some(limit);
        self
    }

    /// Cap on pooled connections.
    pub fn max_connections(mut self, n: usize) -> Self {
        self.config.pool.max_total = n;
        self.config.pool.min_idle = self.config.pool.min_idle.min(n);
        self
    }

    /// The configuration built so far.
    pub fn settings(&self) -> &AdminConfig {
        &self.config
    }

    /// Build a Redis-backed client.
    pub fn connect(self) -> Result<KvAdmin<RedisConnector>> {
        KvAdmin::connect(&self.config)
    }

    /// Build a client over a fresh in-process store.
    pub fn in_memory(self) -> Result<KvAdmin<MemoryConnector>> {
        self.with_store(MemoryStore::new())
    }

    /// Build a client over an existing in-process store.
    pub fn with_store(self, store: MemoryStore) -> Result<KvAdmin<MemoryConnector>> {
        KvAdmin::with_connector(MemoryConnector::new(store), &self.config)
    }
}
