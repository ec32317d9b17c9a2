//! Layered configuration.
//!
//! Sources apply in order, later ones winning:
//!
//! 1. built-in defaults
//! 2. a TOML file ([`AdminConfig::from_toml_file`])
//! 3. environment variables ([`AdminConfig::apply_env`])
//! 4. explicit overrides (CLI flags, builder methods)
//!
//! ```toml
//! max_scan_iterations = 10000
//!
//! [connection]
//! host = "cache.internal"
//! port = 6380
//! tls = true
//!
//! [pool]
//! max_total = 4
//! max_wait_ms = 5000
//! ```

use std::fmt;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use kvadmin_executor::ScanOptions;
use kvadmin_pool::PoolConfig;
use kvadmin_redis::ConnectionConfig;

use crate::error::{Error, Result};

/// Server host.
pub const ENV_HOST: &str = "REDIS_HOST";
/// Server port.
pub const ENV_PORT: &str = "REDIS_PORT";
/// Password; empty means no AUTH.
pub const ENV_PASSWORD: &str = "REDIS_PASSWORD";
/// `true`/`false` switch for TLS.
pub const ENV_SSL: &str = "REDIS_SSL";
/// Scan iteration guard.
pub const ENV_MAX_SCAN_ITERATIONS: &str = "KVADMIN_MAX_SCAN_ITERATIONS";

/// Complete kvadmin configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AdminConfig {
    /// Abort a scan after this many page requests
    pub max_scan_iterations: Option<u64>,
    /// Drop keys a scan reports more than once
    pub scan_dedup: bool,
    /// Where to connect
    pub connection: ConnectionSettings,
    /// Pool sizing and health checks
    pub pool: PoolSettings,
    /// Parameters of the `demo` sequence
    pub demo: DemoSettings,
}

/// `[connection]` table.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConnectionSettings {
    /// Server host name or address
    pub host: String,
    /// Server port
    pub port: u16,
    /// ACL user
    pub username: Option<String>,
    /// Password
    pub password: Option<String>,
    /// Use TLS
    pub tls: bool,
    /// Logical database index
    pub database: i64,
    /// Connect, read and write timeout
    pub timeout_ms: u64,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 6379,
            username: None,
            password: None,
            tls: false,
            database: 0,
            timeout_ms: 2000,
        }
    }
}

impl fmt::Debug for ConnectionSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("tls", &self.tls)
            .field("database", &self.database)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

/// `[pool]` table. Durations are in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PoolSettings {
    /// Cap on open connections
    pub max_total: usize,
    /// Idle connections kept warm
    pub min_idle: usize,
    /// Validate on borrow
    pub test_on_borrow: bool,
    /// Validate on return
    pub test_on_return: bool,
    /// Idle time before the reaper closes a connection; 0 keeps them
    pub min_evictable_idle_time_ms: u64,
    /// Block instead of failing when exhausted
    pub block_when_exhausted: bool,
    /// Upper bound on waiting for a connection
    pub max_wait_ms: u64,
}

impl Default for PoolSettings {
    fn default() -> Self {
        let defaults = PoolConfig::default();
        Self {
            max_total: defaults.max_total,
            min_idle: defaults.min_idle,
            test_on_borrow: defaults.test_on_borrow,
            test_on_return: defaults.test_on_return,
            min_evictable_idle_time_ms: defaults
                .min_evictable_idle_time
                .map_or(0, |d| d.as_millis() as u64),
            block_when_exhausted: defaults.block_when_exhausted,
            max_wait_ms: defaults.max_wait.as_millis() as u64,
        }
    }
}

/// `[demo]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DemoSettings {
    /// Entries to populate
    pub count: u64,
    /// Substring to delete
    pub filter: String,
    /// Glob for the scan step
    pub scan_pattern: String,
    /// `COUNT` hint for the scan step; defaults to `count`
    pub page_hint: Option<usize>,
}

impl Default for DemoSettings {
    fn default() -> Self {
        Self {
            count: 1000,
            filter: "10".to_string(),
            scan_pattern: "key:*".to_string(),
            page_hint: None,
        }
    }
}

fn parse_env<T: std::str::FromStr>(name: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| Error::Config(format!("{} has invalid value {:?}", name, raw)))
}

fn parse_switch(name: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(Error::Config(format!(
            "{} must be true or false, got {:?}",
            name, raw
        ))),
    }
}

impl AdminConfig {
    /// Parse a TOML document. Missing fields take their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Read and parse a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Render as TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| Error::Config(e.to_string()))
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_env_from(|name| std::env::var(name).ok())
    }

    /// Apply overrides from `lookup`, which maps a variable name to its value.
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup(ENV_HOST) {
            self.connection.host = host;
        }
        if let Some(port) = lookup(ENV_PORT) {
            self.connection.port = parse_env(ENV_PORT, &port)?;
        }
        if let Some(password) = lookup(ENV_PASSWORD) {
            self.connection.password = Some(password).filter(|p| !p.is_empty());
        }
        if let Some(ssl) = lookup(ENV_SSL) {
            self.connection.tls = parse_switch(ENV_SSL, &ssl)?;
        }
        if let Some(limit) = lookup(ENV_MAX_SCAN_ITERATIONS) {
            self.max_scan_iterations = Some(parse_env(ENV_MAX_SCAN_ITERATIONS, &limit)?);
        }
        Ok(())
    }

    /// Reject values no operation could run with.
    pub fn validate(&self) -> Result<()> {
        if self.connection.host.trim().is_empty() {
            return Err(Error::Config("connection.host must not be empty".into()));
        }
        if self.connection.port == 0 {
            return Err(Error::Config("connection.port must be non-zero".into()));
        }
        if self.connection.timeout_ms == 0 {
            return Err(Error::Config("connection.timeout_ms must be non-zero".into()));
        }
        if self.max_scan_iterations == Some(0) {
            return Err(Error::Config("max_scan_iterations must be at least 1".into()));
        }
        if self.demo.page_hint == Some(0) {
            return Err(Error::Config("demo.page_hint must be at least 1".into()));
        }
        self.pool_config().validate()?;
        Ok(())
    }

    /// Pool settings in the pool's own terms.
    pub fn pool_config(&self) -> PoolConfig {
        let pool = &self.pool;
        PoolConfig {
            max_total: pool.max_total,
            min_idle: pool.min_idle,
            test_on_borrow: pool.test_on_borrow,
            test_on_return: pool.test_on_return,
            min_evictable_idle_time: Some(pool.min_evictable_idle_time_ms)
                .filter(|ms| *ms > 0)
                .map(Duration::from_millis),
            block_when_exhausted: pool.block_when_exhausted,
            max_wait: Duration::from_millis(pool.max_wait_ms),
        }
    }

    /// Connection settings in the transport's own terms.
    pub fn connection_config(&self) -> ConnectionConfig {
        let conn = &self.connection;
        ConnectionConfig {
            host: conn.host.clone(),
            port: conn.port,
            username: conn.username.clone(),
            password: conn.password.clone(),
            tls: conn.tls,
            database: conn.database,
            timeout: Duration::from_millis(conn.timeout_ms),
        }
    }

    /// Scan options for the executor.
    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions::default()
            .max_iterations(self.max_scan_iterations)
            .dedup(self.scan_dedup)
    }
}
