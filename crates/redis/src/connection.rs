//! Redis connections and the pool connector.

use std::fmt;
use std::time::Duration;

use redis::{ConnectionAddr, ConnectionInfo, ConnectionLike, ErrorKind, RedisConnectionInfo, RedisError};
use tracing::debug;

use kvadmin_core::{Cursor, Error, Key, Pattern, Result, ScanPage, StoreConnection, Value};
use kvadmin_pool::Connector;

/// Where and how to connect.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// Server host name or address
    pub host: String,
    /// Server port
    pub port: u16,
    /// ACL user; `None` authenticates as the default user
    pub username: Option<String>,
    /// Password; `None` or empty skips AUTH
    pub password: Option<String>,
    /// Encrypt all traffic with TLS
    pub tls: bool,
    /// Logical database index
    pub database: i64,
    /// Connect, read and write timeout
    pub timeout: Duration,
}

impl ConnectionConfig {
    /// Config for `host:port` with defaults for everything else.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Self::default()
        }
    }

    /// `redis[s]://host:port/db`, without credentials.
    pub fn url(&self) -> String {
        let scheme = if self.tls { "rediss" } else { "redis" };
        format!("{}://{}:{}/{}", scheme, self.host, self.port, self.database)
    }

    fn connection_info(&self) -> ConnectionInfo {
        let addr = if self.tls {
            ConnectionAddr::TcpTls {
                host: self.host.clone(),
                port: self.port,
                insecure: false,
                tls_params: None,
            }
        } else {
            ConnectionAddr::Tcp(self.host.clone(), self.port)
        };

        ConnectionInfo {
            addr,
            redis: RedisConnectionInfo {
                db: self.database,
                username: self.username.clone().filter(|u| !u.is_empty()),
                password: self.password.clone().filter(|p| !p.is_empty()),
                ..Default::default()
            },
        }
    }
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 6379,
            username: None,
            password: None,
            tls: false,
            database: 0,
            timeout: Duration::from_millis(2000),
        }
    }
}

// Keeps the password out of logs and panic messages
impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("tls", &self.tls)
            .field("database", &self.database)
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn map_error(e: RedisError) -> Error {
    if e.kind() == ErrorKind::InvalidClientConfig {
        Error::Config(e.to_string())
    } else if e.is_io_error()
        || e.is_timeout()
        || e.is_connection_refusal()
        || e.is_connection_dropped()
    {
        Error::Transport(e.to_string())
    } else {
        Error::Store(e.to_string())
    }
}

/// One blocking connection to a Redis server.
pub struct RedisConnection {
    conn: redis::Connection,
}

impl StoreConnection for RedisConnection {
    fn ping(&mut self) -> Result<()> {
        redis::cmd("PING")
            .query::<String>(&mut self.conn)
            .map(|_| ())
            .map_err(map_error)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        redis::cmd("SET")
            .arg(key)
            .arg(value)
            .query::<()>(&mut self.conn)
            .map_err(map_error)
    }

    fn get(&mut self, key: &str) -> Result<Option<Value>> {
        redis::cmd("GET")
            .arg(key)
            .query::<Option<String>>(&mut self.conn)
            .map_err(map_error)
    }

    fn del(&mut self, keys: &[Key]) -> Result<u64> {
        redis::cmd("DEL")
            .arg(keys)
            .query::<u64>(&mut self.conn)
            .map_err(map_error)
    }

    fn keys(&mut self, pattern: &Pattern) -> Result<Vec<Key>> {
        redis::cmd("KEYS")
            .arg(pattern.as_str())
            .query::<Vec<String>>(&mut self.conn)
            .map_err(map_error)
    }

    fn scan(&mut self, cursor: &Cursor, pattern: &Pattern, count: usize) -> Result<ScanPage> {
        let (next, keys) = redis::cmd("SCAN")
            .arg(cursor.as_str())
            .arg("MATCH")
            .arg(pattern.as_str())
            .arg("COUNT")
            .arg(count)
            .query::<(String, Vec<String>)>(&mut self.conn)
            .map_err(map_error)?;
        Ok(ScanPage::new(Cursor::new(next), keys))
    }

    fn is_open(&self) -> bool {
        self.conn.is_open()
    }
}

/// Pool connection factory for a Redis server.
///
/// Creating the connector validates the configuration but does not connect.
pub struct RedisConnector {
    client: redis::Client,
    config: ConnectionConfig,
}

impl RedisConnector {
    /// Build a connector.
    pub fn new(config: ConnectionConfig) -> Result<Self> {
        if config.host.is_empty() {
            return Err(Error::Config("host must not be empty".into()));
        }
        if config.timeout.is_zero() {
            return Err(Error::Config("timeout must be non-zero".into()));
        }
        let client = redis::Client::open(config.connection_info()).map_err(map_error)?;
        Ok(Self { client, config })
    }

    /// Connection settings.
    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }
}

impl fmt::Debug for RedisConnector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisConnector")
            .field("config", &self.config)
            .finish()
    }
}

impl Connector for RedisConnector {
    type Connection = RedisConnection;

    fn connect(&self) -> Result<RedisConnection> {
        let timeout = self.config.timeout;
        let conn = self
            .client
            .get_connection_with_timeout(timeout)
            .map_err(map_error)?;
        conn.set_read_timeout(Some(timeout)).map_err(map_error)?;
        conn.set_write_timeout(Some(timeout)).map_err(map_error)?;
        debug!(url = %self.config.url(), "connected");
        Ok(RedisConnection { conn })
    }
}
