//! Bounded connection pool
//!
//! # Design
//!
//! - Pooling, health checks and idle reaping are r2d2's; [`Pool`] owns one
//!   `r2d2::Pool` and adds an explicit [`close`](Pool::close)
//! - r2d2 connects in the background and retries until `max_wait` runs out,
//!   so a refused connection surfaces as the connector's own error once the
//!   borrow gives up
//! - Fail-fast mode checks occupancy before asking r2d2, which would
//!   otherwise wait for a free slot

use std::fmt;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::debug;

use kvadmin_core::{Error, Result};

use crate::config::PoolConfig;
use crate::manager::{ConnectionManager, Connector, TracingErrorHandler, TracingEventHandler};

/// A borrowed connection; returned to the pool on drop.
pub type PooledConnection<C> = r2d2::PooledConnection<ConnectionManager<C>>;

/// Snapshot of pool occupancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolState {
    /// Connections waiting in the pool
    pub idle: usize,
    /// Connections currently borrowed
    pub active: usize,
    /// Configured capacity
    pub max_total: usize,
    /// True after [`Pool::close`]
    pub closed: bool,
}

/// Bounded pool of store connections.
///
/// The pool is an ordinary owned value: construct it, lend it by reference
/// to whatever needs connections, and drop or [`close`](Pool::close) it when
/// done. Construction never blocks; `min_idle` connections are opened in the
/// background.
pub struct Pool<C: Connector> {
    inner: RwLock<Option<r2d2::Pool<ConnectionManager<C>>>>,
    connector: Arc<C>,
    last_error: Arc<Mutex<Option<Error>>>,
    config: PoolConfig,
}

impl<C: Connector> Pool<C> {
    /// Create a pool. Fails only on invalid configuration.
    pub fn new(connector: C, config: PoolConfig) -> Result<Self> {
        config.validate()?;

        let connector = Arc::new(connector);
        let last_error = Arc::new(Mutex::new(None));
        let manager = ConnectionManager::new(
            Arc::clone(&connector),
            config.test_on_return,
            Arc::clone(&last_error),
        );

        // validate() bounds both sizes by u32::MAX
        let inner = r2d2::Pool::builder()
            .max_size(config.max_total as u32)
            .min_idle(Some(config.min_idle as u32))
            .test_on_check_out(config.test_on_borrow)
            .idle_timeout(config.min_evictable_idle_time)
            .max_lifetime(None)
            .connection_timeout(config.max_wait)
            .error_handler(Box::new(TracingErrorHandler))
            .event_handler(Box::new(TracingEventHandler))
            .build_unchecked(manager);

        Ok(Self {
            inner: RwLock::new(Some(inner)),
            connector,
            last_error,
            config,
        })
    }

    /// Borrow a connection.
    ///
    /// Opens a new connection while below `max_total`. When exhausted,
    /// waits up to `max_wait` or fails fast depending on
    /// `block_when_exhausted`.
    pub fn get(&self) -> Result<PooledConnection<C>> {
        let pool = self.inner.read().clone().ok_or(Error::PoolClosed)?;

        if !self.config.block_when_exhausted {
            let state = pool.state();
            if state.idle_connections == 0 && state.connections >= pool.max_size() {
                return Err(Error::PoolExhausted {
                    max_total: self.config.max_total,
                });
            }
        }

        match pool.get() {
            Ok(conn) => {
                self.last_error.lock().take();
                Ok(conn)
            }
            Err(e) => {
                debug!(error = %e, "pooled connection unavailable");
                Err(self.last_error.lock().take().unwrap_or_else(|| {
                    if self.config.block_when_exhausted {
                        Error::PoolTimeout(self.config.max_wait)
                    } else {
                        Error::PoolExhausted {
                            max_total: self.config.max_total,
                        }
                    }
                }))
            }
        }
    }

    /// Current occupancy.
    pub fn state(&self) -> PoolState {
        match self.inner.read().as_ref() {
            Some(pool) => {
                let state = pool.state();
                PoolState {
                    idle: state.idle_connections as usize,
                    active: (state.connections - state.idle_connections) as usize,
                    max_total: self.config.max_total,
                    closed: false,
                }
            }
            None => PoolState {
                idle: 0,
                active: 0,
                max_total: self.config.max_total,
                closed: true,
            },
        }
    }

    /// Pool configuration.
    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Connection factory.
    pub fn connector(&self) -> &C {
        &self.connector
    }

    /// Close the pool.
    ///
    /// Later borrows fail with [`Error::PoolClosed`]. Idle connections are
    /// dropped now, borrowed ones once the last of them comes back.
    /// Idempotent.
    pub fn close(&self) {
        if self.inner.write().take().is_some() {
            debug!("connection pool closed");
        }
    }
}

impl<C: Connector> fmt::Debug for Pool<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pool")
            .field("state", &self.state())
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kvadmin_core::{Cursor, Key, Pattern, ScanPage, StoreConnection, Value};
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::{Duration, Instant};

    struct TestConn {
        id: usize,
        healthy: Arc<AtomicBool>,
    }

    impl StoreConnection for TestConn {
        fn ping(&mut self) -> Result<()> {
            if self.healthy.load(Ordering::SeqCst) {
                Ok(())
            } else {
                Err(Error::Transport("connection reset".into()))
            }
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<()> {
            Ok(())
        }

        fn get(&mut self, _key: &str) -> Result<Option<Value>> {
            Ok(None)
        }

        fn del(&mut self, keys: &[Key]) -> Result<u64> {
            Ok(keys.len() as u64)
        }

        fn keys(&mut self, _pattern: &Pattern) -> Result<Vec<Key>> {
            Ok(Vec::new())
        }

        fn scan(&mut self, _cursor: &Cursor, _pattern: &Pattern, _count: usize) -> Result<ScanPage> {
            Ok(ScanPage::default())
        }
    }

    #[derive(Default)]
    struct TestConnector {
        created: AtomicUsize,
        refuse: AtomicBool,
        healthy: Arc<AtomicBool>,
    }

    impl TestConnector {
        fn new() -> Self {
            let connector = Self::default();
            connector.healthy.store(true, Ordering::SeqCst);
            connector
        }

        fn created(&self) -> usize {
            self.created.load(Ordering::SeqCst)
        }

        fn set_healthy(&self, healthy: bool) {
            self.healthy.store(healthy, Ordering::SeqCst);
        }
    }

    impl Connector for TestConnector {
        type Connection = TestConn;

        fn connect(&self) -> Result<TestConn> {
            if self.refuse.load(Ordering::SeqCst) {
                return Err(Error::Transport("connection refused".into()));
            }
            let id = self.created.fetch_add(1, Ordering::SeqCst);
            Ok(TestConn {
                id,
                healthy: Arc::clone(&self.healthy),
            })
        }
    }

    fn config() -> PoolConfig {
        PoolConfig::new().min_idle(0)
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let result = Pool::new(TestConnector::new(), config().max_total(0));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_released_connection_is_reused() {
        let pool = Pool::new(TestConnector::new(), config()).unwrap();

        let first_id = pool.get().unwrap().id;
        let second_id = pool.get().unwrap().id;

        assert_eq!(first_id, second_id);
        assert_eq!(pool.connector().created(), 1);
        assert_eq!(pool.state().idle, 1);
        assert_eq!(pool.state().active, 0);
    }

    #[test]
    fn test_min_idle_connections_open_in_background() {
        let pool = Pool::new(TestConnector::new(), config().min_idle(2)).unwrap();

        let deadline = Instant::now() + Duration::from_secs(2);
        while pool.state().idle < 2 && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(pool.state().idle, 2);
        assert_eq!(pool.connector().created(), 2);
    }

    #[test]
    fn test_fail_fast_when_exhausted() {
        let cfg = config().max_total(2).block_when_exhausted(false);
        let pool = Pool::new(TestConnector::new(), cfg).unwrap();

        let _a = pool.get().unwrap();
        let _b = pool.get().unwrap();
        assert_eq!(pool.state().active, 2);

        let started = Instant::now();
        match pool.get() {
            Err(Error::PoolExhausted { max_total }) => assert_eq!(max_total, 2),
            Err(other) => panic!("expected PoolExhausted, got {:?}", other),
            Ok(conn) => panic!("expected PoolExhausted, got connection {}", conn.id),
        };
        assert!(started.elapsed() < pool.config().max_wait);
    }

    #[test]
    fn test_blocking_borrow_times_out() {
        let cfg = config().max_total(1).max_wait(Duration::from_millis(50));
        let pool = Pool::new(TestConnector::new(), cfg).unwrap();

        let _held = pool.get().unwrap();
        let started = Instant::now();
        let result = pool.get().map(|conn| conn.id);

        assert_eq!(result, Err(Error::PoolTimeout(Duration::from_millis(50))));
        assert!(started.elapsed() >= Duration::from_millis(50));
    }

    #[test]
    fn test_blocked_borrower_wakes_on_release() {
        let cfg = config().max_total(1);
        let pool = Pool::new(TestConnector::new(), cfg).unwrap();

        std::thread::scope(|s| {
            let held = pool.get().unwrap();
            let waiter = s.spawn(|| pool.get().map(|c| c.id));
            std::thread::sleep(Duration::from_millis(20));
            drop(held);
            assert_eq!(waiter.join().unwrap().unwrap(), 0);
        });
        assert_eq!(pool.connector().created(), 1);
    }

    #[test]
    fn test_never_exceeds_max_total_under_contention() {
        let cfg = config().max_total(3);
        let pool = Pool::new(TestConnector::new(), cfg).unwrap();

        std::thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| {
                    for _ in 0..25 {
                        let conn = pool.get().unwrap();
                        assert!(pool.state().active <= 3);
                        drop(conn);
                    }
                });
            }
        });

        assert!(pool.connector().created() <= 3);
        assert_eq!(pool.state().active, 0);
    }

    #[test]
    fn test_unhealthy_idle_connection_is_replaced_on_borrow() {
        let cfg = config()
            .test_on_return(false)
            .max_wait(Duration::from_millis(100));
        let pool = Pool::new(TestConnector::new(), cfg).unwrap();

        drop(pool.get().unwrap());
        pool.connector().set_healthy(false);

        // Every candidate fails its PING until the wait runs out
        let result = pool.get().map(|conn| conn.id);
        assert!(matches!(result, Err(Error::Validation(_))));

        pool.connector().set_healthy(true);
        let conn = pool.get().unwrap();
        assert!(conn.id > 0, "the original connection was discarded");
    }

    #[test]
    fn test_unhealthy_connection_dropped_on_return() {
        let pool = Pool::new(TestConnector::new(), config()).unwrap();

        let conn = pool.get().unwrap();
        pool.connector().set_healthy(false);
        drop(conn);

        assert_eq!(pool.state().idle, 0);
        assert_eq!(pool.state().active, 0);
    }

    #[test]
    fn test_refused_connect_reports_transport_error() {
        let cfg = config()
            .max_total(1)
            .max_wait(Duration::from_millis(200));
        let pool = Pool::new(TestConnector::new(), cfg).unwrap();

        pool.connector().refuse.store(true, Ordering::SeqCst);
        let result = pool.get().map(|conn| conn.id);
        assert!(matches!(result, Err(Error::Transport(_))));
        assert_eq!(pool.state().active, 0);

        pool.connector().refuse.store(false, Ordering::SeqCst);
        assert!(pool.get().is_ok());
    }

    #[test]
    fn test_closed_pool_rejects_borrows() {
        let pool = Pool::new(TestConnector::new(), config()).unwrap();
        let conn = pool.get().unwrap();

        pool.close();
        assert!(matches!(pool.get().map(|c| c.id), Err(Error::PoolClosed)));

        drop(conn);
        let state = pool.state();
        assert!(state.closed);
        assert_eq!(state.idle, 0);
        assert_eq!(state.active, 0);

        pool.close();
    }
}
