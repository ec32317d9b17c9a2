//! Pool configuration.

use std::time::Duration;

use kvadmin_core::{Error, Result};

/// Sizing, health-check and eviction settings for a [`Pool`](crate::Pool).
///
/// Defaults mirror a small admin client: 8 connections, at least 2 kept
/// warm, checks on borrow and return, idle connections reaped after 60s.
///
/// ```ignore
/// use std::time::Duration;
/// use kvadmin_pool::PoolConfig;
///
/// let config = PoolConfig::new()
///     .max_total(4)
///     .block_when_exhausted(false)
///     .max_wait(Duration::from_millis(500));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    /// Cap on connections open at once (idle + borrowed)
    pub max_total: usize,
    /// Idle connections kept warm
    pub min_idle: usize,
    /// `PING` before handing a connection out
    pub test_on_borrow: bool,
    /// `PING` when a connection comes back
    pub test_on_return: bool,
    /// Idle time after which the reaper closes a connection; `None` keeps
    /// idle connections forever
    pub min_evictable_idle_time: Option<Duration>,
    /// Block when exhausted instead of failing fast
    pub block_when_exhausted: bool,
    /// Upper bound on waiting for a connection, including connect retries
    pub max_wait: Duration,
}

impl PoolConfig {
    /// Default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `max_total`.
    pub fn max_total(mut self, n: usize) -> Self {
        self.max_total = n;
        self
    }

    /// Set `min_idle`.
    pub fn min_idle(mut self, n: usize) -> Self {
        self.min_idle = n;
        self
    }

    /// Set `test_on_borrow`.
    pub fn test_on_borrow(mut self, on: bool) -> Self {
        self.test_on_borrow = on;
        self
    }

    /// Set `test_on_return`.
    pub fn test_on_return(mut self, on: bool) -> Self {
        self.test_on_return = on;
        self
    }

    /// Set `min_evictable_idle_time`.
    pub fn min_evictable_idle_time(mut self, d: Option<Duration>) -> Self {
        self.min_evictable_idle_time = d;
        self
    }

    /// Set `block_when_exhausted`.
    pub fn block_when_exhausted(mut self, on: bool) -> Self {
        self.block_when_exhausted = on;
        self
    }

    /// Set `max_wait`.
    pub fn max_wait(mut self, d: Duration) -> Self {
        self.max_wait = d;
        self
    }

    /// Reject configurations the pool cannot honor.
    pub fn validate(&self) -> Result<()> {
        if self.max_total == 0 {
            return Err(Error::Config("max_total must be at least 1".into()));
        }
        if u32::try_from(self.max_total).is_err() {
            return Err(Error::Config(format!(
                "max_total ({}) is too large",
                self.max_total
            )));
        }
        if self.min_idle > self.max_total {
            return Err(Error::Config(format!(
                "min_idle ({}) exceeds max_total ({})",
                self.min_idle, self.max_total
            )));
        }
        if self.min_evictable_idle_time == Some(Duration::ZERO) {
            return Err(Error::Config(
                "min_evictable_idle_time must be non-zero".into(),
            ));
        }
        if self.max_wait.is_zero() {
            return Err(Error::Config("max_wait must be non-zero".into()));
        }
        Ok(())
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_total: 8,
            min_idle: 2,
            test_on_borrow: true,
            test_on_return: true,
            min_evictable_idle_time: Some(Duration::from_secs(60)),
            block_when_exhausted: true,
            max_wait: Duration::from_secs(2),
        }
    }
}
