//! Connection pool for kvadmin
//!
//! Provides the "acquire a usable connection, release it when done"
//! capability the enumerator and mutator are built on, on top of r2d2.
//!
//! - [`Pool`]: bounded pool, explicitly constructed and owned by its user
//! - [`PooledConnection`]: scoped borrow, returned to the pool on drop
//! - [`PoolConfig`]: sizing, health checks, idle reaping
//! - [`Connector`]: how a transport opens and validates connections
//!
//! ## Health Checks
//!
//! | Trigger | Option | Action on failure |
//! |---------|--------|-------------------|
//! | Borrow | `test_on_borrow` | discard, try the next connection |
//! | Return | `test_on_return` | discard |
//! | Return | always: [`Connector::has_broken`] | discard |

#![warn(missing_docs)]
#![warn(clippy::all)]

mod config;
mod manager;
mod pool;

pub use config::PoolConfig;
pub use manager::{ConnectionManager, Connector};
pub use pool::{Pool, PoolState, PooledConnection};
