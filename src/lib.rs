//! # kvadmin
//!
//! Administrative client for Redis-protocol key-value stores.
//!
//! kvadmin bulk-loads sample data, enumerates keys (blocking `KEYS` or
//! cursor-based `SCAN`), deletes keys by substring and reads single keys.
//! Every operation returns an [`OperationReport`]: status, elapsed time and
//! an operation-specific payload, ready to print as JSON.
//!
//! ## Quick Start
//!
//! ```ignore
//! use kvadmin::prelude::*;
//!
//! let admin = KvAdmin::builder().from_env()?.connect()?;
//!
//! admin.populate(5);
//! let report = admin.scan_keys("key:*", 10);
//! assert_eq!(report.count(), Some(5));
//!
//! let report = admin.delete_by_filter("3");
//! println!("{}", report.to_document());
//!
//! admin.close();
//! ```
//!
//! ## Layers
//!
//! - [`kvadmin_core`]: keys, cursors, patterns, errors, reports
//! - [`kvadmin_pool`]: bounded, health-checked connection pool
//! - [`kvadmin_redis`] / [`kvadmin_storage`]: Redis and in-process transports
//! - [`kvadmin_executor`]: key enumeration and bulk mutation
//!
//! This crate ties them together behind [`KvAdmin`] and layered
//! [`AdminConfig`].

#![warn(missing_docs)]

mod admin;
mod config;
mod error;

pub mod prelude;

pub use admin::{KvAdmin, KvAdminBuilder};
pub use config::{
    AdminConfig, ConnectionSettings, DemoSettings, PoolSettings, ENV_HOST,
    ENV_MAX_SCAN_ITERATIONS, ENV_PASSWORD, ENV_PORT, ENV_SSL,
};
pub use error::{Error, Result};

pub use kvadmin_core::{Filter, Operation, OperationReport, Pattern, Status};
pub use kvadmin_executor::{Command, ScanOptions};
pub use kvadmin_pool::{Connector, PoolState};
pub use kvadmin_redis::{ConnectionConfig, RedisConnector};
pub use kvadmin_storage::{MemoryConnector, MemoryStore};

pub use kvadmin_core;
pub use kvadmin_executor;
pub use kvadmin_pool;
pub use kvadmin_redis;
pub use kvadmin_storage;
