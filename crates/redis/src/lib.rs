//! Redis transport for kvadmin
//!
//! Blocking connections over TCP, optionally TLS (`rediss`), speaking the
//! handful of commands kvadmin needs:
//!
//! | Method | Command |
//! |--------|---------|
//! | `ping` | `PING` |
//! | `set` | `SET key value` |
//! | `get` | `GET key` |
//! | `del` | `DEL key [key ...]` |
//! | `keys` | `KEYS pattern` |
//! | `scan` | `SCAN cursor MATCH pattern COUNT n` |
//!
//! I/O failures, timeouts and refused or dropped connections map to
//! [`Error::Transport`](kvadmin_core::Error::Transport); replies the server
//! rejects map to [`Error::Store`](kvadmin_core::Error::Store).

#![warn(missing_docs)]
#![warn(clippy::all)]

mod connection;

pub use connection::{ConnectionConfig, RedisConnection, RedisConnector};
