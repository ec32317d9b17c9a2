//! In-process store for kvadmin
//!
//! [`MemoryStore`] implements the same command semantics as a Redis server
//! for the subset kvadmin uses, so the enumerator and mutator can run
//! without a network:
//!
//! - `SCAN` returns opaque cursors; `"0"` starts and ends an enumeration
//! - `MATCH` is applied after a page is selected, so pages can be empty
//! - `COUNT` is a hint and must be at least 1
//! - `DEL` is variadic and returns how many keys existed
//!
//! [`MemoryConnector`] plugs the store into a [`kvadmin_pool::Pool`].

#![warn(missing_docs)]
#![warn(clippy::all)]

mod memory;

pub use memory::{MemoryConnection, MemoryConnector, MemoryStore};
