//! Commands accepted by the [`Executor`](crate::Executor).

use kvadmin_core::{Filter, Key, Operation, Pattern};

/// An administrative operation.
///
/// Each variant maps to exactly one [`Operation`] in the resulting report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Clear the store, then write `key:<i>` → `value:<i>` for `i < count`.
    Populate {
        /// Number of sample entries
        count: u64,
    },
    /// Delete every key containing `filter`.
    DeleteByFilter {
        /// Substring to match
        filter: Filter,
    },
    /// List every key with one `KEYS *`.
    ListKeys,
    /// List matching keys with cursor-based `SCAN` paging.
    ScanKeys {
        /// Server-side glob
        pattern: Pattern,
        /// `COUNT` hint per page, at least 1
        page_hint: usize,
    },
    /// Read one key.
    Fetch {
        /// Key to read
        key: Key,
    },
    /// Round trip to the store.
    Ping,
}

impl Command {
    /// `ScanKeys` shorthand.
    pub fn scan(pattern: impl Into<Pattern>, page_hint: usize) -> Self {
        Command::ScanKeys {
            pattern: pattern.into(),
            page_hint,
        }
    }

    /// `DeleteByFilter` shorthand.
    pub fn delete_by_filter(filter: impl Into<Filter>) -> Self {
        Command::DeleteByFilter {
            filter: filter.into(),
        }
    }

    /// `Fetch` shorthand.
    pub fn fetch(key: impl Into<Key>) -> Self {
        Command::Fetch { key: key.into() }
    }

    /// Operation this command reports as.
    pub fn operation(&self) -> Operation {
        match self {
            Command::Populate { .. } => Operation::Populate,
            Command::DeleteByFilter { .. } => Operation::DeleteByFilter,
            Command::ListKeys => Operation::ListKeys,
            Command::ScanKeys { .. } => Operation::ScanKeys,
            Command::Fetch { .. } => Operation::Fetch,
            Command::Ping => Operation::Ping,
        }
    }
}
