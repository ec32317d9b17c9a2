//! Data model types
//!
//! - [`Key`] / [`Value`]: opaque text, the store never sees anything else
//! - [`Cursor`]: SCAN progress token
//! - [`ScanPage`]: one SCAN round trip

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque text identifier, unique within the store.
pub type Key = String;

/// Opaque text payload attached to one key.
pub type Value = String;

/// Opaque SCAN progress token.
///
/// A cursor starts at [`Cursor::START`] and the enumeration is complete when
/// the store hands back that same value. It is only meaningful inside the
/// enumeration that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor(String);

impl Cursor {
    /// Initial and terminal cursor value.
    pub const START: &'static str = "0";

    /// The cursor every enumeration begins with.
    pub fn start() -> Self {
        Cursor(Self::START.to_string())
    }

    /// Wrap a token returned by the store.
    pub fn new(token: impl Into<String>) -> Self {
        Cursor(token.into())
    }

    /// True when this is the initial/terminal value.
    pub fn is_terminal(&self) -> bool {
        self.0 == Self::START
    }

    /// Raw token as sent on the wire.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self::start()
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Cursor {
    fn from(s: &str) -> Self {
        Cursor::new(s)
    }
}

impl From<String> for Cursor {
    fn from(s: String) -> Self {
        Cursor(s)
    }
}

/// One page of a cursor-based enumeration.
///
/// `keys` may be empty while `cursor` is not terminal: the store applies the
/// MATCH pattern after selecting a page.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScanPage {
    /// Cursor to send with the next request
    pub cursor: Cursor,
    /// Matching keys in this page
    pub keys: Vec<Key>,
}

impl ScanPage {
    /// Create a page.
    pub fn new(cursor: Cursor, keys: Vec<Key>) -> Self {
        Self { cursor, keys }
    }

    /// True if this was the last page.
    pub fn is_last(&self) -> bool {
        self.cursor.is_terminal()
    }
}
