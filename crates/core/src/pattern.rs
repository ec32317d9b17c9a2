//! Key selection: server-side glob [`Pattern`]s and client-side [`Filter`]s
//!
//! A pattern is what the store evaluates during `KEYS`/`SCAN`. The matcher
//! here follows the store's glob dialect so the in-memory store behaves like
//! the real one. Like the store, it compares bytes, so `?` consumes a single
//! byte of a multibyte UTF-8 character:
//!
//! | Syntax | Matches |
//! |--------|---------|
//! | `*` | any sequence, including empty |
//! | `?` | exactly one byte |
//! | `[abc]` | one of the listed bytes |
//! | `[^abc]` | any byte not listed |
//! | `[a-z]` | a range (reversed bounds are swapped) |
//! | `\x` | the literal `x` |
//!
//! A filter is a plain substring test applied after keys have been fetched.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Star,
    Any,
    Literal(u8),
    Class { negated: bool, items: Vec<ClassItem> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ClassItem {
    Byte(u8),
    Range(u8, u8),
}

impl Token {
    fn matches(&self, c: u8) -> bool {
        match self {
            Token::Star | Token::Any => true,
            Token::Literal(l) => *l == c,
            Token::Class { negated, items } => {
                let hit = items.iter().any(|item| match *item {
                    ClassItem::Byte(x) => x == c,
                    ClassItem::Range(lo, hi) => lo <= c && c <= hi,
                });
                hit != *negated
            }
        }
    }
}

fn compile(source: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut bytes = source.bytes().peekable();

    while let Some(c) = bytes.next() {
        match c {
            b'*' => {
                // Consecutive stars behave like one
                if tokens.last() != Some(&Token::Star) {
                    tokens.push(Token::Star);
                }
            }
            b'?' => tokens.push(Token::Any),
            b'\\' => tokens.push(Token::Literal(bytes.next().unwrap_or(b'\\'))),
            b'[' => {
                let negated = bytes.peek() == Some(&b'^');
                if negated {
                    bytes.next();
                }
                let mut items = Vec::new();
                // An unterminated class runs to the end of the pattern
                while let Some(c) = bytes.next() {
                    match c {
                        b']' => break,
                        b'\\' => {
                            if let Some(escaped) = bytes.next() {
                                items.push(ClassItem::Byte(escaped));
                            }
                        }
                        lo => {
                            let mut ahead = bytes.clone();
                            match (ahead.next(), ahead.next()) {
                                (Some(b'-'), Some(hi)) if hi != b']' => {
                                    bytes.next();
                                    bytes.next();
                                    let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
                                    items.push(ClassItem::Range(lo, hi));
                                }
                                _ => items.push(ClassItem::Byte(lo)),
                            }
                        }
                    }
                }
                tokens.push(Token::Class { negated, items });
            }
            other => tokens.push(Token::Literal(other)),
        }
    }

    tokens
}

/// Glob-style match expression evaluated by the store.
///
/// # Example
///
/// ```
/// use kvadmin_core::Pattern;
///
/// let pattern = Pattern::new("key:1?");
/// assert!(pattern.matches("key:10"));
/// assert!(!pattern.matches("key:1"));
/// ```
#[derive(Clone, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Pattern {
    source: String,
    tokens: Vec<Token>,
}

impl Pattern {
    /// Compile a glob expression. Every string is a valid pattern.
    pub fn new(source: impl Into<String>) -> Self {
        let source = source.into();
        let tokens = compile(&source);
        Self { source, tokens }
    }

    /// The pattern matching every key (`*`).
    pub fn all() -> Self {
        Self::new("*")
    }

    /// Pattern text as sent to the store.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// True if `key` matches.
    pub fn matches(&self, key: &str) -> bool {
        let text = key.as_bytes();
        let tokens = &self.tokens;

        let (mut t, mut s) = (0usize, 0usize);
        // Last star seen and the text position it is currently absorbing up to
        let mut backtrack: Option<(usize, usize)> = None;

        while s < text.len() {
            if t < tokens.len() {
                if tokens[t] == Token::Star {
                    backtrack = Some((t, s));
                    t += 1;
                    continue;
                }
                if tokens[t].matches(text[s]) {
                    t += 1;
                    s += 1;
                    continue;
                }
            }
            match backtrack {
                Some((star, absorbed)) => {
                    t = star + 1;
                    s = absorbed + 1;
                    backtrack = Some((star, absorbed + 1));
                }
                None => return false,
            }
        }

        tokens[t..].iter().all(|tok| *tok == Token::Star)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for Pattern {}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Pattern").field(&self.source).finish()
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl Default for Pattern {
    fn default() -> Self {
        Self::all()
    }
}

impl From<&str> for Pattern {
    fn from(s: &str) -> Self {
        Pattern::new(s)
    }
}

impl From<String> for Pattern {
    fn from(s: String) -> Self {
        Pattern::new(s)
    }
}

impl From<Pattern> for String {
    fn from(p: Pattern) -> Self {
        p.source
    }
}

/// Client-side literal substring test.
///
/// Not a glob: `*` and `?` are matched literally. The empty filter selects
/// every key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Filter(String);

impl Filter {
    /// Create a filter.
    pub fn new(needle: impl Into<String>) -> Self {
        Filter(needle.into())
    }

    /// True if `key` contains the filter text.
    pub fn matches(&self, key: &str) -> bool {
        key.contains(self.0.as_str())
    }

    /// Filter text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Filter {
    fn from(s: &str) -> Self {
        Filter::new(s)
    }
}

impl From<String> for Filter {
    fn from(s: String) -> Self {
        Filter(s)
    }
}
