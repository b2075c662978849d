//! Reply definitions
//!
//! Typed representation of one decoded server reply.

use std::fmt;

/// A decoded server reply
///
/// `Nil` (a `$-1` bulk or `*-1` array) is distinct from `Bulk("")` and from
/// `Array(vec![])`; the decoder preserves that distinction and so must
/// callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// `:` integer reply
    Integer(i64),

    /// `+` simple status line (e.g. `+OK`, `+PONG`)
    Simple(String),

    /// `$` bulk text with non-negative length (length 0 decodes to `Bulk("")`)
    Bulk(String),

    /// `*` array with non-negative count, elements in wire order
    Array(Vec<Reply>),

    /// Absent value: `$-1` or `*-1`
    Nil,
}

impl Reply {
    /// The integer payload, if this is an integer reply
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Reply::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// The text payload, if this is a simple or bulk reply
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Reply::Simple(s) | Reply::Bulk(s) => Some(s),
            _ => None,
        }
    }

    /// The elements, if this is an array reply
    pub fn as_array(&self) -> Option<&[Reply]> {
        match self {
            Reply::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Whether this reply is the absent value
    pub fn is_nil(&self) -> bool {
        matches!(self, Reply::Nil)
    }
}

/// redis-cli style rendering, used by the CLI binary
impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Integer(n) => write!(f, "(integer) {}", n),
            Reply::Simple(s) => write!(f, "{}", s),
            Reply::Bulk(s) => write!(f, "\"{}\"", s),
            Reply::Nil => write!(f, "(nil)"),
            Reply::Array(items) if items.is_empty() => write!(f, "(empty array)"),
            Reply::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{}) {}", i + 1, item)?;
                }
                Ok(())
            }
        }
    }
}
