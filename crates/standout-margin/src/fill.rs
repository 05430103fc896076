//! What gets repeated when a filter injects indentation or padding.

use std::fmt;
use std::io::{self, Write};

/// Routine that renders one unit of fill into the given stream.
pub type FillFn = Box<dyn FnMut(&mut dyn Write) -> io::Result<()>>;

/// A fill directive, shared by [`PaddingWriter`](crate::PaddingWriter) and
/// [`IndentWriter`](crate::IndentWriter).
///
/// The default is a single space, and both writers take their default from
/// here.
///
/// # Example
///
/// ```rust
/// use standout_margin::Fill;
/// use std::io::Write;
///
/// let mut out = Vec::new();
/// Fill::literal(".").emit(&mut out, 3).unwrap();
///
/// let mut bars = Fill::callback(|w: &mut dyn Write| w.write_all(b"|"));
/// bars.emit(&mut out, 2).unwrap();
///
/// assert_eq!(out, b"...||");
/// ```
pub enum Fill {
    /// Repeat this string once per unit.
    Literal(String),
    /// Invoke this routine once per unit.
    Callback(FillFn),
}

impl Fill {
    pub fn literal(token: impl Into<String>) -> Self {
        Fill::Literal(token.into())
    }

    pub fn callback<F>(f: F) -> Self
    where
        F: FnMut(&mut dyn Write) -> io::Result<()> + 'static,
    {
        Fill::Callback(Box::new(f))
    }

    /// Writes `units` units of fill into `target`.
    pub fn emit(&mut self, target: &mut dyn Write, units: usize) -> io::Result<()> {
        match self {
            Fill::Literal(token) => {
                if units > 0 && !token.is_empty() {
                    target.write_all(token.repeat(units).as_bytes())?;
                }
            }
            Fill::Callback(f) => {
                for _ in 0..units {
                    f(target)?;
                }
            }
        }
        Ok(())
    }
}

impl Default for Fill {
    fn default() -> Self {
        Fill::Literal(" ".to_string())
    }
}

impl fmt::Debug for Fill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fill::Literal(token) => f.debug_tuple("Literal").field(token).finish(),
            Fill::Callback(_) => f.write_str("Callback(..)"),
        }
    }
}

impl From<&str> for Fill {
    fn from(token: &str) -> Self {
        Fill::Literal(token.to_string())
    }
}

impl From<String> for Fill {
    fn from(token: String) -> Self {
        Fill::Literal(token)
    }
}
