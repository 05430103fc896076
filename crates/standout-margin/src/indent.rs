//! Leading indentation for every line.

use std::io::{self, Write};

use crate::error::MarginError;
use crate::fill::Fill;
use crate::pen::Pen;
use crate::wrap::{Close, PenWriter};

/// Prefixes every line with `indent` units of fill.
///
/// The fill is written through the column-aware wrap layer, so it counts
/// toward the line's width like any other content. The caller's style and
/// hyperlink are closed before the fill and reopened after it: the fill can
/// carry its own style (a quote bar, say) and the line's content still comes
/// out in the caller's style.
///
/// Indentation is written lazily, right before the first byte of a line, so
/// a stream that ends on a newline does not leave a dangling indent.
///
/// # Example
///
/// ```rust
/// use standout_margin::{Fill, IndentWriter};
/// use std::io::Write;
///
/// let mut out = Vec::new();
/// let mut w = IndentWriter::new(&mut out, 2, Fill::literal("> "));
/// w.write_all(b"one\ntwo\n").unwrap();
/// drop(w);
/// assert_eq!(out, b"> > one\n> > two\n");
/// ```
pub struct IndentWriter<W: Write> {
    indent: usize,
    fill: Fill,
    inner: PenWriter<W>,
    indented: bool,
}

impl<W: Write> IndentWriter<W> {
    pub fn new(inner: W, indent: usize, fill: Fill) -> Self {
        Self::from_pen_writer(PenWriter::new(inner), indent, fill)
    }

    fn from_pen_writer(inner: PenWriter<W>, indent: usize, fill: Fill) -> Self {
        Self {
            indent,
            fill,
            inner,
            indented: false,
        }
    }

    /// Indent width in fill units.
    pub fn indent(&self) -> usize {
        self.indent
    }

    /// Pen state as seen by this writer.
    pub fn pen(&self) -> &Pen {
        self.inner.pen()
    }

    pub fn get_ref(&self) -> &W {
        self.inner.get_ref()
    }

    pub fn get_mut(&mut self) -> &mut W {
        self.inner.get_mut()
    }

    fn write_indent(&mut self) -> io::Result<()> {
        let saved = self.inner.pen().clone();
        self.inner.reset_pen()?;
        self.fill.emit(&mut self.inner, self.indent)?;
        // The fill may leave its own style open; clear it before reopening
        // the caller's pen.
        if !self.inner.pen().is_zero() {
            self.inner.reset_pen()?;
        }
        self.inner.restore_pen(&saved)
    }
}

impl<W: Write + Close> IndentWriter<W> {
    /// Like [`IndentWriter::new`], but closing this writer also closes
    /// `inner`.
    pub fn closing(inner: W, indent: usize, fill: Fill) -> Self {
        Self::from_pen_writer(PenWriter::closing(inner), indent, fill)
    }
}

impl<W: Write> Write for IndentWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        for (i, &byte) in buf.iter().enumerate() {
            if !self.indented {
                self.write_indent()
                    .map_err(|e| MarginError::WriteIndentation(e).into_io())?;
                self.indented = true;
            }

            if byte == b'\n' {
                self.indented = false;
            }

            self.inner
                .write_all(&buf[i..=i])
                .map_err(|e| MarginError::WriteBytes(e).into_io())?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

impl<W: Write> Close for IndentWriter<W> {
    fn close(&mut self) -> io::Result<()> {
        self.inner.close()
    }
}
