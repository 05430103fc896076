//! Trailing padding up to a minimum line width.

use std::io::{self, Write};

use crate::error::MarginError;
use crate::fill::Fill;
use crate::pen::Pen;
use crate::wrap::{display_width, Close, PenWriter};

/// Pads every line with fill, just before its newline, until the line is
/// `width` columns wide.
///
/// Widths are display widths: escape sequences take no space and wide
/// characters take two columns. Lines already at or past `width` are left
/// alone, and a `width` of 0 turns padding off.
///
/// Only the current line is buffered, and only to measure it; every byte is
/// forwarded as soon as it arrives.
///
/// # Example
///
/// ```rust
/// use standout_margin::{Fill, PaddingWriter};
/// use std::io::Write;
///
/// let mut out = Vec::new();
/// let mut w = PaddingWriter::new(&mut out, 6, Fill::literal("."));
/// w.write_all(b"ab\nabcdefgh\n").unwrap();
/// drop(w);
/// assert_eq!(out, b"ab....\nabcdefgh\n");
/// ```
pub struct PaddingWriter<W: Write> {
    width: usize,
    fill: Fill,
    inner: PenWriter<W>,
    line: Vec<u8>,
}

impl<W: Write> PaddingWriter<W> {
    pub fn new(inner: W, width: usize, fill: Fill) -> Self {
        Self::from_pen_writer(PenWriter::new(inner), width, fill)
    }

    fn from_pen_writer(inner: PenWriter<W>, width: usize, fill: Fill) -> Self {
        Self {
            width,
            fill,
            inner,
            line: Vec::new(),
        }
    }

    /// Target line width in columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Pen state of the stream below this writer.
    pub fn pen(&self) -> &Pen {
        self.inner.pen()
    }

    pub fn get_ref(&self) -> &W {
        self.inner.get_ref()
    }

    pub fn get_mut(&mut self) -> &mut W {
        self.inner.get_mut()
    }

    fn pad_line(&mut self) -> io::Result<()> {
        if self.width == 0 {
            return Ok(());
        }

        let line_width = display_width(&String::from_utf8_lossy(&self.line));
        if line_width >= self.width {
            return Ok(());
        }

        let units = self.width - line_width;
        log::trace!("padding line of width {} with {} units", line_width, units);

        let saved = self.inner.pen().clone();
        self.fill.emit(&mut self.inner, units)?;
        if self.inner.pen() != &saved {
            self.inner.reset_pen()?;
            self.inner.restore_pen(&saved)?;
        }
        Ok(())
    }
}

impl<W: Write + Close> PaddingWriter<W> {
    /// Like [`PaddingWriter::new`], but closing this writer also closes
    /// `inner`.
    pub fn closing(inner: W, width: usize, fill: Fill) -> Self {
        Self::from_pen_writer(PenWriter::closing(inner), width, fill)
    }
}

impl<W: Write> Write for PaddingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        for (i, &byte) in buf.iter().enumerate() {
            if byte == b'\n' {
                self.pad_line()
                    .map_err(|e| MarginError::WritePadding(e).into_io())?;
                self.line.clear();
            } else {
                self.line.push(byte);
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

impl<W: Write> Close for PaddingWriter<W> {
    fn close(&mut self) -> io::Result<()> {
        self.inner.close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pen::RESET_STYLE;

    fn pad(width: usize, fill: Fill, input: &str) -> String {
        let mut w = PaddingWriter::new(Vec::new(), width, fill);
        w.write_all(input.as_bytes()).unwrap();
        String::from_utf8(w.get_ref().clone()).unwrap()
    }

    #[test]
    fn test_pads_short_line() {
        assert_eq!(pad(10, Fill::default(), "hi\n"), "hi        \n");
    }

    #[test]
    fn test_pads_empty_line_to_full_width() {
        assert_eq!(pad(4, Fill::literal("."), "\n"), "....\n");
    }

    #[test]
    fn test_width_zero_disables_padding() {
        assert_eq!(pad(0, Fill::default(), "abcdef\n"), "abcdef\n");
    }

    #[test]
    fn test_never_truncates_long_line() {
        assert_eq!(pad(3, Fill::literal("."), "abcdef\nab\n"), "abcdef\nab.\n");
    }

    #[test]
    fn test_unterminated_line_is_not_padded() {
        assert_eq!(pad(5, Fill::literal("."), "ab"), "ab");
    }

    #[test]
    fn test_measures_display_width() {
        assert_eq!(pad(6, Fill::literal("."), "日本\n"), "日本..\n");
        assert_eq!(
            pad(4, Fill::literal("."), "\x1b[1mab\x1b[0m\n"),
            "\x1b[1mab\x1b[0m..\n"
        );
    }

    #[test]
    fn test_line_split_across_writes() {
        let mut w = PaddingWriter::new(Vec::new(), 5, Fill::literal("."));
        w.write_all(b"a").unwrap();
        w.write_all(b"b").unwrap();
        w.write_all(b"\nc\n").unwrap();
        assert_eq!(w.get_ref().as_slice(), b"ab...\nc....\n");
    }

    #[test]
    fn test_callback_fill() {
        let fill = Fill::callback(|w: &mut dyn Write| w.write_all(b"~"));
        assert_eq!(pad(3, fill, "a\n"), "a~~\n");
    }

    #[test]
    fn test_styled_fill_restores_caller_style() {
        let fill = Fill::callback(|w: &mut dyn Write| {
            write!(w, "\x1b[44m \x1b[0m")
        });
        let out = pad(2, fill, "\x1b[31ma\nb");
        assert_eq!(
            out,
            format!(
                "\x1b[31ma\x1b[44m \x1b[0m\x1b[31m{reset}\n\x1b[31mb",
                reset = RESET_STYLE
            )
        );
    }

    #[test]
    fn test_write_error_is_wrapped() {
        struct Broken;
        impl Write for Broken {
            fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let mut w = PaddingWriter::new(Broken, 4, Fill::default());
        let err = w.write(b"a").unwrap_err();
        assert!(matches!(
            MarginError::from_io(&err),
            Some(MarginError::WriteBytes(_))
        ));
        assert!(err.to_string().starts_with("margin: error writing bytes"));
    }

    #[test]
    fn test_padding_error_is_wrapped() {
        let fill = Fill::callback(|_w: &mut dyn Write| Err(io::Error::other("no fill")));
        let mut w = PaddingWriter::new(Vec::new(), 4, fill);
        let err = w.write(b"a\n").unwrap_err();
        assert!(matches!(
            MarginError::from_io(&err),
            Some(MarginError::WritePadding(_))
        ));
    }
}
