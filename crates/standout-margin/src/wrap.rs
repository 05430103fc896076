//! Column-aware wrap layer.
//!
//! [`PenWriter`] sits between a filter and the stream below it. Every byte is
//! run through a `vte` parser so the writer always knows:
//!
//! - the display column of the current line (wide characters count 2,
//!   zero-width and combining characters 0, escape sequences 0)
//! - the active [`Pen`]: SGR style and OSC 8 hyperlink
//!
//! Bytes are forwarded unchanged, one complete unit at a time. A multi-byte
//! UTF-8 character or an escape sequence is held back until its last byte
//! arrives, so callers may write one byte at a time without splitting a unit
//! around injected output.
//!
//! At every newline the pen is closed before the `\n` and reopened after it,
//! so styles and links never bleed into whatever the line's prefix ends up
//! being. With [`PenWriter::with_wrap`] the same pen-preserving break is also
//! inserted before a character that would run past the wrap limit.

use std::io::{self, Write};

use unicode_width::UnicodeWidthChar;

use crate::pen::{Hyperlink, Pen, PenStyle};

const TAB_STOP: usize = 8;

/// A sink that can be closed once the caller is done writing.
///
/// `std::io::Write` has no notion of closing, so sinks that hold resources
/// implement this trait and are attached with one of the `closing`
/// constructors. All writers in this crate implement it.
pub trait Close {
    fn close(&mut self) -> io::Result<()>;
}

type SinkCloser<W> = fn(&mut W) -> io::Result<()>;

/// What the parser reported for the byte just fed to it.
enum Event {
    Print(char),
    Execute(u8),
    Sequence,
}

struct Tracker<'a> {
    pen: &'a mut Pen,
    event: Option<Event>,
}

impl vte::Perform for Tracker<'_> {
    fn print(&mut self, c: char) {
        self.event = Some(Event::Print(c));
    }

    fn execute(&mut self, byte: u8) {
        self.event = Some(Event::Execute(byte));
    }

    fn hook(&mut self, _params: &vte::Params, _intermediates: &[u8], _ignore: bool, _action: char) {}

    fn put(&mut self, _byte: u8) {}

    fn unhook(&mut self) {
        self.event = Some(Event::Sequence);
    }

    fn osc_dispatch(&mut self, params: &[&[u8]], _bell_terminated: bool) {
        if params.first() == Some(&&b"8"[..]) {
            self.pen.link = parse_hyperlink(params);
        }
        self.event = Some(Event::Sequence);
    }

    fn csi_dispatch(
        &mut self,
        params: &vte::Params,
        intermediates: &[u8],
        ignore: bool,
        action: char,
    ) {
        if action == 'm' && intermediates.is_empty() && !ignore {
            let groups: Vec<&[u16]> = params.iter().collect();
            self.pen.style.apply_sgr(&groups);
        }
        self.event = Some(Event::Sequence);
    }

    fn esc_dispatch(&mut self, _intermediates: &[u8], _ignore: bool, _byte: u8) {
        self.event = Some(Event::Sequence);
    }
}

/// `OSC 8 ; params ; url ST`. The url may itself contain `;`, which the
/// parser has already split on.
fn parse_hyperlink(params: &[&[u8]]) -> Hyperlink {
    let link_params = params
        .get(1)
        .map(|p| String::from_utf8_lossy(p).into_owned())
        .unwrap_or_default();
    let url = params
        .get(2..)
        .unwrap_or_default()
        .iter()
        .map(|p| String::from_utf8_lossy(p))
        .collect::<Vec<_>>()
        .join(";");

    if url.is_empty() {
        Hyperlink::default()
    } else {
        Hyperlink::new(url, link_params)
    }
}

/// Column and pen tracking writer; see the [module docs](self).
pub struct PenWriter<W: Write> {
    inner: W,
    parser: vte::Parser,
    pen: Pen,
    column: usize,
    wrap: Option<usize>,
    pending: Vec<u8>,
    closer: Option<SinkCloser<W>>,
}

impl<W: Write> PenWriter<W> {
    /// Wraps `inner`. Closing this writer flushes `inner` but does not
    /// close it.
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            parser: vte::Parser::new(),
            pen: Pen::default(),
            column: 0,
            wrap: None,
            pending: Vec::new(),
            closer: None,
        }
    }

    /// Hard-wraps lines that would run past `limit` columns.
    ///
    /// A limit of 0 disables wrapping.
    pub fn with_wrap(mut self, limit: usize) -> Self {
        self.wrap = (limit > 0).then_some(limit);
        self
    }

    /// The active style and hyperlink.
    pub fn pen(&self) -> &Pen {
        &self.pen
    }

    pub fn style(&self) -> &PenStyle {
        &self.pen.style
    }

    pub fn link(&self) -> &Hyperlink {
        &self.pen.link
    }

    /// Display column of the current line.
    pub fn column(&self) -> usize {
        self.column
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut W {
        &mut self.inner
    }

    /// Closes the active style and hyperlink, if any.
    pub fn reset_pen(&mut self) -> io::Result<()> {
        let seq = self.pen.reset_sequence();
        self.write_all(seq.as_bytes())
    }

    /// Re-opens a previously captured pen.
    pub fn restore_pen(&mut self, pen: &Pen) -> io::Result<()> {
        let seq = pen.restore_sequence();
        self.write_all(seq.as_bytes())
    }

    fn write_byte(&mut self, byte: u8) -> io::Result<()> {
        self.pending.push(byte);

        let mut tracker = Tracker {
            pen: &mut self.pen,
            event: None,
        };
        self.parser.advance(&mut tracker, &[byte]);
        let Some(event) = tracker.event else {
            return Ok(());
        };

        match event {
            Event::Print(c) => {
                let width = c.width().unwrap_or(0);
                if let Some(limit) = self.wrap {
                    if self.column > 0 && self.column + width > limit {
                        log::trace!("wrapping at column {} (limit {})", self.column, limit);
                        self.line_break(b"\n")?;
                    }
                }
                self.flush_pending()?;
                self.column += width;
            }
            Event::Execute(b'\n') => {
                let newline = std::mem::take(&mut self.pending);
                self.line_break(&newline)?;
            }
            Event::Execute(control) => {
                match control {
                    b'\r' => self.column = 0,
                    b'\t' => self.column = (self.column / TAB_STOP + 1) * TAB_STOP,
                    0x08 => self.column = self.column.saturating_sub(1),
                    _ => {}
                }
                self.flush_pending()?;
            }
            Event::Sequence => self.flush_pending()?,
        }
        Ok(())
    }

    /// Writes `newline` with the pen closed around it.
    fn line_break(&mut self, newline: &[u8]) -> io::Result<()> {
        if self.pen.is_zero() {
            self.inner.write_all(newline)?;
        } else {
            self.inner.write_all(self.pen.reset_sequence().as_bytes())?;
            self.inner.write_all(newline)?;
            self.inner
                .write_all(self.pen.restore_sequence().as_bytes())?;
        }
        self.column = 0;
        Ok(())
    }

    fn flush_pending(&mut self) -> io::Result<()> {
        if !self.pending.is_empty() {
            self.inner.write_all(&self.pending)?;
            self.pending.clear();
        }
        Ok(())
    }
}

impl<W: Write + Close> PenWriter<W> {
    /// Like [`PenWriter::new`], but closing this writer also closes `inner`.
    pub fn closing(inner: W) -> Self {
        let mut writer = Self::new(inner);
        writer.closer = Some(<W as Close>::close);
        writer
    }
}

impl<W: Write> Write for PenWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        for &byte in buf {
            self.write_byte(byte)?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

impl<W: Write> Close for PenWriter<W> {
    /// Writes out any incomplete trailing unit, flushes, and closes the sink
    /// when it was attached with [`PenWriter::closing`].
    fn close(&mut self) -> io::Result<()> {
        let flushed = self.flush_pending().and_then(|()| self.inner.flush());
        let closed = match self.closer {
            Some(close) => close(&mut self.inner),
            None => Ok(()),
        };
        crate::error::join_close([flushed, closed])
    }
}

struct Meter {
    width: usize,
}

impl vte::Perform for Meter {
    fn print(&mut self, c: char) {
        self.width += c.width().unwrap_or(0);
    }
}

/// Rendered width of `s` in terminal columns.
///
/// Escape sequences (SGR, OSC 8 and the rest) and control characters take no
/// space; wide characters take two columns.
pub fn display_width(s: &str) -> usize {
    let mut meter = Meter { width: 0 };
    let mut parser = vte::Parser::new();
    parser.advance(&mut meter, s.as_bytes());
    meter.width
}
