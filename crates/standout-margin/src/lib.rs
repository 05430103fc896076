//! # Standout Margin - Streaming Indentation and Padding
//!
//! `standout-margin` provides writers that lay out styled terminal output as it
//! streams: every line gets a left indent, a margin, and trailing padding up to
//! a fixed width, without ever buffering more than the current line.
//!
//! The hard part is that the stream carries ANSI styling. The writers measure
//! lines in display columns (wide characters count 2, escape sequences 0) and
//! track the active style and hyperlink, so fill can be injected in its own
//! style and the content around it keeps the caller's.
//!
//! ## Core Concepts
//!
//! - [`MarginWriter`]: Entry point. Builds the writer chain for one block.
//! - [`IndentWriter`]: Prefixes each line with fill, preserving the pen.
//! - [`PaddingWriter`]: Pads each line to a minimum width.
//! - [`PenWriter`]: Column-aware layer tracking width and [`Pen`] state.
//! - [`Fill`]: What to repeat: a literal token or a routine.
//! - [`StyleBlock`] / [`BlockStack`]: Layout rules and their context.
//!
//! ## Quick Start
//!
//! ```rust
//! use standout_margin::{MarginWriter, StaticBlockStack, StyleBlock};
//! use std::io::Write;
//!
//! let rules = StyleBlock::new().indent(3).margin(2);
//! let stack = StaticBlockStack::new(0);
//!
//! let mut out = Vec::new();
//! let mut w = MarginWriter::new(&mut out, &stack, &rules);
//! w.write_all(b"x\ny\n").unwrap();
//! drop(w);
//!
//! assert_eq!(out, b"     x\n     y\n");
//! ```
//!
//! ## Styled Fill
//!
//! ```rust
//! use standout_margin::{Fill, IndentWriter};
//! use std::io::Write;
//!
//! let bar = Fill::callback(|w: &mut dyn Write| write!(w, "\x1b[35m┃\x1b[0m"));
//!
//! let mut out = Vec::new();
//! let mut w = IndentWriter::new(&mut out, 1, bar);
//! w.write_all(b"\x1b[1mone\ntwo\x1b[0m\n").unwrap();
//! drop(w);
//!
//! // The second line reopens bold after the bar.
//! let text = String::from_utf8(out).unwrap();
//! assert!(text.contains("\x1b[35m┃\x1b[0m\x1b[1mtwo"));
//! ```
//!
//! ## Layout From YAML
//!
//! ```rust
//! use standout_margin::StyleBlock;
//!
//! let rules = StyleBlock::from_yaml(r#"
//! indent: 2
//! indent_token: "│ "
//! style: bright_black
//! "#).unwrap();
//! assert_eq!(rules.left_width(), 2);
//! ```

mod config;
mod error;
mod fill;
mod indent;
mod margin;
mod padding;
pub mod pen;
pub mod style;
mod wrap;

pub use error::MarginError;
pub use fill::{Fill, FillFn};
pub use indent::IndentWriter;
pub use margin::{BlockStack, MarginWriter, StaticBlockStack, StyleBlock};
pub use padding::PaddingWriter;
pub use pen::{Hyperlink, Pen, PenColor, PenStyle};
pub use style::{ColorDef, FillStyle};
pub use wrap::{display_width, Close, PenWriter};
