//! The margin writer: indentation, margin and padding for one block.
//!
//! A [`MarginWriter`] is built from the layout rules of a block
//! ([`StyleBlock`]) and the context the block sits in ([`BlockStack`]). It
//! composes the two filters around the sink:
//!
//! ```text
//! caller ─▶ IndentWriter (indent + margin) ─▶ PaddingWriter (indent + stack width) ─▶ sink
//! ```
//!
//! Indentation is drawn with the block's indent token in the parent block's
//! style, padding with spaces in the block's own style.

use std::io::{self, Write};

use console::Style;

use crate::fill::Fill;
use crate::indent::IndentWriter;
use crate::padding::PaddingWriter;
use crate::wrap::{display_width, Close};

/// Layout rules for a block, already resolved by the caller.
///
/// Unset values fall back to 0 (`indent`, `margin`) and a single space
/// (`indent_token`).
#[derive(Debug, Clone, Default)]
pub struct StyleBlock {
    /// Columns of indentation inside the block.
    pub indent: Option<usize>,
    /// Columns of margin outside the block.
    pub margin: Option<usize>,
    /// Token repeated to draw the indentation.
    pub indent_token: Option<String>,
    /// Style for the block's padding.
    pub style: Style,
}

impl StyleBlock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn indent(mut self, indent: usize) -> Self {
        self.indent = Some(indent);
        self
    }

    pub fn margin(mut self, margin: usize) -> Self {
        self.margin = Some(margin);
        self
    }

    pub fn indent_token(mut self, token: impl Into<String>) -> Self {
        self.indent_token = Some(token.into());
        self
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Total left offset: indentation plus margin.
    pub fn left_width(&self) -> usize {
        self.indent.unwrap_or(0) + self.margin.unwrap_or(0)
    }
}

/// The nesting context a block is rendered in.
///
/// Implemented by whatever tracks nested blocks during rendering; the margin
/// writer only needs the available width and the enclosing block's style.
pub trait BlockStack {
    /// Width, in columns, that lines of the current block are padded to.
    fn width(&self) -> usize;

    /// Style of the enclosing block, used for indentation fill.
    fn parent_style(&self) -> Style;
}

/// A [`BlockStack`] with fixed values.
#[derive(Debug, Clone, Default)]
pub struct StaticBlockStack {
    pub width: usize,
    pub parent_style: Style,
}

impl StaticBlockStack {
    pub fn new(width: usize) -> Self {
        Self {
            width,
            parent_style: Style::new(),
        }
    }

    pub fn with_parent_style(mut self, style: Style) -> Self {
        self.parent_style = style;
        self
    }
}

impl BlockStack for StaticBlockStack {
    fn width(&self) -> usize {
        self.width
    }

    fn parent_style(&self) -> Style {
        self.parent_style.clone()
    }
}

/// A fill that draws `token` in `style`.
///
/// Styling is emitted whether or not stdout is a terminal.
fn styled_fill(style: Style, token: String) -> Fill {
    let style = style.force_styling(true);
    Fill::callback(move |w: &mut dyn Write| write!(w, "{}", style.apply_to(token.as_str())))
}

/// Applies a block's indentation, margin and padding to everything written
/// to it.
///
/// Content is padded to the stack's width; the indentation and margin sit
/// outside that width, to its left.
///
/// # Errors
///
/// Write failures are returned as the failing filter reported them: an
/// [`io::Error`] carrying a [`MarginError`](crate::MarginError) for the stage
/// (`WriteIndentation`, `WritePadding` or `WriteBytes`). The composer does not
/// wrap them again.
///
/// # Example
///
/// ```rust
/// use standout_margin::{MarginWriter, StaticBlockStack, StyleBlock};
/// use std::io::Write;
///
/// let rules = StyleBlock::new().indent(2).margin(1);
/// let stack = StaticBlockStack::new(8);
///
/// let mut out = Vec::new();
/// let mut w = MarginWriter::new(&mut out, &stack, &rules);
/// w.write_all(b"hi\n").unwrap();
/// drop(w);
///
/// assert_eq!(String::from_utf8(out).unwrap(), "   hi      \n");
/// ```
pub struct MarginWriter<W: Write> {
    inner: IndentWriter<PaddingWriter<W>>,
}

impl<W: Write> MarginWriter<W> {
    /// Builds the writer chain around `sink`. Closing the writer flushes
    /// `sink` but does not close it.
    pub fn new<S>(sink: W, stack: &S, rules: &StyleBlock) -> Self
    where
        S: BlockStack + ?Sized,
    {
        let padding = PaddingWriter::new(
            sink,
            Self::padding_width(stack, rules),
            Self::padding_fill(rules),
        );
        Self::compose(padding, stack, rules)
    }

    fn padding_fill(rules: &StyleBlock) -> Fill {
        styled_fill(rules.style.clone(), " ".to_string())
    }

    fn indent_token(rules: &StyleBlock) -> String {
        rules
            .indent_token
            .clone()
            .unwrap_or_else(|| " ".to_string())
    }

    /// The padding filter sees the indentation too, so its target is the
    /// stack width plus the columns the indentation takes up.
    fn padding_width<S>(stack: &S, rules: &StyleBlock) -> usize
    where
        S: BlockStack + ?Sized,
    {
        let width = stack.width();
        if width == 0 {
            return 0;
        }
        width + rules.left_width() * display_width(&Self::indent_token(rules))
    }

    fn compose<S>(padding: PaddingWriter<W>, stack: &S, rules: &StyleBlock) -> Self
    where
        S: BlockStack + ?Sized,
    {
        let left = rules.left_width();
        log::debug!(
            "margin writer: indent {} + margin {}, padding to {}",
            rules.indent.unwrap_or(0),
            rules.margin.unwrap_or(0),
            padding.width()
        );

        let indent_fill = styled_fill(stack.parent_style(), Self::indent_token(rules));
        Self {
            inner: IndentWriter::closing(padding, left, indent_fill),
        }
    }

    pub fn get_ref(&self) -> &W {
        self.inner.get_ref().get_ref()
    }

    pub fn get_mut(&mut self) -> &mut W {
        self.inner.get_mut().get_mut()
    }
}

impl<W: Write + Close> MarginWriter<W> {
    /// Like [`MarginWriter::new`], but closing the writer also closes
    /// `sink`.
    pub fn closing<S>(sink: W, stack: &S, rules: &StyleBlock) -> Self
    where
        S: BlockStack + ?Sized,
    {
        let padding = PaddingWriter::closing(
            sink,
            Self::padding_width(stack, rules),
            Self::padding_fill(rules),
        );
        Self::compose(padding, stack, rules)
    }
}

impl<W: Write> Write for MarginWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

impl<W: Write> Close for MarginWriter<W> {
    /// Closes the filter chain and, for writers built with
    /// [`MarginWriter::closing`], the sink. Failures from every level are
    /// reported together.
    fn close(&mut self) -> io::Result<()> {
        log::debug!("closing margin writer");
        self.inner.close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(stack: &StaticBlockStack, rules: &StyleBlock, input: &str) -> String {
        let mut out = Vec::new();
        let mut w = MarginWriter::new(&mut out, stack, rules);
        w.write_all(input.as_bytes()).unwrap();
        drop(w);
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_left_width_defaults() {
        assert_eq!(StyleBlock::new().left_width(), 0);
        assert_eq!(StyleBlock::new().indent(3).margin(2).left_width(), 5);
    }

    #[test]
    fn test_indent_plus_margin() {
        let rules = StyleBlock::new().indent(3).margin(2);
        let out = render(&StaticBlockStack::new(0), &rules, "x\ny\n");
        assert_eq!(out, "     x\n     y\n");
    }

    #[test]
    fn test_padding_only() {
        let out = render(&StaticBlockStack::new(10), &StyleBlock::new(), "hi\n");
        assert_eq!(out, "hi        \n");
    }

    #[test]
    fn test_padding_excludes_indent() {
        let rules = StyleBlock::new().indent(2);
        let out = render(&StaticBlockStack::new(6), &rules, "ab\n");
        assert_eq!(out, "  ab    \n");
    }

    #[test]
    fn test_padding_excludes_wide_indent_token() {
        let rules = StyleBlock::new().indent(1).margin(1).indent_token("│ ");
        let out = render(&StaticBlockStack::new(4), &rules, "ab\n\n");
        assert_eq!(out, "│ │ ab  \n│ │     \n");
    }

    #[test]
    fn test_fill_is_styled_without_forcing() {
        let rules = StyleBlock::new().style(Style::new().blue());
        let out = render(&StaticBlockStack::new(2), &rules, "\n");
        assert_eq!(out, "\x1b[34m \x1b[0m\x1b[34m \x1b[0m\n");

        let stack = StaticBlockStack::new(0).with_parent_style(Style::new().green());
        let rules = StyleBlock::new().indent(1).indent_token(">");
        let out = render(&stack, &rules, "a\n");
        assert_eq!(out, "\x1b[32m>\x1b[0ma\n");
    }

    #[test]
    fn test_custom_indent_token() {
        let rules = StyleBlock::new().indent(1).indent_token("│ ");
        let out = render(&StaticBlockStack::new(0), &rules, "quote\n");
        assert_eq!(out, "│ quote\n");
    }

    #[test]
    fn test_styled_indent_token() {
        let stack = StaticBlockStack::new(0)
            .with_parent_style(Style::new().red().force_styling(true));
        let rules = StyleBlock::new().indent(1).indent_token(">");
        let out = render(&stack, &rules, "\x1b[1mhey\x1b[0m\n");
        assert_eq!(out, "\x1b[31m>\x1b[0m\x1b[1mhey\x1b[0m\n");
    }
}
