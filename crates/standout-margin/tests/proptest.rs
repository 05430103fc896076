//! Property-based tests for the margin writers using proptest.

use proptest::prelude::*;
use standout_margin::{display_width, Fill, IndentWriter, PaddingWriter, PenWriter};
use std::io::Write;

// ============================================================================
// Test helpers
// ============================================================================

fn line_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 .,é日本한]{0,24}"
}

fn lines_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(line_strategy(), 1..8)
}

fn sgr_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        (30u8..38).prop_map(|c| format!("\x1b[{}m", c)),
        (0u8..=255).prop_map(|n| format!("\x1b[1;38;5;{}m", n)),
        Just("\x1b[3;4m".to_string()),
    ]
}

fn pad(width: usize, input: &str) -> String {
    let mut out = Vec::new();
    let mut w = PaddingWriter::new(&mut out, width, Fill::literal("·"));
    w.write_all(input.as_bytes()).unwrap();
    drop(w);
    String::from_utf8(out).unwrap()
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    /// Short lines grow to exactly the target width; long lines are untouched.
    #[test]
    fn padding_reaches_width_and_never_truncates(
        lines in lines_strategy(),
        width in 0usize..40,
    ) {
        let input: String = lines.iter().map(|l| format!("{}\n", l)).collect();
        let output = pad(width, &input);

        let out_lines: Vec<&str> = output.split('\n').collect();
        prop_assert_eq!(out_lines.len(), lines.len() + 1);

        for (original, padded) in lines.iter().zip(&out_lines) {
            let original_width = display_width(original);
            prop_assert!(padded.starts_with(original.as_str()));
            prop_assert_eq!(display_width(padded), original_width.max(width));
        }
    }

    /// Padding measures display width, not bytes, even with styles in the way.
    #[test]
    fn padding_ignores_escape_sequences(
        line in line_strategy(),
        sgr in sgr_strategy(),
        width in 1usize..40,
    ) {
        let styled = format!("{}{}\x1b[0m\n", sgr, line);
        let output = pad(width, &styled);
        let first = output.split('\n').next().unwrap_or_default();
        prop_assert_eq!(display_width(first), display_width(&line).max(width));
    }

    /// Every output line starts with exactly `indent` units of fill, and the
    /// content after it is the original line.
    #[test]
    fn indent_prefixes_each_line_once(
        lines in lines_strategy(),
        indent in 0usize..6,
    ) {
        let input: String = lines.iter().map(|l| format!("{}\n", l)).collect();

        let mut out = Vec::new();
        let mut w = IndentWriter::new(&mut out, indent, Fill::literal("|"));
        // Split writes at arbitrary points, but never inside a character.
        for ch in input.chars() {
            let mut buf = [0u8; 4];
            w.write_all(ch.encode_utf8(&mut buf).as_bytes()).unwrap();
        }
        drop(w);

        let output = String::from_utf8(out).unwrap();
        let out_lines: Vec<&str> = output.split('\n').collect();
        let prefix = "|".repeat(indent);
        for (original, indented) in lines.iter().zip(&out_lines) {
            prop_assert_eq!(indented.to_string(), format!("{}{}", prefix, original));
        }
        prop_assert_eq!(out_lines.last().copied(), Some(""));
    }

    /// The pen seen by content after the indent equals the pen before it.
    #[test]
    fn indent_preserves_pen(
        sgr in sgr_strategy(),
        first in line_strategy(),
        second in "[a-z]{1,10}",
    ) {
        let fill = Fill::callback(|w: &mut dyn Write| write!(w, "\x1b[45m \x1b[0m"));
        let mut w = IndentWriter::new(Vec::new(), 2, fill);
        w.write_all(format!("{}{}\n", sgr, first).as_bytes()).unwrap();
        let before = w.pen().clone();

        w.write_all(second.as_bytes()).unwrap();
        prop_assert_eq!(w.pen(), &before);

        // Replaying the output through a fresh tracker lands on the same pen.
        let mut replay = PenWriter::new(Vec::new());
        replay.write_all(w.get_ref()).unwrap();
        prop_assert_eq!(replay.pen(), &before);
    }

    /// Byte-at-a-time writes produce the same output as one big write.
    #[test]
    fn padding_is_insensitive_to_write_boundaries(
        lines in lines_strategy(),
        width in 0usize..30,
    ) {
        let input: String = lines.iter().map(|l| format!("{}\n", l)).collect();

        let mut out = Vec::new();
        let mut w = PaddingWriter::new(&mut out, width, Fill::default());
        for byte in input.as_bytes() {
            w.write_all(&[*byte]).unwrap();
        }
        drop(w);

        let whole = {
            let mut out = Vec::new();
            let mut w = PaddingWriter::new(&mut out, width, Fill::default());
            w.write_all(input.as_bytes()).unwrap();
            drop(w);
            out
        };
        prop_assert_eq!(out, whole);
    }
}
