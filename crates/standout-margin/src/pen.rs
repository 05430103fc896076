//! Pen state: the style and hyperlink that apply to the next visible character.
//!
//! The wrap layer ([`PenWriter`](crate::PenWriter)) rebuilds a [`Pen`] from the
//! SGR and OSC 8 sequences it sees, and the filters use it to close the pen
//! before injected fill and reopen it afterwards.

/// Resets all SGR attributes.
pub const RESET_STYLE: &str = "\x1b[0m";

/// Ends the active OSC 8 hyperlink.
pub const RESET_HYPERLINK: &str = "\x1b]8;;\x1b\\";

/// Builds the OSC 8 sequence that opens a hyperlink.
pub fn set_hyperlink(url: &str, params: &str) -> String {
    format!("\x1b]8;{};{}\x1b\\", params, url)
}

/// A color as selected by an SGR sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PenColor {
    /// One of the 16 basic colors (8-15 are the bright variants).
    Basic(u8),
    /// 256-color palette index.
    Indexed(u8),
    /// True color.
    Rgb(u8, u8, u8),
}

impl PenColor {
    fn push_codes(&self, base: u16, bright_base: u16, extended: u16, codes: &mut Vec<String>) {
        match *self {
            PenColor::Basic(n) if n < 8 => codes.push((base + n as u16).to_string()),
            PenColor::Basic(n) => codes.push((bright_base + (n as u16 - 8)).to_string()),
            PenColor::Indexed(n) => codes.push(format!("{};5;{}", extended, n)),
            PenColor::Rgb(r, g, b) => codes.push(format!("{};2;{};{};{}", extended, r, g, b)),
        }
    }
}

/// Text style tracked from SGR sequences.
///
/// Only the attributes are kept, never the raw sequences, so a long stream
/// of color changes does not grow the state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PenStyle {
    pub bold: bool,
    pub dim: bool,
    pub italic: bool,
    pub underline: bool,
    /// Sub-parameter of a `4:n` underline (3 is curly, 4 dotted, ...).
    /// `None` for a plain `4`.
    pub underline_style: Option<u16>,
    pub blink: bool,
    pub reverse: bool,
    pub hidden: bool,
    pub strikethrough: bool,
    pub fg: Option<PenColor>,
    pub bg: Option<PenColor>,
    pub underline_color: Option<PenColor>,
}

impl PenStyle {
    /// Returns true when no attribute or color is active.
    pub fn is_zero(&self) -> bool {
        *self == PenStyle::default()
    }

    /// Applies the parameters of one SGR (`CSI … m`) sequence.
    ///
    /// Each element of `groups` is one `;`-separated parameter together with
    /// its `:`-separated sub-parameters. An empty list means reset.
    pub fn apply_sgr(&mut self, groups: &[&[u16]]) {
        if groups.is_empty() {
            *self = PenStyle::default();
            return;
        }

        let mut i = 0;
        while i < groups.len() {
            let group = groups[i];
            let code = group.first().copied().unwrap_or(0);
            match code {
                0 => *self = PenStyle::default(),
                1 => self.bold = true,
                2 => self.dim = true,
                3 => self.italic = true,
                4 => match group.get(1).copied() {
                    Some(0) => {
                        self.underline = false;
                        self.underline_style = None;
                    }
                    kind => {
                        self.underline = true;
                        self.underline_style = kind;
                    }
                },
                21 => {
                    self.underline = true;
                    self.underline_style = None;
                }
                5 | 6 => self.blink = true,
                7 => self.reverse = true,
                8 => self.hidden = true,
                9 => self.strikethrough = true,
                22 => {
                    self.bold = false;
                    self.dim = false;
                }
                23 => self.italic = false,
                24 => {
                    self.underline = false;
                    self.underline_style = None;
                }
                25 => self.blink = false,
                27 => self.reverse = false,
                28 => self.hidden = false,
                29 => self.strikethrough = false,
                30..=37 => self.fg = Some(PenColor::Basic((code - 30) as u8)),
                39 => self.fg = None,
                40..=47 => self.bg = Some(PenColor::Basic((code - 40) as u8)),
                49 => self.bg = None,
                59 => self.underline_color = None,
                90..=97 => self.fg = Some(PenColor::Basic((code - 90) as u8 + 8)),
                100..=107 => self.bg = Some(PenColor::Basic((code - 100) as u8 + 8)),
                38 | 48 | 58 => {
                    let (color, consumed) = parse_extended_color(groups, i);
                    if let Some(color) = color {
                        match code {
                            38 => self.fg = Some(color),
                            48 => self.bg = Some(color),
                            _ => self.underline_color = Some(color),
                        }
                    }
                    i += consumed;
                    continue;
                }
                _ => {}
            }
            i += 1;
        }
    }

    /// Renders the SGR sequence that re-establishes this style from a reset
    /// terminal. Returns an empty string for the zero style.
    pub fn sequence(&self) -> String {
        if self.is_zero() {
            return String::new();
        }

        let mut codes: Vec<String> = Vec::new();
        let flags = [
            (self.bold, "1"),
            (self.dim, "2"),
            (self.italic, "3"),
            (self.underline, "4"),
            (self.blink, "5"),
            (self.reverse, "7"),
            (self.hidden, "8"),
            (self.strikethrough, "9"),
        ];
        for (on, code) in flags {
            if on {
                match (code, self.underline_style) {
                    ("4", Some(kind)) => codes.push(format!("4:{}", kind)),
                    _ => codes.push(code.to_string()),
                }
            }
        }
        if let Some(fg) = self.fg {
            fg.push_codes(30, 90, 38, &mut codes);
        }
        if let Some(bg) = self.bg {
            bg.push_codes(40, 100, 48, &mut codes);
        }
        if let Some(ul) = self.underline_color {
            match ul {
                PenColor::Basic(n) | PenColor::Indexed(n) => codes.push(format!("58;5;{}", n)),
                PenColor::Rgb(r, g, b) => codes.push(format!("58;2;{};{};{}", r, g, b)),
            }
        }

        format!("\x1b[{}m", codes.join(";"))
    }
}

/// Parses the color following a 38/48/58 code starting at `groups[i]`.
///
/// Handles both the colon form (`38:2::r:g:b`, `38:5:n`) and the legacy
/// semicolon form (`38;2;r;g;b`, `38;5;n`). Returns the color and how many
/// groups were consumed.
fn parse_extended_color(groups: &[&[u16]], i: usize) -> (Option<PenColor>, usize) {
    let group = groups[i];
    if group.len() > 1 {
        let color = match group[1] {
            5 => group.get(2).map(|&n| PenColor::Indexed(n as u8)),
            2 if group.len() >= 5 => {
                let rgb = &group[group.len() - 3..];
                Some(PenColor::Rgb(rgb[0] as u8, rgb[1] as u8, rgb[2] as u8))
            }
            _ => None,
        };
        return (color, 1);
    }

    let next = |offset: usize| groups.get(i + offset).and_then(|g| g.first().copied());
    match next(1) {
        Some(5) => match next(2) {
            Some(n) => (Some(PenColor::Indexed(n as u8)), 3),
            None => (None, 2),
        },
        Some(2) => match (next(2), next(3), next(4)) {
            (Some(r), Some(g), Some(b)) => (Some(PenColor::Rgb(r as u8, g as u8, b as u8)), 5),
            _ => (None, groups.len() - i),
        },
        Some(_) => (None, 2),
        None => (None, 1),
    }
}

/// The target of an OSC 8 hyperlink.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hyperlink {
    pub url: String,
    pub params: String,
}

impl Hyperlink {
    pub fn new(url: impl Into<String>, params: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            params: params.into(),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.url.is_empty()
    }

    /// The sequence that opens this link, or an empty string for no link.
    pub fn sequence(&self) -> String {
        if self.is_zero() {
            String::new()
        } else {
            set_hyperlink(&self.url, &self.params)
        }
    }
}

/// Style plus hyperlink: everything the next visible character inherits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pen {
    pub style: PenStyle,
    pub link: Hyperlink,
}

impl Pen {
    pub fn is_zero(&self) -> bool {
        self.style.is_zero() && self.link.is_zero()
    }

    /// Sequences that close this pen. Empty when nothing is active.
    pub fn reset_sequence(&self) -> String {
        let mut out = String::new();
        if !self.style.is_zero() {
            out.push_str(RESET_STYLE);
        }
        if !self.link.is_zero() {
            out.push_str(RESET_HYPERLINK);
        }
        out
    }

    /// Sequences that reopen this pen after a reset.
    pub fn restore_sequence(&self) -> String {
        let mut out = self.style.sequence();
        out.push_str(&self.link.sequence());
        out
    }
}
