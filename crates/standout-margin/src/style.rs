//! Fill style parsing.
//!
//! Layout rules loaded from YAML describe the style of their fill with the
//! same attribute syntax standout stylesheets use:
//!
//! ```yaml
//! # Shorthand - color and/or attribute keywords
//! style: "cyan bold"
//!
//! # Full definition - mapping with attributes
//! style:
//!   fg: "#ff6b35"
//!   bg: 236
//!   italic: true
//! ```
//!
//! Colors may be one of the 16 named colors (`red`, `bright_red`, ...), a
//! 256-palette index or a `#rgb`/`#rrggbb` hex code. Hex codes are drawn
//! with the nearest 256-palette entry.

use console::{Color, Style};

use crate::error::MarginError;

/// Channel levels of the 6x6x6 cube in the 256-color palette.
const CUBE_LEVELS: [u8; 6] = [0, 95, 135, 175, 215, 255];

/// A fill color as written in layout rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorDef {
    /// One of the eight basic ANSI colors.
    Named(Color),
    /// 256-color palette index. Bright names resolve to 8-15.
    Color256(u8),
    /// A hex code, drawn with the nearest palette entry.
    Rgb(u8, u8, u8),
}

impl ColorDef {
    /// Reads a color from a YAML scalar: a name, a hex code or a palette
    /// index.
    pub fn from_yaml(value: &serde_yaml::Value) -> Result<Self, MarginError> {
        match value {
            serde_yaml::Value::String(s) => Self::parse_string(s),
            serde_yaml::Value::Number(n) => n
                .as_u64()
                .and_then(|index| u8::try_from(index).ok())
                .map(ColorDef::Color256)
                .ok_or_else(|| MarginError::config(format!("palette index {} is not 0-255", n))),
            other => Err(MarginError::config(format!(
                "fill color must be a name, hex code or palette index, got {:?}",
                other
            ))),
        }
    }

    /// Parses a color name (`red`, `bright_red`, `grey`) or a hex code
    /// (`#f80`, `#ff8800`).
    pub fn parse_string(s: &str) -> Result<Self, MarginError> {
        let s = s.trim();
        match s.strip_prefix('#') {
            Some(hex) => parse_hex(hex)
                .ok_or_else(|| MarginError::config(format!("bad hex color '{}'", s))),
            None => parse_name(&s.to_lowercase())
                .ok_or_else(|| MarginError::config(format!("unknown color '{}'", s))),
        }
    }

    pub fn to_console_color(&self) -> Color {
        match *self {
            ColorDef::Named(c) => c,
            ColorDef::Color256(n) => Color::Color256(n),
            ColorDef::Rgb(r, g, b) => Color::Color256(nearest_palette_index(r, g, b)),
        }
    }
}

fn parse_hex(hex: &str) -> Option<ColorDef> {
    if !hex.is_ascii() {
        return None;
    }
    let channel = |digits: &str| u8::from_str_radix(digits, 16).ok();
    let (r, g, b) = match hex.len() {
        3 => {
            let short = |i: usize| channel(&hex[i..=i]).map(|v| v * 0x11);
            (short(0)?, short(1)?, short(2)?)
        }
        6 => (channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?),
        _ => return None,
    };
    Some(ColorDef::Rgb(r, g, b))
}

const BASIC: [(&str, Color); 8] = [
    ("black", Color::Black),
    ("red", Color::Red),
    ("green", Color::Green),
    ("yellow", Color::Yellow),
    ("blue", Color::Blue),
    ("magenta", Color::Magenta),
    ("cyan", Color::Cyan),
    ("white", Color::White),
];

fn parse_name(name: &str) -> Option<ColorDef> {
    let name = match name {
        "gray" | "grey" => "white",
        other => other,
    };
    if let Some(base) = name.strip_prefix("bright_") {
        let index = BASIC.iter().position(|(n, _)| *n == base)?;
        return Some(ColorDef::Color256(index as u8 + 8));
    }
    BASIC
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, color)| ColorDef::Named(*color))
}

/// Nearest entry among the color cube (16-231) and the gray ramp (232-255),
/// by squared distance.
fn nearest_palette_index(r: u8, g: u8, b: u8) -> u8 {
    let level = |v: u8| {
        CUBE_LEVELS
            .iter()
            .enumerate()
            .min_by_key(|&(_, l)| (*l as i32 - v as i32).abs())
            .map_or(0, |(i, _)| i)
    };
    let (ri, gi, bi) = (level(r), level(g), level(b));
    let cube = (CUBE_LEVELS[ri], CUBE_LEVELS[gi], CUBE_LEVELS[bi]);

    let mean = (r as u32 + g as u32 + b as u32) / 3;
    let step = (mean.saturating_sub(8) + 5) / 10;
    let gray_step = step.min(23);
    let gray = (8 + gray_step * 10) as u8;

    let distance = |(cr, cg, cb): (u8, u8, u8)| {
        let d = |a: u8, b: u8| (a as i32 - b as i32).pow(2);
        d(cr, r) + d(cg, g) + d(cb, b)
    };

    if distance((gray, gray, gray)) < distance(cube) {
        232 + gray_step as u8
    } else {
        (16 + 36 * ri + 6 * gi + bi) as u8
    }
}

/// Style attributes for fill, before conversion to `console::Style`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FillStyle {
    pub fg: Option<ColorDef>,
    pub bg: Option<ColorDef>,
    pub bold: Option<bool>,
    pub dim: Option<bool>,
    pub italic: Option<bool>,
    pub underline: Option<bool>,
    pub blink: Option<bool>,
    pub reverse: Option<bool>,
    pub hidden: Option<bool>,
    pub strikethrough: Option<bool>,
}

impl FillStyle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses either shorthand (`"cyan bold"`) or a mapping of attributes.
    pub fn parse(value: &serde_yaml::Value) -> Result<Self, MarginError> {
        match value {
            serde_yaml::Value::String(s) => Self::parse_shorthand(s),
            serde_yaml::Value::Mapping(map) => Self::parse_mapping(map),
            _ => Err(MarginError::config(format!(
                "style must be a string or mapping, got {:?}",
                value
            ))),
        }
    }

    /// Parses space-separated attribute names and at most one color.
    pub fn parse_shorthand(s: &str) -> Result<Self, MarginError> {
        let mut attrs = FillStyle::new();

        for part in s.split_whitespace() {
            match part.to_lowercase().as_str() {
                "bold" => attrs.bold = Some(true),
                "dim" => attrs.dim = Some(true),
                "italic" => attrs.italic = Some(true),
                "underline" => attrs.underline = Some(true),
                "blink" => attrs.blink = Some(true),
                "reverse" => attrs.reverse = Some(true),
                "hidden" => attrs.hidden = Some(true),
                "strikethrough" => attrs.strikethrough = Some(true),
                _ => {
                    if attrs.fg.is_some() {
                        return Err(MarginError::config(format!(
                            "multiple colors in style shorthand: '{}'",
                            s
                        )));
                    }
                    attrs.fg = Some(ColorDef::parse_string(part)?);
                }
            }
        }

        if attrs.is_empty() {
            return Err(MarginError::config(format!(
                "empty style shorthand: '{}'",
                s
            )));
        }
        Ok(attrs)
    }

    pub fn parse_mapping(map: &serde_yaml::Mapping) -> Result<Self, MarginError> {
        let mut attrs = FillStyle::new();

        for (key, value) in map {
            let name = key.as_str().ok_or_else(|| {
                MarginError::config(format!("non-string key in style: {:?}", key))
            })?;
            attrs.set_attribute(name, value)?;
        }

        Ok(attrs)
    }

    fn set_attribute(&mut self, name: &str, value: &serde_yaml::Value) -> Result<(), MarginError> {
        let flag = |value: &serde_yaml::Value| {
            value.as_bool().ok_or_else(|| {
                MarginError::config(format!("'{}' must be a boolean, got {:?}", name, value))
            })
        };

        match name {
            "fg" => self.fg = Some(ColorDef::from_yaml(value)?),
            "bg" => self.bg = Some(ColorDef::from_yaml(value)?),
            "bold" => self.bold = Some(flag(value)?),
            "dim" => self.dim = Some(flag(value)?),
            "italic" => self.italic = Some(flag(value)?),
            "underline" => self.underline = Some(flag(value)?),
            "blink" => self.blink = Some(flag(value)?),
            "reverse" => self.reverse = Some(flag(value)?),
            "hidden" => self.hidden = Some(flag(value)?),
            "strikethrough" => self.strikethrough = Some(flag(value)?),
            _ => {
                return Err(MarginError::config(format!(
                    "unknown style attribute: '{}'",
                    name
                )))
            }
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        *self == FillStyle::default()
    }

    pub fn to_style(&self) -> Style {
        let mut style = Style::new();

        if let Some(ref fg) = self.fg {
            style = style.fg(fg.to_console_color());
        }
        if let Some(ref bg) = self.bg {
            style = style.bg(bg.to_console_color());
        }
        if self.bold == Some(true) {
            style = style.bold();
        }
        if self.dim == Some(true) {
            style = style.dim();
        }
        if self.italic == Some(true) {
            style = style.italic();
        }
        if self.underline == Some(true) {
            style = style.underlined();
        }
        if self.blink == Some(true) {
            style = style.blink();
        }
        if self.reverse == Some(true) {
            style = style.reverse();
        }
        if self.hidden == Some(true) {
            style = style.hidden();
        }
        if self.strikethrough == Some(true) {
            style = style.strikethrough();
        }

        style
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_yaml::{Mapping, Value};

    #[test]
    fn test_parse_named_and_bright() {
        assert_eq!(
            ColorDef::parse_string("Cyan").unwrap(),
            ColorDef::Named(Color::Cyan)
        );
        assert_eq!(
            ColorDef::parse_string("bright_red").unwrap(),
            ColorDef::Color256(9)
        );
        assert!(ColorDef::parse_string("bright_orange").is_err());
        assert!(ColorDef::parse_string("purple").is_err());
    }

    #[test]
    fn test_parse_hex() {
        assert_eq!(
            ColorDef::parse_string("#ff6b35").unwrap(),
            ColorDef::Rgb(255, 107, 53)
        );
        assert_eq!(
            ColorDef::parse_string("#fff").unwrap(),
            ColorDef::Rgb(255, 255, 255)
        );
        assert!(ColorDef::parse_string("#ff").is_err());
        assert!(ColorDef::parse_string("#gggggg").is_err());
    }

    #[test]
    fn test_palette_index() {
        assert_eq!(
            ColorDef::from_yaml(&Value::Number(208.into())).unwrap(),
            ColorDef::Color256(208)
        );
        assert!(ColorDef::from_yaml(&Value::Number(300.into())).is_err());
        assert!(ColorDef::from_yaml(&Value::Bool(true)).is_err());
    }

    #[test]
    fn test_hex_maps_to_nearest_palette_entry() {
        let index = |hex: &str| match ColorDef::parse_string(hex).unwrap().to_console_color() {
            Color::Color256(n) => n,
            other => panic!("expected palette color, got {:?}", other),
        };
        assert_eq!(index("#ff0000"), 196);
        assert_eq!(index("#00ff00"), 46);
        assert_eq!(index("#000000"), 16);
        assert_eq!(index("#ffffff"), 231);
        assert_eq!(index("#808080"), 244);
        assert_eq!(index("#5f87af"), 67);
    }

    #[test]
    fn test_shorthand() {
        let attrs = FillStyle::parse_shorthand("yellow italic").unwrap();
        assert_eq!(attrs.fg, Some(ColorDef::Named(Color::Yellow)));
        assert_eq!(attrs.italic, Some(true));
        assert!(attrs.bold.is_none());
    }

    #[test]
    fn test_shorthand_rejects_two_colors() {
        assert!(FillStyle::parse_shorthand("red blue").is_err());
    }

    #[test]
    fn test_mapping() {
        let mut map = Mapping::new();
        map.insert(Value::String("fg".into()), Value::String("red".into()));
        map.insert(Value::String("bold".into()), Value::Bool(true));

        let attrs = FillStyle::parse_mapping(&map).unwrap();
        assert_eq!(attrs.fg, Some(ColorDef::Named(Color::Red)));
        assert_eq!(attrs.bold, Some(true));
    }

    #[test]
    fn test_mapping_unknown_attribute() {
        let mut map = Mapping::new();
        map.insert(Value::String("sparkle".into()), Value::Bool(true));
        let err = FillStyle::parse_mapping(&map).unwrap_err();
        assert!(err.to_string().contains("sparkle"));
    }

    #[test]
    fn test_mapping_non_bool_flag() {
        let mut map = Mapping::new();
        map.insert(Value::String("bold".into()), Value::String("yes".into()));
        assert!(FillStyle::parse_mapping(&map).is_err());
    }

    #[test]
    fn test_to_style_renders_sgr() {
        let style = FillStyle::parse_shorthand("red bold")
            .unwrap()
            .to_style()
            .force_styling(true);
        let rendered = style.apply_to("x").to_string();
        assert!(rendered.contains("\x1b[31m"));
        assert!(rendered.contains("\x1b[1m"));
        assert!(rendered.contains('x'));
    }
}
