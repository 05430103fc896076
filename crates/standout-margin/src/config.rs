//! Loading layout rules from YAML.
//!
//! ```yaml
//! indent: 2
//! margin: 1
//! indent_token: "│ "
//! style: "bright_black"
//! ```
//!
//! Every key is optional. `style` uses the shorthand or mapping syntax
//! described in [`crate::style`].

use serde::Deserialize;

use crate::error::MarginError;
use crate::margin::StyleBlock;
use crate::style::FillStyle;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawStyleBlock {
    indent: Option<usize>,
    margin: Option<usize>,
    indent_token: Option<String>,
    style: Option<serde_yaml::Value>,
}

impl StyleBlock {
    /// Parses layout rules from a YAML document.
    ///
    /// # Example
    ///
    /// ```rust
    /// use standout_margin::StyleBlock;
    ///
    /// let rules = StyleBlock::from_yaml("indent: 2\nmargin: 1\nindent_token: '> '").unwrap();
    /// assert_eq!(rules.left_width(), 3);
    /// assert_eq!(rules.indent_token.as_deref(), Some("> "));
    /// ```
    pub fn from_yaml(yaml: &str) -> Result<Self, MarginError> {
        if yaml.trim().is_empty() {
            return Ok(StyleBlock::default());
        }
        let value: serde_yaml::Value =
            serde_yaml::from_str(yaml).map_err(|e| MarginError::config(e.to_string()))?;
        Self::from_value(value)
    }

    /// Builds layout rules from an already-parsed YAML value, such as one
    /// entry of a larger document.
    pub fn from_value(value: serde_yaml::Value) -> Result<Self, MarginError> {
        let raw: RawStyleBlock = match value {
            serde_yaml::Value::Null => RawStyleBlock::default(),
            other => {
                serde_yaml::from_value(other).map_err(|e| MarginError::config(e.to_string()))?
            }
        };

        let style = match raw.style {
            Some(ref value) => FillStyle::parse(value)?.to_style(),
            None => console::Style::new(),
        };

        Ok(StyleBlock {
            indent: raw.indent,
            margin: raw.margin,
            indent_token: raw.indent_token,
            style,
        })
    }
}
