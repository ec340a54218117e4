//! Edit values produced by the preview and the editor controls.
//!
//! Every edit targets exactly one [`ElementAddress`]. Edits are plain data:
//! they carry no positions, so they stay meaningful until the source they
//! were rendered from is replaced.

use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use loupe_parser::{is_intrinsic_tag_name, normalize_tag, ElementAddress};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::EditError;

lazy_static! {
    static ref HEX_COLOR: Regex =
        Regex::new(r"^#(?:[0-9a-fA-F]{3,4}|[0-9a-fA-F]{6}|[0-9a-fA-F]{8})$").unwrap();
    static ref FUNCTIONAL_COLOR: Regex =
        Regex::new(r"^(?i:rgba?|hsla?)\(\s*[0-9a-zA-Z.,%/+\-\s]*\)$").unwrap();
    static ref KEYWORD_COLOR: Regex = Regex::new(r"^[a-zA-Z]+$").unwrap();
}

/// A CSS color literal safe to splice into a string literal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(String);

impl Color {
    pub fn parse(value: &str) -> Result<Self, EditError> {
        let value = value.trim();
        if HEX_COLOR.is_match(value)
            || FUNCTIONAL_COLOR.is_match(value)
            || KEYWORD_COLOR.is_match(value)
        {
            Ok(Self(value.to_string()))
        } else {
            Err(EditError::InvalidStyle(format!("unsupported color {:?}", value)))
        }
    }

    pub fn white() -> Self {
        Self("#ffffff".to_string())
    }

    pub fn black() -> Self {
        Self("#000000".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Color {
    type Err = EditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::parse(s)
    }
}

impl TryFrom<String> for Color {
    type Error = EditError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::parse(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Replace an element's children with a single piece of text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextEdit {
    pub address: ElementAddress,
    pub text: String,
}

impl TextEdit {
    pub fn new(address: ElementAddress, text: impl Into<String>) -> Self {
        Self {
            address,
            text: text.into(),
        }
    }
}

/// Full replacement of an element's inline style, optionally renaming it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleEdit {
    pub address: ElementAddress,
    pub background_color: Color,
    pub text_color: Color,
    pub font_size_px: f64,
    pub bold: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_tag: Option<String>,
}

impl StyleEdit {
    pub fn new(
        address: ElementAddress,
        background_color: Color,
        text_color: Color,
        font_size_px: f64,
        bold: bool,
    ) -> Self {
        Self {
            address,
            background_color,
            text_color,
            font_size_px,
            bold,
            target_tag: None,
        }
    }

    pub fn with_target_tag(mut self, tag: impl Into<String>) -> Self {
        self.target_tag = Some(tag.into());
        self
    }

    /// The rename target, normalized. `None` when no rename was requested.
    pub fn validated_target(&self) -> Result<Option<String>, EditError> {
        let Some(raw) = &self.target_tag else {
            return Ok(None);
        };
        let tag = normalize_tag(raw);
        if is_intrinsic_tag_name(&tag) {
            Ok(Some(tag))
        } else {
            Err(EditError::InvalidTag(raw.clone()))
        }
    }

    /// JSX expression for the `style` attribute value, e.g.
    /// `{{ backgroundColor: "#fff", color: "#000", fontSize: "16px", fontWeight: "normal" }}`.
    pub fn style_expression(&self) -> Result<String, EditError> {
        if !self.font_size_px.is_finite() || self.font_size_px <= 0.0 {
            return Err(EditError::InvalidStyle(format!(
                "font size must be a positive number, got {}",
                self.font_size_px
            )));
        }

        Ok(format!(
            "{{{{ backgroundColor: \"{}\", color: \"{}\", fontSize: \"{}px\", fontWeight: \"{}\" }}}}",
            self.background_color,
            self.text_color,
            self.font_size_px,
            if self.bold { "bold" } else { "normal" },
        ))
    }
}

/// An edit waiting in the buffer for the next sync.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PendingEdit {
    Text(TextEdit),
    Style(StyleEdit),
}

impl PendingEdit {
    pub fn address(&self) -> &ElementAddress {
        match self {
            PendingEdit::Text(edit) => &edit.address,
            PendingEdit::Style(edit) => &edit.address,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            PendingEdit::Text(_) => "text",
            PendingEdit::Style(_) => "style",
        }
    }
}

impl From<TextEdit> for PendingEdit {
    fn from(edit: TextEdit) -> Self {
        PendingEdit::Text(edit)
    }
}

impl From<StyleEdit> for PendingEdit {
    fn from(edit: StyleEdit) -> Self {
        PendingEdit::Style(edit)
    }
}

/// Heading buttons offered by the style controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadingPreset {
    H1,
    H2,
    H3,
    H4,
}

impl HeadingPreset {
    pub const ALL: [HeadingPreset; 4] = [
        HeadingPreset::H1,
        HeadingPreset::H2,
        HeadingPreset::H3,
        HeadingPreset::H4,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            HeadingPreset::H1 => "h1",
            HeadingPreset::H2 => "h2",
            HeadingPreset::H3 => "h3",
            HeadingPreset::H4 => "h4",
        }
    }

    pub fn font_size_px(self) -> f64 {
        match self {
            HeadingPreset::H1 => 32.0,
            HeadingPreset::H2 => 24.0,
            HeadingPreset::H3 => 18.0,
            HeadingPreset::H4 => 16.0,
        }
    }
}
