//! Field kinds and their default value transforms.

use crate::error::ModelError;
use crate::options::RenderOptions;
use crate::prototype::FieldPrototype;
use crate::{date, markdown, webvideo};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Output format used when none is given.
pub const DEFAULT_FORMAT: &str = "html";
pub const HTML: &str = "html";
pub const PLAIN: &str = "plain";
pub const JSON: &str = "json";

/// The kind of a field: decides its default transform and editor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    #[default]
    String,
    Image,
    Date,
    Markdown,
    WebVideo,
}

/// Conventional field names and the kind they imply.
const NAME_KINDS: &[(&str, FieldKind)] = &[
    ("image", FieldKind::Image),
    ("photo", FieldKind::Image),
    ("thumbnail", FieldKind::Image),
    ("date", FieldKind::Date),
    ("markdown", FieldKind::Markdown),
    ("webvideo", FieldKind::WebVideo),
    ("video", FieldKind::WebVideo),
];

impl FieldKind {
    /// Infers a kind from a field name; exact matches only.
    pub fn infer(field_name: &str) -> Self {
        NAME_KINDS
            .iter()
            .find(|(name, _)| *name == field_name)
            .map(|(_, kind)| *kind)
            .unwrap_or_default()
    }

    /// Short tag used in exported records.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Image => "image",
            Self::Date => "date",
            Self::Markdown => "markdown",
            Self::WebVideo => "webvideo",
        }
    }

    /// Editor class name; exported with the configured namespace.
    pub fn editor_class(&self) -> &'static str {
        match self {
            Self::String => "StringField",
            Self::Image => "ImageField",
            Self::Date => "DateField",
            Self::Markdown => "MarkdownField",
            Self::WebVideo => "WebVideoField",
        }
    }

    /// Value a field holds before anything is set.
    pub fn default_value(&self) -> &'static str {
        ""
    }

    /// Options used when producing the exported (editor preview) value.
    pub(crate) fn export_options(&self) -> RenderOptions {
        let mut options = RenderOptions::new();
        if *self == Self::WebVideo {
            options.insert("width".into(), 480.into());
            options.insert("height".into(), 270.into());
        }
        options
    }

    /// The kind's own transform of `raw` into `format`.
    pub(crate) fn generate(
        &self,
        format: &str,
        raw: &str,
        prototype: &FieldPrototype,
        options: &RenderOptions,
    ) -> String {
        match self {
            Self::String | Self::Image => escape_for(format, raw),
            Self::Date => date::generate(format, raw, prototype, options),
            Self::Markdown => match format {
                HTML | PLAIN => markdown::to_html(raw),
                _ => raw.to_string(),
            },
            Self::WebVideo => webvideo::generate(format, raw, prototype, options),
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for FieldKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(Self::String),
            "image" | "photo" => Ok(Self::Image),
            "date" => Ok(Self::Date),
            "markdown" | "text" => Ok(Self::Markdown),
            "webvideo" => Ok(Self::WebVideo),
            other => Err(ModelError::UnknownFieldKind(other.to_string())),
        }
    }
}

/// Escapes ampersands for HTML output; other formats pass through.
pub(crate) fn escape_for(format: &str, raw: &str) -> String {
    if format == HTML {
        escape_ampersands(raw)
    } else {
        raw.to_string()
    }
}

pub(crate) fn escape_ampersands(raw: &str) -> String {
    raw.replace('&', "&amp;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infer_matches_exact_names_only() {
        assert_eq!(FieldKind::infer("image"), FieldKind::Image);
        assert_eq!(FieldKind::infer("thumbnail"), FieldKind::Image);
        assert_eq!(FieldKind::infer("date"), FieldKind::Date);
        assert_eq!(FieldKind::infer("chunky"), FieldKind::String);
        assert_eq!(FieldKind::infer("image_caption"), FieldKind::String);
    }

    #[test]
    fn text_is_markdown() {
        assert_eq!("text".parse::<FieldKind>().unwrap(), FieldKind::Markdown);
        assert!("banana".parse::<FieldKind>().is_err());
    }
}
