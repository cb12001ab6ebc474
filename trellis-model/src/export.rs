//! Records produced for editing and rendering tools.

use serde::{Deserialize, Serialize};
use trellis_types::ContentId;

/// One field as seen by an editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedField {
    pub name: String,
    /// Field kind tag (`string`, `image`, …).
    pub kind: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub processed_value: String,
    pub raw_value: String,
    /// Editor class, e.g. `Trellis.FieldTypes.StringField`.
    #[serde(rename = "type")]
    pub editor_type: String,
    pub version: u64,
}

/// One content instance as seen by an editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedContent {
    pub id: ContentId,
    #[serde(rename = "type")]
    pub content_type: String,
    pub is_alias: bool,
    pub slug: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    pub fields: Vec<ExportedField>,
    /// Present on aliases with a live target.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<Box<TargetSummary>>,
}

/// What an alias record carries about its target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetSummary {
    pub record: ExportedContent,
    pub alias_title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias_icon: Option<ExportedField>,
}
