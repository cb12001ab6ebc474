//! Styles and layouts: named render templates attached to types.
//!
//! A type with no styles of its own uses its supertype's; the same holds
//! for layouts.

use crate::schema::{ContentTypeId, Schema};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Style {
    /// Stable identifier stored on instances.
    pub id: String,
    pub name: String,
}

impl Style {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// A style whose id is its name.
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: name.clone(),
            name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Layout {
    pub id: String,
    pub name: String,
}

impl Layout {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: name.clone(),
            name,
        }
    }
}

/// Style and layout lookups consumed by membership rules and instances.
pub trait StyleRegistry {
    fn styles(&self, ty: ContentTypeId) -> Vec<Style>;

    fn layouts(&self, ty: ContentTypeId) -> Vec<Layout>;

    fn find_named_style(&self, ty: ContentTypeId, name: &str) -> Option<Style> {
        self.styles(ty).into_iter().find(|s| s.name == name)
    }

    fn find_named_layout(&self, ty: ContentTypeId, name: &str) -> Option<Layout> {
        self.layouts(ty).into_iter().find(|l| l.name == name)
    }

    /// The style with `id`, or the type's first style when `id` is `None`.
    fn resolve_style(&self, ty: ContentTypeId, id: Option<&str>) -> Option<Style> {
        let styles = self.styles(ty);
        match id {
            Some(id) => styles.into_iter().find(|s| s.id == id),
            None => styles.into_iter().next(),
        }
    }

    fn resolve_layout(&self, ty: ContentTypeId, id: Option<&str>) -> Option<Layout> {
        let layouts = self.layouts(ty);
        match id {
            Some(id) => layouts.into_iter().find(|l| l.id == id),
            None => layouts.into_iter().next(),
        }
    }
}

impl Schema {
    pub fn add_style(&mut self, ty: ContentTypeId, style: Style) {
        self.ty_mut(ty).styles.push(style);
    }

    pub fn add_layout(&mut self, ty: ContentTypeId, layout: Layout) {
        self.ty_mut(ty).layouts.push(layout);
    }
}

impl StyleRegistry for Schema {
    fn styles(&self, ty: ContentTypeId) -> Vec<Style> {
        self.ancestors(ty)
            .find(|t| !t.styles.is_empty())
            .map(|t| t.styles.clone())
            .unwrap_or_default()
    }

    fn layouts(&self, ty: ContentTypeId) -> Vec<Layout> {
        self.ancestors(ty)
            .find(|t| !t.layouts.is_empty())
            .map(|t| t.layouts.clone())
            .unwrap_or_default()
    }
}
