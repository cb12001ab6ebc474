//! Instance-level field values.
//!
//! A [`Field`] holds the raw (unprocessed) input last set on it, a version
//! counter and a per-format render cache. The cache is keyed by
//! `(format, options)` and cleared on every `set_value`; `set_value` takes
//! `&mut self`, so no reader can hold a cache entry across a write.

use crate::export::ExportedField;
use crate::kind::{DEFAULT_FORMAT, FieldKind};
use crate::options::{RenderOptions, options_key};
use crate::prototype::FieldPrototype;
use crate::store::StoredField;
use crate::webvideo::VideoSource;
use std::collections::HashMap;
use std::fmt;
use std::ops::BitOr;
use std::sync::{Arc, Mutex, PoisonError};
use trellis_types::ContentId;

type RenderCache = HashMap<(String, String), String>;

pub struct Field {
    prototype: Arc<FieldPrototype>,
    owner: ContentId,
    raw: String,
    version: u64,
    /// Last persisted raw value; the prototype default if never persisted.
    persisted: String,
    cache: Mutex<RenderCache>,
}

impl Field {
    /// A fresh field holding the prototype's default at version 0.
    pub(crate) fn new(prototype: Arc<FieldPrototype>, owner: ContentId) -> Self {
        let default = prototype.default_value().to_string();
        Self {
            prototype,
            owner,
            raw: default.clone(),
            version: 0,
            persisted: default,
            cache: Mutex::new(RenderCache::new()),
        }
    }

    /// A field restored from the persisted store. Stored values are raw and
    /// are never re-processed on load.
    pub(crate) fn from_stored(
        prototype: Arc<FieldPrototype>,
        owner: ContentId,
        stored: &StoredField,
    ) -> Self {
        Self {
            prototype,
            owner,
            raw: stored.value.clone(),
            version: stored.version,
            persisted: stored.value.clone(),
            cache: Mutex::new(RenderCache::new()),
        }
    }

    pub fn name(&self) -> &str {
        self.prototype.name()
    }

    pub fn prototype(&self) -> &Arc<FieldPrototype> {
        &self.prototype
    }

    /// The content instance this field belongs to.
    pub fn owner(&self) -> ContentId {
        self.owner
    }

    pub fn kind(&self) -> FieldKind {
        self.prototype.kind()
    }

    pub fn is_image(&self) -> bool {
        self.kind() == FieldKind::Image
    }

    pub fn unprocessed_value(&self) -> &str {
        &self.raw
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// True when the raw value differs from the last persisted one.
    pub fn is_modified(&self) -> bool {
        self.raw != self.persisted
    }

    /// Stores `value` as the raw value and drops every cached rendering.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.raw = value.into();
        self.cache
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Renders the raw value into `format`.
    pub fn render(&self, format: &str, options: &RenderOptions) -> String {
        let key = (format.to_string(), options_key(options));
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(hit) = cache.get(&key) {
            return hit.clone();
        }
        let output = self.prototype.generate(format, &self.raw, options);
        cache.insert(key, output.clone());
        output
    }

    /// Processed value in the default format.
    pub fn value(&self) -> String {
        self.value_as(DEFAULT_FORMAT)
    }

    pub fn value_as(&self, format: &str) -> String {
        self.render(format, &RenderOptions::new())
    }

    pub fn to_display_string(&self, format: Option<&str>) -> String {
        self.value_as(format.unwrap_or(DEFAULT_FORMAT))
    }

    /// The first of `self` and `other` whose raw value is non-empty.
    pub fn or<'a>(&'a self, other: &'a Field) -> &'a Field {
        if self.is_empty() { other } else { self }
    }

    /// Parsed video for web video fields; `None` for other kinds.
    pub fn video(&self) -> Option<VideoSource> {
        match self.kind() {
            FieldKind::WebVideo => VideoSource::parse(&self.raw),
            _ => None,
        }
    }

    /// Record for editing tools.
    pub fn export(&self) -> ExportedField {
        let prototype = &self.prototype;
        ExportedField {
            name: prototype.name().to_string(),
            kind: prototype.kind().tag().to_string(),
            title: prototype.title().to_string(),
            comment: prototype.comment().map(str::to_string),
            processed_value: self.render(DEFAULT_FORMAT, &prototype.kind().export_options()),
            raw_value: self.raw.clone(),
            editor_type: prototype.editor_type().to_string(),
            version: self.version,
        }
    }

    /// The state this field would persist as: the version moves only when
    /// the raw value differs from what was last persisted.
    pub(crate) fn staged(&self) -> StoredField {
        let version = if self.is_modified() {
            self.version + 1
        } else {
            self.version
        };
        StoredField {
            value: self.raw.clone(),
            version,
        }
    }

    pub(crate) fn commit(&mut self, stored: &StoredField) {
        self.persisted = stored.value.clone();
        self.version = stored.version;
    }
}

impl Clone for Field {
    fn clone(&self) -> Self {
        Self {
            prototype: Arc::clone(&self.prototype),
            owner: self.owner,
            raw: self.raw.clone(),
            version: self.version,
            persisted: self.persisted.clone(),
            cache: Mutex::new(RenderCache::new()),
        }
    }
}

impl PartialEq for Field {
    fn eq(&self, other: &Self) -> bool {
        self.owner == other.owner && self.name() == other.name() && self.raw == other.raw
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name())
            .field("kind", &self.kind())
            .field("owner", &self.owner)
            .field("raw", &self.raw)
            .field("version", &self.version)
            .finish()
    }
}

impl<'a> BitOr<&'a Field> for &'a Field {
    type Output = &'a Field;

    fn bitor(self, rhs: &'a Field) -> &'a Field {
        self.or(rhs)
    }
}
