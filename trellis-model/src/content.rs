//! Content instances and the capability interface they share with aliases.

use crate::error::{ModelError, ModelResult};
use crate::export::ExportedContent;
use crate::field::Field;
use crate::field_set::FieldSet;
use crate::kind::PLAIN;
use crate::schema::{ContentTypeId, Schema};
use crate::store::{ContentRecord, ContentStore};
use crate::style::{Layout, Style, StyleRegistry};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};
use trellis_types::ContentId;

/// The fixed set of capabilities every instance answers.
///
/// Implemented by plain [`Content`] and by [`AliasProxy`](crate::AliasProxy),
/// whose implementation encodes, per capability, when to answer locally and
/// when to ask the target.
pub trait ContentBehavior {
    fn id(&self) -> ContentId;

    fn content_type(&self) -> ContentTypeId;

    fn schema(&self) -> &Schema;

    fn is_alias(&self) -> bool;

    fn slug(&self) -> &str;

    fn field(&self, name: &str) -> ModelResult<&Field>;

    fn field_exists(&self, name: &str) -> bool;

    /// Full path of the instance.
    fn path(&self) -> ModelResult<String>;

    /// Segment this instance contributes to its children's paths.
    fn calculate_path(&self) -> String;

    fn find_named_style(&self, name: &str) -> Option<Style>;

    fn resolve_style(&self, id: Option<&str>) -> Option<Style>;

    /// The instance's effective style.
    fn style(&self) -> ModelResult<Style>;

    fn find_named_layout(&self, name: &str) -> Option<Layout>;

    fn resolve_layout(&self, id: Option<&str>) -> Option<Layout>;

    fn layout(&self) -> ModelResult<Layout>;

    /// Invokes a named behavior declared on the schema.
    fn call(&self, behavior: &str, args: &[Value]) -> ModelResult<Value>;

    /// First image field, shown as the icon of aliases pointing here.
    fn alias_icon_field(&self) -> Option<&Field>;

    /// Record without any alias target summary.
    fn to_shallow_record(&self) -> ModelResult<ExportedContent>;

    fn export(&self) -> ModelResult<ExportedContent>;

    /// The `title` field as text, shown on aliases pointing here.
    fn alias_title(&self) -> String {
        self.field("title")
            .map(|title| title.value_as(PLAIN))
            .unwrap_or_default()
    }
}

/// Joins a parent path and a segment. No parent means the root.
pub(crate) fn join_path(parent: Option<&str>, segment: &str) -> String {
    match parent {
        None if segment.is_empty() => "/".to_string(),
        None => format!("/{segment}"),
        Some(parent) if segment.is_empty() => parent.to_string(),
        Some(parent) => format!("{}/{segment}", parent.trim_end_matches('/')),
    }
}

/// A page or piece instance.
#[derive(Debug, Clone)]
pub struct Content {
    schema: Arc<Schema>,
    id: ContentId,
    type_id: ContentTypeId,
    slug: String,
    parent_path: Option<String>,
    style_id: Option<String>,
    pub(crate) target_id: Option<ContentId>,
    fields: FieldSet,
    version: u64,
}

impl Content {
    /// A new unsaved instance with default field values.
    pub fn new(schema: Arc<Schema>, type_id: ContentTypeId) -> Self {
        let id = ContentId::new();
        let fields = FieldSet::build(id, schema.ordered_prototypes(type_id), &Default::default());
        Self {
            schema,
            id,
            type_id,
            slug: String::new(),
            parent_path: None,
            style_id: None,
            target_id: None,
            fields,
            version: 0,
        }
    }

    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = slug.into();
        self
    }

    pub fn set_slug(&mut self, slug: impl Into<String>) {
        self.slug = slug.into();
    }

    pub fn style_id(&self) -> Option<&str> {
        self.style_id.as_deref()
    }

    pub fn set_style(&mut self, style_id: Option<String>) {
        self.style_id = style_id;
    }

    pub fn parent_path(&self) -> Option<&str> {
        self.parent_path.as_deref()
    }

    /// Places this instance under `parent`.
    pub fn attach_to(&mut self, parent: &dyn ContentBehavior) -> ModelResult<()> {
        self.parent_path = Some(parent.path()?);
        Ok(())
    }

    pub fn target_id(&self) -> Option<ContentId> {
        self.target_id
    }

    pub fn fields(&self) -> &FieldSet {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut FieldSet {
        &mut self.fields
    }

    pub fn set_field(&mut self, name: &str, value: impl Into<String>) -> ModelResult<()> {
        self.fields.set(name, value)
    }

    /// Record version; 0 until first saved.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn is_dirty(&self) -> bool {
        self.fields.is_dirty()
    }

    pub fn schema_arc(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// The record this instance would persist as.
    pub fn to_record(&self) -> ContentRecord {
        ContentRecord {
            id: self.id,
            content_type: self.schema.name_of(self.type_id).to_string(),
            slug: self.slug.clone(),
            parent_path: self.parent_path.clone(),
            target: self.target_id,
            style: self.style_id.clone(),
            fields: self.fields.serialize(),
            version: self.version,
        }
    }

    /// Persists the instance.
    ///
    /// Field versions move only for fields whose raw value changed since
    /// the last save. On `Conflict` nothing local changes.
    pub fn save(&mut self, store: &dyn ContentStore) -> ModelResult<()> {
        let record = self.to_record();
        let staged = record.fields.clone();
        let version = store.save(record, self.version)?;
        self.fields.commit(&staged);
        self.version = version;
        debug!(id = %self.id, version, "Saved content");
        Ok(())
    }

    pub fn load(schema: Arc<Schema>, store: &dyn ContentStore, id: ContentId) -> ModelResult<Self> {
        let record = store
            .load(id)?
            .ok_or_else(|| ModelError::not_found("content", id.to_string()))?;
        Self::from_record(schema, record)
    }

    pub(crate) fn from_record(schema: Arc<Schema>, record: ContentRecord) -> ModelResult<Self> {
        let type_id = schema.require_type(&record.content_type)?;
        let fields = FieldSet::build(record.id, schema.ordered_prototypes(type_id), &record.fields);
        Ok(Self {
            schema,
            id: record.id,
            type_id,
            slug: record.slug,
            parent_path: record.parent_path,
            style_id: record.style,
            target_id: record.target,
            fields,
            version: record.version,
        })
    }

    /// Ids of stored aliases targeting this instance.
    pub fn aliases(&self, store: &dyn ContentStore) -> ModelResult<Vec<ContentId>> {
        store.aliases_of(self.id)
    }

    /// Deletes this instance and every alias targeting it.
    pub fn destroy(self, store: &dyn ContentStore) -> ModelResult<Vec<ContentId>> {
        let removed = store.delete_cascade(self.id)?;
        info!(id = %self.id, removed = removed.len(), "Destroyed content");
        Ok(removed)
    }
}

impl ContentBehavior for Content {
    fn id(&self) -> ContentId {
        self.id
    }

    fn content_type(&self) -> ContentTypeId {
        self.type_id
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn is_alias(&self) -> bool {
        false
    }

    fn slug(&self) -> &str {
        &self.slug
    }

    fn field(&self, name: &str) -> ModelResult<&Field> {
        self.fields
            .get(name)
            .ok_or_else(|| ModelError::not_found("field", name))
    }

    fn field_exists(&self, name: &str) -> bool {
        self.schema.field_exists(self.type_id, name)
    }

    fn path(&self) -> ModelResult<String> {
        Ok(join_path(self.parent_path.as_deref(), &self.calculate_path()))
    }

    fn calculate_path(&self) -> String {
        self.slug.clone()
    }

    fn find_named_style(&self, name: &str) -> Option<Style> {
        self.schema.find_named_style(self.type_id, name)
    }

    fn resolve_style(&self, id: Option<&str>) -> Option<Style> {
        self.schema.resolve_style(self.type_id, id)
    }

    fn style(&self) -> ModelResult<Style> {
        self.resolve_style(self.style_id())
            .ok_or_else(|| ModelError::not_found("style", self.style_id().unwrap_or("default")))
    }

    fn find_named_layout(&self, name: &str) -> Option<Layout> {
        self.schema.find_named_layout(self.type_id, name)
    }

    fn resolve_layout(&self, id: Option<&str>) -> Option<Layout> {
        self.schema.resolve_layout(self.type_id, id)
    }

    fn layout(&self) -> ModelResult<Layout> {
        self.resolve_layout(self.style_id())
            .ok_or_else(|| ModelError::not_found("layout", self.style_id().unwrap_or("default")))
    }

    fn call(&self, behavior: &str, args: &[Value]) -> ModelResult<Value> {
        let f = self
            .schema
            .behavior(self.type_id, behavior)
            .ok_or_else(|| ModelError::not_found("behavior", behavior))?;
        let this: &dyn ContentBehavior = self;
        (**f)(this, args)
    }

    fn alias_icon_field(&self) -> Option<&Field> {
        self.fields.first_image()
    }

    fn to_shallow_record(&self) -> ModelResult<ExportedContent> {
        Ok(ExportedContent {
            id: self.id,
            content_type: self.schema.name_of(self.type_id).to_string(),
            is_alias: false,
            slug: self.slug.clone(),
            path: self.path()?,
            style: self.resolve_style(self.style_id()).map(|s| s.id),
            fields: self.fields.export(),
            target: None,
        })
    }

    fn export(&self) -> ModelResult<ExportedContent> {
        self.to_shallow_record()
    }
}
