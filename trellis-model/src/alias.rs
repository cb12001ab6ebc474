//! Alias instances that mirror a target while overriding a few capabilities.

use crate::content::{join_path, Content, ContentBehavior};
use crate::error::{ModelError, ModelResult};
use crate::export::{ExportedContent, TargetSummary};
use crate::field::Field;
use crate::schema::{ContentTypeId, Schema};
use crate::store::ContentStore;
use crate::style::{Layout, Style, StyleRegistry};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;
use trellis_types::ContentId;

/// Whether an alias still has a live target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AliasState {
    Bound,
    Orphaned,
}

/// An alias instance plus its target.
///
/// Lookups try the alias's own type first and reach the target only when
/// the own type has no answer. Alias-declared fields never delegate.
#[derive(Debug, Clone)]
pub struct AliasProxy {
    alias: Content,
    target: Option<Arc<Content>>,
}

impl AliasProxy {
    /// A new unsaved alias of type `alias_type` pointing at `target`.
    pub fn new(schema: Arc<Schema>, alias_type: ContentTypeId, target: Arc<Content>) -> ModelResult<Self> {
        Self::bind(Content::new(schema, alias_type), target)
    }

    /// Binds an existing alias instance to `target`.
    ///
    /// Fails with `InvalidAliasTarget` when the instance is not of an alias
    /// type or the target's type is not one the alias type accepts.
    pub fn bind(mut alias: Content, target: Arc<Content>) -> ModelResult<Self> {
        let schema = alias.schema_arc().clone();
        let alias_type = alias.content_type();
        if !schema.is_alias_type(alias_type) {
            return Err(ModelError::InvalidAliasTarget(format!(
                "'{}' is not an alias type",
                schema.name_of(alias_type)
            )));
        }
        if !schema.alias_target_types(alias_type).contains(&target.content_type()) {
            return Err(ModelError::InvalidAliasTarget(format!(
                "'{}' cannot alias '{}'",
                schema.name_of(alias_type),
                schema.name_of(target.content_type())
            )));
        }
        alias.target_id = Some(target.id());
        Ok(Self {
            alias,
            target: Some(target),
        })
    }

    /// An alias whose target is gone.
    pub fn orphaned(alias: Content) -> Self {
        Self {
            alias,
            target: None,
        }
    }

    pub fn state(&self) -> AliasState {
        match self.target {
            Some(_) => AliasState::Bound,
            None => AliasState::Orphaned,
        }
    }

    pub fn is_orphaned(&self) -> bool {
        self.target.is_none()
    }

    pub fn target(&self) -> ModelResult<&Arc<Content>> {
        self.target
            .as_ref()
            .ok_or(ModelError::OrphanedAlias(self.alias.id()))
    }

    /// The alias's own instance, without delegation.
    pub fn alias(&self) -> &Content {
        &self.alias
    }

    pub fn set_slug(&mut self, slug: impl Into<String>) {
        self.alias.set_slug(slug);
    }

    pub fn set_style(&mut self, style_id: Option<String>) {
        self.alias.set_style(style_id);
    }

    pub fn attach_to(&mut self, parent: &dyn ContentBehavior) -> ModelResult<()> {
        self.alias.attach_to(parent)
    }

    /// Sets one of the alias's own fields. Target fields are never written
    /// through an alias.
    pub fn set_field(&mut self, name: &str, value: impl Into<String>) -> ModelResult<()> {
        self.alias.set_field(name, value)
    }

    pub fn save(&mut self, store: &dyn ContentStore) -> ModelResult<()> {
        self.alias.save(store)
    }

    /// Loads an alias record and its target.
    ///
    /// A missing target yields an orphaned alias; a target that is itself
    /// an alias is rejected.
    pub fn load(schema: Arc<Schema>, store: &dyn ContentStore, id: ContentId) -> ModelResult<Self> {
        let alias = Content::load(schema.clone(), store, id)?;
        let Some(target_id) = alias.target_id() else {
            return Ok(Self::orphaned(alias));
        };
        let Some(record) = store.load(target_id)? else {
            debug!(id = %id, target = %target_id, "Alias target missing");
            return Ok(Self::orphaned(alias));
        };
        let target_type = schema.require_type(&record.content_type)?;
        if schema.is_alias_type(target_type) {
            return Err(ModelError::InvalidAliasTarget(format!(
                "target {target_id} is itself an alias"
            )));
        }
        let target = Content::from_record(schema, record)?;
        Self::bind(alias, Arc::new(target))
    }

    fn own_styles_declared(&self) -> bool {
        !self.schema().styles(self.content_type()).is_empty()
    }

    fn own_layouts_declared(&self) -> bool {
        !self.schema().layouts(self.content_type()).is_empty()
    }
}

impl ContentBehavior for AliasProxy {
    fn id(&self) -> ContentId {
        self.alias.id()
    }

    fn content_type(&self) -> ContentTypeId {
        self.alias.content_type()
    }

    fn schema(&self) -> &Schema {
        self.alias.schema()
    }

    fn is_alias(&self) -> bool {
        true
    }

    fn slug(&self) -> &str {
        self.alias.slug()
    }

    fn field(&self, name: &str) -> ModelResult<&Field> {
        if let Some(field) = self.alias.fields().get(name) {
            return Ok(field);
        }
        match &self.target {
            Some(target) => {
                debug!(id = %self.id(), field = name, "Delegating field to alias target");
                target.field(name)
            }
            None => Err(ModelError::not_found("field", name)),
        }
    }

    fn field_exists(&self, name: &str) -> bool {
        self.alias.field_exists(name)
            || self.target.as_ref().is_some_and(|t| t.field_exists(name))
    }

    fn path(&self) -> ModelResult<String> {
        let target = self.target()?;
        Ok(join_path(self.alias.parent_path(), target.slug()))
    }

    fn calculate_path(&self) -> String {
        String::new()
    }

    fn find_named_style(&self, name: &str) -> Option<Style> {
        self.alias
            .find_named_style(name)
            .or_else(|| self.target.as_ref()?.find_named_style(name))
    }

    fn resolve_style(&self, id: Option<&str>) -> Option<Style> {
        if self.own_styles_declared() {
            if let Some(style) = self.alias.resolve_style(id) {
                return Some(style);
            }
        }
        self.target.as_ref()?.resolve_style(id)
    }

    fn style(&self) -> ModelResult<Style> {
        let id = self.alias.style_id();
        if self.own_styles_declared() {
            if let Some(style) = self.alias.resolve_style(id) {
                return Ok(style);
            }
        }
        let target = self.target()?;
        debug!(id = %self.id(), "Resolving alias style through target");
        target
            .resolve_style(id)
            .ok_or_else(|| ModelError::not_found("style", id.unwrap_or("default")))
    }

    fn find_named_layout(&self, name: &str) -> Option<Layout> {
        self.alias
            .find_named_layout(name)
            .or_else(|| self.target.as_ref()?.find_named_layout(name))
    }

    fn resolve_layout(&self, id: Option<&str>) -> Option<Layout> {
        if self.own_layouts_declared() {
            if let Some(layout) = self.alias.resolve_layout(id) {
                return Some(layout);
            }
        }
        self.target.as_ref()?.resolve_layout(id)
    }

    fn layout(&self) -> ModelResult<Layout> {
        let id = self.alias.style_id();
        if self.own_layouts_declared() {
            if let Some(layout) = self.alias.resolve_layout(id) {
                return Ok(layout);
            }
        }
        let target = self.target()?;
        target
            .resolve_layout(id)
            .ok_or_else(|| ModelError::not_found("layout", id.unwrap_or("default")))
    }

    fn call(&self, behavior: &str, args: &[Value]) -> ModelResult<Value> {
        if let Some(f) = self.schema().behavior(self.content_type(), behavior) {
            let this: &dyn ContentBehavior = self;
            return (**f)(this, args);
        }
        match &self.target {
            Some(target) => target.call(behavior, args),
            None => Err(ModelError::not_found("behavior", behavior)),
        }
    }

    fn alias_icon_field(&self) -> Option<&Field> {
        self.alias
            .alias_icon_field()
            .or_else(|| self.target.as_ref()?.alias_icon_field())
    }

    fn to_shallow_record(&self) -> ModelResult<ExportedContent> {
        Ok(ExportedContent {
            id: self.id(),
            content_type: self.schema().name_of(self.content_type()).to_string(),
            is_alias: true,
            slug: self.slug().to_string(),
            path: self.path()?,
            style: self.resolve_style(self.alias.style_id()).map(|s| s.id),
            fields: self.alias.fields().export(),
            target: None,
        })
    }

    fn export(&self) -> ModelResult<ExportedContent> {
        let target = self.target()?;
        let mut record = self.to_shallow_record()?;
        record.target = Some(Box::new(TargetSummary {
            record: target.to_shallow_record()?,
            alias_title: target.alias_title(),
            alias_icon: target.alias_icon_field().map(Field::export),
        }));
        Ok(record)
    }
}

/// Instances that aliases of `alias_type` may point at.
pub fn alias_targets(
    schema: &Arc<Schema>,
    store: &dyn ContentStore,
    alias_type: ContentTypeId,
) -> ModelResult<Vec<Content>> {
    let types = schema.alias_target_types(alias_type);
    let names: Vec<&str> = types.iter().map(|t| schema.name_of(*t)).collect();
    store
        .list_by_type(&names)?
        .into_iter()
        .map(|record| Content::from_record(schema.clone(), record))
        .collect()
}
