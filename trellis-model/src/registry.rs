//! Field prototype registry: declaring fields on types and resolving them
//! through the supertype chain.
//!
//! Field order for a type is its explicit order (if declared) followed by
//! the default order: supertype fields first, then the type's own in
//! declaration order, each name once.

use crate::error::{ModelError, ModelResult};
use crate::kind::FieldKind;
use crate::prototype::{FieldOptions, FieldPrototype};
use crate::schema::{ContentTypeId, Schema};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Capability names every instance answers; fields may not shadow them.
const BUILTIN_BEHAVIORS: &[&str] = &[
    "id",
    "content_type",
    "schema",
    "is_alias",
    "slug",
    "parent",
    "field",
    "fields",
    "field_exists",
    "path",
    "calculate_path",
    "style",
    "styles",
    "find_named_style",
    "resolve_style",
    "layout",
    "layouts",
    "find_named_layout",
    "resolve_layout",
    "target",
    "aliases",
    "alias_title",
    "alias_icon_field",
    "call",
    "export",
    "to_shallow_record",
    "save",
    "destroy",
];

pub(crate) fn is_builtin_behavior(name: &str) -> bool {
    BUILTIN_BEHAVIORS.contains(&name)
}

impl Schema {
    /// Declares (or redeclares) a field on `ty`.
    ///
    /// Without an explicit kind the kind is inferred from the name.
    /// Redeclaring replaces the prototype but keeps the field's position.
    /// A name colliding with a behavior is a `NameConflict`.
    pub fn declare_field(
        &mut self,
        ty: ContentTypeId,
        name: &str,
        kind: Option<FieldKind>,
        options: FieldOptions,
    ) -> ModelResult<()> {
        if is_builtin_behavior(name) || self.behavior(ty, name).is_some() {
            warn!(type_name = %self.name_of(ty), field = name, "Field name clashes with a behavior");
            return Err(ModelError::NameConflict {
                type_name: self.name_of(ty).to_string(),
                name: name.to_string(),
            });
        }

        let prototype = Arc::new(FieldPrototype::new(name, kind, options, self.config()));
        let kind = prototype.kind();
        let content_type = self.ty_mut(ty);
        if !content_type.local_order.iter().any(|n| n == name) {
            content_type.local_order.push(name.to_string());
        }
        let replaced = content_type
            .prototypes
            .insert(name.to_string(), prototype)
            .is_some();
        debug!(type_name = %content_type.name(), field = name, %kind, replaced, "Declared field");
        Ok(())
    }

    /// Declares a field with an inferred kind and no options.
    pub fn field(&mut self, ty: ContentTypeId, name: &str) -> ModelResult<()> {
        self.declare_field(ty, name, None, FieldOptions::new())
    }

    /// Puts `names` first in `ty`'s field order; the rest follow in
    /// default order.
    pub fn field_order(&mut self, ty: ContentTypeId, names: &[&str]) -> ModelResult<()> {
        if let Some(missing) = names.iter().find(|n| !self.field_exists(ty, n)) {
            return Err(ModelError::not_found("field", *missing));
        }
        self.ty_mut(ty).field_order = names.iter().map(|n| n.to_string()).collect();
        Ok(())
    }

    pub fn field_names(&self, ty: ContentTypeId) -> Vec<String> {
        let default = self.default_field_order(ty);
        let explicit = &self.ty(ty).field_order;
        if explicit.is_empty() {
            return default;
        }
        let mut names = explicit.clone();
        names.extend(default.into_iter().filter(|n| !explicit.contains(n)));
        names
    }

    fn default_field_order(&self, ty: ContentTypeId) -> Vec<String> {
        let content_type = self.ty(ty);
        let mut names = content_type
            .supertype()
            .map(|s| self.field_names(s))
            .unwrap_or_default();
        for name in &content_type.local_order {
            if !names.contains(name) {
                names.push(name.clone());
            }
        }
        names
    }

    /// Supertype prototypes overridden by the type's own declarations.
    pub fn field_prototypes(&self, ty: ContentTypeId) -> HashMap<String, Arc<FieldPrototype>> {
        let content_type = self.ty(ty);
        let mut prototypes = content_type
            .supertype()
            .map(|s| self.field_prototypes(s))
            .unwrap_or_default();
        for (name, prototype) in &content_type.prototypes {
            prototypes.insert(name.clone(), Arc::clone(prototype));
        }
        prototypes
    }

    pub fn field_prototype(&self, ty: ContentTypeId, name: &str) -> ModelResult<Arc<FieldPrototype>> {
        self.ancestors(ty)
            .find_map(|t| t.prototypes.get(name))
            .cloned()
            .ok_or_else(|| ModelError::not_found("field", name))
    }

    /// Prototypes in field order.
    pub fn ordered_prototypes(&self, ty: ContentTypeId) -> Vec<Arc<FieldPrototype>> {
        let prototypes = self.field_prototypes(ty);
        self.field_names(ty)
            .iter()
            .filter_map(|name| prototypes.get(name).cloned())
            .collect()
    }

    pub fn field_exists(&self, ty: ContentTypeId, name: &str) -> bool {
        self.ancestors(ty).any(|t| t.prototypes.contains_key(name))
    }
}
