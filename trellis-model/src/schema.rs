//! Content types and the schema that owns them.
//!
//! A [`Schema`] is built once at load time: types are defined with an
//! explicit supertype pointer, then fields, rules, styles and behaviors are
//! declared on them. Declaration needs `&mut Schema`; once shared behind an
//! `Arc` the schema is read-only.

use crate::allowed::MembershipRule;
use crate::config::EngineConfig;
use crate::content::ContentBehavior;
use crate::error::{ModelError, ModelResult};
use crate::prototype::FieldPrototype;
use crate::registry::is_builtin_behavior;
use crate::style::{Layout, Style};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Index of a content type within its schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentTypeId(usize);

/// A named behavior callable on instances of a type.
pub type Behavior =
    Arc<dyn Fn(&dyn ContentBehavior, &[Value]) -> ModelResult<Value> + Send + Sync>;

/// Type and group lookups consumed by membership rules.
pub trait TypeRegistry {
    fn type_name(&self, ty: ContentTypeId) -> String;

    /// Types belonging to a named group, in declaration order.
    fn resolve_group_members(&self, group: &str) -> Vec<ContentTypeId>;

    /// Every type below `ty` in the hierarchy, excluding `ty` itself.
    fn subclasses_of(&self, ty: ContentTypeId) -> Vec<ContentTypeId>;
}

/// A node in the single-rooted type hierarchy.
pub struct ContentType {
    id: ContentTypeId,
    name: String,
    supertype: Option<ContentTypeId>,
    page: bool,
    pub(crate) prototypes: HashMap<String, Arc<FieldPrototype>>,
    pub(crate) local_order: Vec<String>,
    pub(crate) field_order: Vec<String>,
    pub(crate) rules: Vec<MembershipRule>,
    pub(crate) styles: Vec<Style>,
    pub(crate) layouts: Vec<Layout>,
    pub(crate) behaviors: HashMap<String, Behavior>,
    pub(crate) alias_targets: Option<Vec<ContentTypeId>>,
}

impl ContentType {
    pub fn id(&self) -> ContentTypeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn supertype(&self) -> Option<ContentTypeId> {
        self.supertype
    }

    pub fn is_page(&self) -> bool {
        self.page
    }

    /// True for types declared with [`Schema::alias_of`].
    pub fn is_alias(&self) -> bool {
        self.alias_targets.is_some()
    }

    /// Fields declared on this type itself, in declaration order.
    pub fn own_field_names(&self) -> &[String] {
        &self.local_order
    }

    /// Membership rules declared on this type itself.
    pub fn own_rules(&self) -> &[MembershipRule] {
        &self.rules
    }

    pub fn own_styles(&self) -> &[Style] {
        &self.styles
    }

    pub fn own_layouts(&self) -> &[Layout] {
        &self.layouts
    }
}

impl fmt::Debug for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut behaviors: Vec<&String> = self.behaviors.keys().collect();
        behaviors.sort();
        f.debug_struct("ContentType")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("supertype", &self.supertype)
            .field("page", &self.page)
            .field("fields", &self.local_order)
            .field("rules", &self.rules.len())
            .field("styles", &self.styles)
            .field("layouts", &self.layouts)
            .field("behaviors", &behaviors)
            .field("alias_targets", &self.alias_targets)
            .finish()
    }
}

#[derive(Debug, Default)]
pub struct Schema {
    config: EngineConfig,
    types: Vec<ContentType>,
    by_name: HashMap<String, ContentTypeId>,
    groups: BTreeMap<String, Vec<ContentTypeId>>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // ================================================================
    // Type hierarchy
    // ================================================================

    /// Defines a piece type. Page-ness is inherited from the supertype.
    pub fn define_type(
        &mut self,
        name: &str,
        supertype: Option<ContentTypeId>,
    ) -> ModelResult<ContentTypeId> {
        let page = match supertype {
            Some(s) => self.checked(s)?.page,
            None => false,
        };
        self.insert_type(name, supertype, page)
    }

    pub fn define_page_type(
        &mut self,
        name: &str,
        supertype: Option<ContentTypeId>,
    ) -> ModelResult<ContentTypeId> {
        self.insert_type(name, supertype, true)
    }

    fn insert_type(
        &mut self,
        name: &str,
        supertype: Option<ContentTypeId>,
        page: bool,
    ) -> ModelResult<ContentTypeId> {
        if self.by_name.contains_key(name) {
            return Err(ModelError::DuplicateType(name.to_string()));
        }
        if let Some(s) = supertype {
            self.checked(s)?;
        }
        let id = ContentTypeId(self.types.len());
        self.types.push(ContentType {
            id,
            name: name.to_string(),
            supertype,
            page,
            prototypes: HashMap::new(),
            local_order: Vec::new(),
            field_order: Vec::new(),
            rules: Vec::new(),
            styles: Vec::new(),
            layouts: Vec::new(),
            behaviors: HashMap::new(),
            alias_targets: None,
        });
        self.by_name.insert(name.to_string(), id);
        debug!(type_name = name, page, "Defined content type");
        Ok(id)
    }

    pub fn get(&self, ty: ContentTypeId) -> Option<&ContentType> {
        self.types.get(ty.0)
    }

    /// Like [`Schema::get`], failing with `NotFound` for ids this schema
    /// never issued.
    pub fn checked(&self, ty: ContentTypeId) -> ModelResult<&ContentType> {
        self.get(ty)
            .ok_or_else(|| ModelError::not_found("content type", format!("#{}", ty.0)))
    }

    /// Type lookup for ids issued by this schema.
    pub(crate) fn ty(&self, ty: ContentTypeId) -> &ContentType {
        &self.types[ty.0]
    }

    pub(crate) fn ty_mut(&mut self, ty: ContentTypeId) -> &mut ContentType {
        &mut self.types[ty.0]
    }

    pub fn find_type(&self, name: &str) -> Option<ContentTypeId> {
        self.by_name.get(name).copied()
    }

    /// Looks up a type by name, failing with `NotFound`.
    pub fn require_type(&self, name: &str) -> ModelResult<ContentTypeId> {
        self.find_type(name)
            .ok_or_else(|| ModelError::not_found("content type", name))
    }

    pub fn name_of(&self, ty: ContentTypeId) -> &str {
        &self.ty(ty).name
    }

    pub fn types(&self) -> impl Iterator<Item = &ContentType> {
        self.types.iter()
    }

    /// `ty` followed by each supertype up to the root.
    pub fn ancestors(&self, ty: ContentTypeId) -> impl Iterator<Item = &ContentType> + '_ {
        std::iter::successors(Some(self.ty(ty)), |t| t.supertype.map(|s| self.ty(s)))
    }

    pub fn is_subtype_of(&self, ty: ContentTypeId, ancestor: ContentTypeId) -> bool {
        self.ancestors(ty).any(|t| t.id == ancestor)
    }

    fn descendants(&self, ty: ContentTypeId) -> Vec<ContentTypeId> {
        self.types
            .iter()
            .filter(|t| t.id != ty && self.is_subtype_of(t.id, ty))
            .map(|t| t.id)
            .collect()
    }

    // ================================================================
    // Groups
    // ================================================================

    pub fn add_to_group(&mut self, group: &str, ty: ContentTypeId) {
        let members = self.groups.entry(group.to_string()).or_default();
        if !members.contains(&ty) {
            members.push(ty);
        }
    }

    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    // ================================================================
    // Aliases
    // ================================================================

    /// Marks `ty` as an alias type whose instances may target instances
    /// of `targets` or their subtypes.
    pub fn alias_of(&mut self, ty: ContentTypeId, targets: &[ContentTypeId]) -> ModelResult<()> {
        if let Some(target) = targets.iter().find(|t| self.ty(**t).is_alias()) {
            return Err(ModelError::InvalidAliasTarget(format!(
                "'{}' is itself an alias type",
                self.name_of(*target)
            )));
        }
        debug!(type_name = %self.name_of(ty), targets = targets.len(), "Declared alias type");
        self.ty_mut(ty).alias_targets = Some(targets.to_vec());
        Ok(())
    }

    pub fn is_alias_type(&self, ty: ContentTypeId) -> bool {
        self.ty(ty).is_alias()
    }

    /// Every type an instance of alias type `ty` may target.
    pub fn alias_target_types(&self, ty: ContentTypeId) -> Vec<ContentTypeId> {
        let mut types = Vec::new();
        for target in self.ty(ty).alias_targets.iter().flatten() {
            for candidate in std::iter::once(*target).chain(self.descendants(*target)) {
                if !types.contains(&candidate) {
                    types.push(candidate);
                }
            }
        }
        types
    }

    // ================================================================
    // Behaviors
    // ================================================================

    /// Registers a named behavior on `ty`.
    ///
    /// Fails with `NameConflict` when the name is a field of the type or
    /// one of the built-in capabilities.
    pub fn define_behavior<F>(&mut self, ty: ContentTypeId, name: &str, f: F) -> ModelResult<()>
    where
        F: Fn(&dyn ContentBehavior, &[Value]) -> ModelResult<Value> + Send + Sync + 'static,
    {
        if is_builtin_behavior(name) || self.field_exists(ty, name) {
            warn!(type_name = %self.name_of(ty), name, "Behavior name clashes with an existing name");
            return Err(ModelError::NameConflict {
                type_name: self.name_of(ty).to_string(),
                name: name.to_string(),
            });
        }
        self.ty_mut(ty).behaviors.insert(name.to_string(), Arc::new(f));
        Ok(())
    }

    /// The nearest definition of `name` on `ty` or its supertypes.
    pub fn behavior(&self, ty: ContentTypeId, name: &str) -> Option<&Behavior> {
        self.ancestors(ty).find_map(|t| t.behaviors.get(name))
    }
}

impl TypeRegistry for Schema {
    fn type_name(&self, ty: ContentTypeId) -> String {
        self.name_of(ty).to_string()
    }

    fn resolve_group_members(&self, group: &str) -> Vec<ContentTypeId> {
        self.groups.get(group).cloned().unwrap_or_default()
    }

    fn subclasses_of(&self, ty: ContentTypeId) -> Vec<ContentTypeId> {
        self.descendants(ty)
    }
}
