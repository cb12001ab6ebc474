//! Membership rules: which types may be added inside which.
//!
//! A container type owns an ordered rule list; its effective rules are its
//! supertype's followed by its own. A rule matches either one type (and,
//! optionally, its subtypes) or the members of named groups, and is gated
//! by a minimum user level.
//!
//! Style selection for an added instance falls back in order: styles named
//! on the matching rule, then the candidate type's styles.

use crate::error::{ModelError, ModelResult};
use crate::permission::PermissionService;
use crate::schema::{ContentTypeId, Schema, TypeRegistry};
use crate::style::{Style, StyleRegistry};
use tracing::{debug, warn};
use trellis_types::UserLevel;

/// What a rule matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleTarget {
    Type {
        ty: ContentTypeId,
        allow_subclasses: bool,
    },
    Groups(Vec<String>),
}

/// Optional settings for a rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleOptions {
    styles: Option<Vec<String>>,
    prototype: Option<String>,
    level: Option<UserLevel>,
}

impl RuleOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn style(self, name: impl Into<String>) -> Self {
        self.styles([name.into()])
    }

    pub fn styles<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.styles = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Prototype name used when creating instances through this rule.
    pub fn prototype(mut self, name: impl Into<String>) -> Self {
        self.prototype = Some(name.into());
        self
    }

    pub fn level(mut self, level: UserLevel) -> Self {
        self.level = Some(level);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MembershipRule {
    target: RuleTarget,
    styles: Option<Vec<String>>,
    prototype: Option<String>,
    level: UserLevel,
}

impl MembershipRule {
    fn new(target: RuleTarget, options: RuleOptions, default_level: UserLevel) -> Self {
        Self {
            target,
            styles: options.styles,
            prototype: options.prototype,
            level: options.level.unwrap_or(default_level),
        }
    }

    pub fn target(&self) -> &RuleTarget {
        &self.target
    }

    pub fn style_names(&self) -> Option<&[String]> {
        self.styles.as_deref()
    }

    pub fn prototype(&self) -> Option<&str> {
        self.prototype.as_deref()
    }

    pub fn level(&self) -> UserLevel {
        self.level
    }

    /// True if `candidate` is matched by this rule's type or groups.
    pub fn includes(&self, candidate: ContentTypeId, types: &dyn TypeRegistry) -> bool {
        match &self.target {
            RuleTarget::Type {
                ty,
                allow_subclasses,
            } => {
                *ty == candidate
                    || (*allow_subclasses && types.subclasses_of(*ty).contains(&candidate))
            }
            RuleTarget::Groups(groups) => groups
                .iter()
                .any(|g| types.resolve_group_members(g).contains(&candidate)),
        }
    }

    /// Concrete types this rule admits.
    pub fn instance_types(&self, types: &dyn TypeRegistry) -> Vec<ContentTypeId> {
        let candidates = match &self.target {
            RuleTarget::Type {
                ty,
                allow_subclasses,
            } => {
                let mut all = vec![*ty];
                if *allow_subclasses {
                    all.extend(types.subclasses_of(*ty));
                }
                all
            }
            RuleTarget::Groups(groups) => groups
                .iter()
                .flat_map(|g| types.resolve_group_members(g))
                .collect(),
        };
        let mut unique = Vec::with_capacity(candidates.len());
        for ty in candidates {
            if !unique.contains(&ty) {
                unique.push(ty);
            }
        }
        unique
    }

    pub fn is_addable(&self, user: &str, permissions: &dyn PermissionService) -> bool {
        permissions.has_level(user, self.level)
    }

    /// Checks configured style names against the rule's own type.
    ///
    /// Only exact-type rules can be checked up front. Subclass and group
    /// rules resolve names on each candidate, and those candidates may not
    /// be declared yet, so their names are checked when styles are asked for.
    pub fn check_styles(
        &self,
        types: &dyn TypeRegistry,
        styles: &dyn StyleRegistry,
    ) -> ModelResult<()> {
        if let RuleTarget::Type {
            ty,
            allow_subclasses: false,
        } = &self.target
        {
            self.configured_styles(*ty, types, styles)?;
        }
        Ok(())
    }

    /// Styles eligible for an instance of `candidate` added through this rule.
    pub fn styles(
        &self,
        candidate: ContentTypeId,
        types: &dyn TypeRegistry,
        styles: &dyn StyleRegistry,
    ) -> ModelResult<Vec<Style>> {
        match self.configured_styles(candidate, types, styles)? {
            Some(configured) => Ok(configured),
            None => Ok(styles.styles(candidate)),
        }
    }

    pub fn default_style(
        &self,
        candidate: ContentTypeId,
        types: &dyn TypeRegistry,
        styles: &dyn StyleRegistry,
    ) -> ModelResult<Option<Style>> {
        Ok(self.styles(candidate, types, styles)?.into_iter().next())
    }

    fn configured_styles(
        &self,
        ty: ContentTypeId,
        types: &dyn TypeRegistry,
        styles: &dyn StyleRegistry,
    ) -> ModelResult<Option<Vec<Style>>> {
        let Some(names) = &self.styles else {
            return Ok(None);
        };
        names
            .iter()
            .map(|name| {
                styles.find_named_style(ty, name).ok_or_else(|| {
                    let type_name = types.type_name(ty);
                    warn!(style = %name, type_name = %type_name, "Rule names an unknown style");
                    ModelError::UnknownStyle {
                        style: name.clone(),
                        type_name,
                    }
                })
            })
            .collect::<ModelResult<Vec<Style>>>()
            .map(Some)
    }
}

impl Schema {
    // ================================================================
    // Declaration
    // ================================================================

    /// Allows instances of exactly `ty` inside `container`.
    pub fn allow(
        &mut self,
        container: ContentTypeId,
        ty: ContentTypeId,
        options: RuleOptions,
    ) -> ModelResult<()> {
        let target = RuleTarget::Type {
            ty,
            allow_subclasses: false,
        };
        self.push_rule(container, target, options)
    }

    /// Allows instances of `ty` and every subtype of it.
    pub fn allow_subclasses(
        &mut self,
        container: ContentTypeId,
        ty: ContentTypeId,
        options: RuleOptions,
    ) -> ModelResult<()> {
        let target = RuleTarget::Type {
            ty,
            allow_subclasses: true,
        };
        self.push_rule(container, target, options)
    }

    /// Allows instances of every type in the named groups.
    pub fn allow_group(
        &mut self,
        container: ContentTypeId,
        groups: &[&str],
        options: RuleOptions,
    ) -> ModelResult<()> {
        let target = RuleTarget::Groups(groups.iter().map(|g| g.to_string()).collect());
        self.push_rule(container, target, options)
    }

    fn push_rule(
        &mut self,
        container: ContentTypeId,
        target: RuleTarget,
        options: RuleOptions,
    ) -> ModelResult<()> {
        self.checked(container)?;
        if let RuleTarget::Type { ty, .. } = &target {
            self.checked(*ty)?;
        }
        let rule = MembershipRule::new(target, options, self.config().default_level);
        rule.check_styles(&*self, &*self)?;
        debug!(container = %self.name_of(container), level = %rule.level, "Declared membership rule");
        self.ty_mut(container).rules.push(rule);
        Ok(())
    }

    // ================================================================
    // Queries
    // ================================================================

    /// Effective rules for `container`: supertype's first, then its own.
    pub fn allowed(&self, container: ContentTypeId) -> Vec<&MembershipRule> {
        let content_type = self.ty(container);
        let mut rules = content_type
            .supertype()
            .map(|s| self.allowed(s))
            .unwrap_or_default();
        rules.extend(content_type.rules.iter());
        rules
    }

    /// Every concrete type admitted by some rule of `container`.
    pub fn allowed_types(&self, container: ContentTypeId) -> Vec<ContentTypeId> {
        let mut types = Vec::new();
        for rule in self.allowed(container) {
            for ty in rule.instance_types(self) {
                if !types.contains(&ty) {
                    types.push(ty);
                }
            }
        }
        types
    }

    /// First rule of `container` that matches `candidate`, ignoring levels.
    pub fn allowed_rule(
        &self,
        container: ContentTypeId,
        candidate: ContentTypeId,
    ) -> Option<&MembershipRule> {
        self.allowed(container)
            .into_iter()
            .find(|rule| rule.includes(candidate, self))
    }

    /// True if some rule matches `candidate` and `user` holds its level.
    pub fn is_allowed(
        &self,
        container: ContentTypeId,
        candidate: ContentTypeId,
        user: &str,
        permissions: &dyn PermissionService,
    ) -> bool {
        let allowed = self
            .allowed(container)
            .into_iter()
            .any(|rule| rule.includes(candidate, self) && rule.is_addable(user, permissions));
        if !allowed {
            debug!(
                container = %self.name_of(container),
                candidate = %self.name_of(candidate),
                user,
                "Membership denied"
            );
        }
        allowed
    }

    /// Style for a new `candidate` instance inside `container`.
    pub fn style_for_content(
        &self,
        container: ContentTypeId,
        candidate: ContentTypeId,
    ) -> ModelResult<Option<Style>> {
        match self.allowed_rule(container, candidate) {
            Some(rule) => rule.default_style(candidate, self, self),
            None => Ok(self.resolve_style(candidate, None)),
        }
    }

    pub fn available_styles(
        &self,
        container: ContentTypeId,
        candidate: ContentTypeId,
    ) -> ModelResult<Vec<Style>> {
        match self.allowed_rule(container, candidate) {
            Some(rule) => rule.styles(candidate, self, self),
            None => Ok(self.styles(candidate)),
        }
    }

    pub fn prototype_for_content(
        &self,
        container: ContentTypeId,
        candidate: ContentTypeId,
    ) -> Option<&str> {
        self.allowed_rule(container, candidate)
            .and_then(MembershipRule::prototype)
    }
}
