//! Field prototypes: the schema declaration for one named field.

use crate::config::EngineConfig;
use crate::hook::FieldHook;
use crate::kind::FieldKind;
use crate::options::{RenderOptions, merge_options};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// Declaration-time options for a field.
#[derive(Clone, Default)]
pub struct FieldOptions {
    default: Option<String>,
    title: Option<String>,
    comment: Option<String>,
    options: Map<String, Value>,
    player: Option<Value>,
    hook: Option<Arc<dyn FieldHook>>,
}

impl FieldOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value the field holds until one is set.
    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Human label; derived from the name when absent.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Editor hint shown alongside the field.
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Kind-specific option (e.g. `format` for date fields).
    pub fn option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Web video player settings for this field.
    pub fn player(mut self, player: Value) -> Self {
        self.player = Some(player);
        self
    }

    pub fn hook(mut self, hook: Arc<dyn FieldHook>) -> Self {
        self.hook = Some(hook);
        self
    }
}

impl fmt::Debug for FieldOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldOptions")
            .field("default", &self.default)
            .field("title", &self.title)
            .field("comment", &self.comment)
            .field("options", &self.options)
            .field("player", &self.player)
            .field("hook", &self.hook.is_some())
            .finish()
    }
}

/// Immutable declaration of a named, typed field.
#[derive(Clone)]
pub struct FieldPrototype {
    name: String,
    kind: FieldKind,
    default: String,
    title: String,
    comment: Option<String>,
    options: Map<String, Value>,
    player: Value,
    editor_type: String,
    hook: Option<Arc<dyn FieldHook>>,
}

impl FieldPrototype {
    pub(crate) fn new(
        name: &str,
        kind: Option<FieldKind>,
        options: FieldOptions,
        config: &EngineConfig,
    ) -> Self {
        let kind = kind.unwrap_or_else(|| FieldKind::infer(name));
        let player = match &options.player {
            Some(player) => merge_options(&config.player, player),
            None => config.player.clone(),
        };
        Self {
            name: name.to_string(),
            kind,
            default: options
                .default
                .unwrap_or_else(|| kind.default_value().to_string()),
            title: options.title.unwrap_or_else(|| derive_title(name)),
            comment: options.comment,
            options: options.options,
            player,
            editor_type: format!("{}.{}", config.editor_namespace, kind.editor_class()),
            hook: options.hook,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn default_value(&self) -> &str {
        &self.default
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn option(&self, key: &str) -> Option<&Value> {
        self.options.get(key)
    }

    /// Merged player settings (config defaults overlaid with the field's own).
    pub fn player(&self) -> &Value {
        &self.player
    }

    pub fn editor_type(&self) -> &str {
        &self.editor_type
    }

    pub fn has_hook(&self) -> bool {
        self.hook.is_some()
    }

    /// Renders `raw` into `format`: the inline hook first, then the kind.
    pub fn generate(&self, format: &str, raw: &str, options: &RenderOptions) -> String {
        if let Some(output) = self
            .hook
            .as_ref()
            .and_then(|hook| hook.generate(format, raw, options))
        {
            return output;
        }
        self.kind.generate(format, raw, self, options)
    }
}

impl fmt::Debug for FieldPrototype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldPrototype")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("default", &self.default)
            .field("title", &self.title)
            .field("comment", &self.comment)
            .field("hook", &self.hook.is_some())
            .finish_non_exhaustive()
    }
}

/// `"having_fun_yet"` → `"Having Fun Yet"`.
pub fn derive_title(name: &str) -> String {
    name.split(|c: char| c == '_' || c == '-' || c.is_whitespace())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn titles_split_on_separators() {
        assert_eq!(derive_title("title"), "Title");
        assert_eq!(derive_title("having_fun_yet"), "Having Fun Yet");
        assert_eq!(derive_title("main-image"), "Main Image");
        assert_eq!(derive_title("__odd__name"), "Odd Name");
    }
}
