use crate::options::RenderOptions;
use std::sync::Arc;

/// Inline behavior attached to a single field declaration.
///
/// Most fields do NOT need a hook: the field kind's transform covers the
/// usual formats. Implement this when one declaration needs its own output
/// for some format, e.g. wrapping a title in markup for `html`.
///
/// Returning `None` for a format falls back to the kind's transform.
pub trait FieldHook: Send + Sync {
    /// Produce output for `format` from the raw value.
    fn generate(&self, format: &str, value: &str, options: &RenderOptions) -> Option<String> {
        let _ = (format, value, options);
        None
    }
}

/// Adapts a closure into a [`FieldHook`].
pub struct FnHook<F>(F);

impl<F> FieldHook for FnHook<F>
where
    F: Fn(&str, &str, &RenderOptions) -> Option<String> + Send + Sync,
{
    fn generate(&self, format: &str, value: &str, options: &RenderOptions) -> Option<String> {
        (self.0)(format, value, options)
    }
}

/// Shorthand for a closure-backed hook.
pub fn hook_fn<F>(f: F) -> Arc<dyn FieldHook>
where
    F: Fn(&str, &str, &RenderOptions) -> Option<String> + Send + Sync + 'static,
{
    Arc::new(FnHook(f))
}
