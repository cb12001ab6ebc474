//! Ordered per-instance field storage.

use crate::error::{ModelError, ModelResult};
use crate::export::ExportedField;
use crate::field::Field;
use crate::prototype::FieldPrototype;
use crate::store::StoredField;
use std::collections::BTreeMap;
use std::sync::Arc;
use trellis_types::ContentId;

/// The fields of one content instance, in schema order.
///
/// Built from the type's prototypes plus whatever raw values were
/// persisted. Fields without a stored value start at their default.
#[derive(Debug, Clone, Default)]
pub struct FieldSet {
    fields: Vec<Field>,
}

impl FieldSet {
    pub(crate) fn build(
        owner: ContentId,
        prototypes: Vec<Arc<FieldPrototype>>,
        stored: &BTreeMap<String, StoredField>,
    ) -> Self {
        let fields = prototypes
            .into_iter()
            .map(|prototype| match stored.get(prototype.name()) {
                Some(value) => Field::from_stored(prototype, owner, value),
                None => Field::new(prototype, owner),
            })
            .collect();
        Self { fields }
    }

    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name() == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Field> {
        self.fields.iter_mut().find(|f| f.name() == name)
    }

    /// Positional access in schema order.
    pub fn at(&self, index: usize) -> Option<&Field> {
        self.fields.get(index)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Field> {
        self.fields.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.fields.iter().map(Field::name).collect()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Sets the raw value of the named field.
    pub fn set(&mut self, name: &str, value: impl Into<String>) -> ModelResult<()> {
        let field = self
            .get_mut(name)
            .ok_or_else(|| ModelError::not_found("field", name))?;
        field.set_value(value);
        Ok(())
    }

    /// True when any field differs from its persisted value.
    pub fn is_dirty(&self) -> bool {
        self.fields.iter().any(Field::is_modified)
    }

    /// The raw values as they would be persisted, with bumped versions for
    /// changed fields.
    pub fn serialize(&self) -> BTreeMap<String, StoredField> {
        self.fields
            .iter()
            .map(|f| (f.name().to_string(), f.staged()))
            .collect()
    }

    /// Adopts the versions of a successful save.
    pub(crate) fn commit(&mut self, stored: &BTreeMap<String, StoredField>) {
        for field in &mut self.fields {
            if let Some(value) = stored.get(field.name()) {
                field.commit(value);
            }
        }
    }

    /// First image-kind field, used as an alias icon.
    pub fn first_image(&self) -> Option<&Field> {
        self.fields.iter().find(|f| f.is_image())
    }

    pub fn export(&self) -> Vec<ExportedField> {
        self.fields.iter().map(Field::export).collect()
    }
}

impl<'a> IntoIterator for &'a FieldSet {
    type Item = &'a Field;
    type IntoIter = std::slice::Iter<'a, Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}
