//! Persistence seam.
//!
//! The engine never owns storage: it reads and writes [`ContentRecord`]s
//! through a [`ContentStore`]. The record `version` is an optimistic
//! concurrency token; a save naming a stale version is rejected with
//! [`ModelError::Conflict`] and never overwrites.
//!
//! [`MemoryStore`] is the in-process implementation used by tests and
//! embedders that keep content in memory.

use crate::error::{ModelError, ModelResult};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, PoisonError};
use tracing::{debug, info, warn};
use trellis_types::ContentId;

/// A persisted raw field value and its change version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredField {
    pub value: String,
    pub version: u64,
}

/// Everything persisted for one content instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentRecord {
    pub id: ContentId,
    /// Name of the content type.
    pub content_type: String,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_path: Option<String>,
    /// Alias target, for alias instances.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<ContentId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(default)]
    pub fields: BTreeMap<String, StoredField>,
    /// Record version; 0 means never saved.
    #[serde(default)]
    pub version: u64,
}

pub trait ContentStore: Send + Sync {
    fn load(&self, id: ContentId) -> ModelResult<Option<ContentRecord>>;

    /// Writes `record` if the stored version equals `expected_version`
    /// (0 for a record never saved). Returns the new version.
    fn save(&self, record: ContentRecord, expected_version: u64) -> ModelResult<u64>;

    /// Ids of instances whose alias target is `target`.
    fn aliases_of(&self, target: ContentId) -> ModelResult<Vec<ContentId>>;

    /// Records of the named types.
    fn list_by_type(&self, type_names: &[&str]) -> ModelResult<Vec<ContentRecord>>;

    /// Deletes `id` and every alias targeting it. Returns the removed ids,
    /// `id` first.
    fn delete_cascade(&self, id: ContentId) -> ModelResult<Vec<ContentId>>;

    /// Raw field values of an instance, by field name.
    fn load_raw_fields(&self, id: ContentId) -> ModelResult<BTreeMap<String, String>> {
        let record = self
            .load(id)?
            .ok_or_else(|| ModelError::not_found("content", id.to_string()))?;
        Ok(record
            .fields
            .into_iter()
            .map(|(name, field)| (name, field.value))
            .collect())
    }
}

/// In-memory [`ContentStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<ContentId, ContentRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<ContentId, ContentRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ContentStore for MemoryStore {
    fn load(&self, id: ContentId) -> ModelResult<Option<ContentRecord>> {
        Ok(self.lock().get(&id).cloned())
    }

    fn save(&self, mut record: ContentRecord, expected_version: u64) -> ModelResult<u64> {
        let mut records = self.lock();
        let actual = records.get(&record.id).map_or(0, |r| r.version);
        if actual != expected_version {
            warn!(id = %record.id, expected = expected_version, actual, "Rejected stale save");
            return Err(ModelError::Conflict {
                id: record.id,
                expected: expected_version,
                actual,
            });
        }
        let version = expected_version + 1;
        record.version = version;
        debug!(id = %record.id, version, "Saved content record");
        records.insert(record.id, record);
        Ok(version)
    }

    fn aliases_of(&self, target: ContentId) -> ModelResult<Vec<ContentId>> {
        let mut ids: Vec<ContentId> = self
            .lock()
            .values()
            .filter(|r| r.target == Some(target))
            .map(|r| r.id)
            .collect();
        ids.sort();
        Ok(ids)
    }

    fn list_by_type(&self, type_names: &[&str]) -> ModelResult<Vec<ContentRecord>> {
        let mut records: Vec<ContentRecord> = self
            .lock()
            .values()
            .filter(|r| type_names.contains(&r.content_type.as_str()))
            .cloned()
            .collect();
        records.sort_by_key(|r| r.id);
        Ok(records)
    }

    fn delete_cascade(&self, id: ContentId) -> ModelResult<Vec<ContentId>> {
        let mut records = self.lock();
        if records.remove(&id).is_none() {
            return Err(ModelError::not_found("content", id.to_string()));
        }
        let mut aliases: Vec<ContentId> = records
            .values()
            .filter(|r| r.target == Some(id))
            .map(|r| r.id)
            .collect();
        aliases.sort();
        for alias in &aliases {
            records.remove(alias);
        }
        info!(id = %id, aliases = aliases.len(), "Deleted content and its aliases");

        let mut removed = Vec::with_capacity(aliases.len() + 1);
        removed.push(id);
        removed.extend(aliases);
        Ok(removed)
    }
}
