//! Identity of content instances.
//!
//! Every page and piece gets a [`ContentId`] when it is created. The id is
//! what stores key records by, what an alias records as its target, and
//! what a membership entry points at once content is attached to a
//! container. It never changes for the lifetime of the instance, even when
//! the slug, style or owning container does.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Identity of one content instance, page or piece.
///
/// Backed by a UUID v7, so ids minted later sort after ids minted earlier.
/// Stores rely on that to list content in creation order without keeping a
/// separate counter. Serializes as the bare hyphenated string so persisted
/// alias targets stay readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentId(Uuid);

impl ContentId {
    /// Mints the id for a freshly created instance.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Wraps a UUID a host already assigned, e.g. when importing content.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    #[must_use]
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }

    /// Parses an id as written into a content record or an alias target.
    pub fn parse(s: &str) -> Result<Self> {
        Ok(Self(Uuid::parse_str(s.trim())?))
    }
}

impl Default for ContentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ContentId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
