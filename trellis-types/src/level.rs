//! User permission levels.
//!
//! Levels form a total order: `Public < Editor < Admin < Root`.
//! `Public` is the minimum and is held by every user, known or not.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// An ordered permission tier used to gate schema operations.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum UserLevel {
    #[default]
    Public,
    Editor,
    Admin,
    Root,
}

impl UserLevel {
    /// All levels in ascending order.
    pub const ALL: [UserLevel; 4] = [Self::Public, Self::Editor, Self::Admin, Self::Root];

    /// The lowest level. Every user has at least this level.
    #[must_use]
    pub const fn minimum() -> Self {
        Self::Public
    }

    /// The highest level.
    #[must_use]
    pub const fn maximum() -> Self {
        Self::Root
    }

    /// Returns true if a holder of `self` satisfies a `required` level.
    #[must_use]
    pub fn satisfies(self, required: UserLevel) -> bool {
        self >= required
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Editor => "editor",
            Self::Admin => "admin",
            Self::Root => "root",
        }
    }
}

impl fmt::Display for UserLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserLevel {
    type Err = Error;

    /// Parses a level name. `"none"` is accepted as a synonym for the minimum.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "public" | "none" => Ok(Self::Public),
            "editor" => Ok(Self::Editor),
            "admin" => Ok(Self::Admin),
            "root" => Ok(Self::Root),
            other => Err(Error::UnknownUserLevel(other.to_string())),
        }
    }
}
