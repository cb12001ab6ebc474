//! Permission seam for membership rules.

use std::collections::HashMap;
use trellis_types::UserLevel;

/// Answers whether a user holds a required level.
pub trait PermissionService {
    fn has_level(&self, user: &str, required: UserLevel) -> bool;
}

/// Fixed user → level table. Unknown users hold the minimum level.
#[derive(Debug, Clone, Default)]
pub struct LevelTable {
    levels: HashMap<String, UserLevel>,
}

impl LevelTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grant(&mut self, user: impl Into<String>, level: UserLevel) {
        self.levels.insert(user.into(), level);
    }

    pub fn with(mut self, user: impl Into<String>, level: UserLevel) -> Self {
        self.grant(user, level);
        self
    }

    pub fn level_of(&self, user: &str) -> UserLevel {
        self.levels.get(user).copied().unwrap_or_else(UserLevel::minimum)
    }
}

impl PermissionService for LevelTable {
    fn has_level(&self, user: &str, required: UserLevel) -> bool {
        self.level_of(user).satisfies(required)
    }
}
