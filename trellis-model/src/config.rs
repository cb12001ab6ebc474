//! Engine configuration: read from a TOML file with defaults for every key.
//!
//! ```toml
//! editor_namespace = "Trellis.FieldTypes"
//! default_level = "editor"
//!
//! [player]
//! width = 640
//! height = 360
//!
//! [player.youtube]
//! theme = "light"
//! ```

use crate::error::{ModelError, ModelResult};
use crate::options::merge_options;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::path::Path;
use tracing::{info, warn};
use trellis_types::UserLevel;

/// Settings consulted while declaring fields and rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Prefix for the editor type tag exported with each field.
    pub editor_namespace: String,
    /// Level applied to membership rules that do not name one.
    pub default_level: UserLevel,
    /// Default web video player settings, merged under each field's own.
    pub player: Value,
}

fn default_editor_namespace() -> String {
    "Trellis.FieldTypes".to_string()
}

/// Player settings used when neither config nor field says otherwise.
pub fn default_player() -> Value {
    json!({
        "width": 640,
        "height": 360,
        "fullscreen": true,
        "autoplay": false,
        "loop": false,
        "showinfo": true,
        "youtube": {
            "theme": "dark",
            "hd": true,
            "controls": true,
            "showsearch": false,
        },
        "vimeo": {
            "color": "444444",
            "api": false,
        },
    })
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            editor_namespace: default_editor_namespace(),
            default_level: UserLevel::minimum(),
            player: default_player(),
        }
    }
}

/// On-disk shape: every key optional, player settings partial.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    editor_namespace: Option<String>,
    default_level: Option<UserLevel>,
    player: Option<Value>,
}

impl ConfigFile {
    fn into_config(self) -> EngineConfig {
        let defaults = EngineConfig::default();
        EngineConfig {
            editor_namespace: self
                .editor_namespace
                .unwrap_or(defaults.editor_namespace),
            default_level: self.default_level.unwrap_or(defaults.default_level),
            player: match self.player {
                Some(player) => merge_options(&defaults.player, &player),
                None => defaults.player,
            },
        }
    }
}

impl EngineConfig {
    /// Parses configuration from TOML text.
    pub fn from_toml_str(contents: &str) -> ModelResult<Self> {
        let file: ConfigFile =
            toml::from_str(contents).map_err(|e| ModelError::Config(e.to_string()))?;
        Ok(file.into_config())
    }

    /// Loads configuration from a path.
    /// Falls back to defaults with a warning on read or parse errors.
    pub fn load_from(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            info!(path = %path.display(), "No engine config found, using defaults");
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(contents) => match Self::from_toml_str(&contents) {
                Ok(config) => {
                    info!(path = %path.display(), "Loaded engine config");
                    config
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Failed to parse engine config, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read engine config");
                Self::default()
            }
        }
    }
}
