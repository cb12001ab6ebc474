//! Content schema engine for Trellis.
//!
//! Defines how structured content is declared and rendered:
//! - [`Schema`]: the content type tree, with field prototypes, membership
//!   rules, styles, layouts and named behaviors declared per type
//! - [`Field`] / [`FieldSet`]: versioned raw values rendered per output format
//! - [`MembershipRule`]: which types may nest inside which, gated by
//!   [`UserLevel`](trellis_types::UserLevel)
//! - [`AliasProxy`]: an instance that mirrors a target while overriding its
//!   path, style and layout
//!
//! Persistence and permission checks are consumed through the
//! [`ContentStore`] and [`PermissionService`] traits.

mod alias;
mod allowed;
mod config;
mod content;
mod date;
mod error;
mod export;
mod field;
mod field_set;
mod hook;
mod kind;
pub mod markdown;
mod node;
mod options;
mod permission;
mod prototype;
mod registry;
mod schema;
mod store;
mod style;
mod webvideo;

pub use alias::{alias_targets, AliasProxy, AliasState};
pub use allowed::{MembershipRule, RuleOptions, RuleTarget};
pub use config::EngineConfig;
pub use content::{Content, ContentBehavior};
pub use error::{ModelError, ModelResult};
pub use export::{ExportedContent, ExportedField, TargetSummary};
pub use field::Field;
pub use field_set::FieldSet;
pub use hook::{hook_fn, FieldHook};
pub use kind::{FieldKind, DEFAULT_FORMAT, HTML, JSON, PLAIN};
pub use node::Node;
pub use options::{merge_options, RenderOptions};
pub use permission::{LevelTable, PermissionService};
pub use prototype::{derive_title, FieldOptions, FieldPrototype};
pub use schema::{Behavior, ContentType, ContentTypeId, Schema, TypeRegistry};
pub use store::{ContentRecord, ContentStore, MemoryStore, StoredField};
pub use style::{Layout, Style, StyleRegistry};
pub use webvideo::{VideoProvider, VideoSource};
pub use trellis_types::{ContentId, UserLevel};
