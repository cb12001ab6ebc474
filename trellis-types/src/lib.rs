//! Core type definitions for Trellis.
//!
//! This crate defines the primitive types shared by the schema engine and
//! any host that embeds it:
//! - Content identifiers (UUID v7)
//! - User permission levels (a total order with a defined minimum)
//!
//! Everything that describes content *shape* (types, fields, rules) lives in
//! `trellis-model`, not here.

mod ids;
mod level;

pub use ids::ContentId;
pub use level::UserLevel;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid UUID: {0}")]
    InvalidUuid(#[from] uuid::Error),

    #[error("unknown user level: {0}")]
    UnknownUserLevel(String),
}
