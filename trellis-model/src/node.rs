//! Loading an instance without knowing up front whether it is an alias.

use crate::alias::AliasProxy;
use crate::content::{Content, ContentBehavior};
use crate::error::{ModelError, ModelResult};
use crate::schema::Schema;
use crate::store::ContentStore;
use std::ops::Deref;
use std::sync::Arc;
use trellis_types::ContentId;

/// A loaded instance: plain content or an alias of one.
#[derive(Debug, Clone)]
pub enum Node {
    Content(Content),
    Alias(AliasProxy),
}

impl Node {
    /// Loads `id`, wrapping it in an [`AliasProxy`] when its type is an
    /// alias type.
    pub fn load(schema: Arc<Schema>, store: &dyn ContentStore, id: ContentId) -> ModelResult<Self> {
        let record = store
            .load(id)?
            .ok_or_else(|| ModelError::not_found("content", id.to_string()))?;
        let ty = schema.require_type(&record.content_type)?;
        if schema.is_alias_type(ty) {
            AliasProxy::load(schema, store, id).map(Node::Alias)
        } else {
            Content::from_record(schema, record).map(Node::Content)
        }
    }

    pub fn as_behavior(&self) -> &(dyn ContentBehavior + 'static) {
        match self {
            Node::Content(content) => content,
            Node::Alias(alias) => alias,
        }
    }

    pub fn as_alias(&self) -> Option<&AliasProxy> {
        match self {
            Node::Alias(alias) => Some(alias),
            Node::Content(_) => None,
        }
    }

    pub fn as_content(&self) -> Option<&Content> {
        match self {
            Node::Content(content) => Some(content),
            Node::Alias(_) => None,
        }
    }
}

impl Deref for Node {
    type Target = dyn ContentBehavior;

    fn deref(&self) -> &Self::Target {
        self.as_behavior()
    }
}

impl From<Content> for Node {
    fn from(content: Content) -> Self {
        Node::Content(content)
    }
}

impl From<AliasProxy> for Node {
    fn from(alias: AliasProxy) -> Self {
        Node::Alias(alias)
    }
}
