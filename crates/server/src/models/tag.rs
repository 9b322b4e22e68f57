//! Tag domain type.

use chrono::{DateTime, Utc};
use serde::Serialize;

use trailmark_core::{KeywordId, NameKey, TagId};

use super::CatalogEntity;

/// A tag grouping spots, carrying weak references to keywords.
///
/// `keywords` is an ordered association list of keyword ids. Resolving an id
/// to a keyword is always a fresh store lookup, so a keyword soft-deleted
/// after being attached becomes invisible on the next read and is pruned by
/// the next reconciliation pass.
#[derive(Debug, Clone, Serialize)]
pub struct Tag {
    /// Unique tag ID.
    pub id: TagId,
    /// Normalized tag name.
    pub name: NameKey,
    /// Associated keyword ids, in attachment order, without duplicates.
    pub keywords: Vec<KeywordId>,
    /// When the tag was created.
    pub created_at: DateTime<Utc>,
    /// When the tag was last updated.
    pub updated_at: DateTime<Utc>,
    /// Soft-delete marker.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Tag {
    /// Create a new live tag with no keyword associations.
    #[must_use]
    pub fn new(name: NameKey) -> Self {
        let now = Utc::now();
        Self {
            id: TagId::generate(),
            name,
            keywords: Vec::new(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }
}

impl CatalogEntity for Tag {
    type Id = TagId;

    fn id(&self) -> TagId {
        self.id
    }

    fn name(&self) -> &str {
        self.name.as_str()
    }

    fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }

    fn mark_deleted(&mut self, at: DateTime<Utc>) {
        self.deleted_at = Some(at);
        self.updated_at = at;
    }
}
