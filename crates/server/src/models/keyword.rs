//! Keyword domain type.

use chrono::{DateTime, Utc};
use serde::Serialize;

use trailmark_core::{KeywordId, NameKey};

use super::CatalogEntity;

/// A reusable keyword referenced by tags.
///
/// Keywords are owned by no single tag: any number of tags may hold a weak
/// reference to the same keyword by id. A keyword's normalized name is a
/// logical key among live records only - soft-deleting a keyword frees its
/// name for a brand-new record.
#[derive(Debug, Clone, Serialize)]
pub struct Keyword {
    /// Unique keyword ID.
    pub id: KeywordId,
    /// Normalized keyword name.
    pub name: NameKey,
    /// When the keyword was created.
    pub created_at: DateTime<Utc>,
    /// When the keyword was last updated.
    pub updated_at: DateTime<Utc>,
    /// Soft-delete marker.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Keyword {
    /// Create a new live keyword.
    #[must_use]
    pub fn new(name: NameKey) -> Self {
        let now = Utc::now();
        Self {
            id: KeywordId::generate(),
            name,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }
}

impl CatalogEntity for Keyword {
    type Id = KeywordId;

    fn id(&self) -> KeywordId {
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
