//! Spot domain type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use trailmark_core::{NameKey, SpotId, TagId};

use super::CatalogEntity;

/// Contact details for a spot. Both fields are optional free-form strings;
/// shape validation happens upstream of the services.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactInfo {
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// A catalogued place.
///
/// `categories` holds normalized category names and `tags` holds weak tag
/// references by id; both are deduplicated sets kept in attachment order and
/// managed through the attach/detach operations rather than `update`.
#[derive(Debug, Clone, Serialize)]
pub struct Spot {
    /// Unique spot ID.
    pub id: SpotId,
    /// Spot name (raw, natural key among live spots).
    pub name: String,
    /// Contact details.
    pub contact_info: ContactInfo,
    /// Street address.
    pub address: String,
    /// Picture URLs.
    pub pictures: Vec<String>,
    /// Aggregate rating.
    pub rating: f64,
    /// Normalized category names, no duplicates.
    pub categories: Vec<NameKey>,
    /// Associated tag ids, no duplicates.
    pub tags: Vec<TagId>,
    /// When the spot was created.
    pub created_at: DateTime<Utc>,
    /// When the spot was last updated.
    pub updated_at: DateTime<Utc>,
    /// Soft-delete marker.
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Scalar fields accepted when creating or updating a spot.
///
/// Categories and tags are deliberately absent: those associations are
/// managed through the dedicated attach/detach operations.
#[derive(Debug, Clone, Deserialize)]
pub struct SpotDraft {
    pub name: String,
    #[serde(default)]
    pub contact_info: ContactInfo,
    pub address: String,
    #[serde(default)]
    pub pictures: Vec<String>,
    #[serde(default)]
    pub rating: f64,
}

impl Spot {
    /// Create a new live spot from a draft, with no categories or tags.
    #[must_use]
    pub fn new(draft: SpotDraft) -> Self {
        let now = Utc::now();
        Self {
            id: SpotId::generate(),
            name: draft.name,
            contact_info: draft.contact_info,
            address: draft.address,
            pictures: draft.pictures,
            rating: draft.rating,
            categories: Vec::new(),
            tags: Vec::new(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    /// Replace the scalar fields from a draft, leaving associations intact.
    pub fn apply(&mut self, draft: SpotDraft) {
        self.name = draft.name;
        self.contact_info = draft.contact_info;
        self.address = draft.address;
        self.pictures = draft.pictures;
        self.rating = draft.rating;
        self.updated_at = Utc::now();
    }
}

impl CatalogEntity for Spot {
    type Id = SpotId;

    fn id(&self) -> SpotId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }

    fn mark_deleted(&mut self, at: DateTime<Utc>) {
        self.deleted_at = Some(at);
        self.updated_at = at;
    }
}
