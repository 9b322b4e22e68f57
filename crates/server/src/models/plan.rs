//! Plan domain type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use trailmark_core::PlanId;

use super::CatalogEntity;

/// A trip plan.
///
/// Plans are independent entities with the standard soft-delete lifecycle and
/// no relation logic. Plan names are compared verbatim (not normalized).
#[derive(Debug, Clone, Serialize)]
pub struct Plan {
    /// Unique plan ID.
    pub id: PlanId,
    /// Plan name (raw, natural key among live plans).
    pub name: String,
    /// Free-form description.
    pub description: Option<String>,
    /// When the plan was created.
    pub created_at: DateTime<Utc>,
    /// When the plan was last updated.
    pub updated_at: DateTime<Utc>,
    /// Soft-delete marker.
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Fields accepted when creating or updating a plan.
#[derive(Debug, Clone, Deserialize)]
pub struct PlanDraft {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl Plan {
    /// Create a new live plan from a draft.
    #[must_use]
    pub fn new(draft: PlanDraft) -> Self {
        let now = Utc::now();
        Self {
            id: PlanId::generate(),
            name: draft.name,
            description: draft.description,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    /// Replace the mutable fields from a draft.
    pub fn apply(&mut self, draft: PlanDraft) {
        self.name = draft.name;
        self.description = draft.description;
        self.updated_at = Utc::now();
    }
}

impl CatalogEntity for Plan {
    type Id = PlanId;

    fn id(&self) -> PlanId {
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
