//! Catalog services.
//!
//! One service per entity applying the soft-delete discipline uniformly, plus
//! the Tag↔Keyword relation manager. Services never panic across their
//! public boundary: every operation returns the entity or a [`CatalogError`],
//! which the HTTP layer renders as a structured message.

pub mod keywords;
pub mod plans;
pub mod relation;
pub mod spots;
pub mod tags;

use thiserror::Error;
use uuid::Uuid;

use trailmark_core::NameError;

use crate::store::StoreError;

pub use keywords::KeywordRegistry;
pub use plans::PlanService;
pub use relation::RelationManager;
pub use spots::{SpotQuery, SpotService};
pub use tags::TagService;

/// Errors surfaced by the catalog services.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Requested entity absent or soft-deleted at lookup time.
    #[error("{0}")]
    NotFound(String),

    /// A create collided with an existing live natural key.
    #[error("{message}")]
    Conflict {
        /// Human-readable description, including the colliding id when known.
        message: String,
        /// The colliding live record's id, if it could be resolved.
        existing_id: Option<Uuid>,
    },

    /// A malformed name reached the service layer (normally caught upstream).
    #[error("invalid name: {0}")]
    InvalidName(#[from] NameError),

    /// The store failed unexpectedly. Never retried here.
    #[error("storage error: {0}")]
    Storage(#[from] StoreError),
}

impl CatalogError {
    /// Build a conflict error for a natural-key collision.
    pub(crate) fn conflict(entity: &str, name: &str, existing_id: Option<Uuid>) -> Self {
        let message = existing_id.map_or_else(
            || format!("{entity} with name {name} already exists"),
            |id| format!("{entity} with name {name} already exists under id {id}"),
        );
        Self::Conflict {
            message,
            existing_id,
        }
    }
}
