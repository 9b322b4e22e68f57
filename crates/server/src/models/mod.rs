//! Catalog domain types.
//!
//! These types represent validated domain objects separate from database row
//! types. Every entity follows the same two-state lifecycle: live
//! (`deleted_at` is `None`) or soft-deleted (`deleted_at` carries the deletion
//! time). Soft-deleted records are never removed from storage.

pub mod keyword;
pub mod plan;
pub mod spot;
pub mod tag;

use core::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

pub use keyword::Keyword;
pub use plan::{Plan, PlanDraft};
pub use spot::{ContactInfo, Spot, SpotDraft};
pub use tag::Tag;

/// Common shape of every catalog entity, as seen by the store adapter.
///
/// `name()` returns the natural key used for by-name lookups and for the
/// one-live-record-per-name rule. Tag, keyword and category names are
/// normalized before they reach an entity; plan and spot names are compared
/// verbatim.
pub trait CatalogEntity: Clone + Send + Sync + 'static {
    /// Typed ID for this entity.
    type Id: Copy + Eq + Send + Sync + fmt::Display + Into<Uuid>;

    /// The entity's ID.
    fn id(&self) -> Self::Id;

    /// The natural-key name.
    fn name(&self) -> &str;

    /// Soft-delete timestamp, if the record has been deleted.
    fn deleted_at(&self) -> Option<DateTime<Utc>>;

    /// Mark the record soft-deleted as of `at`.
    fn mark_deleted(&mut self, at: DateTime<Utc>);

    /// Whether the record is visible to lookups.
    fn is_live(&self) -> bool {
        self.deleted_at().is_none()
    }
}
