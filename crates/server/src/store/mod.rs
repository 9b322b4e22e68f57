//! Entity store adapter.
//!
//! A uniform abstraction over one document collection per entity type. Every
//! lookup carries the live/soft-deleted discriminator except [`EntityStore::find_by_id`],
//! which deliberately sees soft-deleted records so the cleanup paths can
//! inspect them (invariant: a soft-deleted record is invisible to existence
//! decisions but remains physically present).
//!
//! Two implementations:
//! - [`postgres`] - production, backed by sqlx/`PostgreSQL` with partial
//!   unique indexes enforcing one live record per natural-key name
//! - [`memory`] - in-process, used by tests

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use trailmark_core::{KeywordId, NameKey, SpotId, TagId};

use crate::models::{CatalogEntity, Keyword, Spot, Tag};

pub use memory::MemoryStore;
pub use postgres::{PgKeywordStore, PgPlanStore, PgSpotStore, PgTagStore, create_pool};

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A live record already holds the natural key.
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// Data in the store is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

/// Uniform per-entity store operations.
///
/// The one-live-record-per-name rule is enforced here (unique index in
/// Postgres, single critical section in memory), never by a read-then-write
/// sequence in the callers.
#[async_trait]
pub trait EntityStore<E: CatalogEntity>: Send + Sync {
    /// Insert a new record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Conflict`] if a live record already holds the
    /// same name.
    async fn insert(&self, entity: E) -> Result<E, StoreError>;

    /// Raw lookup by id. Sees soft-deleted records; used by cleanup paths.
    async fn find_by_id(&self, id: E::Id) -> Result<Option<E>, StoreError>;

    /// Live-only lookup by id.
    async fn find_live(&self, id: E::Id) -> Result<Option<E>, StoreError>;

    /// Live-only lookup by natural-key name. Callers pass names already in
    /// their stored form (normalized where the entity requires it).
    async fn find_live_by_name(&self, name: &str) -> Result<Option<E>, StoreError>;

    /// All live records in creation order.
    async fn list_live(&self) -> Result<Vec<E>, StoreError>;

    /// Replace a record's fields if it is still live.
    ///
    /// Returns `None` if the record is absent or soft-deleted.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Conflict`] if the replacement would give the
    /// record a name another live record holds.
    async fn update_live(&self, entity: E) -> Result<Option<E>, StoreError>;

    /// Mark a live record deleted. Returns `None` if absent or already
    /// soft-deleted; the record is never physically removed.
    async fn soft_delete(&self, id: E::Id) -> Result<Option<E>, StoreError>;
}

/// Keyword-specific store operations.
#[async_trait]
pub trait KeywordStore: EntityStore<Keyword> {
    /// Atomic find-or-create of a live keyword by normalized name.
    ///
    /// A single conditional upsert: concurrent calls with the same name must
    /// resolve to one live record. Soft-deleted rows never match, so a
    /// re-used name produces a brand-new keyword.
    async fn upsert_live_by_name(&self, name: &NameKey) -> Result<Keyword, StoreError>;
}

/// Tag-specific store operations.
#[async_trait]
pub trait TagStore: EntityStore<Tag> {
    /// Atomic find-or-create of a live tag by normalized name.
    async fn upsert_live_by_name(&self, name: &NameKey) -> Result<Tag, StoreError>;

    /// Atomically remove `keyword` from a live tag's association list.
    ///
    /// Filtered pull: the update applies only while the tag is live.
    /// Returns `None` if the tag is absent or soft-deleted. Pulling an id
    /// that is not present succeeds and leaves the list unchanged.
    async fn pull_keyword(&self, id: TagId, keyword: KeywordId) -> Result<Option<Tag>, StoreError>;

    /// Live tags whose association list references `keyword`.
    async fn list_live_referencing(&self, keyword: KeywordId) -> Result<Vec<Tag>, StoreError>;
}

/// Live-spot search filter, applied on top of the live discriminator.
#[derive(Debug, Clone, Default)]
pub struct SpotFilter {
    /// Match spots referencing any of these tags. `Some(vec![])` matches
    /// nothing (a keyword resolved to zero live tags).
    pub tag_ids: Option<Vec<TagId>>,
    /// Match spots carrying this normalized category.
    pub category: Option<NameKey>,
    /// Match spots rated at least this value.
    pub min_rating: Option<f64>,
}

/// Spot-specific store operations.
#[async_trait]
pub trait SpotStore: EntityStore<Spot> {
    /// Atomically remove `category` from a live spot's category list.
    async fn pull_category(&self, id: SpotId, category: &NameKey)
    -> Result<Option<Spot>, StoreError>;

    /// Atomically remove `tag` from a live spot's tag list.
    async fn pull_tag(&self, id: SpotId, tag: TagId) -> Result<Option<Spot>, StoreError>;

    /// Live records in creation order, windowed by `offset`/`limit`.
    async fn list_live_page(&self, offset: i64, limit: i64) -> Result<Vec<Spot>, StoreError>;

    /// Live records matching `filter`, in creation order.
    async fn search_live(&self, filter: &SpotFilter) -> Result<Vec<Spot>, StoreError>;
}
