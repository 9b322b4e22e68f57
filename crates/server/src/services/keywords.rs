//! Keyword registry.
//!
//! Owns `Keyword` identity: every keyword that enters the system goes through
//! [`KeywordRegistry::find_or_create`], which resolves a normalized name to
//! the one live keyword holding it, creating the record when necessary in a
//! single atomic store operation.

use std::sync::Arc;

use trailmark_core::{KeywordId, NameKey};

use crate::models::Keyword;
use crate::store::{EntityStore, KeywordStore, StoreError};

use super::CatalogError;

/// Service owning keyword identity and lifecycle.
#[derive(Clone)]
pub struct KeywordRegistry {
    store: Arc<dyn KeywordStore>,
}

impl KeywordRegistry {
    /// Create a new registry over a keyword store.
    pub fn new(store: Arc<dyn KeywordStore>) -> Self {
        Self { store }
    }

    /// Resolve a raw name to the live keyword holding it, creating the
    /// keyword if none exists.
    ///
    /// Idempotent: repeated calls return the same keyword while it stays
    /// live. A soft-deleted keyword never matches, so re-using its name
    /// produces a brand-new record. Uniqueness is enforced by the store's
    /// conditional upsert, not by a find-then-insert sequence.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidName`] for an empty name, or
    /// [`CatalogError::Storage`] if the store fails.
    pub async fn find_or_create(&self, name: &str) -> Result<Keyword, CatalogError> {
        let key = NameKey::parse(name)?;
        Ok(self.store.upsert_live_by_name(&key).await?)
    }

    /// All live keywords.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if no live keyword exists.
    pub async fn get_all(&self) -> Result<Vec<Keyword>, CatalogError> {
        let keywords = self.store.list_live().await?;
        if keywords.is_empty() {
            return Err(CatalogError::NotFound(
                "there are no keywords available".to_owned(),
            ));
        }
        Ok(keywords)
    }

    /// Live-filtered lookup by id.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if the keyword is absent or
    /// soft-deleted.
    pub async fn get_by_id(&self, id: KeywordId) -> Result<Keyword, CatalogError> {
        self.store
            .find_live(id)
            .await?
            .ok_or_else(|| CatalogError::NotFound(format!("keyword with id {id} not found")))
    }

    /// Live-filtered lookup by raw name (normalized before the lookup).
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if no live keyword holds the name.
    pub async fn get_by_name(&self, name: &str) -> Result<Keyword, CatalogError> {
        let key = NameKey::parse(name)?;
        self.store
            .find_live_by_name(key.as_str())
            .await?
            .ok_or_else(|| CatalogError::NotFound(format!("keyword with name {key} not found")))
    }

    /// Raw lookup by id, bypassing the live filter.
    ///
    /// Used by cleanup passes that must see soft-deleted records.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] only if no record (live or
    /// soft-deleted) carries the id.
    pub async fn find_by_id_including_deleted(
        &self,
        id: KeywordId,
    ) -> Result<Keyword, CatalogError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| CatalogError::NotFound(format!("keyword with id {id} not found")))
    }

    /// Create a keyword explicitly.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Conflict`] if a live keyword already holds the
    /// normalized name.
    pub async fn create(&self, name: &str) -> Result<Keyword, CatalogError> {
        let key = NameKey::parse(name)?;
        match self.store.insert(Keyword::new(key.clone())).await {
            Ok(keyword) => Ok(keyword),
            Err(StoreError::Conflict(_)) => {
                let existing = self.store.find_live_by_name(key.as_str()).await?;
                Err(CatalogError::conflict(
                    "keyword",
                    key.as_str(),
                    existing.map(|k| k.id.into()),
                ))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Rename a live keyword.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if the keyword is absent or
    /// soft-deleted, [`CatalogError::Conflict`] if the new name is taken.
    pub async fn update(&self, id: KeywordId, name: &str) -> Result<Keyword, CatalogError> {
        let key = NameKey::parse(name)?;
        let mut keyword = self.get_by_id(id).await?;
        keyword.name = key.clone();
        keyword.updated_at = chrono::Utc::now();

        match self.store.update_live(keyword).await {
            Ok(Some(updated)) => Ok(updated),
            Ok(None) => Err(CatalogError::NotFound(format!(
                "keyword with id {id} not found"
            ))),
            Err(StoreError::Conflict(_)) => {
                let existing = self.store.find_live_by_name(key.as_str()).await?;
                Err(CatalogError::conflict(
                    "keyword",
                    key.as_str(),
                    existing.map(|k| k.id.into()),
                ))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Soft-delete a live keyword. One-way: the record stays in storage and
    /// its name becomes available for a new keyword.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if the keyword is absent or already
    /// soft-deleted.
    pub async fn soft_delete(&self, id: KeywordId) -> Result<Keyword, CatalogError> {
        self.store
            .soft_delete(id)
            .await?
            .ok_or_else(|| CatalogError::NotFound(format!("keyword with id {id} not found")))
    }
}
