//! Tag lifecycle service.

use std::sync::Arc;

use trailmark_core::{NameKey, TagId};

use crate::models::Tag;
use crate::store::{EntityStore, StoreError, TagStore};

use super::{CatalogError, KeywordRegistry, RelationManager};

/// CRUD over tags plus the keyword relation operations.
#[derive(Clone)]
pub struct TagService {
    store: Arc<dyn TagStore>,
    relations: RelationManager,
}

impl TagService {
    /// Create a new tag service wired to the keyword registry.
    pub fn new(store: Arc<dyn TagStore>, registry: KeywordRegistry) -> Self {
        let relations = RelationManager::new(store.clone(), registry);
        Self { store, relations }
    }

    /// All live tags.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if no live tag exists.
    pub async fn get_all(&self) -> Result<Vec<Tag>, CatalogError> {
        let tags = self.store.list_live().await?;
        if tags.is_empty() {
            return Err(CatalogError::NotFound(
                "there are no tags available".to_owned(),
            ));
        }
        Ok(tags)
    }

    /// Live-filtered lookup by id.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if the tag is absent or
    /// soft-deleted.
    pub async fn get_by_id(&self, id: TagId) -> Result<Tag, CatalogError> {
        self.store
            .find_live(id)
            .await?
            .ok_or_else(|| CatalogError::NotFound(format!("tag with id {id} not found")))
    }

    /// Live-filtered lookup by raw name (normalized before the lookup).
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if no live tag holds the name.
    pub async fn get_by_name(&self, name: &str) -> Result<Tag, CatalogError> {
        let key = NameKey::parse(name)?;
        self.store
            .find_live_by_name(key.as_str())
            .await?
            .ok_or_else(|| CatalogError::NotFound(format!("tag with name {key} not found")))
    }

    /// Create a tag with no keyword associations.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Conflict`] if a live tag already holds the
    /// normalized name.
    pub async fn create(&self, name: &str) -> Result<Tag, CatalogError> {
        let key = NameKey::parse(name)?;
        match self.store.insert(Tag::new(key.clone())).await {
            Ok(tag) => Ok(tag),
            Err(StoreError::Conflict(_)) => {
                let existing = self.store.find_live_by_name(key.as_str()).await?;
                Err(CatalogError::conflict(
                    "tag",
                    key.as_str(),
                    existing.map(|t| t.id.into()),
                ))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Rename a live tag. Keyword associations are untouched.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if the tag is absent or
    /// soft-deleted, [`CatalogError::Conflict`] if the new name is taken.
    pub async fn update(&self, id: TagId, name: &str) -> Result<Tag, CatalogError> {
        let key = NameKey::parse(name)?;
        let mut tag = self.get_by_id(id).await?;
        tag.name = key.clone();
        tag.updated_at = chrono::Utc::now();

        match self.store.update_live(tag).await {
            Ok(Some(updated)) => Ok(updated),
            Ok(None) => Err(CatalogError::NotFound(format!("tag with id {id} not found"))),
            Err(StoreError::Conflict(_)) => {
                let existing = self.store.find_live_by_name(key.as_str()).await?;
                Err(CatalogError::conflict(
                    "tag",
                    key.as_str(),
                    existing.map(|t| t.id.into()),
                ))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Soft-delete a live tag. Its keyword associations are kept on the
    /// record; the referenced keywords themselves are independent.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if the tag is absent or already
    /// soft-deleted.
    pub async fn soft_delete(&self, id: TagId) -> Result<Tag, CatalogError> {
        self.store
            .soft_delete(id)
            .await?
            .ok_or_else(|| CatalogError::NotFound(format!("tag with id {id} not found")))
    }

    /// Attach keywords by name. See [`RelationManager::add_keywords`].
    ///
    /// # Errors
    ///
    /// See [`RelationManager::add_keywords`].
    pub async fn add_keywords(&self, id: TagId, names: &[String]) -> Result<Tag, CatalogError> {
        self.relations.add_keywords(id, names).await
    }

    /// Detach one keyword by name. See [`RelationManager::remove_keyword`].
    ///
    /// # Errors
    ///
    /// See [`RelationManager::remove_keyword`].
    pub async fn remove_keyword(&self, id: TagId, name: &str) -> Result<Tag, CatalogError> {
        self.relations.remove_keyword(id, name).await
    }
}
