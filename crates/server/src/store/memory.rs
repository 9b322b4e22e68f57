//! In-memory store implementation.
//!
//! Backs the test suites; behaviorally equivalent to the Postgres store.
//! Every mutating operation runs inside a single write-lock critical section,
//! which is the in-process equivalent of the database's conditional
//! upsert/update: there is no window between the existence check and the
//! write.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::Utc;

use trailmark_core::{KeywordId, NameKey, SpotId, TagId};

use crate::models::{CatalogEntity, Keyword, Spot, Tag};

use super::{EntityStore, KeywordStore, SpotFilter, SpotStore, StoreError, TagStore};

/// In-memory collection of one entity type, in insertion order.
#[derive(Debug, Default)]
pub struct MemoryStore<E> {
    rows: RwLock<Vec<E>>,
}

impl<E> MemoryStore<E> {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<E>> {
        self.rows.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<E>> {
        self.rows.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn live_name_taken<E: CatalogEntity>(rows: &[E], name: &str, except: Option<E::Id>) -> bool {
    rows.iter()
        .any(|row| row.is_live() && row.name() == name && Some(row.id()) != except)
}

#[async_trait]
impl<E: CatalogEntity> EntityStore<E> for MemoryStore<E> {
    async fn insert(&self, entity: E) -> Result<E, StoreError> {
        let mut rows = self.write();
        if live_name_taken(&rows, entity.name(), None) {
            return Err(StoreError::Conflict(format!(
                "live record named {} already exists",
                entity.name()
            )));
        }
        rows.push(entity.clone());
        Ok(entity)
    }

    async fn find_by_id(&self, id: E::Id) -> Result<Option<E>, StoreError> {
        Ok(self.read().iter().find(|row| row.id() == id).cloned())
    }

    async fn find_live(&self, id: E::Id) -> Result<Option<E>, StoreError> {
        Ok(self
            .read()
            .iter()
            .find(|row| row.id() == id && row.is_live())
            .cloned())
    }

    async fn find_live_by_name(&self, name: &str) -> Result<Option<E>, StoreError> {
        Ok(self
            .read()
            .iter()
            .find(|row| row.is_live() && row.name() == name)
            .cloned())
    }

    async fn list_live(&self) -> Result<Vec<E>, StoreError> {
        Ok(self
            .read()
            .iter()
            .filter(|row| row.is_live())
            .cloned()
            .collect())
    }

    async fn update_live(&self, entity: E) -> Result<Option<E>, StoreError> {
        let mut rows = self.write();
        if live_name_taken(&rows, entity.name(), Some(entity.id())) {
            return Err(StoreError::Conflict(format!(
                "live record named {} already exists",
                entity.name()
            )));
        }
        match rows
            .iter_mut()
            .find(|row| row.id() == entity.id() && row.is_live())
        {
            Some(row) => {
                *row = entity.clone();
                Ok(Some(entity))
            }
            None => Ok(None),
        }
    }

    async fn soft_delete(&self, id: E::Id) -> Result<Option<E>, StoreError> {
        let mut rows = self.write();
        match rows.iter_mut().find(|row| row.id() == id && row.is_live()) {
            Some(row) => {
                row.mark_deleted(Utc::now());
                Ok(Some(row.clone()))
            }
            None => Ok(None),
        }
    }
}

#[async_trait]
impl KeywordStore for MemoryStore<Keyword> {
    async fn upsert_live_by_name(&self, name: &NameKey) -> Result<Keyword, StoreError> {
        let mut rows = self.write();
        if let Some(existing) = rows
            .iter()
            .find(|row| row.is_live() && row.name.as_str() == name.as_str())
        {
            return Ok(existing.clone());
        }
        let keyword = Keyword::new(name.clone());
        rows.push(keyword.clone());
        Ok(keyword)
    }
}

#[async_trait]
impl TagStore for MemoryStore<Tag> {
    async fn upsert_live_by_name(&self, name: &NameKey) -> Result<Tag, StoreError> {
        let mut rows = self.write();
        if let Some(existing) = rows
            .iter()
            .find(|row| row.is_live() && row.name.as_str() == name.as_str())
        {
            return Ok(existing.clone());
        }
        let tag = Tag::new(name.clone());
        rows.push(tag.clone());
        Ok(tag)
    }

    async fn pull_keyword(&self, id: TagId, keyword: KeywordId) -> Result<Option<Tag>, StoreError> {
        let mut rows = self.write();
        match rows.iter_mut().find(|row| row.id == id && row.is_live()) {
            Some(row) => {
                row.keywords.retain(|&existing| existing != keyword);
                row.updated_at = Utc::now();
                Ok(Some(row.clone()))
            }
            None => Ok(None),
        }
    }

    async fn list_live_referencing(&self, keyword: KeywordId) -> Result<Vec<Tag>, StoreError> {
        Ok(self
            .read()
            .iter()
            .filter(|row| row.is_live() && row.keywords.contains(&keyword))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl SpotStore for MemoryStore<Spot> {
    async fn pull_category(
        &self,
        id: SpotId,
        category: &NameKey,
    ) -> Result<Option<Spot>, StoreError> {
        let mut rows = self.write();
        match rows.iter_mut().find(|row| row.id == id && row.is_live()) {
            Some(row) => {
                row.categories.retain(|existing| existing != category);
                row.updated_at = Utc::now();
                Ok(Some(row.clone()))
            }
            None => Ok(None),
        }
    }

    async fn pull_tag(&self, id: SpotId, tag: TagId) -> Result<Option<Spot>, StoreError> {
        let mut rows = self.write();
        match rows.iter_mut().find(|row| row.id == id && row.is_live()) {
            Some(row) => {
                row.tags.retain(|&existing| existing != tag);
                row.updated_at = Utc::now();
                Ok(Some(row.clone()))
            }
            None => Ok(None),
        }
    }

    async fn list_live_page(&self, offset: i64, limit: i64) -> Result<Vec<Spot>, StoreError> {
        let offset = usize::try_from(offset).unwrap_or(0);
        let limit = usize::try_from(limit).unwrap_or(0);
        Ok(self
            .read()
            .iter()
            .filter(|row| row.is_live())
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn search_live(&self, filter: &SpotFilter) -> Result<Vec<Spot>, StoreError> {
        Ok(self
            .read()
            .iter()
            .filter(|row| row.is_live() && matches_filter(row, filter))
            .cloned()
            .collect())
    }
}

fn matches_filter(spot: &Spot, filter: &SpotFilter) -> bool {
    if let Some(tag_ids) = &filter.tag_ids
        && !spot.tags.iter().any(|tag| tag_ids.contains(tag))
    {
        return false;
    }
    if let Some(category) = &filter.category
        && !spot.categories.contains(category)
    {
        return false;
    }
    if let Some(min_rating) = filter.min_rating
        && spot.rating < min_rating
    {
        return false;
    }
    true
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use trailmark_core::NameKey;

    use super::*;

    fn name(raw: &str) -> NameKey {
        NameKey::parse(raw).unwrap()
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicate_live_name() {
        let store = MemoryStore::<Keyword>::new();
        store.insert(Keyword::new(name("beach"))).await.unwrap();

        let err = store.insert(Keyword::new(name("beach"))).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_insert_allows_name_of_soft_deleted_record() {
        let store = MemoryStore::<Keyword>::new();
        let first = store.insert(Keyword::new(name("beach"))).await.unwrap();
        store.soft_delete(first.id).await.unwrap();

        assert!(store.insert(Keyword::new(name("beach"))).await.is_ok());
    }

    #[tokio::test]
    async fn test_upsert_returns_existing_live_keyword() {
        let store = MemoryStore::<Keyword>::new();
        let first = store.upsert_live_by_name(&name("ocean")).await.unwrap();
        let second = store.upsert_live_by_name(&name("ocean")).await.unwrap();
        assert_eq!(first.id, second.id);
    }

    #[tokio::test]
    async fn test_upsert_skips_soft_deleted_keyword() {
        let store = MemoryStore::<Keyword>::new();
        let first = store.upsert_live_by_name(&name("ocean")).await.unwrap();
        store.soft_delete(first.id).await.unwrap();

        let second = store.upsert_live_by_name(&name("ocean")).await.unwrap();
        assert_ne!(first.id, second.id);
    }

    #[tokio::test]
    async fn test_soft_delete_hides_from_live_lookups_only() {
        let store = MemoryStore::<Keyword>::new();
        let keyword = store.insert(Keyword::new(name("sunset"))).await.unwrap();
        store.soft_delete(keyword.id).await.unwrap();

        assert!(store.find_live(keyword.id).await.unwrap().is_none());
        assert!(store.find_live_by_name("sunset").await.unwrap().is_none());

        let raw = store.find_by_id(keyword.id).await.unwrap().unwrap();
        assert!(raw.deleted_at.is_some());
    }

    #[tokio::test]
    async fn test_soft_delete_twice_is_rejected() {
        let store = MemoryStore::<Keyword>::new();
        let keyword = store.insert(Keyword::new(name("sunset"))).await.unwrap();

        assert!(store.soft_delete(keyword.id).await.unwrap().is_some());
        assert!(store.soft_delete(keyword.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_pull_keyword_requires_live_tag() {
        let store = MemoryStore::<Tag>::new();
        let keyword_id = KeywordId::generate();
        let mut tag = Tag::new(name("outdoor"));
        tag.keywords.push(keyword_id);
        let tag = store.insert(tag).await.unwrap();

        let pulled = store.pull_keyword(tag.id, keyword_id).await.unwrap().unwrap();
        assert!(pulled.keywords.is_empty());

        store.soft_delete(tag.id).await.unwrap();
        assert!(store.pull_keyword(tag.id, keyword_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_live_rejects_name_collision() {
        let store = MemoryStore::<Tag>::new();
        store.insert(Tag::new(name("outdoor"))).await.unwrap();
        let other = store.insert(Tag::new(name("indoor"))).await.unwrap();

        let mut renamed = other.clone();
        renamed.name = name("outdoor");
        let err = store.update_live(renamed).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }
}
