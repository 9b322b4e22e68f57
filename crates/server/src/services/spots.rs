//! Spot lifecycle service.
//!
//! Uniform CRUD plus the spot-side attachment operations. Category and tag
//! attachment follows the same accumulate-dedup pattern as the Tag↔Keyword
//! relation but is simpler: no reconciliation pass runs here, so references
//! to tags soft-deleted after attachment stay on the spot until detached
//! explicitly. Search resolves keyword names through the registry and tag
//! references by fresh lookups, so soft-deletes are visible immediately.

use std::sync::Arc;

use serde::Deserialize;

use trailmark_core::{NameKey, SpotId, TagId};

use crate::models::{Spot, SpotDraft};
use crate::store::{EntityStore, SpotFilter, SpotStore, StoreError, TagStore};

use super::{CatalogError, KeywordRegistry};

/// Search request for spots. The keyword is expanded to the live tags
/// referencing it; all present criteria must match.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpotQuery {
    #[serde(default)]
    pub keyword: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub min_rating: Option<f64>,
}

/// CRUD and attachment operations over spots.
#[derive(Clone)]
pub struct SpotService {
    store: Arc<dyn SpotStore>,
    tags: Arc<dyn TagStore>,
    registry: KeywordRegistry,
}

impl SpotService {
    /// Create a new spot service.
    pub fn new(
        store: Arc<dyn SpotStore>,
        tags: Arc<dyn TagStore>,
        registry: KeywordRegistry,
    ) -> Self {
        Self {
            store,
            tags,
            registry,
        }
    }

    /// All live spots.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if no live spot exists.
    pub async fn get_all(&self) -> Result<Vec<Spot>, CatalogError> {
        let spots = self.store.list_live().await?;
        if spots.is_empty() {
            return Err(CatalogError::NotFound(
                "there are no spots available".to_owned(),
            ));
        }
        Ok(spots)
    }

    /// Live-filtered lookup by id.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if the spot is absent or
    /// soft-deleted.
    pub async fn get_by_id(&self, id: SpotId) -> Result<Spot, CatalogError> {
        self.store
            .find_live(id)
            .await?
            .ok_or_else(|| CatalogError::NotFound(format!("spot with id {id} not found")))
    }

    /// Live-filtered lookup by verbatim name.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if no live spot holds the name.
    pub async fn get_by_name(&self, name: &str) -> Result<Spot, CatalogError> {
        self.store
            .find_live_by_name(name)
            .await?
            .ok_or_else(|| CatalogError::NotFound(format!("spot with name {name} not found")))
    }

    /// A window of live spots in creation order. Page arithmetic lives in
    /// the request layer; an empty window is an empty list, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Storage`] if the store fails.
    pub async fn paginate(&self, offset: i64, limit: i64) -> Result<Vec<Spot>, CatalogError> {
        Ok(self.store.list_live_page(offset, limit).await?)
    }

    /// Search live spots by keyword, category and minimum rating.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if nothing matches (including an
    /// unknown keyword).
    pub async fn search(&self, query: SpotQuery) -> Result<Vec<Spot>, CatalogError> {
        let mut filter = SpotFilter::default();

        if let Some(keyword) = &query.keyword {
            match self.registry.get_by_name(keyword).await {
                Ok(keyword) => {
                    let tags = self.tags.list_live_referencing(keyword.id).await?;
                    filter.tag_ids = Some(tags.into_iter().map(|tag| tag.id).collect());
                }
                // An unknown keyword cannot match any spot.
                Err(CatalogError::NotFound(_)) => {
                    return Err(CatalogError::NotFound(
                        "no spots matched the request".to_owned(),
                    ));
                }
                Err(e) => return Err(e),
            }
        }

        if let Some(category) = &query.category {
            filter.category = Some(NameKey::parse(category)?);
        }
        filter.min_rating = query.min_rating;

        let spots = self.store.search_live(&filter).await?;
        if spots.is_empty() {
            return Err(CatalogError::NotFound(
                "no spots matched the request".to_owned(),
            ));
        }
        Ok(spots)
    }

    /// Create a spot with no categories or tags.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Conflict`] if a live spot already holds the
    /// name.
    pub async fn create(&self, draft: SpotDraft) -> Result<Spot, CatalogError> {
        let name = draft.name.clone();
        match self.store.insert(Spot::new(draft)).await {
            Ok(spot) => Ok(spot),
            Err(StoreError::Conflict(_)) => {
                let existing = self.store.find_live_by_name(&name).await?;
                Err(CatalogError::conflict(
                    "spot",
                    &name,
                    existing.map(|s| s.id.into()),
                ))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Replace a live spot's scalar fields. Categories and tags are managed
    /// through the attach/detach operations and stay untouched.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if the spot is absent or
    /// soft-deleted, [`CatalogError::Conflict`] if the new name is taken.
    pub async fn update(&self, id: SpotId, draft: SpotDraft) -> Result<Spot, CatalogError> {
        let name = draft.name.clone();
        let mut spot = self.get_by_id(id).await?;
        spot.apply(draft);

        match self.store.update_live(spot).await {
            Ok(Some(updated)) => Ok(updated),
            Ok(None) => Err(CatalogError::NotFound(format!(
                "spot with id {id} not found"
            ))),
            Err(StoreError::Conflict(_)) => {
                let existing = self.store.find_live_by_name(&name).await?;
                Err(CatalogError::conflict(
                    "spot",
                    &name,
                    existing.map(|s| s.id.into()),
                ))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Soft-delete a live spot.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if the spot is absent or already
    /// soft-deleted.
    pub async fn soft_delete(&self, id: SpotId) -> Result<Spot, CatalogError> {
        self.store
            .soft_delete(id)
            .await?
            .ok_or_else(|| CatalogError::NotFound(format!("spot with id {id} not found")))
    }

    /// Attach categories by name: normalize each, skip ones already carried
    /// by the spot or repeated in the batch, append the rest in order.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if the spot is absent or
    /// soft-deleted, [`CatalogError::InvalidName`] for an empty name.
    pub async fn add_categories(
        &self,
        id: SpotId,
        names: &[String],
    ) -> Result<Spot, CatalogError> {
        let mut spot = self.get_by_id(id).await?;

        let mut fresh: Vec<NameKey> = Vec::new();
        for name in names {
            let key = NameKey::parse(name)?;
            if spot.categories.contains(&key) || fresh.contains(&key) {
                continue;
            }
            fresh.push(key);
        }

        spot.categories.extend(fresh);
        spot.updated_at = chrono::Utc::now();

        self.store
            .update_live(spot)
            .await?
            .ok_or_else(|| CatalogError::NotFound(format!("spot with id {id} not found")))
    }

    /// Detach one category by name. Detaching a category the spot does not
    /// carry is a no-op on the stored list.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if the spot is absent or
    /// soft-deleted.
    pub async fn remove_category(&self, id: SpotId, name: &str) -> Result<Spot, CatalogError> {
        let key = NameKey::parse(name)?;
        self.store
            .pull_category(id, &key)
            .await?
            .ok_or_else(|| CatalogError::NotFound(format!("spot with id {id} not found")))
    }

    /// Attach tags by name, resolving each through an atomic find-or-create
    /// and deduplicating against the spot's current set and the batch.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if the spot is absent or
    /// soft-deleted, [`CatalogError::InvalidName`] for an empty name.
    pub async fn add_tags(&self, id: SpotId, names: &[String]) -> Result<Spot, CatalogError> {
        let mut spot = self.get_by_id(id).await?;

        let mut fresh: Vec<TagId> = Vec::new();
        for name in names {
            let key = NameKey::parse(name)?;
            let tag = self.tags.upsert_live_by_name(&key).await?;
            if spot.tags.contains(&tag.id) || fresh.contains(&tag.id) {
                continue;
            }
            fresh.push(tag.id);
        }

        spot.tags.extend(fresh);
        spot.updated_at = chrono::Utc::now();

        self.store
            .update_live(spot)
            .await?
            .ok_or_else(|| CatalogError::NotFound(format!("spot with id {id} not found")))
    }

    /// Detach one tag by name, resolved against live tags only.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if no live tag holds the name, or
    /// if the spot is absent or soft-deleted.
    pub async fn remove_tag(&self, id: SpotId, name: &str) -> Result<Spot, CatalogError> {
        let key = NameKey::parse(name)?;
        let tag = self
            .tags
            .find_live_by_name(key.as_str())
            .await?
            .ok_or_else(|| CatalogError::NotFound(format!("tag with name {key} not found")))?;

        self.store
            .pull_tag(id, tag.id)
            .await?
            .ok_or_else(|| CatalogError::NotFound(format!("spot with id {id} not found")))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::models::{ContactInfo, Keyword, Tag};
    use crate::store::MemoryStore;

    use super::*;

    struct Fixture {
        service: SpotService,
        tags: Arc<MemoryStore<Tag>>,
        registry: KeywordRegistry,
    }

    fn fixture() -> Fixture {
        let tags = Arc::new(MemoryStore::<Tag>::new());
        let registry = KeywordRegistry::new(Arc::new(MemoryStore::<Keyword>::new()));
        let service = SpotService::new(
            Arc::new(MemoryStore::<Spot>::new()),
            tags.clone(),
            registry.clone(),
        );
        Fixture {
            service,
            tags,
            registry,
        }
    }

    fn draft(name: &str) -> SpotDraft {
        SpotDraft {
            name: name.to_owned(),
            contact_info: ContactInfo::default(),
            address: "1 Shore Rd".to_owned(),
            pictures: Vec::new(),
            rating: 4.0,
        }
    }

    #[tokio::test]
    async fn test_add_categories_normalizes_and_deduplicates() {
        let fx = fixture();
        let spot = fx.service.create(draft("North Pier")).await.unwrap();

        let updated = fx
            .service
            .add_categories(
                spot.id,
                &["Viewpoint".to_owned(), "viewpoint".to_owned(), "Food".to_owned()],
            )
            .await
            .unwrap();
        assert_eq!(updated.categories.len(), 2);

        let again = fx
            .service
            .add_categories(spot.id, &["FOOD".to_owned()])
            .await
            .unwrap();
        assert_eq!(again.categories.len(), 2);
    }

    #[tokio::test]
    async fn test_remove_category_by_any_casing() {
        let fx = fixture();
        let spot = fx.service.create(draft("North Pier")).await.unwrap();
        fx.service
            .add_categories(spot.id, &["Viewpoint".to_owned()])
            .await
            .unwrap();

        let updated = fx
            .service
            .remove_category(spot.id, "VIEWPOINT")
            .await
            .unwrap();
        assert!(updated.categories.is_empty());
    }

    #[tokio::test]
    async fn test_add_tags_creates_missing_tags_once() {
        let fx = fixture();
        let spot = fx.service.create(draft("North Pier")).await.unwrap();

        let updated = fx
            .service
            .add_tags(spot.id, &["Coastal".to_owned(), "coastal".to_owned()])
            .await
            .unwrap();
        assert_eq!(updated.tags.len(), 1);

        let all_tags = fx.tags.list_live().await.unwrap();
        assert_eq!(all_tags.len(), 1);
    }

    #[tokio::test]
    async fn test_remove_tag_is_scoped_to_target_spot() {
        let fx = fixture();
        let first = fx.service.create(draft("North Pier")).await.unwrap();
        let second = fx.service.create(draft("South Pier")).await.unwrap();

        fx.service
            .add_tags(first.id, &["coastal".to_owned()])
            .await
            .unwrap();
        fx.service
            .add_tags(second.id, &["coastal".to_owned()])
            .await
            .unwrap();

        let updated = fx.service.remove_tag(first.id, "coastal").await.unwrap();
        assert!(updated.tags.is_empty());

        let untouched = fx.service.get_by_id(second.id).await.unwrap();
        assert_eq!(untouched.tags.len(), 1);
    }

    #[tokio::test]
    async fn test_search_by_keyword_walks_tag_references() {
        let fx = fixture();
        let spot = fx.service.create(draft("North Pier")).await.unwrap();
        fx.service
            .add_tags(spot.id, &["coastal".to_owned()])
            .await
            .unwrap();

        // Attach the keyword to the tag the spot references.
        let tag = fx.tags.find_live_by_name("coastal").await.unwrap().unwrap();
        let keyword = fx.registry.find_or_create("sunset").await.unwrap();
        let mut tagged = tag.clone();
        tagged.keywords.push(keyword.id);
        fx.tags.update_live(tagged).await.unwrap();

        let found = fx
            .service
            .search(SpotQuery {
                keyword: Some("Sunset".to_owned()),
                ..SpotQuery::default()
            })
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found.first().map(|s| s.id), Some(spot.id));
    }

    #[tokio::test]
    async fn test_search_unknown_keyword_is_not_found() {
        let fx = fixture();
        fx.service.create(draft("North Pier")).await.unwrap();

        assert!(matches!(
            fx.service
                .search(SpotQuery {
                    keyword: Some("nonexistent".to_owned()),
                    ..SpotQuery::default()
                })
                .await,
            Err(CatalogError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_search_filters_by_category_and_rating() {
        let fx = fixture();
        let pier = fx.service.create(draft("North Pier")).await.unwrap();
        fx.service
            .add_categories(pier.id, &["food".to_owned()])
            .await
            .unwrap();

        let mut low = draft("Quiet Cove");
        low.rating = 2.0;
        let cove = fx.service.create(low).await.unwrap();
        fx.service
            .add_categories(cove.id, &["food".to_owned()])
            .await
            .unwrap();

        let found = fx
            .service
            .search(SpotQuery {
                category: Some("Food".to_owned()),
                min_rating: Some(3.0),
                ..SpotQuery::default()
            })
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found.first().map(|s| s.id), Some(pier.id));
    }

    #[tokio::test]
    async fn test_paginate_windows_live_spots() {
        let fx = fixture();
        for i in 0..5 {
            fx.service.create(draft(&format!("Spot {i}"))).await.unwrap();
        }

        let page = fx.service.paginate(2, 2).await.unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(
            page.iter().map(|s| s.name.as_str()).collect::<Vec<_>>(),
            vec!["Spot 2", "Spot 3"]
        );

        let past_end = fx.service.paginate(10, 2).await.unwrap();
        assert!(past_end.is_empty());
    }
}
