//! Tag↔Keyword relation manager.
//!
//! Maintains the weak many-to-many association between tags and keywords:
//! resolves requested names to live keywords (creating them on first use),
//! suppresses duplicate associations, and lazily prunes references to
//! keywords that have been soft-deleted since they were attached.
//!
//! The append-and-cleanup flow is deliberately not atomic across its steps.
//! Concurrent `add_keywords` calls on the same tag may interleave and
//! transiently duplicate or leave dangling references; the data converges on
//! the next pass instead of paying for a distributed lock. Keyword identity
//! itself is never racy: it is enforced by the store's conditional upsert.

use std::sync::Arc;

use chrono::Utc;

use trailmark_core::{KeywordId, TagId};

use crate::models::Tag;
use crate::store::{EntityStore, TagStore};

use super::{CatalogError, KeywordRegistry};

/// The Tag↔Keyword consistency engine.
#[derive(Clone)]
pub struct RelationManager {
    tags: Arc<dyn TagStore>,
    registry: KeywordRegistry,
}

impl RelationManager {
    /// Create a new relation manager.
    pub fn new(tags: Arc<dyn TagStore>, registry: KeywordRegistry) -> Self {
        Self { tags, registry }
    }

    /// Attach a batch of keywords to a tag by name.
    ///
    /// Every requested name is resolved through the registry in input order,
    /// creating missing keywords as a side effect - even for names that turn
    /// out to duplicate an existing association; creation is not rolled back.
    /// Only ids novel to both the tag's current association list and the
    /// current batch are appended, preserving order.
    ///
    /// Before returning, a best-effort reconciliation pass prunes references
    /// to soft-deleted keywords from the stored tag. The returned tag
    /// reflects the appended state, not the cleanup: callers must rely on
    /// storage, not the return value, for the pruned list.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if the tag is absent or
    /// soft-deleted, [`CatalogError::InvalidName`] for an empty keyword name.
    pub async fn add_keywords(&self, tag_id: TagId, names: &[String]) -> Result<Tag, CatalogError> {
        let Some(mut tag) = self.tags.find_live(tag_id).await? else {
            return Err(CatalogError::NotFound(format!(
                "tag with id {tag_id} not found"
            )));
        };

        let mut fresh: Vec<KeywordId> = Vec::new();
        for name in names {
            let keyword = self.registry.find_or_create(name).await?;

            // Skip ids already associated, and ids repeated inside this batch.
            if tag.keywords.contains(&keyword.id) || fresh.contains(&keyword.id) {
                continue;
            }
            fresh.push(keyword.id);
        }

        tag.keywords.extend(fresh);
        tag.updated_at = Utc::now();

        let Some(stored) = self.tags.update_live(tag).await? else {
            // The tag was soft-deleted between the load and the save.
            return Err(CatalogError::NotFound(format!(
                "tag with id {tag_id} not found"
            )));
        };

        self.prune_deleted_keywords(&stored).await;

        Ok(stored)
    }

    /// Detach one keyword from a tag by name.
    ///
    /// The keyword is resolved independently of the tag, so a keyword shared
    /// by several tags is only detached from the targeted one.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if no live keyword holds the name,
    /// or if the tag is absent or soft-deleted.
    pub async fn remove_keyword(
        &self,
        tag_id: TagId,
        keyword_name: &str,
    ) -> Result<Tag, CatalogError> {
        let keyword = self.registry.get_by_name(keyword_name).await?;

        let Some(tag) = self.tags.pull_keyword(tag_id, keyword.id).await? else {
            return Err(CatalogError::NotFound(format!(
                "tag with id {tag_id} not found"
            )));
        };

        Ok(tag)
    }

    /// Prune references to soft-deleted keywords from a tag's stored
    /// association list.
    ///
    /// Each reference is checked with a raw (soft-delete-bypassing) lookup
    /// and removed with an independent filtered pull, idempotent on its own.
    /// Failures are swallowed per item: reconciliation must never fail the
    /// call that triggered it.
    async fn prune_deleted_keywords(&self, tag: &Tag) {
        for &keyword_id in &tag.keywords {
            match self.registry.find_by_id_including_deleted(keyword_id).await {
                Ok(keyword) if keyword.deleted_at.is_some() => {
                    if let Err(error) = self.tags.pull_keyword(tag.id, keyword_id).await {
                        tracing::warn!(
                            tag_id = %tag.id,
                            %keyword_id,
                            %error,
                            "failed to prune soft-deleted keyword reference"
                        );
                    }
                }
                Ok(_) => {}
                // Keywords are never hard-deleted; an unresolvable id is left
                // for a later pass rather than treated as prunable here.
                Err(CatalogError::NotFound(_)) => {}
                Err(error) => {
                    tracing::warn!(
                        tag_id = %tag.id,
                        %keyword_id,
                        %error,
                        "failed to inspect keyword reference during cleanup"
                    );
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use trailmark_core::NameKey;

    use crate::models::Keyword;
    use crate::store::MemoryStore;

    use super::*;

    struct Fixture {
        manager: RelationManager,
        tags: Arc<MemoryStore<Tag>>,
        keywords: Arc<MemoryStore<Keyword>>,
    }

    fn fixture() -> Fixture {
        let tags = Arc::new(MemoryStore::<Tag>::new());
        let keywords = Arc::new(MemoryStore::<Keyword>::new());
        let registry = KeywordRegistry::new(keywords.clone());
        let manager = RelationManager::new(tags.clone(), registry);
        Fixture {
            manager,
            tags,
            keywords,
        }
    }

    async fn create_tag(store: &MemoryStore<Tag>, name: &str) -> Tag {
        store
            .insert(Tag::new(NameKey::parse(name).unwrap()))
            .await
            .unwrap()
    }

    fn names(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|&s| s.to_owned()).collect()
    }

    #[tokio::test]
    async fn test_add_keywords_creates_and_deduplicates() {
        let fx = fixture();
        let tag = create_tag(&fx.tags, "outdoor").await;

        // "Hiking" and "hiking" are the same keyword; "Camping" is new.
        let updated = fx
            .manager
            .add_keywords(tag.id, &names(&["Hiking", "hiking", "Camping"]))
            .await
            .unwrap();

        assert_eq!(updated.keywords.len(), 2);

        let hiking = fx.keywords.find_live_by_name("hiking").await.unwrap().unwrap();
        let camping = fx.keywords.find_live_by_name("camping").await.unwrap().unwrap();
        assert_eq!(updated.keywords, vec![hiking.id, camping.id]);
    }

    #[tokio::test]
    async fn test_add_keywords_skips_already_associated() {
        let fx = fixture();
        let tag = create_tag(&fx.tags, "outdoor").await;

        fx.manager
            .add_keywords(tag.id, &names(&["Hiking", "hiking", "Camping"]))
            .await
            .unwrap();

        let updated = fx
            .manager
            .add_keywords(tag.id, &names(&["camping"]))
            .await
            .unwrap();

        assert_eq!(updated.keywords.len(), 2);
    }

    #[tokio::test]
    async fn test_add_keywords_never_duplicates_across_any_sequence() {
        let fx = fixture();
        let tag = create_tag(&fx.tags, "coastal").await;

        fx.manager
            .add_keywords(tag.id, &names(&["surf", "Sand"]))
            .await
            .unwrap();
        fx.manager
            .add_keywords(tag.id, &names(&["SAND", "surf", "rocks"]))
            .await
            .unwrap();
        let stored = fx.tags.find_live(tag.id).await.unwrap().unwrap();

        let mut seen = stored.keywords.clone();
        seen.sort_unstable_by_key(|id| id.as_uuid());
        seen.dedup();
        assert_eq!(seen.len(), stored.keywords.len());
        assert_eq!(stored.keywords.len(), 3);
    }

    #[tokio::test]
    async fn test_empty_batch_prunes_soft_deleted_references() {
        let fx = fixture();
        let tag = create_tag(&fx.tags, "outdoor").await;

        fx.manager
            .add_keywords(tag.id, &names(&["Hiking", "Camping"]))
            .await
            .unwrap();

        let camping = fx.keywords.find_live_by_name("camping").await.unwrap().unwrap();
        fx.keywords.soft_delete(camping.id).await.unwrap();

        // An empty batch still runs the reconciliation pass.
        fx.manager.add_keywords(tag.id, &[]).await.unwrap();

        let hiking = fx.keywords.find_live_by_name("hiking").await.unwrap().unwrap();
        let stored = fx.tags.find_live(tag.id).await.unwrap().unwrap();
        assert_eq!(stored.keywords, vec![hiking.id]);
    }

    #[tokio::test]
    async fn test_returned_tag_does_not_reflect_cleanup() {
        let fx = fixture();
        let tag = create_tag(&fx.tags, "outdoor").await;

        fx.manager
            .add_keywords(tag.id, &names(&["Camping"]))
            .await
            .unwrap();
        let camping = fx.keywords.find_live_by_name("camping").await.unwrap().unwrap();
        fx.keywords.soft_delete(camping.id).await.unwrap();

        // The call's return value carries the appended state; only storage
        // is guaranteed to converge.
        let returned = fx.manager.add_keywords(tag.id, &[]).await.unwrap();
        assert_eq!(returned.keywords, vec![camping.id]);

        let stored = fx.tags.find_live(tag.id).await.unwrap().unwrap();
        assert!(stored.keywords.is_empty());
    }

    #[tokio::test]
    async fn test_readding_name_of_deleted_keyword_attaches_new_record() {
        let fx = fixture();
        let tag = create_tag(&fx.tags, "outdoor").await;

        fx.manager
            .add_keywords(tag.id, &names(&["camping"]))
            .await
            .unwrap();
        let old = fx.keywords.find_live_by_name("camping").await.unwrap().unwrap();
        fx.keywords.soft_delete(old.id).await.unwrap();

        let updated = fx
            .manager
            .add_keywords(tag.id, &names(&["camping"]))
            .await
            .unwrap();

        let new = fx.keywords.find_live_by_name("camping").await.unwrap().unwrap();
        assert_ne!(new.id, old.id);
        assert!(updated.keywords.contains(&new.id));

        // The stale reference is pruned from storage by the same call.
        let stored = fx.tags.find_live(tag.id).await.unwrap().unwrap();
        assert_eq!(stored.keywords, vec![new.id]);
    }

    #[tokio::test]
    async fn test_remove_keyword_is_scoped_to_target_tag() {
        let fx = fixture();
        let tag_a = create_tag(&fx.tags, "coastal").await;
        let tag_b = create_tag(&fx.tags, "evening").await;

        fx.manager
            .add_keywords(tag_a.id, &names(&["sunset"]))
            .await
            .unwrap();
        fx.manager
            .add_keywords(tag_b.id, &names(&["sunset"]))
            .await
            .unwrap();
        let sunset = fx.keywords.find_live_by_name("sunset").await.unwrap().unwrap();

        let updated_a = fx.manager.remove_keyword(tag_a.id, "Sunset").await.unwrap();
        assert!(updated_a.keywords.is_empty());

        let stored_b = fx.tags.find_live(tag_b.id).await.unwrap().unwrap();
        assert_eq!(stored_b.keywords, vec![sunset.id]);
    }

    #[tokio::test]
    async fn test_remove_keyword_unknown_name_is_not_found() {
        let fx = fixture();
        let tag = create_tag(&fx.tags, "outdoor").await;

        assert!(matches!(
            fx.manager.remove_keyword(tag.id, "nonexistent").await,
            Err(CatalogError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_add_keywords_to_missing_or_deleted_tag_is_not_found() {
        let fx = fixture();

        assert!(matches!(
            fx.manager
                .add_keywords(TagId::generate(), &names(&["hiking"]))
                .await,
            Err(CatalogError::NotFound(_))
        ));

        let tag = create_tag(&fx.tags, "outdoor").await;
        fx.tags.soft_delete(tag.id).await.unwrap();
        assert!(matches!(
            fx.manager.add_keywords(tag.id, &names(&["hiking"])).await,
            Err(CatalogError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_duplicate_name_in_batch_still_creates_keyword_once() {
        let fx = fixture();
        let tag = create_tag(&fx.tags, "outdoor").await;

        fx.manager
            .add_keywords(tag.id, &names(&["Kayak", "kayak", "KAYAK"]))
            .await
            .unwrap();

        let all = fx.keywords.list_live().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all.first().map(|k| k.name.as_str()), Some("kayak"));
    }
}
