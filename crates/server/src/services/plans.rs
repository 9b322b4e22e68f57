//! Plan lifecycle service.
//!
//! Plans carry no relation logic; this is the uniform soft-delete-aware CRUD
//! contract applied to an independent entity. Plan names are natural keys
//! compared verbatim.

use std::sync::Arc;

use trailmark_core::PlanId;

use crate::models::{Plan, PlanDraft};
use crate::store::{EntityStore, StoreError};

use super::CatalogError;

/// CRUD over plans.
#[derive(Clone)]
pub struct PlanService {
    store: Arc<dyn EntityStore<Plan>>,
}

impl PlanService {
    /// Create a new plan service.
    pub fn new(store: Arc<dyn EntityStore<Plan>>) -> Self {
        Self { store }
    }

    /// All live plans.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if no live plan exists.
    pub async fn get_all(&self) -> Result<Vec<Plan>, CatalogError> {
        let plans = self.store.list_live().await?;
        if plans.is_empty() {
            return Err(CatalogError::NotFound("plans not found".to_owned()));
        }
        Ok(plans)
    }

    /// Live-filtered lookup by id.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if the plan is absent or
    /// soft-deleted.
    pub async fn get_by_id(&self, id: PlanId) -> Result<Plan, CatalogError> {
        self.store
            .find_live(id)
            .await?
            .ok_or_else(|| CatalogError::NotFound(format!("plan with id {id} not found")))
    }

    /// Live-filtered lookup by verbatim name.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if no live plan holds the name.
    pub async fn get_by_name(&self, name: &str) -> Result<Plan, CatalogError> {
        self.store
            .find_live_by_name(name)
            .await?
            .ok_or_else(|| CatalogError::NotFound(format!("plan with name {name} not found")))
    }

    /// Create a plan.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Conflict`] if a live plan already holds the
    /// name.
    pub async fn create(&self, draft: PlanDraft) -> Result<Plan, CatalogError> {
        let name = draft.name.clone();
        match self.store.insert(Plan::new(draft)).await {
            Ok(plan) => Ok(plan),
            Err(StoreError::Conflict(_)) => {
                let existing = self.store.find_live_by_name(&name).await?;
                Err(CatalogError::conflict(
                    "plan",
                    &name,
                    existing.map(|p| p.id.into()),
                ))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Replace a live plan's fields.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if the plan is absent or
    /// soft-deleted, [`CatalogError::Conflict`] if the new name is taken.
    pub async fn update(&self, id: PlanId, draft: PlanDraft) -> Result<Plan, CatalogError> {
        let name = draft.name.clone();
        let mut plan = self.get_by_id(id).await?;
        plan.apply(draft);

        match self.store.update_live(plan).await {
            Ok(Some(updated)) => Ok(updated),
            Ok(None) => Err(CatalogError::NotFound(format!(
                "plan with id {id} not found"
            ))),
            Err(StoreError::Conflict(_)) => {
                let existing = self.store.find_live_by_name(&name).await?;
                Err(CatalogError::conflict(
                    "plan",
                    &name,
                    existing.map(|p| p.id.into()),
                ))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Soft-delete a live plan.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if the plan is absent or already
    /// soft-deleted.
    pub async fn soft_delete(&self, id: PlanId) -> Result<Plan, CatalogError> {
        self.store
            .soft_delete(id)
            .await?
            .ok_or_else(|| CatalogError::NotFound(format!("plan with id {id} not found")))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::store::MemoryStore;

    use super::*;

    fn service() -> PlanService {
        PlanService::new(Arc::new(MemoryStore::<Plan>::new()))
    }

    fn draft(name: &str) -> PlanDraft {
        PlanDraft {
            name: name.to_owned(),
            description: None,
        }
    }

    #[tokio::test]
    async fn test_plan_names_are_compared_verbatim() {
        let service = service();
        service.create(draft("Weekend Trip")).await.unwrap();

        // Unlike tags and keywords, plan names are not normalized.
        assert!(service.create(draft("weekend trip")).await.is_ok());
        assert!(matches!(
            service.get_by_name("WEEKEND TRIP").await,
            Err(CatalogError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_create_conflict_carries_existing_id() {
        let service = service();
        let existing = service.create(draft("Coast Loop")).await.unwrap();

        let err = service.create(draft("Coast Loop")).await.unwrap_err();
        match err {
            CatalogError::Conflict { existing_id, .. } => {
                assert_eq!(existing_id, Some(existing.id.into()));
            }
            other => panic!("expected conflict, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_update_replaces_fields() {
        let service = service();
        let plan = service.create(draft("Coast Loop")).await.unwrap();

        let updated = service
            .update(
                plan.id,
                PlanDraft {
                    name: "Coast Loop v2".to_owned(),
                    description: Some("two days".to_owned()),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.id, plan.id);
        assert_eq!(updated.name, "Coast Loop v2");
        assert_eq!(updated.description.as_deref(), Some("two days"));
    }

    #[tokio::test]
    async fn test_soft_delete_is_one_way() {
        let service = service();
        let plan = service.create(draft("Coast Loop")).await.unwrap();

        let deleted = service.soft_delete(plan.id).await.unwrap();
        assert!(deleted.deleted_at.is_some());

        assert!(matches!(
            service.soft_delete(plan.id).await,
            Err(CatalogError::NotFound(_))
        ));
        assert!(matches!(
            service.get_by_id(plan.id).await,
            Err(CatalogError::NotFound(_))
        ));
    }
}
