//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::CatalogConfig;
use crate::models::{Keyword, Plan, Spot, Tag};
use crate::services::{KeywordRegistry, PlanService, SpotService, TagService};
use crate::store::{
    EntityStore, KeywordStore, MemoryStore, PgKeywordStore, PgPlanStore, PgSpotStore, PgTagStore,
    SpotStore, TagStore,
};

/// Store handles for every entity, behind the adapter traits.
///
/// Services only see these trait objects; swapping the backend (Postgres in
/// production, in-memory in tests) is a wiring decision made here.
#[derive(Clone)]
pub struct CatalogStores {
    pub keywords: Arc<dyn KeywordStore>,
    pub tags: Arc<dyn TagStore>,
    pub plans: Arc<dyn EntityStore<Plan>>,
    pub spots: Arc<dyn SpotStore>,
}

impl CatalogStores {
    /// Stores backed by the `PostgreSQL` pool.
    #[must_use]
    pub fn postgres(pool: &PgPool) -> Self {
        Self {
            keywords: Arc::new(PgKeywordStore::new(pool.clone())),
            tags: Arc::new(PgTagStore::new(pool.clone())),
            plans: Arc::new(PgPlanStore::new(pool.clone())),
            spots: Arc::new(PgSpotStore::new(pool.clone())),
        }
    }

    /// Empty in-process stores.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            keywords: Arc::new(MemoryStore::<Keyword>::new()),
            tags: Arc::new(MemoryStore::<Tag>::new()),
            plans: Arc::new(MemoryStore::<Plan>::new()),
            spots: Arc::new(MemoryStore::<Spot>::new()),
        }
    }
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// configured services.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: CatalogConfig,
    pool: Option<PgPool>,
    keywords: KeywordRegistry,
    tags: TagService,
    plans: PlanService,
    spots: SpotService,
}

impl AppState {
    /// Wire the services over a set of stores.
    #[must_use]
    pub fn new(config: CatalogConfig, pool: Option<PgPool>, stores: CatalogStores) -> Self {
        let keywords = KeywordRegistry::new(stores.keywords);
        let tags = TagService::new(stores.tags.clone(), keywords.clone());
        let plans = PlanService::new(stores.plans);
        let spots = SpotService::new(stores.spots, stores.tags, keywords.clone());

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                keywords,
                tags,
                plans,
                spots,
            }),
        }
    }

    /// Production state backed by `PostgreSQL`.
    #[must_use]
    pub fn postgres(config: CatalogConfig, pool: PgPool) -> Self {
        let stores = CatalogStores::postgres(&pool);
        Self::new(config, Some(pool), stores)
    }

    /// State backed by empty in-process stores (tests, local experiments).
    #[must_use]
    pub fn in_memory(config: CatalogConfig) -> Self {
        Self::new(config, None, CatalogStores::in_memory())
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &CatalogConfig {
        &self.inner.config
    }

    /// Get the database connection pool, if this state is database-backed.
    #[must_use]
    pub fn pool(&self) -> Option<&PgPool> {
        self.inner.pool.as_ref()
    }

    /// Get a reference to the keyword registry.
    #[must_use]
    pub fn keywords(&self) -> &KeywordRegistry {
        &self.inner.keywords
    }

    /// Get a reference to the tag service.
    #[must_use]
    pub fn tags(&self) -> &TagService {
        &self.inner.tags
    }

    /// Get a reference to the plan service.
    #[must_use]
    pub fn plans(&self) -> &PlanService {
        &self.inner.plans
    }

    /// Get a reference to the spot service.
    #[must_use]
    pub fn spots(&self) -> &SpotService {
        &self.inner.spots
    }
}
