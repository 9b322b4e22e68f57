//! `PostgreSQL` store implementation.
//!
//! One store per entity table. Natural-key uniqueness among live records is
//! enforced by partial unique indexes (`(name) WHERE deleted_at IS NULL`),
//! so find-or-create is a single `INSERT .. ON CONFLICT` round trip and
//! plain inserts surface collisions as unique violations instead of relying
//! on a read-then-write check.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use trailmark_core::{KeywordId, NameKey, PlanId, SpotId, TagId};

use crate::models::{ContactInfo, Keyword, Plan, Spot, Tag};

use super::{EntityStore, KeywordStore, SpotFilter, SpotStore, StoreError, TagStore};

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Map a unique-index violation on insert/update to a conflict error.
fn map_unique_violation(e: sqlx::Error, name: &str) -> StoreError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return StoreError::Conflict(format!("live record named {name} already exists"));
    }
    StoreError::Database(e)
}

// =============================================================================
// Keywords
// =============================================================================

#[derive(sqlx::FromRow)]
struct KeywordRow {
    id: KeywordId,
    name: NameKey,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl From<KeywordRow> for Keyword {
    fn from(row: KeywordRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            created_at: row.created_at,
            updated_at: row.updated_at,
            deleted_at: row.deleted_at,
        }
    }
}

/// Keyword store backed by the `keywords` table.
#[derive(Clone)]
pub struct PgKeywordStore {
    pool: PgPool,
}

impl PgKeywordStore {
    /// Create a new keyword store.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const KEYWORD_COLUMNS: &str = "id, name, created_at, updated_at, deleted_at";

#[async_trait]
impl EntityStore<Keyword> for PgKeywordStore {
    async fn insert(&self, entity: Keyword) -> Result<Keyword, StoreError> {
        let row = sqlx::query_as::<_, KeywordRow>(
            "INSERT INTO keywords (id, name, created_at, updated_at, deleted_at) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id, name, created_at, updated_at, deleted_at",
        )
        .bind(entity.id)
        .bind(&entity.name)
        .bind(entity.created_at)
        .bind(entity.updated_at)
        .bind(entity.deleted_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, entity.name.as_str()))?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: KeywordId) -> Result<Option<Keyword>, StoreError> {
        let row = sqlx::query_as::<_, KeywordRow>(&format!(
            "SELECT {KEYWORD_COLUMNS} FROM keywords WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Keyword::from))
    }

    async fn find_live(&self, id: KeywordId) -> Result<Option<Keyword>, StoreError> {
        let row = sqlx::query_as::<_, KeywordRow>(&format!(
            "SELECT {KEYWORD_COLUMNS} FROM keywords WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Keyword::from))
    }

    async fn find_live_by_name(&self, name: &str) -> Result<Option<Keyword>, StoreError> {
        let row = sqlx::query_as::<_, KeywordRow>(&format!(
            "SELECT {KEYWORD_COLUMNS} FROM keywords WHERE name = $1 AND deleted_at IS NULL"
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Keyword::from))
    }

    async fn list_live(&self) -> Result<Vec<Keyword>, StoreError> {
        let rows = sqlx::query_as::<_, KeywordRow>(&format!(
            "SELECT {KEYWORD_COLUMNS} FROM keywords WHERE deleted_at IS NULL ORDER BY created_at"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Keyword::from).collect())
    }

    async fn update_live(&self, entity: Keyword) -> Result<Option<Keyword>, StoreError> {
        let row = sqlx::query_as::<_, KeywordRow>(
            "UPDATE keywords SET name = $2, updated_at = $3 \
             WHERE id = $1 AND deleted_at IS NULL \
             RETURNING id, name, created_at, updated_at, deleted_at",
        )
        .bind(entity.id)
        .bind(&entity.name)
        .bind(entity.updated_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, entity.name.as_str()))?;

        Ok(row.map(Keyword::from))
    }

    async fn soft_delete(&self, id: KeywordId) -> Result<Option<Keyword>, StoreError> {
        let row = sqlx::query_as::<_, KeywordRow>(
            "UPDATE keywords SET deleted_at = NOW(), updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL \
             RETURNING id, name, created_at, updated_at, deleted_at",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Keyword::from))
    }
}

#[async_trait]
impl KeywordStore for PgKeywordStore {
    async fn upsert_live_by_name(&self, name: &NameKey) -> Result<Keyword, StoreError> {
        // The partial unique index makes this a true conditional upsert:
        // concurrent calls race on the index, not on a read-then-write.
        // The no-op DO UPDATE makes the existing live row come back via
        // RETURNING instead of the statement matching zero rows.
        let row = sqlx::query_as::<_, KeywordRow>(
            "INSERT INTO keywords (id, name, created_at, updated_at) \
             VALUES ($1, $2, NOW(), NOW()) \
             ON CONFLICT (name) WHERE deleted_at IS NULL \
             DO UPDATE SET name = EXCLUDED.name \
             RETURNING id, name, created_at, updated_at, deleted_at",
        )
        .bind(KeywordId::generate())
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }
}

// =============================================================================
// Tags
// =============================================================================

#[derive(sqlx::FromRow)]
struct TagRow {
    id: TagId,
    name: NameKey,
    keywords: Vec<KeywordId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl From<TagRow> for Tag {
    fn from(row: TagRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            keywords: row.keywords,
            created_at: row.created_at,
            updated_at: row.updated_at,
            deleted_at: row.deleted_at,
        }
    }
}

/// Tag store backed by the `tags` table.
#[derive(Clone)]
pub struct PgTagStore {
    pool: PgPool,
}

impl PgTagStore {
    /// Create a new tag store.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const TAG_COLUMNS: &str = "id, name, keywords, created_at, updated_at, deleted_at";

#[async_trait]
impl EntityStore<Tag> for PgTagStore {
    async fn insert(&self, entity: Tag) -> Result<Tag, StoreError> {
        let row = sqlx::query_as::<_, TagRow>(
            "INSERT INTO tags (id, name, keywords, created_at, updated_at, deleted_at) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING id, name, keywords, created_at, updated_at, deleted_at",
        )
        .bind(entity.id)
        .bind(&entity.name)
        .bind(&entity.keywords)
        .bind(entity.created_at)
        .bind(entity.updated_at)
        .bind(entity.deleted_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, entity.name.as_str()))?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: TagId) -> Result<Option<Tag>, StoreError> {
        let row =
            sqlx::query_as::<_, TagRow>(&format!("SELECT {TAG_COLUMNS} FROM tags WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(Tag::from))
    }

    async fn find_live(&self, id: TagId) -> Result<Option<Tag>, StoreError> {
        let row = sqlx::query_as::<_, TagRow>(&format!(
            "SELECT {TAG_COLUMNS} FROM tags WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Tag::from))
    }

    async fn find_live_by_name(&self, name: &str) -> Result<Option<Tag>, StoreError> {
        let row = sqlx::query_as::<_, TagRow>(&format!(
            "SELECT {TAG_COLUMNS} FROM tags WHERE name = $1 AND deleted_at IS NULL"
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Tag::from))
    }

    async fn list_live(&self) -> Result<Vec<Tag>, StoreError> {
        let rows = sqlx::query_as::<_, TagRow>(&format!(
            "SELECT {TAG_COLUMNS} FROM tags WHERE deleted_at IS NULL ORDER BY created_at"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Tag::from).collect())
    }

    async fn update_live(&self, entity: Tag) -> Result<Option<Tag>, StoreError> {
        let row = sqlx::query_as::<_, TagRow>(
            "UPDATE tags SET name = $2, keywords = $3, updated_at = $4 \
             WHERE id = $1 AND deleted_at IS NULL \
             RETURNING id, name, keywords, created_at, updated_at, deleted_at",
        )
        .bind(entity.id)
        .bind(&entity.name)
        .bind(&entity.keywords)
        .bind(entity.updated_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, entity.name.as_str()))?;

        Ok(row.map(Tag::from))
    }

    async fn soft_delete(&self, id: TagId) -> Result<Option<Tag>, StoreError> {
        let row = sqlx::query_as::<_, TagRow>(
            "UPDATE tags SET deleted_at = NOW(), updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL \
             RETURNING id, name, keywords, created_at, updated_at, deleted_at",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Tag::from))
    }
}

#[async_trait]
impl TagStore for PgTagStore {
    async fn upsert_live_by_name(&self, name: &NameKey) -> Result<Tag, StoreError> {
        let row = sqlx::query_as::<_, TagRow>(
            "INSERT INTO tags (id, name, created_at, updated_at) \
             VALUES ($1, $2, NOW(), NOW()) \
             ON CONFLICT (name) WHERE deleted_at IS NULL \
             DO UPDATE SET name = EXCLUDED.name \
             RETURNING id, name, keywords, created_at, updated_at, deleted_at",
        )
        .bind(TagId::generate())
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn pull_keyword(&self, id: TagId, keyword: KeywordId) -> Result<Option<Tag>, StoreError> {
        let row = sqlx::query_as::<_, TagRow>(
            "UPDATE tags SET keywords = array_remove(keywords, $2), updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL \
             RETURNING id, name, keywords, created_at, updated_at, deleted_at",
        )
        .bind(id)
        .bind(keyword)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Tag::from))
    }

    async fn list_live_referencing(&self, keyword: KeywordId) -> Result<Vec<Tag>, StoreError> {
        let rows = sqlx::query_as::<_, TagRow>(&format!(
            "SELECT {TAG_COLUMNS} FROM tags \
             WHERE deleted_at IS NULL AND $1 = ANY(keywords) \
             ORDER BY created_at"
        ))
        .bind(keyword)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Tag::from).collect())
    }
}

// =============================================================================
// Plans
// =============================================================================

#[derive(sqlx::FromRow)]
struct PlanRow {
    id: PlanId,
    name: String,
    description: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl From<PlanRow> for Plan {
    fn from(row: PlanRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            created_at: row.created_at,
            updated_at: row.updated_at,
            deleted_at: row.deleted_at,
        }
    }
}

/// Plan store backed by the `plans` table.
#[derive(Clone)]
pub struct PgPlanStore {
    pool: PgPool,
}

impl PgPlanStore {
    /// Create a new plan store.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const PLAN_COLUMNS: &str = "id, name, description, created_at, updated_at, deleted_at";

#[async_trait]
impl EntityStore<Plan> for PgPlanStore {
    async fn insert(&self, entity: Plan) -> Result<Plan, StoreError> {
        let row = sqlx::query_as::<_, PlanRow>(
            "INSERT INTO plans (id, name, description, created_at, updated_at, deleted_at) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING id, name, description, created_at, updated_at, deleted_at",
        )
        .bind(entity.id)
        .bind(&entity.name)
        .bind(&entity.description)
        .bind(entity.created_at)
        .bind(entity.updated_at)
        .bind(entity.deleted_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, &entity.name))?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: PlanId) -> Result<Option<Plan>, StoreError> {
        let row =
            sqlx::query_as::<_, PlanRow>(&format!("SELECT {PLAN_COLUMNS} FROM plans WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(Plan::from))
    }

    async fn find_live(&self, id: PlanId) -> Result<Option<Plan>, StoreError> {
        let row = sqlx::query_as::<_, PlanRow>(&format!(
            "SELECT {PLAN_COLUMNS} FROM plans WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Plan::from))
    }

    async fn find_live_by_name(&self, name: &str) -> Result<Option<Plan>, StoreError> {
        let row = sqlx::query_as::<_, PlanRow>(&format!(
            "SELECT {PLAN_COLUMNS} FROM plans WHERE name = $1 AND deleted_at IS NULL"
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Plan::from))
    }

    async fn list_live(&self) -> Result<Vec<Plan>, StoreError> {
        let rows = sqlx::query_as::<_, PlanRow>(&format!(
            "SELECT {PLAN_COLUMNS} FROM plans WHERE deleted_at IS NULL ORDER BY created_at"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Plan::from).collect())
    }

    async fn update_live(&self, entity: Plan) -> Result<Option<Plan>, StoreError> {
        let row = sqlx::query_as::<_, PlanRow>(
            "UPDATE plans SET name = $2, description = $3, updated_at = $4 \
             WHERE id = $1 AND deleted_at IS NULL \
             RETURNING id, name, description, created_at, updated_at, deleted_at",
        )
        .bind(entity.id)
        .bind(&entity.name)
        .bind(&entity.description)
        .bind(entity.updated_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, &entity.name))?;

        Ok(row.map(Plan::from))
    }

    async fn soft_delete(&self, id: PlanId) -> Result<Option<Plan>, StoreError> {
        let row = sqlx::query_as::<_, PlanRow>(
            "UPDATE plans SET deleted_at = NOW(), updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL \
             RETURNING id, name, description, created_at, updated_at, deleted_at",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Plan::from))
    }
}

// =============================================================================
// Spots
// =============================================================================

#[derive(sqlx::FromRow)]
struct SpotRow {
    id: SpotId,
    name: String,
    phone: Option<String>,
    email: Option<String>,
    address: String,
    pictures: Vec<String>,
    rating: f64,
    categories: Vec<NameKey>,
    tags: Vec<TagId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl From<SpotRow> for Spot {
    fn from(row: SpotRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            contact_info: ContactInfo {
                phone: row.phone,
                email: row.email,
            },
            address: row.address,
            pictures: row.pictures,
            rating: row.rating,
            categories: row.categories,
            tags: row.tags,
            created_at: row.created_at,
            updated_at: row.updated_at,
            deleted_at: row.deleted_at,
        }
    }
}

/// Spot store backed by the `spots` table.
#[derive(Clone)]
pub struct PgSpotStore {
    pool: PgPool,
}

impl PgSpotStore {
    /// Create a new spot store.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SPOT_COLUMNS: &str = "id, name, phone, email, address, pictures, rating, categories, tags, \
                            created_at, updated_at, deleted_at";

#[async_trait]
impl EntityStore<Spot> for PgSpotStore {
    async fn insert(&self, entity: Spot) -> Result<Spot, StoreError> {
        let row = sqlx::query_as::<_, SpotRow>(&format!(
            "INSERT INTO spots (id, name, phone, email, address, pictures, rating, categories, \
                                tags, created_at, updated_at, deleted_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
             RETURNING {SPOT_COLUMNS}"
        ))
        .bind(entity.id)
        .bind(&entity.name)
        .bind(&entity.contact_info.phone)
        .bind(&entity.contact_info.email)
        .bind(&entity.address)
        .bind(&entity.pictures)
        .bind(entity.rating)
        .bind(&entity.categories)
        .bind(&entity.tags)
        .bind(entity.created_at)
        .bind(entity.updated_at)
        .bind(entity.deleted_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, &entity.name))?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: SpotId) -> Result<Option<Spot>, StoreError> {
        let row =
            sqlx::query_as::<_, SpotRow>(&format!("SELECT {SPOT_COLUMNS} FROM spots WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(Spot::from))
    }

    async fn find_live(&self, id: SpotId) -> Result<Option<Spot>, StoreError> {
        let row = sqlx::query_as::<_, SpotRow>(&format!(
            "SELECT {SPOT_COLUMNS} FROM spots WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Spot::from))
    }

    async fn find_live_by_name(&self, name: &str) -> Result<Option<Spot>, StoreError> {
        let row = sqlx::query_as::<_, SpotRow>(&format!(
            "SELECT {SPOT_COLUMNS} FROM spots WHERE name = $1 AND deleted_at IS NULL"
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Spot::from))
    }

    async fn list_live(&self) -> Result<Vec<Spot>, StoreError> {
        let rows = sqlx::query_as::<_, SpotRow>(&format!(
            "SELECT {SPOT_COLUMNS} FROM spots WHERE deleted_at IS NULL ORDER BY created_at"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Spot::from).collect())
    }

    async fn update_live(&self, entity: Spot) -> Result<Option<Spot>, StoreError> {
        let row = sqlx::query_as::<_, SpotRow>(&format!(
            "UPDATE spots SET name = $2, phone = $3, email = $4, address = $5, pictures = $6, \
                              rating = $7, categories = $8, tags = $9, updated_at = $10 \
             WHERE id = $1 AND deleted_at IS NULL \
             RETURNING {SPOT_COLUMNS}"
        ))
        .bind(entity.id)
        .bind(&entity.name)
        .bind(&entity.contact_info.phone)
        .bind(&entity.contact_info.email)
        .bind(&entity.address)
        .bind(&entity.pictures)
        .bind(entity.rating)
        .bind(&entity.categories)
        .bind(&entity.tags)
        .bind(entity.updated_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, &entity.name))?;

        Ok(row.map(Spot::from))
    }

    async fn soft_delete(&self, id: SpotId) -> Result<Option<Spot>, StoreError> {
        let row = sqlx::query_as::<_, SpotRow>(&format!(
            "UPDATE spots SET deleted_at = NOW(), updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL \
             RETURNING {SPOT_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Spot::from))
    }
}

#[async_trait]
impl SpotStore for PgSpotStore {
    async fn pull_category(
        &self,
        id: SpotId,
        category: &NameKey,
    ) -> Result<Option<Spot>, StoreError> {
        let row = sqlx::query_as::<_, SpotRow>(&format!(
            "UPDATE spots SET categories = array_remove(categories, $2), updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL \
             RETURNING {SPOT_COLUMNS}"
        ))
        .bind(id)
        .bind(category)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Spot::from))
    }

    async fn pull_tag(&self, id: SpotId, tag: TagId) -> Result<Option<Spot>, StoreError> {
        let row = sqlx::query_as::<_, SpotRow>(&format!(
            "UPDATE spots SET tags = array_remove(tags, $2), updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL \
             RETURNING {SPOT_COLUMNS}"
        ))
        .bind(id)
        .bind(tag)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Spot::from))
    }

    async fn list_live_page(&self, offset: i64, limit: i64) -> Result<Vec<Spot>, StoreError> {
        let rows = sqlx::query_as::<_, SpotRow>(&format!(
            "SELECT {SPOT_COLUMNS} FROM spots WHERE deleted_at IS NULL \
             ORDER BY created_at OFFSET $1 LIMIT $2"
        ))
        .bind(offset)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Spot::from).collect())
    }

    async fn search_live(&self, filter: &SpotFilter) -> Result<Vec<Spot>, StoreError> {
        let rows = sqlx::query_as::<_, SpotRow>(&format!(
            "SELECT {SPOT_COLUMNS} FROM spots \
             WHERE deleted_at IS NULL \
               AND ($1::uuid[] IS NULL OR tags && $1) \
               AND ($2::text IS NULL OR $2 = ANY(categories)) \
               AND ($3::float8 IS NULL OR rating >= $3) \
             ORDER BY created_at"
        ))
        .bind(filter.tag_ids.as_deref())
        .bind(filter.category.as_ref())
        .bind(filter.min_rating)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Spot::from).collect())
    }
}
