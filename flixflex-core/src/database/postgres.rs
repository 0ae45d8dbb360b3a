use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use flixflex_model::{CachedItem, ItemPatch, User};
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use tracing::{debug, info};
use uuid::Uuid;

use super::ports::{
    CachedItemStore, FavoritesRepository, ItemFilter, ItemUpsert, StoreError,
    StoreResult, UsersRepository,
};

const MAX_CONNECTIONS: u32 = 10;

const UPSERT_ITEM_SQL: &str = r#"
    INSERT INTO cached_items (provider_id, title, is_movie, details, trailer_url)
    VALUES ($1, COALESCE($2, ''), COALESCE($3, $6, FALSE), $4, $5)
    ON CONFLICT (provider_id) DO UPDATE SET
        title = COALESCE($2, cached_items.title),
        is_movie = COALESCE($3, cached_items.is_movie),
        details = COALESCE($4, cached_items.details),
        trailer_url = COALESCE($5, cached_items.trailer_url),
        updated_at = NOW()
    RETURNING provider_id, title, is_movie, details, trailer_url
"#;

const UPDATE_ITEM_SQL: &str = r#"
    UPDATE cached_items SET
        title = COALESCE($2, title),
        is_movie = COALESCE($3, is_movie),
        details = COALESCE($4, details),
        trailer_url = COALESCE($5, trailer_url),
        updated_at = NOW()
    WHERE provider_id = $1
    RETURNING provider_id, title, is_movie, details, trailer_url
"#;

#[derive(Debug, FromRow)]
struct CachedItemRow {
    provider_id: String,
    title: String,
    is_movie: bool,
    details: Option<Value>,
    trailer_url: Option<String>,
}

impl From<CachedItemRow> for CachedItem {
    fn from(row: CachedItemRow) -> Self {
        CachedItem {
            provider_id: row.provider_id,
            title: row.title,
            is_movie: row.is_movie,
            details: row.details,
            trailer_url: row.trailer_url,
        }
    }
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            username: row.username,
            created_at: row.created_at,
        }
    }
}

/// PostgreSQL-backed implementation of every store port.
#[derive(Clone)]
pub struct PostgresDatabase {
    pool: PgPool,
}

impl fmt::Debug for PostgresDatabase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresDatabase")
            .field("pool_size", &self.pool.size())
            .finish()
    }
}

impl PostgresDatabase {
    pub async fn connect(database_url: &str) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect(database_url)
            .await?;
        info!("Connected to PostgreSQL");
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Apply pending migrations from `flixflex-core/migrations`.
    pub async fn migrate(&self) -> StoreResult<()> {
        crate::MIGRATOR
            .run(&self.pool)
            .await
            .map_err(|e| StoreError::Internal(format!("Migration failed: {e}")))?;
        info!("Database schema is up to date");
        Ok(())
    }

    async fn upsert_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        operation: ItemUpsert,
    ) -> StoreResult<()> {
        let ItemPatch {
            title,
            is_movie,
            details,
            trailer_url,
            is_movie_on_insert,
        } = operation.patch;

        sqlx::query(UPSERT_ITEM_SQL)
            .bind(&operation.filter.provider_id)
            .bind(title)
            .bind(is_movie)
            .bind(details)
            .bind(trailer_url)
            .bind(is_movie_on_insert)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl CachedItemStore for PostgresDatabase {
    async fn find_one(&self, filter: &ItemFilter) -> StoreResult<Option<CachedItem>> {
        let row = sqlx::query_as::<_, CachedItemRow>(
            r#"
            SELECT provider_id, title, is_movie, details, trailer_url
            FROM cached_items
            WHERE provider_id = $1
            "#,
        )
        .bind(&filter.provider_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(CachedItem::from))
    }

    async fn upsert_many(&self, operations: Vec<ItemUpsert>) -> StoreResult<()> {
        if operations.is_empty() {
            return Ok(());
        }

        let operations = ItemUpsert::lock_ordered(operations);
        let count = operations.len();
        let mut tx = self.pool.begin().await?;
        for operation in operations {
            Self::upsert_in_tx(&mut tx, operation).await?;
        }
        tx.commit().await?;

        debug!(count, "upserted cached items");
        Ok(())
    }

    async fn update_one(
        &self,
        filter: &ItemFilter,
        patch: ItemPatch,
        upsert: bool,
    ) -> StoreResult<Option<CachedItem>> {
        let sql = if upsert { UPSERT_ITEM_SQL } else { UPDATE_ITEM_SQL };
        let ItemPatch {
            title,
            is_movie,
            details,
            trailer_url,
            is_movie_on_insert,
        } = patch;

        let mut query = sqlx::query_as::<_, CachedItemRow>(sql)
            .bind(&filter.provider_id)
            .bind(title)
            .bind(is_movie)
            .bind(details)
            .bind(trailer_url);
        if upsert {
            query = query.bind(is_movie_on_insert);
        }
        let row = query.fetch_optional(&self.pool).await?;

        Ok(row.map(CachedItem::from))
    }
}

#[async_trait]
impl UsersRepository for PostgresDatabase {
    async fn create_user(&self, username: &str, password_hash: &str) -> StoreResult<User> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (id, username, password_hash, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, created_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(username)
        .bind(password_hash)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error()
                && db_err.constraint() == Some("users_username_key")
            {
                return StoreError::Conflict("User already exists".to_string());
            }
            StoreError::Database(e)
        })?;

        info!("Created user: {} ({})", row.username, row.id);
        Ok(row.into())
    }

    async fn get_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, username, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(User::from))
    }

    async fn get_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, username, created_at FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(User::from))
    }

    async fn get_password_hash(&self, user_id: Uuid) -> StoreResult<Option<String>> {
        let hash = sqlx::query_scalar::<_, String>(
            "SELECT password_hash FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(hash)
    }
}

#[async_trait]
impl FavoritesRepository for PostgresDatabase {
    async fn add_favorite(&self, user_id: Uuid, provider_id: &str) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO user_favorites (user_id, provider_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, provider_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(provider_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn remove_favorite(&self, user_id: Uuid, provider_id: &str) -> StoreResult<bool> {
        let result = sqlx::query(
            "DELETE FROM user_favorites WHERE user_id = $1 AND provider_id = $2",
        )
        .bind(user_id)
        .bind(provider_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_favorites(&self, user_id: Uuid) -> StoreResult<Vec<CachedItem>> {
        let rows = sqlx::query_as::<_, CachedItemRow>(
            r#"
            SELECT c.provider_id, c.title, c.is_movie, c.details, c.trailer_url
            FROM user_favorites f
            JOIN cached_items c ON c.provider_id = f.provider_id
            WHERE f.user_id = $1
            ORDER BY f.added_at, c.provider_id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(CachedItem::from).collect())
    }
}
