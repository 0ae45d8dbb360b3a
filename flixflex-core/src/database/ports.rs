use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use async_trait::async_trait;
use flixflex_model::{CachedItem, ItemPatch, User};
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Field-equality match on a cached item.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItemFilter {
    pub provider_id: String,
}

impl ItemFilter {
    pub fn provider_id(id: impl Into<String>) -> Self {
        Self {
            provider_id: id.into(),
        }
    }
}

/// One `updateOne { filter, $set, upsert: true }` entry of a bulk write.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemUpsert {
    pub filter: ItemFilter,
    pub patch: ItemPatch,
}

impl ItemUpsert {
    /// One operation per provider id, sorted by id. Batches written in this
    /// order lock rows in the same sequence and cannot deadlock each other.
    pub fn lock_ordered(operations: Vec<ItemUpsert>) -> Vec<ItemUpsert> {
        let mut by_id: BTreeMap<String, ItemPatch> = BTreeMap::new();
        for ItemUpsert { filter, patch } in operations {
            match by_id.entry(filter.provider_id) {
                Entry::Vacant(entry) => {
                    entry.insert(patch);
                }
                Entry::Occupied(mut entry) => entry.get_mut().merge(patch),
            }
        }

        by_id
            .into_iter()
            .map(|(provider_id, patch)| ItemUpsert {
                filter: ItemFilter { provider_id },
                patch,
            })
            .collect()
    }
}

/// Document store holding cached provider items.
///
/// Upserts are atomic per item; concurrent writers to the same provider id
/// converge last-write-wins on each field they set.
#[async_trait]
pub trait CachedItemStore: Send + Sync {
    async fn find_one(&self, filter: &ItemFilter) -> StoreResult<Option<CachedItem>>;

    async fn upsert_many(&self, operations: Vec<ItemUpsert>) -> StoreResult<()>;

    /// Apply `patch` to the matching item. With `upsert`, a missing item is
    /// created first. Returns the item as stored after the update.
    async fn update_one(
        &self,
        filter: &ItemFilter,
        patch: ItemPatch,
        upsert: bool,
    ) -> StoreResult<Option<CachedItem>>;
}

// User accounts and credentials
#[async_trait]
pub trait UsersRepository: Send + Sync {
    /// Fails with [`StoreError::Conflict`] when the username is taken.
    async fn create_user(&self, username: &str, password_hash: &str) -> StoreResult<User>;
    async fn get_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>>;
    async fn get_user_by_username(&self, username: &str) -> StoreResult<Option<User>>;
    async fn get_password_hash(&self, user_id: Uuid) -> StoreResult<Option<String>>;
}

#[async_trait]
pub trait FavoritesRepository: Send + Sync {
    /// Adding an existing favorite is a no-op.
    async fn add_favorite(&self, user_id: Uuid, provider_id: &str) -> StoreResult<()>;
    /// Returns whether a favorite was removed.
    async fn remove_favorite(&self, user_id: Uuid, provider_id: &str) -> StoreResult<bool>;
    /// Favorites in the order they were added.
    async fn list_favorites(&self, user_id: Uuid) -> StoreResult<Vec<CachedItem>>;
}
