use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use flixflex_model::{CachedItem, ItemPatch, User};
use parking_lot::RwLock;
use uuid::Uuid;

use super::ports::{
    CachedItemStore, FavoritesRepository, ItemFilter, ItemUpsert, StoreError,
    StoreResult, UsersRepository,
};

#[derive(Debug, Clone)]
struct StoredUser {
    user: User,
    password_hash: String,
}

/// Process-local store with the same upsert semantics as the PostgreSQL
/// backend. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct InMemoryDatabase {
    items: RwLock<HashMap<String, CachedItem>>,
    users: RwLock<HashMap<Uuid, StoredUser>>,
    favorites: RwLock<HashMap<Uuid, Vec<String>>>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn item_count(&self) -> usize {
        self.items.read().len()
    }

    fn upsert_locked(
        items: &mut HashMap<String, CachedItem>,
        filter: &ItemFilter,
        patch: ItemPatch,
    ) -> CachedItem {
        let item = items
            .entry(filter.provider_id.clone())
            .or_insert_with(|| patch.new_item(filter.provider_id.clone()));
        patch.apply(item);
        item.clone()
    }
}

#[async_trait]
impl CachedItemStore for InMemoryDatabase {
    async fn find_one(&self, filter: &ItemFilter) -> StoreResult<Option<CachedItem>> {
        Ok(self.items.read().get(&filter.provider_id).cloned())
    }

    async fn upsert_many(&self, operations: Vec<ItemUpsert>) -> StoreResult<()> {
        let mut items = self.items.write();
        for ItemUpsert { filter, patch } in operations {
            Self::upsert_locked(&mut items, &filter, patch);
        }
        Ok(())
    }

    async fn update_one(
        &self,
        filter: &ItemFilter,
        patch: ItemPatch,
        upsert: bool,
    ) -> StoreResult<Option<CachedItem>> {
        let mut items = self.items.write();
        if upsert {
            return Ok(Some(Self::upsert_locked(&mut items, filter, patch)));
        }

        Ok(items.get_mut(&filter.provider_id).map(|item| {
            patch.apply(item);
            item.clone()
        }))
    }
}

#[async_trait]
impl UsersRepository for InMemoryDatabase {
    async fn create_user(&self, username: &str, password_hash: &str) -> StoreResult<User> {
        let mut users = self.users.write();
        if users.values().any(|stored| stored.user.username == username) {
            return Err(StoreError::Conflict("User already exists".to_string()));
        }

        let user = User {
            id: Uuid::now_v7(),
            username: username.to_string(),
            created_at: Utc::now(),
        };
        users.insert(
            user.id,
            StoredUser {
                user: user.clone(),
                password_hash: password_hash.to_string(),
            },
        );
        Ok(user)
    }

    async fn get_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(self.users.read().get(&id).map(|stored| stored.user.clone()))
    }

    async fn get_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        Ok(self
            .users
            .read()
            .values()
            .find(|stored| stored.user.username == username)
            .map(|stored| stored.user.clone()))
    }

    async fn get_password_hash(&self, user_id: Uuid) -> StoreResult<Option<String>> {
        Ok(self
            .users
            .read()
            .get(&user_id)
            .map(|stored| stored.password_hash.clone()))
    }
}

#[async_trait]
impl FavoritesRepository for InMemoryDatabase {
    async fn add_favorite(&self, user_id: Uuid, provider_id: &str) -> StoreResult<()> {
        if !self.items.read().contains_key(provider_id) {
            return Err(StoreError::Internal(format!(
                "cannot favorite uncached item {provider_id}"
            )));
        }

        let mut favorites = self.favorites.write();
        let list = favorites.entry(user_id).or_default();
        if !list.iter().any(|id| id == provider_id) {
            list.push(provider_id.to_string());
        }
        Ok(())
    }

    async fn remove_favorite(&self, user_id: Uuid, provider_id: &str) -> StoreResult<bool> {
        let mut favorites = self.favorites.write();
        let Some(list) = favorites.get_mut(&user_id) else {
            return Ok(false);
        };
        let before = list.len();
        list.retain(|id| id != provider_id);
        Ok(list.len() != before)
    }

    async fn list_favorites(&self, user_id: Uuid) -> StoreResult<Vec<CachedItem>> {
        let favorites = self.favorites.read();
        let items = self.items.read();
        Ok(favorites
            .get(&user_id)
            .into_iter()
            .flatten()
            .filter_map(|id| items.get(id).cloned())
            .collect())
    }
}
