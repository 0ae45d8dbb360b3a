use std::sync::Arc;

use flixflex_model::{CachedItem, ContentType};
use tracing::info;
use uuid::Uuid;

use crate::database::{FavoritesRepository, ItemFilter};
use crate::error::{ProxyError, Result};
use crate::metadata_proxy::{CacheMode, MetadataProxy};

/// Per-user favorites. A favorite always points at a cached item.
#[derive(Clone)]
pub struct FavoritesService {
    proxy: MetadataProxy,
    favorites: Arc<dyn FavoritesRepository>,
}

impl std::fmt::Debug for FavoritesService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FavoritesService")
            .field("proxy", &self.proxy)
            .finish_non_exhaustive()
    }
}

impl FavoritesService {
    pub fn new(proxy: MetadataProxy, favorites: Arc<dyn FavoritesRepository>) -> Self {
        Self { proxy, favorites }
    }

    /// Add an item to the user's favorites, caching it first when needed.
    pub async fn add(
        &self,
        user_id: Uuid,
        provider_id: &str,
        content_type: ContentType,
    ) -> Result<CachedItem> {
        let item = match self.find(provider_id).await? {
            Some(item) => item,
            None => {
                self.proxy
                    .get_details(provider_id, content_type, CacheMode::Awaited)
                    .await?;
                self.find(provider_id)
                    .await?
                    .ok_or_else(|| ProxyError::NotFound("Movie not found".to_string()))?
            }
        };

        self.favorites.add_favorite(user_id, &item.provider_id).await?;
        info!(%user_id, provider_id, "favorite added");
        Ok(item)
    }

    pub async fn remove(&self, user_id: Uuid, provider_id: &str) -> Result<()> {
        if self.find(provider_id).await?.is_none() {
            return Err(ProxyError::NotFound("Movie not found".to_string()));
        }

        let removed = self.favorites.remove_favorite(user_id, provider_id).await?;
        info!(%user_id, provider_id, removed, "favorite removed");
        Ok(())
    }

    pub async fn list(&self, user_id: Uuid) -> Result<Vec<CachedItem>> {
        Ok(self.favorites.list_favorites(user_id).await?)
    }

    async fn find(&self, provider_id: &str) -> Result<Option<CachedItem>> {
        Ok(self
            .proxy
            .store()
            .find_one(&ItemFilter::provider_id(provider_id))
            .await?)
    }
}
