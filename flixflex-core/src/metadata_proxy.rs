use std::fmt;
use std::sync::Arc;

use flixflex_model::{
    ByContentType, CachedItem, ContentType, ItemPatch, Listing, PaginatedList,
    TrailerLink, payload,
};
use serde_json::Value;
use tracing::{debug, info};

use crate::cache_writer::CacheWriter;
use crate::database::{CachedItemStore, ItemFilter};
use crate::error::{ProxyError, Result};
use crate::providers::MetadataProvider;

/// Items per page exposed to clients. Provider pages hold twice as many.
pub const PAGE_SIZE: usize = 10;
/// Items returned per content type by [`MetadataProxy::list_top`].
pub const TOP_LIMIT: usize = 5;

const YOUTUBE_WATCH_BASE: &str = "https://www.youtube.com/watch?v=";
const IMDB_TITLE_BASE: &str = "https://www.imdb.com/title/";

/// Whether a caller waits for the cache write triggered by a fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheMode {
    /// Spawn the write and return immediately.
    #[default]
    Background,
    /// Wait for the write to finish. Failures are still swallowed.
    Awaited,
}

/// Serves provider metadata, mirroring everything it fetches into the item
/// store and answering trailer lookups from that mirror when it can.
#[derive(Clone)]
pub struct MetadataProxy {
    provider: Arc<dyn MetadataProvider>,
    store: Arc<dyn CachedItemStore>,
    cache_writer: CacheWriter,
}

impl fmt::Debug for MetadataProxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetadataProxy")
            .field("provider", &self.provider.name())
            .field("cache_writer", &self.cache_writer)
            .finish()
    }
}

impl MetadataProxy {
    pub fn new(
        provider: Arc<dyn MetadataProvider>,
        store: Arc<dyn CachedItemStore>,
    ) -> Self {
        let cache_writer = CacheWriter::new(store.clone());
        Self {
            provider,
            store,
            cache_writer,
        }
    }

    pub fn cache_writer(&self) -> &CacheWriter {
        &self.cache_writer
    }

    pub fn store(&self) -> &Arc<dyn CachedItemStore> {
        &self.store
    }

    /// Fetch fresh details from the provider and mirror them.
    ///
    /// The payload is returned unchanged. With [`CacheMode::Awaited`] the
    /// mirror write has completed (or failed and been logged) on return.
    pub async fn get_details(
        &self,
        id: &str,
        content_type: ContentType,
        mode: CacheMode,
    ) -> Result<Value> {
        validate_id(id)?;
        let details = self.provider.details(content_type, id).await?;

        match mode {
            CacheMode::Awaited => {
                self.cache_writer
                    .write(std::slice::from_ref(&details), content_type.is_movie())
                    .await;
            }
            CacheMode::Background => {
                self.cache_writer
                    .spawn(vec![details.clone()], content_type.is_movie());
            }
        }

        Ok(details)
    }

    /// Resolve a playable trailer link, falling back to the IMDb title page.
    ///
    /// Order: stored trailer, first YouTube trailer from the provider video
    /// listing (persisted), IMDb id from already cached details (not
    /// persisted), IMDb id from freshly fetched details (persisted along with
    /// those details). At most one video listing call and one details call.
    pub async fn get_trailer(
        &self,
        id: &str,
        content_type: ContentType,
    ) -> Result<TrailerLink> {
        validate_id(id)?;
        let filter = ItemFilter::provider_id(id);
        let cached = self.store.find_one(&filter).await?;

        if let Some(url) = cached.as_ref().and_then(CachedItem::trailer) {
            debug!(id, "trailer served from cache");
            return Ok(TrailerLink::new(url));
        }

        let listing = self.provider.videos(content_type, id).await?;
        if let Some(key) = youtube_trailer_key(&listing) {
            let url = format!("{YOUTUBE_WATCH_BASE}{key}");
            self.store
                .update_one(&filter, trailer_patch(&url, content_type), true)
                .await?;
            return Ok(TrailerLink::new(url));
        }

        if let Some(imdb_id) = cached.as_ref().and_then(CachedItem::imdb_id) {
            return Ok(TrailerLink::new(format!("{IMDB_TITLE_BASE}{imdb_id}")));
        }

        let details = self
            .get_details(id, content_type, CacheMode::Awaited)
            .await?;
        let Some(imdb_id) = payload::imdb_id(&details) else {
            info!(id, %content_type, "no trailer or IMDb fallback available");
            return Ok(TrailerLink::none());
        };

        let url = format!("{IMDB_TITLE_BASE}{imdb_id}");
        let patch = ItemPatch {
            trailer_url: Some(url.clone()),
            ..ItemPatch::refresh(&details, content_type.is_movie())
        };
        self.store.update_one(&filter, patch, true).await?;
        Ok(TrailerLink::new(url))
    }

    /// Page `page` (1-based) of the popular feed in [`PAGE_SIZE`] slices.
    ///
    /// Provider page `ceil(page / 2)` is fetched; odd pages return its first
    /// half, even pages its second half. The whole provider page is mirrored.
    pub async fn list_paginated(
        &self,
        page: u32,
        content_type: ContentType,
    ) -> Result<PaginatedList> {
        if page == 0 {
            return Err(ProxyError::Validation(
                "Page numbers start at 1".to_string(),
            ));
        }

        let listing = self
            .provider
            .popular(content_type, page.div_ceil(2))
            .await?;
        self.cache_writer
            .spawn(listing.results.clone(), content_type.is_movie());

        let start = if page % 2 == 1 { 0 } else { PAGE_SIZE };
        let results = listing
            .results
            .into_iter()
            .skip(start)
            .take(PAGE_SIZE)
            .collect();

        Ok(PaginatedList {
            page,
            results,
            total_results: listing.total_results,
            total_pages: listing.total_pages.saturating_mul(2),
        })
    }

    /// First [`TOP_LIMIT`] top-rated items for one type, or for both types.
    pub async fn list_top(&self, content_type: Option<ContentType>) -> Result<Listing> {
        match content_type {
            Some(content_type) => {
                let listing = self.provider.top_rated(content_type, 1).await?;
                self.cache_writer
                    .spawn(listing.results.clone(), content_type.is_movie());
                Ok(Listing::Single(truncated(listing.results, TOP_LIMIT)))
            }
            None => {
                let (movies, series) = tokio::try_join!(
                    self.provider.top_rated(ContentType::Movie, 1),
                    self.provider.top_rated(ContentType::Tv, 1),
                )?;
                self.cache_writer.spawn(movies.results.clone(), true);
                self.cache_writer.spawn(series.results.clone(), false);
                Ok(Listing::Both(ByContentType {
                    movies: truncated(movies.results, TOP_LIMIT),
                    series: truncated(series.results, TOP_LIMIT),
                }))
            }
        }
    }

    /// Free-text search in one type, or in both types when none is given.
    pub async fn search(
        &self,
        query: &str,
        content_type: Option<ContentType>,
    ) -> Result<Listing> {
        if query.is_empty() {
            return Err(ProxyError::Validation(
                "Search query is required and must be a string.".to_string(),
            ));
        }

        match content_type {
            Some(content_type) => {
                let listing = self.provider.search(content_type, query).await?;
                self.cache_writer
                    .spawn(listing.results.clone(), content_type.is_movie());
                Ok(Listing::Single(listing.results))
            }
            None => {
                let (movies, series) = tokio::try_join!(
                    self.provider.search(ContentType::Movie, query),
                    self.provider.search(ContentType::Tv, query),
                )?;
                self.cache_writer.spawn(movies.results.clone(), true);
                self.cache_writer.spawn(series.results.clone(), false);
                Ok(Listing::Both(ByContentType {
                    movies: movies.results,
                    series: series.results,
                }))
            }
        }
    }
}

/// Provider ids become URL path segments.
fn validate_id(id: &str) -> Result<()> {
    let valid = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(ProxyError::Validation(format!("Invalid item id '{id}'")))
    }
}

fn youtube_trailer_key(listing: &Value) -> Option<&str> {
    payload::videos(listing)
        .find(|video| video.site == "YouTube" && video.kind == "Trailer")
        .map(|video| video.key)
}

fn trailer_patch(url: &str, content_type: ContentType) -> ItemPatch {
    ItemPatch {
        is_movie_on_insert: Some(content_type.is_movie()),
        ..ItemPatch::trailer(url)
    }
}

fn truncated(mut items: Vec<Value>, limit: usize) -> Vec<Value> {
    items.truncate(limit);
    items
}
