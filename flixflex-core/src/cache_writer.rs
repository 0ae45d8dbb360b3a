use std::fmt;
use std::sync::Arc;

use flixflex_model::{ItemPatch, payload};
use serde_json::Value;
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio_util::task::TaskTracker;
use tracing::{debug, warn};

use crate::database::{CachedItemStore, ItemFilter, ItemUpsert, StoreError};

/// A batch of provider items could not be persisted. Only ever logged.
#[derive(Debug, Error)]
#[error("failed to cache {count} item(s): {source}")]
pub struct CacheWriteError {
    pub count: usize,
    #[source]
    pub source: StoreError,
}

/// Writes provider payloads into the item store as a best-effort mirror.
///
/// Background writes run on the tokio runtime and are tracked so shutdown can
/// wait for them; their outcome is only logged.
#[derive(Clone)]
pub struct CacheWriter {
    store: Arc<dyn CachedItemStore>,
    tracker: TaskTracker,
}

impl fmt::Debug for CacheWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheWriter")
            .field("in_flight", &self.tracker.len())
            .finish()
    }
}

impl CacheWriter {
    pub fn new(store: Arc<dyn CachedItemStore>) -> Self {
        Self {
            store,
            tracker: TaskTracker::new(),
        }
    }

    /// One keyed upsert per item. Items without a provider id are skipped.
    /// The trailer field is never part of these upserts.
    pub fn operations(items: &[Value], is_movie: bool) -> Vec<ItemUpsert> {
        items
            .iter()
            .filter_map(|item| {
                let Some(provider_id) = payload::provider_id(item) else {
                    debug!("skipping provider item without id");
                    return None;
                };
                Some(ItemUpsert {
                    filter: ItemFilter::provider_id(provider_id),
                    patch: ItemPatch::refresh(item, is_movie),
                })
            })
            .collect()
    }

    pub async fn try_write(
        &self,
        items: &[Value],
        is_movie: bool,
    ) -> Result<usize, CacheWriteError> {
        let operations = Self::operations(items, is_movie);
        let count = operations.len();
        if count == 0 {
            return Ok(0);
        }

        self.store
            .upsert_many(operations)
            .await
            .map_err(|source| CacheWriteError { count, source })?;
        Ok(count)
    }

    /// Persist a batch and wait for it. Failures are logged, never returned.
    pub async fn write(&self, items: &[Value], is_movie: bool) {
        match self.try_write(items, is_movie).await {
            Ok(count) => debug!(count, is_movie, "cached provider items"),
            Err(err) => warn!(error = %err, "Error caching provider items"),
        }
    }

    /// Persist a batch without blocking the caller.
    pub fn spawn(&self, items: Vec<Value>, is_movie: bool) -> JoinHandle<()> {
        let writer = self.clone();
        self.tracker.spawn(async move {
            writer.write(&items, is_movie).await;
        })
    }

    pub fn in_flight(&self) -> usize {
        self.tracker.len()
    }

    /// Wait until every background write spawned so far has finished.
    pub async fn drain(&self) {
        self.tracker.close();
        self.tracker.wait().await;
        self.tracker.reopen();
    }
}
