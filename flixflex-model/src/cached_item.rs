use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::payload;

/// Local mirror of one upstream metadata record, keyed by provider id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedItem {
    #[serde(rename = "apiId")]
    pub provider_id: String,
    pub title: String,
    #[serde(rename = "isMovie")]
    pub is_movie: bool,
    #[serde(default)]
    pub details: Option<Value>,
    #[serde(rename = "trailer", default, skip_serializing_if = "Option::is_none")]
    pub trailer_url: Option<String>,
}

impl CachedItem {
    /// Row created by an upsert that matched nothing, before the patch is applied.
    pub fn empty(provider_id: impl Into<String>) -> Self {
        Self {
            provider_id: provider_id.into(),
            title: String::new(),
            is_movie: false,
            details: None,
            trailer_url: None,
        }
    }

    /// Stored trailer link, ignoring empty strings.
    pub fn trailer(&self) -> Option<&str> {
        self.trailer_url.as_deref().filter(|url| !url.is_empty())
    }

    pub fn imdb_id(&self) -> Option<&str> {
        self.details.as_ref().and_then(payload::imdb_id)
    }
}

/// Field-level `$set` for a cached item. `None` leaves the stored value alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemPatch {
    pub title: Option<String>,
    pub is_movie: Option<bool>,
    pub details: Option<Value>,
    pub trailer_url: Option<String>,
    /// Type recorded only when the patch creates the item. Never changes
    /// the type of an item that already exists.
    pub is_movie_on_insert: Option<bool>,
}

impl ItemPatch {
    /// Refresh from a provider payload. Never carries a trailer, so a
    /// resolved trailer survives any number of refreshes.
    pub fn refresh(item: &Value, is_movie: bool) -> Self {
        Self {
            title: Some(payload::title(item)),
            is_movie: Some(is_movie),
            details: Some(item.clone()),
            trailer_url: None,
            is_movie_on_insert: None,
        }
    }

    pub fn trailer(url: impl Into<String>) -> Self {
        Self {
            trailer_url: Some(url.into()),
            ..Self::default()
        }
    }

    /// Item created when an upsert matches nothing, before the patch is applied.
    pub fn new_item(&self, provider_id: impl Into<String>) -> CachedItem {
        let mut item = CachedItem::empty(provider_id);
        if let Some(is_movie) = self.is_movie_on_insert {
            item.is_movie = is_movie;
        }
        item
    }

    /// Fold a later patch for the same item into this one, as if both had
    /// been applied in order.
    pub fn merge(&mut self, later: ItemPatch) {
        if later.title.is_some() {
            self.title = later.title;
        }
        if later.is_movie.is_some() {
            self.is_movie = later.is_movie;
        }
        if later.details.is_some() {
            self.details = later.details;
        }
        if later.trailer_url.is_some() {
            self.trailer_url = later.trailer_url;
        }
        if self.is_movie_on_insert.is_none() {
            self.is_movie_on_insert = later.is_movie_on_insert;
        }
    }

    pub fn apply(self, item: &mut CachedItem) {
        if let Some(title) = self.title {
            item.title = title;
        }
        if let Some(is_movie) = self.is_movie {
            item.is_movie = is_movie;
        }
        if let Some(details) = self.details {
            item.details = Some(details);
        }
        if let Some(trailer_url) = self.trailer_url {
            item.trailer_url = Some(trailer_url);
        }
    }
}
