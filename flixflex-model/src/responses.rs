use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Resolved trailer link; `url` is `null` when nothing could be derived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrailerLink {
    pub url: Option<String>,
}

impl TrailerLink {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
        }
    }

    pub fn none() -> Self {
        Self { url: None }
    }
}

/// One re-sliced page of a provider listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginatedList {
    pub page: u32,
    pub results: Vec<Value>,
    pub total_results: u64,
    pub total_pages: u64,
}

/// Result of an operation fanned out over both content types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ByContentType<T> {
    pub movies: T,
    pub series: T,
}

/// Listing for one requested content type, or for both when none was given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Listing {
    Single(Vec<Value>),
    Both(ByContentType<Vec<Value>>),
}
