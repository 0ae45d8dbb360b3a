use async_trait::async_trait;
use flixflex_model::ContentType;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("API error: {0}")]
    ApiError(String),

    #[error("Not found")]
    NotFound,

    #[error("Rate limited")]
    RateLimited,

    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Paged listing as returned by the provider. Items stay opaque.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderPage {
    pub page: u32,
    pub results: Vec<Value>,
    pub total_pages: u64,
    pub total_results: u64,
}

/// Read-only access to an external metadata provider.
///
/// Every call is a single request; failures are returned as-is and never
/// retried here.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Full details for one item
    async fn details(
        &self,
        content_type: ContentType,
        id: &str,
    ) -> Result<Value, ProviderError>;

    /// Video listing (trailers, teasers, clips) for one item
    async fn videos(
        &self,
        content_type: ContentType,
        id: &str,
    ) -> Result<Value, ProviderError>;

    async fn popular(
        &self,
        content_type: ContentType,
        page: u32,
    ) -> Result<ProviderPage, ProviderError>;

    async fn top_rated(
        &self,
        content_type: ContentType,
        page: u32,
    ) -> Result<ProviderPage, ProviderError>;

    /// Free-text search within one content type
    async fn search(
        &self,
        content_type: ContentType,
        query: &str,
    ) -> Result<ProviderPage, ProviderError>;

    /// Get the provider name
    fn name(&self) -> &'static str;
}
