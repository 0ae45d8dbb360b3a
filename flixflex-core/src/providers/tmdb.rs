use std::fmt;

use async_trait::async_trait;
use flixflex_model::ContentType;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use super::traits::{MetadataProvider, ProviderError, ProviderPage};

pub const TMDB_V3_BASE: &str = "https://api.themoviedb.org/3";
const LISTING_LANGUAGE: &str = "en-US";

/// TMDB v3 client authenticated with a read access (bearer) token.
#[derive(Clone)]
pub struct TmdbProvider {
    http: reqwest::Client,
    base_url: String,
    api_token: String,
}

impl fmt::Debug for TmdbProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TmdbProvider")
            .field("base_url", &self.base_url)
            .field("api_token", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Serialize)]
struct PageQuery<'a> {
    page: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    language: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct SearchQuery<'a> {
    query: &'a str,
}

const NO_QUERY: &[(&str, &str)] = &[];

impl TmdbProvider {
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: TMDB_V3_BASE.to_string(),
            api_token: api_token.into(),
        }
    }

    /// Point the client at a different API root (proxies, test doubles).
    pub fn with_base_url(
        api_token: impl Into<String>,
        base_url: &str,
    ) -> Result<Self, ProviderError> {
        let parsed = Url::parse(base_url).map_err(|err| {
            ProviderError::ApiError(format!("invalid TMDB base url {base_url}: {err}"))
        })?;

        Ok(Self {
            http: reqwest::Client::new(),
            base_url: parsed.as_str().trim_end_matches('/').to_string(),
            api_token: api_token.into(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn get_tmdb_json<Q, T>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<T, ProviderError>
    where
        Q: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path);
        debug!("TMDB request URL: {}", url);

        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.api_token)
            .header(ACCEPT, "application/json")
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            let body = response.bytes().await?;
            return serde_json::from_slice(&body).map_err(|err| {
                ProviderError::ParseError(format!(
                    "malformed TMDB payload from {path}: {err}"
                ))
            });
        }

        #[derive(Debug, Deserialize)]
        struct TmdbErrorBody {
            #[serde(default)]
            status_message: Option<String>,
        }

        let message = response
            .json::<TmdbErrorBody>()
            .await
            .ok()
            .and_then(|body| body.status_message)
            .unwrap_or_else(|| {
                format!("TMDB request failed with status {}", status)
            });

        warn!(status = status.as_u16(), path, "TMDB request failed");

        match status.as_u16() {
            401 => Err(ProviderError::InvalidApiKey),
            404 => Err(ProviderError::NotFound),
            429 => Err(ProviderError::RateLimited),
            _ => Err(ProviderError::ApiError(message)),
        }
    }
}

#[async_trait]
impl MetadataProvider for TmdbProvider {
    async fn details(
        &self,
        content_type: ContentType,
        id: &str,
    ) -> Result<Value, ProviderError> {
        self.get_tmdb_json(&format!("{content_type}/{id}"), NO_QUERY)
            .await
    }

    async fn videos(
        &self,
        content_type: ContentType,
        id: &str,
    ) -> Result<Value, ProviderError> {
        self.get_tmdb_json(&format!("{content_type}/{id}/videos"), NO_QUERY)
            .await
    }

    async fn popular(
        &self,
        content_type: ContentType,
        page: u32,
    ) -> Result<ProviderPage, ProviderError> {
        let query = PageQuery {
            page: page.max(1),
            language: Some(LISTING_LANGUAGE),
        };
        self.get_tmdb_json(&format!("{content_type}/popular"), &query)
            .await
    }

    async fn top_rated(
        &self,
        content_type: ContentType,
        page: u32,
    ) -> Result<ProviderPage, ProviderError> {
        let query = PageQuery {
            page: page.max(1),
            language: None,
        };
        self.get_tmdb_json(&format!("{content_type}/top_rated"), &query)
            .await
    }

    async fn search(
        &self,
        content_type: ContentType,
        query: &str,
    ) -> Result<ProviderPage, ProviderError> {
        self.get_tmdb_json(
            &format!("search/{content_type}"),
            &SearchQuery { query },
        )
        .await
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_endpoints_under_base() {
        let provider = TmdbProvider::new("token");
        assert_eq!(
            provider.endpoint(&format!("{}/550/videos", ContentType::Movie)),
            "https://api.themoviedb.org/3/movie/550/videos"
        );
    }

    #[test]
    fn custom_base_url_drops_trailing_slash() {
        let provider =
            TmdbProvider::with_base_url("token", "http://localhost:8080/3/")
                .unwrap();
        assert_eq!(
            provider.endpoint("search/tv"),
            "http://localhost:8080/3/search/tv"
        );
    }

    #[test]
    fn rejects_invalid_base_url() {
        assert!(TmdbProvider::with_base_url("token", "not a url").is_err());
    }

    #[test]
    fn debug_output_hides_token() {
        let provider = TmdbProvider::new("secret-token");
        assert!(!format!("{provider:?}").contains("secret-token"));
    }
}
