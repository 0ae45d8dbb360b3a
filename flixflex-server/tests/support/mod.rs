use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{Result, anyhow};
use argon2::Params;
use async_trait::async_trait;
use axum_test::TestServer;
use flixflex_core::{
    AuthCrypto, InMemoryDatabase, MetadataProvider, ProviderError, ProviderPage,
};
use flixflex_model::ContentType;
use flixflex_server::{AppState, create_app, infra::config::Config};
use serde_json::{Value, json};

pub const PAGE_ITEMS: u32 = 20;

/// Deterministic stand-in for TMDB.
///
/// Movie `550` has a YouTube trailer, movie `680` only an IMDb id, and id
/// `404` does not exist upstream. Listings are generated from the page number.
#[derive(Debug, Default)]
pub struct FakeProvider {
    pub video_calls: AtomicUsize,
    pub details_calls: AtomicUsize,
}

impl FakeProvider {
    pub fn video_calls(&self) -> usize {
        self.video_calls.load(Ordering::SeqCst)
    }

    pub fn details_calls(&self) -> usize {
        self.details_calls.load(Ordering::SeqCst)
    }
}

fn listing(offset: u32, count: u32, page: u32) -> ProviderPage {
    ProviderPage {
        page,
        results: (0..count)
            .map(|i| json!({"id": offset + i, "title": format!("Item {}", offset + i)}))
            .collect(),
        total_pages: 3,
        total_results: 60,
    }
}

fn type_offset(content_type: ContentType) -> u32 {
    match content_type {
        ContentType::Movie => 10_000,
        ContentType::Tv => 20_000,
    }
}

#[async_trait]
impl MetadataProvider for FakeProvider {
    async fn details(
        &self,
        content_type: ContentType,
        id: &str,
    ) -> Result<Value, ProviderError> {
        self.details_calls.fetch_add(1, Ordering::SeqCst);
        match (content_type, id) {
            (ContentType::Movie, "550") => Ok(json!({
                "id": 550,
                "title": "Fight Club",
                "imdb_id": "tt0137523",
            })),
            (ContentType::Movie, "680") => Ok(json!({
                "id": 680,
                "title": "Pulp Fiction",
                "imdb_id": "tt0110912",
            })),
            (_, "404") => Err(ProviderError::NotFound),
            (ContentType::Tv, id) => Ok(json!({"id": id, "name": format!("Show {id}")})),
            (ContentType::Movie, id) => Ok(json!({"id": id, "title": format!("Movie {id}")})),
        }
    }

    async fn videos(
        &self,
        _content_type: ContentType,
        id: &str,
    ) -> Result<Value, ProviderError> {
        self.video_calls.fetch_add(1, Ordering::SeqCst);
        if id == "550" {
            Ok(json!({"id": 550, "results": [
                {"site": "YouTube", "type": "Featurette", "key": "feat"},
                {"site": "YouTube", "type": "Trailer", "key": "abc123"},
            ]}))
        } else {
            Ok(json!({"id": id, "results": []}))
        }
    }

    async fn popular(
        &self,
        content_type: ContentType,
        page: u32,
    ) -> Result<ProviderPage, ProviderError> {
        let offset = type_offset(content_type) + (page - 1) * PAGE_ITEMS;
        Ok(listing(offset, PAGE_ITEMS, page))
    }

    async fn top_rated(
        &self,
        content_type: ContentType,
        page: u32,
    ) -> Result<ProviderPage, ProviderError> {
        Ok(listing(type_offset(content_type) + 500, PAGE_ITEMS, page))
    }

    async fn search(
        &self,
        content_type: ContentType,
        _query: &str,
    ) -> Result<ProviderPage, ProviderError> {
        let count = match content_type {
            ContentType::Movie => 12,
            ContentType::Tv => 3,
        };
        Ok(listing(type_offset(content_type) + 900, count, 1))
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

pub fn test_config() -> Config {
    Config {
        server_host: "127.0.0.1".to_string(),
        server_port: 0,
        database_url: None,
        tmdb_api_token: None,
        tmdb_base_url: "http://tmdb.invalid/3".to_string(),
        jwt_secret: "test-secret".to_string(),
        jwt_ttl_hours: 12,
        auth_password_pepper: "test-pepper".to_string(),
        cors_allowed_origins: Vec::new(),
    }
}

// Code is used by test modules, but not in this scope
#[allow(unused)]
pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
    pub provider: Arc<FakeProvider>,
    pub store: Arc<InMemoryDatabase>,
}

#[allow(unused)]
impl TestApp {
    /// Wait for every background cache write issued so far.
    pub async fn settle(&self) {
        self.state.proxy.cache_writer().drain().await;
    }
}

#[allow(unused)]
pub fn build_test_app() -> Result<TestApp> {
    let provider = Arc::new(FakeProvider::default());
    let store = Arc::new(InMemoryDatabase::new());
    let params = Params::new(Params::MIN_M_COST, 1, 1, None)
        .map_err(|err| anyhow!(err.to_string()))?;
    let auth_crypto = AuthCrypto::with_params("test-pepper", params);

    let state = AppState::new(test_config(), provider.clone(), store.clone(), auth_crypto);
    let server = TestServer::builder()
        .build(create_app(state.clone()))
        .map_err(|err| anyhow!(err.to_string()))?;

    Ok(TestApp {
        server,
        state,
        provider,
        store,
    })
}

#[allow(unused)]
pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

/// Sign up and log in, returning a bearer token.
#[allow(unused)]
pub async fn register_and_login(server: &TestServer, username: &str) -> String {
    let credentials = json!({"username": username, "password": "Password#123"});
    server.post("/api/auth/signup").json(&credentials).await;
    let login = server.post("/api/auth/login").json(&credentials).await;
    login.assert_status_ok();
    let body: Value = login.json();
    body["token"]
        .as_str()
        .unwrap_or_else(|| panic!("token missing from {body}"))
        .to_string()
}
