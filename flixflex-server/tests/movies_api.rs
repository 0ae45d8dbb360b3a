use anyhow::Result;
use axum::http::StatusCode;
use flixflex_core::database::{CachedItemStore, ItemFilter};
use serde_json::Value;

#[path = "support/mod.rs"]
mod support;
use support::build_test_app;

#[tokio::test]
async fn health_line_is_served_under_api() -> Result<()> {
    let app = build_test_app()?;

    let response = app.server.get("/api").await;

    response.assert_status_ok();
    assert!(response.text().contains("running"));
    Ok(())
}

#[tokio::test]
async fn details_are_proxied_and_cached() -> Result<()> {
    let app = build_test_app()?;

    let response = app
        .server
        .get("/api/movies/details/550")
        .add_query_param("type", "movie")
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["title"], "Fight Club");

    app.settle().await;
    let cached = app
        .store
        .find_one(&ItemFilter::provider_id("550"))
        .await?
        .expect("details should be cached");
    assert!(cached.is_movie);
    assert_eq!(cached.title, "Fight Club");
    Ok(())
}

#[tokio::test]
async fn invalid_type_is_rejected() -> Result<()> {
    let app = build_test_app()?;

    for path in ["/api/movies/details/550", "/api/movies/list", "/api/movies/top"] {
        let response = app
            .server
            .get(path)
            .add_query_param("type", "anime")
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(
            body["error"]["message"],
            "Invalid 'type' query parameter. Must be 'movie' or 'tv'."
        );
    }

    app.server
        .get("/api/movies/trailer/550")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn unknown_item_is_not_found() -> Result<()> {
    let app = build_test_app()?;

    let response = app
        .server
        .get("/api/movies/details/404")
        .add_query_param("type", "tv")
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn trailer_is_resolved_once_then_served_from_cache() -> Result<()> {
    let app = build_test_app()?;

    for _ in 0..2 {
        let response = app
            .server
            .get("/api/movies/trailer/550")
            .add_query_param("type", "movie")
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["url"], "https://www.youtube.com/watch?v=abc123");
    }

    assert_eq!(app.provider.video_calls(), 1);
    Ok(())
}

#[tokio::test]
async fn trailer_falls_back_to_imdb() -> Result<()> {
    let app = build_test_app()?;

    let response = app
        .server
        .get("/api/movies/trailer/680")
        .add_query_param("type", "movie")
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["url"], "https://www.imdb.com/title/tt0110912");
    assert_eq!(app.provider.details_calls(), 1);
    Ok(())
}

#[tokio::test]
async fn list_reslices_provider_pages() -> Result<()> {
    let app = build_test_app()?;

    let first: Value = app
        .server
        .get("/api/movies/list")
        .add_query_param("type", "movie")
        .add_query_param("page", "1")
        .await
        .json();
    let second: Value = app
        .server
        .get("/api/movies/list")
        .add_query_param("type", "movie")
        .add_query_param("page", "2")
        .await
        .json();

    let first_ids: Vec<u64> = first["results"]
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(|item| item["id"].as_u64())
        .collect();
    let second_ids: Vec<u64> = second["results"]
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(|item| item["id"].as_u64())
        .collect();

    assert_eq!(first_ids, (10_000..10_010).collect::<Vec<u64>>());
    assert_eq!(second_ids, (10_010..10_020).collect::<Vec<u64>>());
    assert_eq!(first["page"], 1);
    assert_eq!(second["page"], 2);
    assert_eq!(first["total_pages"], 6);
    assert_eq!(first["total_results"], 60);

    app.settle().await;
    assert_eq!(app.store.item_count(), 20);
    Ok(())
}

#[tokio::test]
async fn invalid_page_falls_back_to_first() -> Result<()> {
    let app = build_test_app()?;

    let body: Value = app
        .server
        .get("/api/movies/list")
        .add_query_param("type", "tv")
        .add_query_param("page", "zero")
        .await
        .json();

    assert_eq!(body["page"], 1);
    assert_eq!(body["results"][0]["id"], 20_000);
    Ok(())
}

#[tokio::test]
async fn top_without_type_returns_both_envelopes() -> Result<()> {
    let app = build_test_app()?;

    let response = app.server.get("/api/movies/top").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["movies"].as_array().map(Vec::len), Some(5));
    assert_eq!(body["series"].as_array().map(Vec::len), Some(5));

    app.settle().await;
    assert_eq!(app.store.item_count(), 40);
    Ok(())
}

#[tokio::test]
async fn top_with_type_returns_a_plain_list() -> Result<()> {
    let app = build_test_app()?;

    let body: Value = app
        .server
        .get("/api/movies/top")
        .add_query_param("type", "tv")
        .await
        .json();

    assert_eq!(body.as_array().map(Vec::len), Some(5));
    Ok(())
}

#[tokio::test]
async fn search_returns_full_lists() -> Result<()> {
    let app = build_test_app()?;

    let body: Value = app
        .server
        .get("/api/movies/search")
        .add_query_param("query", "star")
        .await
        .json();

    assert_eq!(body["movies"].as_array().map(Vec::len), Some(12));
    assert_eq!(body["series"].as_array().map(Vec::len), Some(3));
    Ok(())
}

#[tokio::test]
async fn search_requires_a_query() -> Result<()> {
    let app = build_test_app()?;

    app.server
        .get("/api/movies/search")
        .add_query_param("type", "movie")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    Ok(())
}
