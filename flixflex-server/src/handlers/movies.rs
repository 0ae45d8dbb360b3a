use axum::{
    Json,
    extract::{Path, Query, State},
};
use flixflex_core::CacheMode;
use flixflex_model::{Listing, PaginatedList, TrailerLink};
use serde::Deserialize;
use serde_json::Value;

use super::{optional_type, required_type};
use crate::AppState;
use crate::infra::errors::AppResult;

#[derive(Debug, Deserialize)]
pub struct TypeQuery {
    #[serde(rename = "type")]
    pub content_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page: Option<String>,
    #[serde(rename = "type")]
    pub content_type: Option<String>,
}

impl ListQuery {
    /// Missing, non-numeric and zero pages all mean the first page.
    fn page(&self) -> u32 {
        self.page
            .as_deref()
            .and_then(|page| page.trim().parse::<u32>().ok())
            .filter(|page| *page > 0)
            .unwrap_or(1)
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub query: Option<String>,
    #[serde(rename = "type")]
    pub content_type: Option<String>,
}

pub async fn details(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<TypeQuery>,
) -> AppResult<Json<Value>> {
    let content_type = required_type(query.content_type.as_deref())?;
    let details = state
        .proxy
        .get_details(&id, content_type, CacheMode::Background)
        .await?;
    Ok(Json(details))
}

pub async fn trailer(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<TypeQuery>,
) -> AppResult<Json<TrailerLink>> {
    let content_type = required_type(query.content_type.as_deref())?;
    Ok(Json(state.proxy.get_trailer(&id, content_type).await?))
}

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<PaginatedList>> {
    let content_type = required_type(query.content_type.as_deref())?;
    Ok(Json(
        state
            .proxy
            .list_paginated(query.page(), content_type)
            .await?,
    ))
}

pub async fn top(
    State(state): State<AppState>,
    Query(query): Query<TypeQuery>,
) -> AppResult<Json<Listing>> {
    let content_type = optional_type(query.content_type.as_deref())?;
    Ok(Json(state.proxy.list_top(content_type).await?))
}

pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Listing>> {
    let content_type = optional_type(query.content_type.as_deref())?;
    let text = query.query.as_deref().unwrap_or_default();
    Ok(Json(state.proxy.search(text, content_type).await?))
}
