use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
};
use flixflex_model::{
    CachedItem, Claims, FavoriteRequest, MessageResponse, RemoveFavoriteRequest,
};

use super::required_type;
use crate::AppState;
use crate::infra::errors::AppResult;

pub async fn add(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    payload: Result<Json<FavoriteRequest>, JsonRejection>,
) -> AppResult<Json<MessageResponse>> {
    let Json(request) = payload?;
    let content_type = required_type(request.content_type.as_deref())?;

    state
        .favorites
        .add(claims.sub, &request.movie_api_id, content_type)
        .await?;
    Ok(Json(MessageResponse::new("Movie added to favorites")))
}

pub async fn remove(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    payload: Result<Json<RemoveFavoriteRequest>, JsonRejection>,
) -> AppResult<Json<MessageResponse>> {
    let Json(request) = payload?;

    state
        .favorites
        .remove(claims.sub, &request.movie_api_id)
        .await?;
    Ok(Json(MessageResponse::new("Movie removed from favorites")))
}

pub async fn list(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> AppResult<Json<Vec<CachedItem>>> {
    Ok(Json(state.favorites.list(claims.sub).await?))
}
