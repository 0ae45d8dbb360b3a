use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use flixflex_model::{
    Claims, LoginRequest, LoginResponse, MessageResponse, ProfileResponse,
    RegisterRequest,
};
use tracing::info;

use crate::AppState;
use crate::infra::errors::{AppError, AppResult};

pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<MessageResponse>)> {
    let Json(request) = payload?;
    request.validate().map_err(AppError::bad_request)?;

    if state
        .users
        .get_user_by_username(&request.username)
        .await?
        .is_some()
    {
        return Err(AppError::conflict("User already exists"));
    }

    let crypto = Arc::clone(&state.auth_crypto);
    let password = request.password;
    let password_hash = tokio::task::spawn_blocking(move || crypto.hash_password(&password))
        .await
        .map_err(|err| AppError::internal(format!("password hashing task failed: {err}")))??;

    let user = state
        .users
        .create_user(&request.username, &password_hash)
        .await?;
    info!(user_id = %user.id, username = %user.username, "user registered");

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("User registered successfully")),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<Json<LoginResponse>> {
    let Json(request) = payload?;

    let user = state
        .users
        .get_user_by_username(&request.username)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;
    let password_hash = state
        .users
        .get_password_hash(user.id)
        .await?
        .ok_or_else(|| AppError::internal("User has no stored credentials"))?;

    let crypto = Arc::clone(&state.auth_crypto);
    let password = request.password;
    let valid = tokio::task::spawn_blocking(move || {
        crypto.verify_password(&password, &password_hash)
    })
    .await
    .map_err(|err| AppError::internal(format!("password verification task failed: {err}")))??;

    if !valid {
        return Err(AppError::bad_request("Invalid credentials"));
    }

    let token = state
        .jwt
        .issue(&user)
        .map_err(|err| AppError::internal(format!("failed to issue token: {err}")))?;
    info!(user_id = %user.id, "user logged in");

    Ok(Json(LoginResponse { token }))
}

pub async fn me(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> AppResult<Json<ProfileResponse>> {
    let user = state
        .users
        .get_user_by_id(claims.sub)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;
    let favorites = state.favorites.list(user.id).await?;

    Ok(Json(ProfileResponse {
        username: user.username,
        favorites,
    }))
}
