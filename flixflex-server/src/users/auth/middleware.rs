use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::AppState;
use crate::infra::errors::AppError;

/// Require a valid bearer JWT and expose its [`flixflex_model::Claims`] to
/// handlers through request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_bearer_token(&request)
        .ok_or_else(|| AppError::unauthorized("Access denied. No token provided."))?;

    let claims = state.jwt.validate(token).map_err(|err| {
        debug!(error = %err, "rejected bearer token");
        AppError::unauthorized("Invalid token.")
    })?;

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

fn extract_bearer_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}
