pub mod favorites;
pub mod movies;

use flixflex_model::ContentType;

use crate::infra::errors::{AppError, AppResult};

pub const INVALID_TYPE_MESSAGE: &str =
    "Invalid 'type' query parameter. Must be 'movie' or 'tv'.";

/// `type` must be present and one of the known content types.
pub fn required_type(raw: Option<&str>) -> AppResult<ContentType> {
    raw.and_then(|value| value.parse().ok())
        .ok_or_else(|| AppError::bad_request(INVALID_TYPE_MESSAGE))
}

/// A missing or empty `type` selects both content types.
pub fn optional_type(raw: Option<&str>) -> AppResult<Option<ContentType>> {
    match raw.map(str::trim).filter(|value| !value.is_empty()) {
        None => Ok(None),
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| AppError::bad_request(INVALID_TYPE_MESSAGE)),
    }
}

pub async fn health() -> &'static str {
    "FlixFlex API is running"
}
