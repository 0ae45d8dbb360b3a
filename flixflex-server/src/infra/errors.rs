use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use flixflex_core::database::StoreError;
use flixflex_core::{AuthCryptoError, ProviderError, ProxyError};
use serde_json::json;
use std::fmt;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, message)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": {
                "message": self.message,
                "status": self.status.as_u16(),
            }
        }));

        (self.status, body).into_response()
    }
}

impl From<ProxyError> for AppError {
    fn from(err: ProxyError) -> Self {
        match err {
            ProxyError::Validation(msg) => Self::bad_request(msg),
            ProxyError::NotFound(msg) => Self::not_found(msg),
            ProxyError::Upstream(ProviderError::RateLimited) => {
                tracing::warn!("upstream provider rate limited the request");
                Self::unavailable("Upstream provider is rate limiting requests")
            }
            ProxyError::Upstream(err) => {
                tracing::error!(error = %err, "upstream provider request failed");
                Self::internal("Internal Server Error")
            }
            ProxyError::Store(err) => err.into(),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(msg) => Self::conflict(msg),
            other => {
                tracing::error!(error = %other, "store operation failed");
                Self::internal("Internal Server Error")
            }
        }
    }
}

impl From<AuthCryptoError> for AppError {
    fn from(err: AuthCryptoError) -> Self {
        tracing::error!(error = %err, "password hashing failed");
        Self::internal("Internal Server Error")
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_proxy_errors_to_statuses() {
        let cases = [
            (ProxyError::Validation("bad".into()), StatusCode::BAD_REQUEST),
            (ProxyError::NotFound("gone".into()), StatusCode::NOT_FOUND),
            (
                ProxyError::Upstream(ProviderError::RateLimited),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                ProxyError::Upstream(ProviderError::InvalidApiKey),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                ProxyError::Store(StoreError::Conflict("User already exists".into())),
                StatusCode::CONFLICT,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(AppError::from(err).status, status);
        }
    }

    #[test]
    fn internal_details_are_not_leaked() {
        let err = AppError::from(StoreError::Internal("pool exhausted".into()));
        assert_eq!(err.message, "Internal Server Error");
    }
}
