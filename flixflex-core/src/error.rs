use thiserror::Error;

use crate::database::StoreError;
use crate::providers::ProviderError;

#[derive(Error, Debug)]
pub enum ProxyError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Upstream error: {0}")]
    Upstream(ProviderError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl From<ProviderError> for ProxyError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::NotFound => {
                ProxyError::NotFound("Resource not found upstream".to_string())
            }
            other => ProxyError::Upstream(other),
        }
    }
}

impl From<flixflex_model::ModelError> for ProxyError {
    fn from(err: flixflex_model::ModelError) -> Self {
        ProxyError::Validation(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ProxyError>;
