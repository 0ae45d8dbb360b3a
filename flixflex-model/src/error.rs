use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("Invalid content type '{0}'. Must be 'movie' or 'tv'.")]
    InvalidContentType(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
