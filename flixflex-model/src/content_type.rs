use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// The two content categories served by the upstream provider.
///
/// The serialized form doubles as the provider path segment, so
/// `ContentType::Tv` becomes `/tv/{id}` and `/search/tv`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    /// Feature films (primary type)
    Movie,
    /// Television series (secondary type)
    Tv,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Movie => "movie",
            ContentType::Tv => "tv",
        }
    }

    /// Whether this is the primary category. Stored on every cached item.
    pub fn is_movie(&self) -> bool {
        matches!(self, ContentType::Movie)
    }
}

impl Display for ContentType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = ModelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "movie" => Ok(ContentType::Movie),
            "tv" => Ok(ContentType::Tv),
            other => Err(ModelError::InvalidContentType(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_provider_segments() {
        assert_eq!("movie".parse::<ContentType>(), Ok(ContentType::Movie));
        assert_eq!("tv".parse::<ContentType>(), Ok(ContentType::Tv));
        assert!("series".parse::<ContentType>().is_err());
        assert!("Movie".parse::<ContentType>().is_err());
    }

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_string(&ContentType::Tv).unwrap();
        assert_eq!(json, "\"tv\"");
        assert!(ContentType::Movie.is_movie());
        assert!(!ContentType::Tv.is_movie());
    }
}
