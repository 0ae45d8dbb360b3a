//! Named lookups into opaque provider payloads.
//!
//! Provider responses are kept as `serde_json::Value` trees; only the handful
//! of fields read by the cache layer get accessors here.

use serde_json::Value;

/// Provider id of an item, normalized to a string.
pub fn provider_id(item: &Value) -> Option<String> {
    match item.get("id")? {
        Value::String(id) if !id.is_empty() => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

/// Display title. Movies carry `title`, series carry `name`.
pub fn title(item: &Value) -> String {
    item.get("title")
        .and_then(Value::as_str)
        .or_else(|| item.get("name").and_then(Value::as_str))
        .unwrap_or_default()
        .to_string()
}

/// IMDb identifier from a details payload, if present and non-empty.
pub fn imdb_id(details: &Value) -> Option<&str> {
    details
        .get("imdb_id")
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
}

/// A single entry of a provider video listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoRef<'a> {
    pub site: &'a str,
    pub kind: &'a str,
    pub key: &'a str,
}

/// Iterate the `results` array of a video listing, skipping malformed entries.
pub fn videos(listing: &Value) -> impl Iterator<Item = VideoRef<'_>> {
    listing
        .get("results")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|video| {
            Some(VideoRef {
                site: video.get("site")?.as_str()?,
                kind: video.get("type")?.as_str()?,
                key: video.get("key")?.as_str()?,
            })
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn normalizes_numeric_and_string_ids() {
        assert_eq!(provider_id(&json!({"id": 42})), Some("42".into()));
        assert_eq!(provider_id(&json!({"id": "42"})), Some("42".into()));
        assert_eq!(provider_id(&json!({"id": null})), None);
        assert_eq!(provider_id(&json!({})), None);
    }

    #[test]
    fn title_falls_back_to_name() {
        assert_eq!(title(&json!({"title": "Heat"})), "Heat");
        assert_eq!(title(&json!({"name": "Dark"})), "Dark");
        assert_eq!(title(&json!({})), "");
    }

    #[test]
    fn empty_imdb_id_is_absent() {
        assert_eq!(imdb_id(&json!({"imdb_id": "tt01"})), Some("tt01"));
        assert_eq!(imdb_id(&json!({"imdb_id": ""})), None);
        assert_eq!(imdb_id(&json!({"imdb_id": null})), None);
    }

    #[test]
    fn skips_malformed_videos() {
        let listing = json!({"results": [
            {"site": "YouTube", "type": "Trailer"},
            {"site": "Vimeo", "type": "Teaser", "key": "v1"},
        ]});
        let found: Vec<_> = videos(&listing).collect();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].key, "v1");
    }
}
