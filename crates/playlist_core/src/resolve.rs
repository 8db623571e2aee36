use url::Url;

use crate::CollectionId;

const HOST_MARKERS: [&str; 2] = ["youtube.com", "youtu.be"];
const LIST_PARAM: &str = "list";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("collection reference is empty")]
    Empty,
    #[error("malformed collection url: {0}")]
    MalformedUrl(String),
    #[error("url does not name a collection (no `list` parameter)")]
    MissingList,
}

/// Resolve free-form user input (raw id or collection URL) to a collection id.
///
/// Input without any URL markers is taken verbatim after trimming. Anything
/// that looks like a URL must carry a non-empty `list` query parameter.
pub fn resolve_collection_id(input: &str) -> Result<CollectionId, ResolveError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ResolveError::Empty);
    }

    if !looks_like_url(trimmed) {
        return Ok(CollectionId::new(trimmed));
    }

    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };
    let parsed =
        Url::parse(&candidate).map_err(|err| ResolveError::MalformedUrl(err.to_string()))?;

    parsed
        .query_pairs()
        .find(|(key, value)| key == LIST_PARAM && !value.trim().is_empty())
        .map(|(_, value)| CollectionId::new(value.trim()))
        .ok_or(ResolveError::MissingList)
}

fn looks_like_url(input: &str) -> bool {
    let lower = input.to_ascii_lowercase();
    lower.contains("://")
        || lower.starts_with("www.")
        || HOST_MARKERS.iter().any(|marker| lower.contains(marker))
}
