//! Decoding of catalog responses into core types.
//!
//! Every optional field is filled with an explicit default here, so nothing
//! past this boundary re-checks presence. Both the flat records served by the
//! catalog service and the nested `snippet`/`contentDetails` resources it
//! proxies are accepted.

use catalog_logging::{catalog_debug, catalog_warn};
use playlist_core::{
    decode_duration, format_duration, CollectionId, CollectionSummary, FetchError, ItemRecord,
    Page, PageCursor,
};
use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("invalid json: {0}")]
    InvalidJson(String),
    #[error("unexpected response shape: {0}")]
    UnexpectedShape(&'static str),
    #[error("malformed item: {0}")]
    MalformedItem(String),
}

impl From<DecodeError> for FetchError {
    fn from(err: DecodeError) -> Self {
        FetchError::upstream(err.to_string())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Thumbnail {
    url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Thumbnails {
    maxres: Option<Thumbnail>,
    standard: Option<Thumbnail>,
    high: Option<Thumbnail>,
    medium: Option<Thumbnail>,
    default: Option<Thumbnail>,
}

impl Thumbnails {
    /// Highest resolution with a usable url.
    fn best(self) -> Option<String> {
        [
            self.maxres,
            self.standard,
            self.high,
            self.medium,
            self.default,
        ]
        .into_iter()
        .flatten()
        .find_map(|thumbnail| thumbnail.url.filter(|url| !url.is_empty()))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Snippet {
    title: Option<String>,
    description: Option<String>,
    #[serde(alias = "channelTitle")]
    channel_title: Option<String>,
    #[serde(alias = "publishedAt")]
    published_at: Option<String>,
    thumbnails: Option<Thumbnails>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ContentDetails {
    #[serde(alias = "itemCount")]
    item_count: Option<u64>,
    #[serde(alias = "videoId")]
    video_id: Option<String>,
    duration: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SummaryRecord {
    id: Option<String>,
    title: Option<String>,
    description: Option<String>,
    #[serde(alias = "channelTitle")]
    channel_title: Option<String>,
    #[serde(alias = "thumbnailUrl")]
    thumbnail_url: Option<String>,
    #[serde(alias = "publishedAt")]
    published_at: Option<String>,
    #[serde(alias = "itemCount")]
    item_count: Option<u64>,
    estimated_duration_seconds: Option<u64>,
    estimated_duration_text: Option<String>,
    snippet: Option<Snippet>,
    #[serde(alias = "contentDetails")]
    content_details: Option<ContentDetails>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct VideoRecord {
    id: Option<String>,
    title: Option<String>,
    description: Option<String>,
    #[serde(alias = "channelTitle")]
    channel_title: Option<String>,
    #[serde(alias = "thumbnailUrl")]
    thumbnail_url: Option<String>,
    thumbnails: Option<Thumbnails>,
    #[serde(alias = "publishedAt")]
    published_at: Option<String>,
    duration: Option<String>,
    duration_seconds: Option<u64>,
    snippet: Option<Snippet>,
    #[serde(alias = "contentDetails")]
    content_details: Option<ContentDetails>,
}

/// Decode a collection summary response.
///
/// Accepts a bare summary object, one wrapped as `{"playlist": {...}}`, or a
/// list response `{"items": [...]}` whose empty list means the collection
/// does not exist.
pub fn decode_summary(
    body: &[u8],
    requested: &CollectionId,
) -> Result<CollectionSummary, FetchError> {
    let value: Value =
        serde_json::from_slice(body).map_err(|err| DecodeError::InvalidJson(err.to_string()))?;
    let Value::Object(mut map) = value else {
        return Err(DecodeError::UnexpectedShape("summary is not an object").into());
    };

    let inner = if let Some(playlist) = map.remove("playlist") {
        playlist
    } else if let Some(items) = map.remove("items") {
        match items {
            Value::Array(items) => items.into_iter().next().ok_or_else(|| {
                FetchError::not_found(format!("collection {requested} not found"))
            })?,
            _ => return Err(DecodeError::UnexpectedShape("summary `items` is not a list").into()),
        }
    } else {
        Value::Object(map)
    };

    let record: SummaryRecord = serde_json::from_value(inner)
        .map_err(|_| DecodeError::UnexpectedShape("summary record is not an object"))?;
    Ok(summary_from_record(record, requested))
}

fn summary_from_record(record: SummaryRecord, requested: &CollectionId) -> CollectionSummary {
    let snippet = record.snippet.unwrap_or_default();
    let details = record.content_details.unwrap_or_default();

    // The service reports 0 when its own estimate failed; that is no total at all.
    let total_duration_seconds = record.estimated_duration_seconds.filter(|secs| *secs > 0);
    let total_duration_text = total_duration_seconds.map(|secs| {
        non_empty(record.estimated_duration_text).unwrap_or_else(|| format_duration(secs))
    });

    CollectionSummary {
        id: non_empty(record.id).unwrap_or_else(|| requested.as_str().to_string()),
        title: record.title.or(snippet.title).unwrap_or_default(),
        description: record.description.or(snippet.description).unwrap_or_default(),
        channel_title: record
            .channel_title
            .or(snippet.channel_title)
            .unwrap_or_default(),
        thumbnail_url: non_empty(record.thumbnail_url)
            .or_else(|| snippet.thumbnails.and_then(Thumbnails::best)),
        published_at: record
            .published_at
            .or(snippet.published_at)
            .unwrap_or_default(),
        item_count: record.item_count.or(details.item_count).unwrap_or(0),
        total_duration_seconds,
        total_duration_text,
    }
}

/// Decode one page of collection items.
///
/// `header_cursor` is the `x-next-page-token` header, consulted when the body
/// does not carry a cursor itself. Unusable records are skipped and counted
/// rather than failing the page.
pub fn decode_page(body: &[u8], header_cursor: Option<&str>) -> Result<Page, FetchError> {
    let value: Value =
        serde_json::from_slice(body).map_err(|err| DecodeError::InvalidJson(err.to_string()))?;

    let (entries, body_cursor) = match value {
        Value::Array(entries) => (entries, None),
        Value::Object(mut map) => {
            let entries = match map.remove("videos").or_else(|| map.remove("items")) {
                Some(Value::Array(entries)) => entries,
                Some(Value::Null) | None => Vec::new(),
                Some(_) => {
                    return Err(DecodeError::UnexpectedShape("page items are not a list").into())
                }
            };
            (entries, take_string(&mut map, &["next_page_token", "nextPageToken"]))
        }
        _ => return Err(DecodeError::UnexpectedShape("page is not an object or list").into()),
    };

    let next_cursor = non_empty(body_cursor)
        .or_else(|| non_empty(header_cursor.map(str::to_string)))
        .map(PageCursor::new);

    let mut page = Page {
        records: Vec::with_capacity(entries.len()),
        next_cursor,
        malformed: 0,
    };
    for (index, entry) in entries.into_iter().enumerate() {
        match decode_item(entry) {
            Ok(record) => page.records.push(record),
            Err(err) => {
                catalog_warn!("Skipping page entry #{}: {}", index, err);
                page.malformed += 1;
            }
        }
    }
    Ok(page)
}

fn decode_item(entry: Value) -> Result<ItemRecord, DecodeError> {
    let record: VideoRecord = serde_json::from_value(entry)
        .map_err(|err| DecodeError::MalformedItem(err.to_string()))?;
    let snippet = record.snippet.unwrap_or_default();
    let details = record.content_details.unwrap_or_default();

    let id = non_empty(details.video_id)
        .or_else(|| non_empty(record.id))
        .ok_or_else(|| DecodeError::MalformedItem("missing id".to_string()))?;

    let duration_seconds = match record.duration.or(details.duration) {
        Some(token) => decode_duration(&token),
        None => match record.duration_seconds {
            Some(seconds) => seconds,
            None => {
                catalog_debug!("Item {} has no duration; counting it as 0", id);
                0
            }
        },
    };

    let thumbnail_url = non_empty(record.thumbnail_url)
        .or_else(|| record.thumbnails.and_then(Thumbnails::best))
        .or_else(|| snippet.thumbnails.and_then(Thumbnails::best));

    Ok(ItemRecord {
        id,
        title: record.title.or(snippet.title).unwrap_or_default(),
        description: record.description.or(snippet.description).unwrap_or_default(),
        thumbnail_url,
        channel_title: record
            .channel_title
            .or(snippet.channel_title)
            .unwrap_or_default(),
        published_at: record
            .published_at
            .or(snippet.published_at)
            .unwrap_or_default(),
        duration_seconds,
    })
}

fn take_string(map: &mut Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match map.remove(*key) {
        Some(Value::String(value)) => Some(value),
        _ => None,
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}
