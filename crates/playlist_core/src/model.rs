use std::fmt;

/// Items requested per page when the host does not ask for something else.
pub const DEFAULT_PAGE_SIZE: u32 = 20;
/// Largest page the catalog service will hand out.
pub const MAX_PAGE_SIZE: u32 = 50;

/// Canonical identifier of a remote collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CollectionId(String);

impl CollectionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CollectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque continuation token handed out by the catalog service.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageCursor(String);

impl PageCursor {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CollectionSummary {
    pub id: String,
    pub title: String,
    pub description: String,
    pub channel_title: String,
    pub thumbnail_url: Option<String>,
    pub published_at: String,
    pub item_count: u64,
    pub total_duration_seconds: Option<u64>,
    pub total_duration_text: Option<String>,
}

/// One entry of a fetched page, before the aggregator numbers it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ItemRecord {
    pub id: String,
    pub title: String,
    pub description: String,
    pub thumbnail_url: Option<String>,
    pub channel_title: String,
    pub published_at: String,
    pub duration_seconds: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub id: String,
    pub title: String,
    pub description: String,
    pub thumbnail_url: Option<String>,
    pub channel_title: String,
    pub published_at: String,
    /// Zero-based index in the collection; defines display and summation order.
    pub position: u64,
    pub duration_seconds: u64,
    pub duration_text: String,
}

impl Item {
    pub(crate) fn from_record(record: ItemRecord, position: u64) -> Self {
        let duration_text = crate::format_duration(record.duration_seconds);
        Self {
            id: record.id,
            title: record.title,
            description: record.description,
            thumbnail_url: record.thumbnail_url,
            channel_title: record.channel_title,
            published_at: record.published_at,
            position,
            duration_seconds: record.duration_seconds,
            duration_text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Page {
    pub records: Vec<ItemRecord>,
    /// `None` means the collection has been exhausted.
    pub next_cursor: Option<PageCursor>,
    /// Records dropped at the decode boundary because they were unusable.
    pub malformed: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    NotFound,
    RateLimited,
    Upstream,
}

impl fmt::Display for FetchErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchErrorKind::NotFound => write!(f, "not found"),
            FetchErrorKind::RateLimited => write!(f, "rate limited"),
            FetchErrorKind::Upstream => write!(f, "upstream error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FetchErrorKind,
    pub message: String,
}

impl FetchError {
    pub fn new(kind: FetchErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(FetchErrorKind::NotFound, message)
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(FetchErrorKind::RateLimited, message)
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        Self::new(FetchErrorKind::Upstream, message)
    }

    pub fn is_retryable(&self) -> bool {
        matches!(
            self.kind,
            FetchErrorKind::RateLimited | FetchErrorKind::Upstream
        )
    }
}
