use crate::state::LoadError;
use crate::{CollectionSummary, DurationReport, FetchErrorKind, Item};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadPhase {
    #[default]
    Idle,
    Loading,
    Loaded,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidReference,
    NotFound,
    RateLimited,
    Upstream,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorView {
    pub kind: ErrorKind,
    pub message: String,
    /// Whether the renderer should offer a retry affordance.
    pub retryable: bool,
}

impl ErrorView {
    pub(crate) fn from_load_error(error: &LoadError) -> Self {
        let kind = match error {
            LoadError::InvalidReference(_) => ErrorKind::InvalidReference,
            LoadError::Fetch { error, .. } => match error.kind {
                FetchErrorKind::NotFound => ErrorKind::NotFound,
                FetchErrorKind::RateLimited => ErrorKind::RateLimited,
                FetchErrorKind::Upstream => ErrorKind::Upstream,
            },
        };
        Self {
            kind,
            message: error.message(),
            retryable: error.is_retryable(),
        }
    }
}

/// Read-only snapshot handed to the renderer after each transition.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppViewModel {
    pub phase: LoadPhase,
    pub error: Option<ErrorView>,
    pub collection_id: Option<String>,
    pub summary: Option<CollectionSummary>,
    pub items: Vec<Item>,
    pub duration: DurationReport,
    pub speed: f64,
    pub has_more: bool,
    pub is_loading_more: bool,
    pub can_load_more: bool,
    /// Records dropped as malformed or duplicate across all pages of this load.
    pub skipped_items: usize,
    pub dirty: bool,
}
