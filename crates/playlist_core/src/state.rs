use std::collections::HashSet;

use catalog_logging::catalog_warn;

use crate::reconcile::reconcile;
use crate::view_model::{AppViewModel, ErrorView, LoadPhase};
use crate::{
    CollectionId, CollectionSummary, DurationReport, FetchError, Item, Page, PageCursor,
    ResolveError, SpeedMultiplier, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};

/// Generation counter for collection loads; results tagged with an older
/// generation belong to a superseded load.
pub type LoadId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AggregatorPhase {
    #[default]
    Empty,
    Loading(LoadStep),
    Ready,
    LoadingMore,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStep {
    Summary,
    FirstPage,
}

/// The fetch a failure happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStage {
    Summary,
    FirstPage,
    MorePages,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    InvalidReference(ResolveError),
    Fetch { stage: FetchStage, error: FetchError },
}

impl LoadError {
    pub fn is_retryable(&self) -> bool {
        match self {
            LoadError::InvalidReference(_) => false,
            LoadError::Fetch { error, .. } => error.is_retryable(),
        }
    }

    pub fn message(&self) -> String {
        match self {
            LoadError::InvalidReference(err) => err.to_string(),
            LoadError::Fetch { error, .. } => error.to_string(),
        }
    }
}

/// Counts of what `append_page` did with a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AppendOutcome {
    pub appended: usize,
    pub duplicates: usize,
    pub malformed: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    phase: AggregatorPhase,
    load_id: LoadId,
    collection_id: Option<CollectionId>,
    summary: Option<CollectionSummary>,
    items: Vec<Item>,
    seen_ids: HashSet<String>,
    cursor: Option<PageCursor>,
    last_error: Option<LoadError>,
    speed: SpeedMultiplier,
    page_size: u32,
    skipped_malformed: usize,
    skipped_duplicates: usize,
    report: DurationReport,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            phase: AggregatorPhase::Empty,
            load_id: 0,
            collection_id: None,
            summary: None,
            items: Vec::new(),
            seen_ids: HashSet::new(),
            cursor: None,
            last_error: None,
            speed: SpeedMultiplier::NORMAL,
            page_size: DEFAULT_PAGE_SIZE,
            skipped_malformed: 0,
            skipped_duplicates: 0,
            report: DurationReport::default(),
            dirty: false,
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a custom page size, clamped to `1..=MAX_PAGE_SIZE`.
    pub fn with_page_size(page_size: u32) -> Self {
        Self {
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
            ..Self::default()
        }
    }

    pub fn phase(&self) -> AggregatorPhase {
        self.phase
    }

    pub fn load_id(&self) -> LoadId {
        self.load_id
    }

    pub fn collection_id(&self) -> Option<&CollectionId> {
        self.collection_id.as_ref()
    }

    pub fn summary(&self) -> Option<&CollectionSummary> {
        self.summary.as_ref()
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn cursor(&self) -> Option<&PageCursor> {
        self.cursor.as_ref()
    }

    pub fn last_error(&self) -> Option<&LoadError> {
        self.last_error.as_ref()
    }

    pub fn speed(&self) -> SpeedMultiplier {
        self.speed
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn report(&self) -> &DurationReport {
        &self.report
    }

    /// True while a summary or page fetch is outstanding.
    pub fn in_flight(&self) -> bool {
        matches!(
            self.phase,
            AggregatorPhase::Loading(_) | AggregatorPhase::LoadingMore
        )
    }

    /// Whether a "load more" request would issue a fetch right now.
    pub fn can_load_more(&self) -> bool {
        if self.cursor.is_none() {
            return false;
        }
        match self.phase {
            AggregatorPhase::Ready => true,
            AggregatorPhase::Failed => matches!(
                &self.last_error,
                Some(LoadError::Fetch {
                    stage: FetchStage::MorePages,
                    error,
                }) if error.is_retryable()
            ),
            _ => false,
        }
    }

    pub fn view(&self) -> AppViewModel {
        let phase = match self.phase {
            AggregatorPhase::Empty => LoadPhase::Idle,
            AggregatorPhase::Loading(_) => LoadPhase::Loading,
            AggregatorPhase::Ready | AggregatorPhase::LoadingMore => LoadPhase::Loaded,
            AggregatorPhase::Failed => LoadPhase::Error,
        };

        AppViewModel {
            phase,
            error: self.last_error.as_ref().map(ErrorView::from_load_error),
            collection_id: self.collection_id.as_ref().map(|id| id.as_str().to_string()),
            summary: self.summary.clone(),
            items: self.items.clone(),
            duration: self.report.clone(),
            speed: self.speed.value(),
            has_more: self.cursor.is_some(),
            is_loading_more: self.phase == AggregatorPhase::LoadingMore,
            can_load_more: self.can_load_more(),
            skipped_items: self.skipped_malformed + self.skipped_duplicates,
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Reset collection data and open a new load generation.
    pub(crate) fn begin_load(&mut self, collection_id: Option<CollectionId>) -> LoadId {
        self.load_id += 1;
        self.collection_id = collection_id;
        self.summary = None;
        self.items.clear();
        self.seen_ids.clear();
        self.cursor = None;
        self.last_error = None;
        self.skipped_malformed = 0;
        self.skipped_duplicates = 0;
        self.phase = AggregatorPhase::Loading(LoadStep::Summary);
        self.refresh_report();
        self.dirty = true;
        self.load_id
    }

    pub(crate) fn begin_load_more(&mut self) {
        self.last_error = None;
        self.phase = AggregatorPhase::LoadingMore;
        self.dirty = true;
    }

    pub(crate) fn fail(&mut self, error: LoadError) {
        self.phase = AggregatorPhase::Failed;
        self.last_error = Some(error);
        self.dirty = true;
    }

    pub(crate) fn apply_summary(&mut self, summary: CollectionSummary) {
        self.summary = Some(summary);
        self.phase = AggregatorPhase::Loading(LoadStep::FirstPage);
        self.refresh_report();
        self.dirty = true;
    }

    /// Append a page after everything already held; existing items are never touched.
    pub(crate) fn append_page(&mut self, page: Page) -> AppendOutcome {
        let mut outcome = AppendOutcome {
            malformed: page.malformed,
            ..AppendOutcome::default()
        };

        for record in page.records {
            if !self.seen_ids.insert(record.id.clone()) {
                catalog_warn!(
                    "Dropping duplicate item id={} in collection {:?}",
                    record.id,
                    self.collection_id.as_ref().map(CollectionId::as_str)
                );
                outcome.duplicates += 1;
                continue;
            }
            let position = self.items.len() as u64;
            self.items.push(Item::from_record(record, position));
            outcome.appended += 1;
        }

        self.skipped_malformed += outcome.malformed;
        self.skipped_duplicates += outcome.duplicates;
        self.cursor = page.next_cursor;
        self.phase = AggregatorPhase::Ready;
        self.refresh_report();
        self.dirty = true;
        outcome
    }

    /// Returns false when `speed` was rejected or unchanged.
    pub(crate) fn set_speed(&mut self, speed: f64) -> bool {
        let Some(speed) = SpeedMultiplier::new(speed) else {
            return false;
        };
        if speed == self.speed {
            return false;
        }
        self.speed = speed;
        self.refresh_report();
        self.dirty = true;
        true
    }

    fn refresh_report(&mut self) {
        self.report = reconcile(&self.items, self.summary.as_ref(), self.speed);
    }
}
