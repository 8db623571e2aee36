#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, Once};
use std::time::Duration;

use playlist_core::{
    CollectionId, CollectionSummary, FetchError, ItemRecord, Page, PageCursor,
};
use playlist_engine::CatalogClient;

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(catalog_logging::initialize_for_tests);
}

pub fn record(id: &str, seconds: u64) -> ItemRecord {
    ItemRecord {
        id: id.to_string(),
        title: format!("Video {id}"),
        duration_seconds: seconds,
        ..ItemRecord::default()
    }
}

pub fn page(records: Vec<ItemRecord>, next: Option<&str>) -> Page {
    Page {
        records,
        next_cursor: next.map(PageCursor::new),
        malformed: 0,
    }
}

/// In-memory catalog keyed by collection id and cursor.
#[derive(Default)]
pub struct FakeCatalog {
    summaries: HashMap<String, CollectionSummary>,
    pages: HashMap<(String, Option<String>), Page>,
    summary_delays: HashMap<String, Duration>,
    page_delay: Duration,
    page_failures: Mutex<VecDeque<FetchError>>,
    summary_calls: AtomicUsize,
    page_calls: AtomicUsize,
    page_sizes: Mutex<Vec<u32>>,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_summary(mut self, id: &str, item_count: u64, total: Option<u64>) -> Self {
        self.summaries.insert(
            id.to_string(),
            CollectionSummary {
                id: id.to_string(),
                title: format!("Collection {id}"),
                item_count,
                total_duration_seconds: total,
                ..CollectionSummary::default()
            },
        );
        self
    }

    pub fn with_page(mut self, id: &str, cursor: Option<&str>, page: Page) -> Self {
        self.pages
            .insert((id.to_string(), cursor.map(str::to_string)), page);
        self
    }

    pub fn with_summary_delay(mut self, id: &str, delay: Duration) -> Self {
        self.summary_delays.insert(id.to_string(), delay);
        self
    }

    pub fn with_page_delay(mut self, delay: Duration) -> Self {
        self.page_delay = delay;
        self
    }

    /// The next page fetch fails with `error`, whatever it asks for.
    pub fn fail_next_page(&self, error: FetchError) {
        self.page_failures.lock().unwrap().push_back(error);
    }

    pub fn summary_calls(&self) -> usize {
        self.summary_calls.load(Ordering::SeqCst)
    }

    pub fn page_calls(&self) -> usize {
        self.page_calls.load(Ordering::SeqCst)
    }

    pub fn page_sizes(&self) -> Vec<u32> {
        self.page_sizes.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl CatalogClient for FakeCatalog {
    async fn fetch_summary(&self, id: &CollectionId) -> Result<CollectionSummary, FetchError> {
        self.summary_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.summary_delays.get(id.as_str()) {
            tokio::time::sleep(*delay).await;
        }
        self.summaries
            .get(id.as_str())
            .cloned()
            .ok_or_else(|| FetchError::not_found(format!("no collection {id}")))
    }

    async fn fetch_page(
        &self,
        id: &CollectionId,
        cursor: Option<&PageCursor>,
        page_size: u32,
    ) -> Result<Page, FetchError> {
        self.page_calls.fetch_add(1, Ordering::SeqCst);
        self.page_sizes.lock().unwrap().push(page_size);
        if !self.page_delay.is_zero() {
            tokio::time::sleep(self.page_delay).await;
        }
        let failure = self.page_failures.lock().unwrap().pop_front();
        if let Some(err) = failure {
            return Err(err);
        }
        let key = (
            id.as_str().to_string(),
            cursor.map(|cursor| cursor.as_str().to_string()),
        );
        self.pages
            .get(&key)
            .cloned()
            .ok_or_else(|| FetchError::upstream(format!("no page for {key:?}")))
    }
}
