use std::collections::HashSet;

use catalog_logging::{catalog_info, catalog_warn};
use playlist_core::{
    format_duration, CollectionId, CollectionSummary, FetchError, Page, PageCursor, MAX_PAGE_SIZE,
};

use crate::client::CatalogClient;

fn page_seconds(page: &Page) -> u64 {
    page.records
        .iter()
        .fold(0u64, |acc, record| acc.saturating_add(record.duration_seconds))
}

/// Sum the duration of every item by walking all pages.
pub async fn exact_total_duration<C>(client: &C, id: &CollectionId) -> Result<u64, FetchError>
where
    C: CatalogClient + ?Sized,
{
    let mut total = 0u64;
    let mut cursor: Option<PageCursor> = None;
    let mut pages = 0usize;
    let mut seen: HashSet<PageCursor> = HashSet::new();

    loop {
        let page = client.fetch_page(id, cursor.as_ref(), MAX_PAGE_SIZE).await?;
        pages += 1;
        total = total.saturating_add(page_seconds(&page));
        // An empty page ends the walk even if the service hands out a cursor.
        if page.records.is_empty() && page.malformed == 0 {
            break;
        }
        match page.next_cursor {
            Some(next) if !seen.insert(next.clone()) => {
                catalog_warn!("Cursor {:?} repeated while surveying {}; stopping", next, id);
                break;
            }
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    catalog_info!("Surveyed {} pages of {}: {}s", pages, id, total);
    Ok(total)
}

/// Extrapolate the total duration from the average of a sample of items.
///
/// Falls back to the exact walk when the sample would cover the whole
/// collection. `Ok(None)` means there was nothing to extrapolate from.
pub async fn estimate_total_duration<C>(
    client: &C,
    id: &CollectionId,
    declared_count: u64,
    sample_size: u32,
) -> Result<Option<u64>, FetchError>
where
    C: CatalogClient + ?Sized,
{
    if declared_count == 0 || sample_size == 0 {
        return Ok(None);
    }
    if u64::from(sample_size) >= declared_count {
        return exact_total_duration(client, id).await.map(Some);
    }

    let page = client
        .fetch_page(id, None, sample_size.min(MAX_PAGE_SIZE))
        .await?;
    if page.records.is_empty() {
        return Ok(None);
    }
    let average = page_seconds(&page) as f64 / page.records.len() as f64;
    Ok(Some((average * declared_count as f64) as u64))
}

/// Decorates a client so summaries always carry a duration total when one can be estimated.
pub struct EstimatingClient<C> {
    inner: C,
    sample_size: u32,
}

impl<C> EstimatingClient<C> {
    pub fn new(inner: C, sample_size: u32) -> Self {
        Self { inner, sample_size }
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }
}

#[async_trait::async_trait]
impl<C: CatalogClient> CatalogClient for EstimatingClient<C> {
    async fn fetch_summary(&self, id: &CollectionId) -> Result<CollectionSummary, FetchError> {
        let mut summary = self.inner.fetch_summary(id).await?;
        if summary.total_duration_seconds.is_some() {
            return Ok(summary);
        }

        match estimate_total_duration(&self.inner, id, summary.item_count, self.sample_size).await
        {
            Ok(Some(total)) if total > 0 => {
                summary.total_duration_seconds = Some(total);
                summary.total_duration_text = Some(format_duration(total));
            }
            Ok(_) => {}
            Err(err) => catalog_warn!("Could not estimate duration for {}: {}", id, err),
        }
        Ok(summary)
    }

    async fn fetch_page(
        &self,
        id: &CollectionId,
        cursor: Option<&PageCursor>,
        page_size: u32,
    ) -> Result<Page, FetchError> {
        self.inner.fetch_page(id, cursor, page_size).await
    }
}
