use crate::{CollectionSummary, FetchError, LoadId, Page};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User submitted a collection reference (raw id or URL).
    Submit(String),
    /// User asked for the next page.
    RequestMore,
    /// User asked to retry the failed fetch.
    Retry,
    /// User moved the playback speed control.
    SetSpeed(f64),
    /// Engine finished the summary fetch for a load.
    SummaryFetched {
        load_id: LoadId,
        result: Result<CollectionSummary, FetchError>,
    },
    /// Engine finished a page fetch for a load.
    PageFetched {
        load_id: LoadId,
        result: Result<Page, FetchError>,
    },
}
