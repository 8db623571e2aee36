use crate::{CollectionId, LoadId, PageCursor};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchSummary {
        load_id: LoadId,
        collection_id: CollectionId,
    },
    FetchPage {
        load_id: LoadId,
        collection_id: CollectionId,
        cursor: Option<PageCursor>,
        page_size: u32,
    },
    /// The load was superseded; any request still running for it can be dropped.
    CancelLoad { load_id: LoadId },
}

impl Effect {
    pub fn load_id(&self) -> LoadId {
        match self {
            Effect::FetchSummary { load_id, .. }
            | Effect::FetchPage { load_id, .. }
            | Effect::CancelLoad { load_id } => *load_id,
        }
    }
}
