use catalog_logging::{catalog_debug, catalog_info, catalog_warn};

use crate::state::{AggregatorPhase, FetchStage, LoadError, LoadStep};
use crate::{
    resolve_collection_id, AppState, CollectionSummary, Effect, FetchError, LoadId, Msg, Page,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::Submit(raw) => submit(&mut state, &raw),
        Msg::RequestMore => request_more(&mut state),
        Msg::Retry => retry(&mut state),
        Msg::SetSpeed(speed) => {
            if !state.set_speed(speed) {
                catalog_debug!("Ignoring speed change to {}", speed);
            }
            Vec::new()
        }
        Msg::SummaryFetched { load_id, result } => summary_fetched(&mut state, load_id, result),
        Msg::PageFetched { load_id, result } => page_fetched(&mut state, load_id, result),
    };

    (state, effects)
}

fn submit(state: &mut AppState, raw: &str) -> Vec<Effect> {
    // A new submission always supersedes whatever is in flight.
    let superseded = state.in_flight().then(|| state.load_id());
    let mut effects = Vec::with_capacity(2);
    if let Some(load_id) = superseded {
        catalog_info!("Superseding in-flight load {}", load_id);
        effects.push(Effect::CancelLoad { load_id });
    }

    match resolve_collection_id(raw) {
        Ok(collection_id) => {
            let load_id = state.begin_load(Some(collection_id.clone()));
            catalog_info!("Starting load {} for collection {}", load_id, collection_id);
            effects.push(Effect::FetchSummary {
                load_id,
                collection_id,
            });
        }
        Err(err) => {
            catalog_warn!("Rejected collection reference {:?}: {}", raw.trim(), err);
            state.begin_load(None);
            state.fail(LoadError::InvalidReference(err));
        }
    }
    effects
}

fn request_more(state: &mut AppState) -> Vec<Effect> {
    if !state.can_load_more() {
        catalog_debug!(
            "Ignoring load-more request in phase {:?} (cursor present: {})",
            state.phase(),
            state.cursor().is_some()
        );
        return Vec::new();
    }
    let (Some(collection_id), Some(cursor)) =
        (state.collection_id().cloned(), state.cursor().cloned())
    else {
        return Vec::new();
    };

    state.begin_load_more();
    vec![Effect::FetchPage {
        load_id: state.load_id(),
        collection_id,
        cursor: Some(cursor),
        page_size: state.page_size(),
    }]
}

fn retry(state: &mut AppState) -> Vec<Effect> {
    if state.phase() != AggregatorPhase::Failed {
        return Vec::new();
    }
    let stage = match state.last_error() {
        Some(LoadError::Fetch { stage, error }) if error.is_retryable() => *stage,
        _ => {
            catalog_debug!("Last error is not retryable; ignoring retry");
            return Vec::new();
        }
    };

    match stage {
        FetchStage::MorePages => request_more(state),
        FetchStage::Summary | FetchStage::FirstPage => {
            let Some(collection_id) = state.collection_id().cloned() else {
                return Vec::new();
            };
            let load_id = state.begin_load(Some(collection_id.clone()));
            catalog_info!("Retrying load {} for collection {}", load_id, collection_id);
            vec![Effect::FetchSummary {
                load_id,
                collection_id,
            }]
        }
    }
}

fn summary_fetched(
    state: &mut AppState,
    load_id: LoadId,
    result: Result<CollectionSummary, FetchError>,
) -> Vec<Effect> {
    if load_id != state.load_id()
        || state.phase() != AggregatorPhase::Loading(LoadStep::Summary)
    {
        catalog_debug!("Discarding summary for superseded load {}", load_id);
        return Vec::new();
    }

    match result {
        Ok(summary) => {
            let Some(collection_id) = state.collection_id().cloned() else {
                return Vec::new();
            };
            catalog_info!(
                "Load {}: summary '{}' declares {} items",
                load_id,
                summary.title,
                summary.item_count
            );
            state.apply_summary(summary);
            vec![Effect::FetchPage {
                load_id,
                collection_id,
                cursor: None,
                page_size: state.page_size(),
            }]
        }
        Err(error) => {
            catalog_warn!("Load {}: summary fetch failed: {}", load_id, error);
            state.fail(LoadError::Fetch {
                stage: FetchStage::Summary,
                error,
            });
            Vec::new()
        }
    }
}

fn page_fetched(
    state: &mut AppState,
    load_id: LoadId,
    result: Result<Page, FetchError>,
) -> Vec<Effect> {
    let stage = match state.phase() {
        AggregatorPhase::Loading(LoadStep::FirstPage) => FetchStage::FirstPage,
        AggregatorPhase::LoadingMore => FetchStage::MorePages,
        _ => {
            catalog_debug!("Discarding unexpected page for load {}", load_id);
            return Vec::new();
        }
    };
    if load_id != state.load_id() {
        catalog_debug!("Discarding page for superseded load {}", load_id);
        return Vec::new();
    }

    match result {
        Ok(page) => {
            let outcome = state.append_page(page);
            catalog_info!(
                "Load {}: appended {} items ({} duplicate, {} malformed), total {}, more: {}",
                load_id,
                outcome.appended,
                outcome.duplicates,
                outcome.malformed,
                state.items().len(),
                state.cursor().is_some()
            );
        }
        Err(error) => {
            // Items and the previous cursor stay in place so a retry can resume.
            catalog_warn!("Load {}: page fetch failed: {}", load_id, error);
            state.fail(LoadError::Fetch { stage, error });
        }
    }
    Vec::new()
}
