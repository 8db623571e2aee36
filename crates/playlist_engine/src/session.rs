use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::mpsc;

use catalog_logging::{catalog_debug, catalog_warn};
use playlist_core::{update, AppState, AppViewModel, Msg, PageCursor};

use crate::client::{CatalogClient, HttpCatalogClient};
use crate::engine::EngineHandle;
use crate::settings::CatalogSettings;
use crate::survey::EstimatingClient;

/// Owns the aggregation state and drives it with engine results.
///
/// All state mutation happens in `dispatch`, one message at a time. The
/// inbound calls (`submit`, `request_more`, `set_speed`, `retry`) apply
/// immediately and start any fetches; `next_result` and `settle` wait for
/// those fetches to report back. Must be used inside a tokio runtime.
pub struct Session {
    state: AppState,
    engine: EngineHandle,
    msg_rx: mpsc::UnboundedReceiver<Msg>,
}

impl Session {
    pub fn new(client: Arc<dyn CatalogClient>, page_size: u32) -> Self {
        let (msg_tx, msg_rx) = mpsc::unbounded_channel();
        Self {
            state: AppState::with_page_size(page_size),
            engine: EngineHandle::new(client, msg_tx),
            msg_rx,
        }
    }

    /// Build an HTTP-backed session; wraps the client in an estimator when
    /// `estimate_sample_size` is set.
    pub fn from_settings(settings: CatalogSettings) -> Result<Self, playlist_core::FetchError> {
        let page_size = settings.page_size;
        let sample_size = settings.estimate_sample_size;
        let http = HttpCatalogClient::new(settings)?;
        let client: Arc<dyn CatalogClient> = match sample_size {
            Some(sample_size) => Arc::new(EstimatingClient::new(http, sample_size)),
            None => Arc::new(http),
        };
        Ok(Self::new(client, page_size))
    }

    pub fn submit(&mut self, raw_input: impl Into<String>) -> AppViewModel {
        self.dispatch(Msg::Submit(raw_input.into()))
    }

    pub fn request_more(&mut self) -> AppViewModel {
        self.dispatch(Msg::RequestMore)
    }

    pub fn set_speed(&mut self, multiplier: f64) -> AppViewModel {
        self.dispatch(Msg::SetSpeed(multiplier))
    }

    pub fn retry(&mut self) -> AppViewModel {
        self.dispatch(Msg::Retry)
    }

    pub fn view(&self) -> AppViewModel {
        self.state.view()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn is_busy(&self) -> bool {
        self.state.in_flight()
    }

    /// Wait for one engine result and apply it.
    pub async fn next_result(&mut self) -> Option<AppViewModel> {
        let msg = self.msg_rx.recv().await?;
        Some(self.dispatch(msg))
    }

    /// Apply engine results until no fetch is outstanding.
    pub async fn settle(&mut self) -> AppViewModel {
        while self.state.in_flight() {
            if self.next_result().await.is_none() {
                break;
            }
        }
        self.state.view()
    }

    /// Keep requesting pages until the collection is exhausted or a fetch fails.
    ///
    /// Stops early if the catalog hands back a cursor it already gave out.
    pub async fn load_remaining(&mut self) -> AppViewModel {
        let mut view = self.settle().await;
        let mut seen: HashSet<PageCursor> = HashSet::new();
        while view.has_more && view.error.is_none() {
            let Some(cursor) = self.state.cursor().cloned() else {
                break;
            };
            if !seen.insert(cursor.clone()) {
                catalog_warn!("Cursor {:?} repeated; not paging further", cursor);
                break;
            }
            self.request_more();
            view = self.settle().await;
        }
        view
    }

    /// Apply one message; the returned view's `dirty` flag says whether it changed anything.
    fn dispatch(&mut self, msg: Msg) -> AppViewModel {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let view = state.view();
        if state.consume_dirty() {
            catalog_debug!(
                "Transition to {:?}: {} items, more: {}",
                state.phase(),
                view.items.len(),
                view.has_more
            );
        }
        self.state = state;
        self.engine.execute(effects);
        view
    }
}
