use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use catalog_logging::{catalog_debug, catalog_info};
use playlist_core::{Effect, LoadId, Msg};

use crate::client::CatalogClient;

/// Executes core effects against a catalog client and reports results as messages.
///
/// Fetches run as tokio tasks, so effects must be executed from within a
/// tokio runtime. Each load generation gets a cancellation token; cancelling
/// a load drops its running request without reporting a result.
pub struct EngineHandle {
    client: Arc<dyn CatalogClient>,
    msg_tx: mpsc::UnboundedSender<Msg>,
    tokens: HashMap<LoadId, CancellationToken>,
}

impl EngineHandle {
    pub fn new(client: Arc<dyn CatalogClient>, msg_tx: mpsc::UnboundedSender<Msg>) -> Self {
        Self {
            client,
            msg_tx,
            tokens: HashMap::new(),
        }
    }

    pub fn execute(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            self.execute_one(effect);
        }
    }

    fn execute_one(&mut self, effect: Effect) {
        match effect {
            Effect::FetchSummary {
                load_id,
                collection_id,
            } => {
                // Older generations can no longer deliver anything useful.
                self.tokens.retain(|id, _| *id >= load_id);
                let token = self.token_for(load_id);
                let client = self.client.clone();
                let msg_tx = self.msg_tx.clone();
                tokio::spawn(async move {
                    tokio::select! {
                        _ = token.cancelled() => {
                            catalog_debug!("Summary fetch for load {} cancelled", load_id);
                        }
                        result = client.fetch_summary(&collection_id) => {
                            let _ = msg_tx.send(Msg::SummaryFetched { load_id, result });
                        }
                    }
                });
            }
            Effect::FetchPage {
                load_id,
                collection_id,
                cursor,
                page_size,
            } => {
                let token = self.token_for(load_id);
                let client = self.client.clone();
                let msg_tx = self.msg_tx.clone();
                tokio::spawn(async move {
                    tokio::select! {
                        _ = token.cancelled() => {
                            catalog_debug!("Page fetch for load {} cancelled", load_id);
                        }
                        result = client.fetch_page(&collection_id, cursor.as_ref(), page_size) => {
                            let _ = msg_tx.send(Msg::PageFetched { load_id, result });
                        }
                    }
                });
            }
            Effect::CancelLoad { load_id } => {
                if let Some(token) = self.tokens.remove(&load_id) {
                    catalog_info!("Cancelling requests for load {}", load_id);
                    token.cancel();
                }
            }
        }
    }

    fn token_for(&mut self, load_id: LoadId) -> CancellationToken {
        self.tokens
            .entry(load_id)
            .or_insert_with(CancellationToken::new)
            .clone()
    }
}
