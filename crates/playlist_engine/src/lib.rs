//! Playlist engine: catalog IO and effect execution for the core state machine.
mod client;
mod engine;
mod session;
mod settings;
mod survey;
mod wire;

pub use client::{CatalogClient, HttpCatalogClient, NEXT_PAGE_HEADER};
pub use engine::EngineHandle;
pub use session::Session;
pub use settings::{CatalogSettings, API_KEY_VAR, BASE_URL_VAR};
pub use survey::{estimate_total_duration, exact_total_duration, EstimatingClient};
pub use wire::{decode_page, decode_summary, DecodeError};
