//! Playlist core: pure aggregation state machine, duration codec and view-model helpers.
mod duration;
mod effect;
mod model;
mod msg;
mod reconcile;
mod resolve;
mod state;
mod update;
mod view_model;

pub use duration::{decode_duration, format_duration};
pub use effect::Effect;
pub use model::{
    CollectionId, CollectionSummary, FetchError, FetchErrorKind, Item, ItemRecord, Page,
    PageCursor, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};
pub use msg::Msg;
pub use reconcile::{
    adjust_for_speed, reconcile, DurationReport, SpeedMultiplier, TotalSource, MAX_SPEED,
    MIN_SPEED, SPEED_STEP,
};
pub use resolve::{resolve_collection_id, ResolveError};
pub use state::{
    AggregatorPhase, AppState, AppendOutcome, FetchStage, LoadError, LoadId, LoadStep,
};
pub use update::update;
pub use view_model::{AppViewModel, ErrorKind, ErrorView, LoadPhase};
