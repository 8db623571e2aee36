use crate::{format_duration, CollectionSummary, Item};

pub const MIN_SPEED: f64 = 1.0;
pub const MAX_SPEED: f64 = 2.0;
/// Granularity hosts should use for speed controls.
pub const SPEED_STEP: f64 = 0.05;

/// Playback speed divisor, always within `MIN_SPEED..=MAX_SPEED`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct SpeedMultiplier(f64);

impl SpeedMultiplier {
    pub const NORMAL: Self = Self(MIN_SPEED);

    /// Clamp `value` into range; non-finite values are rejected.
    pub fn new(value: f64) -> Option<Self> {
        if value.is_finite() {
            Some(Self(value.clamp(MIN_SPEED, MAX_SPEED)))
        } else {
            None
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl Default for SpeedMultiplier {
    fn default() -> Self {
        Self::NORMAL
    }
}

/// Where the raw total of a report came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TotalSource {
    #[default]
    FetchedItems,
    Summary,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DurationReport {
    pub raw_seconds: u64,
    pub adjusted_seconds: u64,
    pub raw_text: String,
    pub adjusted_text: String,
    pub source: TotalSource,
}

impl Default for DurationReport {
    fn default() -> Self {
        Self::from_raw(0, SpeedMultiplier::NORMAL, TotalSource::FetchedItems)
    }
}

impl DurationReport {
    fn from_raw(raw_seconds: u64, speed: SpeedMultiplier, source: TotalSource) -> Self {
        let adjusted_seconds = adjust_for_speed(raw_seconds, speed);
        Self {
            raw_seconds,
            adjusted_seconds,
            raw_text: format_duration(raw_seconds),
            adjusted_text: format_duration(adjusted_seconds),
            source,
        }
    }
}

/// Seconds needed at `speed`, rounded half-up to the nearest second.
pub fn adjust_for_speed(raw_seconds: u64, speed: SpeedMultiplier) -> u64 {
    (raw_seconds as f64 / speed.value() + 0.5).floor() as u64
}

/// Recompute the duration report for the current items and speed.
///
/// A precomputed total on the summary wins over the running sum, since it may
/// cover items that have not been paged in yet.
pub fn reconcile(
    items: &[Item],
    summary: Option<&CollectionSummary>,
    speed: SpeedMultiplier,
) -> DurationReport {
    match summary.and_then(|summary| summary.total_duration_seconds) {
        Some(total) => DurationReport::from_raw(total, speed, TotalSource::Summary),
        None => {
            let sum = items
                .iter()
                .fold(0u64, |acc, item| acc.saturating_add(item.duration_seconds));
            DurationReport::from_raw(sum, speed, TotalSource::FetchedItems)
        }
    }
}
