use std::time::Duration;

use playlist_core::DEFAULT_PAGE_SIZE;

pub const BASE_URL_VAR: &str = "CATALOG_BASE_URL";
pub const API_KEY_VAR: &str = "CATALOG_API_KEY";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogSettings {
    /// Root of the catalog service, e.g. `http://localhost:8000/api`.
    pub base_url: String,
    /// Sent as the `key` query parameter when present.
    pub api_key: Option<String>,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_bytes: u64,
    pub page_size: u32,
    /// When set, summaries without a precomputed total get an estimate
    /// extrapolated from a sample of this many items.
    pub estimate_sample_size: Option<u32>,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api".to_string(),
            api_key: None,
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_bytes: 2 * 1024 * 1024,
            page_size: DEFAULT_PAGE_SIZE,
            estimate_sample_size: None,
        }
    }
}

impl CatalogSettings {
    /// Defaults overridden by `CATALOG_BASE_URL` and `CATALOG_API_KEY`.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut settings = Self::default();
        if let Some(base_url) = non_empty(lookup(BASE_URL_VAR)) {
            settings.base_url = base_url;
        }
        settings.api_key = non_empty(lookup(API_KEY_VAR));
        settings
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
