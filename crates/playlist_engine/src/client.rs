use futures_util::StreamExt;
use reqwest::StatusCode;
use url::Url;

use catalog_logging::{catalog_debug, catalog_warn};
use playlist_core::{CollectionId, CollectionSummary, FetchError, Page, PageCursor, MAX_PAGE_SIZE};

use crate::settings::CatalogSettings;
use crate::wire::{decode_page, decode_summary};

/// Response header carrying the continuation cursor when the body is a bare list.
pub const NEXT_PAGE_HEADER: &str = "x-next-page-token";

/// The two calls the aggregator needs from a catalog service.
///
/// Each call is exactly one logical request; retries are the caller's business.
#[async_trait::async_trait]
pub trait CatalogClient: Send + Sync {
    async fn fetch_summary(&self, id: &CollectionId) -> Result<CollectionSummary, FetchError>;

    async fn fetch_page(
        &self,
        id: &CollectionId,
        cursor: Option<&PageCursor>,
        page_size: u32,
    ) -> Result<Page, FetchError>;
}

#[derive(Debug, Clone)]
pub struct HttpCatalogClient {
    settings: CatalogSettings,
    client: reqwest::Client,
}

struct RawResponse {
    body: Vec<u8>,
    next_page_header: Option<String>,
}

impl HttpCatalogClient {
    pub fn new(settings: CatalogSettings) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| FetchError::upstream(format!("http client: {err}")))?;
        Ok(Self { settings, client })
    }

    pub fn settings(&self) -> &CatalogSettings {
        &self.settings
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, FetchError> {
        let mut url = Url::parse(&self.settings.base_url)
            .map_err(|err| FetchError::upstream(format!("invalid catalog base url: {err}")))?;
        url.path_segments_mut()
            .map_err(|_| FetchError::upstream("catalog base url cannot carry a path"))?
            .pop_if_empty()
            .extend(segments);
        if let Some(key) = &self.settings.api_key {
            url.query_pairs_mut().append_pair("key", key);
        }
        Ok(url)
    }

    async fn get(&self, url: Url) -> Result<RawResponse, FetchError> {
        catalog_debug!("GET {}", redact(&url));
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        let next_page_header = response
            .headers()
            .get(NEXT_PAGE_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        if !status.is_success() {
            let body = self.read_body(response).await.unwrap_or_default();
            let err = map_status(status, &body);
            catalog_warn!("GET {} failed: {}", redact(&url), err);
            return Err(err);
        }

        let body = self.read_body(response).await?;
        Ok(RawResponse {
            body,
            next_page_header,
        })
    }

    async fn read_body(&self, response: reqwest::Response) -> Result<Vec<u8>, FetchError> {
        let max_bytes = self.settings.max_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(FetchError::upstream(format!(
                    "response too large (max {max_bytes}, actual {content_len})"
                )));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(FetchError::upstream(format!(
                    "response too large (max {max_bytes}, actual {next_len})"
                )));
            }
            bytes.extend_from_slice(&chunk);
        }
        Ok(bytes)
    }
}

#[async_trait::async_trait]
impl CatalogClient for HttpCatalogClient {
    async fn fetch_summary(&self, id: &CollectionId) -> Result<CollectionSummary, FetchError> {
        let url = self.endpoint(&["playlist", id.as_str()])?;
        let response = self.get(url).await?;
        decode_summary(&response.body, id)
    }

    async fn fetch_page(
        &self,
        id: &CollectionId,
        cursor: Option<&PageCursor>,
        page_size: u32,
    ) -> Result<Page, FetchError> {
        let mut url = self.endpoint(&["playlist", id.as_str(), "videos"])?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair(
                "max_results",
                &page_size.clamp(1, MAX_PAGE_SIZE).to_string(),
            );
            if let Some(cursor) = cursor {
                query.append_pair("page_token", cursor.as_str());
            }
        }
        let response = self.get(url).await?;
        decode_page(&response.body, response.next_page_header.as_deref())
    }
}

fn map_status(status: StatusCode, body: &[u8]) -> FetchError {
    let message = format!("http status {}", status.as_u16());
    match status {
        StatusCode::NOT_FOUND => FetchError::not_found(message),
        StatusCode::TOO_MANY_REQUESTS => FetchError::rate_limited(message),
        StatusCode::FORBIDDEN if mentions_quota(body) => FetchError::rate_limited(message),
        _ => FetchError::upstream(message),
    }
}

fn mentions_quota(body: &[u8]) -> bool {
    let text = String::from_utf8_lossy(body);
    text.contains("quotaExceeded") || text.contains("rateLimitExceeded")
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::upstream(format!("timeout: {err}"));
    }
    FetchError::upstream(format!("network error: {err}"))
}

/// Url for logging, with the api key masked.
fn redact(url: &Url) -> String {
    let mut redacted = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(key, value)| {
            let value = if key == "key" {
                "***".to_string()
            } else {
                value.into_owned()
            };
            (key.into_owned(), value)
        })
        .collect();
    if pairs.is_empty() {
        return redacted.to_string();
    }
    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted.to_string()
}
