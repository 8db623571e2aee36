mod common;

use std::time::Duration;

use common::init_logging;
use playlist_core::{CollectionId, FetchErrorKind, PageCursor};
use playlist_engine::{CatalogClient, CatalogSettings, HttpCatalogClient, NEXT_PAGE_HEADER};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> HttpCatalogClient {
    let settings = CatalogSettings {
        base_url: format!("{}/api", server.uri()),
        ..CatalogSettings::default()
    };
    HttpCatalogClient::new(settings).expect("client")
}

async fn mount_summary(server: &MockServer, template: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/api/playlist/PL1"))
        .respond_with(template)
        .mount(server)
        .await;
}

#[tokio::test]
async fn summary_is_decoded_from_flat_record() {
    init_logging();
    let server = MockServer::start().await;
    mount_summary(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({
            "id": "PL1",
            "title": "Rust talks",
            "channel_title": "RustConf",
            "item_count": 12,
            "thumbnail_url": "https://img.test/pl1.jpg",
            "estimated_duration_seconds": 5400
        })),
    )
    .await;

    let summary = client_for(&server)
        .fetch_summary(&CollectionId::new("PL1"))
        .await
        .expect("summary");
    assert_eq!(summary.title, "Rust talks");
    assert_eq!(summary.channel_title, "RustConf");
    assert_eq!(summary.item_count, 12);
    assert_eq!(summary.thumbnail_url.as_deref(), Some("https://img.test/pl1.jpg"));
    assert_eq!(summary.total_duration_seconds, Some(5400));
    assert_eq!(summary.total_duration_text.as_deref(), Some("1:30:00"));
}

#[tokio::test]
async fn summary_accepts_wrapped_resource() {
    init_logging();
    let server = MockServer::start().await;
    mount_summary(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({
            "items": [{
                "id": "PL1",
                "snippet": {
                    "title": "Wrapped",
                    "channelTitle": "Somebody",
                    "thumbnails": {
                        "default": {"url": "https://img.test/small.jpg"},
                        "high": {"url": "https://img.test/high.jpg"}
                    }
                },
                "contentDetails": {"itemCount": 3}
            }]
        })),
    )
    .await;

    let summary = client_for(&server)
        .fetch_summary(&CollectionId::new("PL1"))
        .await
        .expect("summary");
    assert_eq!(summary.title, "Wrapped");
    assert_eq!(summary.item_count, 3);
    assert_eq!(summary.thumbnail_url.as_deref(), Some("https://img.test/high.jpg"));
    assert_eq!(summary.total_duration_seconds, None);
}

#[tokio::test]
async fn empty_items_list_means_not_found() {
    init_logging();
    let server = MockServer::start().await;
    mount_summary(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({"items": []})),
    )
    .await;

    let err = client_for(&server)
        .fetch_summary(&CollectionId::new("PL1"))
        .await
        .expect_err("missing collection");
    assert_eq!(err.kind, FetchErrorKind::NotFound);
}

#[tokio::test]
async fn http_statuses_map_to_error_kinds() {
    init_logging();
    let cases = [
        (ResponseTemplate::new(404), FetchErrorKind::NotFound),
        (ResponseTemplate::new(429), FetchErrorKind::RateLimited),
        (
            ResponseTemplate::new(403).set_body_json(json!({
                "error": {"errors": [{"reason": "quotaExceeded"}]}
            })),
            FetchErrorKind::RateLimited,
        ),
        (ResponseTemplate::new(403), FetchErrorKind::Upstream),
        (ResponseTemplate::new(500), FetchErrorKind::Upstream),
    ];

    for (template, expected) in cases {
        let server = MockServer::start().await;
        mount_summary(&server, template).await;
        let err = client_for(&server)
            .fetch_summary(&CollectionId::new("PL1"))
            .await
            .expect_err("status error");
        assert_eq!(err.kind, expected, "{err}");
    }
}

#[tokio::test]
async fn invalid_json_is_an_upstream_failure() {
    init_logging();
    let server = MockServer::start().await;
    mount_summary(
        &server,
        ResponseTemplate::new(200).set_body_raw("<html>oops</html>", "text/html"),
    )
    .await;

    let err = client_for(&server)
        .fetch_summary(&CollectionId::new("PL1"))
        .await
        .expect_err("bad body");
    assert_eq!(err.kind, FetchErrorKind::Upstream);
    assert!(err.is_retryable());
}

#[tokio::test]
async fn page_request_carries_size_cursor_and_key() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/playlist/PL1/videos"))
        .and(query_param("max_results", "5"))
        .and(query_param("page_token", "P2"))
        .and(query_param("key", "secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "videos": [
                {"id": "v1", "title": "One", "duration": "PT1M30S"},
                {"id": "v2", "title": "Two", "duration_seconds": 45},
                {"title": "no id"},
                {"id": "v3", "title": "Three"}
            ],
            "next_page_token": "P3"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let settings = CatalogSettings {
        base_url: format!("{}/api", server.uri()),
        api_key: Some("secret".to_string()),
        ..CatalogSettings::default()
    };
    let client = HttpCatalogClient::new(settings).expect("client");
    let page = client
        .fetch_page(&CollectionId::new("PL1"), Some(&PageCursor::new("P2")), 5)
        .await
        .expect("page");

    let seconds: Vec<_> = page
        .records
        .iter()
        .map(|record| (record.id.as_str(), record.duration_seconds))
        .collect();
    assert_eq!(seconds, vec![("v1", 90), ("v2", 45), ("v3", 0)]);
    assert_eq!(page.malformed, 1);
    assert_eq!(page.next_cursor, Some(PageCursor::new("P3")));
}

#[tokio::test]
async fn bare_list_takes_cursor_from_header() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/playlist/PL1/videos"))
        .and(query_param("max_results", "50"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header(NEXT_PAGE_HEADER, "H2")
                .set_body_json(json!([{"id": "v1", "duration": "PT10S"}])),
        )
        .mount(&server)
        .await;

    let page = client_for(&server)
        .fetch_page(&CollectionId::new("PL1"), None, 200)
        .await
        .expect("page");
    assert_eq!(page.records.len(), 1);
    assert_eq!(page.next_cursor, Some(PageCursor::new("H2")));
}

#[tokio::test]
async fn slow_catalog_times_out_as_upstream() {
    init_logging();
    let server = MockServer::start().await;
    mount_summary(
        &server,
        ResponseTemplate::new(200)
            .set_body_json(json!({"id": "PL1"}))
            .set_delay(Duration::from_secs(5)),
    )
    .await;

    let settings = CatalogSettings {
        base_url: format!("{}/api", server.uri()),
        request_timeout: Duration::from_millis(200),
        ..CatalogSettings::default()
    };
    let err = HttpCatalogClient::new(settings)
        .expect("client")
        .fetch_summary(&CollectionId::new("PL1"))
        .await
        .expect_err("timeout");
    assert_eq!(err.kind, FetchErrorKind::Upstream);
    assert!(err.message.contains("timeout"), "{}", err.message);
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    init_logging();
    let server = MockServer::start().await;
    mount_summary(
        &server,
        ResponseTemplate::new(200).set_body_raw(vec![b' '; 4096], "application/json"),
    )
    .await;

    let settings = CatalogSettings {
        base_url: format!("{}/api", server.uri()),
        max_bytes: 1024,
        ..CatalogSettings::default()
    };
    let err = HttpCatalogClient::new(settings)
        .expect("client")
        .fetch_summary(&CollectionId::new("PL1"))
        .await
        .expect_err("too large");
    assert!(err.message.contains("too large"), "{}", err.message);
}
