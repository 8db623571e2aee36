use playlist_core::{resolve_collection_id, CollectionId, ResolveError};

#[test]
fn playlist_url_yields_list_parameter() {
    let id = resolve_collection_id("https://x.test/playlist?list=AB12").unwrap();
    assert_eq!(id, CollectionId::new("AB12"));
}

#[test]
fn raw_id_is_taken_verbatim_after_trimming() {
    assert_eq!(resolve_collection_id("AB12").unwrap().as_str(), "AB12");
    assert_eq!(
        resolve_collection_id("  PLx_9-abc \n").unwrap().as_str(),
        "PLx_9-abc"
    );
}

#[test]
fn watch_url_without_list_is_rejected() {
    assert_eq!(
        resolve_collection_id("https://x.test/watch?v=xyz"),
        Err(ResolveError::MissingList)
    );
}

#[test]
fn watch_url_with_list_resolves() {
    let id = resolve_collection_id("https://www.youtube.com/watch?v=abc&list=PL123&index=4").unwrap();
    assert_eq!(id.as_str(), "PL123");
}

#[test]
fn host_without_scheme_is_parsed_as_url() {
    let id = resolve_collection_id("youtube.com/playlist?list=PLnoscheme").unwrap();
    assert_eq!(id.as_str(), "PLnoscheme");

    let id = resolve_collection_id("www.example.test/playlist?list=WWW1").unwrap();
    assert_eq!(id.as_str(), "WWW1");
}

#[test]
fn empty_input_is_rejected() {
    assert_eq!(resolve_collection_id(""), Err(ResolveError::Empty));
    assert_eq!(resolve_collection_id("   \t\n"), Err(ResolveError::Empty));
}

#[test]
fn empty_list_value_is_rejected() {
    assert_eq!(
        resolve_collection_id("https://x.test/playlist?list="),
        Err(ResolveError::MissingList)
    );
}

#[test]
fn malformed_url_is_rejected() {
    let err = resolve_collection_id("https://[broken/playlist?list=A").unwrap_err();
    assert!(matches!(err, ResolveError::MalformedUrl(_)), "{err:?}");
}
