use super::*;
use crate::test_support::{file, pull_request_ref, FakeProvider, CLEAN_PATCH, MARKED_PATCH};

#[tokio::test]
async fn test_list_changed_files_single_page() {
    let provider = FakeProvider::new().with_page(
        1,
        vec![file("a.rs", Some(CLEAN_PATCH)), file("b.png", None)],
        None,
    );

    let files = list_changed_files(&provider, &pull_request_ref())
        .await
        .unwrap();

    assert_eq!(files.len(), 2);
    assert_eq!(files[0].filename, "a.rs");
    assert_eq!(files[1].filename, "b.png");
    assert_eq!(provider.requested_pages(), vec![1]);
}

#[tokio::test]
async fn test_list_changed_files_accumulates_pages_in_order() {
    let provider = FakeProvider::new()
        .with_page(1, vec![file("a.rs", Some(CLEAN_PATCH))], Some(2))
        .with_page(2, vec![file("b.rs", Some(CLEAN_PATCH))], Some(3))
        .with_page(3, vec![file("c.rs", Some(MARKED_PATCH))], None);

    let files = list_changed_files(&provider, &pull_request_ref())
        .await
        .unwrap();

    let names: Vec<&str> = files.iter().map(|f| f.filename.as_str()).collect();
    assert_eq!(names, vec!["a.rs", "b.rs", "c.rs"]);
    assert_eq!(provider.requested_pages(), vec![1, 2, 3]);
}

#[tokio::test]
async fn test_list_changed_files_stops_when_next_page_is_unchanged() {
    let provider = FakeProvider::new()
        .with_page(1, vec![file("a.rs", Some(CLEAN_PATCH))], Some(2))
        .with_page(2, vec![file("b.rs", Some(CLEAN_PATCH))], Some(2));

    let files = list_changed_files(&provider, &pull_request_ref())
        .await
        .unwrap();

    assert_eq!(files.len(), 2);
    assert_eq!(provider.requested_pages(), vec![1, 2]);
}

#[tokio::test]
async fn test_list_changed_files_stops_on_pagination_cycle() {
    let provider = FakeProvider::new()
        .with_page(1, vec![file("a.rs", Some(CLEAN_PATCH))], Some(2))
        .with_page(2, vec![file("b.rs", Some(CLEAN_PATCH))], Some(1));

    let files = list_changed_files(&provider, &pull_request_ref())
        .await
        .unwrap();

    assert_eq!(files.len(), 2);
    assert_eq!(provider.requested_pages(), vec![1, 2]);
}

#[tokio::test]
async fn test_list_changed_files_empty_pull_request() {
    let provider = FakeProvider::new();

    let files = list_changed_files(&provider, &pull_request_ref())
        .await
        .unwrap();

    assert!(files.is_empty());
    assert_eq!(provider.requested_pages(), vec![1]);
}

#[tokio::test]
async fn test_list_changed_files_fails_on_any_page_error() {
    let provider = FakeProvider::new()
        .with_page(1, vec![file("a.rs", Some(MARKED_PATCH))], Some(2))
        .with_failing_page(2);

    let result = list_changed_files(&provider, &pull_request_ref()).await;

    match result {
        Err(HoldBotError::FetchError {
            pull_request,
            source,
        }) => {
            assert_eq!(pull_request, "owner/repo#1");
            assert_eq!(source.to_string(), "API request failed: page 2 unavailable");
        }
        other => panic!("Expected a fetch error, got {:?}", other),
    }
    assert_eq!(provider.requested_pages(), vec![1, 2]);
}
