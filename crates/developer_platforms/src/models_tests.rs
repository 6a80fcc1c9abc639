use super::*;

#[test]
fn test_page_token_first_is_page_one() {
    assert_eq!(PageToken::first(), PageToken(1));
    assert_eq!(PageToken::first().to_string(), "1");
}

#[test]
fn test_pull_request_deserialize_from_webhook_json() {
    let json = r#"{
        "number": 42,
        "state": "open",
        "title": "Add a feature",
        "draft": false,
        "labels": [
            { "id": 1, "name": "do-not-merge/hold", "color": "e11d21" },
            { "id": 2, "name": "bug", "color": "fc2929" }
        ]
    }"#;

    let pr: PullRequest = serde_json::from_str(json).unwrap();

    assert_eq!(pr.number, 42);
    assert_eq!(pr.state, "open");
    assert!(!pr.draft);
    assert_eq!(
        pr.labels,
        vec![
            Label {
                name: "do-not-merge/hold".to_string()
            },
            Label {
                name: "bug".to_string()
            },
        ]
    );
}

#[test]
fn test_pull_request_deserialize_without_labels_or_draft() {
    let json = r#"{ "number": 7, "state": "closed" }"#;

    let pr: PullRequest = serde_json::from_str(json).unwrap();

    assert_eq!(pr.number, 7);
    assert_eq!(pr.state, "closed");
    assert!(!pr.draft);
    assert!(pr.labels.is_empty());
}

#[test]
fn test_pull_request_file_without_patch() {
    let json = r#"{ "filename": "assets/logo.png", "status": "added" }"#;

    let file: PullRequestFile = serde_json::from_str(json).unwrap();

    assert_eq!(file.filename, "assets/logo.png");
    assert!(file.patch.is_none());
}

#[test]
fn test_repository_deserialize() {
    let json = r#"{
        "id": 1296269,
        "name": "hello-world",
        "full_name": "octocat/hello-world",
        "owner": { "id": 1, "login": "octocat" }
    }"#;

    let repository: Repository = serde_json::from_str(json).unwrap();

    assert_eq!(repository.name, "hello-world");
    assert_eq!(repository.full_name, "octocat/hello-world");
    assert_eq!(repository.owner.login, "octocat");
}

#[test]
fn test_file_page_default_has_no_next_page() {
    let page = FilePage::default();

    assert!(page.files.is_empty());
    assert!(page.next_page.is_none());
}
