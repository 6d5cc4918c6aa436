//! Joplin-style client against a mock note server.

use capnote_notes::{Error, JoplinClient, JoplinConfig, NoteDraft, NoteSink, NoteUpdate};
use serde_json::json;
use wiremock::matchers::{body_json, body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "test-token";

fn client_for(server: &MockServer) -> JoplinClient {
    JoplinClient::new(JoplinConfig {
        base_url: server.uri(),
        token: TOKEN.to_string(),
        timeout_seconds: 5,
    })
    .expect("Failed to create client")
}

async fn mount_note_created(server: &MockServer, id: &str) {
    Mock::given(method("POST"))
        .and(path("/notes"))
        .and(query_param("token", TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": id})))
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_tag_search(server: &MockServer, name: &str, items: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("query", name))
        .and(query_param("type", "tag"))
        .and(query_param("token", TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": items})))
        .mount(server)
        .await;
}

async fn mount_link(server: &MockServer, tag_id: &str, note_id: &str, status: u16) {
    Mock::given(method("POST"))
        .and(path(format!("/tags/{}/notes", tag_id)))
        .and(query_param("token", TOKEN))
        .and(body_json(json!({"id": note_id})))
        .respond_with(ResponseTemplate::new(status).set_body_json(json!({})))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_create_note_links_existing_and_new_tags() {
    let server = MockServer::start().await;
    mount_note_created(&server, "note-1").await;

    // "wechat" exists already (different case), "memo" does not.
    mount_tag_search(&server, "wechat", json!([{"id": "tag-w", "title": "WeChat"}])).await;
    mount_tag_search(&server, "memo", json!([{"id": "x", "title": "memos"}])).await;
    Mock::given(method("POST"))
        .and(path("/tags"))
        .and(body_json(json!({"title": "memo"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "tag-m"})))
        .expect(1)
        .mount(&server)
        .await;

    mount_link(&server, "tag-w", "note-1", 200).await;
    mount_link(&server, "tag-m", "note-1", 200).await;

    let client = client_for(&server);
    let published = client
        .create_note("Buy milk", "buy milk", &["wechat", "memo"], None)
        .await
        .expect("note should be created");

    assert_eq!(published.id.as_deref(), Some("note-1"));
    assert_eq!(published.linked_tags, vec!["wechat", "memo"]);
    assert!(published.failed_tags.is_empty());
}

#[tokio::test]
async fn test_tag_link_failure_keeps_note() {
    let server = MockServer::start().await;
    mount_note_created(&server, "note-2").await;
    mount_tag_search(&server, "wechat", json!([{"id": "tag-w", "title": "wechat"}])).await;
    mount_tag_search(&server, "link", json!([{"id": "tag-l", "title": "link"}])).await;
    mount_link(&server, "tag-w", "note-2", 200).await;
    mount_link(&server, "tag-l", "note-2", 500).await;

    let client = client_for(&server);
    let published = client
        .create_note("T", "B", &["wechat", "link"], Some("https://example.com"))
        .await
        .expect("note should survive tag failure");

    assert_eq!(published.id.as_deref(), Some("note-2"));
    assert_eq!(published.linked_tags, vec!["wechat"]);
    assert_eq!(published.failed_tags, vec!["link"]);
}

#[tokio::test]
async fn test_repeated_tags_linked_once() {
    let server = MockServer::start().await;
    mount_note_created(&server, "note-3").await;
    mount_tag_search(&server, "wechat", json!([{"id": "tag-w", "title": "wechat"}])).await;
    mount_link(&server, "tag-w", "note-3", 200).await;

    let client = client_for(&server);
    let published = client
        .create_note("T", "B", &["wechat", "WECHAT"], None)
        .await
        .unwrap();
    assert_eq!(published.linked_tags, vec!["wechat"]);
}

#[tokio::test]
async fn test_failed_search_falls_through_to_create() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/tags"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "tag-new"})))
        .expect(1)
        .mount(&server)
        .await;

    let tag = client_for(&server)
        .find_or_create_tag("article")
        .await
        .unwrap();
    assert_eq!(tag.id, "tag-new");
    assert_eq!(tag.name, "article");
}

#[tokio::test]
async fn test_create_note_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/notes"))
        .respond_with(ResponseTemplate::new(403).set_body_string("Invalid token"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .create_note("T", "B", &["wechat"], None)
        .await
        .unwrap_err();
    match err {
        Error::Remote { status, body } => {
            assert_eq!(status, 403);
            assert_eq!(body, "Invalid token");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_create_note_without_id_is_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/notes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"title": "T"})))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .create_note("T", "B", &[], None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Parse(_)), "got {err:?}");
}

#[tokio::test]
async fn test_unreachable_service_is_network_error() {
    let client = JoplinClient::new(JoplinConfig {
        base_url: "http://127.0.0.1:1".to_string(),
        token: TOKEN.to_string(),
        timeout_seconds: 2,
    })
    .unwrap();
    let err = client.create_note("T", "B", &[], None).await.unwrap_err();
    assert!(err.is_network());
}

#[tokio::test]
async fn test_get_and_update_note() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/notes/note-9"))
        .and(query_param("token", TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "note-9",
            "title": "Old",
            "body": "old body",
            "updated_time": 1
        })))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/notes/note-9"))
        .and(body_partial_json(json!({"title": "New"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "note-9"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let note = client.get_note("note-9").await.unwrap();
    assert_eq!(note.title, "Old");
    assert_eq!(note.body.as_deref(), Some("old body"));

    let update = NoteUpdate {
        title: Some("New".to_string()),
        ..Default::default()
    };
    client.update_note("note-9", &update).await.unwrap();
}

#[tokio::test]
async fn test_get_missing_note() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/notes/nope"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
        .mount(&server)
        .await;

    let err = client_for(&server).get_note("nope").await.unwrap_err();
    assert!(matches!(err, Error::Remote { status: 404, .. }));
}

#[tokio::test]
async fn test_publish_sends_draft_source_url() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/notes"))
        .and(body_partial_json(json!({
            "title": "Headline",
            "source_url": "https://example.com/a"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "note-p"})))
        .expect(1)
        .mount(&server)
        .await;
    mount_tag_search(&server, "link", json!([{"id": "tag-l", "title": "link"}])).await;
    mount_link(&server, "tag-l", "note-p", 204).await;

    let draft = NoteDraft::new("Headline", "body")
        .with_tags(["link"])
        .with_source_url("https://example.com/a");
    let client = client_for(&server);
    let published = client.publish(&draft).await.unwrap();

    assert_eq!(client.name(), "joplin");
    assert_eq!(published.linked_tags, vec!["link"]);
}
