mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{TestApp, USER};
use scholia_persist::{new_id, PersistenceClient};

/// Two root threads and one branch on the same topic
async fn seed_topic(app: &TestApp) -> String {
    let topic = new_id();
    let resource = new_id();

    let (_, first) = app
        .post("/chat", json!({"query": "first", "topicId": topic, "resourceId": resource}))
        .await;
    app.post("/chat", json!({"query": "second", "topicId": topic, "resourceId": resource}))
        .await;
    app.post(
        "/chat",
        json!({
            "query": "branch",
            "topicId": topic,
            "resourceId": resource,
            "parentId": first["chat"]["id"],
        }),
    )
    .await;

    topic
}

#[tokio::test]
async fn test_flashcards_use_root_threads_newest_first() {
    let app = TestApp::new();
    let topic = seed_topic(&app).await;

    let (status, body) = app.post("/flashcards", json!({"topicId": topic})).await;

    assert_eq!(status, StatusCode::CREATED, "unexpected body: {}", body);
    assert_eq!(body["message"], "Flashcards created successfully");
    assert_eq!(body["flashcards"]["topicId"], json!(topic));
    assert_eq!(body["flashcards"]["flashcards"][0]["color"], "yellow");

    let sent = app.tutor.artifact_requests.lock().unwrap().last().cloned().unwrap();
    let sent_contents: Vec<&str> = sent.messages.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(
        sent_contents,
        vec!["second", "Answer to: second", "first", "Answer to: first"]
    );
    assert_eq!(sent.user_id, USER);
}

#[tokio::test]
async fn test_flashcards_get_returns_latest_deck() {
    let app = TestApp::new();
    let topic = seed_topic(&app).await;

    let (status, _) = app.get(&format!("/flashcards?topicId={}", topic)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    app.post("/flashcards", json!({"topicId": topic})).await;
    let (_, second) = app.post("/flashcards", json!({"topicId": topic})).await;

    let (status, body) = app.get(&format!("/flashcards?topicId={}", topic)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["flashcards"]["id"], second["flashcards"]["id"]);
    assert_eq!(body["flashcards"]["topic"], "Deck 2");
    assert!(body.get("message").is_none());
}

#[tokio::test]
async fn test_generation_without_root_threads_is_not_found() {
    let app = TestApp::new();
    let topic = new_id();

    let (status, body) = app.post("/flashcards", json!({"topicId": topic})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "No chat history found for this topic and user.");

    let (status, _) = app.post("/revisionNotes", json!({"topicId": topic})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    assert!(app.tutor.artifact_requests.lock().unwrap().is_empty());
    assert!(app.persist.latest_flashcards(&topic, USER).await.unwrap().is_none());
    assert!(app.persist.get_revision_notes(&topic, USER).await.unwrap().is_none());
}

#[tokio::test]
async fn test_failed_generation_writes_nothing() {
    let app = TestApp::new();
    let topic = seed_topic(&app).await;
    app.tutor.fail_next_calls(true);

    let (status, _) = app.post("/flashcards", json!({"topicId": topic})).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let (status, _) = app.post("/revisionNotes", json!({"topicId": topic})).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    assert!(app.persist.latest_flashcards(&topic, USER).await.unwrap().is_none());
    assert!(app.persist.get_revision_notes(&topic, USER).await.unwrap().is_none());
}

#[tokio::test]
async fn test_revision_notes_are_overwritten() {
    let app = TestApp::new();
    let topic = seed_topic(&app).await;

    let (status, first) = app.post("/revisionNotes", json!({"topicId": topic})).await;
    assert_eq!(status, StatusCode::CREATED, "unexpected body: {}", first);
    assert_eq!(first["revisionNotes"]["title"], "Notes 1");
    assert_eq!(first["revisionNotes"]["core_concepts"], json!(["Base case"]));

    let (_, second) = app.post("/revisionNotes", json!({"topicId": topic})).await;
    assert_eq!(second["revisionNotes"]["id"], first["revisionNotes"]["id"]);

    let (status, stored) = app.get(&format!("/revisionNotes?topicId={}", topic)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stored["revisionNotes"]["title"], "Notes 2");
}

#[tokio::test]
async fn test_artifact_topic_id_is_validated() {
    let app = TestApp::new();

    let (status, _) = app.post("/flashcards", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.get("/revisionNotes?topicId=bad").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
