#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower::ServiceExt;

use scholia_api::{build_router, config::Config, state::AppState};
use scholia_persist::{MemoryPersistenceClient, PersistenceClient};
use scholia_tutor::{ArtifactRequest, RespondReply, RespondRequest, TutorClient};
use scholia_types::{CardColor, Flashcard, FlashcardSet, RevisionNotesContent};

pub const USER: &str = "user-1";

const TEST_CONFIG: &str = r#"
    [server]
    host = "127.0.0.1"
    port = 0

    [cors]
    enabled = false
    origins = []

    [mongodb]
    database = "scholia_test"

    [tutor]
    base_url = "http://tutor.invalid"

    [logging]
    level = "debug"
    format = "pretty"
"#;

/// Tutor double that answers deterministically and records what it was sent
#[derive(Default)]
pub struct ScriptedTutor {
    pub respond_requests: Mutex<Vec<RespondRequest>>,
    pub artifact_requests: Mutex<Vec<ArtifactRequest>>,
    pub summary: Mutex<Option<Vec<String>>>,
    pub fail: AtomicBool,
    pub delay: Mutex<Option<Duration>>,
    generations: AtomicUsize,
}

impl ScriptedTutor {
    pub fn fail_next_calls(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Hold every reply for `delay` before answering
    pub fn stall_for(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    pub fn reply_with_summary(&self, summary: Vec<String>) {
        *self.summary.lock().unwrap() = Some(summary);
    }

    pub fn last_respond(&self) -> RespondRequest {
        self.respond_requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("tutor was never called")
    }

    fn check_failure(&self) -> anyhow::Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            anyhow::bail!("Tutor API error (503 Service Unavailable): overloaded");
        }
        Ok(())
    }
}

#[async_trait]
impl TutorClient for ScriptedTutor {
    async fn respond(&self, request: RespondRequest) -> anyhow::Result<RespondReply> {
        self.respond_requests.lock().unwrap().push(request.clone());
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.check_failure()?;

        Ok(RespondReply {
            message: format!(" Answer to: {} ", request.user_query),
            summary: self.summary.lock().unwrap().clone(),
        })
    }

    async fn flashcards(&self, request: ArtifactRequest) -> anyhow::Result<FlashcardSet> {
        self.artifact_requests.lock().unwrap().push(request);
        self.check_failure()?;

        let n = self.generations.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(FlashcardSet {
            topic: format!("Deck {}", n),
            flashcards: vec![Flashcard {
                concept: "Recursion".to_string(),
                explanation: "A function calling itself".to_string(),
                color: CardColor::Yellow,
            }],
        })
    }

    async fn revision_notes(&self, request: ArtifactRequest) -> anyhow::Result<RevisionNotesContent> {
        self.artifact_requests.lock().unwrap().push(request);
        self.check_failure()?;

        let n = self.generations.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(RevisionNotesContent {
            title: format!("Notes {}", n),
            introduction: "Intro".to_string(),
            core_concepts: vec!["Base case".to_string()],
            example_or_use_case: "Factorial".to_string(),
            common_confusions: vec!["Missing base case".to_string()],
            memory_tips: "Shrink the problem".to_string(),
        })
    }
}

pub struct TestApp {
    pub router: Router,
    pub persist: Arc<MemoryPersistenceClient>,
    pub tutor: Arc<ScriptedTutor>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(TEST_CONFIG)
    }

    pub fn with_config(toml_config: &str) -> Self {
        let config: Config = toml::from_str(toml_config).expect("valid test config");
        let persist = Arc::new(MemoryPersistenceClient::new());
        let tutor = Arc::new(ScriptedTutor::default());

        let state = Arc::new(AppState::new(
            config,
            persist.clone() as Arc<dyn PersistenceClient>,
            tutor.clone() as Arc<dyn TutorClient>,
        ));

        Self {
            router: build_router(state),
            persist,
            tutor,
        }
    }

    pub fn exposing_error_details() -> Self {
        Self::with_config(&TEST_CONFIG.replace(
            "port = 0",
            "port = 0\n    expose_error_details = true",
        ))
    }

    pub fn with_request_timeout(secs: u64) -> Self {
        Self::with_config(&TEST_CONFIG.replace(
            "port = 0",
            &format!("port = 0\n    request_timeout_secs = {}", secs),
        ))
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        user: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(user) = user {
            builder = builder.header("x-user-id", user);
        }

        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.send(request).await
    }

    /// POST an arbitrary body, bypassing JSON encoding
    pub async fn post_raw(
        &self,
        uri: &str,
        content_type: Option<&str>,
        body: &str,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header("x-user-id", USER);
        if let Some(content_type) = content_type {
            builder = builder.header("content-type", content_type);
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap()).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(USER), Some(body)).await
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, Some(USER), None).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, Some(USER), None).await
    }
}

/// Contents of a `messages` JSON array
pub fn contents(messages: &Value) -> Vec<String> {
    messages
        .as_array()
        .expect("messages array")
        .iter()
        .map(|m| m["content"].as_str().unwrap_or_default().to_string())
        .collect()
}
