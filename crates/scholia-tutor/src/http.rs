// Tutor service over plain HTTP (reqwest, no SDK)

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use scholia_types::{FlashcardSet, RevisionNotesContent};

use crate::config::TutorConfig;
use crate::traits::{ArtifactRequest, RespondReply, RespondRequest, TutorClient};

pub struct HttpTutorClient {
    http_client: reqwest::Client,
    base_url: String,
    chat_timeout: Duration,
    generation_timeout: Duration,
}

/// Every tutor endpoint wraps its result in `message`
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    message: Option<T>,
}

#[derive(Debug, Deserialize)]
struct RawRespondReply {
    message: Option<String>,
    #[serde(default)]
    summary: Option<Vec<String>>,
}

impl HttpTutorClient {
    pub fn new(config: &TutorConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            chat_timeout: config.chat_timeout(),
            generation_timeout: config.generation_timeout(),
        })
    }

    async fn post<B, R>(&self, path: &str, body: &B, timeout: Duration) -> Result<R>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(url = %url, timeout_ms = timeout.as_millis() as u64, "Calling tutor service");

        let response = self
            .http_client
            .post(&url)
            .timeout(timeout)
            .json(body)
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", path))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Tutor API error ({}): {}", status, error_text);
        }

        response
            .json()
            .await
            .with_context(|| format!("Failed to parse {} response", path))
    }

    async fn generate<T: DeserializeOwned>(&self, path: &str, request: &ArtifactRequest) -> Result<T> {
        let envelope: Envelope<T> = self.post(path, request, self.generation_timeout).await?;
        envelope
            .message
            .with_context(|| format!("Tutor {} response has no message", path))
    }
}

#[async_trait]
impl TutorClient for HttpTutorClient {
    async fn respond(&self, request: RespondRequest) -> Result<RespondReply> {
        let raw: RawRespondReply = self.post("/respond/", &request, self.chat_timeout).await?;

        let message = raw
            .message
            .filter(|m| !m.trim().is_empty())
            .context("Tutor reply is empty")?;

        Ok(RespondReply {
            message,
            summary: raw.summary,
        })
    }

    async fn flashcards(&self, request: ArtifactRequest) -> Result<FlashcardSet> {
        self.generate("/cards/", &request).await
    }

    async fn revision_notes(&self, request: ArtifactRequest) -> Result<RevisionNotesContent> {
        self.generate("/notes/", &request).await
    }
}
