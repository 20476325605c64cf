use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Connection settings for the tutor service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TutorConfig {
    /// Base URL, e.g. `http://localhost:8000`
    pub base_url: String,
    #[serde(default = "default_chat_timeout_ms")]
    pub chat_timeout_ms: u64,
    /// Flashcard and revision-note generation take much longer than a reply
    #[serde(default = "default_generation_timeout_ms")]
    pub generation_timeout_ms: u64,
}

fn default_chat_timeout_ms() -> u64 {
    60_000
}

fn default_generation_timeout_ms() -> u64 {
    300_000
}

/// Whole milliseconds, saturating; sub-millisecond timeouts round up to 1 ms
fn as_millis(timeout: Duration) -> u64 {
    let millis = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
    if millis == 0 && !timeout.is_zero() {
        1
    } else {
        millis
    }
}

impl TutorConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            chat_timeout_ms: default_chat_timeout_ms(),
            generation_timeout_ms: default_generation_timeout_ms(),
        }
    }

    pub fn with_chat_timeout(mut self, timeout: Duration) -> Self {
        self.chat_timeout_ms = as_millis(timeout);
        self
    }

    pub fn with_generation_timeout(mut self, timeout: Duration) -> Self {
        self.generation_timeout_ms = as_millis(timeout);
        self
    }

    pub fn chat_timeout(&self) -> Duration {
        Duration::from_millis(self.chat_timeout_ms)
    }

    pub fn generation_timeout(&self) -> Duration {
        Duration::from_millis(self.generation_timeout_ms)
    }
}
