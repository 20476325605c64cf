use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Video,
    Pdf,
}

/// Uploaded study material. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: String,
    pub topic_id: String,
    pub user_id: String,
    #[serde(rename = "type")]
    pub kind: ResourceKind,
    /// Video URLs or served PDF paths
    pub source: Vec<String>,
    /// Extracted text blocks (transcripts); empty for PDFs
    pub content: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Resource {
    pub fn new(
        topic_id: impl Into<String>,
        user_id: impl Into<String>,
        kind: ResourceKind,
        source: Vec<String>,
        content: Vec<String>,
    ) -> Self {
        Self {
            id: super::new_id(),
            topic_id: topic_id.into(),
            user_id: user_id.into(),
            kind,
            source,
            content,
            created_at: Utc::now(),
        }
    }
}
