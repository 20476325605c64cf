use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    pub id: String,
    pub title: String,
    pub folder_id: String,
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_path: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTopic {
    pub title: String,
    pub folder_id: String,
    pub user_id: String,
    pub cover_path: Option<String>,
}

impl From<NewTopic> for Topic {
    fn from(topic: NewTopic) -> Self {
        Self {
            id: super::new_id(),
            title: topic.title,
            folder_id: topic.folder_id,
            user_id: topic.user_id,
            cover_path: topic.cover_path,
            created_at: Utc::now(),
        }
    }
}
