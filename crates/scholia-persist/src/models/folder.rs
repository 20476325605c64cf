use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Notebook grouping topics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    pub id: String,
    pub name: String,
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_path: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFolder {
    pub name: String,
    pub user_id: String,
    pub cover_path: Option<String>,
}

impl From<NewFolder> for Folder {
    fn from(folder: NewFolder) -> Self {
        Self {
            id: super::new_id(),
            name: folder.name,
            user_id: folder.user_id,
            cover_path: folder.cover_path,
            created_at: Utc::now(),
        }
    }
}
