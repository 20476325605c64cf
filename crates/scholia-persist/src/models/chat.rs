use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use scholia_types::{ChatMessage, ChatMode};

use super::new_id;

/// Database-agnostic chat thread.
///
/// `parent_chat_id` is only settable through [`Chat::new_root`] and
/// [`RootChat::branch`], so a branch can never hang off another branch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chat {
    pub id: String,
    pub topic_id: String,
    pub resource_id: String,
    pub user_id: String,
    pub(crate) parent_chat_id: Option<String>,
    pub mode_id: Option<ChatMode>,
    pub messages: Vec<ChatMessage>,
    pub summary: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Where a new thread lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatScope {
    pub topic_id: String,
    pub resource_id: String,
    pub user_id: String,
}

/// A thread known to have no parent
#[derive(Debug, Clone, PartialEq)]
pub struct RootChat(Chat);

#[derive(Debug)]
pub enum ChatKind {
    Root(RootChat),
    Branch { parent_id: String, chat: Chat },
}

/// Messages and summary produced by one successful turn
#[derive(Debug, Clone, PartialEq)]
pub struct ChatTurn {
    pub messages: Vec<ChatMessage>,
    pub summary: Vec<String>,
    pub mode_id: Option<ChatMode>,
    pub updated_at: DateTime<Utc>,
}

impl Chat {
    fn empty(scope: ChatScope, parent_chat_id: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: new_id(),
            topic_id: scope.topic_id,
            resource_id: scope.resource_id,
            user_id: scope.user_id,
            parent_chat_id,
            mode_id: None,
            messages: Vec::new(),
            summary: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Start a thread with no parent. Not persisted until its first turn.
    pub fn new_root(scope: ChatScope) -> RootChat {
        RootChat(Self::empty(scope, None))
    }

    pub fn parent_chat_id(&self) -> Option<&str> {
        self.parent_chat_id.as_deref()
    }

    pub fn is_branch(&self) -> bool {
        self.parent_chat_id.is_some()
    }

    pub fn classify(self) -> ChatKind {
        match self.parent_chat_id.clone() {
            Some(parent_id) => ChatKind::Branch {
                parent_id,
                chat: self,
            },
            None => ChatKind::Root(RootChat(self)),
        }
    }

    /// Append one user/assistant exchange.
    ///
    /// `summary` replaces the stored one when present. Returns the delta to
    /// persist for an existing thread.
    pub fn record_turn(
        &mut self,
        query: &str,
        reply: &str,
        summary: Option<Vec<String>>,
        mode_id: Option<ChatMode>,
    ) -> ChatTurn {
        let messages = vec![
            ChatMessage::user(query.trim()),
            ChatMessage::assistant(reply.trim()),
        ];
        self.messages.extend(messages.iter().cloned());

        if let Some(summary) = summary {
            self.summary = summary;
        }
        if mode_id.is_some() {
            self.mode_id = mode_id;
        }
        self.updated_at = Utc::now();

        ChatTurn {
            messages,
            summary: self.summary.clone(),
            mode_id: self.mode_id,
            updated_at: self.updated_at,
        }
    }
}

impl RootChat {
    /// Start a branch whose context inherits this thread's messages.
    pub fn branch(&self, scope: ChatScope) -> Chat {
        Chat::empty(scope, Some(self.0.id.clone()))
    }

    pub fn id(&self) -> &str {
        &self.0.id
    }

    pub fn as_chat(&self) -> &Chat {
        &self.0
    }

    pub fn into_chat(self) -> Chat {
        self.0
    }
}
