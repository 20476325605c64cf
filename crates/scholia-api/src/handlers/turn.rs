//! Chat turn processing.
//!
//! A turn runs in three steps: [`resolve_turn`] reads the target thread and
//! builds the tutor context, the tutor is called, and [`commit_turn`] records
//! the exchange. Nothing is written unless the tutor replied.

use scholia_persist::{Chat, ChatKind, ChatScope, PersistenceClient};
use scholia_tutor::{RespondReply, RespondRequest, TutorClient};
use scholia_types::{ChatMessage, ChatMode};

use crate::error::{ApiError, ApiResult};

/// Thread a turn will be written to
#[derive(Debug, Clone)]
pub enum TurnTarget {
    /// Not stored yet; inserted together with its first exchange
    Fresh(Chat),
    Existing(Chat),
}

impl TurnTarget {
    pub fn chat(&self) -> &Chat {
        match self {
            TurnTarget::Fresh(chat) | TurnTarget::Existing(chat) => chat,
        }
    }
}

/// Everything needed to call the tutor and persist the outcome
#[derive(Debug, Clone)]
pub struct ResolvedTurn {
    pub target: TurnTarget,
    /// Messages sent to the tutor, parent history first for branches
    pub context: Vec<ChatMessage>,
    pub summary: Vec<String>,
    /// `[chatId]` for roots, `[parentId, chatId]` for branches
    pub reference_chats: Vec<String>,
}

/// Input of one turn after validation
#[derive(Debug, Clone)]
pub struct TurnInput {
    pub query: String,
    pub scope: ChatScope,
    pub chat_id: Option<String>,
    pub parent_id: Option<String>,
    pub mode_id: Option<ChatMode>,
}

/// Thread owned by `user_id`, or NotFound
async fn load_chat(
    persist: &dyn PersistenceClient,
    chat_id: &str,
    user_id: &str,
    what: &str,
) -> ApiResult<Chat> {
    persist
        .get_chat(chat_id)
        .await?
        .filter(|chat| chat.user_id == user_id)
        .ok_or_else(|| ApiError::NotFound(format!("{} not found", what)))
}

/// Decide which thread the turn targets and what context the tutor sees.
///
/// `parentId` without `chatId` starts a branch, `chatId` continues a thread,
/// neither starts a new root. Only reads.
pub async fn resolve_turn(
    persist: &dyn PersistenceClient,
    scope: ChatScope,
    chat_id: Option<&str>,
    parent_id: Option<&str>,
) -> ApiResult<ResolvedTurn> {
    let user_id = scope.user_id.clone();

    match (chat_id, parent_id) {
        (None, Some(parent_id)) => {
            let parent = load_chat(persist, parent_id, &user_id, "Parent chat").await?;
            let root = match parent.classify() {
                ChatKind::Root(root) => root,
                ChatKind::Branch { .. } => {
                    return Err(ApiError::BadRequest(
                        "Cannot branch from a child branch".to_string(),
                    ));
                }
            };

            let branch = root.branch(scope);
            let root = root.into_chat();
            Ok(ResolvedTurn {
                reference_chats: vec![root.id, branch.id.clone()],
                context: root.messages,
                summary: root.summary,
                target: TurnTarget::Fresh(branch),
            })
        }
        (Some(chat_id), _) => {
            let chat = load_chat(persist, chat_id, &user_id, "Chat").await?;
            match chat.classify() {
                ChatKind::Root(root) => {
                    let chat = root.into_chat();
                    Ok(ResolvedTurn {
                        reference_chats: vec![chat.id.clone()],
                        context: chat.messages.clone(),
                        summary: chat.summary.clone(),
                        target: TurnTarget::Existing(chat),
                    })
                }
                ChatKind::Branch { parent_id, chat } => {
                    let parent = load_chat(persist, &parent_id, &user_id, "Parent chat").await?;
                    let mut context = parent.messages;
                    context.extend(chat.messages.iter().cloned());
                    Ok(ResolvedTurn {
                        reference_chats: vec![parent_id, chat.id.clone()],
                        context,
                        summary: chat.summary.clone(),
                        target: TurnTarget::Existing(chat),
                    })
                }
            }
        }
        (None, None) => {
            let root = Chat::new_root(scope).into_chat();
            Ok(ResolvedTurn {
                reference_chats: vec![root.id.clone()],
                context: Vec::new(),
                summary: Vec::new(),
                target: TurnTarget::Fresh(root),
            })
        }
    }
}

/// Append the exchange and persist it. Returns the updated thread.
pub async fn commit_turn(
    persist: &dyn PersistenceClient,
    target: TurnTarget,
    query: &str,
    reply: RespondReply,
    mode_id: Option<ChatMode>,
) -> ApiResult<Chat> {
    match target {
        TurnTarget::Fresh(mut chat) => {
            chat.record_turn(query, &reply.message, reply.summary, mode_id);
            persist.insert_chat(&chat).await?;
            tracing::debug!(chat_id = %chat.id, branch = chat.is_branch(), "Created chat thread");
            Ok(chat)
        }
        TurnTarget::Existing(mut chat) => {
            let turn = chat.record_turn(query, &reply.message, reply.summary, mode_id);
            persist.append_turn(&chat.id, &turn).await?;
            Ok(chat)
        }
    }
}

/// Resolve, ask the tutor, then persist.
pub async fn run_turn(
    persist: &dyn PersistenceClient,
    tutor: &dyn TutorClient,
    input: TurnInput,
) -> ApiResult<(Chat, Vec<String>)> {
    let ResolvedTurn {
        target,
        context,
        summary,
        reference_chats,
    } = resolve_turn(
        persist,
        input.scope.clone(),
        input.chat_id.as_deref(),
        input.parent_id.as_deref(),
    )
    .await?;

    // Fall back to the mode last used on this thread
    let mode_id = input.mode_id.or(target.chat().mode_id);
    tracing::debug!(
        mode = mode_id.map_or("default", ChatMode::label),
        reference_chats = reference_chats.len(),
        "Sending turn to tutor"
    );

    let reply = tutor
        .respond(RespondRequest {
            user_query: input.query.trim().to_string(),
            messages: context,
            topic_id: input.scope.topic_id,
            summary,
            resource_id: input.scope.resource_id,
            user_id: input.scope.user_id,
            mode_id,
        })
        .await?;

    let chat = commit_turn(persist, target, &input.query, reply, mode_id).await?;
    Ok((chat, reference_chats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use scholia_persist::{new_id, MemoryPersistenceClient};

    fn scope(user_id: &str) -> ChatScope {
        ChatScope {
            topic_id: new_id(),
            resource_id: new_id(),
            user_id: user_id.to_string(),
        }
    }

    fn reply(message: &str) -> RespondReply {
        RespondReply {
            message: message.to_string(),
            summary: None,
        }
    }

    async fn seeded_root(persist: &MemoryPersistenceClient) -> Chat {
        let mut root = Chat::new_root(scope("u1")).into_chat();
        root.record_turn("m1", "m2", Some(vec!["s".to_string()]), None);
        persist.insert_chat(&root).await.unwrap();
        root
    }

    #[tokio::test]
    async fn test_new_root_resolution_is_empty() {
        let persist = MemoryPersistenceClient::new();
        let resolved = resolve_turn(&persist, scope("u1"), None, None).await.unwrap();

        assert!(resolved.context.is_empty());
        assert!(matches!(resolved.target, TurnTarget::Fresh(_)));
        assert_eq!(resolved.reference_chats, vec![resolved.target.chat().id.clone()]);
    }

    #[tokio::test]
    async fn test_branch_creation_inherits_parent_context() {
        let persist = MemoryPersistenceClient::new();
        let root = seeded_root(&persist).await;

        let resolved = resolve_turn(&persist, scope("u1"), None, Some(&root.id))
            .await
            .unwrap();

        let branch = resolved.target.chat();
        assert_eq!(branch.parent_chat_id(), Some(root.id.as_str()));
        assert!(branch.messages.is_empty());
        assert_eq!(resolved.context, root.messages);
        assert_eq!(resolved.summary, root.summary);
        assert_eq!(resolved.reference_chats, vec![root.id.clone(), branch.id.clone()]);
    }

    #[tokio::test]
    async fn test_branch_of_branch_is_rejected() {
        let persist = MemoryPersistenceClient::new();
        let root = seeded_root(&persist).await;
        let resolved = resolve_turn(&persist, scope("u1"), None, Some(&root.id))
            .await
            .unwrap();
        let branch = commit_turn(&persist, resolved.target, "q", reply("a"), None)
            .await
            .unwrap();

        let err = resolve_turn(&persist, scope("u1"), None, Some(&branch.id))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_other_users_chat_is_not_found() {
        let persist = MemoryPersistenceClient::new();
        let root = seeded_root(&persist).await;

        let err = resolve_turn(&persist, scope("intruder"), Some(&root.id), None)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_branch_continuation_prepends_parent_history() {
        let persist = MemoryPersistenceClient::new();
        let root = seeded_root(&persist).await;
        let resolved = resolve_turn(&persist, scope("u1"), None, Some(&root.id))
            .await
            .unwrap();
        let branch = commit_turn(&persist, resolved.target, "b1", reply("b2"), None)
            .await
            .unwrap();

        let resolved = resolve_turn(&persist, scope("u1"), Some(&branch.id), None)
            .await
            .unwrap();

        let contents: Vec<&str> = resolved.context.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["m1", "m2", "b1", "b2"]);
        assert_eq!(resolved.reference_chats, vec![root.id.clone(), branch.id.clone()]);

        let stored = persist.get_chat(&branch.id).await.unwrap().unwrap();
        assert_eq!(stored.messages.len(), 2);
    }

    #[tokio::test]
    async fn test_commit_existing_appends_two_messages() {
        let persist = MemoryPersistenceClient::new();
        let root = seeded_root(&persist).await;
        let resolved = resolve_turn(&persist, scope("u1"), Some(&root.id), None)
            .await
            .unwrap();

        let chat = commit_turn(&persist, resolved.target, "q2", reply("a2"), None)
            .await
            .unwrap();

        let stored = persist.get_chat(&root.id).await.unwrap().unwrap();
        assert_eq!(stored.messages.len(), root.messages.len() + 2);
        assert_eq!(stored.messages, chat.messages);
        assert_eq!(stored.summary, vec!["s".to_string()]);
    }
}
