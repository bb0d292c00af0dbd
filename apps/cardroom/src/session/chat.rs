use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::domain::bounded_log::BoundedLog;
use crate::domain::PlayerId;
use crate::errors::domain::DomainError;

pub const CHAT_CAPACITY: usize = 50;
pub const MAX_CHAT_LEN: usize = 280;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatKind {
    Text,
    Emoji,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub player_id: PlayerId,
    pub player_name: String,
    pub message: String,
    pub kind: ChatKind,
    #[serde(with = "time::serde::timestamp")]
    pub timestamp: OffsetDateTime,
}

pub type ChatLog = BoundedLog<ChatMessage>;

pub fn new_chat_log() -> ChatLog {
    ChatLog::with_capacity(CHAT_CAPACITY)
}

/// Build and append a chat entry. Text is trimmed and cut to `MAX_CHAT_LEN` chars.
pub fn post(
    log: &mut ChatLog,
    seq: u64,
    player_id: &str,
    player_name: &str,
    text: &str,
    kind: ChatKind,
    now: OffsetDateTime,
) -> Result<ChatMessage, DomainError> {
    let message: String = text.trim().chars().take(MAX_CHAT_LEN).collect();
    if message.is_empty() {
        return Err(DomainError::validation_other("Message is empty"));
    }
    let entry = ChatMessage {
        id: format!("{}-{seq}", now.unix_timestamp()),
        player_id: player_id.to_string(),
        player_name: player_name.to_string(),
        message,
        kind,
        timestamp: now,
    };
    log.push(entry.clone());
    Ok(entry)
}
