//! Core types shared with the engine layer.

use serde::{Deserialize, Serialize};

/// Continuation marker issued by a conversational engine.
///
/// The store never looks inside `value`; it only files it under `engine`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeToken {
    /// Engine that issued the token (e.g. `"codex"`).
    pub engine: String,
    /// Opaque token text.
    pub value: String,
}

impl ResumeToken {
    pub fn new(engine: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            engine: engine.into(),
            value: value.into(),
        }
    }
}

/// Key a (chat, owner) pair is filed under: `"{chat_id}:{owner_id}"`,
/// or `"{chat_id}:chat"` when there is no owner.
pub fn chat_key(chat_id: i64, owner_id: Option<i64>) -> String {
    match owner_id {
        Some(owner) => format!("{}:{}", chat_id, owner),
        None => format!("{}:chat", chat_id),
    }
}
