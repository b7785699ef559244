//! Conversation ("chatbox") and turn types.
//!
//! A conversation is addressed by a client-visible `code` and owned by one
//! account. Turns are append-only and ordered by creation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::account::AccountId;

// Re-export MessageRole from llm module (it's used in both chat and llm contexts).
pub use crate::llm::MessageRole;

/// Maximum number of characters kept from the seed message as the title.
pub const TITLE_MAX_CHARS: usize = 250;

/// Maximum number of conversations returned by a listing.
pub const CONVERSATION_LIST_LIMIT: i64 = 100;

/// A conversation between one account and the assistant.
///
/// `code` and `owner_account_id` never change after creation; neither does
/// `title`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    pub code: String,
    #[serde(rename = "account_id")]
    pub owner_account_id: AccountId,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

/// One persisted message within a conversation.
///
/// `seq` is the storage-assigned insertion sequence; turns sort by
/// `(created_at, seq)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    #[serde(skip_serializing)]
    #[serde(default)]
    pub seq: i64,
    #[serde(rename = "chatbox_code")]
    pub conversation_code: String,
    pub role: MessageRole,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// A turn about to be appended. Storage assigns `seq` and `created_at`,
/// never letting `created_at` run backwards within a conversation.
#[derive(Debug, Clone)]
pub struct NewTurn {
    pub conversation_code: String,
    pub role: MessageRole,
    pub content: String,
}

/// The assistant's reply as returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub role: MessageRole,
    pub content: String,
}

/// Result of posting a message: the (possibly newly created) code and the reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostMessageOutcome {
    pub chatbox_code: String,
    pub result: Reply,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_serializes_wire_names() {
        let turn = Turn {
            seq: 7,
            conversation_code: "abc".to_string(),
            role: MessageRole::User,
            content: "hello".to_string(),
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&turn).unwrap();
        assert_eq!(json["chatbox_code"], "abc");
        assert_eq!(json["role"], "user");
        assert!(json.get("seq").is_none());
    }

    #[test]
    fn test_conversation_serializes_account_id() {
        let conversation = Conversation {
            code: "abc".to_string(),
            owner_account_id: AccountId(42),
            title: "hello".to_string(),
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&conversation).unwrap();
        assert_eq!(json["account_id"], 42);
        assert_eq!(json["title"], "hello");
    }

    #[test]
    fn test_post_message_outcome_shape() {
        let outcome = PostMessageOutcome {
            chatbox_code: "code-1".to_string(),
            result: Reply {
                role: MessageRole::Assistant,
                content: "Good luck".to_string(),
            },
        };
        let json = serde_json::to_string(&outcome).unwrap();
        assert_eq!(
            json,
            r#"{"chatbox_code":"code-1","result":{"role":"assistant","content":"Good luck"}}"#
        );
    }
}
