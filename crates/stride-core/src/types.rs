use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Catalog
// =============================================================================

/// A single catalog entry, immutable once loaded.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub category: String,
    pub price: f64,
    /// Image URL.
    pub image: String,
    pub description: String,
    /// The tags cell exactly as it appeared in the source file.
    pub tags: String,
    /// Tags split on `,` or `|`, trimmed, empties removed.
    pub tag_list: Vec<String>,
}

// =============================================================================
// Chat
// =============================================================================

/// Author of a chat turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatRole {
    /// Wire name used by chat completion APIs.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        }
    }
}

/// One entry in a session's chat transcript.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_role_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&ChatRole::User).unwrap(), "\"user\"");
        assert_eq!(
            serde_json::to_string(&ChatRole::Assistant).unwrap(),
            "\"assistant\""
        );
        assert_eq!(ChatRole::Assistant.as_str(), "assistant");
    }

    #[test]
    fn test_chat_turn_constructors() {
        let turn = ChatTurn::user("trail shoes under $120?");
        assert_eq!(turn.role, ChatRole::User);
        assert_eq!(turn.content, "trail shoes under $120?");

        let reply = ChatTurn::assistant("Try the Pegasus Trail.");
        assert_eq!(reply.role, ChatRole::Assistant);
        assert!(reply.timestamp >= turn.timestamp);
    }

    #[test]
    fn test_product_json_shape() {
        let product = Product {
            id: "1".to_string(),
            name: "Air Zoom".to_string(),
            category: "Running".to_string(),
            price: 120.0,
            image: "https://img.example/1.jpg".to_string(),
            description: "Responsive".to_string(),
            tags: "running|daily".to_string(),
            tag_list: vec!["running".to_string(), "daily".to_string()],
        };
        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["price"], 120.0);
        assert_eq!(json["tag_list"][1], "daily");
    }
}
