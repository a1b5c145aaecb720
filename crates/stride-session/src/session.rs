//! A single visitor's state.

use chrono::{DateTime, Utc};
use serde::Serialize;
use stride_core::types::ChatTurn;

use crate::bag::Bag;

#[derive(Debug, Clone, Serialize)]
pub struct Session {
    /// Display name entered by the visitor. Empty until set.
    pub name: String,
    pub bag: Bag,
    /// Assistant transcript, oldest first. Append-only.
    pub messages: Vec<ChatTurn>,
    /// Inline message shown once on the next page render.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
}

impl Default for Session {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            name: String::new(),
            bag: Bag::new(),
            messages: Vec::new(),
            notice: None,
            created_at: now,
            last_seen: now,
        }
    }
}

impl Session {
    /// Set the display name, trimming surrounding whitespace.
    pub fn set_name(&mut self, name: &str) {
        self.name = name.trim().to_string();
    }

    pub fn has_name(&self) -> bool {
        !self.name.is_empty()
    }

    pub fn push_turn(&mut self, turn: ChatTurn) {
        self.messages.push(turn);
    }

    pub fn set_notice(&mut self, notice: impl Into<String>) {
        self.notice = Some(notice.into());
    }

    /// Take the pending notice, leaving none behind.
    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stride_core::types::ChatRole;

    #[test]
    fn test_defaults() {
        let session = Session::default();
        assert!(session.name.is_empty());
        assert!(!session.has_name());
        assert!(session.bag.is_empty());
        assert!(session.messages.is_empty());
        assert!(session.notice.is_none());
    }

    #[test]
    fn test_set_name_trims() {
        let mut session = Session::default();
        session.set_name("  Taha ");
        assert_eq!(session.name, "Taha");
        assert!(session.has_name());

        session.set_name("   ");
        assert!(!session.has_name());
    }

    #[test]
    fn test_notice_is_one_shot() {
        let mut session = Session::default();
        session.set_notice("Assistant unavailable");
        assert_eq!(session.take_notice().as_deref(), Some("Assistant unavailable"));
        assert!(session.take_notice().is_none());
    }

    #[test]
    fn test_transcript_appends_in_order() {
        let mut session = Session::default();
        session.push_turn(ChatTurn::user("hi"));
        session.push_turn(ChatTurn::assistant("hello"));
        let roles: Vec<ChatRole> = session.messages.iter().map(|t| t.role).collect();
        assert_eq!(roles, vec![ChatRole::User, ChatRole::Assistant]);
    }

    #[test]
    fn test_serialization_skips_empty_notice() {
        let mut session = Session::default();
        session.set_name("Taha");
        let json = serde_json::to_value(&session).unwrap();
        assert_eq!(json["name"], "Taha");
        assert!(json.get("notice").is_none());
        assert_eq!(json["bag"]["items"], serde_json::json!([]));

        session.set_notice("Out of stock");
        let json = serde_json::to_value(&session).unwrap();
        assert_eq!(json["notice"], "Out of stock");
    }
}
