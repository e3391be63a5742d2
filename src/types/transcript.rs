//! Chat transcript and backend message types.

use serde::{Deserialize, Serialize};

/// One message of a group chat transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatLine {
    /// Display name or handle of the speaker
    pub user: String,

    /// Message text
    pub text: String,
}

impl ChatLine {
    pub fn new(user: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            text: text.into(),
        }
    }
}

/// Speaker role in a backend conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A role/content pair sent to the backend.
///
/// Conversations are always passed as an ordered slice of turns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

impl ChatTurn {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Render a transcript as `@user: text` lines.
pub fn render_transcript(lines: &[ChatLine]) -> String {
    lines
        .iter()
        .map(|line| format!("@{}: {}", line.user, line.text.trim()))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_render_transcript() {
        let lines = vec![
            ChatLine::new("alice", "  gm everyone "),
            ChatLine::new("bob", "gm"),
        ];
        assert_eq!(render_transcript(&lines), "@alice: gm everyone\n@bob: gm");
        assert_eq!(render_transcript(&[]), "");
    }

    #[test]
    fn test_turn_serialization() {
        let turn = ChatTurn::user("hello");
        let json = serde_json::to_value(&turn).unwrap();
        assert_eq!(json, serde_json::json!({"role": "user", "content": "hello"}));
    }
}
