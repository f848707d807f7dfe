use std::fmt;

use serde::{Deserialize, Serialize};

/// Speaker label of a transcript entry.
///
/// The backend stores `user` and `assistant`; the client adds `error` for
/// failed exchanges.  Anything else is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    /// The person typing.
    User,
    /// The model's reply.
    Assistant,
    /// A client-side failure notice.
    Error,
    /// Any other label the server sends.
    Other(String),
}

impl Role {
    /// The label as rendered in the transcript.
    pub fn as_str(&self) -> &str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Error => "error",
            Role::Other(label) => label,
        }
    }
}

impl From<String> for Role {
    fn from(label: String) -> Self {
        match label.as_str() {
            "user" => Role::User,
            "assistant" => Role::Assistant,
            "error" => Role::Error,
            _ => Role::Other(label),
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One message of a session's history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HistoryMessage {
    /// Who said it.
    pub role: Role,

    /// What was said, unescaped.
    pub content: String,

    /// Server timestamp of the message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl HistoryMessage {
    /// Create a history message without a timestamp.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            created_at: None,
        }
    }
}

/// Body of `GET /api/history`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct History {
    /// Messages in server order, oldest first.
    #[serde(default)]
    pub items: Vec<HistoryMessage>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unknown_roles_survive() {
        let history: History = serde_json::from_value(json!({
            "items": [
                {"role": "user", "content": "hi"},
                {"role": "system", "content": "be nice", "created_at": "2024-01-01T00:00:00"}
            ]
        }))
        .unwrap();
        assert_eq!(history.items[0].role, Role::User);
        assert_eq!(history.items[1].role, Role::Other("system".to_string()));
        assert_eq!(history.items[1].role.as_str(), "system");
    }

    #[test]
    fn role_serializes_as_label() {
        let value = serde_json::to_value(HistoryMessage::new(Role::Error, "boom")).unwrap();
        assert_eq!(value, json!({"role": "error", "content": "boom"}));
    }
}
