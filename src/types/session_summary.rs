use serde::{Deserialize, Serialize};

/// One entry of the backend's session list.
///
/// Only `session_id` is guaranteed.  The list endpoint reports `updated_at`,
/// the create endpoint reports `created_at`; either may be absent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionSummary {
    /// Opaque session identifier.
    pub session_id: String,

    /// Title as stored by the backend; may be empty or identifier-shaped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Creation timestamp as sent by the backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    /// Last-update timestamp as sent by the backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl SessionSummary {
    /// Create a summary carrying only an identifier.
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            title: None,
            created_at: None,
            updated_at: None,
        }
    }

    /// Set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the creation timestamp.
    pub fn with_created_at(mut self, created_at: impl Into<String>) -> Self {
        self.created_at = Some(created_at.into());
        self
    }

    /// Set the update timestamp.
    pub fn with_updated_at(mut self, updated_at: impl Into<String>) -> Self {
        self.updated_at = Some(updated_at.into());
        self
    }

    /// The text shown for this session in lists and headers.
    pub fn display_title(&self) -> String {
        crate::title::display_title(self)
    }
}

/// Body of `GET /api/sessions`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionList {
    /// Sessions in server order.
    #[serde(default)]
    pub items: Vec<SessionSummary>,
}

/// Body of `POST /api/sessions`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateSessionParams {
    /// Requested title; the client always asks for an empty one.
    pub title: String,
}
