use serde::{Deserialize, Serialize};

/// A retrieved chunk the backend used to ground its answer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Citation {
    /// File the chunk came from.
    pub file_id: String,
    /// Chunk within that file.
    pub chunk_id: String,
}

/// Token accounting reported by the backend's model call.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenUsage {
    /// Prompt tokens, if the provider reported them.
    #[serde(default)]
    pub prompt: Option<u64>,
    /// Completion tokens, if the provider reported them.
    #[serde(default)]
    pub completion: Option<u64>,
}

/// Body returned by `POST /api/chat`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatReply {
    /// The complete assistant response.
    pub assistant_message: String,

    /// Chunks cited when RAG was used.
    #[serde(default)]
    pub citations: Vec<Citation>,

    /// Token usage of the exchange.
    #[serde(default)]
    pub token_usage: TokenUsage,
}

impl ChatReply {
    /// A reply carrying only the assistant text.
    pub fn new(assistant_message: impl Into<String>) -> Self {
        Self {
            assistant_message: assistant_message.into(),
            citations: Vec::new(),
            token_usage: TokenUsage::default(),
        }
    }
}
