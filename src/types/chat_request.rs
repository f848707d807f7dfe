use serde::{Deserialize, Serialize};

/// Body of `POST /api/chat`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatRequest {
    /// Session the message belongs to.
    pub session_id: String,

    /// Trimmed user text.
    pub message: String,

    /// Ask the backend for retrieval-augmented generation.
    pub use_rag: bool,

    /// Every file uploaded during this client's lifetime, in upload order.
    pub file_ids: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn wire_shape() {
        let request = ChatRequest {
            session_id: "s-1".to_string(),
            message: "hello".to_string(),
            use_rag: true,
            file_ids: vec!["f-1".to_string(), "f-2".to_string()],
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "session_id": "s-1",
                "message": "hello",
                "use_rag": true,
                "file_ids": ["f-1", "f-2"]
            })
        );
    }
}
