//! The seam between the controller and the chat backend.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{
    ChatReply, ChatRequest, FileUpload, HistoryMessage, SessionSummary, UploadedFile,
};

/// The REST surface the controller consumes.
///
/// [`RagChat`](crate::RagChat) implements this over HTTP.  Every method is a
/// single request; implementations must not retry.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// `GET /api/sessions`.
    async fn list_sessions(&self) -> Result<Vec<SessionSummary>>;

    /// `POST /api/sessions`.
    async fn create_session(&self, title: &str) -> Result<SessionSummary>;

    /// `DELETE /api/sessions/{id}`.
    async fn delete_session(&self, session_id: &str) -> Result<()>;

    /// `GET /api/history?session_id=...`, optionally bounded by `limit`.
    async fn history(&self, session_id: &str, limit: Option<u32>) -> Result<Vec<HistoryMessage>>;

    /// `POST /api/chat`.
    async fn chat(&self, request: &ChatRequest) -> Result<ChatReply>;

    /// `POST /api/files` as multipart field `file`.
    async fn upload_file(&self, upload: FileUpload) -> Result<UploadedFile>;
}
