// Public modules
pub mod chat_reply;
pub mod chat_request;
pub mod history_message;
pub mod session_summary;
pub mod uploaded_file;

// Re-exports
pub use chat_reply::{ChatReply, Citation, TokenUsage};
pub use chat_request::ChatRequest;
pub use history_message::{History, HistoryMessage, Role};
pub use session_summary::{CreateSessionParams, SessionList, SessionSummary};
pub use uploaded_file::{FileUpload, UploadedFile};
