// Public modules
pub mod backend;
pub mod chat;
pub mod client;
pub mod client_logger;
pub mod error;
pub mod escape;
pub mod observability;
pub mod render;
pub mod title;
pub mod types;
pub mod utils;

// Re-exports
pub use backend::ChatBackend;
pub use client::{ApiBody, RagChat};
pub use client_logger::ClientLogger;
pub use error::{Error, Result};
pub use observability::register_biometrics;
pub use types::*;
