//! Logging trait for backend requests.
//!
//! This module provides the [`ClientLogger`] trait that allows users to capture
//! every request passing through the [`RagChat`](crate::RagChat) client.

use crate::client::ApiBody;

/// A trait for logging backend requests.
///
/// # Example
///
/// ```rust,ignore
/// use ragchat::{ApiBody, ClientLogger};
///
/// struct StderrLogger;
///
/// impl ClientLogger for StderrLogger {
///     fn log_request(&self, method: &str, url: &str) {
///         eprintln!("--> {method} {url}");
///     }
///
///     fn log_response(&self, method: &str, url: &str, status: u16, body: &ApiBody) {
///         eprintln!("<-- {status} {method} {url} {body:?}");
///     }
///
///     fn log_failure(&self, method: &str, url: &str, error: &ragchat::Error) {
///         eprintln!("<-- {method} {url} failed: {error}");
///     }
/// }
/// ```
pub trait ClientLogger: Send + Sync {
    /// Called before a request is sent.
    fn log_request(&self, method: &str, url: &str);

    /// Called with the decoded body of every successful response.
    fn log_response(&self, method: &str, url: &str, status: u16, body: &ApiBody);

    /// Called when a request fails, whether in transport or with a non-2xx status.
    fn log_failure(&self, method: &str, url: &str, error: &crate::Error);
}
