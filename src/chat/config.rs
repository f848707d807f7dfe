//! Configuration types for the chat client.
//!
//! This module provides CLI argument parsing via `arrrg` and the resolved
//! configuration the controller and terminal front-end run with.

use std::time::Duration;

use arrrg_derive::CommandLine;

use crate::client::DEFAULT_TIMEOUT;

/// Default delay between revealed characters.
const DEFAULT_REVEAL_INTERVAL: Duration = Duration::from_millis(20);

/// Default number of history messages requested per session.
const DEFAULT_HISTORY_LIMIT: u32 = 50;

/// Command-line arguments for the ragchat tool.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct ClientArgs {
    /// Backend base URL.
    #[arrrg(optional, "Backend base URL (default: $RAGCHAT_BASE_URL or http://127.0.0.1:8000/)", "URL")]
    pub base_url: Option<String>,

    /// Request retrieval-augmented generation from the start.
    #[arrrg(flag, "Enable RAG for every message")]
    pub rag: bool,

    /// Milliseconds between revealed characters.
    #[arrrg(optional, "Typing delay per character in milliseconds (default: 20)", "MS")]
    pub reveal_ms: Option<u64>,

    /// Number of history messages to load per session.
    #[arrrg(optional, "History messages to load per session (default: 50)", "N")]
    pub history_limit: Option<u32>,

    /// HTTP timeout in seconds.
    #[arrrg(optional, "HTTP request timeout in seconds (default: 60)", "SECS")]
    pub timeout_secs: Option<u64>,

    /// Disable ANSI colors and styles.
    #[arrrg(flag, "Disable ANSI colors/styles")]
    pub no_color: bool,

    /// Emit diagnostic logs to stderr.
    #[arrrg(flag, "Log requests and failures to stderr")]
    pub log: bool,
}

/// Configuration for a chat client.
///
/// This struct holds the resolved configuration values after processing
/// command-line arguments with appropriate defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend base URL; `None` defers to the environment.
    pub base_url: Option<String>,

    /// Initial state of the RAG toggle.
    pub use_rag: bool,

    /// Delay between revealed characters.
    pub reveal_interval: Duration,

    /// Page size for history requests; `None` uses the backend default.
    pub history_limit: Option<u32>,

    /// HTTP request timeout.
    pub timeout: Duration,

    /// Whether to use ANSI colors and styles in output.
    pub use_color: bool,

    /// Whether to install a stderr log subscriber.
    pub log: bool,
}

impl ClientConfig {
    /// Creates a new ClientConfig with default values.
    ///
    /// Defaults:
    /// - RAG: off
    /// - Reveal interval: 20ms
    /// - History limit: 50
    /// - Timeout: 60s
    /// - Color: enabled
    pub fn new() -> Self {
        Self {
            base_url: None,
            use_rag: false,
            reveal_interval: DEFAULT_REVEAL_INTERVAL,
            history_limit: Some(DEFAULT_HISTORY_LIMIT),
            timeout: DEFAULT_TIMEOUT,
            use_color: true,
            log: false,
        }
    }

    /// Sets the backend base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets the initial RAG toggle.
    pub fn with_rag(mut self, use_rag: bool) -> Self {
        self.use_rag = use_rag;
        self
    }

    /// Sets the delay between revealed characters.
    pub fn with_reveal_interval(mut self, interval: Duration) -> Self {
        self.reveal_interval = interval;
        self
    }

    /// Sets the history page size.
    pub fn with_history_limit(mut self, limit: Option<u32>) -> Self {
        self.history_limit = limit;
        self
    }

    /// Sets the HTTP timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Disables ANSI color output.
    pub fn without_color(mut self) -> Self {
        self.use_color = false;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ClientArgs> for ClientConfig {
    fn from(args: ClientArgs) -> Self {
        let defaults = ClientConfig::new();
        ClientConfig {
            base_url: args.base_url,
            use_rag: args.rag,
            reveal_interval: args
                .reveal_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.reveal_interval),
            history_limit: args.history_limit.or(defaults.history_limit),
            timeout: args
                .timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            use_color: !args.no_color,
            log: args.log,
        }
    }
}
