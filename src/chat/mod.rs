//! The chat client: state, controller, and view.
//!
//! This module turns backend operations into a responsive client.  It
//! supports:
//!
//! - Session list sync with display titles
//! - History loading and a typed-out reveal of every reply
//! - File uploads attached to all later messages
//! - Slash commands for the terminal front-end
//!
//! # Architecture
//!
//! The module is organized into several components:
//!
//! - [`ClientState`]: everything shown, owned by one controller
//! - [`ChatController`]: the only code that mutates state
//! - [`View`]: a pure rendering of state for presenters
//! - [`ClientConfig`]: CLI argument parsing and configuration
//! - [`ChatCommand`]: slash command parsing

mod commands;
mod config;
mod controller;
mod reveal;
mod state;
mod view;

pub use crate::render::{PlainTextRenderer, Renderer};
pub use commands::{ChatCommand, SessionRef, help_text, parse_command};
pub use config::{ClientArgs, ClientConfig};
pub use controller::{ChatController, Confirm, DeleteOutcome, SubmitOutcome};
pub use reveal::Reveal;
pub use state::{Bubble, BubbleId, ChatPhase, ClientState, Exchange};
pub use view::{BubbleView, SessionEntry, View};
