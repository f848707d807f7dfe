//! Client state owned by a single controller.

use std::path::PathBuf;

use crate::chat::reveal::Reveal;
use crate::title::NO_SESSION_TITLE;
use crate::types::{Citation, HistoryMessage, Role, SessionSummary, TokenUsage, UploadedFile};

/// Identifies a transcript bubble for later update or removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BubbleId(u64);

/// One entry of the visible transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bubble {
    /// Handle for updates.
    pub id: BubbleId,
    /// Speaker label.
    pub role: Role,
    /// Raw, unescaped text.  During a reveal this is the revealed prefix.
    pub content: String,
    /// True for the placeholder shown while a chat request is in flight.
    pub loading: bool,
}

/// Where the most recent chat submission stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChatPhase {
    /// Nothing submitted yet.
    #[default]
    Idle,
    /// Request in flight; a loading bubble is shown.
    Submitted,
    /// Reply received and being revealed.
    Typing,
    /// Reply fully revealed and the session list refreshed.
    Settled,
    /// The request failed; an error bubble was appended.
    Errored,
}

/// Metadata of the last successful exchange.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Exchange {
    /// Retrieved chunks the answer cites.
    pub citations: Vec<Citation>,
    /// Token usage the backend reported.
    pub token_usage: TokenUsage,
}

/// Everything a view is rendered from.
#[derive(Debug, Clone)]
pub struct ClientState {
    pub(crate) current_session: Option<String>,
    pub(crate) title: String,
    pub(crate) sessions: Vec<SessionSummary>,
    pub(crate) transcript: Vec<Bubble>,
    pub(crate) scroll_to_end: bool,
    pub(crate) uploads: Vec<UploadedFile>,
    pub(crate) upload_status: Option<String>,
    pub(crate) pending_upload: Option<PathBuf>,
    pub(crate) draft: String,
    pub(crate) use_rag: bool,
    pub(crate) phase: ChatPhase,
    pub(crate) reveal: Option<Reveal>,
    pub(crate) last_exchange: Option<Exchange>,
    pub(crate) notice: Option<String>,
    next_bubble: u64,
}

impl ClientState {
    /// Fresh state: no session, empty transcript, no uploads.
    pub fn new(use_rag: bool) -> Self {
        Self {
            current_session: None,
            title: NO_SESSION_TITLE.to_string(),
            sessions: Vec::new(),
            transcript: Vec::new(),
            scroll_to_end: false,
            uploads: Vec::new(),
            upload_status: None,
            pending_upload: None,
            draft: String::new(),
            use_rag,
            phase: ChatPhase::Idle,
            reveal: None,
            last_exchange: None,
            notice: None,
            next_bubble: 0,
        }
    }

    /// The selected session, if any.
    pub fn current_session(&self) -> Option<&str> {
        self.current_session.as_deref()
    }

    /// The visible header title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The last fetched session list, in server order.
    pub fn sessions(&self) -> &[SessionSummary] {
        &self.sessions
    }

    /// The visible transcript.
    pub fn transcript(&self) -> &[Bubble] {
        &self.transcript
    }

    /// Files uploaded so far, in upload order.
    pub fn uploads(&self) -> &[UploadedFile] {
        &self.uploads
    }

    /// The upload status line.
    pub fn upload_status(&self) -> Option<&str> {
        self.upload_status.as_deref()
    }

    /// A file selected for upload whose request has not completed.
    pub fn pending_upload(&self) -> Option<&PathBuf> {
        self.pending_upload.as_ref()
    }

    /// The composer contents.
    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Whether submissions request retrieval-augmented generation.
    pub fn use_rag(&self) -> bool {
        self.use_rag
    }

    /// Phase of the most recent submission.
    pub fn phase(&self) -> ChatPhase {
        self.phase
    }

    /// The reveal in progress, if any.
    pub fn reveal(&self) -> Option<&Reveal> {
        self.reveal.as_ref()
    }

    /// Metadata of the last successful exchange.
    pub fn last_exchange(&self) -> Option<&Exchange> {
        self.last_exchange.as_ref()
    }

    /// The most recent surfaced failure.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// True while the loading placeholder is shown.
    pub fn is_loading(&self) -> bool {
        self.transcript.iter().any(|b| b.loading)
    }

    pub(crate) fn push_bubble(&mut self, role: Role, content: impl Into<String>) -> BubbleId {
        self.push(role, content.into(), false)
    }

    pub(crate) fn push_loading(&mut self) -> BubbleId {
        self.push(Role::Assistant, String::new(), true)
    }

    pub(crate) fn remove_bubble(&mut self, id: BubbleId) {
        self.transcript.retain(|b| b.id != id);
    }

    pub(crate) fn replace_transcript(&mut self, messages: Vec<HistoryMessage>) {
        self.transcript.clear();
        for message in messages {
            self.push(message.role, message.content, false);
        }
        self.scroll_to_end = true;
    }

    pub(crate) fn switch_session(&mut self, session_id: &str, title: String) {
        self.current_session = Some(session_id.to_string());
        self.title = title;
        self.transcript.clear();
        self.reveal = None;
        self.scroll_to_end = false;
    }

    pub(crate) fn clear_session(&mut self) {
        self.current_session = None;
        self.title = NO_SESSION_TITLE.to_string();
        self.transcript.clear();
        self.reveal = None;
        self.scroll_to_end = false;
    }

    fn push(&mut self, role: Role, content: String, loading: bool) -> BubbleId {
        let id = BubbleId(self.next_bubble);
        self.next_bubble += 1;
        self.transcript.push(Bubble {
            id,
            role,
            content,
            loading,
        });
        self.scroll_to_end = true;
        id
    }
}

impl Default for ClientState {
    fn default() -> Self {
        Self::new(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loading_bubble_lifecycle() {
        let mut state = ClientState::default();
        state.push_bubble(Role::User, "hi");
        let loading = state.push_loading();
        assert!(state.is_loading());
        state.remove_bubble(loading);
        assert!(!state.is_loading());
        assert_eq!(state.transcript().len(), 1);
    }

    #[test]
    fn bubble_ids_are_unique_across_replacement() {
        let mut state = ClientState::default();
        let first = state.push_bubble(Role::User, "a");
        state.replace_transcript(vec![HistoryMessage::new(Role::Assistant, "b")]);
        assert_ne!(state.transcript()[0].id, first);
        assert!(state.scroll_to_end);
    }

    #[test]
    fn switch_session_drops_old_transcript() {
        let mut state = ClientState::default();
        state.current_session = Some("a".to_string());
        state.push_bubble(Role::User, "from a");
        state.switch_session("b", "Beta".to_string());
        assert_eq!(state.current_session(), Some("b"));
        assert_eq!(state.title(), "Beta");
        assert!(state.transcript().is_empty());
        assert!(state.reveal().is_none());
    }

    #[test]
    fn clear_session_resets_header() {
        let mut state = ClientState::default();
        state.current_session = Some("s-1".to_string());
        state.title = "Trip".to_string();
        state.push_bubble(Role::User, "hi");
        state.clear_session();
        assert!(state.current_session().is_none());
        assert_eq!(state.title(), NO_SESSION_TITLE);
        assert!(state.transcript().is_empty());
    }
}
