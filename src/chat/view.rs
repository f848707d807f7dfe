//! Declarative view of client state.
//!
//! [`View::render`] is a pure function of [`ClientState`].  Presenters call it
//! after every state change instead of patching their output, so what is shown
//! can never drift from what the controller holds.

use crate::chat::state::ClientState;
use crate::escape::escape_html;

/// A session list entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionEntry {
    /// Session identifier, for select and delete actions.
    pub session_id: String,
    /// Display title.
    pub label: String,
    /// True for exactly the current session.
    pub active: bool,
}

/// A transcript bubble ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BubbleView {
    /// Speaker label.
    pub role: String,
    /// Raw text, for presenters that do not emit markup.
    pub text: String,
    /// True for the in-flight placeholder.
    pub loading: bool,
}

impl BubbleView {
    /// Markup for this bubble.  Role and text are escaped here and nowhere else.
    pub fn to_html(&self) -> String {
        let role = escape_html(&self.role);
        let class = if self.loading {
            format!("msg {role} loading")
        } else {
            format!("msg {role}")
        };
        format!(
            r#"<div class="{class}"><div class="role">{role}</div><div class="content">{}</div></div>"#,
            escape_html(&self.text)
        )
    }
}

/// Everything a presenter shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    /// Header title.
    pub title: String,
    /// Session list in server order.
    pub sessions: Vec<SessionEntry>,
    /// Transcript, top to bottom.
    pub transcript: Vec<BubbleView>,
    /// Upload status line.
    pub upload_status: Option<String>,
    /// Names of the files attached to every submission.
    pub attachments: Vec<String>,
    /// Whether RAG is requested.
    pub use_rag: bool,
    /// True while a chat request is in flight.
    pub loading: bool,
    /// The transcript should be scrolled to its last bubble.
    pub scroll_to_end: bool,
}

impl View {
    /// Compute the view for `state`.
    pub fn render(state: &ClientState) -> Self {
        let current = state.current_session();
        let sessions = state
            .sessions()
            .iter()
            .map(|session| SessionEntry {
                session_id: session.session_id.clone(),
                label: session.display_title(),
                active: current == Some(session.session_id.as_str()),
            })
            .collect();
        let transcript = state
            .transcript()
            .iter()
            .map(|bubble| BubbleView {
                role: bubble.role.as_str().to_string(),
                text: bubble.content.clone(),
                loading: bubble.loading,
            })
            .collect();
        Self {
            title: state.title().to_string(),
            sessions,
            transcript,
            upload_status: state.upload_status().map(str::to_string),
            attachments: state.uploads().iter().map(|f| f.filename.clone()).collect(),
            use_rag: state.use_rag(),
            loading: state.is_loading(),
            scroll_to_end: state.scroll_to_end,
        }
    }

    /// The active entry, if the current session is listed.
    pub fn active_session(&self) -> Option<&SessionEntry> {
        self.sessions.iter().find(|entry| entry.active)
    }

    /// Markup for the whole transcript.
    pub fn transcript_html(&self) -> String {
        self.transcript.iter().map(BubbleView::to_html).collect()
    }
}
