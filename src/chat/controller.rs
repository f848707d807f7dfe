//! The chat client state controller.
//!
//! [`ChatController`] owns all client state and is the only thing that
//! mutates it.  Each public operation corresponds to one user action, issues
//! its requests sequentially, and converts failures into something visible:
//! an error bubble, an upload status line, or a notice.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::backend::ChatBackend;
use crate::chat::config::ClientConfig;
use crate::chat::reveal::Reveal;
use crate::chat::state::{ChatPhase, ClientState, Exchange};
use crate::chat::view::View;
use crate::error::{Error, Result};
use crate::observability::{
    CHAT_ERRORS, CHAT_REJECTED, CHAT_SUBMISSIONS, REVEAL_CANCELLED, REVEAL_CHARS, UPLOAD_BYTES,
    UPLOAD_ERRORS, UPLOADS,
};
use crate::render::Renderer;
use crate::title::short_id;
use crate::types::{ChatRequest, FileUpload, Role, SessionSummary, UploadedFile};

/// Asks the user to confirm a destructive action.
pub trait Confirm {
    /// Returns true if the user agreed.
    fn confirm(&mut self, question: &str) -> bool;
}

impl<F: FnMut(&str) -> bool> Confirm for F {
    fn confirm(&mut self, question: &str) -> bool {
        self(question)
    }
}

/// Result of [`ChatController::submit`].
#[derive(Debug, Clone)]
pub enum SubmitOutcome {
    /// Empty message or no current session; nothing happened.
    Rejected,
    /// The reply arrived and a reveal is pending; drive it with
    /// [`ChatController::run_reveal`].
    Revealing,
    /// The request failed and an error bubble was appended.
    Failed(Error),
}

/// Result of [`ChatController::delete_session`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The user declined; no request was made.
    Cancelled,
    /// The backend deleted the session.
    Deleted,
}

/// Drives a chat backend on behalf of one user.
pub struct ChatController<B: ChatBackend> {
    backend: B,
    config: ClientConfig,
    state: ClientState,
}

impl<B: ChatBackend> ChatController<B> {
    /// Creates a controller with empty state.
    pub fn new(backend: B, config: ClientConfig) -> Self {
        let state = ClientState::new(config.use_rag);
        Self {
            backend,
            config,
            state,
        }
    }

    /// The current state.
    pub fn state(&self) -> &ClientState {
        &self.state
    }

    /// The view of the current state.
    pub fn view(&self) -> View {
        View::render(&self.state)
    }

    /// The backend this controller talks to.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Replaces the composer contents.
    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.state.draft = text.into();
    }

    /// Sets the RAG toggle sent with every submission.
    pub fn set_use_rag(&mut self, use_rag: bool) {
        self.state.use_rag = use_rag;
    }

    /// Files uploaded so far, in upload order.
    pub fn uploads(&self) -> &[UploadedFile] {
        self.state.uploads()
    }

    /// Fetches the session list.
    pub async fn refresh_sessions(&mut self) -> Result<()> {
        match self.backend.list_sessions().await {
            Ok(sessions) => {
                self.state.sessions = sessions;
                Ok(())
            }
            Err(err) => Err(self.surface(err)),
        }
    }

    /// Creates a session with an empty title and switches to it.
    pub async fn create_session(&mut self) -> Result<SessionSummary> {
        let created = match self.backend.create_session("").await {
            Ok(created) => created,
            Err(err) => return Err(self.surface(err)),
        };
        tracing::debug!(session_id = %created.session_id, "created session");
        self.state
            .switch_session(&created.session_id, created.display_title());
        self.refresh_sessions().await?;
        self.select_session(&created.session_id).await?;
        Ok(created)
    }

    /// Makes `session_id` current and loads its history.
    ///
    /// The previous transcript is dropped before the request, so a failed load
    /// leaves the new session current with an empty transcript.
    pub async fn select_session(&mut self, session_id: &str) -> Result<()> {
        let title = self.title_for(session_id);
        self.state.switch_session(session_id, title);
        self.load_history().await
    }

    /// Replaces the transcript with the current session's history.
    ///
    /// Does nothing when no session is selected.
    pub async fn load_history(&mut self) -> Result<()> {
        let Some(session_id) = self.state.current_session.clone() else {
            return Ok(());
        };
        match self
            .backend
            .history(&session_id, self.config.history_limit)
            .await
        {
            Ok(messages) => {
                self.state.reveal = None;
                self.state.replace_transcript(messages);
                Ok(())
            }
            Err(err) => Err(self.surface(err)),
        }
    }

    /// Deletes a session once `confirm` agrees.
    ///
    /// Deleting the current session clears the header and transcript.  On
    /// failure local state is left untouched.
    pub async fn delete_session(
        &mut self,
        session_id: &str,
        confirm: &mut dyn Confirm,
    ) -> Result<DeleteOutcome> {
        let question = format!("Delete session \"{}\"?", self.title_for(session_id));
        if !confirm.confirm(&question) {
            return Ok(DeleteOutcome::Cancelled);
        }
        if let Err(err) = self.backend.delete_session(session_id).await {
            return Err(self.surface(err));
        }
        if self.state.current_session() == Some(session_id) {
            self.state.clear_session();
        }
        self.refresh_sessions().await?;
        Ok(DeleteOutcome::Deleted)
    }

    /// Sends the draft to the current session.
    ///
    /// A reveal still in progress is completed first.  On success the reply
    /// is staged for [`ChatController::run_reveal`]; on failure an error bubble
    /// is appended and nothing else changes.
    pub async fn submit(&mut self, renderer: &mut dyn Renderer) -> SubmitOutcome {
        let message = self.state.draft.trim().to_string();
        let Some(session_id) = self.state.current_session.clone() else {
            CHAT_REJECTED.click();
            return SubmitOutcome::Rejected;
        };
        if message.is_empty() {
            CHAT_REJECTED.click();
            return SubmitOutcome::Rejected;
        }
        if self.state.reveal.is_some() {
            REVEAL_CANCELLED.click();
            self.finish_reveal();
        }

        CHAT_SUBMISSIONS.click();
        self.state.draft.clear();
        self.state.push_bubble(Role::User, message.clone());
        let loading = self.state.push_loading();
        self.state.phase = ChatPhase::Submitted;
        renderer.show_loading();

        let request = ChatRequest {
            session_id,
            message,
            use_rag: self.state.use_rag,
            file_ids: self
                .state
                .uploads
                .iter()
                .map(|file| file.file_id.clone())
                .collect(),
        };
        let result = self.backend.chat(&request).await;
        self.state.remove_bubble(loading);
        renderer.clear_loading();

        match result {
            Ok(reply) => {
                let bubble = self.state.push_bubble(Role::Assistant, "");
                self.state.reveal = Some(Reveal::new(bubble, reply.assistant_message));
                self.state.last_exchange = Some(Exchange {
                    citations: reply.citations,
                    token_usage: reply.token_usage,
                });
                self.state.phase = ChatPhase::Typing;
                SubmitOutcome::Revealing
            }
            Err(err) => {
                CHAT_ERRORS.click();
                tracing::warn!(error = %err, "chat request failed");
                self.state.push_bubble(Role::Error, err.message());
                self.state.phase = ChatPhase::Errored;
                SubmitOutcome::Failed(err)
            }
        }
    }

    /// Reveals the staged reply one character per configured interval, then
    /// settles.
    ///
    /// Setting `interrupted` shows the rest of the reply at once.  Returns
    /// immediately when nothing is staged.
    pub async fn run_reveal(
        &mut self,
        renderer: &mut dyn Renderer,
        interrupted: &AtomicBool,
    ) -> Result<()> {
        if self.state.reveal.is_none() {
            return Ok(());
        }
        renderer.start_response(Role::Assistant.as_str());
        while let Some(chunk) = self.reveal_step() {
            renderer.print_text(&chunk);
            if self.state.reveal.as_ref().is_some_and(Reveal::is_complete) {
                break;
            }
            tokio::time::sleep(self.config.reveal_interval).await;
            if interrupted.load(Ordering::Relaxed) {
                REVEAL_CANCELLED.click();
                let rest = self.finish_reveal();
                renderer.print_text(&rest);
                break;
            }
        }
        self.finish_reveal();
        renderer.finish_response();
        self.settle().await
    }

    /// Uploads a local file and attaches it to every later submission.
    ///
    /// The upload status line tracks the attempt; `renderer` sees each status
    /// as it is set.
    pub async fn upload_file(
        &mut self,
        path: &Path,
        renderer: &mut dyn Renderer,
    ) -> Result<UploadedFile> {
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        self.state.pending_upload = Some(path.to_path_buf());
        self.set_upload_status(format!("Uploading {filename}..."), renderer);

        let result = self.send_file(path, filename).await;
        self.state.pending_upload = None;
        match result {
            Ok(file) => {
                UPLOADS.click();
                self.set_upload_status(format!("Uploaded: {}", file.filename), renderer);
                self.state.uploads.push(file.clone());
                Ok(file)
            }
            Err(err) => {
                UPLOAD_ERRORS.click();
                tracing::warn!(path = %path.display(), error = %err, "upload failed");
                self.set_upload_status(format!("Upload failed: {}", err.message()), renderer);
                Err(err)
            }
        }
    }

    async fn send_file(&self, path: &Path, filename: String) -> Result<UploadedFile> {
        let data = tokio::fs::read(path)
            .await
            .map_err(|err| Error::io(format!("{}: {}", path.display(), err), err))?;
        UPLOAD_BYTES.count(data.len() as u64);
        self.backend
            .upload_file(FileUpload::new(filename, data))
            .await
    }

    fn set_upload_status(&mut self, status: String, renderer: &mut dyn Renderer) {
        renderer.print_status(&status);
        self.state.upload_status = Some(status);
    }

    /// Shows the next character of the staged reply.
    fn reveal_step(&mut self) -> Option<String> {
        let reveal = self.state.reveal.as_mut()?;
        let chunk = reveal.advance()?.to_string();
        let bubble = reveal.bubble();
        REVEAL_CHARS.click();
        if let Some(target) = self.state.transcript.iter_mut().find(|b| b.id == bubble) {
            target.content.push_str(&chunk);
        }
        Some(chunk)
    }

    /// Completes the staged reply immediately, returning what had not been
    /// shown.
    fn finish_reveal(&mut self) -> String {
        let Some(mut reveal) = self.state.reveal.take() else {
            return String::new();
        };
        let rest = reveal.finish().to_string();
        if let Some(target) = self
            .state
            .transcript
            .iter_mut()
            .find(|b| b.id == reveal.bubble())
        {
            target.content = reveal.text().to_string();
        }
        rest
    }

    /// Picks up server-side renames after an exchange.
    async fn settle(&mut self) -> Result<()> {
        self.state.phase = ChatPhase::Settled;
        self.refresh_sessions().await?;
        if let Some(session_id) = self.state.current_session.clone() {
            self.state.title = self.title_for(&session_id);
        }
        Ok(())
    }

    fn title_for(&self, session_id: &str) -> String {
        self.state
            .sessions
            .iter()
            .find(|s| s.session_id == session_id)
            .map(SessionSummary::display_title)
            .unwrap_or_else(|| short_id(session_id).to_string())
    }

    fn surface(&mut self, err: Error) -> Error {
        tracing::warn!(error = %err, "request failed");
        self.state.notice = Some(err.message().to_string());
        err
    }
}
