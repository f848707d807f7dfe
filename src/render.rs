//! Output rendering for the terminal client.
//!
//! This module provides a trait-based rendering abstraction that allows
//! for different output styles.  The default implementation writes to stdout
//! with optional ANSI escape codes to tell speakers apart.

use std::io::{self, Stdout, Write};

use crate::chat::View;

/// ANSI escape code for dim text (used for the loading placeholder).
const ANSI_DIM: &str = "\x1b[2m";

/// ANSI escape code for bold text (used for the active session).
const ANSI_BOLD: &str = "\x1b[1m";

/// ANSI escape code to reset all styling.
const ANSI_RESET: &str = "\x1b[0m";

/// ANSI escape code for cyan text (used for user labels).
const ANSI_CYAN: &str = "\x1b[36m";

/// ANSI escape code for green text (used for assistant labels).
const ANSI_GREEN: &str = "\x1b[32m";

/// ANSI escape code for red text (used for errors).
const ANSI_RED: &str = "\x1b[31m";

/// ANSI escape code for yellow text (used for upload status).
const ANSI_YELLOW: &str = "\x1b[33m";

/// Trait for rendering client output.
///
/// The controller calls the incremental methods while an operation is in
/// progress; presenters call [`Renderer::render_sessions`] and
/// [`Renderer::render_transcript`] with a fresh [`View`] after it completes.
pub trait Renderer: Send {
    /// Print a chunk of revealed response text.
    fn print_text(&mut self, text: &str);

    /// Print an error message.
    fn print_error(&mut self, error: &str);

    /// Print an informational message.
    fn print_info(&mut self, info: &str);

    /// Print an upload status line.
    fn print_status(&mut self, status: &str) {
        self.print_info(status);
    }

    /// Called before the first revealed chunk of a response.
    fn start_response(&mut self, role: &str);

    /// Called when a response has been fully revealed.
    fn finish_response(&mut self);

    /// Show the placeholder for an in-flight chat request.
    fn show_loading(&mut self) {}

    /// Remove the placeholder shown by [`Renderer::show_loading`].
    fn clear_loading(&mut self) {}

    /// Draw the session list.
    fn render_sessions(&mut self, view: &View);

    /// Draw the header and the whole transcript.
    fn render_transcript(&mut self, view: &View);
}

/// Plain text renderer with optional ANSI styling.
pub struct PlainTextRenderer {
    stdout: Stdout,
    use_color: bool,
    loading_shown: bool,
}

impl PlainTextRenderer {
    /// Creates a new PlainTextRenderer with ANSI colors enabled.
    pub fn new() -> Self {
        Self::with_color(true)
    }

    /// Creates a new PlainTextRenderer with specified color setting.
    pub fn with_color(use_color: bool) -> Self {
        Self {
            stdout: io::stdout(),
            use_color,
            loading_shown: false,
        }
    }

    /// Flushes stdout to ensure immediate display of revealed content.
    fn flush(&mut self) {
        let _ = self.stdout.flush();
    }

    fn paint(&self, color: &str, text: &str) -> String {
        if self.use_color {
            format!("{color}{text}{ANSI_RESET}")
        } else {
            text.to_string()
        }
    }

    fn role_label(&self, role: &str) -> String {
        let color = match role {
            "user" => ANSI_CYAN,
            "assistant" => ANSI_GREEN,
            "error" => ANSI_RED,
            _ => ANSI_DIM,
        };
        self.paint(color, &format!("{role}:"))
    }
}

impl Default for PlainTextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for PlainTextRenderer {
    fn print_text(&mut self, text: &str) {
        print!("{text}");
        self.flush();
    }

    fn print_error(&mut self, error: &str) {
        self.clear_loading();
        eprintln!("{}", self.paint(ANSI_RED, &format!("Error: {error}")));
    }

    fn print_info(&mut self, info: &str) {
        println!("{info}");
    }

    fn print_status(&mut self, status: &str) {
        println!("{}", self.paint(ANSI_YELLOW, status));
    }

    fn start_response(&mut self, role: &str) {
        print!("{} ", self.role_label(role));
        self.flush();
    }

    fn finish_response(&mut self) {
        println!();
        self.flush();
    }

    fn show_loading(&mut self) {
        print!("{}", self.paint(ANSI_DIM, "..."));
        self.loading_shown = true;
        self.flush();
    }

    fn clear_loading(&mut self) {
        if self.loading_shown {
            print!("\r   \r");
            self.loading_shown = false;
            self.flush();
        }
    }

    fn render_sessions(&mut self, view: &View) {
        if view.sessions.is_empty() {
            println!("    (no sessions; /new starts one)");
            return;
        }
        for (idx, entry) in view.sessions.iter().enumerate() {
            if entry.active {
                let line = format!("  * {:>2}. {}", idx + 1, entry.label);
                println!("{}", self.paint(ANSI_BOLD, &line));
            } else {
                println!("    {:>2}. {}", idx + 1, entry.label);
            }
        }
    }

    fn render_transcript(&mut self, view: &View) {
        println!("{}", self.paint(ANSI_BOLD, &format!("== {} ==", view.title)));
        for bubble in &view.transcript {
            if bubble.loading {
                println!("{}", self.paint(ANSI_DIM, "..."));
            } else {
                println!("{} {}", self.role_label(&bubble.role), bubble.text);
            }
        }
        self.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renderer_default_has_color() {
        let renderer = PlainTextRenderer::new();
        assert!(renderer.use_color);
        assert_eq!(renderer.role_label("user"), "\x1b[36muser:\x1b[0m");
    }

    #[test]
    fn renderer_without_color() {
        let renderer = PlainTextRenderer::with_color(false);
        assert!(!renderer.use_color);
        assert_eq!(renderer.role_label("assistant"), "assistant:");
        assert_eq!(renderer.paint(ANSI_RED, "x"), "x");
    }
}
