//! Simulated typing of an already-received reply.

use crate::chat::state::BubbleId;

/// Reveals `text` one character at a time into a transcript bubble.
///
/// The reveal owns the full reply; the bubble only ever holds the revealed
/// prefix.  [`Reveal::finish`] jumps to the end, which is how an in-flight
/// reveal is cancelled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reveal {
    bubble: BubbleId,
    text: String,
    // byte offset, always on a char boundary
    cursor: usize,
}

impl Reveal {
    /// Start revealing `text` into `bubble`.
    pub fn new(bubble: BubbleId, text: impl Into<String>) -> Self {
        Self {
            bubble,
            text: text.into(),
            cursor: 0,
        }
    }

    /// The bubble being filled.
    pub fn bubble(&self) -> BubbleId {
        self.bubble
    }

    /// The complete reply.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The part already shown.
    pub fn revealed(&self) -> &str {
        &self.text[..self.cursor]
    }

    /// Number of characters already shown.
    pub fn revealed_chars(&self) -> usize {
        self.revealed().chars().count()
    }

    /// Number of characters in the complete reply.
    pub fn total_chars(&self) -> usize {
        self.text.chars().count()
    }

    /// True once every character has been shown.
    pub fn is_complete(&self) -> bool {
        self.cursor >= self.text.len()
    }

    /// Show the next character, returning it.
    pub fn advance(&mut self) -> Option<&str> {
        let c = self.text[self.cursor..].chars().next()?;
        let start = self.cursor;
        self.cursor += c.len_utf8();
        Some(&self.text[start..self.cursor])
    }

    /// Show everything at once, returning what had not been shown yet.
    pub fn finish(&mut self) -> &str {
        let start = self.cursor;
        self.cursor = self.text.len();
        &self.text[start..]
    }
}
