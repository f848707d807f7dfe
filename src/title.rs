//! Display titles for sessions.
//!
//! A freshly created session has no title, and some backends store the session
//! id as its title.  Neither is useful in a list, so such sessions are labeled
//! by their timestamp instead.

use crate::types::SessionSummary;
use crate::utils::time::timestamp_label;

/// Label used when a session has neither a real title nor a usable timestamp.
pub const PLACEHOLDER_TITLE: &str = "New chat";

/// Header shown while no session is selected.
pub const NO_SESSION_TITLE: &str = "No session selected";

/// Number of id characters shown when nothing better is known.
const SHORT_ID_LEN: usize = 8;

/// Compute the title shown for `session`.
///
/// Preference order: a non-empty, non-identifier-shaped title; a label from
/// `created_at`; a label from `updated_at`; [`PLACEHOLDER_TITLE`].
pub fn display_title(session: &SessionSummary) -> String {
    if let Some(title) = session.title.as_deref().map(str::trim)
        && !title.is_empty()
        && !is_identifier_shaped(title)
    {
        return title.to_string();
    }
    [&session.created_at, &session.updated_at]
        .into_iter()
        .flatten()
        .map(|ts| timestamp_label(ts))
        .find(|label| !label.is_empty())
        .unwrap_or_else(|| PLACEHOLDER_TITLE.to_string())
}

/// The first few characters of a session id.
pub fn short_id(session_id: &str) -> &str {
    match session_id.char_indices().nth(SHORT_ID_LEN) {
        Some((idx, _)) => &session_id[..idx],
        None => session_id,
    }
}

/// True if `s` is a canonical random identifier: 8-4-4-4-12 hex digits with a
/// version nibble of 1 through 5 and an RFC 4122 variant nibble.
pub fn is_identifier_shaped(s: &str) -> bool {
    const GROUPS: [usize; 5] = [8, 4, 4, 4, 12];
    let groups: Vec<&str> = s.split('-').collect();
    if groups.len() != GROUPS.len() {
        return false;
    }
    let shaped = groups
        .iter()
        .zip(GROUPS)
        .all(|(group, len)| group.len() == len && group.bytes().all(|b| b.is_ascii_hexdigit()));
    if !shaped {
        return false;
    }
    let version = groups[2].as_bytes()[0];
    let variant = groups[3].as_bytes()[0].to_ascii_lowercase();
    matches!(version, b'1'..=b'5') && matches!(variant, b'8' | b'9' | b'a' | b'b')
}

#[cfg(test)]
mod tests {
    use super::*;

    const UUID: &str = "3f2b8c1e-9d4a-4b6f-a1c2-7e5d9f0a1b2c";

    #[test]
    fn real_titles_are_verbatim() {
        let session = SessionSummary::new(UUID)
            .with_title("Trip planning")
            .with_created_at("2024-03-09T14:05:06.123456+00:00");
        assert_eq!(display_title(&session), "Trip planning");
    }

    #[test]
    fn identifier_titles_fall_back_to_timestamp() {
        let session = SessionSummary::new(UUID)
            .with_title(UUID)
            .with_created_at("2024-03-09T14:05:06.123456+00:00");
        assert_eq!(display_title(&session), "2024-03-09 14:05");
    }

    #[test]
    fn empty_titles_fall_back_to_updated_at() {
        let session = SessionSummary::new(UUID)
            .with_title("   ")
            .with_updated_at("2024-03-10T08:00:00");
        assert_eq!(display_title(&session), "2024-03-10 08:00");
    }

    #[test]
    fn unparseable_created_at_tries_updated_at() {
        let session = SessionSummary::new(UUID)
            .with_created_at("not a date")
            .with_updated_at("2024-03-10T08:00:00Z");
        assert_eq!(display_title(&session), "2024-03-10 08:00");
    }

    #[test]
    fn nothing_usable_gives_placeholder() {
        let session = SessionSummary::new(UUID).with_created_at("garbage");
        assert_eq!(display_title(&session), PLACEHOLDER_TITLE);
        assert_eq!(display_title(&SessionSummary::new("x")), PLACEHOLDER_TITLE);
    }

    #[test]
    fn identifier_shape() {
        assert!(is_identifier_shaped(UUID));
        assert!(is_identifier_shaped(&UUID.to_uppercase()));
        // version nibble 0
        assert!(!is_identifier_shaped("3f2b8c1e-9d4a-0b6f-a1c2-7e5d9f0a1b2c"));
        // variant nibble c
        assert!(!is_identifier_shaped("3f2b8c1e-9d4a-4b6f-c1c2-7e5d9f0a1b2c"));
        assert!(!is_identifier_shaped("3f2b8c1e9d4a4b6fa1c27e5d9f0a1b2c"));
        assert!(!is_identifier_shaped("3f2b8c1e-9d4a-4b6f-a1c2-7e5d9f0a1b2g"));
        assert!(!is_identifier_shaped("Trip planning"));
    }

    #[test]
    fn short_ids() {
        assert_eq!(short_id(UUID), "3f2b8c1e");
        assert_eq!(short_id("abc"), "abc");
    }
}
