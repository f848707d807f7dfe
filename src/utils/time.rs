//! Lenient handling of backend timestamps.
//!
//! The backend emits Python `isoformat()` strings: microsecond precision and,
//! for some rows, no UTC offset at all.  Strict RFC 3339 parsers reject one or
//! both, so timestamps are normalized before parsing.

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;

/// Truncate fractional seconds to three digits and add `Z` when no offset is
/// present.
pub fn normalize_timestamp(raw: &str) -> String {
    let raw = raw.trim();
    let Some(t) = raw.find(['T', 't']) else {
        return raw.to_string();
    };
    let (date, clock) = raw.split_at(t);
    let mut clock = clock.to_string();
    if let Some(dot) = clock.find('.') {
        let digits = clock[dot + 1..]
            .bytes()
            .take_while(u8::is_ascii_digit)
            .count();
        if digits > 3 {
            clock.replace_range(dot + 4..dot + 1 + digits, "");
        }
    }
    let has_offset = clock.ends_with(['Z', 'z']) || clock[1..].contains(['+', '-']);
    if !has_offset {
        clock.push('Z');
    }
    format!("{date}{clock}")
}

/// Parse a backend timestamp, returning `None` when it cannot be understood.
pub fn parse_timestamp(raw: &str) -> Option<OffsetDateTime> {
    OffsetDateTime::parse(&normalize_timestamp(raw), &Rfc3339).ok()
}

/// Human-readable UTC label for a timestamp, or the empty string.
pub fn timestamp_label(raw: &str) -> String {
    parse_timestamp(raw)
        .and_then(|ts| {
            ts.to_offset(time::UtcOffset::UTC)
                .format(format_description!("[year]-[month]-[day] [hour]:[minute]"))
                .ok()
        })
        .unwrap_or_default()
}
