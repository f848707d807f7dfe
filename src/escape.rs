//! HTML escaping for transcript content.

/// Escape the characters that are significant in HTML text and attribute
/// values: `&`, `<`, `>`, `"` and `'`.
///
/// State always holds raw text; this is applied exactly once, when a view is
/// rendered to markup.  Escaping twice turns `&amp;` into `&amp;amp;`.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_significant_characters() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn plain_text_untouched() {
        assert_eq!(escape_html("hello, 世界\nline two"), "hello, 世界\nline two");
        assert_eq!(escape_html(""), "");
    }

    #[test]
    fn not_idempotent() {
        let once = escape_html("a & b");
        assert_eq!(once, "a &amp; b");
        assert_eq!(escape_html(&once), "a &amp;amp; b");
    }
}
