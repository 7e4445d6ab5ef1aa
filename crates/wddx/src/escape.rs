//! XML escaping for attribute values and element text.
//!
//! Both functions accept `&str` or `Option<&str>`; an absent value escapes to
//! the empty string.

/// Escape a string for use inside a double-quoted XML attribute value.
///
/// Replaces `&`, `<`, `>`, `"` and `'` with their predefined entities.
///
/// ```
/// use wddx::escape_attribute;
///
/// assert_eq!(escape_attribute("a \"b\" & 'c'"), "a &quot;b&quot; &amp; &apos;c&apos;");
/// assert_eq!(escape_attribute(None), "");
/// ```
pub fn escape_attribute<'a>(value: impl Into<Option<&'a str>>) -> String {
    let Some(s) = value.into() else {
        return String::new();
    };
    // `&` goes first so the entities written below are not escaped again.
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Escape a string for use as XML element text content.
///
/// Only `&`, `<` and `>` are replaced; quotes are not special in text.
///
/// ```
/// use wddx::escape_text;
///
/// assert_eq!(escape_text("a < b & c > d"), "a &lt; b &amp; c &gt; d");
/// ```
pub fn escape_text<'a>(value: impl Into<Option<&'a str>>) -> String {
    let Some(s) = value.into() else {
        return String::new();
    };
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribute_escapes_all_five_entities() {
        let out = escape_attribute("<script>alert('x')</script>");
        assert_eq!(out, "&lt;script&gt;alert(&apos;x&apos;)&lt;/script&gt;");
        assert!(!out.contains('<'));
        assert!(!out.contains('>'));
        assert!(!out.contains('\''));
    }

    #[test]
    fn ampersand_is_not_double_escaped() {
        assert_eq!(escape_attribute("&lt;"), "&amp;lt;");
        assert_eq!(escape_text("&amp;"), "&amp;amp;");
    }

    #[test]
    fn text_leaves_quotes_alone() {
        assert_eq!(escape_text("a < b & c > d"), "a &lt; b &amp; c &gt; d");
        assert_eq!(escape_text(r#"say "hi" it's"#), r#"say "hi" it's"#);
    }

    #[test]
    fn absent_input_is_empty() {
        assert_eq!(escape_text(None), "");
        assert_eq!(escape_attribute(None), "");
        assert_eq!(escape_text(Some("x")), "x");
    }
}
