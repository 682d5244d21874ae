//! Markup-to-text reduction for page content.
//!
//! The mnemonic path feeds page content to an external summarizer, which
//! wants prose, not markup. This is a single-pass reduction: drop tags,
//! drop `<script>`/`<style>` bodies, decode the handful of entities that
//! matter, collapse whitespace.

/// Strips markup from an HTML document and collapses whitespace.
///
/// The output is truncated to at most `max_chars` characters, cutting on a
/// char boundary. Not a conforming HTML parser; malformed input degrades to
/// best-effort text.
pub fn strip_markup(html: &str, max_chars: usize) -> String {
    let mut text = String::with_capacity(html.len().min(max_chars));
    let mut chars = html.char_indices().peekable();
    let mut pending_space = false;

    while let Some((i, c)) = chars.next() {
        if c == '<' {
            let rest = &html[i..];
            // Skip <script> and <style> bodies entirely. `get` keeps the
            // slice on char boundaries for multibyte input.
            let skip_until = if rest
                .get(1..7)
                .is_some_and(|s| s.eq_ignore_ascii_case("script"))
            {
                Some("</script")
            } else if rest
                .get(1..6)
                .is_some_and(|s| s.eq_ignore_ascii_case("style"))
            {
                Some("</style")
            } else {
                None
            };

            if let Some(close) = skip_until {
                let lower = rest.to_ascii_lowercase();
                let end = lower.find(close).map(|p| i + p).unwrap_or(html.len());
                while chars.peek().is_some_and(|&(j, _)| j < end) {
                    chars.next();
                }
            }

            // Consume up to the closing '>'.
            for (_, t) in chars.by_ref() {
                if t == '>' {
                    break;
                }
            }
            pending_space = true;
            continue;
        }

        if c == '&' {
            let rest = &html[i..];
            let entity = [
                ("&amp;", '&'),
                ("&lt;", '<'),
                ("&gt;", '>'),
                ("&quot;", '"'),
                ("&#39;", '\''),
                ("&nbsp;", ' '),
            ]
            .iter()
            .find(|(name, _)| rest.starts_with(name));

            if let Some((name, decoded)) = entity {
                for _ in 0..name.len() - 1 {
                    chars.next();
                }
                push_char(&mut text, *decoded, &mut pending_space);
                if text.chars().count() >= max_chars {
                    break;
                }
                continue;
            }
        }

        if c.is_whitespace() {
            pending_space = true;
            continue;
        }

        push_char(&mut text, c, &mut pending_space);
        if text.chars().count() >= max_chars {
            break;
        }
    }

    text
}

fn push_char(text: &mut String, c: char, pending_space: &mut bool) {
    if *pending_space && !text.is_empty() {
        text.push(' ');
    }
    *pending_space = false;
    text.push(c);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_simple_tags() {
        assert_eq!(
            strip_markup("<h1>Hello</h1> <p>world</p>", 100),
            "Hello world"
        );
    }

    #[test]
    fn test_skips_script_and_style() {
        let html = "<p>before</p><script>var x = '<evil>';</script><style>p { color: red }</style><p>after</p>";
        assert_eq!(strip_markup(html, 100), "before after");
    }

    #[test]
    fn test_decodes_common_entities() {
        assert_eq!(strip_markup("a &amp; b &lt;c&gt;", 100), "a & b <c>");
    }

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(strip_markup("a\n\n   b\t\tc", 100), "a b c");
    }

    #[test]
    fn test_truncates_at_limit() {
        let out = strip_markup("<p>abcdefghij</p>", 4);
        assert_eq!(out, "abcd");
    }

    #[test]
    fn test_plain_text_passthrough() {
        assert_eq!(strip_markup("no markup here", 100), "no markup here");
    }

    #[test]
    fn test_unclosed_tag() {
        assert_eq!(strip_markup("text <unclosed", 100), "text");
    }
}
