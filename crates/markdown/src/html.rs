//! HTML document extraction for sandboxed previews.

use crate::block::{parse_blocks, Block};

/// Pull a complete HTML document out of a finalized response.
///
/// Pass order: a fenced block (untagged or tagged `html`) holding a full
/// document; then any block tagged `html` regardless of its content; then
/// the response itself when it is bare HTML. `None` means no preview is
/// available, which is not an error.
pub fn extract_html_document(text: &str) -> Option<String> {
    let blocks = parse_blocks(text);

    for block in &blocks {
        if let Block::Code { language, code } = block {
            if language.is_empty() || language.eq_ignore_ascii_case("html") {
                let body = code.trim();
                if starts_like_document(body) && body.to_ascii_lowercase().ends_with("</html>") {
                    return Some(body.to_string());
                }
            }
        }
    }

    for block in &blocks {
        if let Block::Code { language, code } = block {
            if language.eq_ignore_ascii_case("html") {
                return Some(code.trim().to_string());
            }
        }
    }

    if starts_like_document(text.trim_start()) {
        return Some(text.to_string());
    }

    None
}

fn starts_like_document(text: &str) -> bool {
    let lower = text.get(..16).unwrap_or(text).to_ascii_lowercase();
    lower.starts_with("<!doctype") || lower.starts_with("<html")
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = "<!DOCTYPE html>\n<html><body><h1>Hi</h1></body></html>";

    #[test]
    fn test_full_document_in_untagged_fence() {
        let text = format!("Here you go:\n\n```\n{DOC}\n```\n\nEnjoy!");
        assert_eq!(extract_html_document(&text).as_deref(), Some(DOC));
    }

    #[test]
    fn test_full_document_in_html_fence() {
        let text = format!("```html\n{DOC}\n```");
        assert_eq!(extract_html_document(&text).as_deref(), Some(DOC));
    }

    #[test]
    fn test_html_tagged_fragment_without_doctype() {
        let text = "```html\n<div>partial</div>\n```";
        assert_eq!(
            extract_html_document(text).as_deref(),
            Some("<div>partial</div>")
        );
    }

    #[test]
    fn test_document_fence_preferred_over_earlier_fragment_fence() {
        let text = format!("```html\n<div>nav</div>\n```\n\n```\n{DOC}\n```");
        assert_eq!(extract_html_document(&text).as_deref(), Some(DOC));
    }

    #[test]
    fn test_bare_document_text() {
        assert_eq!(extract_html_document(DOC).as_deref(), Some(DOC));
    }

    #[test]
    fn test_unterminated_fence_still_extracts_tagged_html() {
        // Streaming can cut off before the closing fence; the tagged-html
        // pass still sees the partial content.
        let text = "```html\n<div>half";
        assert_eq!(extract_html_document(text).as_deref(), Some("<div>half"));
    }

    #[test]
    fn test_plain_prose_has_no_preview() {
        assert_eq!(extract_html_document("No markup here at all."), None);
        assert_eq!(
            extract_html_document("```js\nconsole.log(1)\n```"),
            None
        );
    }

    #[test]
    fn test_doctype_in_js_fence_is_not_a_document() {
        let text = format!("```js\n{DOC}\n```");
        assert_eq!(extract_html_document(&text), None);
    }
}
