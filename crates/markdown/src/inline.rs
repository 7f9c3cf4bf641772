//! Inline formatting for a single run of text.

use serde::{Deserialize, Serialize};

/// One styled run within a line. Spans do not nest; bold, italic, code and
/// links are mutually exclusive per run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InlineSpan {
    Text(String),
    Bold(String),
    Italic(String),
    Code(String),
    Link { label: String, url: String },
}

struct Candidate {
    start: usize,
    end: usize,
    span: InlineSpan,
}

/// Parse one line into spans.
///
/// Single left-to-right scan: at each step the complete construct whose
/// opening delimiter occurs earliest wins; bold beats italic on position
/// ties (`**` would otherwise read as two italics). Delimiters without a
/// closing counterpart stay literal text.
pub fn parse_inline(text: &str) -> Vec<InlineSpan> {
    let mut spans = Vec::new();
    let mut remaining = text;

    while !remaining.is_empty() {
        match next_construct(remaining) {
            None => {
                spans.push(InlineSpan::Text(remaining.to_string()));
                break;
            }
            Some(found) => {
                if found.start > 0 {
                    spans.push(InlineSpan::Text(remaining[..found.start].to_string()));
                }
                spans.push(found.span);
                remaining = &remaining[found.end..];
            }
        }
    }

    spans
}

/// Find the next complete construct. Bold is checked first so it wins
/// position ties; every later kind only replaces the best candidate when
/// it starts strictly earlier.
fn next_construct(text: &str) -> Option<Candidate> {
    let mut best = next_bold(text);

    for candidate in [next_italic(text), next_code(text), next_link(text)] {
        if let Some(found) = candidate {
            match &best {
                Some(b) if found.start >= b.start => {}
                _ => best = Some(found),
            }
        }
    }

    best
}

/// Closing delimiter for a construct opened at `body`, requiring at least
/// one content character. `delim` is ASCII, so skipping a single byte when
/// the closer sits flush against the opener stays on a char boundary.
fn closing(text: &str, body: usize, delim: &str) -> Option<usize> {
    match text[body..].find(delim) {
        Some(0) => Some(body + 1 + text[body + 1..].find(delim)?),
        Some(rel) => Some(body + rel),
        None => None,
    }
}

fn next_bold(text: &str) -> Option<Candidate> {
    let start = text.find("**")?;
    let body = start + 2;
    let close = closing(text, body, "**")?;
    Some(Candidate {
        start,
        end: close + 2,
        span: InlineSpan::Bold(text[body..close].to_string()),
    })
}

fn next_italic(text: &str) -> Option<Candidate> {
    let start = text.find('*')?;
    let body = start + 1;
    let close = closing(text, body, "*")?;
    Some(Candidate {
        start,
        end: close + 1,
        span: InlineSpan::Italic(text[body..close].to_string()),
    })
}

fn next_code(text: &str) -> Option<Candidate> {
    let start = text.find('`')?;
    let body = start + 1;
    let close = closing(text, body, "`")?;
    Some(Candidate {
        start,
        end: close + 1,
        span: InlineSpan::Code(text[body..close].to_string()),
    })
}

fn next_link(text: &str) -> Option<Candidate> {
    let mut from = 0;
    while let Some(rel) = text[from..].find('[') {
        let start = from + rel;
        let label_start = start + 1;
        if let Some(label_end) = closing(text, label_start, "](") {
            let url_start = label_end + 2;
            if let Some(url_end) = closing(text, url_start, ")") {
                return Some(Candidate {
                    start,
                    end: url_end + 1,
                    span: InlineSpan::Link {
                        label: text[label_start..label_end].to_string(),
                        url: text[url_start..url_end].to_string(),
                    },
                });
            }
        }
        from = start + 1;
    }
    None
}
