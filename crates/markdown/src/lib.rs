//! Lightweight markdown renderer for streamed chat responses.
//!
//! Handles the subset of markdown that AI models actually produce:
//! - fenced code blocks (tolerant of a missing closing fence mid-stream)
//! - `# Heading` through `#### Heading`
//! - horizontal rules, bullet and numbered lists, blockquotes, pipe tables
//! - `**bold**`, `*italic*`, `` `inline code` ``, `[text](url)` links
//!
//! Parsing is a pure function over the full text and is re-run on every
//! streaming update; nothing is cached between calls. Malformed input never
//! errors, it degrades to plain paragraphs.

pub mod block;
pub mod html;
pub mod inline;

pub use block::{parse_blocks, Block};
pub use html::extract_html_document;
pub use inline::{parse_inline, InlineSpan};
