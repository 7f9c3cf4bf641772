//! Block-level parsing: one forward pass over lines, no backtracking.

use crate::inline::{parse_inline, InlineSpan};
use serde::{Deserialize, Serialize};

/// One block node of a rendered response. Blocks own their content and are
/// rebuilt from scratch on every parse; identity across renders is the
/// caller's concern (index keys).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Block {
    Code {
        language: String,
        code: String,
    },
    Heading {
        level: u8,
        spans: Vec<InlineSpan>,
    },
    Rule,
    UnorderedList {
        items: Vec<Vec<InlineSpan>>,
    },
    OrderedList {
        items: Vec<Vec<InlineSpan>>,
    },
    Blockquote {
        lines: Vec<Vec<InlineSpan>>,
    },
    Table {
        headers: Vec<Vec<InlineSpan>>,
        rows: Vec<Vec<Vec<InlineSpan>>>,
    },
    Blank,
    Paragraph {
        spans: Vec<InlineSpan>,
    },
}

/// Parse a complete (possibly still-streaming) response into blocks.
///
/// Anything that fails its structural precondition falls back to a plain
/// paragraph; this function never fails.
pub fn parse_blocks(text: &str) -> Vec<Block> {
    let lines: Vec<&str> = text.split('\n').collect();
    let mut blocks = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];

        // Fenced code. An unterminated fence runs to end of input so that a
        // response cut off mid-stream still renders as code.
        if let Some(tag) = line.strip_prefix("```") {
            let language = tag.trim().to_string();
            let mut code_lines = Vec::new();
            i += 1;
            while i < lines.len() && !lines[i].starts_with("```") {
                code_lines.push(lines[i]);
                i += 1;
            }
            i += 1; // closing fence, or one past end of input
            blocks.push(Block::Code {
                language,
                code: code_lines.join("\n"),
            });
            continue;
        }

        if let Some((level, content)) = heading(line) {
            blocks.push(Block::Heading {
                level,
                spans: parse_inline(content),
            });
            i += 1;
            continue;
        }

        if is_rule(line) {
            blocks.push(Block::Rule);
            i += 1;
            continue;
        }

        if unordered_item(line).is_some() {
            let mut items = Vec::new();
            while let Some(item) = lines.get(i).copied().and_then(unordered_item) {
                items.push(parse_inline(item));
                i += 1;
            }
            blocks.push(Block::UnorderedList { items });
            continue;
        }

        if ordered_item(line).is_some() {
            let mut items = Vec::new();
            while let Some(item) = lines.get(i).copied().and_then(ordered_item) {
                items.push(parse_inline(item));
                i += 1;
            }
            blocks.push(Block::OrderedList { items });
            continue;
        }

        if line.starts_with("> ") {
            let mut quoted = Vec::new();
            while let Some(inner) = lines.get(i).and_then(|l| l.strip_prefix("> ")) {
                quoted.push(parse_inline(inner));
                i += 1;
            }
            blocks.push(Block::Blockquote { lines: quoted });
            continue;
        }

        // A pipe line only opens a table when the next line is a separator;
        // otherwise it is an ordinary paragraph.
        if line.contains('|') && lines.get(i + 1).copied().is_some_and(is_table_separator) {
            let headers = split_cells(line);
            i += 2; // header + separator
            let mut rows = Vec::new();
            while i < lines.len() && lines[i].contains('|') {
                rows.push(split_cells(lines[i]));
                i += 1;
            }
            blocks.push(Block::Table { headers, rows });
            continue;
        }

        if line.trim().is_empty() {
            blocks.push(Block::Blank);
            i += 1;
            continue;
        }

        blocks.push(Block::Paragraph {
            spans: parse_inline(line),
        });
        i += 1;
    }

    blocks
}

/// `#` through `####` followed by whitespace and text. Deeper nesting is
/// not a heading and falls through to paragraph handling.
fn heading(line: &str) -> Option<(u8, &str)> {
    let hashes = line.chars().take_while(|&c| c == '#').count();
    if !(1..=4).contains(&hashes) {
        return None;
    }
    let rest = &line[hashes..];
    let content = rest.trim_start();
    if content.is_empty() || content.len() == rest.len() {
        return None;
    }
    Some((hashes as u8, content))
}

fn is_rule(line: &str) -> bool {
    line.len() >= 3
        && (line.chars().all(|c| c == '-') || line.chars().all(|c| c == '*'))
}

fn unordered_item(line: &str) -> Option<&str> {
    let trimmed = line.trim_start();
    let mut chars = trimmed.chars();
    match (chars.next(), chars.next()) {
        (Some('-') | Some('*') | Some('+'), Some(' ' | '\t')) => Some(&trimmed[2..]),
        _ => None,
    }
}

fn ordered_item(line: &str) -> Option<&str> {
    let trimmed = line.trim_start();
    let digits = trimmed.chars().take_while(char::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let rest = trimmed[digits..].strip_prefix('.')?;
    match rest.chars().next() {
        Some(' ' | '\t') => Some(&rest[1..]),
        _ => None,
    }
}

/// Pipes, dashes and whitespace only (the `|---|---|` line under a header).
fn is_table_separator(line: &str) -> bool {
    !line.is_empty()
        && line
            .chars()
            .all(|c| c == '|' || c == '-' || c.is_whitespace())
}

fn split_cells(line: &str) -> Vec<Vec<InlineSpan>> {
    let mut cells: Vec<&str> = line.split('|').map(str::trim).collect();
    // Leading/trailing pipes produce empty boundary cells; drop them.
    if cells.first().is_some_and(|c| c.is_empty()) {
        cells.remove(0);
    }
    if cells.last().is_some_and(|c| c.is_empty()) {
        cells.pop();
    }
    cells.into_iter().map(parse_inline).collect()
}
