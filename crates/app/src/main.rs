//! Chorus command line front end.
//!
//! `classify` and `render` expose the two core functions directly; `demo`
//! drives a full streamed turn against an offline canned backend so the
//! whole pipeline can be watched without provider credentials.

use anyhow::Result;
use async_trait::async_trait;
use chat_host::{ChatBackend, ChatHost, TurnEvent};
use markdown::{extract_html_document, parse_blocks, Block, InlineSpan};
use shared::agent_api::{ChatMessage, StreamChunk};
use std::io::Read;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{unbounded_channel, UnboundedSender};

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.split_first() {
        Some((cmd, rest)) if cmd == "classify" && !rest.is_empty() => {
            cmd_classify(&rest.join(" "));
            Ok(())
        }
        Some((cmd, rest)) if cmd == "render" => cmd_render(rest.first().map(String::as_str)),
        Some((cmd, rest)) if cmd == "demo" && !rest.is_empty() => cmd_demo(&rest.join(" ")),
        _ => {
            eprintln!("usage: chorus classify <prompt>");
            eprintln!("       chorus render [file]    (reads stdin when no file is given)");
            eprintln!("       chorus demo <prompt>");
            std::process::exit(2)
        }
    }
}

fn cmd_classify(prompt: &str) {
    let result = classifier::classify(prompt, false);
    println!("category: {}", result.category.display_name());
    println!("model:    {}", result.model);
    println!("badge:    {}", result.badge);
}

fn cmd_render(path: Option<&str>) -> Result<()> {
    let text = match path {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    for block in parse_blocks(&text) {
        println!("{}", describe_block(&block));
    }
    if let Some(html) = extract_html_document(&text) {
        println!();
        println!("[preview-ready html document, {} bytes]", html.len());
    }
    Ok(())
}

fn cmd_demo(prompt: &str) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(run_demo(prompt))
}

async fn run_demo(prompt: &str) -> Result<()> {
    let host = ChatHost::new(Arc::new(CannedBackend));
    let (tx, mut rx) = unbounded_channel();

    let printer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            match event {
                TurnEvent::Classified(c) => {
                    println!("[{} -> {}]", c.category.display_name(), c.model);
                }
                TurnEvent::Rendered(blocks) => {
                    println!("render pass: {} blocks", blocks.len());
                }
                TurnEvent::ImageGenerated { url } => println!("image: {url}"),
            }
        }
    });

    let outcome = host.run_turn(&[], prompt, false, tx).await?;
    printer.await?;

    println!();
    println!("--- final response ---");
    println!("{}", outcome.text);
    if let Some(html) = outcome.html_preview {
        println!();
        println!("[preview-ready html document, {} bytes]", html.len());
    }
    Ok(())
}

fn flatten(spans: &[InlineSpan]) -> String {
    spans
        .iter()
        .map(|span| match span {
            InlineSpan::Text(t) => t.clone(),
            InlineSpan::Bold(t) => format!("**{t}**"),
            InlineSpan::Italic(t) => format!("*{t}*"),
            InlineSpan::Code(t) => format!("`{t}`"),
            InlineSpan::Link { label, url } => format!("[{label}]({url})"),
        })
        .collect()
}

fn describe_block(block: &Block) -> String {
    match block {
        Block::Code { language, code } => {
            let tag = if language.is_empty() { "text" } else { language };
            format!("code[{tag}] ({} lines)", code.lines().count())
        }
        Block::Heading { level, spans } => format!("h{level} {}", flatten(spans)),
        Block::Rule => "rule".to_string(),
        Block::UnorderedList { items } => {
            let items: Vec<String> = items.iter().map(|i| flatten(i)).collect();
            format!("ul: {}", items.join(" | "))
        }
        Block::OrderedList { items } => {
            let items: Vec<String> = items.iter().map(|i| flatten(i)).collect();
            format!("ol: {}", items.join(" | "))
        }
        Block::Blockquote { lines } => format!("quote ({} lines)", lines.len()),
        Block::Table { headers, rows } => {
            format!("table {}x{}", headers.len(), rows.len())
        }
        Block::Blank => "blank".to_string(),
        Block::Paragraph { spans } => format!("p {}", flatten(spans)),
    }
}

/// Offline stand-in for a provider: streams a canned markdown response in
/// small fragments with a short delay between them.
struct CannedBackend;

#[async_trait]
impl ChatBackend for CannedBackend {
    async fn stream_chat(
        &self,
        messages: Vec<ChatMessage>,
        _model: &str,
        tx: UnboundedSender<StreamChunk>,
    ) -> Result<()> {
        let prompt = messages.last().map(|m| m.content.clone()).unwrap_or_default();
        let response = canned_response(&prompt);
        for fragment in fragments_of(&response) {
            let _ = tx.send(StreamChunk::Text(fragment.to_string()));
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        let _ = tx.send(StreamChunk::Done {
            stop_reason: Some("end".to_string()),
        });
        Ok(())
    }

    async fn generate_image(&self, prompt: &str) -> Result<String> {
        Ok(format!("file:///tmp/chorus-demo-{}.png", prompt.len()))
    }
}

fn canned_response(prompt: &str) -> String {
    format!(
        "Here's a quick take on \"{prompt}\".\n\n\
         # Overview\n\n\
         - markdown renders incrementally as fragments arrive\n\
         - tables and code blocks are parsed per pass\n\n\
         | Piece | Status |\n\
         |-------|--------|\n\
         | classifier | ready |\n\
         | renderer | ready |\n\n\
         ```html\n\
         <!DOCTYPE html>\n\
         <html><body><h1>Demo</h1></body></html>\n\
         ```\n\n\
         **What to do next?**\n\
         - try `chorus render` on your own markdown\n\
         - ask to build an app to see the preview path\n"
    )
}

/// Split a response into ~24-byte fragments on char boundaries.
fn fragments_of(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        let mut cut = rest.len().min(24);
        while !rest.is_char_boundary(cut) {
            cut += 1;
        }
        let (head, tail) = rest.split_at(cut);
        out.push(head);
        rest = tail;
    }
    out
}
