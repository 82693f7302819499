//! Markdown code block extraction.
//!
//! Parses a CommonMark document with comrak and returns every fenced code
//! block in document order. Indented code blocks carry no info string and
//! are ignored.
//!
//! # Info String
//!
//! The info string after the opening fence holds the language and an
//! optional command:
//!
//! ````text
//! ```go gofmt
//! package main
//! ```
//! ````
//!
//! The info string is taken verbatim from the document. CommonMark would
//! resolve backslash escapes and entity references in it (`\.` to `.`,
//! `&amp;` to `&`), which would change what the command means.

use comrak::nodes::NodeValue;
use comrak::{Arena, Options, parse_document};
use serde::Serialize;

#[cfg(test)]
mod tests;

/// A fenced code block extracted from a Markdown document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CodeBlock {
    /// Language identifier (e.g., "go", "python"); empty when absent.
    pub language: String,
    /// Command template from the info string; empty when absent.
    pub command: String,
    /// Literal content of the block, including its trailing newline.
    pub content: String,
}

impl CodeBlock {
    pub fn new(
        language: impl Into<String>,
        command: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            language: language.into(),
            command: command.into(),
            content: content.into(),
        }
    }
}

/// Extract all fenced code blocks from `source`, in document order.
pub fn parse(source: &str) -> Vec<CodeBlock> {
    let arena = Arena::new();
    let options = Options::default();
    let root = parse_document(&arena, source, &options);

    root.descendants()
        .filter_map(|node| {
            let data = node.data.borrow();
            match &data.value {
                NodeValue::CodeBlock(code_block) if code_block.fenced => {
                    let fence = (code_block.fence_char as char)
                        .to_string()
                        .repeat(code_block.fence_length);
                    let info = raw_info(
                        source,
                        data.sourcepos.start.line,
                        data.sourcepos.start.column,
                        &fence,
                    )
                    .unwrap_or(&code_block.info);
                    let (language, command) = parse_info_string(info);
                    Some(CodeBlock {
                        language,
                        command,
                        content: code_block.literal.clone(),
                    })
                }
                _ => None,
            }
        })
        .collect()
}

/// The text following the opening `fence` on the 1-based `line`, searching
/// from the block's 1-based `column` so container markers are skipped.
fn raw_info<'a>(source: &'a str, line: usize, column: usize, fence: &str) -> Option<&'a str> {
    let text = source.lines().nth(line.checked_sub(1)?)?;
    let from = text.get(column.saturating_sub(1)..).unwrap_or(text);
    let at = from.find(fence)?;
    Some(&from[at + fence.len()..])
}

/// Split a fence info string into (language, command).
///
/// The language is everything before the first space; the command is the
/// trimmed remainder.
///
/// ```
/// use runblock::parser::parse_info_string;
///
/// let (lang, cmd) = parse_info_string("go /usr/bin/gofmt {{content}}");
/// assert_eq!(lang, "go");
/// assert_eq!(cmd, "/usr/bin/gofmt {{content}}");
/// ```
pub fn parse_info_string(info: &str) -> (String, String) {
    let info = info.trim();
    match info.split_once(' ') {
        Some((language, command)) => (language.to_string(), command.trim().to_string()),
        None => (info.to_string(), String::new()),
    }
}
