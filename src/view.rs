//! Tagged line rendering: the read side of the tag protocol.
//!
//! Every line is shown as `LINE#HASH|content`. The tags printed here are
//! the only ones the engine will later accept, so rendering shares the
//! fingerprint function with the codec.

use crate::document::Document;
use crate::tag::Tag;

/// Context lines shown on either side of a mismatch.
const CONTEXT_LINES: usize = 2;

/// Render lines as `LINE#HASH|content`, numbering from `start`.
pub fn render_lines(lines: &[String], start: usize) -> String {
    lines
        .iter()
        .enumerate()
        .map(|(i, line)| format!("{}|{}", Tag::new(start + i, line), line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render a window of the document for display. A window starting past
/// the end of the file is empty, not an error.
pub fn render_window(doc: &Document, start_line: usize, max_lines: Option<usize>) -> String {
    let start = start_line.max(1);
    if start > doc.lines.len() {
        return String::new();
    }
    let end = match max_lines {
        Some(n) => (start - 1 + n).min(doc.lines.len()),
        None => doc.lines.len(),
    };
    render_lines(&doc.lines[start - 1..end], start)
}

/// Render a context window around a mismatched line, marking it with
/// `>>>` and showing the tag that is currently correct, so a caller can
/// retry without a separate read.
pub fn render_mismatch_context(lines: &[String], index: usize) -> String {
    if index == 0 || index > lines.len() {
        return String::new();
    }
    let lo = index.saturating_sub(CONTEXT_LINES).max(1);
    let hi = (index + CONTEXT_LINES).min(lines.len());
    let mut out = Vec::with_capacity(hi - lo + 1);
    for i in lo..=hi {
        let rendered = format!("{}|{}", Tag::new(i, &lines[i - 1]), &lines[i - 1]);
        if i == index {
            out.push(format!(">>> {rendered}"));
        } else {
            out.push(format!("    {rendered}"));
        }
    }
    out.join("\n")
}
