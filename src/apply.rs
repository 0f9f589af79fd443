//! Batch application: the all-or-nothing entry point.
//!
//! `apply` runs decode -> plan -> compose -> encode over in-memory bytes.
//! Any failure short-circuits before composition, so a rejected batch
//! observes and produces nothing. The function is pure computation: no
//! I/O, no retained state, safe to call concurrently for different files.

use thiserror::Error;

use crate::compose::{compose, ConflictError};
use crate::document::Document;
use crate::edit::EditRequest;
use crate::plan::{plan, ValidationError};

#[derive(Error, Debug)]
pub enum ApplyError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("conflicting edits: {0}")]
    Conflict(#[from] ConflictError),
}

/// Result of one successful batch application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOutcome {
    /// Re-encoded file bytes, BOM and terminator style preserved.
    pub bytes: Vec<u8>,
    /// Final canonical lines.
    pub lines: Vec<String>,
    /// Batch indices of edits whose content matched exactly what they
    /// replaced. Such edits still validate and apply; they just change
    /// nothing.
    pub noop_edits: Vec<usize>,
    /// Lowest original line position where the output diverges from the
    /// snapshot, or `None` when the batch changed nothing.
    pub first_changed_line: Option<usize>,
}

/// Apply a batch of edits to raw file bytes.
///
/// All-or-nothing: every tag in the batch must validate against the
/// current content and no two edits may interfere, otherwise the whole
/// batch is rejected and the input is conceptually untouched.
pub fn apply(raw: &[u8], edits: &[EditRequest]) -> Result<BatchOutcome, ApplyError> {
    let mut doc = Document::decode(raw);
    let spans = plan(&doc.lines, edits)?;
    let final_lines = compose(&doc.lines, &spans)?;

    let noop_edits: Vec<usize> = spans
        .iter()
        .filter(|span| span.new_lines.as_slice() == span.replaced(&doc.lines))
        .map(|span| span.edit)
        .collect();

    let first_changed_line = first_divergence(&doc.lines, &final_lines);

    doc.lines = final_lines;
    let bytes = doc.encode();
    Ok(BatchOutcome {
        bytes,
        lines: doc.lines,
        noop_edits,
        first_changed_line,
    })
}

fn first_divergence(snapshot: &[String], finals: &[String]) -> Option<usize> {
    let common = snapshot.len().min(finals.len());
    for i in 0..common {
        if snapshot[i] != finals[i] {
            return Some(i + 1);
        }
    }
    if snapshot.len() != finals.len() {
        Some(common + 1)
    } else {
        None
    }
}
