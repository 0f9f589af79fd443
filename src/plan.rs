//! Edit planning: resolve a batch of requests against a line snapshot.
//!
//! Every tag in the batch is parsed and validated against the same,
//! unmutated snapshot, so validation results are independent of request
//! order. The first failure (in batch order) rejects the whole batch;
//! nothing is ever partially resolved.

use thiserror::Error;

use crate::edit::EditRequest;
use crate::tag::{Tag, TagError};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A tag failed to parse or no longer matches the file.
    #[error("edit #{edit}: {source}")]
    Edit {
        edit: usize,
        #[source]
        source: TagError,
    },

    #[error("edit #{edit}: first line {first} is after last line {last}")]
    InvalidRange {
        edit: usize,
        first: usize,
        last: usize,
    },
}

impl ValidationError {
    /// The snapshot line the failure points at, when there is one.
    pub fn line(&self) -> Option<usize> {
        match self {
            ValidationError::Edit {
                source: TagError::Stale { index, .. },
                ..
            } => Some(*index),
            _ => None,
        }
    }
}

/// The resolved, position-addressed effect of one edit request.
///
/// `lo > hi` encodes a zero-width insertion: nothing is replaced and the
/// new lines land immediately after original line `insert_after`, where 0
/// means the start of the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationSpan {
    pub lo: usize,
    pub hi: usize,
    pub insert_after: usize,
    pub new_lines: Vec<String>,
    /// Batch position of the originating request.
    pub edit: usize,
}

impl MutationSpan {
    fn replacement(lo: usize, hi: usize, new_lines: Vec<String>, edit: usize) -> Self {
        Self {
            lo,
            hi,
            insert_after: lo - 1,
            new_lines,
            edit,
        }
    }

    fn insertion(after: usize, new_lines: Vec<String>, edit: usize) -> Self {
        Self {
            lo: after + 1,
            hi: after,
            insert_after: after,
            new_lines,
            edit,
        }
    }

    pub fn is_insertion(&self) -> bool {
        self.lo > self.hi
    }

    /// The snapshot lines this span replaces (empty for insertions).
    pub fn replaced<'a>(&self, snapshot: &'a [String]) -> &'a [String] {
        if self.is_insertion() {
            &[]
        } else {
            &snapshot[self.lo - 1..self.hi]
        }
    }
}

/// Resolve every request into a mutation span, or fail with the first
/// validation error.
pub fn plan(
    snapshot: &[String],
    edits: &[EditRequest],
) -> Result<Vec<MutationSpan>, ValidationError> {
    let mut spans = Vec::with_capacity(edits.len());
    for (i, edit) in edits.iter().enumerate() {
        spans.push(resolve(snapshot, i, edit)?);
    }
    Ok(spans)
}

fn resolve(
    snapshot: &[String],
    edit: usize,
    request: &EditRequest,
) -> Result<MutationSpan, ValidationError> {
    match request {
        EditRequest::Set { tag, content } => {
            let tag = checked(snapshot, edit, tag)?;
            Ok(MutationSpan::replacement(
                tag.index,
                tag.index,
                content.clone(),
                edit,
            ))
        }

        EditRequest::Replace {
            first,
            last,
            content,
        } => {
            let first = checked(snapshot, edit, first)?;
            let last = checked(snapshot, edit, last)?;
            if first.index > last.index {
                return Err(ValidationError::InvalidRange {
                    edit,
                    first: first.index,
                    last: last.index,
                });
            }
            Ok(MutationSpan::replacement(
                first.index,
                last.index,
                content.clone(),
                edit,
            ))
        }

        EditRequest::Append { after, content } => {
            let point = match after {
                Some(text) => checked(snapshot, edit, text)?.index,
                None => snapshot.len(),
            };
            Ok(MutationSpan::insertion(point, content.clone(), edit))
        }

        EditRequest::Prepend { before, content } => {
            let point = match before {
                Some(text) => checked(snapshot, edit, text)?.index - 1,
                None => 0,
            };
            Ok(MutationSpan::insertion(point, content.clone(), edit))
        }

        EditRequest::Insert {
            after,
            before,
            content,
        } => {
            let after = checked(snapshot, edit, after)?;
            // The before anchor pins intent: it must still be valid even
            // though placement only needs the after line.
            checked(snapshot, edit, before)?;
            Ok(MutationSpan::insertion(after.index, content.clone(), edit))
        }
    }
}

fn checked(snapshot: &[String], edit: usize, text: &str) -> Result<Tag, ValidationError> {
    let wrap = |source| ValidationError::Edit { edit, source };
    let tag = Tag::parse(text).map_err(wrap)?;
    tag.validate(snapshot).map_err(wrap)?;
    Ok(tag)
}
