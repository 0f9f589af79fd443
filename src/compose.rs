//! Span composition: conflict detection and final line production.
//!
//! Spans arrive validated and position-addressed; no fingerprint is
//! re-checked here. Detection sorts replacements once and answers every
//! insertion-point query by binary search, so the whole pass is
//! O(n log n) in the number of edits, independent of file size.

use std::collections::HashMap;

use thiserror::Error;

use crate::plan::MutationSpan;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConflictError {
    #[error("edits #{a} and #{b} both replace line {line}")]
    OverlappingRanges { a: usize, b: usize, line: usize },

    #[error("edit #{insert} inserts inside lines {lo}-{hi}, which edit #{replace} replaces")]
    InsertionInsideRange {
        insert: usize,
        replace: usize,
        lo: usize,
        hi: usize,
    },
}

/// Merge validated spans into the final line sequence, or reject the
/// batch if any two spans interfere.
pub fn compose(
    snapshot: &[String],
    spans: &[MutationSpan],
) -> Result<Vec<String>, ConflictError> {
    let mut replacements: Vec<&MutationSpan> =
        spans.iter().filter(|s| !s.is_insertion()).collect();
    // Batch order is preserved within this list, which is what makes
    // same-point insertions come out in request order below.
    let insertions: Vec<&MutationSpan> = spans.iter().filter(|s| s.is_insertion()).collect();

    replacements.sort_by_key(|s| s.lo);

    for pair in replacements.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if b.lo <= a.hi {
            return Err(ConflictError::OverlappingRanges {
                a: a.edit,
                b: b.edit,
                line: b.lo,
            });
        }
    }

    // An insertion after line p falls strictly inside a replacement
    // [lo, hi] iff lo <= p < hi. Both boundaries are legal insertion
    // points, so appending after line 5 coexists with replacing 6-8.
    for ins in &insertions {
        let p = ins.insert_after;
        let idx = replacements.partition_point(|s| s.lo <= p);
        if idx > 0 {
            let covering = replacements[idx - 1];
            if p < covering.hi {
                return Err(ConflictError::InsertionInsideRange {
                    insert: ins.edit,
                    replace: covering.edit,
                    lo: covering.lo,
                    hi: covering.hi,
                });
            }
        }
    }

    let mut at_point: HashMap<usize, Vec<&MutationSpan>> = HashMap::new();
    for ins in &insertions {
        at_point.entry(ins.insert_after).or_default().push(*ins);
    }
    let mut starting_at: HashMap<usize, &MutationSpan> = HashMap::new();
    for repl in &replacements {
        starting_at.insert(repl.lo, *repl);
    }

    let emit_insertions = |out: &mut Vec<String>, point: usize| {
        if let Some(group) = at_point.get(&point) {
            for span in group {
                out.extend(span.new_lines.iter().cloned());
            }
        }
    };

    // Single walk of the snapshot: copy uncovered lines, emit each
    // replacement once at its start, splice insertions after their line.
    let mut out = Vec::with_capacity(snapshot.len());
    emit_insertions(&mut out, 0);
    let mut i = 1;
    while i <= snapshot.len() {
        if let Some(span) = starting_at.get(&i) {
            out.extend(span.new_lines.iter().cloned());
            i = span.hi;
        } else {
            out.push(snapshot[i - 1].clone());
        }
        emit_insertions(&mut out, i);
        i += 1;
    }

    Ok(out)
}
