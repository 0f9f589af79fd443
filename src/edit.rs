//! Edit requests: the JSON wire shape for one batch.
//!
//! A batch is a JSON array of `{"op": ..., ...}` objects. Unknown ops and
//! missing fields fail at deserialization, before any tag is resolved
//! against file content. Tags are carried as raw `LINE#HASH` text and
//! parsed by the planner; a request never names a line by bare position.

use serde::Deserialize;

/// One edit in a batch. The operation set is closed; every consumer
/// matches exhaustively.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum EditRequest {
    /// Replace exactly the one tagged line.
    Set { tag: String, content: Vec<String> },

    /// Replace the inclusive, contiguous range `[first, last]`.
    Replace {
        first: String,
        last: String,
        content: Vec<String>,
    },

    /// Insert after the tagged line, or at end of file without an anchor.
    Append {
        #[serde(default)]
        after: Option<String>,
        content: Vec<String>,
    },

    /// Insert before the tagged line, or at start of file without an
    /// anchor.
    Prepend {
        #[serde(default)]
        before: Option<String>,
        content: Vec<String>,
    },

    /// Insert between two tagged lines. Placement follows `after`; the
    /// `before` anchor must also still be valid.
    Insert {
        after: String,
        before: String,
        content: Vec<String>,
    },
}
