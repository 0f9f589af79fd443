//! Linepatch: line-addressable batch file editing with staleness detection
//!
//! A batch editing engine for callers whose view of a file may be stale,
//! such as AI coding agents. Every edit addresses its target line(s) with
//! a `LINE#HASH` tag combining a 1-based position and a short content
//! fingerprint; the engine refuses to mutate anything unless every
//! fingerprint in the batch still matches the current file content.
//!
//! # Architecture
//!
//! All operations compile down to [`MutationSpan`]s: position-addressed
//! replacements and insertions resolved against one immutable snapshot of
//! the file. Validation happens entirely before composition, so a batch
//! either applies as a whole or rejects as a whole.
//!
//! # Safety
//!
//! - Every tag is re-hashed against the live content before any mutation
//! - Overlapping or mutually incompatible edits reject the whole batch
//! - BOM and line-terminator style survive the decode/encode round trip
//! - File writes are atomic (tempfile + fsync + rename) and happen only
//!   after the whole batch succeeded
//!
//! # Example
//!
//! ```
//! use linepatch::{apply, fingerprint, EditRequest};
//!
//! let file = b"fn main() {\n    println!(\"hi\");\n}\n";
//! let tag = format!("2#{}", fingerprint("    println!(\"hi\");"));
//!
//! let edits = vec![EditRequest::Set {
//!     tag,
//!     content: vec!["    println!(\"hello\");".to_string()],
//! }];
//!
//! let outcome = apply(file, &edits).unwrap();
//! assert_eq!(outcome.first_changed_line, Some(2));
//! ```

pub mod apply;
pub mod compose;
pub mod document;
pub mod edit;
pub mod file;
pub mod plan;
pub mod tag;
pub mod view;

// Re-exports
pub use apply::{apply, ApplyError, BatchOutcome};
pub use compose::{compose, ConflictError};
pub use document::{Document, LineEnding};
pub use edit::EditRequest;
pub use file::{apply_to_file, atomic_write, FileError, FileOutcome};
pub use plan::{plan, MutationSpan, ValidationError};
pub use tag::{fingerprint, Tag, TagError};
pub use view::{render_lines, render_mismatch_context, render_window};
