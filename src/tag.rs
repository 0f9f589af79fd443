use std::fmt;
use thiserror::Error;
use xxhash_rust::xxh32::xxh32;

/// Line tags: `LINE#HASH` addressing tokens.
///
/// A tag names one line by its 1-based position and a short fingerprint of
/// its content. Edits carry tags instead of bare line numbers so that a
/// stale view of the file is detected instead of silently corrupting
/// content that has shifted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    /// 1-based line position in the snapshot the tag was taken from.
    pub index: usize,
    /// Two-hex-digit content fingerprint.
    pub fingerprint: String,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TagError {
    #[error("malformed tag '{text}': expected <line>#<hash>")]
    Malformed { text: String },

    #[error("line {index} does not exist (file has {len} lines)")]
    OutOfRange { index: usize, len: usize },

    #[error("line {index} changed since it was read: tag has hash {expected}, content now hashes to {actual}")]
    Stale {
        index: usize,
        expected: String,
        actual: String,
    },
}

/// Fingerprint of one line's content.
///
/// XXH32 (seed 0) of the content with all whitespace removed, reduced to a
/// single byte and rendered as two lowercase hex digits. Stripping
/// whitespace keeps a tag stable across pure re-indentation. The read view
/// renders tags with this same function, so a tag copied from a `read` is
/// always accepted back unchanged.
pub fn fingerprint(content: &str) -> String {
    let stripped: String = content.chars().filter(|c| !c.is_whitespace()).collect();
    format!("{:02x}", xxh32(stripped.as_bytes(), 0) % 256)
}

impl Tag {
    /// Build the currently-valid tag for a line.
    pub fn new(index: usize, content: &str) -> Self {
        Self {
            index,
            fingerprint: fingerprint(content),
        }
    }

    /// Parse tag text of the form `<digits>#<lowercase hex>`.
    ///
    /// The fingerprint alphabet is fixed by the engine; anything else in
    /// the hash position is malformed, as is a line number of 0.
    pub fn parse(text: &str) -> Result<Self, TagError> {
        let malformed = || TagError::Malformed {
            text: text.to_string(),
        };

        let (index_part, hash_part) = text.split_once('#').ok_or_else(malformed)?;

        if index_part.is_empty() || !index_part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }
        let index: usize = index_part.parse().map_err(|_| malformed())?;
        if index == 0 {
            return Err(malformed());
        }

        let hash_ok = !hash_part.is_empty()
            && hash_part
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        if !hash_ok {
            return Err(malformed());
        }

        Ok(Self {
            index,
            fingerprint: hash_part.to_string(),
        })
    }

    /// Check this tag against the current snapshot.
    pub fn validate(&self, snapshot: &[String]) -> Result<(), TagError> {
        if self.index == 0 || self.index > snapshot.len() {
            return Err(TagError::OutOfRange {
                index: self.index,
                len: snapshot.len(),
            });
        }
        let actual = fingerprint(&snapshot[self.index - 1]);
        if actual != self.fingerprint {
            return Err(TagError::Stale {
                index: self.index,
                expected: self.fingerprint.clone(),
                actual,
            });
        }
        Ok(())
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.index, self.fingerprint)
    }
}
