//! File normalization: BOM and line-terminator handling.
//!
//! The engine works on a canonical line model. [`Document::decode`] splits
//! raw bytes into terminator-free lines and records what it stripped;
//! [`Document::encode`] reassembles bytes so that an untouched document
//! round-trips exactly.

const BOM: &[u8] = b"\xef\xbb\xbf";

/// Line terminator style, detected once per file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
    Lf,
    Crlf,
}

impl LineEnding {
    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::Crlf => "\r\n",
        }
    }
}

/// A decoded file: canonical lines plus everything needed to rebuild the
/// original byte layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// A UTF-8 BOM was present and will be re-emitted on encode.
    pub bom: bool,
    pub terminator: LineEnding,
    /// Line content, terminators excluded. A trailing terminator is not a
    /// line; it is tracked separately.
    pub lines: Vec<String>,
    pub trailing_newline: bool,
}

impl Document {
    /// Decode raw bytes into the canonical line model. Never fails:
    /// invalid UTF-8 decodes lossily.
    ///
    /// Terminator style is detected once for the whole file: CRLF if any
    /// `\r\n` occurs, LF otherwise. Mixed-terminator files are
    /// canonicalized to the detected style on encode.
    pub fn decode(raw: &[u8]) -> Self {
        let (bom, body) = match raw.strip_prefix(BOM) {
            Some(rest) => (true, rest),
            None => (false, raw),
        };
        let text = String::from_utf8_lossy(body);
        let terminator = if text.contains("\r\n") {
            LineEnding::Crlf
        } else {
            LineEnding::Lf
        };

        if text.is_empty() {
            return Self {
                bom,
                terminator,
                lines: Vec::new(),
                trailing_newline: false,
            };
        }

        let (body_text, trailing_newline) = match text.strip_suffix('\n') {
            Some(rest) => (rest.strip_suffix('\r').unwrap_or(rest), true),
            None => (text.as_ref(), false),
        };

        let lines = body_text
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
            .collect();

        Self {
            bom,
            terminator,
            lines,
            trailing_newline,
        }
    }

    /// Reassemble raw bytes: BOM (if remembered), lines joined with the
    /// detected terminator, trailing terminator if one was present.
    pub fn encode(&self) -> Vec<u8> {
        let term = self.terminator.as_str();
        let mut out = Vec::new();
        if self.bom {
            out.extend_from_slice(BOM);
        }
        out.extend_from_slice(self.lines.join(term).as_bytes());
        if self.trailing_newline && !self.lines.is_empty() {
            out.extend_from_slice(term.as_bytes());
        }
        out
    }
}
