//! Diagnostics for lines the ini parser could not represent faithfully
//!
//! The parser is permissive: malformed lines are dropped, oversized tokens truncated and
//! unterminated blocks closed at end of input. None of that fails a parse. Diagnostics record
//! each such event so callers that want stricter behaviour (the CLI's `--strict`) can act on
//! them. Collecting diagnostics never changes the resulting tree.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// Line matched no construct and was dropped
    MalformedLine,
    /// A name, value or comment exceeded the byte cap and was cut
    TruncatedToken,
    /// A `key = {` block reached end of input without its `}`
    UnterminatedBlock,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::MalformedLine => write!(f, "malformed line dropped"),
            DiagnosticKind::TruncatedToken => write!(f, "token truncated"),
            DiagnosticKind::UnterminatedBlock => write!(f, "unterminated block"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// 1-based line number the event refers to
    pub line: usize,
    pub kind: DiagnosticKind,
    /// Original bytes of that line
    pub text: Vec<u8>,
}

impl Diagnostic {
    pub fn new(line: usize, kind: DiagnosticKind, text: impl Into<Vec<u8>>) -> Self {
        Self {
            line,
            kind,
            text: text.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "line {}: {}: \"{}\"",
            self.line,
            self.kind,
            self.text.escape_ascii()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let diagnostic = Diagnostic::new(3, DiagnosticKind::MalformedLine, "; note");
        assert_eq!(
            diagnostic.to_string(),
            "line 3: malformed line dropped: \"; note\""
        );
    }

    #[test]
    fn test_display_escapes_raw_bytes() {
        let diagnostic = Diagnostic::new(1, DiagnosticKind::TruncatedToken, &b"k = caf\xe9"[..]);
        assert_eq!(
            diagnostic.to_string(),
            "line 1: token truncated: \"k = caf\\xe9\""
        );
    }
}
