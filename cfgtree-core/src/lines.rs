//! Raw line source
//!
//! Turns an input stream into the ordered list of original lines that line-oriented parsers
//! walk with a cursor. The whole input is read up front. Lines are kept as bytes so input that
//! is not UTF-8 survives untouched.

use std::io::{self, Read};

/// One line of input, without its line terminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLine {
    /// 1-based position in the input.
    pub number: usize,
    pub text: Vec<u8>,
}

impl RawLine {
    pub fn new(number: usize, text: impl Into<Vec<u8>>) -> Self {
        Self {
            number,
            text: text.into(),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.text
    }
}

/// Read every line from `reader`.
pub fn read_lines<R: Read>(mut reader: R) -> io::Result<Vec<RawLine>> {
    let mut buffer = Vec::new();
    reader.read_to_end(&mut buffer)?;
    Ok(lines_from_bytes(&buffer))
}

/// Split input into lines. `\n` and `\r\n` both terminate a line; a final terminator does
/// not start an extra empty line.
pub fn lines_from_bytes(source: &[u8]) -> Vec<RawLine> {
    let mut lines = Vec::new();
    let mut rest = source;
    while !rest.is_empty() {
        let (line, next) = match rest.iter().position(|&b| b == b'\n') {
            Some(end) => {
                let line = &rest[..end];
                (line.strip_suffix(b"\r").unwrap_or(line), &rest[end + 1..])
            }
            None => (rest, &rest[rest.len()..]),
        };
        lines.push(RawLine::new(lines.len() + 1, line));
        rest = next;
    }
    lines
}

pub fn lines_from_str(source: &str) -> Vec<RawLine> {
    lines_from_bytes(source.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(lines: &[RawLine]) -> Vec<&[u8]> {
        lines.iter().map(RawLine::as_bytes).collect()
    }

    #[test]
    fn test_empty_input() {
        assert!(lines_from_str("").is_empty());
    }

    #[test]
    fn test_trailing_newline_is_not_a_line() {
        assert_eq!(texts(&lines_from_str("a\nb\n")), vec![b"a", b"b"]);
        assert_eq!(texts(&lines_from_str("a\nb")), vec![b"a", b"b"]);
    }

    #[test]
    fn test_blank_lines_are_kept() {
        assert_eq!(
            texts(&lines_from_str("a\n\n\nb\n")),
            vec![&b"a"[..], b"", b"", b"b"]
        );
    }

    #[test]
    fn test_crlf_terminators() {
        assert_eq!(texts(&lines_from_str("a\r\nb\r\n")), vec![b"a", b"b"]);
        assert_eq!(texts(&lines_from_str("a\rb\n")), vec![&b"a\rb"[..]]);
    }

    #[test]
    fn test_line_numbers() {
        let lines = lines_from_str("x\ny\n");
        assert_eq!(lines[0].number, 1);
        assert_eq!(lines[1].number, 2);
    }

    #[test]
    fn test_read_lines_keeps_invalid_utf8() {
        let input: &[u8] = b"ok\n\xffbad\n# caf\xe9\n";
        let lines = read_lines(input).unwrap();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1].text, b"\xffbad");
        assert_eq!(lines[2].text, b"# caf\xe9");
    }
}
