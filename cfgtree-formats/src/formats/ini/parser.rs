//! Ini parser
//!
//! Line oriented recursive descent. The top level loop splits the input into sections at
//! `[name]` headers; each section body, and each `key = {` block inside it, is consumed by
//! the body parser, which calls itself for nested blocks.
//!
//! The parser works on bytes. Only ASCII bytes carry syntax, so anything else (UTF-8 or
//! not) passes through into names, values and comments unchanged.
//!
//! Line Classification
//!
//! Every line is classified by its first byte after leading whitespace:
//!
//! | first byte      | top level  | section body      | block body        |
//! |-----------------|------------|-------------------|-------------------|
//! | none            | Blank      | Blank             | Blank             |
//! | comment marker  | Comment    | Comment           | Comment           |
//! | `[`             | Section    | ends the body     | entry             |
//! | `}`             | dropped    | entry             | ends the block    |
//! | anything else   | dropped    | entry             | entry             |
//!
//! An entry is `key = value` or `key = {`. Lines that look like neither are dropped, and
//! so are entries whose key starts with `.` (a block dropped this way takes its body with
//! it). Comments at top level and in section bodies keep their text from the marker on;
//! inside blocks the whole line is kept so that indentation survives a round trip.
//!
//! Cursor
//!
//! The parser never holds a global position. Each body call takes the index of its first
//! line and returns the index of the first line it did not consume: the next header for a
//! section body, the line after `}` for a block, or the end of input.

use super::diagnostics::{Diagnostic, DiagnosticKind};
use super::options::IniOptions;
use cfgtree_core::{Node, RawLine};
use tracing::{debug, trace};

/// Whitespace as the ini dialect understands it (ASCII, including vertical tab).
fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | 0x0b | 0x0c | b'\r')
}

fn skip_space(text: &[u8]) -> &[u8] {
    let start = text.iter().position(|&b| !is_space(b)).unwrap_or(text.len());
    &text[start..]
}

fn trim_end_by(text: &[u8], strip: impl Fn(u8) -> bool) -> &[u8] {
    let end = text.iter().rposition(|&b| !strip(b)).map_or(0, |i| i + 1);
    &text[..end]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Body {
    Section,
    /// `opener` indexes the `key = {` line.
    Block { opener: usize },
}

pub struct IniParser<'a> {
    lines: &'a [RawLine],
    options: &'a IniOptions,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> IniParser<'a> {
    pub fn new(lines: &'a [RawLine], options: &'a IniOptions) -> Self {
        Self {
            lines,
            options,
            diagnostics: Vec::new(),
        }
    }

    /// Build the tree for the whole input.
    ///
    /// Returns the synthetic root and everything the parser silently repaired or dropped.
    pub fn parse(mut self) -> (Node, Vec<Diagnostic>) {
        let lines = self.lines;
        let mut top = Vec::new();
        let mut cursor = 0;

        while let Some(line) = lines.get(cursor) {
            let rest = skip_space(&line.text);
            match rest.first().copied() {
                None => {
                    top.push(Node::blank(""));
                    cursor += 1;
                }
                Some(b) if self.options.is_comment_marker(b) => {
                    top.push(Node::comment(self.cap(line, rest)));
                    cursor += 1;
                }
                Some(b'[') => {
                    let name = self.section_name(line, &rest[1..]);
                    trace!(line = line.number, section = %name.escape_ascii(), "section");
                    let mut children = Vec::new();
                    cursor = self.parse_body(cursor + 1, &mut children, Body::Section);
                    top.push(Node::section(name, children));
                }
                Some(_) => {
                    self.drop_line(line);
                    cursor += 1;
                }
            }
        }

        (Node::root(top), self.diagnostics)
    }

    /// Name between `[` and `]`; a missing `]` takes the rest of the line.
    fn section_name(&mut self, line: &RawLine, after_bracket: &'a [u8]) -> &'a [u8] {
        let name = skip_space(after_bracket);
        let name = match name.iter().position(|&b| b == b']') {
            Some(end) => &name[..end],
            None => name,
        };
        self.cap(line, name)
    }

    /// Consume one section body or block starting at `cursor`, appending to `children`.
    fn parse_body(&mut self, mut cursor: usize, children: &mut Vec<Node>, body: Body) -> usize {
        let lines = self.lines;

        while let Some(line) = lines.get(cursor) {
            let rest = skip_space(&line.text);
            match (rest.first().copied(), body) {
                (Some(b'['), Body::Section) => return cursor,
                (Some(b'}'), Body::Block { .. }) => return cursor + 1,
                (None, _) => children.push(Node::blank("")),
                (Some(b), _) if self.options.is_comment_marker(b) => {
                    let text = match body {
                        Body::Section => rest,
                        Body::Block { .. } => line.text.as_slice(),
                    };
                    children.push(Node::comment(self.cap(line, text)));
                }
                (Some(_), _) => {
                    cursor = self.parse_entry(cursor, rest, children);
                    continue;
                }
            }
            cursor += 1;
        }

        if let Body::Block { opener } = body {
            let line = &lines[opener];
            debug!(line = line.number, "block not closed before end of input");
            self.diagnostics.push(Diagnostic::new(
                line.number,
                DiagnosticKind::UnterminatedBlock,
                line.text.clone(),
            ));
        }
        cursor
    }

    /// Parse `key = value` or `key = {` on the line at `cursor`.
    ///
    /// `rest` is the line without leading whitespace. Returns the next unconsumed line.
    fn parse_entry(&mut self, cursor: usize, rest: &'a [u8], children: &mut Vec<Node>) -> usize {
        let lines = self.lines;
        let line = &lines[cursor];

        // Keys may contain plain spaces but stop at any other whitespace.
        let key_end = rest
            .iter()
            .position(|&b| b == b'=' || (is_space(b) && b != b' '))
            .unwrap_or(rest.len());
        let Some(after_eq) = skip_space(&rest[key_end..]).strip_prefix(b"=") else {
            self.drop_line(line);
            return cursor + 1;
        };
        let value = skip_space(after_eq);
        let opens_block = value.first() == Some(&b'{');

        // `.comment` and `.empty` name placeholders; no key may take a dotted name.
        if rest.first() == Some(&b'.') {
            self.drop_line(line);
            if !opens_block {
                return cursor + 1;
            }
            let mut discarded = Vec::new();
            return self.parse_body(cursor + 1, &mut discarded, Body::Block { opener: cursor });
        }

        let key = trim_end_by(self.cap(line, &rest[..key_end]), |b| b == b' ');
        if opens_block {
            trace!(line = line.number, block = %key.escape_ascii(), "block");
            let mut block = Vec::new();
            let next = self.parse_body(cursor + 1, &mut block, Body::Block { opener: cursor });
            children.push(Node::block(key, block));
            next
        } else {
            let value = trim_end_by(self.cap(line, value), is_space);
            children.push(Node::key_value(key, value));
            cursor + 1
        }
    }

    /// Apply the byte cap, recording a diagnostic when something was cut.
    fn cap(&mut self, line: &RawLine, token: &'a [u8]) -> &'a [u8] {
        let max = self.options.max_token_len();
        if token.len() <= max {
            return token;
        }
        debug!(line = line.number, len = token.len(), max, "truncating token");
        self.diagnostics.push(Diagnostic::new(
            line.number,
            DiagnosticKind::TruncatedToken,
            line.text.clone(),
        ));
        &token[..max]
    }

    fn drop_line(&mut self, line: &RawLine) {
        debug!(line = line.number, text = %line.text.escape_ascii(), "dropping malformed line");
        self.diagnostics.push(Diagnostic::new(
            line.number,
            DiagnosticKind::MalformedLine,
            line.text.clone(),
        ));
    }
}
