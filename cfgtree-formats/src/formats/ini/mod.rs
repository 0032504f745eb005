//! Ini format implementation
//!
//! INI dialect with nested blocks:
//!
//! ```text
//! # comment
//! [server]
//!         host = example.org
//!         tls = {
//!                 cert = /etc/cert.pem
//!         }
//! ```
//!
//! Sections are `[name]` headers. Inside a section an entry is either `key = value` or
//! `key = {` opening a block closed by a line holding `}`. Blocks nest to any depth.
//! Comment lines start, after optional whitespace, with one of the configured marker
//! bytes (`#` by default, see [`options`]).
//!
//! Comments and blank lines become placeholder nodes holding the original bytes, so
//! `unparse(parse(input))` reproduces them in place, whatever their encoding. Parsing
//! never fails on content: malformed lines are dropped, oversized tokens truncated,
//! unclosed blocks closed at end of input. Use [`parse_with_diagnostics`] to find out what was repaired.

pub mod diagnostics;
pub mod options;
pub mod parser;
pub mod serializer;

pub use diagnostics::{Diagnostic, DiagnosticKind};
pub use options::IniOptions;
pub use parser::IniParser;
pub use serializer::IniSerializer;

use crate::error::FormatError;
use crate::format::Format;
use cfgtree_core::{lines_from_bytes, lines_from_str, read_lines, Node, RawLine};
use std::io::{self, Read, Write};

/// Parse everything `reader` yields.
///
/// `options` is the host's options tree; see [`IniOptions::from_tree`]. Only a failing reader
/// produces an error.
pub fn parse<R: Read>(options: Option<&Node>, reader: R) -> io::Result<Node> {
    let lines = read_lines(reader)?;
    Ok(parse_lines(&lines, &IniOptions::from_tree(options)))
}

/// Parse in-memory input.
pub fn parse_bytes(options: Option<&Node>, source: &[u8]) -> Node {
    parse_lines(&lines_from_bytes(source), &IniOptions::from_tree(options))
}

pub fn parse_str(options: Option<&Node>, source: &str) -> Node {
    parse_lines(&lines_from_str(source), &IniOptions::from_tree(options))
}

pub fn parse_lines(lines: &[RawLine], options: &IniOptions) -> Node {
    IniParser::new(lines, options).parse().0
}

/// Parse and report every line that was dropped, truncated or left open.
pub fn parse_with_diagnostics(lines: &[RawLine], options: &IniOptions) -> (Node, Vec<Diagnostic>) {
    IniParser::new(lines, options).parse()
}

/// Write `root` as ini text. Fails only when the writer does.
pub fn unparse<W: Write>(root: &Node, mut writer: W) -> io::Result<()> {
    writer.write_all(&unparse_to_vec(root))?;
    writer.flush()
}

pub fn unparse_to_vec(root: &Node) -> Vec<u8> {
    IniSerializer::new().serialize(root)
}

/// [`unparse_to_vec`] as text; bytes that are not UTF-8 become U+FFFD.
pub fn unparse_to_string(root: &Node) -> String {
    String::from_utf8_lossy(&unparse_to_vec(root)).into_owned()
}

/// Format implementation for ini
#[derive(Debug, Clone, Default)]
pub struct IniFormat {
    options: IniOptions,
}

impl IniFormat {
    pub fn new(options: IniOptions) -> Self {
        Self { options }
    }

    /// Build from a host options tree.
    pub fn from_options_tree(options: Option<&Node>) -> Self {
        Self::new(IniOptions::from_tree(options))
    }

    pub fn options(&self) -> &IniOptions {
        &self.options
    }

    pub fn parse_with_diagnostics(&self, source: &[u8]) -> (Node, Vec<Diagnostic>) {
        parse_with_diagnostics(&lines_from_bytes(source), &self.options)
    }
}

impl Format for IniFormat {
    fn name(&self) -> &str {
        "ini"
    }

    fn description(&self) -> &str {
        "INI sections with nested key = { } blocks, comments and blank lines preserved"
    }

    fn file_extensions(&self) -> &[&str] {
        &["ini", "conf", "cnf"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &[u8]) -> Result<Node, FormatError> {
        Ok(parse_lines(&lines_from_bytes(source), &self.options))
    }

    fn serialize(&self, tree: &Node) -> Result<Vec<u8>, FormatError> {
        Ok(unparse_to_vec(tree))
    }

    fn parse_reader(&self, reader: &mut dyn Read) -> Result<Node, FormatError> {
        let lines = read_lines(reader)?;
        Ok(parse_lines(&lines, &self.options))
    }

    fn serialize_to(&self, tree: &Node, writer: &mut dyn Write) -> Result<(), FormatError> {
        unparse(tree, writer)?;
        Ok(())
    }
}
