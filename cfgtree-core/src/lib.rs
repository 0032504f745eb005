//! # cfgtree-core
//!
//! Shared building blocks for cfgtree formats.
//!
//! - [`tree`]: the ordered configuration node tree every format parses into and
//!   serializes from.
//! - [`lines`]: the raw line source used by line-oriented parsers.
//!
//! Formats themselves live in `cfgtree-formats`; this crate has no knowledge of any
//! concrete syntax.

pub mod lines;
pub mod tree;

pub use lines::{lines_from_bytes, lines_from_str, read_lines, RawLine};
pub use tree::Node;
