//! The `Format` trait
//!
//! A format turns input bytes into a [`Node`] tree, a tree into bytes, or both. Capabilities
//! are advertised up front so a registry can refuse a conversion before doing any work.

use crate::error::FormatError;
use cfgtree_core::Node;
use std::io::{Read, Write};

/// A configuration text format.
///
/// Only `name` is required. A format that overrides `parse` or `serialize` must also flip the
/// matching `supports_*` flag, since callers check the flag rather than probing.
///
/// ```ignore
/// struct Lines;
///
/// impl Format for Lines {
///     fn name(&self) -> &str {
///         "lines"
///     }
///
///     fn supports_serialization(&self) -> bool {
///         true
///     }
///
///     fn serialize(&self, tree: &Node) -> Result<Vec<u8>, FormatError> {
///         Ok(tree.entries().flat_map(|n| [n.name(), &b"\n"[..]].concat()).collect())
///     }
/// }
/// ```
pub trait Format: Send + Sync {
    /// Registry key, e.g. `ini`.
    fn name(&self) -> &str;

    fn description(&self) -> &str {
        ""
    }

    /// File extensions (without the dot) this format claims
    fn file_extensions(&self) -> &[&str] {
        &[]
    }

    fn supports_parsing(&self) -> bool {
        false
    }

    fn supports_serialization(&self) -> bool {
        false
    }

    /// Parse `source` into a tree under a synthetic root.
    fn parse(&self, _source: &[u8]) -> Result<Node, FormatError> {
        Err(FormatError::NotSupported(format!("{} cannot be parsed", self.name())))
    }

    fn serialize(&self, _tree: &Node) -> Result<Vec<u8>, FormatError> {
        Err(FormatError::NotSupported(format!("{} cannot be written", self.name())))
    }

    /// Parse everything `reader` yields.
    fn parse_reader(&self, reader: &mut dyn Read) -> Result<Node, FormatError> {
        let mut source = Vec::new();
        reader.read_to_end(&mut source)?;
        self.parse(&source)
    }

    /// Serialize `tree` into `writer`. Write failures surface as [`FormatError::Io`].
    fn serialize_to(&self, tree: &Node, writer: &mut dyn Write) -> Result<(), FormatError> {
        let output = self.serialize(tree)?;
        writer.write_all(&output)?;
        Ok(())
    }
}
