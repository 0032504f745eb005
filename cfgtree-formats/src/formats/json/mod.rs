//! JSON format implementation
//!
//! A lossless dump of the node tree, placeholders included, so any tree can be stored and
//! read back unchanged. Each node is an object tagged by `kind`. Names, values and text are
//! JSON strings, or arrays of byte values when they are not valid UTF-8:
//!
//! ```text
//! {"kind": "section", "name": "(root)", "children": [
//!   {"kind": "comment", "text": "# hello"},
//!   {"kind": "section", "name": "a", "children": [
//!     {"kind": "key_value", "name": "x", "value": "1"}
//!   ]}
//! ]}
//! ```

use crate::error::FormatError;
use crate::format::Format;
use cfgtree_core::Node;

/// Format implementation for JSON
pub struct JsonFormat;

impl Format for JsonFormat {
    fn name(&self) -> &str {
        "json"
    }

    fn description(&self) -> &str {
        "Lossless JSON dump of the configuration tree"
    }

    fn file_extensions(&self) -> &[&str] {
        &["json"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &[u8]) -> Result<Node, FormatError> {
        serde_json::from_slice(source).map_err(|e| FormatError::ParseError(e.to_string()))
    }

    fn serialize(&self, tree: &Node) -> Result<Vec<u8>, FormatError> {
        let mut json = serde_json::to_vec_pretty(tree)
            .map_err(|e| FormatError::SerializationError(e.to_string()))?;
        json.push(b'\n');
        Ok(json)
    }
}
