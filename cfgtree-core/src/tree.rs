//! Configuration node tree
//!
//! The tree is the interchange artifact between formats: a parser builds one, a serializer
//! walks one. Children are kept in document order and that order is significant.
//!
//! Node Kinds
//!
//! - Section: a top-level named group (`[name]` in ini).
//! - Block: a nested named group (`name = { ... }` in ini).
//! - KeyValue: a named leaf carrying a scalar.
//! - Comment / Blank: placeholders holding the verbatim source line so a serializer can
//!   reproduce the original formatting. They carry no configuration meaning.
//!
//! Section and Block differ only in where a parser found them. Serializers decide on
//! syntax from the position in the tree, so a Block placed at the root is still written
//! as a section header.
//!
//! Bytes
//!
//! Names, values and placeholder text are raw bytes. Configuration files in the wild are
//! not always UTF-8 (Latin-1 comments are common), and a round trip must give back the
//! exact input. Use [`Node::value_str`] or [`Node::name_lossy`] where text is wanted.
//!
//! Legacy Names
//!
//! Hosts that address nodes by name see placeholders as `.comment` and `.empty`, see
//! [`Node::name`]. Parsers reject keys starting with `.`, so those two names stay
//! unambiguous in a parsed tree.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Name of the synthetic root returned by parsers.
pub const ROOT_NAME: &str = "(root)";
/// Legacy name reported for [`Node::Comment`].
pub const COMMENT_NAME: &str = ".comment";
/// Legacy name reported for [`Node::Blank`].
pub const BLANK_NAME: &str = ".empty";

/// A node of the configuration tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    Section {
        #[serde(with = "text_repr")]
        name: Vec<u8>,
        #[serde(default)]
        children: Vec<Node>,
    },
    Block {
        #[serde(with = "text_repr")]
        name: Vec<u8>,
        #[serde(default)]
        children: Vec<Node>,
    },
    KeyValue {
        #[serde(with = "text_repr")]
        name: Vec<u8>,
        #[serde(with = "text_repr")]
        value: Vec<u8>,
    },
    Comment {
        #[serde(with = "text_repr")]
        text: Vec<u8>,
    },
    Blank {
        #[serde(with = "text_repr")]
        text: Vec<u8>,
    },
}

/// Byte fields are written as strings when they are UTF-8 and as byte arrays otherwise.
mod text_repr {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        match std::str::from_utf8(bytes) {
            Ok(text) => serializer.serialize_str(text),
            Err(_) => serializer.serialize_bytes(bytes),
        }
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Text(String),
        Bytes(Vec<u8>),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        Ok(match Repr::deserialize(deserializer)? {
            Repr::Text(text) => text.into_bytes(),
            Repr::Bytes(bytes) => bytes,
        })
    }
}

impl Node {
    /// The synthetic root that parsers hang top-level nodes on.
    pub fn root(children: Vec<Node>) -> Self {
        Node::section(ROOT_NAME, children)
    }

    pub fn section(name: impl Into<Vec<u8>>, children: Vec<Node>) -> Self {
        Node::Section {
            name: name.into(),
            children,
        }
    }

    pub fn block(name: impl Into<Vec<u8>>, children: Vec<Node>) -> Self {
        Node::Block {
            name: name.into(),
            children,
        }
    }

    pub fn key_value(name: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        Node::KeyValue {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn comment(text: impl Into<Vec<u8>>) -> Self {
        Node::Comment { text: text.into() }
    }

    pub fn blank(text: impl Into<Vec<u8>>) -> Self {
        Node::Blank { text: text.into() }
    }

    /// The node name, with placeholders reported under their legacy names.
    pub fn name(&self) -> &[u8] {
        match self {
            Node::Section { name, .. } | Node::Block { name, .. } | Node::KeyValue { name, .. } => {
                name
            }
            Node::Comment { .. } => COMMENT_NAME.as_bytes(),
            Node::Blank { .. } => BLANK_NAME.as_bytes(),
        }
    }

    /// [`Node::name`] for display; invalid UTF-8 shows as U+FFFD.
    pub fn name_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.name())
    }

    /// The scalar carried by a leaf. Groups have none.
    pub fn value(&self) -> Option<&[u8]> {
        match self {
            Node::KeyValue { value, .. } => Some(value),
            Node::Comment { text } | Node::Blank { text } => Some(text),
            Node::Section { .. } | Node::Block { .. } => None,
        }
    }

    /// [`Node::value`] when it is valid UTF-8.
    pub fn value_str(&self) -> Option<&str> {
        self.value().and_then(|value| std::str::from_utf8(value).ok())
    }

    /// Children in document order; empty for leaves.
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Section { children, .. } | Node::Block { children, .. } => children,
            _ => &[],
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self, Node::Section { .. } | Node::Block { .. })
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Node::Comment { .. } | Node::Blank { .. })
    }

    /// Children that carry configuration, skipping comments and blank lines.
    pub fn entries(&self) -> impl Iterator<Item = &Node> {
        self.children().iter().filter(|child| !child.is_placeholder())
    }

    /// First non-placeholder child with the given name.
    pub fn get(&self, name: impl AsRef<[u8]>) -> Option<&Node> {
        let name = name.as_ref();
        self.entries().find(|child| child.name() == name)
    }

    /// Look up a descendant by a `/`-separated path such as `server/tls/cert`.
    ///
    /// Empty segments are ignored, so the empty path resolves to `self`.
    pub fn find(&self, path: &str) -> Option<&Node> {
        path.split('/')
            .filter(|segment| !segment.is_empty())
            .try_fold(self, |node, segment| node.get(segment))
    }

    /// Total number of nodes below this one.
    pub fn descendant_count(&self) -> usize {
        self.children()
            .iter()
            .map(|child| 1 + child.descendant_count())
            .sum()
    }
}
