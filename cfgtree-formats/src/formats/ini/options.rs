//! Parser options for the ini format
//!
//! Options reach the format as a small node tree of `name = value` records supplied by the
//! host (see `cfgtree-config`). Two records are understood:
//!
//! - `comment`: the set of bytes that start a comment line. Each byte is a marker on its own,
//!   so `";#"` accepts both `; note` and `# note`. An empty value disables comments.
//! - `max_token_len`: byte cap applied to names, values and comment text. Longer tokens are
//!   truncated, never rejected.
//!
//! Anything else in the tree is ignored.

use cfgtree_core::Node;

pub const DEFAULT_COMMENT_MARKERS: &str = "#";
pub const DEFAULT_MAX_TOKEN_LEN: usize = 255;

pub const COMMENT_OPTION: &str = "comment";
pub const MAX_TOKEN_LEN_OPTION: &str = "max_token_len";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IniOptions {
    comment_markers: Vec<u8>,
    max_token_len: usize,
}

impl Default for IniOptions {
    fn default() -> Self {
        Self {
            comment_markers: DEFAULT_COMMENT_MARKERS.into(),
            max_token_len: DEFAULT_MAX_TOKEN_LEN,
        }
    }
}

impl IniOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_comment_markers(mut self, markers: impl Into<Vec<u8>>) -> Self {
        self.comment_markers = markers.into();
        self
    }

    /// A cap of zero is raised to one byte.
    pub fn with_max_token_len(mut self, max_token_len: usize) -> Self {
        self.max_token_len = max_token_len.max(1);
        self
    }

    /// Resolve options from the immediate children of an options tree.
    ///
    /// Without a tree, or without a `comment` child, the marker set is `#`. When a record
    /// appears more than once the last one wins.
    pub fn from_tree(options: Option<&Node>) -> Self {
        let mut resolved = Self::default();
        let Some(options) = options else {
            return resolved;
        };

        for child in options.entries() {
            let Some(raw) = child.value() else {
                continue;
            };
            if child.name() == COMMENT_OPTION.as_bytes() {
                resolved.comment_markers = raw.to_vec();
            } else if child.name() == MAX_TOKEN_LEN_OPTION.as_bytes() {
                let parsed = std::str::from_utf8(raw)
                    .ok()
                    .and_then(|text| text.trim().parse::<usize>().ok());
                match parsed {
                    Some(len) if len > 0 => resolved.max_token_len = len,
                    _ => tracing::warn!(
                        value = %raw.escape_ascii(),
                        default = DEFAULT_MAX_TOKEN_LEN,
                        "ignoring invalid ini option max_token_len"
                    ),
                }
            }
        }

        resolved
    }

    /// The options as a tree that [`IniOptions::from_tree`] resolves back to `self`.
    pub fn to_tree(&self) -> Node {
        Node::section(
            "ini",
            vec![
                Node::key_value(COMMENT_OPTION, self.comment_markers.clone()),
                Node::key_value(MAX_TOKEN_LEN_OPTION, self.max_token_len.to_string()),
            ],
        )
    }

    pub fn comment_markers(&self) -> &[u8] {
        &self.comment_markers
    }

    pub fn max_token_len(&self) -> usize {
        self.max_token_len
    }

    pub fn is_comment_marker(&self, b: u8) -> bool {
        self.comment_markers.contains(&b)
    }
}
