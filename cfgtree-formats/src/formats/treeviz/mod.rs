//! Treeviz formatter for configuration trees
//!
//! Treeviz is a one line per node view of the tree, meant for quickly checking what a parser
//! made of a file. Nesting is drawn with box connectors, 2 columns per level.
//!
//! So the format is :
//! <prefix><connector> <icon> <label> (label truncated to 30 characters)
//!
//! Bytes that are not UTF-8 show as U+FFFD.
//!
//! Example:
//!
//! ```text
//! ⧉ (root)
//! ├─ # # global settings
//! └─ § server
//!   ├─ • host = example.org
//!   ├─ ␣
//!   └─ ≔ tls
//!     └─ • cert = /etc/cert.pem
//! ```
//!
//! Icons
//!     Root: ⧉
//!     Section: §
//!     Block: ≔
//!     KeyValue: •
//!     Comment: #
//!     Blank: ␣

use crate::error::FormatError;
use crate::format::Format;
use cfgtree_core::Node;

const LABEL_WIDTH: usize = 30;

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let mut truncated = s.chars().take(max_chars).collect::<String>();
        truncated.push_str("...");
        truncated
    } else {
        s.to_string()
    }
}

fn icon(node: &Node) -> &'static str {
    match node {
        Node::Section { .. } => "§",
        Node::Block { .. } => "≔",
        Node::KeyValue { .. } => "•",
        Node::Comment { .. } => "#",
        Node::Blank { .. } => "␣",
    }
}

fn label(node: &Node) -> String {
    let text = |bytes: &[u8]| String::from_utf8_lossy(bytes).into_owned();
    match node {
        Node::Section { name, .. } | Node::Block { name, .. } => text(name),
        Node::KeyValue { name, value } => format!("{} = {}", text(name), text(value)),
        Node::Comment { text: comment } => text(comment).trim().to_string(),
        Node::Blank { .. } => String::new(),
    }
}

fn format_node(node: &Node, prefix: &str, is_last: bool, output: &mut String) {
    let connector = if is_last { "└─" } else { "├─" };
    let line = format!(
        "{}{} {} {}",
        prefix,
        connector,
        icon(node),
        truncate(&label(node), LABEL_WIDTH)
    );
    output.push_str(line.trim_end());
    output.push('\n');

    let children = node.children();
    if !children.is_empty() {
        let child_prefix = format!("{}{}", prefix, if is_last { "  " } else { "│ " });
        for (i, child) in children.iter().enumerate() {
            format_node(child, &child_prefix, i == children.len() - 1, output);
        }
    }
}

/// Render `tree` with `tree` itself as the top line.
pub fn to_treeviz_str(tree: &Node) -> String {
    let mut output = format!("⧉ {}\n", truncate(&tree.name_lossy(), LABEL_WIDTH));
    let children = tree.children();
    for (i, child) in children.iter().enumerate() {
        format_node(child, "", i == children.len() - 1, &mut output);
    }
    output
}

/// Format implementation for treeviz
pub struct TreevizFormat;

impl Format for TreevizFormat {
    fn name(&self) -> &str {
        "treeviz"
    }

    fn description(&self) -> &str {
        "One line per node tree view (output only)"
    }

    fn file_extensions(&self) -> &[&str] {
        &["treeviz"]
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn serialize(&self, tree: &Node) -> Result<Vec<u8>, FormatError> {
        Ok(to_treeviz_str(tree).into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_treeviz_layout() {
        let tree = Node::root(vec![
            Node::comment("# global settings"),
            Node::section(
                "server",
                vec![
                    Node::key_value("host", "example.org"),
                    Node::blank(""),
                    Node::block("tls", vec![Node::key_value("cert", "/etc/cert.pem")]),
                ],
            ),
        ]);

        insta::assert_snapshot!(to_treeviz_str(&tree), @r"
⧉ (root)
├─ # # global settings
└─ § server
  ├─ • host = example.org
  ├─ ␣
  └─ ≔ tls
    └─ • cert = /etc/cert.pem
");
    }

    #[test]
    fn test_non_utf8_labels_are_replaced() {
        let tree = Node::root(vec![Node::key_value("name", &b"caf\xe9"[..])]);
        assert_eq!(to_treeviz_str(&tree), "⧉ (root)\n└─ • name = caf\u{fffd}\n");
    }

    #[test]
    fn test_long_labels_are_truncated() {
        let tree = Node::root(vec![Node::section("s".repeat(40), vec![])]);
        let output = to_treeviz_str(&tree);
        assert!(output.contains(&format!("§ {}...", "s".repeat(30))));
    }

    #[test]
    fn test_treeviz_does_not_parse() {
        assert!(!TreevizFormat.supports_parsing());
        assert!(TreevizFormat.parse(b"anything").is_err());
    }
}
