//! Ini serializer
//!
//! Writes a tree back out in document order:
//!
//! ```text
//! # placeholder text, verbatim
//! [section]
//!         key = value
//!         block = {
//!                 nested = value
//!         }
//! ```
//!
//! Entries are indented by [`INDENT_WIDTH`] spaces per nesting level, a section body being
//! level 1. Comments and blank lines are written exactly as stored, whatever their depth.
//! At the root every group becomes a section header; below it every group becomes a block.

use cfgtree_core::Node;

/// Spaces per nesting level.
pub const INDENT_WIDTH: usize = 8;

pub struct IniSerializer {
    output: Vec<u8>,
    indent_level: usize,
}

impl IniSerializer {
    pub fn new() -> Self {
        Self {
            output: Vec::new(),
            indent_level: 0,
        }
    }

    /// Render the children of `root`. Stored bytes are written back unchanged.
    pub fn serialize(mut self, root: &Node) -> Vec<u8> {
        for node in root.children() {
            match node {
                Node::Comment { text } | Node::Blank { text } => self.push_line(&[text]),
                Node::Section { name, children } | Node::Block { name, children } => {
                    self.push_line(&[b"[", name, b"]"]);
                    self.indent_level = 1;
                    self.serialize_body(children);
                    self.indent_level = 0;
                }
                // A leaf cannot sit at the root; keep its name as an empty section.
                Node::KeyValue { name, .. } => self.push_line(&[b"[", name, b"]"]),
            }
        }
        self.output
    }

    fn serialize_body(&mut self, children: &[Node]) {
        for node in children {
            match node {
                Node::Comment { text } | Node::Blank { text } => self.push_line(&[text]),
                Node::KeyValue { name, value } => self.push_indented(&[name, b" = ", value]),
                Node::Section { name, children } | Node::Block { name, children } => {
                    self.push_indented(&[name, b" = {"]);
                    self.indent_level += 1;
                    self.serialize_body(children);
                    self.indent_level -= 1;
                    self.push_indented(&[b"}"]);
                }
            }
        }
    }

    fn push_indented(&mut self, parts: &[&[u8]]) {
        let width = self.indent_level * INDENT_WIDTH;
        self.output.resize(self.output.len() + width, b' ');
        self.push_line(parts);
    }

    fn push_line(&mut self, parts: &[&[u8]]) {
        for part in parts {
            self.output.extend_from_slice(part);
        }
        self.output.push(b'\n');
    }
}

impl Default for IniSerializer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(root: &Node) -> String {
        String::from_utf8(IniSerializer::new().serialize(root)).unwrap()
    }

    #[test]
    fn test_empty_tree() {
        assert_eq!(render(&Node::root(vec![])), "");
    }

    #[test]
    fn test_section_with_entries() {
        let tree = Node::root(vec![Node::section(
            "a",
            vec![Node::key_value("x", "1"), Node::key_value("y", "2")],
        )]);
        assert_eq!(render(&tree), "[a]\n        x = 1\n        y = 2\n");
    }

    #[test]
    fn test_nested_block_indentation() {
        let tree = Node::root(vec![Node::section(
            "a",
            vec![Node::block(
                "b",
                vec![
                    Node::key_value("c", "1"),
                    Node::block("d", vec![Node::key_value("e", "2")]),
                ],
            )],
        )]);
        insta::assert_snapshot!(render(&tree), @r"
[a]
        b = {
                c = 1
                d = {
                        e = 2
                }
        }
");
    }

    #[test]
    fn test_placeholders_are_verbatim() {
        let tree = Node::root(vec![
            Node::comment("# header"),
            Node::blank(""),
            Node::section(
                "a",
                vec![
                    Node::comment("; not reindented"),
                    Node::block("b", vec![Node::comment("    # kept as is")]),
                ],
            ),
        ]);
        assert_eq!(
            render(&tree),
            "# header\n\n[a]\n; not reindented\n        b = {\n    # kept as is\n        }\n"
        );
    }

    #[test]
    fn test_empty_value_and_empty_block() {
        let tree = Node::root(vec![Node::section(
            "a",
            vec![Node::key_value("x", ""), Node::block("b", vec![])],
        )]);
        assert_eq!(render(&tree), "[a]\n        x = \n        b = {\n        }\n");
    }

    #[test]
    fn test_group_kind_follows_position() {
        let tree = Node::root(vec![
            Node::block("top", vec![Node::section("inner", vec![])]),
            Node::key_value("leaf", "lost"),
        ]);
        assert_eq!(
            render(&tree),
            "[top]\n        inner = {\n        }\n[leaf]\n"
        );
    }

    #[test]
    fn test_raw_bytes_are_written_back() {
        let tree = Node::root(vec![
            Node::comment(&b"# caf\xe9"[..]),
            Node::section("a", vec![Node::key_value("x", &b"\xff"[..])]),
        ]);
        assert_eq!(
            IniSerializer::new().serialize(&tree),
            b"# caf\xe9\n[a]\n        x = \xff\n"
        );
    }
}
