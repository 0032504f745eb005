//! Name and extension lookup over the available formats

use crate::error::FormatError;
use crate::format::Format;
use cfgtree_core::Node;
use std::collections::HashMap;
use std::path::Path;

/// Formats keyed by [`Format::name`].
///
/// ```ignore
/// let mut registry = FormatRegistry::new();
/// registry.register(IniFormat::default());
///
/// let tree = registry.parse(b"[a]\nx = 1\n", "ini")?;
/// let json = registry.serialize(&tree, "json")?;
/// ```
pub struct FormatRegistry {
    formats: HashMap<String, Box<dyn Format>>,
}

impl FormatRegistry {
    pub fn new() -> Self {
        FormatRegistry {
            formats: HashMap::new(),
        }
    }

    /// Add `format`, replacing any format registered under the same name.
    pub fn register<F: Format + 'static>(&mut self, format: F) {
        tracing::trace!(format = format.name(), "registering format");
        self.formats
            .insert(format.name().to_string(), Box::new(format));
    }

    pub fn get(&self, name: &str) -> Result<&dyn Format, FormatError> {
        self.formats
            .get(name)
            .map(|f| f.as_ref())
            .ok_or_else(|| FormatError::FormatNotFound(name.to_string()))
    }

    pub fn has(&self, name: &str) -> bool {
        self.formats.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn list_formats(&self) -> Vec<String> {
        let mut names: Vec<_> = self.formats.keys().cloned().collect();
        names.sort();
        names
    }

    /// Find the format claiming the extension of `path`, ignoring case.
    ///
    /// When several formats claim it, the one with the smallest name wins so the answer does
    /// not depend on registration order.
    pub fn for_path(&self, path: &Path) -> Option<&dyn Format> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        let mut candidates: Vec<&dyn Format> = self
            .formats
            .values()
            .map(|f| f.as_ref())
            .filter(|f| f.file_extensions().iter().any(|e| *e == extension))
            .collect();
        candidates.sort_by(|a, b| a.name().cmp(b.name()));
        candidates.into_iter().next()
    }

    /// A format that can read.
    pub fn reader(&self, name: &str) -> Result<&dyn Format, FormatError> {
        let format = self.get(name)?;
        if format.supports_parsing() {
            Ok(format)
        } else {
            Err(FormatError::NotSupported(format!("{} cannot be parsed", name)))
        }
    }

    /// A format that can write.
    pub fn writer(&self, name: &str) -> Result<&dyn Format, FormatError> {
        let format = self.get(name)?;
        if format.supports_serialization() {
            Ok(format)
        } else {
            Err(FormatError::NotSupported(format!("{} cannot be written", name)))
        }
    }

    pub fn parse(&self, source: &[u8], format: &str) -> Result<Node, FormatError> {
        self.reader(format)?.parse(source)
    }

    pub fn serialize(&self, tree: &Node, format: &str) -> Result<Vec<u8>, FormatError> {
        self.writer(format)?.serialize(tree)
    }

    /// Parse with `from`, then serialize with `to`. Both ends are checked before parsing.
    pub fn convert(&self, source: &[u8], from: &str, to: &str) -> Result<Vec<u8>, FormatError> {
        let writer = self.writer(to)?;
        let tree = self.reader(from)?.parse(source)?;
        writer.serialize(&tree)
    }

    /// Registry holding `ini` (default options), `json` and `treeviz`.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(crate::formats::ini::IniFormat::default());
        registry.register(crate::formats::json::JsonFormat);
        registry.register(crate::formats::treeviz::TreevizFormat);

        registry
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Reads `name` lines as empty sections and writes section names back one per line.
    struct NamesFormat;

    impl Format for NamesFormat {
        fn name(&self) -> &str {
            "names"
        }
        fn description(&self) -> &str {
            "Section names, one per line"
        }
        fn file_extensions(&self) -> &[&str] {
            &["names", "lst"]
        }
        fn supports_parsing(&self) -> bool {
            true
        }
        fn supports_serialization(&self) -> bool {
            true
        }
        fn parse(&self, source: &[u8]) -> Result<Node, FormatError> {
            Ok(Node::root(
                source
                    .split(|&b| b == b'\n')
                    .filter(|n| !n.is_empty())
                    .map(|n| Node::section(n, vec![]))
                    .collect(),
            ))
        }
        fn serialize(&self, tree: &Node) -> Result<Vec<u8>, FormatError> {
            Ok(tree.entries().flat_map(|n| [n.name(), &b"\n"[..]].concat()).collect())
        }
    }

    /// Claims `.lst` as well, so extension lookup has to break a tie.
    struct CountFormat;

    impl Format for CountFormat {
        fn name(&self) -> &str {
            "count"
        }
        fn file_extensions(&self) -> &[&str] {
            &["lst"]
        }
        fn supports_serialization(&self) -> bool {
            true
        }
        fn serialize(&self, tree: &Node) -> Result<Vec<u8>, FormatError> {
            Ok(tree.descendant_count().to_string().into_bytes())
        }
    }

    fn registry() -> FormatRegistry {
        let mut registry = FormatRegistry::new();
        registry.register(NamesFormat);
        registry.register(CountFormat);
        registry
    }

    #[test]
    fn test_lookup_by_name() {
        let registry = registry();
        assert!(registry.has("names"));
        assert!(!registry.has("ini"));
        assert_eq!(registry.list_formats(), vec!["count", "names"]);
        assert_eq!(registry.get("count").map(|f| f.name()).ok(), Some("count"));
        assert!(matches!(
            registry.get("yaml"),
            Err(FormatError::FormatNotFound(name)) if name == "yaml"
        ));
    }

    #[test]
    fn test_reregistering_replaces() {
        let mut registry = registry();
        registry.register(NamesFormat);
        assert_eq!(registry.list_formats().len(), 2);
    }

    #[test]
    fn test_capabilities_are_checked() {
        let registry = registry();
        assert!(registry.reader("names").is_ok());
        assert!(registry.writer("count").is_ok());
        assert!(matches!(
            registry.reader("count"),
            Err(FormatError::NotSupported(msg)) if msg == "count cannot be parsed"
        ));
        assert!(matches!(
            registry.parse(b"a", "count"),
            Err(FormatError::NotSupported(_))
        ));
        assert_eq!(registry.serialize(&Node::root(vec![]), "count").unwrap(), b"0");
    }

    #[test]
    fn test_convert_between_formats() {
        let registry = registry();
        assert_eq!(registry.convert(b"a\nb\n", "names", "names").unwrap(), b"a\nb\n");
        assert_eq!(registry.convert(b"a\nb\n", "names", "count").unwrap(), b"2");
        assert!(matches!(
            registry.convert(b"a", "count", "names"),
            Err(FormatError::NotSupported(_))
        ));
        assert!(matches!(
            registry.convert(b"a", "names", "missing"),
            Err(FormatError::FormatNotFound(_))
        ));
    }

    #[test]
    fn test_for_path() {
        let registry = registry();
        let name_for = |path: &str| registry.for_path(Path::new(path)).map(|f| f.name());

        assert_eq!(name_for("dir/servers.NAMES"), Some("names"));
        // Both claim .lst; the smaller name wins.
        assert_eq!(name_for("hosts.lst"), Some("count"));
        assert_eq!(name_for("notes.txt"), None);
        assert_eq!(name_for("Makefile"), None);
    }

    #[test]
    fn test_with_defaults() {
        let registry = FormatRegistry::default();
        assert_eq!(registry.list_formats(), vec!["ini", "json", "treeviz"]);
        assert_eq!(
            registry.for_path(Path::new("app.conf")).map(|f| f.name()),
            Some("ini")
        );
    }
}
