//! Format plugins for cfgtree configuration trees
//!
//! This crate provides a uniform interface for converting between the cfgtree node tree
//! ([`cfgtree_core::Node`]) and textual configuration formats.
//!
//! Architecture
//!
//! - Format trait: uniform interface for all formats (parsing and/or serialization)
//! - FormatRegistry: centralized discovery and selection of formats by name or extension
//! - Format implementations: one module per format under `formats/`
//!
//! This is a pure lib: nothing here assumes a shell, reads environment variables or prints.
//! Events are reported through `tracing`; installing a subscriber is up to the binary.
//!
//! The file structure:
//! ```text
//! .
//! ├── error.rs
//! ├── format.rs               # Format trait definition
//! ├── registry.rs             # FormatRegistry for discovery and selection
//! ├── formats
//! │   ├── ini                 # INI dialect with nested `key = { }` blocks
//! │   │   ├── options.rs      # comment markers and token cap
//! │   │   ├── parser.rs
//! │   │   ├── serializer.rs
//! │   │   ├── diagnostics.rs
//! │   │   └── mod.rs
//! │   ├── json                # lossless dump of the tree
//! │   └── treeviz             # one line per node, serialization only
//! ├── lib.rs
//! ```
//!
//! Testing
//! ```text
//! tests
//! ├── ini.rs
//! ├── ini_proptest.rs
//! └── fixtures
//!     └── <docname>.ini
//! ```
//!
//! Round Tripping
//!
//! The ini format keeps comments and blank lines as placeholder nodes, so parsing and
//! serializing reproduces the original layout. Whitespace that the parser trims (around
//! `=`, trailing spaces in values, indentation of entries) is normalized on output.

pub mod error;
pub mod format;
pub mod formats;
pub mod registry;

pub use error::FormatError;
pub use format::Format;
pub use registry::FormatRegistry;
