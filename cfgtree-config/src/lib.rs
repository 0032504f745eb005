//! Layered configuration for cfgtree tools
//!
//! The defaults live in `defaults/cfgtree.default.toml` and are compiled in, so the file
//! doubles as documentation of every key. Tools stack their own files and flag overrides on
//! top with [`Loader`].
//!
//! Format settings end up as option trees (see [`IniConfig::to_options`]), the same shape a
//! host hands to a format plugin, so formats never depend on this crate.

use cfgtree_core::Node;
use cfgtree_formats::formats::ini::IniOptions;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;

pub use config::ConfigError;

const DEFAULT_TOML: &str = include_str!("../defaults/cfgtree.default.toml");

/// Top-level configuration consumed by cfgtree applications.
#[derive(Debug, Clone, Deserialize)]
pub struct CfgtreeConfig {
    pub log: LogConfig,
    pub formats: FormatsConfig,
    pub convert: ConvertConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: String,
}

/// Per-format option groups.
#[derive(Debug, Clone, Deserialize)]
pub struct FormatsConfig {
    pub ini: IniConfig,
}

/// Mirrors the options understood by the ini format.
#[derive(Debug, Clone, Deserialize)]
pub struct IniConfig {
    pub comment: String,
    pub max_token_len: usize,
}

impl IniConfig {
    pub fn to_ini_options(&self) -> IniOptions {
        IniOptions::new()
            .with_comment_markers(self.comment.as_bytes())
            .with_max_token_len(self.max_token_len)
    }

    /// The options tree handed to the ini format.
    pub fn to_options(&self) -> Node {
        self.to_ini_options().to_tree()
    }
}

/// Fallback formats for conversions.
#[derive(Debug, Clone, Deserialize)]
pub struct ConvertConfig {
    pub from: String,
    pub to: String,
}

/// Builds a [`CfgtreeConfig`] from the embedded defaults plus any number of TOML layers.
///
/// Later layers win key by key, so a file only needs the keys it changes.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    pub fn new() -> Self {
        Self {
            builder: Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml)),
        }
    }

    fn layer(mut self, path: &Path, required: bool) -> Self {
        tracing::debug!(path = %path.display(), required, "config layer");
        self.builder = self
            .builder
            .add_source(File::from(path).format(FileFormat::Toml).required(required));
        self
    }

    /// Layer a TOML file that must exist; a missing file fails [`Loader::build`].
    pub fn with_file(self, path: impl AsRef<Path>) -> Self {
        self.layer(path.as_ref(), true)
    }

    /// Layer a TOML file if it exists.
    pub fn with_optional_file(self, path: impl AsRef<Path>) -> Self {
        self.layer(path.as_ref(), false)
    }

    /// Set one dotted key (e.g. `formats.ini.comment`) above every file layer.
    pub fn with_override<V>(mut self, key: &str, value: V) -> Result<Self, ConfigError>
    where
        V: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    pub fn build(self) -> Result<CfgtreeConfig, ConfigError> {
        let config = self.builder.build()?;
        config.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// The embedded defaults alone.
pub fn load_defaults() -> Result<CfgtreeConfig, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn toml_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn embedded_defaults() {
        let config = load_defaults().unwrap();
        assert_eq!(config.log.filter, "warn");
        assert_eq!(config.formats.ini.comment, "#");
        assert_eq!(config.formats.ini.max_token_len, 255);
        assert_eq!((config.convert.from.as_str(), config.convert.to.as_str()), ("ini", "ini"));
    }

    #[test]
    fn later_layers_win_per_key() {
        let user = toml_file("[formats.ini]\ncomment = \";\"\nmax_token_len = 64\n");
        let project = toml_file("[formats.ini]\nmax_token_len = 32\n");

        let config = Loader::new()
            .with_file(user.path())
            .with_file(project.path())
            .build()
            .unwrap();
        assert_eq!(config.formats.ini.comment, ";");
        assert_eq!(config.formats.ini.max_token_len, 32);
        assert_eq!(config.log.filter, "warn");
    }

    #[test]
    fn overrides_beat_files() {
        let file = toml_file("[formats.ini]\ncomment = \";\"\n");
        let config = Loader::new()
            .with_file(file.path())
            .with_override("formats.ini.comment", "")
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(config.formats.ini.comment, "");
    }

    #[test]
    fn missing_files() {
        let missing = "/nonexistent/cfgtree.toml";
        assert!(Loader::new().with_file(missing).build().is_err());
        assert!(Loader::new().with_optional_file(missing).build().is_ok());
    }

    #[test]
    fn wrong_type_is_an_error() {
        let file = toml_file("[formats.ini]\nmax_token_len = \"lots\"\n");
        assert!(Loader::new().with_file(file.path()).build().is_err());
    }

    #[test]
    fn ini_section_becomes_options_tree() {
        let config = Loader::new()
            .with_override("formats.ini.comment", ";#")
            .unwrap()
            .build()
            .unwrap();
        let tree = config.formats.ini.to_options();
        assert_eq!(tree.get("comment").and_then(Node::value_str), Some(";#"));

        let options = IniOptions::from_tree(Some(&tree));
        assert_eq!(options.comment_markers(), b";#");
        assert_eq!(options.max_token_len(), 255);
    }
}
