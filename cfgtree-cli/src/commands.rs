//! Subcommand implementations
//!
//! Every command works on a [`Context`]: the loaded configuration plus a format registry whose
//! ini format already carries the configured options.

use anyhow::{anyhow, Context as _};
use cfgtree_config::{CfgtreeConfig, Loader};
use cfgtree_core::Node;
use cfgtree_formats::formats::ini::{Diagnostic, IniFormat};
use cfgtree_formats::formats::treeviz::to_treeviz_str;
use cfgtree_formats::{Format, FormatRegistry};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

const STDIN_ARG: &str = "-";

/// Ini input that needed repairs while `--strict` was set.
#[derive(Debug, thiserror::Error)]
#[error("input needed {} repair(s); rejected by --strict", diagnostics.len())]
pub struct StrictRejection {
    pub diagnostics: Vec<Diagnostic>,
}

/// `$XDG_CONFIG_HOME/cfgtree/config.toml`, else `$HOME/.config/cfgtree/config.toml`.
fn user_config_path() -> Option<PathBuf> {
    let base = std::env::var_os("XDG_CONFIG_HOME")
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))?;
    Some(base.join("cfgtree").join("config.toml"))
}

/// Defaults, then the user file if present, then `explicit`, then the `--comment` flag.
pub fn load_config(explicit: Option<&Path>, comment: Option<&str>) -> anyhow::Result<CfgtreeConfig> {
    let mut loader = Loader::new();
    if let Some(path) = user_config_path() {
        loader = loader.with_optional_file(path);
    }
    if let Some(path) = explicit {
        loader = loader.with_file(path);
    }
    if let Some(comment) = comment {
        loader = loader.with_override("formats.ini.comment", comment)?;
    }
    loader.build().context("loading configuration")
}

pub struct Context {
    pub config: CfgtreeConfig,
    pub registry: FormatRegistry,
    ini: IniFormat,
}

impl Context {
    pub fn new(config: CfgtreeConfig) -> Self {
        let ini = IniFormat::from_options_tree(Some(&config.formats.ini.to_options()));
        let mut registry = FormatRegistry::with_defaults();
        registry.register(ini.clone());
        Self {
            config,
            registry,
            ini,
        }
    }

    /// Explicit name, else whatever claims the path's extension, else `fallback`.
    fn resolve_format(&self, explicit: Option<&str>, path: Option<&Path>, fallback: &str) -> String {
        explicit
            .map(str::to_string)
            .or_else(|| {
                path.and_then(|p| self.registry.for_path(p))
                    .map(|f| f.name().to_string())
            })
            .unwrap_or_else(|| fallback.to_string())
    }

    /// Parse `source`. Ini input is repaired; with `strict` any repair is an error.
    fn parse(&self, source: &[u8], format: &str, strict: bool) -> anyhow::Result<Node> {
        if format != self.ini.name() {
            return Ok(self.registry.parse(source, format)?);
        }

        let (tree, diagnostics) = self.ini.parse_with_diagnostics(source);
        if strict && !diagnostics.is_empty() {
            return Err(StrictRejection { diagnostics }.into());
        }
        for diagnostic in &diagnostics {
            tracing::warn!(line = diagnostic.line, kind = %diagnostic.kind, "repaired input");
        }
        Ok(tree)
    }
}

/// Raw input bytes; formats decide how to read them.
struct Input {
    path: Option<PathBuf>,
    bytes: Vec<u8>,
}

fn read_input(arg: &str) -> anyhow::Result<Input> {
    if arg == STDIN_ARG {
        let mut bytes = Vec::new();
        io::stdin()
            .read_to_end(&mut bytes)
            .context("reading stdin")?;
        return Ok(Input { path: None, bytes });
    }

    let path = PathBuf::from(arg);
    let bytes = fs::read(&path).with_context(|| format!("reading {}", path.display()))?;
    Ok(Input {
        path: Some(path),
        bytes,
    })
}

pub struct ConvertRequest<'a> {
    pub input: &'a str,
    pub from: Option<&'a str>,
    pub to: Option<&'a str>,
    pub strict: bool,
    pub output: Option<&'a Path>,
}

pub fn convert(context: &Context, request: &ConvertRequest<'_>) -> anyhow::Result<()> {
    let input = read_input(request.input)?;
    let from = context.resolve_format(
        request.from,
        input.path.as_deref(),
        &context.config.convert.from,
    );
    let to = context.resolve_format(request.to, request.output, &context.config.convert.to);
    tracing::debug!(%from, %to, "converting");

    let tree = context.parse(&input.bytes, &from, request.strict)?;
    let output = context
        .registry
        .serialize(&tree, &to)
        .with_context(|| format!("writing {} output", to))?;

    match request.output {
        Some(path) => {
            fs::write(path, output).with_context(|| format!("writing {}", path.display()))?
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(&output)?;
            stdout.flush()?;
        }
    }
    Ok(())
}

pub fn get(context: &Context, input: &str, path: &str, from: Option<&str>) -> anyhow::Result<()> {
    let input = read_input(input)?;
    let from = context.resolve_format(from, input.path.as_deref(), &context.config.convert.from);
    let tree = context.parse(&input.bytes, &from, false)?;

    let node = tree.find(path).ok_or_else(|| anyhow!("no entry at '{}'", path))?;
    let mut stdout = io::stdout().lock();
    if node.is_group() {
        stdout.write_all(to_treeviz_str(node).as_bytes())?;
    } else if let Some(value) = node.value() {
        stdout.write_all(value)?;
        stdout.write_all(b"\n")?;
    }
    stdout.flush()?;
    Ok(())
}

pub fn list_formats(context: &Context) {
    for name in context.registry.list_formats() {
        let Ok(format) = context.registry.get(&name) else {
            continue;
        };
        let mut modes = Vec::new();
        if format.supports_parsing() {
            modes.push("parse");
        }
        if format.supports_serialization() {
            modes.push("serialize");
        }
        let extensions: Vec<String> = format
            .file_extensions()
            .iter()
            .map(|e| format!(".{}", e))
            .collect();
        println!(
            "{:<8} {:<16} {:<20} {}",
            name,
            modes.join(","),
            extensions.join(" "),
            format.description()
        );
    }
}
