//! Layering lint for the `docstore` crate.
//!
//! `docstore` keeps a hexagonal layout: `domain` (services and ports),
//! `inbound` (the command-line adapter) and `outbound` (filesystem
//! adapters). This crate parses every source file under those three
//! directories with `syn` and rejects imports that cross the boundaries:
//!
//! - `domain` must not reach adapter modules, the filesystem, or the CLI,
//!   configuration and subscriber crates;
//! - `inbound` must not reach `outbound` or the filesystem capability
//!   crate;
//! - `outbound` must not reach `inbound` or the CLI and configuration
//!   crates.
//!
//! Run it with `cargo run -p architecture-lint`.

use std::collections::BTreeSet;
use std::fmt;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs::Dir};
use syn::visit::Visit;
use thiserror::Error;

/// Name under which sibling modules may refer to the linted crate.
const CRATE_NAME: &str = "docstore";

/// A single boundary violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// File path relative to the crate's `src` directory.
    pub file: Utf8PathBuf,
    /// Rule that was broken.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.file, self.message)
    }
}

/// Failures reported by the lint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LintError {
    /// A source directory or file could not be read.
    #[error("cannot read {path}: {message}")]
    Io {
        /// Path that failed.
        path: Utf8PathBuf,
        /// Underlying error.
        message: String,
    },
    /// A file is not valid Rust or lies outside the known layers.
    #[error("cannot lint {file}: {message}")]
    Parse {
        /// Offending file.
        file: Utf8PathBuf,
        /// Parser message.
        message: String,
    },
    /// Boundary violations were found.
    #[error("layering violations:\n{}", list(.0))]
    Violations(Vec<Violation>),
}

fn list(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|violation| format!("- {violation}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// A Rust source file to lint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintSource {
    /// Path relative to the crate's `src` directory.
    pub file: Utf8PathBuf,
    /// File contents.
    pub contents: String,
}

/// The hexagon layer a file belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layer {
    Domain,
    Inbound,
    Outbound,
}

/// What a layer may not import.
struct Rules {
    modules: &'static [&'static str],
    crates: &'static [&'static str],
    std_modules: &'static [&'static str],
}

impl Layer {
    const ALL: [Self; 3] = [Self::Domain, Self::Inbound, Self::Outbound];

    const fn dir(self) -> &'static str {
        match self {
            Self::Domain => "domain",
            Self::Inbound => "inbound",
            Self::Outbound => "outbound",
        }
    }

    fn of(file: &Utf8Path) -> Option<Self> {
        let first = file.components().next()?.as_str();
        Self::ALL.into_iter().find(|layer| layer.dir() == first)
    }

    const fn rules(self) -> Rules {
        match self {
            Self::Domain => Rules {
                modules: &["inbound", "outbound", "store", "config"],
                crates: &[
                    "cap_std",
                    "clap",
                    "ortho_config",
                    "serde_json",
                    "tracing_subscriber",
                ],
                std_modules: &["fs", "env"],
            },
            Self::Inbound => Rules {
                modules: &["outbound"],
                crates: &["cap_std", "ortho_config", "tracing_subscriber"],
                std_modules: &[],
            },
            Self::Outbound => Rules {
                modules: &["inbound", "store", "config"],
                crates: &["clap", "ortho_config", "tracing_subscriber"],
                std_modules: &[],
            },
        }
    }
}

/// Lints the crate rooted at `crate_dir` (the directory holding `src/`).
///
/// # Errors
///
/// Returns [`LintError`] when sources cannot be read or parsed, or when any
/// boundary is crossed.
pub fn lint_crate(crate_dir: &Utf8Path) -> Result<(), LintError> {
    let sources = collect_sources(&crate_dir.join("src"))?;
    lint_sources(&sources)
}

/// Lints in-memory sources.
///
/// # Errors
///
/// See [`lint_crate`].
pub fn lint_sources(sources: &[LintSource]) -> Result<(), LintError> {
    let mut violations = Vec::new();
    for source in sources {
        let layer = Layer::of(&source.file).ok_or_else(|| LintError::Parse {
            file: source.file.clone(),
            message: "file is not under domain/, inbound/ or outbound/".to_owned(),
        })?;
        let parsed = syn::parse_file(&source.contents).map_err(|err| LintError::Parse {
            file: source.file.clone(),
            message: err.to_string(),
        })?;
        violations.extend(check(&source.file, layer, &parsed));
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(LintError::Violations(violations))
    }
}

fn check(file: &Utf8Path, layer: Layer, parsed: &syn::File) -> Vec<Violation> {
    let rules = layer.rules();
    let mut collector = PathCollector::default();
    collector.visit_file(parsed);

    let mut messages = BTreeSet::new();
    for segments in &collector.paths {
        let Some(first) = segments.first().map(String::as_str) else {
            continue;
        };
        if let Some(module) = internal_root(segments).filter(|root| rules.modules.contains(root)) {
            messages.insert(format!("{} must not depend on crate::{module}", layer.dir()));
        } else if first == "std" {
            if let Some(module) = segments
                .get(1)
                .map(String::as_str)
                .filter(|module| rules.std_modules.contains(module))
            {
                messages.insert(format!("{} must not use std::{module}", layer.dir()));
            }
        } else if rules.crates.contains(&first) {
            messages.insert(format!(
                "{} must not depend on external crate `{first}`",
                layer.dir()
            ));
        }
    }

    messages
        .into_iter()
        .map(|message| Violation {
            file: file.to_path_buf(),
            message,
        })
        .collect()
}

/// First crate-internal module named by `segments`, if the path is internal.
fn internal_root(segments: &[String]) -> Option<&str> {
    let first = segments.first()?.as_str();
    if Layer::ALL.iter().any(|layer| layer.dir() == first) {
        return Some(first);
    }
    let skip = match first {
        "crate" | "self" | "super" => segments
            .iter()
            .position(|segment| !matches!(segment.as_str(), "crate" | "self" | "super"))?,
        CRATE_NAME => 1,
        _ => return None,
    };
    segments.get(skip).map(String::as_str)
}

#[derive(Default)]
struct PathCollector {
    paths: BTreeSet<Vec<String>>,
}

impl PathCollector {
    fn record_use(&mut self, tree: &syn::UseTree, prefix: &[String]) {
        let extend = |ident: &syn::Ident| {
            let mut segments = prefix.to_vec();
            segments.push(ident.to_string());
            segments
        };
        match tree {
            syn::UseTree::Path(path) => self.record_use(&path.tree, &extend(&path.ident)),
            syn::UseTree::Name(name) => {
                self.paths.insert(extend(&name.ident));
            }
            syn::UseTree::Rename(rename) => {
                self.paths.insert(extend(&rename.ident));
            }
            syn::UseTree::Glob(_) => {
                let mut segments = prefix.to_vec();
                segments.push("*".to_owned());
                self.paths.insert(segments);
            }
            syn::UseTree::Group(group) => {
                for item in &group.items {
                    self.record_use(item, prefix);
                }
            }
        }
    }
}

impl<'ast> Visit<'ast> for PathCollector {
    fn visit_path(&mut self, node: &'ast syn::Path) {
        let segments: Vec<_> = node
            .segments
            .iter()
            .map(|segment| segment.ident.to_string())
            .collect();
        if !segments.is_empty() {
            self.paths.insert(segments);
        }
        syn::visit::visit_path(self, node);
    }

    fn visit_item_use(&mut self, node: &'ast syn::ItemUse) {
        self.record_use(&node.tree, &[]);
    }
}

fn io_error(path: &Utf8Path, err: &std::io::Error) -> LintError {
    LintError::Io {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

fn collect_sources(src_dir: &Utf8Path) -> Result<Vec<LintSource>, LintError> {
    let root = Dir::open_ambient_dir(src_dir, ambient_authority())
        .map_err(|err| io_error(src_dir, &err))?;
    let mut sources = Vec::new();
    for layer in Layer::ALL {
        let relative = Utf8PathBuf::from(layer.dir());
        if root.is_dir(&relative) {
            walk(&root, &relative, &mut sources)?;
        }
    }
    Ok(sources)
}

fn walk(root: &Dir, relative: &Utf8Path, sources: &mut Vec<LintSource>) -> Result<(), LintError> {
    let entries = root
        .read_dir(relative)
        .map_err(|err| io_error(relative, &err))?;
    for item in entries {
        let entry = item.map_err(|err| io_error(relative, &err))?;
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        let path = relative.join(name);
        let file_type = entry.file_type().map_err(|err| io_error(&path, &err))?;
        if file_type.is_dir() {
            walk(root, &path, sources)?;
        } else if path.extension() == Some("rs") {
            let contents = root
                .read_to_string(&path)
                .map_err(|err| io_error(&path, &err))?;
            sources.push(LintSource {
                file: path,
                contents,
            });
        }
    }
    Ok(())
}
