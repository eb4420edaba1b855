//! Repo-local lint keeping the ClickBeard backend hexagonal.
//!
//! The backend splits into `domain` (entities, services, ports), `inbound`
//! adapters (HTTP) and `outbound` adapters (PostgreSQL, bcrypt, JWT, the
//! in-memory store). This crate parses every file under those three roots
//! and reports imports that cross a boundary:
//!
//! - `domain` must not reach adapters, the web framework, the ORM or the
//!   credential crates
//! - `inbound` must not reach `outbound` or the ORM
//! - `outbound` must not reach `inbound` or the web framework
//!
//! Run it with `cargo run -p architecture-lint`.

use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use syn::visit::Visit;

/// Name under which integration tests and binaries import the backend.
const CRATE_NAME: &str = "clickbeard";

const WEB_CRATES: &[&str] = &["actix", "actix_http", "actix_web", "utoipa_swagger_ui"];
const STORAGE_CRATES: &[&str] = &["diesel", "diesel_async", "diesel_migrations"];
const CREDENTIAL_CRATES: &[&str] = &["bcrypt", "jsonwebtoken"];

/// A single boundary violation discovered by the linter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// File path relative to `backend/src`.
    pub file: PathBuf,
    /// Which rule was broken.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.file.display(), self.message)
    }
}

/// Failure modes returned by the architecture lint.
#[derive(Debug)]
pub enum ArchitectureLintError {
    /// Filesystem traversal or reading failed.
    Io(io::Error),
    /// A file could not be parsed or placed in a layer.
    Parse { file: PathBuf, message: String },
    /// One or more boundary violations were found.
    Violations(Vec<Violation>),
}

impl fmt::Display for ArchitectureLintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "I/O error while linting architecture: {err}"),
            Self::Parse { file, message } => {
                write!(f, "cannot lint {}: {message}", file.display())
            }
            Self::Violations(violations) => {
                writeln!(f, "{} boundary violation(s):", violations.len())?;
                violations
                    .iter()
                    .try_for_each(|violation| writeln!(f, "- {violation}"))
            }
        }
    }
}

impl std::error::Error for ArchitectureLintError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse { .. } | Self::Violations(_) => None,
        }
    }
}

impl From<io::Error> for ArchitectureLintError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

/// A Rust source file to be linted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintSource {
    /// Path relative to `backend/src`.
    pub file: PathBuf,
    pub contents: String,
}

/// Lint the backend crate sources on disk.
///
/// `backend_dir` must be the `backend/` directory at the repository root.
pub fn lint_backend_sources(backend_dir: &Path) -> Result<(), ArchitectureLintError> {
    let src_dir = backend_dir.join("src");
    let mut sources = Vec::new();
    for layer in Layer::ALL {
        let dir = src_dir.join(layer.root());
        if dir.is_dir() {
            collect_sources(&src_dir, &dir, &mut sources)?;
        }
    }
    lint_sources(&sources)
}

/// Lint the provided sources.
pub fn lint_sources(sources: &[LintSource]) -> Result<(), ArchitectureLintError> {
    let mut violations = Vec::new();
    for source in sources {
        let layer = Layer::of(&source.file).ok_or_else(|| ArchitectureLintError::Parse {
            file: source.file.clone(),
            message: "not under domain/, inbound/ or outbound/".to_owned(),
        })?;
        let parsed =
            syn::parse_file(&source.contents).map_err(|err| ArchitectureLintError::Parse {
                file: source.file.clone(),
                message: err.to_string(),
            })?;
        violations.extend(layer.check(&source.file, &parsed));
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ArchitectureLintError::Violations(violations))
    }
}

/// Hexagon layer inferred from the first path component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layer {
    Domain,
    Inbound,
    Outbound,
}

impl Layer {
    const ALL: [Self; 3] = [Self::Domain, Self::Inbound, Self::Outbound];

    const fn root(self) -> &'static str {
        match self {
            Self::Domain => "domain",
            Self::Inbound => "inbound",
            Self::Outbound => "outbound",
        }
    }

    fn of(relative_path: &Path) -> Option<Self> {
        let first = relative_path.components().next()?.as_os_str().to_str()?;
        Self::ALL.into_iter().find(|layer| layer.root() == first)
    }

    fn forbidden_layers(self) -> &'static [Self] {
        match self {
            Self::Domain => &[Self::Inbound, Self::Outbound],
            Self::Inbound => &[Self::Outbound],
            Self::Outbound => &[Self::Inbound],
        }
    }

    fn forbidden_crates(self) -> Vec<&'static str> {
        let groups: &[&[&str]] = match self {
            Self::Domain => &[WEB_CRATES, &["utoipa"], STORAGE_CRATES, CREDENTIAL_CRATES],
            Self::Inbound => &[STORAGE_CRATES],
            Self::Outbound => &[WEB_CRATES],
        };
        groups.iter().flat_map(|group| group.iter().copied()).collect()
    }

    fn check(self, file: &Path, parsed: &syn::File) -> Vec<Violation> {
        let mut collector = PathCollector::default();
        collector.visit_file(parsed);

        let forbidden_crates = self.forbidden_crates();
        let mut messages = BTreeSet::new();
        for segments in &collector.paths {
            if let Some(target) = internal_root(segments)
                .and_then(|root| self.forbidden_layers().iter().find(|l| l.root() == root))
            {
                messages.insert(format!(
                    "{} module must not depend on crate::{}",
                    self.root(),
                    target.root()
                ));
            }
            if let Some(krate) =
                external_root(segments).filter(|root| forbidden_crates.contains(root))
            {
                messages.insert(format!(
                    "{} module must not depend on external crate `{krate}`",
                    self.root()
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
}

fn is_relative(segment: &str) -> bool {
    matches!(segment, "crate" | "self" | "super")
}

/// The backend module a path points into, if it is internal.
fn internal_root(segments: &[String]) -> Option<&str> {
    let first = segments.first()?.as_str();
    if Layer::ALL.iter().any(|layer| layer.root() == first) {
        return Some(first);
    }
    let index = if is_relative(first) {
        segments.iter().position(|segment| !is_relative(segment))?
    } else if first == CRATE_NAME {
        1
    } else {
        return None;
    };
    segments.get(index).map(String::as_str)
}

/// The external crate a path starts with, if any.
fn external_root(segments: &[String]) -> Option<&str> {
    let root = segments.first()?.as_str();
    (!is_relative(root) && root != CRATE_NAME).then_some(root)
}

#[derive(Default)]
struct PathCollector {
    paths: BTreeSet<Vec<String>>,
}

impl PathCollector {
    fn record_use_tree(&mut self, tree: &syn::UseTree, mut prefix: Vec<String>) {
        match tree {
            syn::UseTree::Path(path) => {
                prefix.push(path.ident.to_string());
                self.record_use_tree(&path.tree, prefix);
            }
            syn::UseTree::Name(syn::UseName { ident })
            | syn::UseTree::Rename(syn::UseRename { ident, .. }) => {
                prefix.push(ident.to_string());
                self.paths.insert(prefix);
            }
            syn::UseTree::Glob(_) => {
                prefix.push("*".to_owned());
                self.paths.insert(prefix);
            }
            syn::UseTree::Group(group) => {
                for item in &group.items {
                    self.record_use_tree(item, prefix.clone());
                }
            }
        }
    }
}

impl<'ast> Visit<'ast> for PathCollector {
    fn visit_path(&mut self, node: &'ast syn::Path) {
        let segments: Vec<String> = node
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
        self.record_use_tree(&node.tree, Vec::new());
    }
}

fn collect_sources(
    src_root: &Path,
    current: &Path,
    sources: &mut Vec<LintSource>,
) -> Result<(), ArchitectureLintError> {
    for entry in fs::read_dir(current)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_sources(src_root, &path, sources)?;
            continue;
        }
        if path.extension().and_then(|ext| ext.to_str()) != Some("rs") {
            continue;
        }

        let file = path
            .strip_prefix(src_root)
            .map_err(|err| ArchitectureLintError::Parse {
                file: path.clone(),
                message: err.to_string(),
            })?
            .to_path_buf();
        let contents = fs::read_to_string(&path)?;
        sources.push(LintSource { file, contents });
    }
    Ok(())
}
