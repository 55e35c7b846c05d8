//! Keeps the field cipher behind the persistence adapter.
//!
//! Only code under `outbound/persistence/` (plus the binary's composition
//! root in `main.rs` and `server/`) may name the `field_cipher` crate. Domain
//! services and HTTP handlers see plaintext clients and nothing else.

use std::fs;
use std::path::{Path, PathBuf};

use syn::visit::{self, Visit};

/// Crate whose use is fenced in.
pub const GUARDED_CRATE: &str = "field_cipher";

/// Source-relative prefixes allowed to reference [`GUARDED_CRATE`].
pub const ALLOWED_PREFIXES: &[&str] = &["outbound/persistence", "server", "main.rs"];

/// One forbidden reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub file: PathBuf,
    pub reference: String,
}

#[derive(Debug, thiserror::Error)]
pub enum LintError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: syn::Error,
    },
    #[error("{} forbidden reference(s) to `field_cipher`:\n{}", .0.len(), render(.0))]
    Violations(Vec<Violation>),
}

fn render(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| format!("  {}: {}", v.file.display(), v.reference))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Whether a file, relative to the source root, may use the guarded crate.
#[must_use]
pub fn is_allowed(relative: &Path) -> bool {
    ALLOWED_PREFIXES
        .iter()
        .any(|prefix| relative.starts_with(prefix))
}

#[derive(Default)]
struct References(Vec<String>);

impl References {
    fn root_tree(&mut self, tree: &syn::UseTree) {
        match tree {
            syn::UseTree::Path(path) if path.ident == GUARDED_CRATE => {
                self.0.push(format!("use {GUARDED_CRATE}::..."));
            }
            syn::UseTree::Name(name) if name.ident == GUARDED_CRATE => {
                self.0.push(format!("use {GUARDED_CRATE}"));
            }
            syn::UseTree::Rename(rename) if rename.ident == GUARDED_CRATE => {
                self.0.push(format!("use {GUARDED_CRATE} as {}", rename.rename));
            }
            syn::UseTree::Group(group) => group.items.iter().for_each(|item| self.root_tree(item)),
            _ => {}
        }
    }
}

impl<'ast> Visit<'ast> for References {
    fn visit_item_use(&mut self, item: &'ast syn::ItemUse) {
        self.root_tree(&item.tree);
    }

    fn visit_item_extern_crate(&mut self, item: &'ast syn::ItemExternCrate) {
        if item.ident == GUARDED_CRATE {
            self.0.push(format!("extern crate {GUARDED_CRATE}"));
        }
    }

    fn visit_path(&mut self, path: &'ast syn::Path) {
        let qualified = path.segments.len() > 1;
        if qualified && path.segments.first().is_some_and(|s| s.ident == GUARDED_CRATE) {
            let rendered = path
                .segments
                .iter()
                .map(|s| s.ident.to_string())
                .collect::<Vec<_>>()
                .join("::");
            self.0.push(rendered);
        }
        visit::visit_path(self, path);
    }
}

/// List every reference to [`GUARDED_CRATE`] in one source file.
///
/// # Errors
///
/// Returns the parser error when `source` is not valid Rust.
pub fn references_in(source: &str) -> Result<Vec<String>, syn::Error> {
    let file = syn::parse_file(source)?;
    let mut found = References::default();
    found.visit_file(&file);
    Ok(found.0)
}

fn rust_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), LintError> {
    let io = |source| LintError::Io {
        path: dir.to_path_buf(),
        source,
    };
    for entry in fs::read_dir(dir).map_err(io)? {
        let path = entry.map_err(io)?.path();
        if path.is_dir() {
            rust_files(&path, out)?;
        } else if path.extension().is_some_and(|ext| ext == "rs") {
            out.push(path);
        }
    }
    Ok(())
}

/// Check every `.rs` file under `src_root`.
///
/// # Errors
///
/// Returns [`LintError::Violations`] listing each forbidden reference, or an
/// I/O or parse error for the first file that could not be inspected.
pub fn lint_source_tree(src_root: &Path) -> Result<(), LintError> {
    let mut files = Vec::new();
    rust_files(src_root, &mut files)?;
    files.sort();

    let mut violations = Vec::new();
    for path in files {
        let relative = path.strip_prefix(src_root).unwrap_or(&path).to_path_buf();
        if is_allowed(&relative) {
            continue;
        }
        let source = fs::read_to_string(&path).map_err(|source| LintError::Io {
            path: path.clone(),
            source,
        })?;
        let references = references_in(&source).map_err(|source| LintError::Parse {
            path: path.clone(),
            source,
        })?;
        violations.extend(references.into_iter().map(|reference| Violation {
            file: relative.clone(),
            reference,
        }));
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(LintError::Violations(violations))
    }
}
