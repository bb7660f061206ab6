//! Module source entities
//!
//! A module's inheritance chain as the asset pipeline sees it, and the
//! per-link scan of its `ui/` directory.

use std::path::{Path, PathBuf};

use serde::Serialize;

/// Prefix used for project-level improvements of package modules.
pub const LOCAL_ALIAS_PREFIX: &str = "my-";

/// One link in a module's inheritance chain, as reported by the resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainLink {
    /// Raw registered name (possibly `my-` aliased)
    pub id: String,
    /// Canonical module name
    pub name: String,
    /// Module directory (the parent of `ui/` and `public/`)
    pub dirname: PathBuf,
    /// Canonical import path prefix, e.g. `Modules/article/`
    pub import_alias: String,
    pub is_from_package: bool,
    pub is_symlinked: bool,
}

impl ChainLink {
    pub fn new(id: impl Into<String>, dirname: impl Into<PathBuf>) -> Self {
        let id = id.into();
        let name = canonical_module_name(&id).to_string();
        let import_alias = format!("Modules/{}/", name);
        Self {
            id,
            name,
            dirname: dirname.into(),
            import_alias,
            is_from_package: false,
            is_symlinked: false,
        }
    }

    pub fn from_package(mut self, is_symlinked: bool) -> Self {
        self.is_from_package = true;
        self.is_symlinked = is_symlinked;
        self
    }

    /// The link's `ui/` source directory
    pub fn ui_dir(&self) -> PathBuf {
        self.dirname.join("ui")
    }

    /// The link's static `public/` directory
    pub fn public_dir(&self) -> PathBuf {
        self.dirname.join("public")
    }
}

/// Strip the project-local alias prefix from a registered module name.
pub fn canonical_module_name(id: &str) -> &str {
    id.strip_prefix(LOCAL_ALIAS_PREFIX).unwrap_or(id)
}

/// Read-only scan snapshot of one chain link's `ui/` directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleSourceRecord {
    pub id: String,
    pub name: String,
    /// Absolute path of the link's `ui/` directory
    pub dirname: PathBuf,
    pub import_alias: String,
    pub is_from_package: bool,
    pub is_symlinked: bool,
    pub exists: bool,
    /// Paths relative to `ui/`, `/`-separated, sorted byte-wise
    pub files: Vec<String>,
}

impl ModuleSourceRecord {
    /// Build a record for `link` from an already listed set of files.
    pub fn from_link(link: &ChainLink, exists: bool, mut files: Vec<String>) -> Self {
        files.sort();
        files.dedup();
        Self {
            id: link.id.clone(),
            name: link.name.clone(),
            dirname: link.ui_dir(),
            import_alias: link.import_alias.clone(),
            is_from_package: link.is_from_package,
            is_symlinked: link.is_symlinked,
            exists,
            files,
        }
    }

    /// Absolute path of a file listed in this record
    pub fn absolute(&self, file: &str) -> PathBuf {
        self.dirname.join(file)
    }

    /// Whether `file` (relative to `ui/`) is part of this record
    pub fn contains(&self, file: &str) -> bool {
        self.files.binary_search_by(|f| f.as_str().cmp(file)).is_ok()
    }

    /// Relative path of `path` inside this record's directory, if contained.
    pub fn relative_of(&self, path: &Path) -> Option<String> {
        let rel = path.strip_prefix(&self.dirname).ok()?;
        let parts: Vec<String> = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        if parts.is_empty() {
            return None;
        }
        Some(parts.join("/"))
    }
}
