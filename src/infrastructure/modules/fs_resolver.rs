//! Filesystem module resolver
//!
//! Resolves `[[modules]]` declarations against the project tree:
//! `node_modules/` for package-provided modules, `modules/` for project code.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::config::ModuleDeclaration;
use crate::domain::entities::{ChainLink, LOCAL_ALIAS_PREFIX};
use crate::domain::ports::{ModuleResolver, SymlinkedPackage};
use crate::error::{AssetError, AssetResult};

pub struct FsModuleResolver {
    project_root: PathBuf,
    declarations: Vec<ModuleDeclaration>,
    /// Package root -> is a symlink
    symlink_cache: Mutex<HashMap<PathBuf, bool>>,
}

impl FsModuleResolver {
    pub fn new(project_root: impl Into<PathBuf>, declarations: Vec<ModuleDeclaration>) -> Self {
        Self {
            project_root: project_root.into(),
            declarations,
            symlink_cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    fn node_modules(&self) -> PathBuf {
        self.project_root.join("node_modules")
    }

    fn declaration(&self, name: &str) -> Option<&ModuleDeclaration> {
        self.declarations.iter().find(|d| d.name == name)
    }

    fn package_dir(&self, name: &str, declaration: Option<&ModuleDeclaration>) -> PathBuf {
        match declaration.and_then(|d| d.package.as_deref()) {
            Some(package) => self.node_modules().join(package).join("modules").join(name),
            None => self.node_modules().join(name),
        }
    }

    /// Whether the package containing `dir` is linked into `node_modules`.
    fn is_symlinked(&self, dir: &Path) -> bool {
        let Some(root) = package_root(&self.node_modules(), dir) else {
            return false;
        };
        let mut cache = match self.symlink_cache.lock() {
            Ok(cache) => cache,
            Err(poisoned) => poisoned.into_inner(),
        };
        *cache.entry(root.clone()).or_insert_with(|| is_symlink(&root))
    }

    fn resolve(&self, name: &str, stack: &mut Vec<String>) -> AssetResult<Vec<ChainLink>> {
        if stack.iter().any(|n| n == name) {
            let mut chain = stack.clone();
            chain.push(name.to_string());
            return Err(AssetError::ModuleCycle {
                chain: chain.join(" -> "),
            });
        }
        stack.push(name.to_string());

        let declaration = self.declaration(name);
        let mut links = match declaration.and_then(|d| d.extend.as_deref()) {
            Some(base) => self.resolve(base, stack)?,
            None => Vec::new(),
        };

        let package_dir = self.package_dir(name, declaration);
        let from_package = package_dir.is_dir();
        if from_package {
            let symlinked = self.is_symlinked(&package_dir);
            links.push(ChainLink::new(name, package_dir).from_package(symlinked));
        }

        let project_dir = self.project_root.join("modules").join(name);
        if project_dir.is_dir() || !from_package {
            let id = if from_package {
                format!("{}{}", LOCAL_ALIAS_PREFIX, name)
            } else {
                name.to_string()
            };
            links.push(ChainLink::new(id, project_dir));
        }

        stack.pop();
        Ok(links)
    }
}

impl ModuleResolver for FsModuleResolver {
    fn module_names(&self) -> Vec<String> {
        self.declarations.iter().map(|d| d.name.clone()).collect()
    }

    fn chain(&self, name: &str) -> AssetResult<Vec<ChainLink>> {
        self.resolve(name, &mut Vec::new())
    }

    fn symlinked_packages(&self) -> Vec<SymlinkedPackage> {
        let mut packages = Vec::new();
        let Ok(entries) = fs::read_dir(self.node_modules()) else {
            return packages;
        };
        for entry in entries.flatten() {
            let name = entry.file_name().to_string_lossy().into_owned();
            let path = entry.path();
            if name.starts_with('@') && path.is_dir() && !is_symlink(&path) {
                let Ok(scoped) = fs::read_dir(&path) else {
                    continue;
                };
                for inner in scoped.flatten() {
                    if is_symlink(&inner.path()) {
                        packages.push(SymlinkedPackage {
                            name: format!("{}/{}", name, inner.file_name().to_string_lossy()),
                            path: inner.path(),
                        });
                    }
                }
            } else if is_symlink(&path) {
                packages.push(SymlinkedPackage { name, path });
            }
        }
        packages.sort_by(|a, b| a.name.cmp(&b.name));
        packages
    }
}

fn is_symlink(path: &Path) -> bool {
    fs::symlink_metadata(path)
        .map(|m| m.file_type().is_symlink())
        .unwrap_or(false)
}

/// `node_modules/{pkg}` or `node_modules/@scope/{pkg}` containing `dir`
fn package_root(node_modules: &Path, dir: &Path) -> Option<PathBuf> {
    let rel = dir.strip_prefix(node_modules).ok()?;
    let mut components = rel.components();
    let first = components.next()?.as_os_str().to_string_lossy().into_owned();
    let mut root = node_modules.join(&first);
    if first.starts_with('@') {
        root = root.join(components.next()?.as_os_str());
    }
    Some(root)
}
