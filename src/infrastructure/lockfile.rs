//! Dependency lock file
//!
//! The installed dependency set is identified by the package manager's
//! lock file. Its contents feed the cache key; its mtime decides whether
//! the admin UI build is stale.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::SystemTime;

/// Lock files, by priority
pub const LOCK_FILES: [&str; 3] = ["package-lock.json", "yarn.lock", "pnpm-lock.yaml"];

/// First lock file present in `project_root`
pub fn find_lock_file(project_root: &Path) -> Option<PathBuf> {
    LOCK_FILES
        .iter()
        .map(|name| project_root.join(name))
        .find(|path| path.is_file())
}

/// Lock file of one project, contents read at most once.
#[derive(Debug)]
pub struct DependencyLock {
    path: Option<PathBuf>,
    contents: OnceLock<String>,
}

impl DependencyLock {
    pub fn discover(project_root: &Path) -> Self {
        Self {
            path: find_lock_file(project_root),
            contents: OnceLock::new(),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// File contents; empty when there is no lock file or it can't be read
    pub fn contents(&self) -> &str {
        self.contents.get_or_init(|| {
            self.path
                .as_ref()
                .and_then(|path| fs::read_to_string(path).ok())
                .unwrap_or_default()
        })
    }

    /// Current mtime (not cached: installs happen while watching)
    pub fn modified(&self) -> Option<SystemTime> {
        let path = self.path.as_ref()?;
        fs::metadata(path).and_then(|m| m.modified()).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn npm_lock_wins_over_yarn() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("yarn.lock"), "yarn").unwrap();
        fs::write(dir.path().join("package-lock.json"), "npm").unwrap();
        let lock = DependencyLock::discover(dir.path());
        assert_eq!(lock.path(), Some(dir.path().join("package-lock.json").as_path()));
        assert_eq!(lock.contents(), "npm");
    }

    #[test]
    fn contents_are_read_once() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pnpm-lock.yaml");
        fs::write(&path, "v1").unwrap();
        let lock = DependencyLock::discover(dir.path());
        assert_eq!(lock.contents(), "v1");
        fs::write(&path, "v2").unwrap();
        assert_eq!(lock.contents(), "v1");
        assert!(lock.modified().is_some());
    }

    #[test]
    fn missing_lock_file_is_empty() {
        let dir = tempdir().unwrap();
        let lock = DependencyLock::discover(dir.path());
        assert!(lock.path().is_none());
        assert_eq!(lock.contents(), "");
        assert!(lock.modified().is_none());
    }
}
