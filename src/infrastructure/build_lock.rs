//! Cross-process build lock
//!
//! Two processes building the same namespace would overwrite each other's
//! glue files and bundles. Holding an exclusive lock on
//! `{build_dir}/.build.lock` serializes them.

use std::fs::{self, File};
use std::io;
use std::path::Path;

use fs2::FileExt;

pub const LOCK_FILE: &str = ".build.lock";

/// Released when dropped.
#[derive(Debug)]
pub struct BuildLock {
    file: File,
}

impl BuildLock {
    /// Block until the lock for `build_dir` is ours.
    pub fn acquire(build_dir: &Path) -> io::Result<Self> {
        fs::create_dir_all(build_dir)?;
        let file = File::create(build_dir.join(LOCK_FILE))?;
        file.lock_exclusive()?;
        Ok(Self { file })
    }

    /// `Ok(None)` when another process holds the lock.
    pub fn try_acquire(build_dir: &Path) -> io::Result<Option<Self>> {
        fs::create_dir_all(build_dir)?;
        let file = File::create(build_dir.join(LOCK_FILE))?;
        match file.try_lock_exclusive() {
            Ok(()) => Ok(Some(Self { file })),
            Err(e) if e.kind() == fs2::lock_contended_error().kind() => Ok(None),
            Err(e) => Err(e),
        }
    }
}

impl Drop for BuildLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}
