//! Pending change pool
//!
//! Producers (the file watcher, a build module's own watcher) push
//! project-relative paths; each rebuild job takes everything at once.

use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone, Default)]
pub struct ChangePool {
    paths: Arc<Mutex<Vec<String>>>,
}

impl ChangePool {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<String>> {
        match self.paths.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    pub fn push(&self, path: impl Into<String>) {
        self.lock().push(path.into());
    }

    pub fn extend<I: IntoIterator<Item = String>>(&self, paths: I) {
        self.lock().extend(paths);
    }

    /// Take every pending path, first occurrence order, duplicates removed.
    pub fn drain(&self) -> Vec<String> {
        let taken = std::mem::take(&mut *self.lock());
        let mut unique: Vec<String> = Vec::with_capacity(taken.len());
        for path in taken {
            if !unique.contains(&path) {
                unique.push(path);
            }
        }
        unique
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
