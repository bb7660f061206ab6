//! Bundler cache directories

use std::path::Path;

use crate::domain::value_objects::CacheMeta;

use super::fs::{atomic_write, empty_dir};

/// Create the cache location and stamp it with the current time.
///
/// The stamp lets external cleanup drop cache directories nobody uses.
pub fn touch_cache(meta: &CacheMeta) -> std::io::Result<()> {
    std::fs::create_dir_all(&meta.location)?;
    let now = chrono::Utc::now().timestamp_millis();
    atomic_write(&meta.timestamp_path(), now.to_string().as_bytes())
}

/// Remove every cache directory under `base`; returns how many entries went.
pub fn clear_cache(base: &Path) -> std::io::Result<usize> {
    empty_dir(base)
}
