//! Release destinations

mod local;
mod remote;

use std::fs;
use std::path::Path;

use crate::infrastructure::fs::list_files;

pub use local::LocalReleaseDestination;
pub use remote::{RemoteReleaseDestination, SOURCE_MAPS_DIR};

/// Copy `*.map` files only, keeping their relative layout.
fn copy_source_maps(root: &Path, target: &Path) -> std::io::Result<usize> {
    let mut copied = 0;
    for rel in list_files(root)?.iter().filter(|f| f.ends_with(".map")) {
        let to = target.join(rel);
        if let Some(parent) = to.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(root.join(rel), &to)?;
        copied += 1;
    }
    Ok(copied)
}
