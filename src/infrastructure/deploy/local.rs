//! Local Release Destination
//!
//! Publishes into `{public}/apos-frontend/releases/{id}/{ns}` on the local
//! disk. The release is staged in a temporary directory next to its final
//! location and renamed into place, so a half-copied release is never
//! visible.

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::ports::{
    release_path, DeployedRelease, DestinationError, ReleaseDestination, ReleaseSource,
};
use crate::infrastructure::fs::{copy_dir, remove_dir_if_exists};

use super::copy_source_maps;

pub struct LocalReleaseDestination {
    /// The project's `public/` directory
    public_root: PathBuf,
}

impl LocalReleaseDestination {
    pub fn new(public_root: impl Into<PathBuf>) -> Self {
        Self {
            public_root: public_root.into(),
        }
    }

    pub fn for_project(project_root: &Path) -> Self {
        Self::new(project_root.join("public"))
    }

    fn target(&self, release_id: &str, namespace: &str) -> PathBuf {
        self.public_root.join(release_path(release_id, namespace))
    }
}

impl ReleaseDestination for LocalReleaseDestination {
    fn display_name(&self) -> String {
        self.public_root.display().to_string()
    }

    fn release_location(&self, release_id: &str, namespace: &str) -> String {
        self.target(release_id, namespace).display().to_string()
    }

    fn publish(&self, source: &ReleaseSource<'_>) -> Result<DeployedRelease, DestinationError> {
        let target = self.target(source.release_id, source.namespace);
        let parent = target.parent().ok_or_else(|| {
            DestinationError::NotAvailable(format!("{} has no parent", target.display()))
        })?;
        fs::create_dir_all(parent)?;

        let staging = tempfile::Builder::new()
            .prefix(".release-")
            .tempdir_in(parent)?;
        let mut files = copy_dir(source.bundle_dir, staging.path())?;
        if let Some(maps) = source.source_maps {
            files += copy_source_maps(maps, staging.path())?;
        }

        remove_dir_if_exists(&target)?;
        let staged = staging.into_path();
        if let Err(e) = fs::rename(&staged, &target) {
            let _ = fs::remove_dir_all(&staged);
            return Err(e.into());
        }

        Ok(DeployedRelease {
            release_id: source.release_id.to_string(),
            location: target.display().to_string(),
            files,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn bundle_dir(root: &Path) -> PathBuf {
        let dir = root.join("public/apos-frontend/default");
        fs::create_dir_all(dir.join("modules/article")).unwrap();
        fs::write(dir.join("apos-module-bundle.js"), "js").unwrap();
        fs::write(dir.join("modules/article/logo.png"), "png").unwrap();
        dir
    }

    #[test]
    fn publishes_release_directory() {
        let dir = tempdir().unwrap();
        let bundles = bundle_dir(dir.path());
        let destination = LocalReleaseDestination::for_project(dir.path());

        let deployed = destination
            .publish(&ReleaseSource {
                release_id: "2024-01-01",
                namespace: "default",
                bundle_dir: &bundles,
                source_maps: None,
            })
            .unwrap();

        let target = dir.path().join("public/apos-frontend/releases/2024-01-01/default");
        assert_eq!(deployed.files, 2);
        assert_eq!(deployed.location, target.display().to_string());
        assert!(target.join("apos-module-bundle.js").exists());
        assert!(target.join("modules/article/logo.png").exists());
    }

    #[test]
    fn republishing_replaces_previous_release() {
        let dir = tempdir().unwrap();
        let bundles = bundle_dir(dir.path());
        let destination = LocalReleaseDestination::for_project(dir.path());
        let target = PathBuf::from(destination.release_location("r1", "default"));
        fs::create_dir_all(&target).unwrap();
        fs::write(target.join("stale.js"), "old").unwrap();

        destination
            .publish(&ReleaseSource {
                release_id: "r1",
                namespace: "default",
                bundle_dir: &bundles,
                source_maps: None,
            })
            .unwrap();

        assert!(!target.join("stale.js").exists());
        assert!(target.join("apos-module-bundle.js").exists());
        // No staging directories left behind
        let leftovers: Vec<_> = fs::read_dir(target.parent().unwrap())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with(".release-"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn source_maps_are_published_alongside() {
        let dir = tempdir().unwrap();
        let bundles = bundle_dir(dir.path());
        let maps = dir.path().join("build");
        fs::create_dir_all(maps.join("apos")).unwrap();
        fs::write(maps.join("apos/apos.js.map"), "{}").unwrap();
        fs::write(maps.join("apos/apos-import.js"), "glue").unwrap();

        let destination = LocalReleaseDestination::for_project(dir.path());
        let deployed = destination
            .publish(&ReleaseSource {
                release_id: "r2",
                namespace: "default",
                bundle_dir: &bundles,
                source_maps: Some(&maps),
            })
            .unwrap();

        let target = PathBuf::from(deployed.location);
        assert!(target.join("apos/apos.js.map").exists());
        assert!(!target.join("apos/apos-import.js").exists());
        assert_eq!(deployed.files, 3);
    }
}
