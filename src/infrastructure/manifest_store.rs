//! Saved Manifest Store
//!
//! Persists `.manifest.json` in the bundle directory so a later process
//! can serve the last build without rebuilding.

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::entities::SavedManifest;
use crate::error::{AssetError, AssetResult};
use crate::infrastructure::fs::atomic_write;

pub struct ManifestStore {
    path: PathBuf,
}

impl ManifestStore {
    pub fn new(bundle_dir: &Path) -> Self {
        Self {
            path: SavedManifest::path_in(bundle_dir),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `Ok(None)` when no build was ever saved here.
    pub fn load(&self) -> AssetResult<Option<SavedManifest>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.error(e)),
        };
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| self.error(e))
    }

    pub fn save(&self, manifest: &SavedManifest) -> AssetResult<()> {
        let content = serde_json::to_string_pretty(manifest)?;
        atomic_write(&self.path, content.as_bytes()).map_err(|e| self.error(e))
    }

    fn error(&self, err: impl std::fmt::Display) -> AssetError {
        AssetError::Manifest {
            path: self.path.clone(),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{ManifestFiles, ManifestRecord};
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn sample() -> SavedManifest {
        SavedManifest::new(
            1_700_000_000_000,
            vec![ManifestRecord {
                name: "apos".into(),
                root: PathBuf::from("/p/data/temp/default/apos"),
                files: ManifestFiles {
                    js: vec!["apos.js".into()],
                    dynamic_imports: vec!["apos-chunk.js".into()],
                    ..Default::default()
                },
                bundles: vec!["apos-module-bundle.js".into()],
                dev_server_url: None,
            }],
        )
    }

    #[test]
    fn missing_manifest_is_none() {
        let dir = tempdir().unwrap();
        assert_eq!(ManifestStore::new(dir.path()).load().unwrap(), None);
    }

    #[test]
    fn saved_manifest_loads_back_identically() {
        let dir = tempdir().unwrap();
        let store = ManifestStore::new(&dir.path().join("default"));
        store.save(&sample()).unwrap();
        assert_eq!(store.load().unwrap(), Some(sample()));
        assert!(store.path().ends_with(".manifest.json"));
    }

    #[test]
    fn file_uses_documented_keys() {
        let dir = tempdir().unwrap();
        let store = ManifestStore::new(dir.path());
        store.save(&sample()).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(json["ts"], 1_700_000_000_000i64);
        assert_eq!(json["manifest"][0]["files"]["dynamicImports"][0], "apos-chunk.js");
        assert_eq!(json["manifest"][0]["bundles"][0], "apos-module-bundle.js");
    }

    #[test]
    fn corrupt_manifest_is_a_manifest_error() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(".manifest.json"), "{ nope").unwrap();
        let err = ManifestStore::new(dir.path()).load().unwrap_err();
        assert!(matches!(err, AssetError::Manifest { .. }));
    }
}
