//! Build manifest entities
//!
//! What a bundler or build module reports for each entrypoint, and the
//! persisted `.manifest.json` shape used to reuse a build across restarts.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::entrypoint::Entrypoint;

/// Output files of one entrypoint, relative to its manifest root.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestFiles {
    #[serde(default)]
    pub js: Vec<String>,
    #[serde(default)]
    pub css: Vec<String>,
    /// Chunks shared between entrypoints
    #[serde(default)]
    pub imports: Vec<String>,
    /// Lazily loaded chunks
    #[serde(default)]
    pub dynamic_imports: Vec<String>,
    /// Fonts, images and other static output
    #[serde(default)]
    pub assets: Vec<String>,
}

impl ManifestFiles {
    pub fn is_empty(&self) -> bool {
        self.js.is_empty()
            && self.css.is_empty()
            && self.imports.is_empty()
            && self.dynamic_imports.is_empty()
            && self.assets.is_empty()
    }

    /// Files copied verbatim next to the scene bundles
    pub fn copied(&self) -> impl Iterator<Item = &String> {
        self.imports
            .iter()
            .chain(self.dynamic_imports.iter())
            .chain(self.assets.iter())
    }
}

/// Build output description attached to an entrypoint after a build.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntrypointManifest {
    pub root: PathBuf,
    #[serde(default)]
    pub files: ManifestFiles,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dev_server_url: Option<String>,
}

impl EntrypointManifest {
    pub fn new(root: impl Into<PathBuf>, files: ManifestFiles) -> Self {
        Self {
            root: root.into(),
            files,
            dev_server_url: None,
        }
    }

    pub fn resolve(&self, file: &str) -> PathBuf {
        self.root.join(file)
    }
}

/// Aggregate result of one build or dev server start.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BuildManifest {
    pub source_maps_root: Option<PathBuf>,
    pub dev_server_url: Option<String>,
    pub entrypoints: Vec<Entrypoint>,
}

impl BuildManifest {
    pub fn entrypoint(&self, name: &str) -> Option<&Entrypoint> {
        self.entrypoints.iter().find(|e| e.name == name)
    }

    /// Flatten into persisted records, skipping entrypoints without output.
    pub fn records(&self) -> Vec<ManifestRecord> {
        self.entrypoints
            .iter()
            .filter_map(|entry| {
                let manifest = entry.manifest.as_ref()?;
                Some(ManifestRecord {
                    name: entry.name.clone(),
                    root: manifest.root.clone(),
                    files: manifest.files.clone(),
                    bundles: entry.bundles.iter().cloned().collect(),
                    dev_server_url: manifest.dev_server_url.clone(),
                })
            })
            .collect()
    }
}

/// One entry of `.manifest.json` (also the shape external build modules report).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestRecord {
    pub name: String,
    pub root: PathBuf,
    #[serde(default)]
    pub files: ManifestFiles,
    #[serde(default)]
    pub bundles: Vec<String>,
    #[serde(default)]
    pub dev_server_url: Option<String>,
}

impl ManifestRecord {
    pub fn to_manifest(&self) -> EntrypointManifest {
        EntrypointManifest {
            root: self.root.clone(),
            files: self.files.clone(),
            dev_server_url: self.dev_server_url.clone(),
        }
    }
}

/// The persisted `.manifest.json` document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedManifest {
    /// Epoch milliseconds of the build that produced it
    pub ts: i64,
    pub manifest: Vec<ManifestRecord>,
}

impl SavedManifest {
    pub const FILE_NAME: &'static str = ".manifest.json";

    pub fn new(ts: i64, manifest: Vec<ManifestRecord>) -> Self {
        Self { ts, manifest }
    }

    pub fn path_in(bundle_dir: &Path) -> PathBuf {
        bundle_dir.join(Self::FILE_NAME)
    }

    /// Attach saved output to matching entrypoints (by name).
    ///
    /// Entrypoints without a saved record keep no manifest and are left out
    /// of bundle assembly. Returns the names that were hydrated.
    pub fn hydrate(&self, entrypoints: &mut [Entrypoint]) -> Vec<String> {
        let mut hydrated = Vec::new();
        for entry in entrypoints.iter_mut() {
            if let Some(record) = self.manifest.iter().find(|r| r.name == entry.name) {
                entry.manifest = Some(record.to_manifest());
                entry.bundles = record.bundles.iter().cloned().collect::<BTreeSet<_>>();
                hydrated.push(entry.name.clone());
            }
        }
        hydrated
    }
}
