//! External Build Module Port
//!
//! A project may hand the whole build to one external build module
//! (e.g. a Vite integration). At most one can be registered per process.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::entities::{BuildManifest, Entrypoint, ManifestRecord};
use crate::error::{AssetError, AssetResult};

/// Static facts a build module declares about itself.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BuildModuleDescriptor {
    pub name: String,
    /// Short name used in imports and configuration; required
    pub alias: Option<String>,
    /// Supports a development server
    pub dev_server: bool,
    /// Supports hot module replacement in dev server mode
    pub hmr: bool,
}

/// Everything a build module needs for one run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildRequest {
    pub namespace: String,
    pub project_root: PathBuf,
    pub build_dir: PathBuf,
    pub output_dir: PathBuf,
    pub entrypoints: Vec<Entrypoint>,
    /// Generated glue files per entrypoint, keyed by input extension
    pub entry_files: BTreeMap<String, BTreeMap<String, PathBuf>>,
    /// Relative changed paths, when the build is watch-triggered
    pub changes: Option<Vec<String>>,
    pub production: bool,
    pub source_maps: bool,
    pub dev_server: bool,
}

/// Manifest a build module reports back, keyed by entrypoint name.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportedBuild {
    #[serde(default)]
    pub source_maps_root: Option<PathBuf>,
    #[serde(default)]
    pub dev_server_url: Option<String>,
    #[serde(default)]
    pub entrypoints: Vec<ManifestRecord>,
}

impl ReportedBuild {
    /// Attach reported output to the requested entrypoints.
    ///
    /// Entrypoints the module did not report keep no manifest. A global dev
    /// server URL applies to every reported entrypoint lacking its own.
    pub fn fold_onto(self, requested: &[Entrypoint]) -> BuildManifest {
        let entrypoints = requested
            .iter()
            .cloned()
            .map(|mut entry| {
                entry.reset_build_state();
                if let Some(record) = self.entrypoints.iter().find(|r| r.name == entry.name) {
                    let mut manifest = record.to_manifest();
                    if manifest.dev_server_url.is_none() {
                        manifest.dev_server_url = self.dev_server_url.clone();
                    }
                    entry.manifest = Some(manifest);
                }
                entry
            })
            .collect();
        BuildManifest {
            source_maps_root: self.source_maps_root,
            dev_server_url: self.dev_server_url,
            entrypoints,
        }
    }
}

/// Receives changes detected by a build module that watches its own sources.
pub trait ChangeNotifier: Send + Sync {
    /// Queue a rebuild for these project-relative paths
    fn notify_changes(&self, paths: Vec<String>);
}

/// External build module
pub trait BuildModule: Send + Sync {
    fn descriptor(&self) -> BuildModuleDescriptor;

    /// Production or one-off build
    fn build(&self, request: &BuildRequest) -> AssetResult<BuildManifest>;

    /// Start (or reuse) the development server
    fn start_dev_server(&self, request: &BuildRequest) -> AssetResult<BuildManifest>;

    /// Take over watching of the sources the module serves with HMR
    fn watch(&self, _notifier: Arc<dyn ChangeNotifier>) -> AssetResult<()> {
        Ok(())
    }
}

/// Holds the single registered build module.
#[derive(Default)]
pub struct BuildModuleRegistry {
    module: Option<Arc<dyn BuildModule>>,
}

impl BuildModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the build module.
    ///
    /// Fails when one is already registered or when it declares no alias.
    pub fn register(&mut self, module: Arc<dyn BuildModule>) -> AssetResult<()> {
        let descriptor = module.descriptor();
        if let Some(existing) = &self.module {
            return Err(AssetError::BuildModuleAlreadyRegistered {
                existing: existing.descriptor().name,
                attempted: descriptor.name,
            });
        }
        if descriptor.alias.as_deref().map_or(true, str::is_empty) {
            return Err(AssetError::MissingAlias {
                name: descriptor.name,
            });
        }
        self.module = Some(module);
        Ok(())
    }

    pub fn get(&self) -> Option<Arc<dyn BuildModule>> {
        self.module.clone()
    }

    pub fn is_registered(&self) -> bool {
        self.module.is_some()
    }

    /// Registered module supports a dev server
    pub fn has_dev_server(&self) -> bool {
        self.module
            .as_ref()
            .is_some_and(|m| m.descriptor().dev_server)
    }

    /// Registered module supports HMR
    pub fn has_hmr(&self) -> bool {
        self.module.as_ref().is_some_and(|m| m.descriptor().hmr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{EntrypointKind, ManifestFiles};

    struct Fake {
        name: &'static str,
        alias: Option<&'static str>,
    }

    impl BuildModule for Fake {
        fn descriptor(&self) -> BuildModuleDescriptor {
            BuildModuleDescriptor {
                name: self.name.to_string(),
                alias: self.alias.map(str::to_string),
                dev_server: true,
                hmr: false,
            }
        }

        fn build(&self, _request: &BuildRequest) -> AssetResult<BuildManifest> {
            Ok(BuildManifest::default())
        }

        fn start_dev_server(&self, _request: &BuildRequest) -> AssetResult<BuildManifest> {
            Ok(BuildManifest::default())
        }
    }

    #[test]
    fn second_registration_is_rejected() {
        let mut registry = BuildModuleRegistry::new();
        registry
            .register(Arc::new(Fake { name: "vite", alias: Some("vite") }))
            .unwrap();
        let err = registry
            .register(Arc::new(Fake { name: "other", alias: Some("other") }))
            .unwrap_err();
        assert!(matches!(
            err,
            AssetError::BuildModuleAlreadyRegistered { ref existing, ref attempted }
                if existing == "vite" && attempted == "other"
        ));
        assert!(registry.has_dev_server());
        assert!(!registry.has_hmr());
    }

    #[test]
    fn alias_is_required() {
        let mut registry = BuildModuleRegistry::new();
        let err = registry
            .register(Arc::new(Fake { name: "vite", alias: None }))
            .unwrap_err();
        assert!(matches!(err, AssetError::MissingAlias { .. }));
        assert!(!registry.is_registered());
    }

    #[test]
    fn reported_build_folds_onto_requested_entrypoints() {
        let reported: ReportedBuild = serde_json::from_value(serde_json::json!({
            "devServerUrl": "http://localhost:3001",
            "entrypoints": [
                { "name": "apos", "root": "/out", "files": { "js": ["apos.js"] } }
            ]
        }))
        .unwrap();
        let requested = vec![
            Entrypoint::new("apos", EntrypointKind::Apos),
            Entrypoint::new("public", EntrypointKind::Bundled),
        ];
        let manifest = reported.fold_onto(&requested);
        let apos = manifest.entrypoint("apos").unwrap().manifest.as_ref().unwrap();
        assert_eq!(
            apos.files,
            ManifestFiles {
                js: vec!["apos.js".into()],
                ..Default::default()
            }
        );
        assert_eq!(apos.dev_server_url.as_deref(), Some("http://localhost:3001"));
        assert!(manifest.entrypoint("public").unwrap().manifest.is_none());
    }
}
