//! In-memory build state
//!
//! The last successful build, as page rendering sees it. Readers take an
//! `Arc` snapshot; a build replaces the snapshot wholesale, so a reader
//! never observes a half-updated manifest.

use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use crate::domain::entities::{Entrypoint, SavedManifest};
use crate::domain::value_objects::{css_bundle_name, js_bundle_name};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildSnapshot {
    /// Epoch milliseconds of the build
    pub ts: i64,
    pub entrypoints: Vec<Entrypoint>,
    pub source_maps_root: Option<PathBuf>,
}

impl BuildSnapshot {
    pub fn entrypoint(&self, name: &str) -> Option<&Entrypoint> {
        self.entrypoints.iter().find(|e| e.name == name)
    }

    pub fn to_saved(&self) -> SavedManifest {
        let manifest = crate::domain::entities::BuildManifest {
            entrypoints: self.entrypoints.clone(),
            ..Default::default()
        };
        SavedManifest::new(self.ts, manifest.records())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetTagKind {
    Script,
    Stylesheet,
}

/// One `<script>` or `<link>` a page of a scene must include
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetTag {
    pub kind: AssetTagKind,
    pub url: String,
    /// `type="module"` / `nomodule`
    pub attribute: Option<&'static str>,
}

impl AssetTag {
    pub fn to_html(&self) -> String {
        match self.kind {
            AssetTagKind::Stylesheet => {
                format!("<link href=\"{}\" rel=\"stylesheet\" />", self.url)
            }
            AssetTagKind::Script => match self.attribute {
                Some(attribute) => format!("<script {} src=\"{}\"></script>", attribute, self.url),
                None => format!("<script src=\"{}\"></script>", self.url),
            },
        }
    }
}

#[derive(Debug, Default)]
pub struct AssetBuildState {
    snapshot: RwLock<Arc<BuildSnapshot>>,
}

impl AssetBuildState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Arc<BuildSnapshot> {
        match self.snapshot.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn replace(&self, snapshot: BuildSnapshot) {
        let snapshot = Arc::new(snapshot);
        match self.snapshot.write() {
            Ok(mut guard) => *guard = snapshot,
            Err(poisoned) => *poisoned.into_inner() = snapshot,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot().entrypoints.is_empty()
    }

    /// Tags for one scene, JS in entrypoint order then the scene stylesheet.
    ///
    /// Dev server entrypoints load straight from the dev server; everything
    /// else comes from the bundle files under `base_url`.
    pub fn scene_assets(&self, scene: &str, base_url: &str) -> Vec<AssetTag> {
        let snapshot = self.snapshot();
        let base = base_url.trim_end_matches('/');
        let mut tags = Vec::new();
        let mut has_css = false;

        for entry in snapshot.entrypoints.iter().filter(|e| e.scenes.iter().any(|s| s == scene)) {
            let Some(manifest) = entry.manifest.as_ref() else {
                continue;
            };
            if let Some(dev) = &manifest.dev_server_url {
                let dev = dev.trim_end_matches('/');
                tags.extend(manifest.files.js.iter().map(|file| AssetTag {
                    kind: AssetTagKind::Script,
                    url: format!("{}/{}", dev, file),
                    attribute: Some("type=\"module\""),
                }));
                tags.extend(manifest.files.css.iter().map(|file| AssetTag {
                    kind: AssetTagKind::Stylesheet,
                    url: format!("{}/{}", dev, file),
                    attribute: None,
                }));
                continue;
            }
            let js = js_bundle_name(scene, &entry.name, entry.condition);
            if entry.bundles.contains(&js) {
                tags.push(AssetTag {
                    kind: AssetTagKind::Script,
                    url: format!("{}/{}", base, js),
                    attribute: entry.condition.script_attribute(),
                });
            }
            has_css |= entry.bundles.contains(&css_bundle_name(scene));
        }

        if has_css {
            tags.push(AssetTag {
                kind: AssetTagKind::Stylesheet,
                url: format!("{}/{}", base, css_bundle_name(scene)),
                attribute: None,
            });
        }
        tags
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{EntrypointKind, EntrypointManifest, ManifestFiles};
    use crate::domain::value_objects::Condition;

    fn built(name: &str, kind: EntrypointKind, scenes: &[&str], condition: Condition) -> Entrypoint {
        let mut entry = Entrypoint::new(name, kind)
            .with_scenes(scenes.iter().copied())
            .with_condition(condition);
        entry.manifest = Some(EntrypointManifest::new(
            format!("/build/{}", name),
            ManifestFiles {
                js: vec![format!("{}.js", name)],
                css: vec![format!("{}.css", name)],
                ..Default::default()
            },
        ));
        for scene in scenes {
            entry.bundles.insert(js_bundle_name(scene, name, condition));
            entry.bundles.insert(css_bundle_name(scene));
        }
        entry
    }

    #[test]
    fn scene_assets_lists_bundles_in_order() {
        let state = AssetBuildState::new();
        state.replace(BuildSnapshot {
            ts: 1,
            entrypoints: vec![
                built("public", EntrypointKind::Bundled, &["public", "apos"], Condition::Nomodule),
                built("apos", EntrypointKind::Apos, &["apos"], Condition::Module),
            ],
            source_maps_root: None,
        });

        let html: Vec<String> = state
            .scene_assets("apos", "/apos-frontend/default/")
            .iter()
            .map(AssetTag::to_html)
            .collect();
        assert_eq!(
            html,
            vec![
                "<script nomodule src=\"/apos-frontend/default/apos-public-nomodule-bundle.js\"></script>",
                "<script type=\"module\" src=\"/apos-frontend/default/apos-module-bundle.js\"></script>",
                "<link href=\"/apos-frontend/default/apos-bundle.css\" rel=\"stylesheet\" />",
            ]
        );
        assert_eq!(state.scene_assets("public", "/b").len(), 2);
    }

    #[test]
    fn dev_server_entrypoints_load_from_server() {
        let mut apos = built("apos", EntrypointKind::Apos, &["apos"], Condition::Module);
        if let Some(manifest) = apos.manifest.as_mut() {
            manifest.dev_server_url = Some("http://localhost:5173/".into());
        }
        apos.bundles.clear();
        let state = AssetBuildState::new();
        state.replace(BuildSnapshot {
            entrypoints: vec![apos],
            ..Default::default()
        });

        let tags = state.scene_assets("apos", "/b");
        assert_eq!(tags[0].url, "http://localhost:5173/apos.js");
        assert_eq!(tags[1].kind, AssetTagKind::Stylesheet);
        assert_eq!(tags[1].url, "http://localhost:5173/apos.css");
    }

    #[test]
    fn replace_swaps_whole_snapshot() {
        let state = AssetBuildState::new();
        assert!(state.is_empty());
        let held = state.snapshot();
        state.replace(BuildSnapshot {
            ts: 5,
            entrypoints: vec![built("src", EntrypointKind::Bundled, &["public"], Condition::Module)],
            source_maps_root: None,
        });
        assert!(held.entrypoints.is_empty());
        assert_eq!(state.snapshot().ts, 5);
        assert_eq!(state.snapshot().to_saved().manifest.len(), 1);
    }
}
