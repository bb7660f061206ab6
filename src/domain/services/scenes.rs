//! Scene bundle planning
//!
//! A scene is a named page context (`public`, `apos`, or an extra bundle).
//! Each scene gets one JS bundle per contributing entrypoint and one CSS
//! bundle shared by all of them. Entrypoints are visited in declared order
//! so bundle contents are stable across runs.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::domain::entities::Entrypoint;
use crate::domain::value_objects::{css_bundle_name, js_bundle_name};

/// One output file assembled by concatenation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneBundle {
    pub scene: String,
    /// File name inside the bundle directory
    pub file_name: String,
    /// Absolute input files, concatenated in order
    pub sources: Vec<PathBuf>,
    /// Entrypoints contributing to this bundle
    pub entrypoints: Vec<String>,
}

/// A file copied verbatim into the bundle directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopiedFile {
    pub source: PathBuf,
    /// Path relative to the bundle directory
    pub target: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScenePlan {
    /// Union of entrypoint scenes, first appearance first
    pub scenes: Vec<String>,
    pub bundles: Vec<SceneBundle>,
    pub copied: Vec<CopiedFile>,
}

impl ScenePlan {
    /// Bundle file names per entrypoint
    pub fn bundles_by_entrypoint(&self) -> BTreeMap<String, Vec<String>> {
        let mut by_entry: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for bundle in &self.bundles {
            for entry in &bundle.entrypoints {
                by_entry
                    .entry(entry.clone())
                    .or_default()
                    .push(bundle.file_name.clone());
            }
        }
        by_entry
    }

    /// Record bundle names on the entrypoints they were built from.
    pub fn apply(&self, entrypoints: &mut [Entrypoint]) {
        let by_entry = self.bundles_by_entrypoint();
        for entry in entrypoints.iter_mut() {
            if let Some(names) = by_entry.get(&entry.name) {
                entry.bundles = names.iter().cloned().collect();
            }
        }
    }
}

/// Union of scenes in first-appearance order
pub fn scene_names(entrypoints: &[Entrypoint]) -> Vec<String> {
    let mut scenes: Vec<String> = Vec::new();
    for entry in entrypoints {
        for scene in &entry.scenes {
            if !scenes.contains(scene) {
                scenes.push(scene.clone());
            }
        }
    }
    scenes
}

/// Plan scene bundles from entrypoints carrying a build manifest.
///
/// Entrypoints served by a dev server are loaded from it directly and take
/// no part in concatenation. Empty categories produce no file.
pub fn plan_scenes(entrypoints: &[Entrypoint]) -> ScenePlan {
    let scenes = scene_names(entrypoints);
    let mut plan = ScenePlan {
        scenes: scenes.clone(),
        ..Default::default()
    };

    for scene in &scenes {
        let mut css = SceneBundle {
            scene: scene.clone(),
            file_name: css_bundle_name(scene),
            sources: Vec::new(),
            entrypoints: Vec::new(),
        };

        for entry in entrypoints.iter().filter(|e| e.scenes.contains(scene)) {
            let Some(manifest) = entry.manifest.as_ref() else {
                continue;
            };
            if manifest.dev_server_url.is_some() {
                continue;
            }
            if !manifest.files.js.is_empty() {
                plan.bundles.push(SceneBundle {
                    scene: scene.clone(),
                    file_name: js_bundle_name(scene, &entry.name, entry.condition),
                    sources: manifest.files.js.iter().map(|f| manifest.resolve(f)).collect(),
                    entrypoints: vec![entry.name.clone()],
                });
            }
            if !manifest.files.css.is_empty() {
                css.sources
                    .extend(manifest.files.css.iter().map(|f| manifest.resolve(f)));
                css.entrypoints.push(entry.name.clone());
            }
        }

        if !css.sources.is_empty() {
            plan.bundles.push(css);
        }
    }

    for entry in entrypoints {
        let Some(manifest) = entry.manifest.as_ref() else {
            continue;
        };
        if manifest.dev_server_url.is_some() {
            continue;
        }
        for file in manifest.files.copied() {
            if plan.copied.iter().any(|c| &c.target == file) {
                continue;
            }
            plan.copied.push(CopiedFile {
                source: manifest.resolve(file),
                target: file.clone(),
            });
        }
    }

    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{EntrypointKind, EntrypointManifest, ManifestFiles};
    use crate::domain::value_objects::Condition;
    use pretty_assertions::assert_eq;

    fn built(name: &str, scenes: &[&str], condition: Condition, files: ManifestFiles) -> Entrypoint {
        let mut entry = Entrypoint::new(name, EntrypointKind::Apos)
            .with_scenes(scenes.iter().copied())
            .with_condition(condition);
        entry.manifest = Some(EntrypointManifest::new(format!("/build/{}", name), files));
        entry
    }

    fn js(files: &[&str]) -> ManifestFiles {
        ManifestFiles {
            js: files.iter().map(|f| f.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn scenes_follow_first_appearance() {
        let entries = vec![
            built("src", &["public", "apos"], Condition::Module, js(&["a.js"])),
            built("apos", &["apos"], Condition::Module, js(&["b.js"])),
            built("extra", &["extra"], Condition::Module, js(&["c.js"])),
        ];
        assert_eq!(scene_names(&entries), vec!["public", "apos", "extra"]);
    }

    #[test]
    fn js_bundles_are_per_entrypoint_and_css_per_scene() {
        let mut src_files = js(&["src.js"]);
        src_files.css = vec!["src.css".into()];
        let mut public_files = js(&["public.js"]);
        public_files.css = vec!["public.css".into()];
        let entries = vec![
            built("src", &["public", "apos"], Condition::Module, src_files),
            built("public", &["public", "apos"], Condition::Nomodule, public_files),
            built("apos", &["apos"], Condition::Module, js(&["apos.js"])),
        ];
        let plan = plan_scenes(&entries);
        let names: Vec<&str> = plan.bundles.iter().map(|b| b.file_name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "public-src-module-bundle.js",
                "public-public-nomodule-bundle.js",
                "public-bundle.css",
                "apos-src-module-bundle.js",
                "apos-public-nomodule-bundle.js",
                "apos-module-bundle.js",
                "apos-bundle.css",
            ]
        );
        let css = plan.bundles.iter().find(|b| b.file_name == "apos-bundle.css").unwrap();
        assert_eq!(
            css.sources,
            vec![PathBuf::from("/build/src/src.css"), PathBuf::from("/build/public/public.css")]
        );
    }

    #[test]
    fn dev_server_and_unbuilt_entrypoints_are_left_out() {
        let mut served = built("apos", &["apos"], Condition::Module, js(&["apos.js"]));
        if let Some(manifest) = served.manifest.as_mut() {
            manifest.dev_server_url = Some("http://localhost:5173".into());
        }
        let unbuilt = Entrypoint::new("src", EntrypointKind::Apos).with_scenes(["apos"]);
        let plan = plan_scenes(&[unbuilt, served]);
        assert_eq!(plan.scenes, vec!["apos"]);
        assert!(plan.bundles.is_empty());
    }

    #[test]
    fn apply_records_bundle_names() {
        let mut files = js(&["apos.js"]);
        files.dynamic_imports = vec!["chunk-1.js".into()];
        let mut entries = vec![built("apos", &["apos"], Condition::Module, files)];
        let plan = plan_scenes(&entries);
        plan.apply(&mut entries);
        assert!(entries[0].bundles.contains("apos-module-bundle.js"));
        assert_eq!(
            plan.copied,
            vec![CopiedFile {
                source: PathBuf::from("/build/apos/chunk-1.js"),
                target: "chunk-1.js".into()
            }]
        );
    }
}
