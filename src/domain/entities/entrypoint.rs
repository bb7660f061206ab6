//! Entrypoint entity
//!
//! One named, independently buildable unit of frontend source. The kind is a
//! closed sum type; each variant carries only the fields its strategy uses.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::manifest::EntrypointManifest;
use crate::domain::value_objects::Condition;

/// Explicit source files keyed by input extension (`js`, `scss`, ...)
pub type SourceMap = BTreeMap<String, Vec<PathBuf>>;

/// Opaque per-module bundler configuration layers, merged by name
pub type Extensions = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EntrypointKind {
    /// Project bundle: `ui/{name}/index.{ext}` of every module
    Index {
        #[serde(default)]
        sources: SourceMap,
        #[serde(default, rename = "ignoreSources")]
        ignore_sources: Vec<PathBuf>,
        #[serde(default)]
        extensions: Extensions,
    },
    /// Admin UI: components, tiptap extensions, apps and icons
    Apos,
    /// Extra bundle made only of explicit sources
    Custom {
        #[serde(default)]
        sources: SourceMap,
        #[serde(default, rename = "ignoreSources")]
        ignore_sources: Vec<PathBuf>,
        #[serde(default)]
        extensions: Extensions,
    },
    /// Raw files concatenated as-is
    Bundled,
}

impl EntrypointKind {
    pub fn name(&self) -> &'static str {
        match self {
            EntrypointKind::Index { .. } => "index",
            EntrypointKind::Apos => "apos",
            EntrypointKind::Custom { .. } => "custom",
            EntrypointKind::Bundled => "bundled",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entrypoint {
    pub name: String,
    pub label: String,
    pub scenes: Vec<String>,
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
    #[serde(default)]
    pub condition: Condition,
    #[serde(default)]
    pub prologue: String,
    #[serde(flatten)]
    pub kind: EntrypointKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manifest: Option<EntrypointManifest>,
    #[serde(default)]
    pub bundles: BTreeSet<String>,
}

impl Entrypoint {
    pub fn new(name: impl Into<String>, kind: EntrypointKind) -> Self {
        let name = name.into();
        Self {
            label: name.clone(),
            name,
            scenes: Vec::new(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            condition: Condition::default(),
            prologue: String::new(),
            kind,
            manifest: None,
            bundles: BTreeSet::new(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_scenes<I, S>(mut self, scenes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scenes = scenes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_inputs<I, S>(mut self, inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inputs = inputs.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_outputs<I, S>(mut self, outputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.outputs = outputs.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.condition = condition;
        self
    }

    pub fn with_prologue(mut self, prologue: impl Into<String>) -> Self {
        self.prologue = prologue.into();
        self
    }

    /// Folder under `ui/` whose changes trigger this entrypoint.
    pub fn source_folder(&self) -> &str {
        match &self.kind {
            EntrypointKind::Index { .. } | EntrypointKind::Bundled => &self.name,
            EntrypointKind::Apos => "apos",
            EntrypointKind::Custom { .. } => "src",
        }
    }

    /// Only the admin UI build is timestamp-checked; project builds always run.
    pub fn supports_skip(&self) -> bool {
        matches!(self.kind, EntrypointKind::Apos)
    }

    /// Whether the entrypoint's output goes through a bundler at all.
    pub fn is_bundled_raw(&self) -> bool {
        matches!(self.kind, EntrypointKind::Bundled)
    }

    /// Explicit exclusions, for kinds that carry them
    pub fn ignore_sources(&self) -> &[PathBuf] {
        match &self.kind {
            EntrypointKind::Index { ignore_sources, .. }
            | EntrypointKind::Custom { ignore_sources, .. } => ignore_sources,
            EntrypointKind::Apos | EntrypointKind::Bundled => &[],
        }
    }

    /// Per-module bundler configuration layers, for kinds that carry them
    pub fn extensions(&self) -> Option<&Extensions> {
        match &self.kind {
            EntrypointKind::Index { extensions, .. }
            | EntrypointKind::Custom { extensions, .. } => Some(extensions),
            EntrypointKind::Apos | EntrypointKind::Bundled => None,
        }
    }

    /// Drop build results, keeping the declaration.
    pub fn reset_build_state(&mut self) {
        self.manifest = None;
        self.bundles.clear();
    }
}
