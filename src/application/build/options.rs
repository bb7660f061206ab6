//! Build Options
//!
//! Per-run options and the directory layout of one namespace.

use std::path::{Path, PathBuf};

use crate::config::Config;

/// Options for one build run
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Project-relative changed paths; `None` for a full build
    pub changes: Option<Vec<String>>,
    /// Rebuild the admin UI even when it looks up-to-date
    pub force: bool,
    /// Start the build module's dev server instead of building
    pub dev_server: bool,
    /// Stub empty apps instead of failing on a missing default export
    pub suppress_errors: bool,
}

impl BuildOptions {
    pub fn full() -> Self {
        Self::default()
    }

    /// Watch-triggered rebuild of exactly these changes
    pub fn for_changes(changes: Vec<String>) -> Self {
        Self {
            changes: Some(changes),
            suppress_errors: true,
            ..Self::default()
        }
    }

    /// Restrict the run to entrypoints touched by `changes`, when given
    pub fn with_changes(mut self, changes: Option<Vec<String>>) -> Self {
        self.changes = changes;
        self
    }

    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn with_dev_server(mut self, dev_server: bool) -> Self {
        self.dev_server = dev_server;
        self
    }

    pub fn with_suppress_errors(mut self, suppress_errors: bool) -> Self {
        self.suppress_errors = suppress_errors;
        self
    }
}

/// Directories of one namespace's build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildPaths {
    /// Intermediate output: glue files, staged sources, bundler output
    pub build_dir: PathBuf,
    /// Public bundle directory served to browsers
    pub bundle_dir: PathBuf,
    /// Base of the content-addressed bundler caches
    pub cache_base: PathBuf,
}

impl BuildPaths {
    pub fn new(project_root: &Path, config: &Config) -> Self {
        Self {
            build_dir: project_root
                .join("data")
                .join("temp")
                .join(&config.namespace)
                .join("build"),
            bundle_dir: project_root
                .join("public")
                .join("apos-frontend")
                .join(&config.namespace),
            cache_base: config.cache_base(project_root),
        }
    }

    /// Staged module `ui/` trees; glue files live here too
    pub fn modules_dir(&self) -> PathBuf {
        self.build_dir.join("modules")
    }

    /// `{build_dir}/modules/{name}-import.{ext}`
    pub fn glue_file(&self, entrypoint: &str, ext: &str) -> PathBuf {
        self.modules_dir()
            .join(format!("{}-import.{}", entrypoint, ext))
    }

    pub fn output_dir(&self, entrypoint: &str) -> PathBuf {
        self.build_dir.join(entrypoint)
    }

    /// `{build_dir}/.{name}-timestamp`
    pub fn timestamp_file(&self, entrypoint: &str) -> PathBuf {
        self.build_dir.join(format!(".{}-timestamp", entrypoint))
    }

    /// Static module assets in the bundle directory
    pub fn public_modules_dir(&self) -> PathBuf {
        self.bundle_dir.join("modules")
    }
}
