//! Build orchestrator
//!
//! One run:
//! 1. Scan module sources and compose the entrypoints
//! 2. Decide per entrypoint whether it runs (change list / staleness)
//! 3. Generate glue files and stage module sources
//! 4. Bundle (internal bundler, build module, or raw concatenation)
//! 5. Assemble scene bundles and persist the manifest
//! 6. Publish the release (production only)

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;

use crate::config::Config;
use crate::domain::entities::{
    BuildManifest, Entrypoint, EntrypointManifest, Extensions, ManifestFiles, ModuleSourceRecord,
};
use crate::domain::ports::{
    emit_debug, BuildEvent, BuildEventSink, BuildModuleRegistry, BuildRequest, BundleJob, Bundler,
    DeployedRelease, FileSystem, ModuleResolver, NoopEventSink, ReleaseDestination, ReleaseSource,
};
use crate::domain::services::entrypoint_manager::{output, source_files};
use crate::domain::services::{
    compose_entrypoints, compute_cache_meta, merge_config, plan_scenes, CacheKeyInput,
    ExtraBundle, IconRegistry, SourceFileSet,
};
use crate::error::{AssetError, AssetResult};
use crate::infrastructure::cache::touch_cache;
use crate::infrastructure::fs::{copy_dir, remove_dir_if_exists, LocalFs};
use crate::infrastructure::{scan_all, BuildLock, DependencyLock, ManifestStore, LOCK_FILE};

use super::decision::{decide, Decision, SkipFacts};
use super::options::{BuildOptions, BuildPaths};
use super::result::BuildReport;
use super::state::{AssetBuildState, BuildSnapshot};

type ReleaseIdFn = dyn Fn(&Path) -> AssetResult<String> + Send + Sync;

pub struct AssetBuilder {
    project_root: PathBuf,
    config: Config,
    paths: BuildPaths,
    resolver: Arc<dyn ModuleResolver>,
    bundler: Arc<dyn Bundler>,
    build_modules: BuildModuleRegistry,
    destination: Option<Arc<dyn ReleaseDestination>>,
    fs: Arc<dyn FileSystem>,
    lock: DependencyLock,
    events: Arc<dyn BuildEventSink>,
    state: Arc<AssetBuildState>,
    release_id: Box<ReleaseIdFn>,
}

impl AssetBuilder {
    pub fn new(
        project_root: impl Into<PathBuf>,
        config: Config,
        resolver: Arc<dyn ModuleResolver>,
        bundler: Arc<dyn Bundler>,
    ) -> Self {
        let project_root = project_root.into();
        Self {
            paths: BuildPaths::new(&project_root, &config),
            lock: DependencyLock::discover(&project_root),
            project_root,
            config,
            resolver,
            bundler,
            build_modules: BuildModuleRegistry::new(),
            destination: None,
            fs: Arc::new(LocalFs::new()),
            events: Arc::new(NoopEventSink),
            state: Arc::new(AssetBuildState::new()),
            release_id: Box::new(crate::application::release::resolve_release_id),
        }
    }

    pub fn with_event_sink(mut self, events: Arc<dyn BuildEventSink>) -> Self {
        self.events = events;
        self
    }

    pub fn with_build_modules(mut self, registry: BuildModuleRegistry) -> Self {
        self.build_modules = registry;
        self
    }

    pub fn with_destination(mut self, destination: Arc<dyn ReleaseDestination>) -> Self {
        self.destination = Some(destination);
        self
    }

    pub fn with_file_system(mut self, fs: Arc<dyn FileSystem>) -> Self {
        self.fs = fs;
        self
    }

    pub fn with_release_id<F>(mut self, resolve: F) -> Self
    where
        F: Fn(&Path) -> AssetResult<String> + Send + Sync + 'static,
    {
        self.release_id = Box::new(resolve);
        self
    }

    pub fn paths(&self) -> &BuildPaths {
        &self.paths
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn state(&self) -> Arc<AssetBuildState> {
        self.state.clone()
    }

    pub fn resolver(&self) -> Arc<dyn ModuleResolver> {
        self.resolver.clone()
    }

    pub fn build_modules(&self) -> &BuildModuleRegistry {
        &self.build_modules
    }

    pub fn events(&self) -> Arc<dyn BuildEventSink> {
        self.events.clone()
    }

    /// Serve the last saved build without rebuilding.
    ///
    /// Returns whether a saved manifest was found. A missing manifest only
    /// warns when `warn_missing` is set (auto build disabled).
    pub fn load_saved_manifest(&self, warn_missing: bool) -> AssetResult<bool> {
        let store = ManifestStore::new(&self.paths.bundle_dir);
        let Some(saved) = store.load()? else {
            if warn_missing {
                self.events.on_event(BuildEvent::warning(format!(
                    "no saved build at {}; pages render without asset references until the first build",
                    store.path().display()
                )));
            }
            return Ok(false);
        };

        let meta = scan_all(self.resolver.as_ref())?;
        let mut entrypoints = self.compose(&meta)?;
        saved.hydrate(&mut entrypoints);
        self.state.replace(BuildSnapshot {
            ts: saved.ts,
            entrypoints,
            source_maps_root: None,
        });
        Ok(true)
    }

    pub fn build(&self, options: &BuildOptions) -> AssetResult<BuildReport> {
        let _lock = self.lock_build_dir()?;
        let mut report = BuildReport::default();

        let meta = scan_all(self.resolver.as_ref())?;
        self.events.on_event(BuildEvent::SourcesScanned {
            records: meta.len(),
            files: meta.iter().map(|r| r.files.len()).sum(),
        });

        let icons = self.icon_registry()?;
        let mut entrypoints = self.compose(&meta)?;
        self.events.on_event(BuildEvent::BuildStarted {
            namespace: self.config.namespace.clone(),
            entrypoints: entrypoints.len(),
            changes: options.changes.as_ref().map(Vec::len),
        });

        let previous = self.previous_build(&entrypoints)?;
        let mut to_run = Vec::new();
        for entry in entrypoints.iter_mut() {
            let prior = previous.as_ref().and_then(|p| p.entrypoint(&entry.name));
            let facts = SkipFacts {
                force: options.force || self.config.build.force,
                bundle_dir_exists: self.paths.bundle_dir.is_dir(),
                has_previous: prior.is_some_and(|p| p.manifest.is_some()),
                first_build: previous.is_none(),
                timestamp: self.fs.modified(&self.paths.timestamp_file(&entry.name)),
                lock_modified: self.lock.modified(),
            };
            match decide(entry, options.changes.as_deref(), &facts) {
                Decision::Run => to_run.push(entry.name.clone()),
                Decision::Skip(reason) => {
                    if let Some(prior) = prior {
                        entry.manifest = prior.manifest.clone();
                        entry.bundles = prior.bundles.clone();
                    }
                    self.events.on_event(BuildEvent::EntrypointSkipped {
                        name: entry.name.clone(),
                        reason: reason.to_string(),
                    });
                    report.skipped.push(entry.name.clone());
                }
            }
        }

        if to_run.is_empty() {
            self.events.on_event(BuildEvent::BuildCompleted {
                built: Vec::new(),
                skipped: report.skipped.clone(),
                scenes: Vec::new(),
            });
            if let Some(previous) = previous.filter(|_| self.state.is_empty()) {
                self.state.replace(BuildSnapshot {
                    entrypoints,
                    ..previous
                });
            }
            return Ok(report);
        }

        let source_maps_root = self.run_entrypoints(
            &meta,
            &icons,
            &mut entrypoints,
            &to_run,
            options,
            &mut report,
        )?;
        report.built = to_run;

        let rebuilt_scenes: BTreeSet<&String> = entrypoints
            .iter()
            .filter(|e| report.built.contains(&e.name))
            .flat_map(|e| e.scenes.iter())
            .collect();
        let plan = plan_scenes(&entrypoints);
        let write_all = options.changes.is_none();
        report.scenes = plan
            .scenes
            .iter()
            .filter(|s| write_all || rebuilt_scenes.contains(s))
            .cloned()
            .collect();

        fs::create_dir_all(&self.paths.bundle_dir)?;
        for bundle in plan.bundles.iter().filter(|b| report.scenes.contains(&b.scene)) {
            let mut content = String::new();
            for source in &bundle.sources {
                content.push_str(&self.fs.read(source)?);
                content.push('\n');
            }
            self.fs.write(&self.paths.bundle_dir.join(&bundle.file_name), &content)?;
            self.events.on_event(BuildEvent::BundleWritten {
                file: bundle.file_name.clone(),
                sources: bundle.sources.len(),
            });
            report.bundles.push(bundle.file_name.clone());
        }
        for copied in &plan.copied {
            let target = self.paths.bundle_dir.join(&copied.target);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(&copied.source, &target)?;
        }
        plan.apply(&mut entrypoints);

        self.publish_state(entrypoints, source_maps_root.clone())?;

        if self.config.production {
            report.release = self.deploy(source_maps_root.as_deref())?;
        }

        self.events.on_event(BuildEvent::BuildCompleted {
            built: report.built.clone(),
            skipped: report.skipped.clone(),
            scenes: report.scenes.clone(),
        });
        Ok(report)
    }

    /// Default entrypoints plus the extra bundles modules declare.
    fn compose(&self, meta: &[ModuleSourceRecord]) -> AssetResult<Vec<Entrypoint>> {
        let mut extra_bundles = Vec::new();
        let mut extensions = Extensions::new();
        for module in &self.config.modules {
            for (key, layer) in &module.build.extensions {
                if !layer.is_object() {
                    return Err(AssetError::InvalidBuildExtension {
                        module: module.name.clone(),
                        key: key.clone(),
                        message: "expected a table of bundler configuration".to_string(),
                    });
                }
                match extensions.get_mut(key) {
                    Some(existing) => merge_config(existing, layer),
                    None => {
                        extensions.insert(key.clone(), layer.clone());
                    }
                }
            }
            extra_bundles.extend(module.build.bundles.keys().map(|name| ExtraBundle {
                module: module.name.clone(),
                name: name.clone(),
            }));
        }
        compose_entrypoints(meta, &extra_bundles, &extensions)
    }

    /// Exclusive build lock, waiting out another process's build.
    fn lock_build_dir(&self) -> AssetResult<BuildLock> {
        if let Some(lock) = BuildLock::try_acquire(&self.paths.build_dir)? {
            return Ok(lock);
        }
        emit_debug(self.events.as_ref(), || {
            format!(
                "waiting for the build lock at {}",
                self.paths.build_dir.join(LOCK_FILE).display()
            )
        });
        Ok(BuildLock::acquire(&self.paths.build_dir)?)
    }

    fn icon_registry(&self) -> AssetResult<IconRegistry> {
        IconRegistry::from_declarations(
            self.config
                .modules
                .iter()
                .filter_map(|m| m.icons.as_ref().map(|icons| (m.name.as_str(), icons))),
        )
    }

    /// Last known build: in memory first, then `.manifest.json` hydrated onto
    /// the freshly composed entrypoints.
    fn previous_build(&self, composed: &[Entrypoint]) -> AssetResult<Option<BuildSnapshot>> {
        let snapshot = self.state.snapshot();
        if !snapshot.entrypoints.is_empty() {
            return Ok(Some(snapshot.as_ref().clone()));
        }
        let Some(saved) = ManifestStore::new(&self.paths.bundle_dir).load()? else {
            return Ok(None);
        };
        let mut entrypoints = composed.to_vec();
        saved.hydrate(&mut entrypoints);
        Ok(Some(BuildSnapshot {
            ts: saved.ts,
            entrypoints,
            source_maps_root: None,
        }))
    }

    fn run_entrypoints(
        &self,
        meta: &[ModuleSourceRecord],
        icons: &IconRegistry,
        entrypoints: &mut [Entrypoint],
        to_run: &[String],
        options: &BuildOptions,
        report: &mut BuildReport,
    ) -> AssetResult<Option<PathBuf>> {
        let mut glue: BTreeMap<String, BTreeMap<String, PathBuf>> = BTreeMap::new();
        let mut raw: BTreeMap<String, SourceFileSet> = BTreeMap::new();

        for entry in entrypoints.iter_mut().filter(|e| to_run.contains(&e.name)) {
            entry.reset_build_state();
            self.events.on_event(BuildEvent::EntrypointStarted {
                name: entry.name.clone(),
                label: entry.label.clone(),
            });
            let sources = source_files(entry, meta);
            emit_debug(self.events.as_ref(), || {
                format!(
                    "{}: {} source files",
                    entry.name,
                    sources.values().map(Vec::len).sum::<usize>()
                )
            });
            if entry.is_bundled_raw() {
                raw.insert(entry.name.clone(), sources);
                continue;
            }
            let generated = output(
                self.fs.as_ref(),
                entry,
                &sources,
                icons,
                options.suppress_errors,
            )?;
            for warning in generated.warnings {
                self.warn(report, warning);
            }
            let mut files = BTreeMap::new();
            for (ext, code) in generated.files {
                let path = self.paths.glue_file(&entry.name, &ext);
                self.fs.write(&path, &code)?;
                files.insert(ext, path);
            }
            glue.insert(entry.name.clone(), files);
        }

        self.stage_sources(meta, !glue.is_empty())?;

        for entry in entrypoints.iter_mut() {
            if let Some(sources) = raw.get(&entry.name) {
                entry.manifest = Some(self.concatenate(entry, sources)?);
            }
        }

        let mut source_maps_root = None;
        if !glue.is_empty() {
            match self.build_modules.get() {
                Some(module) => {
                    let request = BuildRequest {
                        namespace: self.config.namespace.clone(),
                        project_root: self.project_root.clone(),
                        build_dir: self.paths.build_dir.clone(),
                        output_dir: self.paths.build_dir.clone(),
                        entrypoints: entrypoints
                            .iter()
                            .filter(|e| glue.contains_key(&e.name))
                            .cloned()
                            .collect(),
                        entry_files: glue.clone(),
                        changes: options.changes.clone(),
                        production: self.config.production,
                        source_maps: self.config.build.source_maps,
                        dev_server: options.dev_server,
                    };
                    let manifest = if options.dev_server && self.build_modules.has_dev_server() {
                        module.start_dev_server(&request)?
                    } else {
                        module.build(&request)?
                    };
                    source_maps_root = manifest.source_maps_root.clone();
                    self.fold(entrypoints, manifest);
                }
                None => {
                    for entry in entrypoints.iter_mut() {
                        if let Some(files) = glue.get(&entry.name) {
                            entry.manifest = Some(self.bundle(entry, files, report)?);
                        }
                    }
                    if self.config.build.source_maps {
                        source_maps_root = Some(self.paths.build_dir.clone());
                    }
                }
            }
        }

        let now = chrono::Utc::now().timestamp_millis().to_string();
        for entry in entrypoints.iter().filter(|e| to_run.contains(&e.name)) {
            self.fs.write(&self.paths.timestamp_file(&entry.name), &now)?;
            let files = entry.manifest.as_ref().map(|m| &m.files);
            self.events.on_event(BuildEvent::EntrypointBuilt {
                name: entry.name.clone(),
                js: files.map_or(0, |f| f.js.len()),
                css: files.map_or(0, |f| f.css.len()),
            });
        }

        Ok(source_maps_root)
    }

    /// Copy module sources next to the glue files and static assets into the
    /// bundle directory, base before subclass.
    fn stage_sources(&self, meta: &[ModuleSourceRecord], stage_ui: bool) -> AssetResult<()> {
        let public_modules = self.paths.public_modules_dir();
        if stage_ui {
            let modules_dir = self.paths.modules_dir();
            for record in meta.iter().filter(|r| r.exists) {
                remove_dir_if_exists(&modules_dir.join(&record.name))?;
            }
        }
        for record in meta {
            if stage_ui && record.exists {
                copy_dir(&record.dirname, &self.paths.modules_dir().join(&record.name))?;
            }
            if let Some(module_dir) = record.dirname.parent() {
                let public = module_dir.join("public");
                if public.is_dir() {
                    copy_dir(&public, &public_modules.join(&record.name))?;
                }
            }
        }
        Ok(())
    }

    /// Raw entrypoints are concatenated into `{name}-build.{ext}`.
    fn concatenate(
        &self,
        entry: &Entrypoint,
        sources: &SourceFileSet,
    ) -> AssetResult<EntrypointManifest> {
        let output_dir = self.paths.output_dir(&entry.name);
        let mut files = ManifestFiles::default();
        for ext in &entry.inputs {
            let Some(matched) = sources.get(ext).filter(|m| !m.is_empty()) else {
                continue;
            };
            let mut content = String::new();
            for file in matched {
                content.push_str(&self.fs.read(&file.path)?);
                content.push('\n');
            }
            let name = format!("{}-build.{}", entry.name, ext);
            self.fs.write(&output_dir.join(&name), &content)?;
            match ext.as_str() {
                "css" => files.css.push(name),
                _ => files.js.push(name),
            }
        }
        Ok(EntrypointManifest::new(output_dir, files))
    }

    fn bundle(
        &self,
        entry: &Entrypoint,
        entry_files: &BTreeMap<String, PathBuf>,
        report: &mut BuildReport,
    ) -> AssetResult<EntrypointManifest> {
        let config = merged_bundler_config(&self.config.bundler.config, entry);
        let symlinked = self.resolver.symlinked_packages();
        let cache = compute_cache_meta(&CacheKeyInput {
            namespace: &self.config.namespace,
            entrypoint: &entry.name,
            lock_contents: self.lock.contents(),
            config: &config,
            cache_base: &self.paths.cache_base,
            symlinked: &symlinked,
        });
        touch_cache(&cache)?;
        emit_debug(self.events.as_ref(), || {
            format!("{}: cache {}", entry.name, cache.location.display())
        });

        let output_dir = self.paths.output_dir(&entry.name);
        remove_dir_if_exists(&output_dir)?;
        let modules_dir = self.paths.modules_dir();
        let output = self.bundler.bundle(&BundleJob {
            entrypoint: entry,
            entry_files: entry_files.clone(),
            output_dir: &output_dir,
            modules_dir: &modules_dir,
            cache: &cache,
            config: &config,
            source_maps: self.config.build.source_maps,
            production: self.config.production,
        })?;
        for warning in output.warnings {
            self.warn(report, warning);
        }
        Ok(EntrypointManifest::new(output_dir, output.files))
    }

    /// Attach a build module's manifest to the entrypoints it built.
    fn fold(&self, entrypoints: &mut [Entrypoint], manifest: BuildManifest) {
        for built in manifest.entrypoints {
            if let Some(entry) = entrypoints.iter_mut().find(|e| e.name == built.name) {
                entry.manifest = built.manifest;
            }
        }
    }

    fn publish_state(
        &self,
        entrypoints: Vec<Entrypoint>,
        source_maps_root: Option<PathBuf>,
    ) -> AssetResult<()> {
        let snapshot = BuildSnapshot {
            ts: chrono::Utc::now().timestamp_millis(),
            entrypoints,
            source_maps_root,
        };
        let store = ManifestStore::new(&self.paths.bundle_dir);
        store.save(&snapshot.to_saved())?;
        self.events.on_event(BuildEvent::ManifestSaved {
            path: store.path().to_path_buf(),
        });
        self.state.replace(snapshot);
        Ok(())
    }

    fn deploy(&self, source_maps: Option<&Path>) -> AssetResult<Option<DeployedRelease>> {
        let Some(destination) = &self.destination else {
            return Ok(None);
        };
        let release_id = (self.release_id)(&self.project_root)?;
        let deployed = destination
            .publish(&ReleaseSource {
                release_id: &release_id,
                namespace: &self.config.namespace,
                bundle_dir: &self.paths.bundle_dir,
                source_maps,
            })
            .map_err(|e| AssetError::Deploy {
                destination: destination.display_name(),
                message: e.to_string(),
            })?;
        self.events.on_event(BuildEvent::Deployed {
            release_id: deployed.release_id.clone(),
            destination: deployed.location.clone(),
        });
        Ok(Some(deployed))
    }

    fn warn(&self, report: &mut BuildReport, message: String) {
        self.events.on_event(BuildEvent::warning(message.clone()));
        report.warnings.push(message);
    }
}

impl std::fmt::Debug for AssetBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetBuilder")
            .field("project_root", &self.project_root)
            .field("paths", &self.paths)
            .field("bundler", &self.bundler.name())
            .finish_non_exhaustive()
    }
}

/// Base bundler configuration with the entrypoint's extension layers merged on top
pub fn merged_bundler_config(base: &Value, entry: &Entrypoint) -> Value {
    let mut config = base.clone();
    if let Some(extensions) = entry.extensions() {
        for layer in extensions.values() {
            merge_config(&mut config, layer);
        }
    }
    config
}
