//! Use Case Factory
//!
//! Creates use cases with infrastructure dependencies wired up.
//! This is the dependency injection point for the application.

use std::path::Path;
use std::sync::Arc;

use crate::application::AssetBuilder;
use crate::config::{Config, Verbosity};
use crate::domain::ports::{BuildEventSink, BuildModuleRegistry, ReleaseDestination};
use crate::error::AssetResult;
use crate::infrastructure::{
    CommandBuildModule, CommandBundler, ConsoleEventSink, FsModuleResolver, JsonEventSink,
    LocalReleaseDestination, RemoteReleaseDestination,
};

/// NDJSON on stdout for `--json`, console lines on stderr otherwise
pub fn create_event_sink(
    command: &str,
    json: bool,
    config: &Config,
    color: bool,
) -> Arc<dyn BuildEventSink> {
    let verbosity = config.output.verbosity;
    if json {
        Arc::new(JsonEventSink::stdout(command).with_debug(verbosity >= Verbosity::Debug))
    } else {
        Arc::new(ConsoleEventSink::stderr(verbosity, color))
    }
}

/// Remote transfer command when `[deploy] remote = true`, the project's
/// `public/` tree otherwise
pub fn create_release_destination(
    project_root: &Path,
    config: &Config,
) -> Arc<dyn ReleaseDestination> {
    if config.deploy.remote {
        Arc::new(RemoteReleaseDestination::from_config(&config.deploy))
    } else {
        Arc::new(LocalReleaseDestination::for_project(project_root))
    }
}

/// Create the build orchestrator for a project
///
/// Registers the configured build module, if any. Fails when its
/// declaration is invalid (missing alias).
pub fn create_asset_builder(
    project_root: &Path,
    config: Config,
    events: Arc<dyn BuildEventSink>,
) -> AssetResult<AssetBuilder> {
    let resolver = Arc::new(FsModuleResolver::new(project_root, config.modules.clone()));
    let bundler = Arc::new(CommandBundler::new(
        config.bundler.command.clone(),
        config.bundler.args.clone(),
        project_root,
    ));

    let mut build_modules = BuildModuleRegistry::new();
    if let Some(module) = &config.build_module {
        build_modules.register(Arc::new(CommandBuildModule::from_config(module, project_root)))?;
    }

    let destination = create_release_destination(project_root, &config);
    Ok(AssetBuilder::new(project_root, config, resolver, bundler)
        .with_build_modules(build_modules)
        .with_destination(destination)
        .with_event_sink(events))
}
