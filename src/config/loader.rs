//! Configuration loading and environment overrides

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::domain::value_objects::ConfigWarning;
use crate::error::{AssetError, AssetResult};

use super::env_override::{closest, EnvOverrides};
use super::types::{Config, Verbosity, CONFIG_FILE};

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> AssetResult<(Config, Vec<ConfigWarning>)> {
    let content = fs::read_to_string(path)?;

    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(&content);

    let config: Config = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| AssetError::config(path, e.to_string()))?;

    let warnings = unknown_paths
        .into_iter()
        .map(|path_str| {
            let key = path_str
                .split('.')
                .next_back()
                .unwrap_or(path_str.as_str())
                .to_string();
            ConfigWarning {
                key: key.clone(),
                file: path.to_path_buf(),
                line: find_line_number(&content, &key),
                suggestion: suggest_key(&key),
            }
        })
        .collect();

    Ok((config, warnings))
}

/// Load the project config (or defaults) and apply environment overrides.
pub fn load_project(project_root: &Path) -> AssetResult<(Config, Vec<ConfigWarning>)> {
    let path = project_root.join(CONFIG_FILE);
    let (config, warnings) = if path.exists() {
        load_with_warnings(&path)?
    } else {
        (Config::default(), Vec::new())
    };
    Ok((with_env_overrides(config), warnings))
}

/// Apply environment variable overrides
pub fn with_env_overrides(config: Config) -> Config {
    apply_env_overrides(config, |key| std::env::var(key).ok(), &mut std::io::stderr())
}

/// Apply overrides from an arbitrary variable source.
pub fn apply_env_overrides<F, W>(mut config: Config, var: F, warnings: &mut W) -> Config
where
    F: Fn(&str) -> Option<String>,
    W: Write,
{
    let mut env = EnvOverrides::new(warnings);

    if let Some(namespace) = var("APOS_ASSET_NAMESPACE").filter(|v| !v.is_empty()) {
        config.namespace = namespace;
    }

    if var("NODE_ENV").as_deref() == Some("production") {
        config.production = true;
    }

    if let Some(value) = var("APOS_ASSET_DEBUG") {
        if env.flag("APOS_ASSET_DEBUG", &value, false) {
            config.output.verbosity = Verbosity::Debug;
        }
    }

    // Anything but an explicit "0" keeps watching on
    if let Some(value) = var("APOS_ASSET_WATCH") {
        config.build.watch = value.trim() != "0" && value.trim().to_lowercase() != "false";
    }

    if let Some(value) = var("APOS_ASSET_DEBOUNCE_MS") {
        config.build.debounce_ms =
            env.millis("APOS_ASSET_DEBOUNCE_MS", &value, config.build.debounce_ms);
    }

    if let Some(value) = var("APOS_UPLOADFS_ASSETS") {
        config.deploy.remote = env.flag("APOS_UPLOADFS_ASSETS", &value, config.deploy.remote);
    }

    if let Some(cache) = var("APOS_ASSET_CACHE").filter(|v| !v.is_empty()) {
        config.build.cache_dir = PathBuf::from(cache);
    }

    if let Some(value) = var("APOS_DEV") {
        config.build.force = env.flag("APOS_DEV", &value, config.build.force);
    }

    config
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    content
        .lines()
        .position(|line| line.contains(needle))
        .map(|i| i + 1)
}

fn suggest_key(unknown: &str) -> Option<String> {
    const CANDIDATES: &[&str] = &[
        "namespace",
        "production",
        "build",
        "watch",
        "debounce_ms",
        "source_maps",
        "dev_server",
        "cache_dir",
        "force",
        "bundler",
        "command",
        "args",
        "config",
        "build_module",
        "name",
        "alias",
        "hmr",
        "deploy",
        "remote",
        "remote_command",
        "remote_args",
        "remote_prefix",
        "output",
        "verbosity",
        "color",
        "modules",
        "extend",
        "package",
        "icons",
        "extensions",
        "bundles",
    ];

    closest(unknown, CANDIDATES.iter().copied()).map(str::to_string)
}
