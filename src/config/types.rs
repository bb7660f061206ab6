//! Configuration type definitions

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::AssetResult;

use super::loader;
use crate::domain::value_objects::ConfigWarning;

/// Config file name in the project root
pub const CONFIG_FILE: &str = "apos-asset.toml";

/// Build behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Rebuild on source changes in development
    #[serde(default = "default_true")]
    pub watch: bool,

    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    #[serde(default)]
    pub source_maps: bool,

    /// Start the build module's dev server instead of building
    #[serde(default)]
    pub dev_server: bool,

    /// Bundler cache base, relative to the project root
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,

    /// Rebuild the admin UI even when it looks up to date
    #[serde(default)]
    pub force: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            watch: true,
            debounce_ms: default_debounce_ms(),
            source_maps: false,
            dev_server: false,
            cache_dir: default_cache_dir(),
            force: false,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_debounce_ms() -> u64 {
    1000
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from("data/temp/asset-cache")
}

fn default_namespace() -> String {
    "default".to_string()
}

/// Internal bundler command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundlerConfig {
    #[serde(default = "default_bundler_command")]
    pub command: String,

    #[serde(default = "default_bundler_args")]
    pub args: Vec<String>,

    /// Base bundler configuration; module extensions merge on top
    #[serde(default = "empty_object")]
    pub config: Value,
}

impl Default for BundlerConfig {
    fn default() -> Self {
        Self {
            command: default_bundler_command(),
            args: default_bundler_args(),
            config: empty_object(),
        }
    }
}

fn default_bundler_command() -> String {
    "npx".to_string()
}

fn default_bundler_args() -> Vec<String> {
    vec!["webpack".to_string()]
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

/// External build module, driven through a command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildModuleConfig {
    pub name: String,

    #[serde(default)]
    pub alias: Option<String>,

    #[serde(default)]
    pub dev_server: bool,

    #[serde(default)]
    pub hmr: bool,

    pub command: String,

    #[serde(default)]
    pub args: Vec<String>,
}

/// Release publishing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeployConfig {
    /// Publish through `remote_command` instead of the local releases folder
    #[serde(default)]
    pub remote: bool,

    #[serde(default = "default_remote_command")]
    pub remote_command: String,

    /// `{source}` and `{dest}` are substituted
    #[serde(default = "default_remote_args")]
    pub remote_args: Vec<String>,

    /// Prefix of the remote location (bucket mount, `host:path`, ...)
    #[serde(default)]
    pub remote_prefix: String,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            remote: false,
            remote_command: default_remote_command(),
            remote_args: default_remote_args(),
            remote_prefix: String::new(),
        }
    }
}

fn default_remote_command() -> String {
    "rsync".to_string()
}

fn default_remote_args() -> Vec<String> {
    vec!["-a".into(), "{source}/".into(), "{dest}".into()]
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OutputConfig {
    #[serde(default)]
    pub verbosity: Verbosity,

    #[serde(default)]
    pub color: ColorMode,
}

/// Color output mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

/// Verbosity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    Quiet,
    #[default]
    Normal,
    Verbose,
    Debug,
}

/// Per-module build declarations
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ModuleBuildConfig {
    /// Named bundler configuration layers
    #[serde(default)]
    pub extensions: Map<String, Value>,

    /// Extra bundles, keyed by bundle name
    #[serde(default)]
    pub bundles: BTreeMap<String, Value>,
}

/// One `[[modules]]` entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleDeclaration {
    pub name: String,

    /// Base module this one extends
    #[serde(default)]
    pub extend: Option<String>,

    /// npm package providing the module
    #[serde(default)]
    pub package: Option<String>,

    /// Icon name -> component name
    #[serde(default)]
    pub icons: Option<Value>,

    #[serde(default)]
    pub build: ModuleBuildConfig,
}

impl ModuleDeclaration {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extend: None,
            package: None,
            icons: None,
            build: ModuleBuildConfig::default(),
        }
    }

    pub fn extending(mut self, base: impl Into<String>) -> Self {
        self.extend = Some(base.into());
        self
    }

    pub fn from_package(mut self, package: impl Into<String>) -> Self {
        self.package = Some(package.into());
        self
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Build namespace (separate builds of one project)
    #[serde(default = "default_namespace")]
    pub namespace: String,

    #[serde(default)]
    pub production: bool,

    #[serde(default)]
    pub build: BuildConfig,

    #[serde(default)]
    pub bundler: BundlerConfig,

    #[serde(default)]
    pub build_module: Option<BuildModuleConfig>,

    #[serde(default)]
    pub deploy: DeployConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub modules: Vec<ModuleDeclaration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            production: false,
            build: BuildConfig::default(),
            bundler: BundlerConfig::default(),
            build_module: None,
            deploy: DeployConfig::default(),
            output: OutputConfig::default(),
            modules: Vec::new(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> AssetResult<Self> {
        let (config, _warnings) = loader::load_with_warnings(path)?;
        Ok(config)
    }

    /// Load configuration and collect non-fatal warnings (e.g. unknown keys).
    pub fn load_with_warnings(path: &Path) -> AssetResult<(Self, Vec<ConfigWarning>)> {
        loader::load_with_warnings(path)
    }

    /// Load `apos-asset.toml` from the project root (defaults when absent),
    /// then apply environment overrides.
    pub fn load_project(project_root: &Path) -> AssetResult<(Self, Vec<ConfigWarning>)> {
        loader::load_project(project_root)
    }

    /// Apply environment variable overrides (APOS_* prefix)
    pub fn with_env_overrides(self) -> Self {
        loader::with_env_overrides(self)
    }

    /// Absolute cache base for a project
    pub fn cache_base(&self, project_root: &Path) -> PathBuf {
        project_root.join(&self.build.cache_dir)
    }

    pub fn module(&self, name: &str) -> Option<&ModuleDeclaration> {
        self.modules.iter().find(|m| m.name == name)
    }
}
