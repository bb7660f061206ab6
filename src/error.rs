//! Error types for apos-asset
//!
//! Library code returns `AssetResult`; the binary wraps it in `anyhow` at
//! the command boundary.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for asset pipeline operations
pub type AssetResult<T> = Result<T, AssetError>;

/// Main error type for asset pipeline operations
#[derive(Error, Debug)]
pub enum AssetError {
    /// Invalid or inconsistent configuration
    #[error("invalid configuration in {file}: {message}")]
    Config { file: PathBuf, message: String },

    /// A module `extend` chain loops back on itself
    #[error("module inheritance cycle detected: {chain}")]
    ModuleCycle { chain: String },

    /// Only one external build module may register per process
    #[error("build module '{attempted}' cannot register: '{existing}' is already the registered build module")]
    BuildModuleAlreadyRegistered { existing: String, attempted: String },

    /// External build module registered without an alias
    #[error("build module '{name}' must declare an alias")]
    MissingAlias { name: String },

    /// `icons` declared as something other than a plain mapping
    #[error("module '{module}': icons must be a mapping of icon name to component, found {found}")]
    InvalidIcons { module: String, found: String },

    /// Malformed per-module build extension declaration
    #[error("module '{module}': invalid build declaration '{key}': {message}")]
    InvalidBuildExtension {
        module: String,
        key: String,
        message: String,
    },

    /// Two entrypoints share a name in one build run
    #[error("duplicate entrypoint name '{name}'")]
    DuplicateEntrypoint { name: String },

    /// A source file that must export a default value does not
    #[error("the file {file} does not export a default value (expected `export default`)")]
    MissingDefaultExport { file: PathBuf },

    /// Output generation requested for an entrypoint kind that has none
    #[error("entrypoint '{name}' ({kind}) does not generate import output")]
    OutputUnsupported { name: String, kind: &'static str },

    /// Internal bundler failed
    #[error("bundler failed for entrypoint '{entrypoint}': {message}")]
    Bundler { entrypoint: String, message: String },

    /// External build module failed
    #[error("build module '{module}' failed: {message}")]
    BuildModule { module: String, message: String },

    /// No release identifier could be determined in production
    #[error("unable to determine a release id; set the APOS_RELEASE_ID environment variable to a unique value for each deployment")]
    ReleaseIdUnavailable,

    /// Release deployment failed
    #[error("deploy to {destination} failed: {message}")]
    Deploy {
        destination: String,
        message: String,
    },

    /// Saved manifest could not be read or written
    #[error("manifest error at {path}: {message}")]
    Manifest { path: PathBuf, message: String },

    /// File watcher setup failed
    #[error("watch error: {0}")]
    Watch(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl AssetError {
    /// Shorthand for configuration errors
    pub fn config(file: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        AssetError::Config {
            file: file.into(),
            message: message.into(),
        }
    }
}
