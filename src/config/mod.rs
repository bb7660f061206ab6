//! Configuration module for apos-asset
//!
//! Configuration hierarchy:
//! 1. CLI flags (highest priority)
//! 2. Environment variables (APOS_*, NODE_ENV)
//! 3. Project config (apos-asset.toml)
//! 4. Built-in defaults (lowest priority)

mod env_override;
mod loader;
mod types;

pub use crate::domain::value_objects::ConfigWarning;

pub use loader::apply_env_overrides;
pub use types::{
    BuildConfig, BuildModuleConfig, BundlerConfig, ColorMode, Config, DeployConfig,
    ModuleBuildConfig, ModuleDeclaration, OutputConfig, Verbosity, CONFIG_FILE,
};
