//! apos-asset - asset build orchestration for modular CMS projects
//!
//! Discovers frontend sources across module inheritance chains, composes
//! them into entrypoints, hands them to a bundler or an external build
//! module, assembles per-scene bundles and publishes versioned releases.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod presentation;

// Re-exports for convenience
pub use application::{
    resolve_release_id, AssetBuilder, BuildOptions, BuildReport, RestartSignal, WatchOptions,
    WatchUseCase,
};
pub use config::Config;
pub use error::{AssetError, AssetResult};
