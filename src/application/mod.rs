//! Application Layer
//!
//! Use cases that orchestrate the business flow.
//! This layer:
//! - Depends on Domain layer (entities, services, ports)
//! - Does NOT contain business rules (those are in Domain)
//! - Coordinates between Infrastructure and Domain
//!
//! ## Use Cases
//!
//! - `AssetBuilder` - Scans, composes, bundles and publishes one namespace
//! - `WatchUseCase` - Incremental rebuilds on file changes
//!
//! ## Services
//!
//! - `resolve_release_id` - Release identifier resolution chain
//! - `RestartSignal` - Reload id polled by open pages

pub mod build;
pub mod release;
pub mod restart;
pub mod watch;

pub use build::{
    AssetBuildState, AssetBuilder, AssetTag, AssetTagKind, BuildOptions, BuildPaths, BuildReport,
    BuildSnapshot,
};
pub use release::{resolve_release_id, resolve_release_id_with};
pub use restart::RestartSignal;
pub use watch::{ChangePool, RebuildNotice, RebuildQueue, Trigger, WatchOptions, WatchUseCase};
