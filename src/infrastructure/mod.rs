//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `fs/` - Local file system, atomic writes, tree listing and copying
//! - `modules/` - Module resolver backed by `modules/` and `node_modules/`
//! - `bundler/`, `build_module/` - External build tool adapters
//! - `deploy/` - Release destinations (local, remote)
//! - `events/` - Event sinks (console, NDJSON)

pub mod build_lock;
pub mod build_module;
pub mod bundler;
pub mod cache;
pub mod deploy;
pub mod events;
pub mod fs;
pub mod lockfile;
pub mod manifest_store;
pub mod modules;
pub mod scanner;

// Re-export for convenience
pub use build_lock::{BuildLock, LOCK_FILE};
pub use build_module::CommandBuildModule;
pub use bundler::CommandBundler;
pub use deploy::{LocalReleaseDestination, RemoteReleaseDestination};
pub use events::{ConsoleEventSink, JsonEventSink};
pub use fs::LocalFs;
pub use lockfile::DependencyLock;
pub use manifest_store::ManifestStore;
pub use modules::FsModuleResolver;
pub use scanner::{compute_source_meta, scan_all};
