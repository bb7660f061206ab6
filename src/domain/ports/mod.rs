//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure layer provides concrete implementations.

pub mod build_events;
pub mod build_module;
pub mod bundler;
pub mod file_system;
pub mod module_resolver;
pub mod release_destination;

pub use build_events::{emit_debug, BuildEvent, BuildEventSink, NoopEventSink};
pub use build_module::{
    BuildModule, BuildModuleDescriptor, BuildModuleRegistry, BuildRequest, ChangeNotifier,
    ReportedBuild,
};
pub use bundler::{BundleJob, BundleOutput, Bundler};
pub use file_system::{FileSystem, FsError, FsResult};
pub use module_resolver::{ModuleResolver, SymlinkedPackage};
pub use release_destination::{
    release_path, DeployedRelease, DestinationError, ReleaseDestination, ReleaseSource,
};
