//! Domain Entities
//!
//! - `ChainLink` / `ModuleSourceRecord` - a module's inheritance chain and its `ui/` scan
//! - `Entrypoint` - one buildable unit and its build results
//! - `BuildManifest` / `SavedManifest` - build output, live and persisted

mod entrypoint;
mod manifest;
mod module_source;

pub use entrypoint::{Entrypoint, EntrypointKind, Extensions, SourceMap};
pub use manifest::{
    BuildManifest, EntrypointManifest, ManifestFiles, ManifestRecord, SavedManifest,
};
pub use module_source::{canonical_module_name, ChainLink, ModuleSourceRecord, LOCAL_ALIAS_PREFIX};
