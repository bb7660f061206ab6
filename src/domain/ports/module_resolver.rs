//! Module Resolver Port
//!
//! The asset pipeline does not own module registration; it only asks for
//! each module's inheritance chain and for the packages linked into
//! `node_modules` for local development.

use std::path::PathBuf;

use crate::domain::entities::ChainLink;
use crate::error::AssetResult;

/// A package under `node_modules` that is a symlink (e.g. `npm link`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymlinkedPackage {
    /// Package name, including scope (`@org/pkg`)
    pub name: String,
    /// The link location inside `node_modules`
    pub path: PathBuf,
}

/// Source of module metadata.
///
/// Implementations:
/// - `FsModuleResolver` - declarations from `apos-asset.toml` resolved on disk
pub trait ModuleResolver: Send + Sync {
    /// Registered module names, in registration order
    fn module_names(&self) -> Vec<String>;

    /// Inheritance chain of `name`, base first, most-derived last
    fn chain(&self, name: &str) -> AssetResult<Vec<ChainLink>>;

    /// Symlinked package roots directly under `node_modules`
    fn symlinked_packages(&self) -> Vec<SymlinkedPackage>;
}
