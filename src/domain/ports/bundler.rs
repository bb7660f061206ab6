//! Bundler Port
//!
//! The internal bundler turns an entrypoint's generated glue files into
//! output files. The pipeline only cares about what files came out.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::domain::entities::{Entrypoint, ManifestFiles};
use crate::domain::value_objects::CacheMeta;
use crate::error::AssetResult;

/// One bundler invocation for one entrypoint.
#[derive(Debug)]
pub struct BundleJob<'a> {
    pub entrypoint: &'a Entrypoint,
    /// Generated glue file per input extension (`js` -> `{name}-import.js`)
    pub entry_files: BTreeMap<String, PathBuf>,
    /// Directory the bundler writes into
    pub output_dir: &'a Path,
    /// Staged module `ui/` trees, the target of the `Modules/` import alias
    pub modules_dir: &'a Path,
    pub cache: &'a CacheMeta,
    /// Merged bundler configuration for this entrypoint
    pub config: &'a Value,
    pub source_maps: bool,
    pub production: bool,
}

/// What a bundler run produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BundleOutput {
    /// Files relative to the job's `output_dir`
    pub files: ManifestFiles,
    /// Non-fatal diagnostics
    pub warnings: Vec<String>,
}

/// Internal bundler.
///
/// Implementations:
/// - `CommandBundler` - runs a configured bundler CLI
pub trait Bundler: Send + Sync {
    /// Name shown in progress output
    fn name(&self) -> &str;

    fn bundle(&self, job: &BundleJob<'_>) -> AssetResult<BundleOutput>;
}
