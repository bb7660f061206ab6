//! Build use case
//!
//! Turns module `ui/` sources into scene bundles, persists the manifest the
//! page renderer reads, and publishes production releases.

mod decision;
mod options;
mod result;
mod state;
mod use_case;


pub use decision::{decide, Decision, SkipFacts};
pub use options::{BuildOptions, BuildPaths};
pub use result::BuildReport;
pub use state::{AssetBuildState, AssetTag, AssetTagKind, BuildSnapshot};
pub use use_case::{merged_bundler_config, AssetBuilder};
