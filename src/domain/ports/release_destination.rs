//! Release Destination Port
//!
//! Where a production build is published. The build orchestrator hands over
//! a finished bundle directory; the destination decides how it gets there.

use std::path::{Path, PathBuf};

/// Error during deploy
#[derive(Debug, Clone)]
pub enum DestinationError {
    /// File system error
    IoError(String),
    /// Transfer command failed
    CommandFailed(String),
    /// Destination not usable in this environment
    NotAvailable(String),
}

impl std::fmt::Display for DestinationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IoError(msg) => write!(f, "I/O error: {}", msg),
            Self::CommandFailed(msg) => write!(f, "Command failed: {}", msg),
            Self::NotAvailable(msg) => write!(f, "Not available: {}", msg),
        }
    }
}

impl std::error::Error for DestinationError {}

impl From<std::io::Error> for DestinationError {
    fn from(err: std::io::Error) -> Self {
        DestinationError::IoError(err.to_string())
    }
}

/// What gets published for one release.
#[derive(Debug, Clone)]
pub struct ReleaseSource<'a> {
    pub release_id: &'a str,
    pub namespace: &'a str,
    /// Finished bundle directory (`public/apos-frontend/{ns}`)
    pub bundle_dir: &'a Path,
    /// Source maps to publish alongside, when the build produced them
    pub source_maps: Option<&'a Path>,
}

/// Outcome of a deploy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployedRelease {
    pub release_id: String,
    /// Final location, as the destination names it
    pub location: String,
    pub files: usize,
}

/// Trait for release destinations
///
/// Implementations:
/// - `LocalReleaseDestination` - `public/apos-frontend/releases/{id}/{ns}`
/// - `RemoteReleaseDestination` - external transfer command (rsync, cloud CLI)
pub trait ReleaseDestination: Send + Sync {
    /// Display name for progress output
    fn display_name(&self) -> String;

    /// Where a release would land, without publishing it
    fn release_location(&self, release_id: &str, namespace: &str) -> String;

    fn publish(&self, source: &ReleaseSource<'_>) -> Result<DeployedRelease, DestinationError>;
}

/// Relative release path shared by all destinations
pub fn release_path(release_id: &str, namespace: &str) -> PathBuf {
    Path::new("apos-frontend")
        .join("releases")
        .join(release_id)
        .join(namespace)
}
