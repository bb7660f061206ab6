//! Build Result

use crate::domain::ports::DeployedRelease;

/// Result of one build run
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    /// Entrypoints rebuilt, in declared order
    pub built: Vec<String>,
    /// Entrypoints left as they were
    pub skipped: Vec<String>,
    /// Scenes whose bundles were rewritten
    pub scenes: Vec<String>,
    /// Bundle files written
    pub bundles: Vec<String>,
    /// Set when a production build was published
    pub release: Option<DeployedRelease>,
    pub warnings: Vec<String>,
}

impl BuildReport {
    pub fn has_changes(&self) -> bool {
        !self.built.is_empty()
    }
}
