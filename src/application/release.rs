//! Release identifier resolution
//!
//! A production build is published under a release id that must be unique
//! per deployment. Sources are tried in order:
//!
//! 1. `APOS_RELEASE_ID`
//! 2. `HEROKU_RELEASE_VERSION`
//! 3. `PLATFORM_TREE_ID`
//! 4. a `release-id` file in the project root
//! 5. a timestamped deployment folder in the project path
//!    (`.../deployments/2024-03-01-12-00-00`)
//! 6. `git rev-parse --short HEAD`

use std::fs;
use std::path::Path;
use std::process::{Command, Stdio};

use regex::Regex;

use crate::error::{AssetError, AssetResult};

/// Env variables checked first, in priority order
pub const RELEASE_ENV_VARS: [&str; 3] = [
    "APOS_RELEASE_ID",
    "HEROKU_RELEASE_VERSION",
    "PLATFORM_TREE_ID",
];

pub const RELEASE_ID_FILE: &str = "release-id";

/// Resolve the release id from the process environment and git.
pub fn resolve_release_id(project_root: &Path) -> AssetResult<String> {
    resolve_release_id_with(project_root, |key| std::env::var(key).ok(), git_short_head)
}

pub fn resolve_release_id_with<E, G>(project_root: &Path, get_env: E, git: G) -> AssetResult<String>
where
    E: Fn(&str) -> Option<String>,
    G: Fn(&Path) -> Option<String>,
{
    let from_env = RELEASE_ENV_VARS
        .iter()
        .filter_map(|key| get_env(key))
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty());
    if let Some(id) = from_env {
        return Ok(id);
    }

    if let Ok(content) = fs::read_to_string(project_root.join(RELEASE_ID_FILE)) {
        let id = content.trim();
        if !id.is_empty() {
            return Ok(id.to_string());
        }
    }

    if let Some(id) = dated_path_segment(project_root) {
        return Ok(id);
    }

    git(project_root)
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .ok_or(AssetError::ReleaseIdUnavailable)
}

/// First path segment starting with a `YYYY-MM-DD` (or `YYYYMMDD`) date.
pub fn dated_path_segment(path: &Path) -> Option<String> {
    let pattern = Regex::new(r"^\d{4}-?\d{2}-?\d{2}").ok()?;
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .find(|segment| pattern.is_match(segment))
        .map(|segment| segment.into_owned())
}

/// `git rev-parse --short HEAD` in `root`
pub fn git_short_head(root: &Path) -> Option<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .current_dir(root)
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
}
