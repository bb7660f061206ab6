//! Cache metadata value object

use std::path::{Path, PathBuf};

use regex::Regex;

use super::ContentHash;

/// Content-addressed cache directory for one entrypoint build.
#[derive(Debug, Clone)]
pub struct CacheMeta {
    /// Cache base directory shared by all entrypoints
    pub base: PathBuf,
    pub hash: ContentHash,
    /// `{base}/{hash}`
    pub location: PathBuf,
    /// Pattern matching symlinked packages, which are never treated as managed
    pub managed_paths_regex: Option<Regex>,
}

impl CacheMeta {
    /// Marker file written into `location` on every use
    pub const TIMESTAMP_FILE: &'static str = ".timestamp";

    pub fn new(base: impl Into<PathBuf>, hash: ContentHash, managed_paths_regex: Option<Regex>) -> Self {
        let base = base.into();
        let location = base.join(hash.as_str());
        Self {
            base,
            hash,
            location,
            managed_paths_regex,
        }
    }

    pub fn timestamp_path(&self) -> PathBuf {
        self.location.join(Self::TIMESTAMP_FILE)
    }

    /// Whether a path lives in an installed dependency the bundler may treat
    /// as immutable. Symlinked (locally developed) packages are excluded.
    pub fn is_managed(&self, path: &Path) -> bool {
        let text = path.to_string_lossy().replace('\\', "/");
        let in_dependencies = text.split('/').any(|segment| segment == "node_modules");
        if !in_dependencies {
            return false;
        }
        match &self.managed_paths_regex {
            Some(exempt) => !exempt.is_match(&text),
            None => true,
        }
    }

    /// Source of the exemption pattern, for bundler configuration
    pub fn managed_paths_pattern(&self) -> Option<&str> {
        self.managed_paths_regex.as_ref().map(Regex::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_is_base_joined_with_hash() {
        let hash = ContentHash::from_content("x");
        let meta = CacheMeta::new("/cache", hash.clone(), None);
        assert_eq!(meta.location, PathBuf::from("/cache").join(hash.as_str()));
        assert!(meta.timestamp_path().ends_with(".timestamp"));
    }

    #[test]
    fn dependencies_are_managed_unless_exempt() {
        let exempt = Regex::new(r"node_modules/(?:linked-pkg)(?:/|$)").unwrap();
        let meta = CacheMeta::new("/cache", ContentHash::from_content("x"), Some(exempt));
        assert!(meta.is_managed(Path::new("/p/node_modules/lodash/index.js")));
        assert!(!meta.is_managed(Path::new("/p/node_modules/linked-pkg/ui/src/index.js")));
        assert!(!meta.is_managed(Path::new("/p/modules/article/ui/src/index.js")));
    }
}
