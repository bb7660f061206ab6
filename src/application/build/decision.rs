//! Per-entrypoint rebuild decision

use std::time::SystemTime;

use crate::domain::entities::Entrypoint;
use crate::domain::services::affected_by;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Run,
    Skip(&'static str),
}

/// Facts the decision depends on, gathered by the orchestrator.
#[derive(Debug, Clone, Copy, Default)]
pub struct SkipFacts {
    pub force: bool,
    pub bundle_dir_exists: bool,
    /// A previous build of this entrypoint is known (state or saved manifest)
    pub has_previous: bool,
    /// Neither build state nor a saved manifest exists for any entrypoint
    pub first_build: bool,
    /// mtime of `{build_dir}/.{name}-timestamp`
    pub timestamp: Option<SystemTime>,
    /// mtime of the dependency lock file
    pub lock_modified: Option<SystemTime>,
}

/// With a change list, run iff a change touches the entrypoint's source
/// folder, except on a first build where everything runs. Without one, only
/// the admin UI may be skipped, and only when its last build is newer than
/// the installed dependencies.
pub fn decide(entry: &Entrypoint, changes: Option<&[String]>, facts: &SkipFacts) -> Decision {
    if let Some(changes) = changes {
        if facts.first_build || affected_by(entry, changes) {
            return Decision::Run;
        }
        return Decision::Skip("no relevant changes");
    }

    if !entry.supports_skip() || facts.force || !facts.bundle_dir_exists || !facts.has_previous {
        return Decision::Run;
    }
    match (facts.timestamp, facts.lock_modified) {
        (Some(built), Some(installed)) if built > installed => Decision::Skip("up-to-date"),
        _ => Decision::Run,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{EntrypointKind, Extensions, SourceMap};
    use std::time::Duration;

    fn apos() -> Entrypoint {
        Entrypoint::new("apos", EntrypointKind::Apos)
    }

    fn src() -> Entrypoint {
        Entrypoint::new(
            "src",
            EntrypointKind::Index {
                sources: SourceMap::new(),
                ignore_sources: Vec::new(),
                extensions: Extensions::new(),
            },
        )
    }

    fn fresh() -> SkipFacts {
        let installed = SystemTime::UNIX_EPOCH + Duration::from_secs(100);
        SkipFacts {
            force: false,
            bundle_dir_exists: true,
            has_previous: true,
            first_build: false,
            timestamp: Some(installed + Duration::from_secs(1)),
            lock_modified: Some(installed),
        }
    }

    #[test]
    fn admin_ui_newer_than_lock_is_skipped() {
        assert_eq!(decide(&apos(), None, &fresh()), Decision::Skip("up-to-date"));
    }

    #[test]
    fn project_build_always_runs() {
        assert_eq!(decide(&src(), None, &fresh()), Decision::Run);
    }

    #[test]
    fn force_missing_bundle_dir_or_stale_timestamp_runs() {
        let forced = SkipFacts { force: true, ..fresh() };
        assert_eq!(decide(&apos(), None, &forced), Decision::Run);

        let no_bundles = SkipFacts { bundle_dir_exists: false, ..fresh() };
        assert_eq!(decide(&apos(), None, &no_bundles), Decision::Run);

        let stale = SkipFacts {
            timestamp: fresh().lock_modified,
            ..fresh()
        };
        assert_eq!(decide(&apos(), None, &stale), Decision::Run);
    }

    #[test]
    fn missing_lock_file_never_skips() {
        let facts = SkipFacts { lock_modified: None, ..fresh() };
        assert_eq!(decide(&apos(), None, &facts), Decision::Run);
    }

    #[test]
    fn change_list_selects_by_source_folder() {
        let changes = vec!["modules/article/ui/src/index.js".to_string()];
        assert_eq!(decide(&src(), Some(&changes), &fresh()), Decision::Run);
        assert_eq!(
            decide(&apos(), Some(&changes), &fresh()),
            Decision::Skip("no relevant changes")
        );
    }

    #[test]
    fn change_list_on_first_build_runs_everything() {
        let changes = vec!["modules/article/ui/src/index.js".to_string()];
        let facts = SkipFacts {
            has_previous: false,
            first_build: true,
            ..fresh()
        };
        assert_eq!(decide(&apos(), Some(&changes), &facts), Decision::Run);
    }

    #[test]
    fn change_list_ignores_untouched_entrypoint_missing_from_last_build() {
        let changes = vec!["modules/article/ui/src/index.js".to_string()];
        let facts = SkipFacts { has_previous: false, ..fresh() };
        assert_eq!(
            decide(&apos(), Some(&changes), &facts),
            Decision::Skip("no relevant changes")
        );
    }
}
