//! Change-list selection
//!
//! Watch-triggered builds only run the entrypoints whose source folder a
//! changed path touches. The match is on the `/ui/{folder}/` path fragment.

use crate::domain::entities::Entrypoint;

/// `/ui/{folder}/`
pub fn source_fragment(entry: &Entrypoint) -> String {
    format!("/ui/{}/", entry.source_folder())
}

/// Whether any changed path belongs to the entrypoint's source folder.
pub fn affected_by(entry: &Entrypoint, changes: &[String]) -> bool {
    let fragment = source_fragment(entry);
    changes
        .iter()
        .any(|path| format!("/{}", path.replace('\\', "/")).contains(&fragment))
}

/// Names of the entrypoints a change list selects, in declared order.
pub fn select_for_changes<'a>(entrypoints: &'a [Entrypoint], changes: &[String]) -> Vec<&'a str> {
    entrypoints
        .iter()
        .filter(|entry| affected_by(entry, changes))
        .map(|entry| entry.name.as_str())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{EntrypointKind, Extensions, SourceMap};

    fn index(name: &str) -> Entrypoint {
        Entrypoint::new(
            name,
            EntrypointKind::Index {
                sources: SourceMap::new(),
                ignore_sources: Vec::new(),
                extensions: Extensions::new(),
            },
        )
    }

    #[test]
    fn selects_only_matching_source_folder() {
        let entries = vec![index("src"), Entrypoint::new("apos", EntrypointKind::Apos)];
        let changes = vec!["modules/foo/ui/src/index.js".to_string()];
        assert_eq!(select_for_changes(&entries, &changes), vec!["src"]);
    }

    #[test]
    fn fragment_matches_paths_starting_with_ui() {
        let entry = Entrypoint::new("apos", EntrypointKind::Apos);
        assert!(affected_by(&entry, &["ui/apos/components/A.vue".to_string()]));
        assert!(!affected_by(&entry, &["modules/x/ui/apostrophe/a.js".to_string()]));
    }

    #[test]
    fn empty_change_list_selects_nothing() {
        assert!(select_for_changes(&[index("src")], &[]).is_empty());
    }
}
