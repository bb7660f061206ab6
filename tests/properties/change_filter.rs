//! Property tests for change-list entrypoint selection.

use proptest::prelude::*;

use apos_asset::domain::entities::{Entrypoint, EntrypointKind, Extensions, SourceMap};
use apos_asset::domain::services::{affected_by, select_for_changes};

const FOLDERS: [&str; 4] = ["src", "public", "apos", "other"];

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

fn entrypoints() -> Vec<Entrypoint> {
    vec![
        index("src"),
        Entrypoint::new("public", EntrypointKind::Bundled),
        Entrypoint::new("apos", EntrypointKind::Apos),
    ]
}

fn change() -> impl Strategy<Value = (String, String)> {
    (
        "[a-z][a-z-]{0,7}",
        proptest::sample::select(FOLDERS.to_vec()),
        "[a-z]{1,8}\\.(js|scss|vue)",
    )
        .prop_map(|(module, folder, file)| {
            (
                folder.to_string(),
                format!("modules/{}/ui/{}/{}", module, folder, file),
            )
        })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: A change selects exactly the entrypoint reading its `ui/` folder.
    #[test]
    fn property_change_selects_its_folder((folder, path) in change()) {
        let entries = entrypoints();
        let selected = select_for_changes(&entries, &[path]);
        let expected: Vec<&str> = entries
            .iter()
            .filter(|e| e.source_folder() == folder)
            .map(|e| e.name.as_str())
            .collect();
        prop_assert_eq!(selected, expected);
    }

    /// PROPERTY: Windows separators select the same entrypoints.
    #[test]
    fn property_backslashes_match_like_slashes((_, path) in change()) {
        for entry in entrypoints() {
            prop_assert_eq!(
                affected_by(&entry, &[path.replace('/', "\\")]),
                affected_by(&entry, &[path.clone()])
            );
        }
    }

    /// PROPERTY: Adding changes never deselects an entrypoint.
    #[test]
    fn property_selection_is_monotonic(
        first in proptest::collection::vec(change(), 0..4),
        second in proptest::collection::vec(change(), 0..4),
    ) {
        let entries = entrypoints();
        let a: Vec<String> = first.into_iter().map(|(_, p)| p).collect();
        let mut b = a.clone();
        b.extend(second.into_iter().map(|(_, p)| p));
        let small = select_for_changes(&entries, &a);
        let large = select_for_changes(&entries, &b);
        prop_assert!(small.iter().all(|name| large.contains(name)));
    }
}
