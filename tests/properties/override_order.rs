//! Property tests for source override order.

use std::path::PathBuf;

use proptest::prelude::*;

use apos_asset::domain::services::{keep_most_derived, SourceFile};

fn file(module: usize, component: &str) -> SourceFile {
    SourceFile {
        import_path: format!("Modules/m{}/components/{}.vue", module, component),
        path: PathBuf::from(format!("/modules/m{}/ui/apos/components/{}.vue", module, component)),
        module: Some(format!("m{}", module)),
    }
}

/// Files in chain order: base modules first
fn chain() -> impl Strategy<Value = Vec<SourceFile>> {
    proptest::collection::vec(
        proptest::sample::select(vec!["AposButton", "AposModal", "AposLogo", "Card"]),
        0..16,
    )
    .prop_map(|picks| {
        picks
            .into_iter()
            .enumerate()
            .map(|(i, component)| file(i, component))
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: At most one file survives per component name.
    #[test]
    fn property_component_names_are_unique(files in chain()) {
        let kept = keep_most_derived(files);
        let mut names: Vec<&str> = kept.iter().map(|f| f.component_name()).collect();
        let total = names.len();
        names.sort();
        names.dedup();
        prop_assert_eq!(names.len(), total);
    }

    /// PROPERTY: The survivor is the last file in chain order (the most derived module).
    #[test]
    fn property_most_derived_file_wins(files in chain()) {
        let kept = keep_most_derived(files.clone());
        for survivor in &kept {
            let last = files
                .iter()
                .rev()
                .find(|f| f.component_name() == survivor.component_name());
            prop_assert_eq!(Some(survivor), last);
        }
    }

    /// PROPERTY: Survivors keep their relative chain order.
    #[test]
    fn property_survivors_keep_chain_order(files in chain()) {
        let kept = keep_most_derived(files.clone());
        let positions: Vec<usize> = kept
            .iter()
            .map(|k| files.iter().position(|f| f == k).unwrap())
            .collect();
        let mut sorted = positions.clone();
        sorted.sort();
        prop_assert_eq!(positions, sorted);
    }
}
