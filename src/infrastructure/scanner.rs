//! Source meta scanner
//!
//! Lists the `ui/` tree of every chain link of the requested modules. Links
//! shared by several modules (a common base) are scanned once, at their
//! first position, so base records always precede subclass records.

use std::collections::HashSet;

use crate::domain::entities::ModuleSourceRecord;
use crate::domain::ports::ModuleResolver;
use crate::error::AssetResult;

use super::fs::list_files;

pub fn compute_source_meta(
    resolver: &dyn ModuleResolver,
    modules: &[String],
) -> AssetResult<Vec<ModuleSourceRecord>> {
    let mut seen = HashSet::new();
    let mut records = Vec::new();

    for module in modules {
        for link in resolver.chain(module)? {
            if !seen.insert(link.dirname.clone()) {
                continue;
            }
            let ui = link.ui_dir();
            let exists = ui.is_dir();
            let files = if exists { list_files(&ui)? } else { Vec::new() };
            records.push(ModuleSourceRecord::from_link(&link, exists, files));
        }
    }

    Ok(records)
}

/// Scan every module the resolver knows, in registration order
pub fn scan_all(resolver: &dyn ModuleResolver) -> AssetResult<Vec<ModuleSourceRecord>> {
    compute_source_meta(resolver, &resolver.module_names())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModuleDeclaration;
    use crate::infrastructure::modules::FsModuleResolver;
    use pretty_assertions::assert_eq;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    fn fixture() -> (tempfile::TempDir, FsModuleResolver) {
        let dir = tempdir().unwrap();
        touch(dir.path(), "modules/base/ui/src/index.js");
        touch(dir.path(), "modules/base/ui/apos/components/Thing.vue");
        touch(dir.path(), "modules/article/ui/src/index.js");
        touch(dir.path(), "modules/article/ui/node_modules/dep/index.js");
        touch(dir.path(), "modules/event/ui/src/index.scss");
        fs::create_dir_all(dir.path().join("modules/empty")).unwrap();
        let resolver = FsModuleResolver::new(
            dir.path(),
            vec![
                ModuleDeclaration::new("article").extending("base"),
                ModuleDeclaration::new("event").extending("base"),
                ModuleDeclaration::new("empty"),
            ],
        );
        (dir, resolver)
    }

    #[test]
    fn shared_bases_are_scanned_once_in_chain_order() {
        let (_dir, resolver) = fixture();
        let records = scan_all(&resolver).unwrap();
        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["base", "article", "event", "empty"]);
        assert_eq!(records[0].files, vec!["apos/components/Thing.vue", "src/index.js"]);
        assert_eq!(records[1].files, vec!["src/index.js"]);
        assert!(!records[3].exists);
        assert!(records[3].files.is_empty());
    }

    #[test]
    fn scanning_is_deterministic() {
        let (_dir, resolver) = fixture();
        assert_eq!(scan_all(&resolver).unwrap(), scan_all(&resolver).unwrap());
    }
}
