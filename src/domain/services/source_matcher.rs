//! Source file matcher
//!
//! Selects files from scanned module records by predicate and maps each to
//! the import path used in generated glue code. Results are grouped per
//! output (`js`, `scss`, `components`, ...) and keyed by import path:
//! inserting an existing key replaces the file but keeps its position.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};

use crate::domain::entities::ModuleSourceRecord;

/// A matched source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Import path written into glue code
    pub import_path: String,
    /// Absolute path on disk
    pub path: PathBuf,
    /// Owning module, when the file belongs to a scanned record
    pub module: Option<String>,
}

impl SourceFile {
    /// File stem of the import path (`Modules/x/components/AposButton.vue` -> `AposButton`)
    pub fn component_name(&self) -> &str {
        file_stem(&self.import_path)
    }
}

/// Last path segment without its final extension.
pub fn file_stem(import_path: &str) -> &str {
    let base = import_path.rsplit('/').next().unwrap_or(import_path);
    match base.rfind('.') {
        Some(dot) if dot > 0 => &base[..dot],
        _ => base,
    }
}

/// Insertion-ordered files keyed by import path
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderedSources {
    files: Vec<SourceFile>,
    index: HashMap<String, usize>,
}

impl OrderedSources {
    pub fn insert(&mut self, file: SourceFile) {
        match self.index.get(&file.import_path) {
            Some(&at) => self.files[at] = file,
            None => {
                self.index.insert(file.import_path.clone(), self.files.len());
                self.files.push(file);
            }
        }
    }

    pub fn files(&self) -> &[SourceFile] {
        &self.files
    }

    pub fn into_files(self) -> Vec<SourceFile> {
        self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Matched files per output name
pub type SourceFileSet = BTreeMap<String, Vec<SourceFile>>;

/// Decides whether `file` (relative to `ui/`) of a record belongs to an output
pub type SourcePredicate<'a> = (&'a str, &'a dyn Fn(&str, &ModuleSourceRecord) -> bool);

/// Maps a matched file to its import path
pub type PathComposer<'a> = &'a dyn Fn(&str, &ModuleSourceRecord) -> String;

#[derive(Default)]
pub struct FindSourceOptions<'a> {
    /// Defaults to `./{module}/{file}`
    pub path_composer: Option<PathComposer<'a>>,
    /// Absolute paths never matched by predicates
    pub ignore_sources: Vec<PathBuf>,
    /// Explicit absolute paths per output, always included
    pub extra_sources: BTreeMap<String, Vec<PathBuf>>,
    /// Use only `extra_sources`
    pub skip_predicates: bool,
    /// Keep only the most-derived file of each component name
    pub component_overrides: bool,
}

/// Default import path: `./{module}/{file}`
pub fn default_path_composer(file: &str, record: &ModuleSourceRecord) -> String {
    format!("./{}/{}", record.name, file)
}

/// Import path through the module's `Modules/{name}/` alias
pub fn alias_path_composer(file: &str, record: &ModuleSourceRecord) -> String {
    format!("{}{}", record.import_alias, file)
}

/// Collect files for every output.
///
/// Records are visited in scan order (base before subclass), so a subclass
/// file with the same import path replaces its base file in place.
pub fn find_source_files(
    meta: &[ModuleSourceRecord],
    predicates: &[SourcePredicate<'_>],
    options: &FindSourceOptions<'_>,
) -> SourceFileSet {
    let default_composer: PathComposer<'_> = &default_path_composer;
    let composer = options.path_composer.unwrap_or(default_composer);
    let ignored: HashSet<&Path> = options.ignore_sources.iter().map(PathBuf::as_path).collect();
    let mut outputs: BTreeMap<String, OrderedSources> = BTreeMap::new();

    if !options.skip_predicates {
        for (output, _) in predicates {
            outputs.entry((*output).to_string()).or_default();
        }
        for record in meta {
            for file in &record.files {
                for (output, predicate) in predicates {
                    if !predicate(file, record) {
                        continue;
                    }
                    let path = record.absolute(file);
                    if ignored.contains(path.as_path()) {
                        continue;
                    }
                    if let Some(sources) = outputs.get_mut(*output) {
                        sources.insert(SourceFile {
                            import_path: composer(file, record),
                            path,
                            module: Some(record.name.clone()),
                        });
                    }
                }
            }
        }
    }

    for (output, paths) in &options.extra_sources {
        let sources = outputs.entry(output.clone()).or_default();
        for path in paths {
            let file = match get_source_by_path(meta, path) {
                Some((record, rel)) => SourceFile {
                    import_path: composer(&rel, record),
                    path: path.clone(),
                    module: Some(record.name.clone()),
                },
                None => SourceFile {
                    import_path: path.to_string_lossy().replace('\\', "/"),
                    path: path.clone(),
                    module: None,
                },
            };
            sources.insert(file);
        }
    }

    outputs
        .into_iter()
        .map(|(output, sources)| {
            let files = if options.component_overrides {
                keep_most_derived(sources.into_files())
            } else {
                sources.into_files()
            };
            (output, files)
        })
        .collect()
}

/// Reverse, keep the first file per component name, reverse back.
pub fn keep_most_derived(files: Vec<SourceFile>) -> Vec<SourceFile> {
    let mut seen = HashSet::new();
    let mut kept: Vec<SourceFile> = files
        .into_iter()
        .rev()
        .filter(|file| seen.insert(file.component_name().to_string()))
        .collect();
    kept.reverse();
    kept
}

/// Locate the record owning an absolute path, with the path relative to `ui/`.
pub fn get_source_by_path<'m>(
    meta: &'m [ModuleSourceRecord],
    path: &Path,
) -> Option<(&'m ModuleSourceRecord, String)> {
    meta.iter().find_map(|record| {
        let rel = record.relative_of(path)?;
        record.contains(&rel).then_some((record, rel))
    })
}
