//! Entrypoint dispatch
//!
//! Per-kind source selection and glue generation, plus the default set of
//! entrypoints every project builds.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use super::icons::IconRegistry;
use super::import_composer::{
    import_file_output, on_dom_ready, ImportFileOptions, ImportFileOutput,
};
use super::source_matcher::{
    alias_path_composer, find_source_files, FindSourceOptions, SourceFileSet, SourcePredicate,
};
use crate::domain::entities::{Entrypoint, EntrypointKind, Extensions, ModuleSourceRecord, SourceMap};
use crate::domain::ports::FileSystem;
use crate::domain::value_objects::Condition;
use crate::error::{AssetError, AssetResult};

/// Globals the admin UI registrations write into
pub const APOS_PROLOGUE: &str = "window.apos = window.apos || {};\n\
window.apos.vueComponents = window.apos.vueComponents || {};\n\
window.apos.iconComponents = window.apos.iconComponents || {};\n\
window.apos.tiptapExtensions = window.apos.tiptapExtensions || [];\n";

/// Generated glue per input extension
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntrypointOutput {
    /// `js` / `scss` -> file content
    pub files: BTreeMap<String, String>,
    pub warnings: Vec<String>,
}

/// Select the source files of an entrypoint.
pub fn source_files(entry: &Entrypoint, meta: &[ModuleSourceRecord]) -> SourceFileSet {
    match &entry.kind {
        EntrypointKind::Index {
            sources,
            ignore_sources,
            ..
        } => find_by_extension(
            meta,
            &entry.inputs,
            |ext| {
                let wanted = format!("{}/index.{}", entry.name, ext);
                Box::new(move |file: &str, _: &ModuleSourceRecord| file == wanted) as OwnedPredicate
            },
            &FindSourceOptions {
                ignore_sources: ignore_sources.clone(),
                extra_sources: sources.clone(),
                ..Default::default()
            },
        ),
        EntrypointKind::Apos => {
            let is_component =
                |file: &str, _: &ModuleSourceRecord| direct_child(file, "apos/components/", ".vue");
            let is_tiptap = |file: &str, _: &ModuleSourceRecord| {
                direct_child(file, "apos/tiptap-extensions/", ".js")
            };
            let is_app =
                |file: &str, _: &ModuleSourceRecord| direct_child(file, "apos/apps/", ".js");

            let components: [SourcePredicate<'_>; 1] = [("components", &is_component)];
            let mut found = find_source_files(
                meta,
                &components,
                &FindSourceOptions {
                    path_composer: Some(&alias_path_composer),
                    component_overrides: true,
                    ..Default::default()
                },
            );
            let rest: [SourcePredicate<'_>; 2] = [("tiptap", &is_tiptap), ("apps", &is_app)];
            found.extend(find_source_files(
                meta,
                &rest,
                &FindSourceOptions {
                    path_composer: Some(&alias_path_composer),
                    ..Default::default()
                },
            ));
            found
        }
        EntrypointKind::Custom {
            sources,
            ignore_sources,
            ..
        } => find_source_files(
            meta,
            &[],
            &FindSourceOptions {
                ignore_sources: ignore_sources.clone(),
                extra_sources: sources.clone(),
                skip_predicates: true,
                ..Default::default()
            },
        ),
        EntrypointKind::Bundled => find_by_extension(
            meta,
            &entry.inputs,
            |ext| {
                let prefix = format!("{}/", entry.name);
                let suffix = format!(".{}", ext);
                Box::new(move |file: &str, _: &ModuleSourceRecord| {
                    file.starts_with(&prefix) && file.ends_with(&suffix)
                }) as OwnedPredicate
            },
            &FindSourceOptions::default(),
        ),
    }
}

type OwnedPredicate = Box<dyn Fn(&str, &ModuleSourceRecord) -> bool>;

/// One predicate per input extension, output named after the extension
fn find_by_extension(
    meta: &[ModuleSourceRecord],
    inputs: &[String],
    predicate_for: impl Fn(&str) -> OwnedPredicate,
    options: &FindSourceOptions<'_>,
) -> SourceFileSet {
    let matchers: Vec<(&str, OwnedPredicate)> = inputs
        .iter()
        .map(|ext| (ext.as_str(), predicate_for(ext.as_str())))
        .collect();
    let predicates: Vec<SourcePredicate<'_>> = matchers
        .iter()
        .map(|(ext, matcher)| (*ext, matcher.as_ref() as &dyn Fn(&str, &ModuleSourceRecord) -> bool))
        .collect();
    find_source_files(meta, &predicates, options)
}

/// `{prefix}{name}{suffix}` with no further directory below `prefix`
fn direct_child(file: &str, prefix: &str, suffix: &str) -> bool {
    file.strip_prefix(prefix)
        .is_some_and(|rest| !rest.contains('/') && rest.ends_with(suffix))
}

/// Generate the glue files of an entrypoint from its selected sources.
pub fn output(
    fs: &dyn FileSystem,
    entry: &Entrypoint,
    sources: &SourceFileSet,
    icons: &IconRegistry,
    suppress_errors: bool,
) -> AssetResult<EntrypointOutput> {
    let empty = Vec::new();
    let files_for = |output: &str| sources.get(output).unwrap_or(&empty);
    let mut result = EntrypointOutput::default();

    match &entry.kind {
        EntrypointKind::Index { .. } | EntrypointKind::Custom { .. } => {
            for ext in &entry.inputs {
                let files = files_for(ext);
                let code = if ext == "scss" || ext == "css" {
                    let out = import_file_output(fs, files, &ImportFileOptions::scss())?;
                    result.warnings.extend(out.warnings);
                    out.import_code
                } else {
                    let out = import_file_output(
                        fs,
                        files,
                        &ImportFileOptions {
                            import_name: true,
                            import_suffix: "App".to_string(),
                            enumerate_imports: true,
                            require_default_export: true,
                            invoke_apps: true,
                            suppress_errors,
                            ..ImportFileOptions::js()
                        },
                    )?;
                    let code = js_module(&entry.prologue, &[&out], &out.invoke_code);
                    result.warnings.extend(out.warnings);
                    code
                };
                result.files.insert(ext.clone(), code);
            }
        }
        EntrypointKind::Apos => {
            let icon_output = icons.output();
            let components = import_file_output(
                fs,
                files_for("components"),
                &ImportFileOptions {
                    import_name: true,
                    register_components: true,
                    ..ImportFileOptions::js()
                },
            )?;
            let tiptap = import_file_output(
                fs,
                files_for("tiptap"),
                &ImportFileOptions {
                    import_name: true,
                    import_suffix: "Extension".to_string(),
                    enumerate_imports: true,
                    register_tiptap_extensions: true,
                    ..ImportFileOptions::js()
                },
            )?;
            let apps = import_file_output(
                fs,
                files_for("apps"),
                &ImportFileOptions {
                    import_name: true,
                    import_suffix: "App".to_string(),
                    enumerate_imports: true,
                    require_default_export: true,
                    invoke_apps: true,
                    suppress_errors,
                    ..ImportFileOptions::js()
                },
            )?;
            let code = js_module(
                &entry.prologue,
                &[&icon_output, &components, &tiptap, &apps],
                &apps.invoke_code,
            );
            for out in [components, tiptap, apps] {
                result.warnings.extend(out.warnings);
            }
            result.files.insert("js".to_string(), code);
        }
        EntrypointKind::Bundled => {
            return Err(AssetError::OutputUnsupported {
                name: entry.name.clone(),
                kind: entry.kind.name(),
            })
        }
    }

    Ok(result)
}

/// Imports first, then registrations, then the DOM-ready invocation.
fn js_module(prologue: &str, parts: &[&ImportFileOutput], invoke_code: &str) -> String {
    let mut code = String::from(prologue);
    for part in parts {
        code.push_str(&part.import_code);
    }
    for part in parts {
        code.push_str(&part.register_code);
    }
    code.push_str(&on_dom_ready(invoke_code));
    code
}

/// An extra bundle declared by a module (`[modules.build.bundles.NAME]`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtraBundle {
    pub module: String,
    pub name: String,
}

/// Built-in entrypoint names
pub const SRC: &str = "src";
pub const PUBLIC: &str = "public";
pub const APOS: &str = "apos";

/// The default entrypoints plus one custom entrypoint per extra bundle.
///
/// Extra bundle sources are `ui/src/{bundle}.js` and `ui/src/{bundle}.scss`
/// of every scanned record that has them. Repeated bundle names merge.
pub fn compose_entrypoints(
    meta: &[ModuleSourceRecord],
    extra_bundles: &[ExtraBundle],
    extensions: &Extensions,
) -> AssetResult<Vec<Entrypoint>> {
    let mut bundle_sources: BTreeMap<String, SourceMap> = BTreeMap::new();
    let mut bundle_order: Vec<String> = Vec::new();
    for bundle in extra_bundles {
        if [SRC, PUBLIC, APOS].contains(&bundle.name.as_str()) {
            return Err(AssetError::DuplicateEntrypoint {
                name: bundle.name.clone(),
            });
        }
        if !bundle_sources.contains_key(&bundle.name) {
            bundle_order.push(bundle.name.clone());
            let mut sources = SourceMap::new();
            for ext in ["js", "scss"] {
                let file = format!("src/{}.{}", bundle.name, ext);
                let paths: Vec<PathBuf> = meta
                    .iter()
                    .filter(|record| record.contains(&file))
                    .map(|record| record.absolute(&file))
                    .collect();
                sources.insert(ext.to_string(), paths);
            }
            bundle_sources.insert(bundle.name.clone(), sources);
        }
    }

    let extra_files: BTreeSet<PathBuf> = bundle_sources
        .values()
        .flat_map(|sources| sources.values().flatten().cloned())
        .collect();

    let mut entrypoints = vec![
        Entrypoint::new(
            SRC,
            EntrypointKind::Index {
                sources: SourceMap::new(),
                ignore_sources: extra_files.into_iter().collect(),
                extensions: extensions.clone(),
            },
        )
        .with_label("Project")
        .with_scenes([PUBLIC, APOS])
        .with_inputs(["js", "scss"])
        .with_outputs(["js", "css"])
        .with_condition(Condition::Module),
        Entrypoint::new(PUBLIC, EntrypointKind::Bundled)
            .with_label("Raw")
            .with_scenes([PUBLIC, APOS])
            .with_inputs(["js", "css"])
            .with_outputs(["js", "css"])
            .with_condition(Condition::Nomodule),
        Entrypoint::new(APOS, EntrypointKind::Apos)
            .with_label("Apostrophe admin UI")
            .with_scenes([APOS])
            .with_inputs(["vue", "js"])
            .with_outputs(["js"])
            .with_condition(Condition::Module)
            .with_prologue(APOS_PROLOGUE),
    ];

    for name in bundle_order {
        let sources = bundle_sources.remove(&name).unwrap_or_default();
        entrypoints.push(
            Entrypoint::new(
                name.as_str(),
                EntrypointKind::Custom {
                    sources,
                    ignore_sources: Vec::new(),
                    extensions: extensions.clone(),
                },
            )
            .with_scenes([name.as_str()])
            .with_inputs(["js", "scss"])
            .with_outputs(["js", "css"])
            .with_condition(Condition::Module),
        );
    }

    Ok(entrypoints)
}
