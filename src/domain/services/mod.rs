//! Domain Services
//!
//! Pure business logic services that operate on domain entities.
//! File access goes through the `FileSystem` port so everything here is
//! testable in memory.

pub mod cache_key;
pub mod entrypoint_manager;
mod icons;
mod import_composer;
pub mod rebuild_filter;
mod scenes;
mod source_matcher;

pub use cache_key::{compute_cache_meta, merge_config, normalize_config, CacheKeyInput};
pub use entrypoint_manager::{compose_entrypoints, EntrypointOutput, ExtraBundle};
pub use icons::IconRegistry;
pub use import_composer::{
    component_name, import_file_output, ImportFileOptions, ImportFileOutput, ImportSyntax,
    EMPTY_DEFAULT_EXPORT,
};
pub use rebuild_filter::{affected_by, select_for_changes};
pub use scenes::{plan_scenes, scene_names, CopiedFile, SceneBundle, ScenePlan};
pub use source_matcher::{
    alias_path_composer, default_path_composer, find_source_files, get_source_by_path,
    keep_most_derived, FindSourceOptions, OrderedSources, SourceFile, SourceFileSet,
    SourcePredicate,
};
