//! Domain Value Objects
//!
//! Immutable value types of the asset pipeline.

pub mod bundle_name;
mod cache_meta;
mod condition;
mod config_warning;
mod hash;

pub use bundle_name::{css_bundle_name, js_bundle_name, scene_prefix};
pub use cache_meta::CacheMeta;
pub use condition::Condition;
pub use config_warning::ConfigWarning;
pub use hash::ContentHash;
