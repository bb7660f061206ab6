//! Scene bundle file names
//!
//! These names are part of the deploy contract: page rendering, caches and
//! release directories all refer to them, so they must stay byte-stable.

use super::Condition;

/// Prefix of a scene's JS bundle for one entrypoint.
///
/// The entrypoint name alone when it matches the scene, otherwise
/// `{scene}-{entrypoint}`.
pub fn scene_prefix(scene: &str, entrypoint: &str) -> String {
    if scene == entrypoint {
        entrypoint.to_string()
    } else {
        format!("{}-{}", scene, entrypoint)
    }
}

/// `{scenePrefix}-{condition}-bundle.js`
pub fn js_bundle_name(scene: &str, entrypoint: &str, condition: Condition) -> String {
    format!(
        "{}-{}-bundle.js",
        scene_prefix(scene, entrypoint),
        condition.bundle_label()
    )
}

/// `{scene}-bundle.css`
pub fn css_bundle_name(scene: &str) -> String {
    format!("{}-bundle.css", scene)
}
