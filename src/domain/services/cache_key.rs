//! Build cache key
//!
//! The bundler cache directory is addressed by everything that can change
//! the output besides the sources themselves: namespace, entrypoint,
//! installed dependency versions (lock file) and bundler configuration.

use std::path::Path;

use regex::Regex;
use serde_json::{Map, Value};

use crate::domain::ports::SymlinkedPackage;
use crate::domain::value_objects::{CacheMeta, ContentHash};

/// Key marking a configuration object as a plugin instance
pub const PLUGIN_KEY: &str = "$plugin";

pub struct CacheKeyInput<'a> {
    pub namespace: &'a str,
    pub entrypoint: &'a str,
    /// Contents of the dependency lock file (empty when there is none)
    pub lock_contents: &'a str,
    pub config: &'a Value,
    pub cache_base: &'a Path,
    pub symlinked: &'a [SymlinkedPackage],
}

pub fn compute_cache_meta(input: &CacheKeyInput<'_>) -> CacheMeta {
    let normalized = normalize_config(input.config).to_string();
    let hash = ContentHash::from_parts([
        input.namespace,
        input.entrypoint,
        input.lock_contents,
        normalized.as_str(),
    ]);
    CacheMeta::new(input.cache_base, hash, managed_paths_regex(input.symlinked))
}

/// Canonical form of a bundler configuration.
///
/// Plugin instances (objects with a `$plugin` name) reduce to
/// `[name, ...sorted option keys]`; other objects have their keys sorted.
pub fn normalize_config(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            if let Some(Value::String(plugin)) = map.get(PLUGIN_KEY) {
                let mut keys: Vec<&String> = map.keys().filter(|k| *k != PLUGIN_KEY).collect();
                keys.sort();
                let mut reduced = vec![Value::String(plugin.clone())];
                reduced.extend(keys.into_iter().map(|k| Value::String(k.clone())));
                return Value::Array(reduced);
            }
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            let mut sorted = Map::new();
            for (key, inner) in entries {
                sorted.insert(key.clone(), normalize_config(inner));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(normalize_config).collect()),
        other => other.clone(),
    }
}

/// Deep merge `layer` into `base`.
///
/// Objects merge key by key; anything else in `layer` replaces `base`.
pub fn merge_config(base: &mut Value, layer: &Value) {
    match (base, layer) {
        (Value::Object(base_map), Value::Object(layer_map)) => {
            for (key, value) in layer_map {
                match base_map.get_mut(key) {
                    Some(existing) => merge_config(existing, value),
                    None => {
                        base_map.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (base, layer) => *base = layer.clone(),
    }
}

/// Pattern matching paths inside symlinked packages.
pub fn managed_paths_regex(symlinked: &[SymlinkedPackage]) -> Option<Regex> {
    if symlinked.is_empty() {
        return None;
    }
    let names: Vec<String> = symlinked.iter().map(|p| regex::escape(&p.name)).collect();
    Regex::new(&format!(r"node_modules/(?:{})(?:/|$)", names.join("|"))).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::path::PathBuf;

    fn input<'a>(config: &'a Value, lock: &'a str) -> CacheKeyInput<'a> {
        CacheKeyInput {
            namespace: "default",
            entrypoint: "src",
            lock_contents: lock,
            config,
            cache_base: Path::new("/cache"),
            symlinked: &[],
        }
    }

    #[test]
    fn plugin_instances_reduce_to_name_and_keys() {
        let config = json!({ "plugins": [{ "$plugin": "MiniCss", "filename": "x", "chunk": 1 }] });
        assert_eq!(
            normalize_config(&config),
            json!({ "plugins": [["MiniCss", "chunk", "filename"]] })
        );
    }

    #[test]
    fn hash_ignores_plugin_option_values() {
        let a = json!({ "p": { "$plugin": "X", "opt": 1 } });
        let b = json!({ "p": { "$plugin": "X", "opt": 2 } });
        assert_eq!(
            compute_cache_meta(&input(&a, "lock")).hash,
            compute_cache_meta(&input(&b, "lock")).hash
        );
    }

    #[test]
    fn hash_changes_with_lock_file() {
        let config = json!({});
        assert_ne!(
            compute_cache_meta(&input(&config, "v1")).hash,
            compute_cache_meta(&input(&config, "v2")).hash
        );
    }

    #[test]
    fn location_is_under_cache_base() {
        let config = json!({ "mode": "production" });
        let meta = compute_cache_meta(&input(&config, ""));
        assert_eq!(meta.location, PathBuf::from("/cache").join(meta.hash.as_str()));
        assert!(meta.managed_paths_regex.is_none());
    }

    #[test]
    fn merge_is_deep_for_objects_only() {
        let mut base = json!({ "module": { "rules": [1], "strict": true }, "mode": "dev" });
        merge_config(
            &mut base,
            &json!({ "module": { "rules": [2] }, "mode": "production", "extra": null }),
        );
        assert_eq!(
            base,
            json!({ "module": { "rules": [2], "strict": true }, "mode": "production", "extra": null })
        );
    }

    #[test]
    fn symlinked_packages_are_exempt() {
        let symlinked = vec![SymlinkedPackage {
            name: "@org/linked".into(),
            path: PathBuf::from("/p/node_modules/@org/linked"),
        }];
        let regex = managed_paths_regex(&symlinked).unwrap();
        assert!(regex.is_match("/p/node_modules/@org/linked/ui/src/index.js"));
        assert!(!regex.is_match("/p/node_modules/@org/linked-other/index.js"));
    }
}
