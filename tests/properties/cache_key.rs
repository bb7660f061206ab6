//! Property tests for bundler cache keys.

use std::path::Path;

use proptest::prelude::*;
use serde_json::{Map, Value};

use apos_asset::domain::services::{compute_cache_meta, normalize_config, CacheKeyInput};

fn key() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-z]{1,8}").unwrap()
}

fn entries() -> impl Strategy<Value = Vec<(String, i64)>> {
    proptest::collection::btree_map(key(), any::<i64>(), 0..8)
        .prop_map(|map| map.into_iter().collect())
}

fn object(entries: &[(String, i64)]) -> Value {
    let mut map = Map::new();
    for (key, value) in entries {
        map.insert(key.clone(), Value::from(*value));
    }
    Value::Object(map)
}

fn meta_hash(config: &Value, lock: &str) -> String {
    compute_cache_meta(&CacheKeyInput {
        namespace: "default",
        entrypoint: "src",
        lock_contents: lock,
        config,
        cache_base: Path::new("/cache"),
        symlinked: &[],
    })
    .hash
    .as_str()
    .to_string()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Normalizing twice changes nothing.
    #[test]
    fn property_normalize_is_idempotent(entries in entries()) {
        let config = serde_json::json!({ "resolve": object(&entries), "list": [object(&entries)] });
        let once = normalize_config(&config);
        prop_assert_eq!(normalize_config(&once), once);
    }

    /// PROPERTY: Key order of the configuration never changes the cache key.
    #[test]
    fn property_key_order_does_not_change_hash(entries in entries()) {
        let mut reversed = entries.clone();
        reversed.reverse();
        let forward = serde_json::json!({ "module": object(&entries) });
        let backward = serde_json::json!({ "module": object(&reversed) });
        prop_assert_eq!(meta_hash(&forward, ""), meta_hash(&backward, ""));
    }

    /// PROPERTY: Plugin instances only contribute their name and option keys.
    #[test]
    fn property_plugin_option_values_are_ignored(entries in entries(), bump in 1i64..1000) {
        let mut plugin = object(&entries);
        plugin["$plugin"] = Value::from("MiniCssExtract");
        let mut changed = plugin.clone();
        for (key, value) in &entries {
            changed[key.as_str()] = Value::from(value.wrapping_add(bump));
        }
        prop_assert_eq!(
            meta_hash(&serde_json::json!({ "plugins": [plugin] }), ""),
            meta_hash(&serde_json::json!({ "plugins": [changed] }), "")
        );
    }

    /// PROPERTY: A different lock file yields a different cache location.
    #[test]
    fn property_lock_contents_change_hash(a in "[ -~]{0,32}", b in "[ -~]{0,32}") {
        prop_assume!(a != b);
        let config = serde_json::json!({});
        prop_assert_ne!(meta_hash(&config, &a), meta_hash(&config, &b));
    }
}
