mod common;

use common::*;

#[test]
fn scan_json_lists_module_sources() {
    let env = TestEnv::new();
    article_project(&env, ARTICLE_CONFIG);

    let result = env.run(&["scan", "--json"]);
    assert!(result.success, "scan failed:\n{}", result.combined_output());

    let records: serde_json::Value = serde_json::from_str(result.stdout.trim()).unwrap();
    let article = records
        .as_array()
        .unwrap()
        .iter()
        .find(|r| r["name"] == "article")
        .expect("article record");
    assert_eq!(article["exists"], true);
    let files: Vec<&str> = article["files"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|f| f.as_str())
        .collect();
    assert!(files.contains(&"src/index.js"), "files: {:?}", files);
    assert!(files.contains(&"apos/components/AposArticle.vue"));
}

#[test]
fn scan_text_discovers_project_from_subdirectory() {
    let env = TestEnv::new();
    article_project(&env, ARTICLE_CONFIG);

    let result = env.run_from_with_env(&env.project_path("modules/article/ui"), &["scan"], &[]);
    assert!(result.success, "scan failed:\n{}", result.combined_output());
    assert!(result.stdout.contains("  src/index.js"), "got:\n{}", result.stdout);
}

#[test]
fn invalid_config_is_reported() {
    let env = TestEnv::new();
    env.write("apos-asset.toml", "[[modules]\nname = ");

    let result = env.run(&["scan"]);
    assert!(!result.success);
    assert!(result.stderr.contains("apos-asset.toml") || result.stderr.contains("loading"));
}
