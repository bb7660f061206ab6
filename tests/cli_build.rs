#![cfg(unix)]

mod common;

use common::*;

#[test]
fn build_writes_scene_bundles_and_manifest() {
    let env = TestEnv::new();
    article_project(&env, ECHO_BUNDLER_CONFIG);

    let result = env.run(&["build"]);
    assert!(result.success, "build failed:\n{}", result.combined_output());
    assert!(result.stdout.contains("Built 3 entrypoints"), "got:\n{}", result.stdout);

    let bundle_dir = "public/apos-frontend/default";
    assert!(env.read(&format!("{}/apos-module-bundle.js", bundle_dir)).contains("/* apos */"));
    assert!(env.read(&format!("{}/public-src-module-bundle.js", bundle_dir)).contains("/* src */"));
    assert!(env
        .read(&format!("{}/public-nomodule-bundle.js", bundle_dir))
        .contains("window.site = true;"));
    assert!(env.project_path(&format!("{}/modules/article/logo.svg", bundle_dir)).is_file());

    let manifest = env.run(&["manifest", "--json"]);
    assert!(manifest.success, "{}", manifest.combined_output());
    let saved: serde_json::Value = serde_json::from_str(manifest.stdout.trim()).unwrap();
    let names: Vec<&str> = saved["manifest"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|r| r["name"].as_str())
        .collect();
    assert_eq!(names, vec!["src", "public", "apos"]);
}

#[test]
fn build_with_changes_only_rebuilds_touched_entrypoints() {
    let env = TestEnv::new();
    article_project(&env, ECHO_BUNDLER_CONFIG);
    assert!(env.run(&["build"]).success);

    let result = env.run(&["--json", "build", "--changes", "modules/article/ui/src/index.js"]);
    assert!(result.success, "build failed:\n{}", result.combined_output());

    let summary = result
        .stdout
        .lines()
        .filter_map(|line| serde_json::from_str::<serde_json::Value>(line).ok())
        .find(|event| event["event"] == "summary")
        .expect("summary line");
    assert_eq!(summary["built"], serde_json::json!(["src"]));
}

#[test]
fn bundler_failure_fails_the_command() {
    let env = TestEnv::new();
    article_project(
        &env,
        r#"
[bundler]
command = "sh"
args = ["-c", "echo 'unexpected token' >&2; exit 1"]

[[modules]]
name = "article"
"#,
    );

    let result = env.run(&["build"]);
    assert!(!result.success);
    assert!(result.stderr.contains("unexpected token"), "got:\n{}", result.stderr);
    assert!(!env.project_path("public/apos-frontend/default/.manifest.json").exists());
}

#[test]
fn manifest_before_first_build_fails() {
    let env = TestEnv::new();
    article_project(&env, ECHO_BUNDLER_CONFIG);

    let result = env.run(&["manifest"]);
    assert!(!result.success);
    assert!(result.stderr.contains("apos-asset build"));
}
