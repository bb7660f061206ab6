//! Reusable project fixtures.

use super::TestEnv;

/// One module with project, public and admin UI sources.
pub const ARTICLE_CONFIG: &str = r#"
[[modules]]
name = "article"
"#;

/// Bundler stand-in: writes `{entrypoint}.js` into the output directory.
pub const ECHO_BUNDLER_CONFIG: &str = r#"
[bundler]
command = "sh"
args = ["-c", "echo \"/* $APOS_BUNDLER_ENTRYPOINT */\" > \"$APOS_BUNDLER_OUTPUT_DIR/$APOS_BUNDLER_ENTRYPOINT.js\""]

[[modules]]
name = "article"
"#;

pub fn article_project(env: &TestEnv, config: &str) {
    env.write("apos-asset.toml", config)
        .write("package.json", "{}\n")
        .write("modules/article/ui/src/index.js", "export default () => {};\n")
        .write("modules/article/ui/public/site.js", "window.site = true;\n")
        .write(
            "modules/article/ui/apos/components/AposArticle.vue",
            "<template><div /></template>\n",
        )
        .write("modules/article/public/logo.svg", "<svg />\n");
}
