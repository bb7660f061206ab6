//! Manifest command handler

use anyhow::{bail, Result};

use apos_asset::application::BuildPaths;
use apos_asset::infrastructure::ManifestStore;

use super::CommandContext;

pub fn cmd_manifest(ctx: &CommandContext) -> Result<()> {
    let paths = BuildPaths::new(&ctx.project_root, &ctx.config);
    let store = ManifestStore::new(&paths.bundle_dir);
    let Some(saved) = store.load()? else {
        bail!("no saved build at {}; run `apos-asset build` first", store.path().display());
    };

    if ctx.json {
        println!("{}", serde_json::to_string(&saved)?);
        return Ok(());
    }
    for record in &saved.manifest {
        println!("{} ({})", record.name, record.root.display());
        for file in record.files.js.iter().chain(&record.files.css) {
            println!("  {}", file);
        }
        for bundle in &record.bundles {
            println!("  -> {}", bundle);
        }
    }
    Ok(())
}
