//! Release-id command handler

use anyhow::Result;

use apos_asset::resolve_release_id;

use super::CommandContext;

pub fn cmd_release_id(ctx: &CommandContext) -> Result<()> {
    let id = resolve_release_id(&ctx.project_root)?;
    if ctx.json {
        println!("{}", serde_json::json!({ "command": "release-id", "release_id": id }));
    } else {
        println!("{}", id);
    }
    Ok(())
}
