//! Clear-cache command handler

use anyhow::Result;

use apos_asset::domain::ports::BuildEvent;
use apos_asset::infrastructure::cache::clear_cache;

use super::CommandContext;

pub fn cmd_clear_cache(ctx: &CommandContext) -> Result<()> {
    let base = ctx.config.cache_base(&ctx.project_root);
    let removed = clear_cache(&base)?;
    ctx.events("clear-cache")
        .on_event(BuildEvent::CacheCleared { path: base.clone() });
    if !ctx.json {
        println!("Removed {} cache entries from {}", removed, base.display());
    }
    Ok(())
}
