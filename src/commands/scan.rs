//! Scan command handler
//!
//! Lists every chain link the build would read, base before subclass.

use anyhow::Result;

use apos_asset::infrastructure::{scan_all, FsModuleResolver};

use super::CommandContext;

pub fn cmd_scan(ctx: &CommandContext) -> Result<()> {
    let resolver = FsModuleResolver::new(&ctx.project_root, ctx.config.modules.clone());
    let records = scan_all(&resolver)?;

    if ctx.json {
        println!("{}", serde_json::to_string(&records)?);
        return Ok(());
    }
    for record in &records {
        let origin = match (record.is_from_package, record.is_symlinked) {
            (true, true) => " (linked package)",
            (true, false) => " (package)",
            _ => "",
        };
        println!("{}{}", record.id, origin);
        if !record.exists {
            println!("  no ui/ directory");
        }
        for file in &record.files {
            println!("  {}", file);
        }
    }
    Ok(())
}
