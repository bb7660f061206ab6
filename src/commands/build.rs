//! Build command handler

use anyhow::Result;

use apos_asset::presentation::{render_report, render_report_json, OutputFormat};
use apos_asset::BuildOptions;

use super::CommandContext;

pub fn cmd_build(
    ctx: &CommandContext,
    changes: Option<Vec<String>>,
    dev_server: bool,
    force: bool,
) -> Result<()> {
    let builder = ctx.builder("build")?;
    let options = BuildOptions::full()
        .with_changes(changes)
        .with_dev_server(dev_server || ctx.config.build.dev_server)
        .with_force(force);

    let report = builder.build(&options)?;
    match OutputFormat::from_json_flag(ctx.json) {
        OutputFormat::Json => println!("{}", render_report_json(&report, "build")),
        OutputFormat::Text => print!("{}", render_report(&report, ctx.unicode())),
    }
    Ok(())
}
