//! Watch command handler

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};

use apos_asset::domain::ports::BuildEvent;
use apos_asset::{BuildOptions, WatchOptions, WatchUseCase};

use super::CommandContext;

pub fn cmd_watch(ctx: &CommandContext, dev_server: bool) -> Result<()> {
    let builder = Arc::new(ctx.builder("watch")?);
    let dev_server = dev_server || ctx.config.build.dev_server;

    // Initial build: failures are fatal here, later ones are reported only
    builder.build(&BuildOptions::full().with_dev_server(dev_server))?;

    if !ctx.config.build.watch {
        builder
            .events()
            .on_event(BuildEvent::warning("watching is disabled (APOS_ASSET_WATCH=0)"));
        return Ok(());
    }

    let running = Arc::new(AtomicBool::new(true));
    let running_clone = running.clone();
    ctrlc::set_handler(move || {
        running_clone.store(false, Ordering::SeqCst);
    })
    .context("setting Ctrl+C handler")?;

    if ctx.caps.is_tty && !ctx.json {
        eprintln!("Watching for changes (Ctrl+C to stop)");
    }
    let options =
        WatchOptions::from_config(&ctx.project_root, &ctx.config).with_dev_server(dev_server);
    WatchUseCase::new(builder, options).start(running)?;
    Ok(())
}
