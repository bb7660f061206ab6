//! apos-asset CLI
//!
//! Usage: apos-asset <COMMAND>
//!
//! Commands:
//!   build        Build assets
//!   watch        Build, then rebuild on source changes
//!   clear-cache  Remove the bundler cache
//!   scan         List module source records
//!   manifest     Print the saved build manifest
//!   release-id   Print the release id

mod cli;
mod commands;
mod ui;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Commands};
use commands::CommandContext;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let ctx = CommandContext::load(cli.project.as_deref(), cli.json, cli.verbose)?;

    match cli.command {
        Commands::Build {
            changes,
            dev_server,
            force,
        } => commands::cmd_build(&ctx, changes, dev_server, force),
        Commands::Watch { dev_server } => commands::cmd_watch(&ctx, dev_server),
        Commands::ClearCache => commands::cmd_clear_cache(&ctx),
        Commands::Scan => commands::cmd_scan(&ctx),
        Commands::Manifest => commands::cmd_manifest(&ctx),
        Commands::ReleaseId => commands::cmd_release_id(&ctx),
    }
}
