use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// apos-asset - build, watch and publish frontend assets
#[derive(Parser, Debug)]
#[command(name = "apos-asset")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format for CI (NDJSON events on stdout)
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Project root (discovered from the working directory by default)
    #[arg(short = 'C', long, global = true)]
    pub project: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build assets (all entrypoints, or those touched by --changes)
    Build {
        /// Project-relative changed paths; only affected entrypoints rebuild
        #[arg(long, num_args = 1.., value_delimiter = ',')]
        changes: Option<Vec<String>>,

        /// Serve entrypoints from the build module's dev server
        #[arg(long)]
        dev_server: bool,

        /// Rebuild even when the admin UI build is up to date
        #[arg(short, long)]
        force: bool,
    },

    /// Build, then rebuild on source changes
    Watch {
        /// Serve entrypoints from the build module's dev server
        #[arg(long)]
        dev_server: bool,
    },

    /// Remove the bundler cache
    ClearCache,

    /// List module source records as the build sees them
    Scan,

    /// Print the saved build manifest
    Manifest,

    /// Print the release id a production build would publish under
    ReleaseId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_change_list() {
        let cli = Cli::parse_from([
            "apos-asset",
            "build",
            "--changes",
            "modules/a/ui/src/index.js,modules/b/ui/apos/apps/App.js",
        ]);
        match cli.command {
            Commands::Build { changes, .. } => assert_eq!(changes.unwrap().len(), 2),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn global_flags_follow_subcommand() {
        let cli = Cli::parse_from(["apos-asset", "scan", "--json", "-vv", "-C", "/srv/site"]);
        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.project, Some(PathBuf::from("/srv/site")));
    }
}
