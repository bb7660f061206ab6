//! Command handlers
//!
//! Each handler loads the project, wires the use case through the
//! presentation factory and renders the outcome.

mod build;
mod clear_cache;
mod manifest;
mod project_root;
mod release_id;
mod scan;
mod watch;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};

use apos_asset::config::{Config, Verbosity};
use apos_asset::domain::ports::BuildEventSink;
use apos_asset::presentation::factory;
use apos_asset::AssetBuilder;

use crate::ui::terminal::{detect_capabilities, TerminalCapabilities};

pub use build::cmd_build;
pub use clear_cache::cmd_clear_cache;
pub use manifest::cmd_manifest;
pub use release_id::cmd_release_id;
pub use scan::cmd_scan;
pub use watch::cmd_watch;

/// Project, configuration and terminal facts shared by every command
pub struct CommandContext {
    pub project_root: PathBuf,
    pub config: Config,
    pub json: bool,
    pub caps: TerminalCapabilities,
}

impl CommandContext {
    pub fn load(project: Option<&Path>, json: bool, verbose: u8) -> Result<Self> {
        let project_root = match project {
            Some(path) => path.to_path_buf(),
            None => {
                let cwd = std::env::current_dir().context("cannot read working directory")?;
                project_root::discover_project_root(&cwd)
            }
        };
        let (mut config, warnings) = Config::load_project(&project_root)
            .with_context(|| format!("loading {}", project_root.display()))?;
        for warning in warnings {
            eprintln!("warning: {}", warning);
        }
        config.output.verbosity = config.output.verbosity.max(verbosity_flag(verbose));

        Ok(Self {
            project_root,
            config,
            json,
            caps: detect_capabilities(),
        })
    }

    pub fn events(&self, command: &str) -> Arc<dyn BuildEventSink> {
        factory::create_event_sink(
            command,
            self.json,
            &self.config,
            self.caps.color(self.config.output.color),
        )
    }

    /// CI logs get ASCII icons
    pub fn unicode(&self) -> bool {
        self.caps.supports_unicode && !self.caps.is_ci
    }

    pub fn builder(&self, command: &str) -> Result<AssetBuilder> {
        Ok(factory::create_asset_builder(
            &self.project_root,
            self.config.clone(),
            self.events(command),
        )?)
    }
}

fn verbosity_flag(verbose: u8) -> Verbosity {
    match verbose {
        0 => Verbosity::Quiet,
        1 => Verbosity::Verbose,
        _ => Verbosity::Debug,
    }
}
