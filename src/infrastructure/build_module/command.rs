//! Command Build Module
//!
//! Adapts an external CLI (a Vite or Rollup integration script) to the
//! `BuildModule` port. The request is written to a JSON file whose path is
//! passed in `APOS_BUILD_REQUEST`; the script prints the reported manifest
//! as JSON on stdout.

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use tempfile::NamedTempFile;

use crate::config::BuildModuleConfig;
use crate::domain::entities::BuildManifest;
use crate::domain::ports::{BuildModule, BuildModuleDescriptor, BuildRequest, ReportedBuild};
use crate::error::{AssetError, AssetResult};

/// Env variable carrying the request file path
pub const REQUEST_ENV: &str = "APOS_BUILD_REQUEST";

/// Env variable carrying the run mode (`build` or `dev-server`)
pub const MODE_ENV: &str = "APOS_BUILD_MODE";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Build,
    DevServer,
}

impl Mode {
    fn as_str(self) -> &'static str {
        match self {
            Mode::Build => "build",
            Mode::DevServer => "dev-server",
        }
    }
}

pub struct CommandBuildModule {
    descriptor: BuildModuleDescriptor,
    command: String,
    args: Vec<String>,
    project_root: PathBuf,
}

impl CommandBuildModule {
    pub fn new(
        descriptor: BuildModuleDescriptor,
        command: impl Into<String>,
        args: Vec<String>,
        project_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            descriptor,
            command: command.into(),
            args,
            project_root: project_root.into(),
        }
    }

    pub fn from_config(config: &BuildModuleConfig, project_root: impl Into<PathBuf>) -> Self {
        Self::new(
            BuildModuleDescriptor {
                name: config.name.clone(),
                alias: config.alias.clone(),
                dev_server: config.dev_server,
                hmr: config.hmr,
            },
            config.command.clone(),
            config.args.clone(),
            project_root,
        )
    }

    fn failure(&self, message: impl Into<String>) -> AssetError {
        AssetError::BuildModule {
            module: self.descriptor.name.clone(),
            message: message.into(),
        }
    }

    fn run(&self, request: &BuildRequest, mode: Mode) -> AssetResult<BuildManifest> {
        let mut request_file = NamedTempFile::new()?;
        serde_json::to_writer(&mut request_file, request)?;
        request_file.flush()?;

        let output = Command::new(&self.command)
            .args(&self.args)
            .env(REQUEST_ENV, request_file.path())
            .env(MODE_ENV, mode.as_str())
            .env(
                "NODE_ENV",
                if request.production { "production" } else { "development" },
            )
            .current_dir(&self.project_root)
            .stdin(Stdio::null())
            .stderr(Stdio::inherit())
            .output()
            .map_err(|e| self.failure(format!("could not run '{}': {}", self.command, e)))?;

        if !output.status.success() {
            return Err(self.failure(format!(
                "'{}' failed with exit code: {:?}",
                self.command,
                output.status.code()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let reported: ReportedBuild = serde_json::from_str(stdout.trim())
            .map_err(|e| self.failure(format!("invalid manifest on stdout: {}", e)))?;
        Ok(reported.fold_onto(&request.entrypoints))
    }
}

impl BuildModule for CommandBuildModule {
    fn descriptor(&self) -> BuildModuleDescriptor {
        self.descriptor.clone()
    }

    fn build(&self, request: &BuildRequest) -> AssetResult<BuildManifest> {
        self.run(request, Mode::Build)
    }

    fn start_dev_server(&self, request: &BuildRequest) -> AssetResult<BuildManifest> {
        self.run(request, Mode::DevServer)
    }
}
