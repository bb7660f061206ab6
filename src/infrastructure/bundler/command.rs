//! Command Bundler
//!
//! Runs an external bundler CLI (webpack, esbuild, a project script) once
//! per entrypoint. The job is passed through `APOS_BUNDLER_*` environment
//! variables; the bundler reports its output in `{output}/manifest.json`.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::domain::entities::ManifestFiles;
use crate::domain::ports::{BundleJob, BundleOutput, Bundler};
use crate::error::{AssetError, AssetResult};
use crate::infrastructure::fs::atomic_write;

/// Manifest file a bundler writes into its output directory
pub const BUNDLER_MANIFEST: &str = "manifest.json";

/// Bundler configuration file written into the cache location
pub const BUNDLER_CONFIG_FILE: &str = "bundler-config.json";

pub struct CommandBundler {
    command: String,
    args: Vec<String>,
    project_root: PathBuf,
}

impl CommandBundler {
    pub fn new(command: impl Into<String>, args: Vec<String>, project_root: impl Into<PathBuf>) -> Self {
        Self {
            command: command.into(),
            args,
            project_root: project_root.into(),
        }
    }

    fn failure(job: &BundleJob<'_>, message: impl Into<String>) -> AssetError {
        AssetError::Bundler {
            entrypoint: job.entrypoint.name.clone(),
            message: message.into(),
        }
    }

    fn environment(&self, job: &BundleJob<'_>, config_path: &Path) -> AssetResult<BTreeMap<String, String>> {
        let mut env = BTreeMap::new();
        env.insert("APOS_BUNDLER_ENTRYPOINT".to_string(), job.entrypoint.name.clone());
        for (ext, path) in &job.entry_files {
            env.insert(
                format!("APOS_BUNDLER_ENTRY_{}", ext.to_uppercase()),
                path.display().to_string(),
            );
        }
        env.insert(
            "APOS_BUNDLER_ENTRIES".to_string(),
            serde_json::to_string(&job.entry_files)?,
        );
        env.insert("APOS_BUNDLER_OUTPUT_DIR".to_string(), job.output_dir.display().to_string());
        env.insert("APOS_BUNDLER_MODULES_DIR".to_string(), job.modules_dir.display().to_string());
        env.insert("APOS_BUNDLER_CACHE_DIR".to_string(), job.cache.location.display().to_string());
        env.insert("APOS_BUNDLER_CONFIG".to_string(), config_path.display().to_string());
        env.insert(
            "APOS_BUNDLER_SOURCE_MAPS".to_string(),
            if job.source_maps { "1" } else { "0" }.to_string(),
        );
        if let Some(pattern) = job.cache.managed_paths_pattern() {
            env.insert("APOS_BUNDLER_MANAGED_EXEMPT".to_string(), pattern.to_string());
        }
        env.insert(
            "NODE_ENV".to_string(),
            if job.production { "production" } else { "development" }.to_string(),
        );
        Ok(env)
    }
}

impl Bundler for CommandBundler {
    fn name(&self) -> &str {
        &self.command
    }

    fn bundle(&self, job: &BundleJob<'_>) -> AssetResult<BundleOutput> {
        fs::create_dir_all(job.output_dir)?;
        let config_path = job.cache.location.join(BUNDLER_CONFIG_FILE);
        atomic_write(&config_path, serde_json::to_string_pretty(job.config)?.as_bytes())?;

        let output = Command::new(&self.command)
            .args(&self.args)
            .envs(self.environment(job, &config_path)?)
            .current_dir(&self.project_root)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| Self::failure(job, format!("could not run '{}': {}", self.command, e)))?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !output.status.success() {
            let detail = stderr.trim();
            return Err(Self::failure(
                job,
                if detail.is_empty() {
                    format!("'{}' exited with {}", self.command, output.status)
                } else {
                    detail.to_string()
                },
            ));
        }

        let warnings = stderr
            .lines()
            .filter(|line| line.to_lowercase().contains("warning"))
            .map(|line| line.trim().to_string())
            .collect();

        Ok(BundleOutput {
            files: read_output_files(job.output_dir, &job.entrypoint.name)
                .map_err(|e| Self::failure(job, e))?,
            warnings,
        })
    }
}

/// `manifest.json` when the bundler wrote one, else `{name}.js` / `{name}.css`.
pub fn read_output_files(output_dir: &Path, name: &str) -> Result<ManifestFiles, String> {
    let manifest = output_dir.join(BUNDLER_MANIFEST);
    if manifest.is_file() {
        let content = fs::read_to_string(&manifest).map_err(|e| e.to_string())?;
        return serde_json::from_str(&content)
            .map_err(|e| format!("invalid {}: {}", manifest.display(), e));
    }

    let mut files = ManifestFiles::default();
    let js = format!("{}.js", name);
    if output_dir.join(&js).is_file() {
        files.js.push(js);
    }
    let css = format!("{}.css", name);
    if output_dir.join(&css).is_file() {
        files.css.push(css);
    }
    Ok(files)
}
