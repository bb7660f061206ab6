//! Remote Release Destination
//!
//! Publishes a release with an external transfer command, by default
//! `rsync -a {source}/ {dest}`. Any sync CLI that takes a source and a
//! destination works (`aws s3 sync`, `gsutil rsync`, `rclone copy`).

use std::path::Path;
use std::process::{Command, Stdio};

use crate::config::DeployConfig;
use crate::domain::ports::{
    release_path, DeployedRelease, DestinationError, ReleaseDestination, ReleaseSource,
};
use crate::infrastructure::fs::list_files;

use super::copy_source_maps;

pub struct RemoteReleaseDestination {
    command: String,
    /// Argument templates; `{source}` and `{dest}` are substituted
    args: Vec<String>,
    /// Destination root, e.g. `s3://bucket` or a mounted path
    prefix: String,
}

impl RemoteReleaseDestination {
    pub fn new(command: impl Into<String>, args: Vec<String>, prefix: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            args,
            prefix: prefix.into(),
        }
    }

    pub fn from_config(config: &DeployConfig) -> Self {
        Self::new(
            config.remote_command.clone(),
            config.remote_args.clone(),
            config.remote_prefix.clone(),
        )
    }

    fn destination(&self, relative: &Path) -> String {
        let relative = relative.to_string_lossy().replace('\\', "/");
        let prefix = self.prefix.trim_end_matches('/');
        if prefix.is_empty() {
            relative
        } else {
            format!("{}/{}", prefix, relative)
        }
    }

    fn command_line(&self, source: &Path, dest: &str) -> Vec<String> {
        let source = source.display().to_string();
        self.args
            .iter()
            .map(|arg| arg.replace("{source}", &source).replace("{dest}", dest))
            .collect()
    }

    fn transfer(&self, source: &Path, dest: &str) -> Result<(), DestinationError> {
        let status = Command::new(&self.command)
            .args(self.command_line(source, dest))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| DestinationError::CommandFailed(format!("{}: {}", self.command, e)))?;

        if !status.success() {
            return Err(DestinationError::CommandFailed(format!(
                "{} failed with exit code: {:?}",
                self.command,
                status.code()
            )));
        }
        Ok(())
    }
}

impl ReleaseDestination for RemoteReleaseDestination {
    fn display_name(&self) -> String {
        format!("{} ({})", self.prefix, self.command)
    }

    fn release_location(&self, release_id: &str, namespace: &str) -> String {
        self.destination(&release_path(release_id, namespace))
    }

    fn publish(&self, source: &ReleaseSource<'_>) -> Result<DeployedRelease, DestinationError> {
        let location = self.release_location(source.release_id, source.namespace);
        let mut files = list_files(source.bundle_dir)?.len();
        self.transfer(source.bundle_dir, &location)?;

        if let Some(maps) = source.source_maps {
            let staging = tempfile::Builder::new().prefix("apos-source-maps-").tempdir()?;
            let copied = copy_source_maps(maps, staging.path())?;
            if copied > 0 {
                let maps_location = format!("{}/{}", location, SOURCE_MAPS_DIR);
                self.transfer(staging.path(), &maps_location)?;
                files += copied;
            }
        }

        Ok(DeployedRelease {
            release_id: source.release_id.to_string(),
            location,
            files,
        })
    }
}

/// Folder under the release receiving the `*.map` files of the build directory
pub const SOURCE_MAPS_DIR: &str = "source-maps";

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn substitutes_source_and_destination() {
        let destination = RemoteReleaseDestination::new(
            "rsync",
            vec!["-a".into(), "{source}/".into(), "{dest}".into()],
            "s3-mount/",
        );
        let location = destination.release_location("abc123", "default");
        assert_eq!(location, "s3-mount/apos-frontend/releases/abc123/default");
        assert_eq!(
            destination.command_line(Path::new("/p/public/apos-frontend/default"), &location),
            vec![
                "-a",
                "/p/public/apos-frontend/default/",
                "s3-mount/apos-frontend/releases/abc123/default"
            ]
        );
    }

    #[cfg(unix)]
    #[test]
    fn runs_transfer_command() {
        let dir = tempdir().unwrap();
        let bundles = dir.path().join("bundles");
        fs::create_dir_all(&bundles).unwrap();
        fs::write(bundles.join("apos-module-bundle.js"), "js").unwrap();
        let prefix = dir.path().join("remote");

        let destination = RemoteReleaseDestination::new(
            "sh",
            vec![
                "-c".into(),
                "mkdir -p \"$1\" && cp -R \"$0\"/. \"$1\"".into(),
                "{source}".into(),
                "{dest}".into(),
            ],
            prefix.display().to_string(),
        );
        let deployed = destination
            .publish(&ReleaseSource {
                release_id: "r1",
                namespace: "default",
                bundle_dir: &bundles,
                source_maps: None,
            })
            .unwrap();

        assert_eq!(deployed.files, 1);
        assert!(prefix
            .join(release_path("r1", "default"))
            .join("apos-module-bundle.js")
            .exists());
    }

    #[cfg(unix)]
    #[test]
    fn source_maps_transfer_only_map_files() {
        let dir = tempdir().unwrap();
        let bundles = dir.path().join("bundles");
        fs::create_dir_all(&bundles).unwrap();
        fs::write(bundles.join("apos-module-bundle.js"), "js").unwrap();
        let build = dir.path().join("build");
        fs::create_dir_all(build.join("modules/article/src")).unwrap();
        fs::create_dir_all(build.join("src")).unwrap();
        fs::write(build.join("modules/article/src/index.js"), "export default 1;").unwrap();
        fs::write(build.join(".src-timestamp"), "1").unwrap();
        fs::write(build.join("src/src.js"), "js").unwrap();
        fs::write(build.join("src/src.js.map"), "{}").unwrap();
        let prefix = dir.path().join("remote");

        let destination = RemoteReleaseDestination::new(
            "sh",
            vec![
                "-c".into(),
                "mkdir -p \"$1\" && cp -R \"$0\"/. \"$1\"".into(),
                "{source}".into(),
                "{dest}".into(),
            ],
            prefix.display().to_string(),
        );
        let deployed = destination
            .publish(&ReleaseSource {
                release_id: "r1",
                namespace: "default",
                bundle_dir: &bundles,
                source_maps: Some(&build),
            })
            .unwrap();

        let maps = prefix.join(release_path("r1", "default")).join(SOURCE_MAPS_DIR);
        assert_eq!(deployed.files, 2);
        assert!(maps.join("src/src.js.map").is_file());
        assert!(!maps.join("src/src.js").exists());
        assert!(!maps.join("modules/article/src/index.js").exists());
        assert!(!maps.join(".src-timestamp").exists());
    }

    #[cfg(unix)]
    #[test]
    fn failing_transfer_is_command_failed() {
        let dir = tempdir().unwrap();
        let destination =
            RemoteReleaseDestination::new("sh", vec!["-c".into(), "exit 7".into()], "remote");
        let err = destination
            .publish(&ReleaseSource {
                release_id: "r1",
                namespace: "default",
                bundle_dir: dir.path(),
                source_maps: None,
            })
            .unwrap_err();
        assert!(matches!(err, DestinationError::CommandFailed(ref m) if m.contains("Some(7)")));
    }
}
