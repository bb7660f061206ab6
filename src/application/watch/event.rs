//! Watch options, debounce state and watch roots

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::domain::entities::ModuleSourceRecord;
use crate::domain::ports::SymlinkedPackage;

/// `ui/` folders that feed entrypoints
pub const WATCHED_FOLDERS: [&str; 3] = ["apos", "src", "public"];

/// Watch options
#[derive(Debug, Clone)]
pub struct WatchOptions {
    pub project_root: PathBuf,
    /// Quiet period after the last change before a rebuild is triggered
    pub debounce: Duration,
    /// Rebuilds run in dev server mode
    pub dev_server: bool,
}

impl WatchOptions {
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            debounce: Duration::from_millis(Config::default().build.debounce_ms),
            dev_server: false,
        }
    }

    pub fn from_config(project_root: impl Into<PathBuf>, config: &Config) -> Self {
        Self {
            debounce: Duration::from_millis(config.build.debounce_ms),
            dev_server: config.build.dev_server,
            ..Self::new(project_root)
        }
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn with_dev_server(mut self, dev_server: bool) -> Self {
        self.dev_server = dev_server;
        self
    }

    /// Path as reported in change lists: relative to the project when inside it
    pub fn change_path(&self, path: &Path) -> String {
        path.strip_prefix(&self.project_root)
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/")
    }
}

/// Debounce state
#[derive(Debug)]
pub struct WatcherState {
    debounce: Duration,
    last_change: Option<Instant>,
}

impl WatcherState {
    pub fn new(debounce: Duration) -> Self {
        Self {
            debounce,
            last_change: None,
        }
    }

    pub fn record_change(&mut self) {
        self.last_change = Some(Instant::now());
    }

    /// True once the quiet period has passed; resets the state.
    pub fn take_ready(&mut self) -> bool {
        match self.last_change {
            Some(last) if last.elapsed() >= self.debounce => {
                self.last_change = None;
                true
            }
            _ => false,
        }
    }
}

/// Directories to watch, existing ones only, in discovery order.
///
/// Every scanned chain link contributes its `ui/{folder}`. Symlinked
/// packages contribute the same below the package root and below each
/// module they bundle (`modules/{name}`, `modules/@scope/{name}`). With
/// `public_only`, the other folders are left to a build module with HMR.
pub fn watch_roots(
    records: &[ModuleSourceRecord],
    symlinked: &[SymlinkedPackage],
    public_only: bool,
) -> Vec<PathBuf> {
    let folders: &[&str] = if public_only {
        &["public"]
    } else {
        &WATCHED_FOLDERS
    };

    let mut ui_dirs: Vec<PathBuf> = records.iter().map(|r| r.dirname.clone()).collect();
    for package in symlinked {
        ui_dirs.push(package.path.join("ui"));
        for module in nested_modules(&package.path.join("modules")) {
            ui_dirs.push(module.join("ui"));
        }
    }

    let mut roots = Vec::new();
    for ui in ui_dirs {
        for folder in folders {
            let root = ui.join(folder);
            if root.is_dir() && !roots.contains(&root) {
                roots.push(root);
            }
        }
    }
    roots
}

/// `modules/*` and `modules/@scope/*`, sorted
fn nested_modules(modules_dir: &Path) -> Vec<PathBuf> {
    let mut found = Vec::new();
    let Ok(entries) = fs::read_dir(modules_dir) else {
        return found;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        if entry.file_name().to_string_lossy().starts_with('@') {
            if let Ok(scoped) = fs::read_dir(&path) {
                found.extend(scoped.flatten().map(|e| e.path()).filter(|p| p.is_dir()));
            }
        } else {
            found.push(path);
        }
    }
    found.sort();
    found
}
