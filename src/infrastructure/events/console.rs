//! Console Event Sink
//!
//! Human readable progress lines. Warnings and errors are always shown;
//! everything else is filtered by verbosity.

use std::io::{self, Write};
use std::sync::Mutex;

use crossterm::style::{Color, Stylize};

use crate::config::Verbosity;
use crate::domain::ports::{BuildEvent, BuildEventSink};

pub struct ConsoleEventSink {
    verbosity: Verbosity,
    color: bool,
    writer: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleEventSink {
    /// Progress goes to stderr so command output on stdout stays pipeable
    pub fn stderr(verbosity: Verbosity, color: bool) -> Self {
        Self::with_writer(verbosity, color, io::stderr())
    }

    pub fn with_writer<W: Write + Send + 'static>(verbosity: Verbosity, color: bool, writer: W) -> Self {
        Self {
            verbosity,
            color,
            writer: Mutex::new(Box::new(writer)),
        }
    }

    fn paint(&self, text: &str, color: Color) -> String {
        if self.color {
            format!("{}", text.with(color))
        } else {
            text.to_string()
        }
    }

    fn line(&self, event: &BuildEvent) -> (Verbosity, String) {
        use BuildEvent::*;
        match event {
            BuildStarted {
                namespace,
                entrypoints,
                changes,
            } => {
                let scope = match changes {
                    Some(n) => format!(" ({} changed files)", n),
                    None => String::new(),
                };
                (
                    Verbosity::Normal,
                    format!("Building {} entrypoints for '{}'{}", entrypoints, namespace, scope),
                )
            }
            SourcesScanned { records, files } => (
                Verbosity::Verbose,
                format!("  scanned {} module folders, {} files", records, files),
            ),
            EntrypointSkipped { name, reason } => (
                Verbosity::Normal,
                format!("  {} {} ({})", self.paint("○", Color::DarkGrey), name, reason),
            ),
            EntrypointStarted { label, .. } => (
                Verbosity::Normal,
                format!("  {} {}", self.paint("●", Color::Cyan), label),
            ),
            EntrypointBuilt { name, js, css } => (
                Verbosity::Verbose,
                format!("  {} {} ({} js, {} css)", self.paint("✓", Color::Green), name, js, css),
            ),
            BundleWritten { file, sources } => (
                Verbosity::Verbose,
                format!("    → {} ({} sources)", file, sources),
            ),
            ManifestSaved { path } => (
                Verbosity::Verbose,
                format!("  manifest saved to {}", path.display()),
            ),
            BuildCompleted { built, scenes, .. } => {
                let summary = if built.is_empty() {
                    "Up-to-date".to_string()
                } else {
                    format!("Built {} ({})", built.join(", "), scenes.join(", "))
                };
                (
                    Verbosity::Normal,
                    format!("{} {}", self.paint("✓", Color::Green), summary),
                )
            }
            Deployed {
                release_id,
                destination,
            } => (
                Verbosity::Normal,
                format!(
                    "{} Release {} deployed to {}",
                    self.paint("✓", Color::Green),
                    release_id,
                    destination
                ),
            ),
            CacheCleared { path } => (
                Verbosity::Normal,
                format!("Cleared build cache {}", path.display()),
            ),
            WatchStarted { roots } => (
                Verbosity::Normal,
                format!("{} Watching {} folders (Ctrl+C to stop)", self.paint("⟳", Color::Cyan), roots.len()),
            ),
            FileChanged { path } => (Verbosity::Verbose, format!("  changed: {}", path)),
            RebuildQueued => (Verbosity::Debug, "  rebuild queued".to_string()),
            RebuildCoalesced => (Verbosity::Debug, "  rebuild already pending".to_string()),
            RebuildCompleted { builds, .. } => (
                Verbosity::Normal,
                format!("{} Rebuilt {}", self.paint("✓", Color::Green), builds.join(", ")),
            ),
            Warning { message } => (
                Verbosity::Quiet,
                format!("{} {}", self.paint("⚠", Color::Yellow), message),
            ),
            Debug { message } => (Verbosity::Debug, self.paint(message, Color::DarkGrey)),
            Error { message } => (
                Verbosity::Quiet,
                format!("{} {}", self.paint("✗", Color::Red), message),
            ),
            Shutdown => (Verbosity::Normal, "Stopped watching".to_string()),
        }
    }
}

impl BuildEventSink for ConsoleEventSink {
    fn on_event(&self, event: BuildEvent) {
        let (level, line) = self.line(&event);
        if level > self.verbosity {
            return;
        }
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", line);
            let _ = writer.flush();
        }
    }

    fn wants_debug(&self) -> bool {
        self.verbosity >= Verbosity::Debug
    }
}
