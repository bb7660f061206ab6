//! Build Event Port
//!
//! Observable interface for builds, deploys and the watch loop.
//! Enables console progress, NDJSON event streams and debug tracing.

use std::path::PathBuf;

use serde::Serialize;

/// Event emitted while building, deploying or watching
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum BuildEvent {
    /// Build run started
    BuildStarted {
        namespace: String,
        entrypoints: usize,
        /// Size of the explicit change list, if any
        changes: Option<usize>,
    },

    /// Module `ui/` trees scanned
    SourcesScanned { records: usize, files: usize },

    /// Entrypoint not rebuilt
    EntrypointSkipped { name: String, reason: String },

    /// Entrypoint build started
    EntrypointStarted { name: String, label: String },

    /// Entrypoint built
    EntrypointBuilt { name: String, js: usize, css: usize },

    /// Scene bundle written
    BundleWritten { file: String, sources: usize },

    /// `.manifest.json` persisted
    ManifestSaved { path: PathBuf },

    /// Build run finished
    BuildCompleted {
        built: Vec<String>,
        skipped: Vec<String>,
        scenes: Vec<String>,
    },

    /// Release published
    Deployed {
        release_id: String,
        destination: String,
    },

    /// Cache base emptied
    CacheCleared { path: PathBuf },

    /// Watcher registered its roots
    WatchStarted { roots: Vec<String> },

    /// Watched file changed
    FileChanged { path: String },

    /// Rebuild job accepted by the queue
    RebuildQueued,

    /// Rebuild trigger dropped because the queue is full
    RebuildCoalesced,

    /// Watch-triggered rebuild finished with new output
    RebuildCompleted {
        builds: Vec<String>,
        scenes: Vec<String>,
        restart_id: String,
    },

    /// Non-fatal problem
    Warning { message: String },

    /// Verbose build tracing (only sent to sinks that want it)
    Debug { message: String },

    /// Error reported without aborting (watch mode)
    Error { message: String },

    /// Watch stopped
    Shutdown,
}

impl BuildEvent {
    pub fn warning(message: impl Into<String>) -> Self {
        BuildEvent::Warning {
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        BuildEvent::Error {
            message: message.into(),
        }
    }
}

/// Trait for receiving build events
///
/// Implementations:
/// - `ConsoleEventSink`: human readable terminal output
/// - `JsonEventSink`: NDJSON event stream for CI
/// - `NoopEventSink`: silent operation
pub trait BuildEventSink: Send + Sync {
    /// Handle an event
    fn on_event(&self, event: BuildEvent);

    /// Whether `Debug` events should be produced at all
    fn wants_debug(&self) -> bool {
        false
    }
}

/// Emit a debug event, building the message only when the sink wants it.
pub fn emit_debug(sink: &dyn BuildEventSink, message: impl FnOnce() -> String) {
    if sink.wants_debug() {
        sink.on_event(BuildEvent::Debug { message: message() });
    }
}

/// No-op event sink for silent operation
pub struct NoopEventSink;

impl BuildEventSink for NoopEventSink {
    fn on_event(&self, _event: BuildEvent) {}
}

#[cfg(test)]
pub(crate) mod recording {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Test event sink that records all events
    #[derive(Clone, Default)]
    pub struct RecordingEventSink {
        pub events: Arc<Mutex<Vec<BuildEvent>>>,
        pub debug: bool,
    }

    impl RecordingEventSink {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_debug() -> Self {
            Self {
                debug: true,
                ..Self::default()
            }
        }

        pub fn events(&self) -> Vec<BuildEvent> {
            self.events.lock().unwrap().clone()
        }

        pub fn warnings(&self) -> Vec<String> {
            self.events()
                .into_iter()
                .filter_map(|e| match e {
                    BuildEvent::Warning { message } => Some(message),
                    _ => None,
                })
                .collect()
        }
    }

    impl BuildEventSink for RecordingEventSink {
        fn on_event(&self, event: BuildEvent) {
            self.events.lock().unwrap().push(event);
        }

        fn wants_debug(&self) -> bool {
            self.debug
        }
    }
}
