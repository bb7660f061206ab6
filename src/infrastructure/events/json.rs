//! JSON Event Sink
//!
//! Outputs build events as NDJSON for CI/automation consumption.

use std::io::{self, Write};
use std::sync::Mutex;

use crate::domain::ports::{BuildEvent, BuildEventSink};

/// Event sink that outputs NDJSON events to stdout
pub struct JsonEventSink {
    /// Command name added to every event (`build`, `watch`, ...)
    command: String,
    debug: bool,
    /// Mutex to ensure thread-safe writes
    writer: Mutex<Box<dyn Write + Send>>,
}

impl JsonEventSink {
    /// Create a new JSON event sink writing to stdout
    pub fn stdout(command: impl Into<String>) -> Self {
        Self::with_writer(command, io::stdout())
    }

    /// Create a JSON event sink writing to a custom writer
    pub fn with_writer<W: Write + Send + 'static>(command: impl Into<String>, writer: W) -> Self {
        Self {
            command: command.into(),
            debug: false,
            writer: Mutex::new(Box::new(writer)),
        }
    }

    /// Also stream `debug` events
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    fn write_event(&self, event: serde_json::Value) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", event);
            let _ = writer.flush();
        }
    }
}

impl BuildEventSink for JsonEventSink {
    fn on_event(&self, event: BuildEvent) {
        let Ok(mut json) = serde_json::to_value(&event) else {
            return;
        };
        if let Some(object) = json.as_object_mut() {
            object.insert(
                "command".to_string(),
                serde_json::Value::String(self.command.clone()),
            );
            if let BuildEvent::BuildCompleted { built, .. } = &event {
                let status = if built.is_empty() { "unchanged" } else { "success" };
                object.insert("status".to_string(), status.into());
            }
        }
        self.write_event(json);
    }

    fn wants_debug(&self) -> bool {
        self.debug
    }
}
