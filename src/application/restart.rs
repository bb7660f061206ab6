//! Restart signal
//!
//! Browsers in development long-poll for a new restart id; a changed id
//! tells them to reload. Watch-triggered rebuilds regenerate it.

use std::sync::RwLock;
use std::thread;
use std::time::{Duration, Instant};

/// Longest a poll waits for a change
pub const MAX_WAIT: Duration = Duration::from_secs(20);

/// Interval between checks while waiting
pub const POLL_STEP: Duration = Duration::from_millis(300);

pub struct RestartSignal {
    id: RwLock<String>,
    max_wait: Duration,
    step: Duration,
}

impl Default for RestartSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl RestartSignal {
    pub fn new() -> Self {
        Self::with_timing(MAX_WAIT, POLL_STEP)
    }

    pub fn with_timing(max_wait: Duration, step: Duration) -> Self {
        Self {
            id: RwLock::new(new_id()),
            max_wait,
            step,
        }
    }

    pub fn current(&self) -> String {
        match self.id.read() {
            Ok(id) => id.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Replace the id; returns the new one
    pub fn regenerate(&self) -> String {
        let id = new_id();
        match self.id.write() {
            Ok(mut current) => *current = id.clone(),
            Err(poisoned) => *poisoned.into_inner() = id.clone(),
        }
        id
    }

    /// Wait until the id differs from `client_id`, at most `max_wait`.
    ///
    /// Returns immediately when `fast` is set or the client is already
    /// behind. Always returns the id current at return time.
    pub fn wait_for_change(&self, client_id: &str, fast: bool) -> String {
        let deadline = Instant::now() + self.max_wait;
        loop {
            let current = self.current();
            if fast || current != client_id {
                return current;
            }
            let now = Instant::now();
            if now >= deadline {
                return current;
            }
            thread::sleep(self.step.min(deadline - now));
        }
    }
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
