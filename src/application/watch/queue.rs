//! Bounded rebuild queue
//!
//! One job runs on the worker thread while at most one more waits. Triggers
//! arriving while both slots are taken are dropped: the waiting job drains
//! the whole change pool when it starts, so nothing they carried is lost.

use std::sync::mpsc::{sync_channel, Receiver, SyncSender, TrySendError};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

/// Outcome of a trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// A job was scheduled
    Queued,
    /// A job was already waiting; this trigger was folded into it
    Coalesced,
    /// The queue has shut down
    Closed,
}

type SenderSlot = Arc<Mutex<Option<SyncSender<()>>>>;

/// Cloneable handle that schedules rebuilds on a `RebuildQueue`.
///
/// Every handle shares the queue's single sender, so shutting the queue
/// down disconnects them all at once.
#[derive(Debug, Clone)]
pub struct RebuildTrigger {
    slot: SenderSlot,
}

impl RebuildTrigger {
    pub fn trigger(&self) -> Trigger {
        let slot = match self.slot.lock() {
            Ok(slot) => slot,
            Err(poisoned) => poisoned.into_inner(),
        };
        let Some(tx) = slot.as_ref() else {
            return Trigger::Closed;
        };
        match tx.try_send(()) {
            Ok(()) => Trigger::Queued,
            Err(TrySendError::Full(())) => Trigger::Coalesced,
            Err(TrySendError::Disconnected(())) => Trigger::Closed,
        }
    }

    fn close(&self) {
        let mut slot = match self.slot.lock() {
            Ok(slot) => slot,
            Err(poisoned) => poisoned.into_inner(),
        };
        slot.take();
    }
}

pub struct RebuildQueue {
    trigger: RebuildTrigger,
    worker: Option<JoinHandle<()>>,
}

impl RebuildQueue {
    /// Start the worker thread running `job` once per accepted trigger.
    pub fn spawn<F>(job: F) -> std::io::Result<Self>
    where
        F: FnMut() + Send + 'static,
    {
        // one pending slot; the running job has already been received
        let (tx, rx) = sync_channel(1);
        let worker = thread::Builder::new()
            .name("apos-asset-rebuild".into())
            .spawn(move || run(rx, job))?;
        Ok(Self {
            trigger: RebuildTrigger {
                slot: Arc::new(Mutex::new(Some(tx))),
            },
            worker: Some(worker),
        })
    }

    pub fn trigger(&self) -> Trigger {
        self.trigger.trigger()
    }

    pub fn handle(&self) -> RebuildTrigger {
        self.trigger.clone()
    }

    /// Stop accepting triggers, then wait for the running and pending jobs.
    ///
    /// Handles still held elsewhere report `Trigger::Closed` afterwards.
    pub fn shutdown(mut self) {
        self.close_and_join();
    }

    fn close_and_join(&mut self) {
        self.trigger.close();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

impl Drop for RebuildQueue {
    fn drop(&mut self) {
        self.close_and_join();
    }
}

fn run<F: FnMut()>(rx: Receiver<()>, mut job: F) {
    while rx.recv().is_ok() {
        job();
    }
}
