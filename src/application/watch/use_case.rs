//! Watch Use Case implementation

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::channel;
use std::sync::Arc;
use std::time::Duration;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use crate::application::build::{AssetBuilder, BuildOptions};
use crate::application::restart::RestartSignal;
use crate::domain::ports::{BuildEvent, BuildEventSink, ChangeNotifier};
use crate::error::{AssetError, AssetResult};
use crate::infrastructure::scan_all;

use super::event::{watch_roots, WatchOptions, WatcherState};
use super::pool::ChangePool;
use super::queue::{RebuildQueue, RebuildTrigger, Trigger};

/// What a watch-triggered rebuild produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RebuildNotice {
    pub builds: Vec<String>,
    pub scenes: Vec<String>,
    pub restart_id: String,
}

pub type RebuildListener = Arc<dyn Fn(&RebuildNotice) + Send + Sync>;

/// Watch Use Case
///
/// Feeds file changes into a `ChangePool`, debounces them and runs
/// incremental builds on the `RebuildQueue` worker.
pub struct WatchUseCase {
    builder: Arc<AssetBuilder>,
    options: WatchOptions,
    restart: Arc<RestartSignal>,
    listeners: Vec<RebuildListener>,
}

impl WatchUseCase {
    pub fn new(builder: Arc<AssetBuilder>, options: WatchOptions) -> Self {
        Self {
            builder,
            options,
            restart: Arc::new(RestartSignal::new()),
            listeners: Vec::new(),
        }
    }

    pub fn with_restart_signal(mut self, restart: Arc<RestartSignal>) -> Self {
        self.restart = restart;
        self
    }

    pub fn on_rebuild<F>(mut self, listener: F) -> Self
    where
        F: Fn(&RebuildNotice) + Send + Sync + 'static,
    {
        self.listeners.push(Arc::new(listener));
        self
    }

    pub fn restart_signal(&self) -> Arc<RestartSignal> {
        self.restart.clone()
    }

    /// The job run for each accepted trigger: drain the pool, build, notify.
    pub fn rebuild_job(&self, pool: ChangePool) -> impl FnMut() + Send + 'static {
        let builder = self.builder.clone();
        let restart = self.restart.clone();
        let listeners = self.listeners.clone();
        let dev_server = self.options.dev_server;
        move || {
            let changes = pool.drain();
            if changes.is_empty() {
                return;
            }
            rebuild(&builder, &restart, &listeners, changes, dev_server);
        }
    }

    /// Start watching (blocking)
    ///
    /// Runs until `running` is cleared. The initial build is the caller's.
    pub fn start(&self, running: Arc<AtomicBool>) -> AssetResult<()> {
        let events = self.builder.events();
        let pool = ChangePool::new();
        let queue = RebuildQueue::spawn(self.rebuild_job(pool.clone()))?;

        let modules = self.builder.build_modules();
        let hmr = self.options.dev_server && modules.has_hmr();
        if let (true, Some(module)) = (hmr, modules.get()) {
            module.watch(Arc::new(QueueNotifier {
                pool: pool.clone(),
                trigger: queue.handle(),
                events: events.clone(),
            }))?;
        }

        let resolver = self.builder.resolver();
        let records = scan_all(resolver.as_ref())?;
        let roots = watch_roots(&records, &resolver.symlinked_packages(), hmr);

        let (tx, rx) = channel();
        let mut watcher = RecommendedWatcher::new(
            move |res: Result<Event, notify::Error>| {
                let _ = tx.send(res);
            },
            Config::default(),
        )
        .map_err(|e| AssetError::Watch(e.to_string()))?;

        for root in &roots {
            watcher
                .watch(root, RecursiveMode::Recursive)
                .map_err(|e| AssetError::Watch(format!("{}: {}", root.display(), e)))?;
        }
        events.on_event(BuildEvent::WatchStarted {
            roots: roots.iter().map(|r| self.options.change_path(r)).collect(),
        });

        let mut state = WatcherState::new(self.options.debounce);
        while running.load(Ordering::SeqCst) {
            match rx.recv_timeout(Duration::from_millis(50)) {
                Ok(Ok(event)) => {
                    if matches!(event.kind, EventKind::Access(_)) {
                        continue;
                    }
                    for path in event.paths {
                        let path = self.options.change_path(&path);
                        events.on_event(BuildEvent::FileChanged { path: path.clone() });
                        pool.push(path);
                        state.record_change();
                    }
                }
                Ok(Err(e)) => events.on_event(BuildEvent::error(format!("watcher: {}", e))),
                Err(_) => {}
            }

            if state.take_ready() {
                report_trigger(events.as_ref(), queue.trigger());
            }
        }

        drop(watcher);
        queue.shutdown();
        events.on_event(BuildEvent::Shutdown);
        Ok(())
    }
}

fn rebuild(
    builder: &AssetBuilder,
    restart: &RestartSignal,
    listeners: &[RebuildListener],
    changes: Vec<String>,
    dev_server: bool,
) {
    let events = builder.events();
    let options = BuildOptions::for_changes(changes).with_dev_server(dev_server);
    match builder.build(&options) {
        Ok(report) if report.has_changes() => {
            let notice = RebuildNotice {
                builds: report.built,
                scenes: report.scenes,
                restart_id: restart.regenerate(),
            };
            events.on_event(BuildEvent::RebuildCompleted {
                builds: notice.builds.clone(),
                scenes: notice.scenes.clone(),
                restart_id: notice.restart_id.clone(),
            });
            for listener in listeners {
                listener(&notice);
            }
        }
        Ok(_) => {}
        Err(e) => events.on_event(BuildEvent::error(format!("rebuild failed: {}", e))),
    }
}

fn report_trigger(events: &dyn BuildEventSink, trigger: Trigger) {
    match trigger {
        Trigger::Queued => events.on_event(BuildEvent::RebuildQueued),
        Trigger::Coalesced => events.on_event(BuildEvent::RebuildCoalesced),
        Trigger::Closed => {}
    }
}

/// Changes reported by a build module watching its own sources
struct QueueNotifier {
    pool: ChangePool,
    trigger: RebuildTrigger,
    events: Arc<dyn BuildEventSink>,
}

impl ChangeNotifier for QueueNotifier {
    fn notify_changes(&self, paths: Vec<String>) {
        if paths.is_empty() {
            return;
        }
        self.pool.extend(paths);
        report_trigger(self.events.as_ref(), self.trigger.trigger());
    }
}
