//! Watch Use Case
//!
//! Keeps bundles current while developing:
//! - File system monitoring (via `notify` crate) of module `ui/` trees
//! - Changed paths pooled and debounced
//! - Incremental builds on a bounded, self-draining queue
//! - Restart id regenerated so open pages reload
//!
//! ## Usage
//!
//! ```ignore
//! let use_case = WatchUseCase::new(builder, WatchOptions::from_config(root, &config));
//! use_case.start(running)?;
//! ```

mod event;
mod pool;
mod queue;
mod use_case;


pub use event::{watch_roots, WatchOptions, WatcherState, WATCHED_FOLDERS};
pub use pool::ChangePool;
pub use queue::{RebuildQueue, RebuildTrigger, Trigger};
pub use use_case::{RebuildListener, RebuildNotice, WatchUseCase};
