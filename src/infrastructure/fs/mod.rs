//! File system infrastructure

mod local;

pub use local::{atomic_write, copy_dir, empty_dir, list_files, remove_dir_if_exists, LocalFs};
