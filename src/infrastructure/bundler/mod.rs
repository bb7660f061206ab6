//! Internal bundler adapters

mod command;

pub use command::{read_output_files, CommandBundler, BUNDLER_CONFIG_FILE, BUNDLER_MANIFEST};
