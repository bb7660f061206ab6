//! External build module adapters

mod command;

pub use command::{CommandBuildModule, MODE_ENV, REQUEST_ENV};
