//! Common test utilities for apos-asset CLI tests.
//!
//! - `TestEnv`: isolated project directory plus CLI runner
//! - Fixtures: a small module tree and bundler scripts

#![allow(dead_code)]

pub mod env;
pub mod fixtures;

pub use env::*;
pub use fixtures::*;
