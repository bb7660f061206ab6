//! Module metadata resolution

mod fs_resolver;

pub use fs_resolver::FsModuleResolver;
