//! Terminal concerns of the binary

pub mod terminal;
