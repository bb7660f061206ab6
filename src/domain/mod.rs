//! Domain Layer
//!
//! The asset pipeline's pure model: what modules, entrypoints, manifests and
//! scene bundles are, and the rules that combine them.
//!
//! ## Structure
//!
//! - `entities/` - Module source records, entrypoints, build manifests
//! - `value_objects/` - Conditions, bundle names, cache metadata
//! - `services/` - Source matching, import composition, entrypoint dispatch,
//!   scene planning, cache keys, change filtering
//! - `ports/` - Interfaces implemented by infrastructure (module resolver,
//!   bundler, build module, release destination, event sink)
//!
//! ## Design Principles
//!
//! 1. **Little I/O** - Services work on scanned snapshots; the only file
//!    access is the default-export check of generated imports
//! 2. **Closed dispatch** - Entrypoint kinds are a sum type matched exhaustively
//! 3. **Ports & Adapters** - Bundling, deploy and reporting go through traits

pub mod entities;
pub mod ports;
pub mod services;
pub mod value_objects;
