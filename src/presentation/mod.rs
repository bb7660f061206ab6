//! Presentation Layer
//!
//! This layer handles:
//! - Creating use cases with infrastructure dependencies
//! - Output formatting (text/JSON)
//!
//! ## Structure
//!
//! - `factory` - Creates use cases with proper dependencies (dependency injection)
//! - `output` - Build report rendering
//!
//! ## Usage
//!
//! ```ignore
//! use apos_asset::presentation::factory;
//!
//! let events = factory::create_event_sink("build", false, &config, true);
//! let builder = factory::create_asset_builder(&root, config, events)?;
//! let report = builder.build(&BuildOptions::full())?;
//! ```

pub mod factory;
pub mod output;

pub use factory::{create_asset_builder, create_event_sink, create_release_destination};
pub use output::{render_report, render_report_json, OutputFormat};
