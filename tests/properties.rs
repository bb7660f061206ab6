//! Property tests for apos-asset.
//!
//! Properties use randomized input generation to protect invariants of
//! the pure build rules: cache keys, source override order and change
//! filtering.
//!
//! Run with: `cargo test --test properties`

#[path = "properties/cache_key.rs"]
mod cache_key;

#[path = "properties/override_order.rs"]
mod override_order;

#[path = "properties/change_filter.rs"]
mod change_filter;
