//! Metadata-driven payload decoding.
//!
//! This crate turns untyped input maps into typed object graphs, driven by
//! the shape metadata registered in `payload-model`:
//!
//! - **engine**: recursive descent over registered shapes, including the
//!   XML attribute fallback and wrapped-collection handling
//! - **coerce**: scalar and array coercion rules, one per type tag
//! - **datetime**: whitespace-tolerant date/datetime/clock parsing

pub mod coerce;
pub mod datetime;
pub mod engine;

pub use coerce::coerce;
pub use engine::TransformEngine;

/// Locale unconditionally dropped from localized payloads (fixed content
/// policy, not configurable).
pub(crate) const DROPPED_LOCALE: &str = "ru";
