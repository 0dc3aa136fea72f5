//! Validation adapter.
//!
//! Runs the external constraint validator against a decoded object and, when
//! it reports violations, raises a single grouped error report keyed by a
//! name derived from the target shape's type name.

pub mod adapter;

pub use adapter::{ValidationAdapter, Validator, Violation, group_key};
