//! Domain layer - Core business logic.
//!
//! - `foundation` - identifiers, timestamps, shared errors
//! - `comparison` - prompt building, normalization, service errors

pub mod comparison;
pub mod foundation;
