//! Typed filter descriptors for observability entities.
//!
//! Client-supplied JSON filter lists are checked against per-entity field
//! tables, decoded from their wire encoding, and returned as typed filters.

pub mod api;
mod app;
pub mod core;
pub mod filters;
pub mod utils;
