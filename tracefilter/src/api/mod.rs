//! HTTP-facing types

pub mod types;

pub use types::ApiError;
