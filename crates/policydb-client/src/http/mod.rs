//! HTTP query surface for upstream reporting/enforcement components.

pub mod error;
pub mod handlers;

pub use error::ApiError;
