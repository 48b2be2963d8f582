//! Utilities
//!
//! Shared error types.

pub mod error;

pub use error::{AppError, AppResult};
