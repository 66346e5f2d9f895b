//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (timeouts, size limits, endpoints)
//! - The `Config` struct parsed from flags and environment variables

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{Config, LogFormat, LogLevel, PublishTarget};
