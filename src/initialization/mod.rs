//! Application initialization and resource setup.
//!
//! This module provides functions to initialize shared resources:
//! - Logger (plain or JSON)
//! - HTTP clients for fetching and publishing

mod client;
mod logger;

// Re-export public API
pub use client::{init_fetch_client, init_publish_client};
pub use logger::init_logger_with;
