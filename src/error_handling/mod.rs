//! Error handling.
//!
//! This module provides:
//! - The pipeline error taxonomy (decode, parse, validation, fetch, serialization)
//! - Publishing and initialization errors
//! - Categorization of HTTP client errors

mod categorization;
mod types;

// Re-export public API
pub use categorization::categorize_reqwest_error;
pub use types::{error_chain, FetchErrorKind, InitializationError, PipelineError, PublishError};
