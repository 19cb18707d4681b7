//! Rico API Library
//!
//! This crate provides the generation endpoint: HTTP handlers, error rendering and
//! application setup.

// Module declarations
mod handlers;
pub mod setup;
pub mod telemetry;

// Public modules
pub mod error;
pub mod state;

// Re-exports
pub use error::{ErrorResponse, HttpAppError};
pub use state::AppState;
