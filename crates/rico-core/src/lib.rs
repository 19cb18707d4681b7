//! Rico Core Library
//!
//! Domain types shared by the generation endpoint, the client controller and the CLI:
//! configuration, the error taxonomy, the scenario table and the JSON wire models.

pub mod config;
pub mod error;
pub mod models;
pub mod scenario;
pub mod storage_types;

// Re-export commonly used types
pub use config::{Config, GenerationMode};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{GenerateRequest, GenerateResponse};
pub use scenario::{Scenario, UnknownScenario};
pub use storage_types::StorageBackend;
