//! Rico Storage Library
//!
//! Storage abstraction for generated images, with S3 (via `object_store`) and local
//! filesystem implementations.
//!
//! # Object name format
//!
//! Every generated image is written once, at the bucket root, as
//! `{prefix}-{unix_millis}.{ext}`. Uploads never overwrite an existing object.
//! Keys must not contain `..` or a leading `/`. Name generation lives in the `keys`
//! module so all backends stay consistent.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use keys::{extension_for_content_type, generate_object_name};
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
pub use rico_core::StorageBackend;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult};
