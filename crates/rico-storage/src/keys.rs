//! Object name generation shared by every backend.
//!
//! Format: `{prefix}-{unix_millis}.{ext}`. A millisecond timestamp is unique enough for
//! this traffic volume; a collision surfaces as `StorageError::AlreadyExists`.

use chrono::{DateTime, Utc};

/// Generate the object name for an image stored at `now`.
pub fn generate_object_name(prefix: &str, extension: &str, now: DateTime<Utc>) -> String {
    format!("{}-{}.{}", prefix, now.timestamp_millis(), extension)
}

/// File extension for an image content type. Unknown types fall back to `png`.
pub fn extension_for_content_type(content_type: &str) -> &'static str {
    match content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_lowercase()
        .as_str()
    {
        "image/jpeg" | "image/jpg" => "jpg",
        "image/webp" => "webp",
        "image/gif" => "gif",
        _ => "png",
    }
}
