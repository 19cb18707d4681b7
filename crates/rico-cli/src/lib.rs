//! Shared helpers for the `rico` binary.

use rico_client::{NotificationId, Notifier};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

/// Media type for a photo path, based on its extension. Unknown extensions map to
/// `application/octet-stream`, which the controller rejects as a non-image.
pub fn media_type_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        Some("heic") => "image/heic",
        _ => "application/octet-stream",
    }
}

/// File name for a downloaded result: the last path segment of the URL, or a fallback.
pub fn file_name_from_url(url: &str) -> String {
    url.split(['?', '#'])
        .next()
        .and_then(|u| u.rsplit('/').next())
        .filter(|segment| !segment.is_empty() && segment.contains('.'))
        .map(str::to_string)
        .unwrap_or_else(|| "rich-image.png".to_string())
}

/// Prints notifications to stderr so stdout stays machine-readable.
#[derive(Debug, Default)]
pub struct ConsoleNotifier {
    next_id: AtomicU64,
}

impl ConsoleNotifier {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Notifier for ConsoleNotifier {
    fn error(&self, message: &str) {
        eprintln!("error: {}", message);
    }

    fn success(&self, message: &str) {
        eprintln!("{}", message);
    }

    fn loading(&self, message: &str) -> NotificationId {
        eprintln!("{}", message);
        NotificationId(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    fn dismiss(&self, _id: NotificationId) {}
}

/// Initialize tracing for the CLI. Logs go to stderr; `RUST_LOG` overrides the `warn` default.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_type_from_extension() {
        assert_eq!(media_type_for_path(Path::new("me.JPG")), "image/jpeg");
        assert_eq!(media_type_for_path(Path::new("me.jpeg")), "image/jpeg");
        assert_eq!(media_type_for_path(Path::new("/tmp/me.png")), "image/png");
        assert_eq!(media_type_for_path(Path::new("notes.txt")), "application/octet-stream");
        assert_eq!(media_type_for_path(Path::new("no_extension")), "application/octet-stream");
    }

    #[test]
    fn file_name_from_result_url() {
        assert_eq!(
            file_name_from_url("https://cdn.example/rich-image-1.png"),
            "rich-image-1.png"
        );
        assert_eq!(
            file_name_from_url("https://cdn.example/a/rich-image-2.jpg?sig=abc"),
            "rich-image-2.jpg"
        );
        assert_eq!(
            file_name_from_url("https://picsum.photos/seed/urban-ceo/800/600"),
            "rich-image.png"
        );
    }

    #[test]
    fn console_notifier_hands_out_distinct_ids() {
        let notifier = ConsoleNotifier::new();
        let first = notifier.loading("one");
        let second = notifier.loading("two");
        assert_ne!(first, second);
    }
}
