//! User-visible notifications (toasts in a UI, stderr lines in the CLI).

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// Handle of a persistent notification, used to dismiss it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NotificationId(pub u64);

/// Sink for user-visible notifications.
pub trait Notifier: Send + Sync {
    fn error(&self, message: &str);

    fn success(&self, message: &str);

    /// Show an in-progress notification that stays until dismissed.
    fn loading(&self, message: &str) -> NotificationId;

    fn dismiss(&self, id: NotificationId);
}

/// One recorded notification event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Error(String),
    Success(String),
    Loading(NotificationId, String),
    Dismissed(NotificationId),
}

/// Notifier that keeps every event in memory.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    next_id: AtomicU64,
    events: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Notification> {
        self.lock().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.lock()
            .iter()
            .filter_map(|event| match event {
                Notification::Error(msg) => Some(msg.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn successes(&self) -> Vec<String> {
        self.lock()
            .iter()
            .filter_map(|event| match event {
                Notification::Success(msg) => Some(msg.clone()),
                _ => None,
            })
            .collect()
    }

    /// Loading notifications shown but not dismissed yet.
    pub fn active_loading(&self) -> Vec<NotificationId> {
        let events = self.lock();
        let mut active = Vec::new();
        for event in events.iter() {
            match event {
                Notification::Loading(id, _) => active.push(*id),
                Notification::Dismissed(id) => active.retain(|a| a != id),
                _ => {}
            }
        }
        active
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Notification>> {
        // A poisoned log is still readable.
        self.events.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn push(&self, event: Notification) {
        self.lock().push(event);
    }
}

impl Notifier for RecordingNotifier {
    fn error(&self, message: &str) {
        self.push(Notification::Error(message.to_string()));
    }

    fn success(&self, message: &str) {
        self.push(Notification::Success(message.to_string()));
    }

    fn loading(&self, message: &str) -> NotificationId {
        let id = NotificationId(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.push(Notification::Loading(id, message.to_string()));
        id
    }

    fn dismiss(&self, id: NotificationId) {
        self.push(Notification::Dismissed(id));
    }
}
