//! Presentation events emitted by the client.
//!
//! Rendering is left to the front end; the core only reports what should be
//! shown.

use std::collections::HashSet;
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Severity of a user-visible notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    Success,
    Error,
    Warning,
    Info,
}

impl NotificationKind {
    /// How long a front end should keep the notification on screen.
    pub fn default_duration(self) -> Duration {
        match self {
            NotificationKind::Success | NotificationKind::Info => Duration::from_millis(4000),
            NotificationKind::Error => Duration::from_millis(6000),
            NotificationKind::Warning => Duration::from_millis(5000),
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            NotificationKind::Success => "✓",
            NotificationKind::Error => "✕",
            NotificationKind::Warning => "⚠",
            NotificationKind::Info => "ℹ",
        }
    }
}

/// Receiver of presentation events.
pub trait PresentationSink: Send + Sync {
    fn notify(&self, kind: NotificationKind, message: &str);

    /// Mark the loader `id` as active or finished.
    fn set_loading(&self, id: &str, active: bool);
}

/// Sink that only logs events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl PresentationSink for TracingSink {
    fn notify(&self, kind: NotificationKind, message: &str) {
        match kind {
            NotificationKind::Error => error!(notification = message),
            NotificationKind::Warning => warn!(notification = message),
            NotificationKind::Success | NotificationKind::Info => info!(notification = message),
        }
    }

    fn set_loading(&self, id: &str, active: bool) {
        debug!(loader = id, active, "Loading state changed");
    }
}

/// Tracks which loaders are active.
///
/// Interaction is considered blocked while at least one loader runs.
#[derive(Debug, Default)]
pub struct LoadingTracker {
    active: Mutex<HashSet<String>>,
}

impl LoadingTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a loader transition. Returns true when the busy state changed.
    pub fn set(&self, id: &str, active: bool) -> bool {
        let mut loaders = self.lock();
        let was_busy = !loaders.is_empty();
        if active {
            loaders.insert(id.to_string());
        } else {
            loaders.remove(id);
        }
        was_busy != !loaders.is_empty()
    }

    pub fn is_busy(&self) -> bool {
        !self.lock().is_empty()
    }

    pub fn is_active(&self, id: &str) -> bool {
        self.lock().contains(id)
    }

    /// Stop every loader, returning the ids that were active.
    pub fn hide_all(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.lock().drain().collect();
        ids.sort();
        ids
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashSet<String>> {
        // A poisoned set of loader ids is still usable.
        self.active.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_durations() {
        assert_eq!(
            NotificationKind::Error.default_duration(),
            Duration::from_secs(6)
        );
        assert_eq!(
            NotificationKind::Warning.default_duration(),
            Duration::from_secs(5)
        );
        assert_eq!(
            NotificationKind::Success.default_duration(),
            Duration::from_secs(4)
        );
    }

    #[test]
    fn test_loading_tracker_busy_transitions() {
        let tracker = LoadingTracker::new();
        assert!(!tracker.is_busy());

        assert!(tracker.set("register", true));
        assert!(!tracker.set("login", true));
        assert!(tracker.is_active("login"));

        assert!(!tracker.set("register", false));
        assert!(tracker.is_busy());
        assert!(tracker.set("login", false));
        assert!(!tracker.is_busy());
    }

    #[test]
    fn test_hide_all() {
        let tracker = LoadingTracker::new();
        tracker.set("b", true);
        tracker.set("a", true);
        assert_eq!(tracker.hide_all(), vec!["a".to_string(), "b".to_string()]);
        assert!(!tracker.is_busy());
    }
}
