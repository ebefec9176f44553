//! Transient user notifications.
//!
//! Stand-in for a toast layer: fire-and-forget, rendered independently of
//! view state, and never coupled back into it. The terminal front-end
//! supplies its own sink; [`LogSink`] routes notices through `tracing` for
//! headless use, and [`MemorySink`] captures them for assertions.

use std::sync::Mutex;

/// Fire-and-forget notification surface.
pub trait NotificationSink: Send + Sync {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
}

/// Renders notifications through the log.
#[derive(Debug, Default)]
pub struct LogSink;

impl NotificationSink for LogSink {
    fn success(&self, message: &str) {
        tracing::info!(target: "mediflow::notify", "{message}");
    }

    fn error(&self, message: &str) {
        tracing::error!(target: "mediflow::notify", "{message}");
    }
}

/// The kind of a captured notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// One captured notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

/// Captures notices in memory, in arrival order.
#[derive(Debug, Default)]
pub struct MemorySink {
    notices: Mutex<Vec<Notice>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .map(|notices| notices.clone())
            .unwrap_or_default()
    }

    /// True if a notice of `kind` with exactly `message` was captured.
    pub fn contains(&self, kind: NoticeKind, message: &str) -> bool {
        self.notices()
            .iter()
            .any(|notice| notice.kind == kind && notice.message == message)
    }

    fn push(&self, kind: NoticeKind, message: &str) {
        if let Ok(mut notices) = self.notices.lock() {
            notices.push(Notice {
                kind,
                message: message.to_string(),
            });
        }
    }
}

impl NotificationSink for MemorySink {
    fn success(&self, message: &str) {
        self.push(NoticeKind::Success, message);
    }

    fn error(&self, message: &str) {
        self.push(NoticeKind::Error, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_sink_keeps_arrival_order() {
        let sink = MemorySink::new();
        sink.success("Patient created successfully!");
        sink.error("Failed to add observation.");

        let notices = sink.notices();
        assert_eq!(notices.len(), 2);
        assert_eq!(notices[0].kind, NoticeKind::Success);
        assert_eq!(notices[1].kind, NoticeKind::Error);
        assert!(sink.contains(NoticeKind::Error, "Failed to add observation."));
        assert!(!sink.contains(NoticeKind::Success, "Failed to add observation."));
    }
}
