//! Append-only event log with live fan-out.
//!
//! Entries are kept in memory for the whole session and pushed to
//! subscribers through a tokio [`broadcast`] channel. Each entry is also
//! mirrored to `tracing`.

use std::sync::{Mutex, PoisonError};

use tokio::sync::broadcast;

use facility_domain::event::{LogEntry, Severity};

const DEFAULT_CAPACITY: usize = 256;

/// The operator-facing record of everything that happened.
///
/// Appending succeeds even when there are no active subscribers.
pub struct EventLog {
    entries: Mutex<Vec<LogEntry>>,
    sender: broadcast::Sender<LogEntry>,
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl EventLog {
    /// Create a log whose live channel buffers up to `capacity` entries per
    /// lagging subscriber.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            entries: Mutex::new(Vec::new()),
            sender,
        }
    }

    /// Append an entry and notify subscribers.
    ///
    /// Subscribers see entries in the same order as [`EventLog::recent`].
    pub fn append(&self, entry: LogEntry) {
        match entry.severity {
            Severity::Info => tracing::info!(severity = "info", "{}", entry.message),
            Severity::Warning => tracing::warn!(severity = "warning", "{}", entry.message),
            Severity::Error => tracing::error!(severity = "error", "{}", entry.message),
        }
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.push(entry.clone());
        // sent under the lock so storage and broadcast order agree;
        // only fails with zero receivers
        let _ = self.sender.send(entry);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.append(LogEntry::info(message));
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.append(LogEntry::warning(message));
    }

    pub fn error(&self, message: impl Into<String>) {
        self.append(LogEntry::error(message));
    }

    /// At most `limit` entries, oldest first, ending with the latest one.
    #[must_use]
    pub fn recent(&self, limit: usize) -> Vec<LogEntry> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let start = entries.len().saturating_sub(limit);
        entries[start..].to_vec()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Receive every entry appended *after* this call.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<LogEntry> {
        self.sender.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(entries: &[LogEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.message.as_str()).collect()
    }

    #[test]
    fn should_return_recent_entries_most_recent_last() {
        let log = EventLog::default();
        for i in 0..5 {
            log.info(format!("entry {i}"));
        }
        assert_eq!(
            messages(&log.recent(3)),
            vec!["entry 2", "entry 3", "entry 4"]
        );
    }

    #[test]
    fn should_return_everything_when_limit_exceeds_length() {
        let log = EventLog::default();
        log.info("a");
        log.error("b");
        assert_eq!(messages(&log.recent(50)), vec!["a", "b"]);
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn should_return_nothing_for_zero_limit() {
        let log = EventLog::default();
        log.info("a");
        assert!(log.recent(0).is_empty());
    }

    #[test]
    fn should_keep_severity() {
        let log = EventLog::default();
        log.warning("careful");
        log.error("broken");
        let entries = log.recent(2);
        assert_eq!(entries[0].severity, Severity::Warning);
        assert_eq!(entries[1].severity, Severity::Error);
    }

    #[tokio::test]
    async fn should_deliver_entry_to_subscriber() {
        let log = EventLog::default();
        let mut rx = log.subscribe();
        log.info("Lights turned ON");
        let received = rx.recv().await.unwrap();
        assert_eq!(received.message, "Lights turned ON");
        assert_eq!(received, log.recent(1)[0]);
    }

    #[tokio::test]
    async fn should_not_deliver_entries_appended_before_subscription() {
        let log = EventLog::default();
        log.info("before");
        let mut rx = log.subscribe();
        log.info("after");
        assert_eq!(rx.recv().await.unwrap().message, "after");
    }

    #[test]
    fn should_broadcast_in_storage_order_under_concurrent_appends() {
        for _ in 0..50 {
            let log = EventLog::new(1024);
            let mut rx = log.subscribe();
            std::thread::scope(|scope| {
                for worker in 0..8 {
                    let log = &log;
                    scope.spawn(move || {
                        for i in 0..50 {
                            log.info(format!("worker {worker} entry {i}"));
                        }
                    });
                }
            });
            let mut streamed = Vec::new();
            while let Ok(entry) = rx.try_recv() {
                streamed.push(entry);
            }
            assert_eq!(streamed, log.recent(usize::MAX));
        }
    }

    #[test]
    fn should_succeed_when_no_subscribers() {
        let log = EventLog::default();
        log.info("nobody listening");
        assert!(!log.is_empty());
    }
}
