//! Recent tracing events kept in memory for `GET /api/logs`.

use std::collections::VecDeque;
use std::sync::{Arc, LazyLock, Mutex, MutexGuard};

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;

const MAX_LOG_ENTRIES: usize = 1000;

#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub timestamp: String,
    pub level: String,
    pub target: String,
    pub message: String,
    pub fields: Map<String, Value>,
}

/// Bounded ring of log entries; the oldest entry goes first when full.
pub struct LogBuffer {
    capacity: usize,
    entries: Mutex<VecDeque<LogEntry>>,
}

impl LogBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: Mutex::new(VecDeque::new()),
        }
    }

    fn entries(&self) -> MutexGuard<'_, VecDeque<LogEntry>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn push(&self, entry: LogEntry) {
        let mut entries = self.entries();
        while entries.len() >= self.capacity {
            entries.pop_front();
        }
        entries.push_back(entry);
    }

    /// Up to `limit` newest entries, oldest first.
    pub fn recent(&self, limit: usize) -> Vec<LogEntry> {
        let entries = self.entries();
        let skip = entries.len().saturating_sub(limit.clamp(1, self.capacity));
        entries.iter().skip(skip).cloned().collect()
    }

    /// Empty the buffer and return how many entries were dropped.
    pub fn clear(&self) -> usize {
        let mut entries = self.entries();
        let count = entries.len();
        entries.clear();
        count
    }
}

static GLOBAL: LazyLock<Arc<LogBuffer>> =
    LazyLock::new(|| Arc::new(LogBuffer::new(MAX_LOG_ENTRIES)));

pub fn recent(limit: usize) -> Vec<LogEntry> {
    GLOBAL.recent(limit)
}

pub fn clear() -> usize {
    GLOBAL.clear()
}

/// Copies events at `max_level` or more severe into a [`LogBuffer`].
///
/// Per-item debug events of a large batch would push everything else out, so
/// the default layer keeps INFO and above.
pub struct LogCaptureLayer {
    buffer: Arc<LogBuffer>,
    max_level: Level,
}

impl LogCaptureLayer {
    pub fn new() -> Self {
        Self::with_buffer(Arc::clone(&GLOBAL), Level::INFO)
    }

    pub fn with_buffer(buffer: Arc<LogBuffer>, max_level: Level) -> Self {
        Self { buffer, max_level }
    }
}

impl Default for LogCaptureLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Subscriber> Layer<S> for LogCaptureLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        if *meta.level() > self.max_level {
            return;
        }

        let mut fields = FieldMap::default();
        event.record(&mut fields);
        let mut fields = fields.0;
        let message = match fields.remove("message") {
            Some(Value::String(s)) => s,
            Some(other) => other.to_string(),
            None => meta.name().to_string(),
        };

        self.buffer.push(LogEntry {
            timestamp: chrono::Utc::now().to_rfc3339(),
            level: meta.level().to_string().to_lowercase(),
            target: meta.target().to_string(),
            message,
            fields,
        });
    }
}

/// Event fields as JSON; numbers and booleans keep their type.
#[derive(Default)]
struct FieldMap(Map<String, Value>);

impl FieldMap {
    fn put(&mut self, field: &Field, value: impl Into<Value>) {
        self.0.insert(field.name().to_string(), value.into());
    }
}

impl Visit for FieldMap {
    fn record_u64(&mut self, field: &Field, value: u64) {
        self.put(field, value);
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.put(field, value);
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.put(field, value);
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.put(field, value);
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.put(field, format!("{value:?}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::layer::SubscriberExt;

    fn entry(message: &str) -> LogEntry {
        LogEntry {
            timestamp: chrono::Utc::now().to_rfc3339(),
            level: "info".to_string(),
            target: "test".to_string(),
            message: message.to_string(),
            fields: Map::new(),
        }
    }

    #[test]
    fn recent_keeps_newest_in_order() {
        let buffer = LogBuffer::new(4);
        for idx in 0..6 {
            buffer.push(entry(&format!("m{idx}")));
        }

        let logs = buffer.recent(3);
        let messages: Vec<_> = logs.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, ["m3", "m4", "m5"]);
        assert_eq!(buffer.recent(100).len(), 4);
        assert_eq!(buffer.clear(), 4);
        assert!(buffer.recent(10).is_empty());
    }

    #[test]
    fn layer_captures_message_and_fields() {
        let buffer = Arc::new(LogBuffer::new(10));
        let layer = LogCaptureLayer::with_buffer(Arc::clone(&buffer), Level::INFO);
        let subscriber = tracing_subscriber::registry().with(layer);
        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!(duplicates = 2_u64, file = "a.jpg", "Names repeat");
        });

        let logs = buffer.recent(10);
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].level, "warn");
        assert_eq!(logs[0].message, "Names repeat");
        assert_eq!(logs[0].fields["duplicates"], 2);
        assert_eq!(logs[0].fields["file"], "a.jpg");
        assert!(!logs[0].fields.contains_key("message"));
    }

    #[test]
    fn events_below_the_level_are_ignored() {
        let buffer = Arc::new(LogBuffer::new(10));
        let layer = LogCaptureLayer::with_buffer(Arc::clone(&buffer), Level::INFO);
        let subscriber = tracing_subscriber::registry().with(layer);
        tracing::subscriber::with_default(subscriber, || {
            tracing::debug!(index = 3_u64, "Generated item");
            tracing::info!("Batch job started");
        });

        let logs = buffer.recent(10);
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].message, "Batch job started");
    }
}
