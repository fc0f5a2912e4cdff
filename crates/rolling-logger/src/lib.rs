//! Rolling Logger
//!
//! A `tracing` layer that formats every event into one line, keeps the
//! most recent lines in a circular buffer and forwards each line to a sink
//! (the browser console in the app, a vector in tests).

use std::collections::VecDeque;
use std::fmt::{self, Write as _};
use std::sync::{Arc, Mutex};

use thiserror::Error;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("a global logger is already installed: {0}")]
    AlreadyInitialized(String),
}

/// Destination for formatted lines
pub trait LogSink: Send + Sync + 'static {
    fn write(&self, level: &Level, line: &str);
}

/// Shared circular buffer of recent lines
#[derive(Debug, Clone)]
pub struct LogBuffer {
    lines: Arc<Mutex<VecDeque<String>>>,
    capacity: usize,
}

impl LogBuffer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            lines: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    pub fn push(&self, line: String) {
        let mut lines = self.lines.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if lines.len() == self.capacity {
            lines.pop_front();
        }
        lines.push_back(line);
    }

    /// Snapshot, oldest first
    pub fn lines(&self) -> Vec<String> {
        let lines = self.lines.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        lines.iter().cloned().collect()
    }

    pub fn clear(&self) {
        self.lines.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).clear();
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Collects the `message` field and `key=value` pairs of an event
#[derive(Default)]
struct LineVisitor {
    message: String,
    fields: String,
}

impl Visit for LineVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            let _ = write!(self.fields, " {}={}", field.name(), value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{:?}", value);
        } else {
            let _ = write!(self.fields, " {}={:?}", field.name(), value);
        }
    }
}

pub struct RollingLayer<K> {
    app_name: String,
    buffer: LogBuffer,
    sink: K,
}

impl<K: LogSink> RollingLayer<K> {
    pub fn new(app_name: impl Into<String>, buffer: LogBuffer, sink: K) -> Self {
        Self { app_name: app_name.into(), buffer, sink }
    }

    fn format(&self, event: &Event<'_>) -> String {
        let mut visitor = LineVisitor::default();
        event.record(&mut visitor);
        let meta = event.metadata();
        format!(
            "[{}] {:<5} {} {}: {}{}",
            chrono::Local::now().format("%H:%M:%S%.3f"),
            meta.level(),
            self.app_name,
            meta.target(),
            visitor.message,
            visitor.fields
        )
    }
}

impl<S, K> Layer<S> for RollingLayer<K>
where
    S: Subscriber,
    K: LogSink,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let line = self.format(event);
        self.sink.write(event.metadata().level(), &line);
        self.buffer.push(line);
    }
}

/// Install the rolling layer as the global subscriber
///
/// Returns the buffer so a diagnostics view can read recent lines.
pub fn init_logger<K: LogSink>(app_name: &str, capacity: usize, max_level: Level, sink: K) -> Result<LogBuffer, LoggerError> {
    let buffer = LogBuffer::new(capacity);
    let subscriber = tracing_subscriber::registry()
        .with(LevelFilter::from_level(max_level))
        .with(RollingLayer::new(app_name, buffer.clone(), sink));
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| LoggerError::AlreadyInitialized(e.to_string()))?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Default)]
    struct VecSink(Arc<Mutex<Vec<(Level, String)>>>);

    impl LogSink for VecSink {
        fn write(&self, level: &Level, line: &str) {
            self.0.lock().unwrap().push((*level, line.to_string()));
        }
    }

    #[test]
    fn test_buffer_rolls_over() {
        let buffer = LogBuffer::new(3);
        for i in 0..5 {
            buffer.push(format!("line {}", i));
        }
        assert_eq!(buffer.lines(), vec!["line 2", "line 3", "line 4"]);
        buffer.clear();
        assert!(buffer.lines().is_empty());
    }

    #[test]
    fn test_layer_formats_and_forwards() {
        let buffer = LogBuffer::new(10);
        let sink = VecSink::default();
        let subscriber = tracing_subscriber::registry()
            .with(LevelFilter::INFO)
            .with(RollingLayer::new("EventHub", buffer.clone(), sink.clone()));

        tracing::subscriber::with_default(subscriber, || {
            tracing::debug!("filtered out");
            tracing::warn!(offset = 10, "page fetch failed");
        });

        let lines = buffer.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("WARN"));
        assert!(lines[0].contains("EventHub"));
        assert!(lines[0].ends_with("page fetch failed offset=10"));

        let forwarded = sink.0.lock().unwrap();
        assert_eq!(forwarded.len(), 1);
        assert_eq!(forwarded[0].0, Level::WARN);
    }
}
