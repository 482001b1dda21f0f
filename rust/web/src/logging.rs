use std::marker::PhantomData;
use std::sync::{Arc, Mutex, OnceLock};

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer, Registry};

/// One captured log event: level, target, rendered message, and every
/// structured field except the message itself.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub level: Level,
    pub target: String,
    pub message: String,
    pub fields: Vec<(String, String)>,
}

impl LogEntry {
    /// Looks up a structured field by name.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Shared buffer of captured log events for assertions in tests.
///
/// Cloning shares the underlying buffer, so a test can keep one handle
/// while the layer installed in a subscriber holds another.
#[derive(Debug, Clone, Default)]
pub struct TestLogSubscriber {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl TestLogSubscriber {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything captured so far, oldest first.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.entries.lock().unwrap().clear();
    }

    /// Wraps this handle in a [`Layer`] for composing into a registry.
    pub fn into_layer<S>(self) -> CaptureLayer<S>
    where
        S: Subscriber + for<'a> LookupSpan<'a>,
    {
        CaptureLayer {
            buffer: self,
            _subscriber: PhantomData,
        }
    }

    fn push(&self, entry: LogEntry) {
        self.entries.lock().unwrap().push(entry);
    }
}

/// Layer that copies every event into a [`TestLogSubscriber`] buffer.
pub struct CaptureLayer<S> {
    buffer: TestLogSubscriber,
    _subscriber: PhantomData<S>,
}

impl<S> Layer<S> for CaptureLayer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let mut collector = FieldCollector::default();
        event.record(&mut collector);

        self.buffer.push(LogEntry {
            level: *metadata.level(),
            target: metadata.target().to_string(),
            message: collector.message.unwrap_or_default(),
            fields: collector.fields,
        });
    }
}

#[derive(Default)]
struct FieldCollector {
    message: Option<String>,
    fields: Vec<(String, String)>,
}

impl FieldCollector {
    fn put(&mut self, field: &Field, value: String) {
        if field.name() == "message" {
            self.message = Some(value);
        } else {
            self.fields.push((field.name().to_string(), value));
        }
    }
}

impl Visit for FieldCollector {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.put(field, value.to_string());
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.put(field, value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.put(field, value.to_string());
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.put(field, value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.put(field, format!("{value:?}"));
    }
}

/// Install the process-wide subscriber for the server binary.
///
/// `RUST_LOG` overrides the default filter, which keeps dependency
/// noise at `info` while this crate logs at `debug`.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,blackjack_web=debug"));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set global default subscriber");
}

/// Process-wide capture buffer for tests that assert on logs emitted
/// from other threads. The registry is installed on first use; every
/// call clears the buffer and hands back a fresh handle to it.
pub fn init_test_logging() -> TestLogSubscriber {
    static CAPTURE: OnceLock<TestLogSubscriber> = OnceLock::new();

    let capture = CAPTURE.get_or_init(|| {
        let buffer = TestLogSubscriber::new();
        let registry = Registry::default().with(buffer.clone().into_layer::<Registry>());
        tracing::subscriber::set_global_default(registry)
            .expect("Failed to set global default test subscriber");
        buffer
    });

    capture.clear();
    capture.clone()
}
