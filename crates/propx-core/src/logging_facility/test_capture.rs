//! In-memory event capture for log assertions in tests
//!
//! [`init_test_capture`] installs a registry with a recording layer once per
//! process. Tests run concurrently and share it, so assertions should look
//! for events by a unique op name or by the model id they concern.

use crate::core_types::schema;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};
use tracing::field::{Field, Visit};
use tracing::{Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

/// One recorded event, every field rendered as text
#[derive(Clone, Debug)]
pub struct CapturedEvent {
    pub level: Level,
    pub op: Option<String>,
    pub event: Option<String>,
    pub fields: HashMap<String, String>,
}

impl CapturedEvent {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Whether this is the `event` phase of operation `op`
    pub fn is(&self, op: &str, event: &str) -> bool {
        self.op.as_deref() == Some(op) && self.event.as_deref() == Some(event)
    }

    /// Whether this is a validation issue reported against `model_id`
    pub fn is_issue_for(&self, model_id: &str) -> bool {
        self.event.as_deref() == Some(schema::EVENT_ISSUE)
            && self.field(schema::FIELD_MODEL_ID) == Some(model_id)
    }
}

#[derive(Default)]
struct FieldRecorder(HashMap<String, String>);

impl FieldRecorder {
    fn put(&mut self, field: &Field, value: String) {
        self.0.insert(field.name().to_string(), value);
    }
}

impl Visit for FieldRecorder {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.put(field, format!("{:?}", value));
    }

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
}

type EventLog = Arc<Mutex<Vec<CapturedEvent>>>;

/// Layer that appends every event to a shared log
pub struct CaptureLayer {
    log: EventLog,
}

impl<S> Layer<S> for CaptureLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let mut recorder = FieldRecorder::default();
        event.record(&mut recorder);
        let fields = recorder.0;

        self.log.lock().push(CapturedEvent {
            level: *event.metadata().level(),
            op: fields.get(schema::FIELD_OP).cloned(),
            event: fields.get(schema::FIELD_EVENT).cloned(),
            fields,
        });
    }
}

/// Read side of the capture log
#[derive(Clone)]
pub struct TestCapture {
    log: EventLog,
}

impl TestCapture {
    /// A layer and the handle that reads what it records
    pub fn new() -> (CaptureLayer, Self) {
        let log = EventLog::default();
        (CaptureLayer { log: log.clone() }, Self { log })
    }

    /// Snapshot of everything recorded so far
    pub fn events(&self) -> Vec<CapturedEvent> {
        self.log.lock().clone()
    }

    /// First event matching `predicate`
    pub fn find<F>(&self, predicate: F) -> Option<CapturedEvent>
    where
        F: Fn(&CapturedEvent) -> bool,
    {
        self.log.lock().iter().find(|e| predicate(e)).cloned()
    }

    pub fn count_events<F>(&self, predicate: F) -> usize
    where
        F: Fn(&CapturedEvent) -> bool,
    {
        self.log.lock().iter().filter(|e| predicate(e)).count()
    }

    /// Issue events logged for one model
    pub fn issues_for(&self, model_id: &str) -> Vec<CapturedEvent> {
        self.log
            .lock()
            .iter()
            .filter(|e| e.is_issue_for(model_id))
            .cloned()
            .collect()
    }

    /// # Panics
    ///
    /// Panics when no `event` phase of `op` was recorded.
    pub fn assert_event_exists(&self, op: &str, event: &str) {
        let total = self.log.lock().len();
        assert!(
            self.find(|e| e.is(op, event)).is_some(),
            "no {} event for op {} among {} captured events",
            event,
            op,
            total
        );
    }
}

static CAPTURE: OnceLock<TestCapture> = OnceLock::new();

/// Install the capture subscriber on first call and return its handle
///
/// ```
/// use propx_core::logging_facility::test_capture::init_test_capture;
/// use propx_core::log_op_start;
///
/// let capture = init_test_capture();
/// log_op_start!("resolve_class_doc");
/// capture.assert_event_exists("resolve_class_doc", "start");
/// ```
pub fn init_test_capture() -> TestCapture {
    CAPTURE
        .get_or_init(|| {
            let (layer, capture) = TestCapture::new();
            tracing_subscriber::registry().with(layer).init();
            capture
        })
        .clone()
}
