//! A tracing layer that keeps closed spans in memory.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::span::{Attributes, Id, Record};
use tracing::{Subscriber, field};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;

/// A closed span with its recorded fields.
#[derive(Debug, Clone, Serialize)]
pub struct RecordedSpan {
    pub name: String,
    /// Name of the enclosing span, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    pub fields: BTreeMap<String, serde_json::Value>,
    pub duration: Duration,
}

impl RecordedSpan {
    /// A field rendered as a string, if present.
    pub fn field(&self, name: &str) -> Option<String> {
        self.fields.get(name).map(|value| match value {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }
}

/// Shared store of closed spans, in closing order.
///
/// ```rust,ignore
/// let recorder = SpanRecorder::new();
/// let _guard = tracing::subscriber::set_default(recorder.subscriber());
/// run_something().await;
/// assert!(recorder.spans_named("graph.node").len() == 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SpanRecorder {
    spans: Arc<RwLock<Vec<RecordedSpan>>>,
}

impl SpanRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A layer feeding this recorder.
    pub fn layer(&self) -> SpanRecorderLayer {
        SpanRecorderLayer { recorder: self.clone() }
    }

    /// A standalone subscriber that records every span.
    pub fn subscriber(&self) -> impl Subscriber + Send + Sync + 'static {
        tracing_subscriber::registry().with(self.layer())
    }

    /// Every closed span so far.
    pub fn spans(&self) -> Vec<RecordedSpan> {
        self.spans.read().map(|spans| spans.clone()).unwrap_or_default()
    }

    /// Closed spans called `name`.
    pub fn spans_named(&self, name: &str) -> Vec<RecordedSpan> {
        self.spans().into_iter().filter(|span| span.name == name).collect()
    }

    pub fn clear(&self) {
        if let Ok(mut spans) = self.spans.write() {
            spans.clear();
        }
    }

    fn push(&self, span: RecordedSpan) {
        if let Ok(mut spans) = self.spans.write() {
            spans.push(span);
        }
    }
}

/// The [`Layer`] half of a [`SpanRecorder`].
pub struct SpanRecorderLayer {
    recorder: SpanRecorder,
}

struct SpanFields(BTreeMap<String, serde_json::Value>);

impl<S> Layer<S> for SpanRecorderLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else { return };
        let mut visitor = JsonVisitor::default();
        attrs.record(&mut visitor);

        let mut extensions = span.extensions_mut();
        extensions.insert(Instant::now());
        extensions.insert(SpanFields(visitor.0));
    }

    fn on_record(&self, id: &Id, values: &Record<'_>, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else { return };
        let mut extensions = span.extensions_mut();
        if let Some(fields) = extensions.get_mut::<SpanFields>() {
            let mut visitor = JsonVisitor::default();
            values.record(&mut visitor);
            fields.0.extend(visitor.0);
        }
    }

    fn on_close(&self, id: Id, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(&id) else { return };
        let extensions = span.extensions();
        let duration = extensions.get::<Instant>().map(Instant::elapsed).unwrap_or_default();
        let fields = extensions.get::<SpanFields>().map(|f| f.0.clone()).unwrap_or_default();

        self.recorder.push(RecordedSpan {
            name: span.metadata().name().to_string(),
            parent: span.parent().map(|p| p.metadata().name().to_string()),
            fields,
            duration,
        });
    }
}

#[derive(Default)]
struct JsonVisitor(BTreeMap<String, serde_json::Value>);

impl field::Visit for JsonVisitor {
    fn record_debug(&mut self, field: &field::Field, value: &dyn std::fmt::Debug) {
        self.0.insert(field.name().to_string(), serde_json::Value::String(format!("{value:?}")));
    }

    fn record_str(&mut self, field: &field::Field, value: &str) {
        self.0.insert(field.name().to_string(), serde_json::Value::String(value.to_string()));
    }

    fn record_bool(&mut self, field: &field::Field, value: bool) {
        self.0.insert(field.name().to_string(), serde_json::Value::Bool(value));
    }

    fn record_i64(&mut self, field: &field::Field, value: i64) {
        self.0.insert(field.name().to_string(), serde_json::json!(value));
    }

    fn record_u64(&mut self, field: &field::Field, value: u64) {
        self.0.insert(field.name().to_string(), serde_json::json!(value));
    }
}
