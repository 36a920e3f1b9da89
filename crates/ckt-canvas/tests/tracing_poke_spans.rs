#![forbid(unsafe_code)]

//! Tracing contract for poke dispatch.
//!
//! Every dispatch opens a `poke.dispatch` span carrying the event kind, the
//! target, the local coordinates and the outcome. Transaction and rejection
//! events nest under it.
//!
//! Run:
//!   cargo test -p ckt-canvas --test tracing_poke_spans

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use ckt_canvas::{LayoutCanvas, LayoutCanvasModel};
use ckt_core::{Location, PointerEvent};
use ckt_library::{LOCK_PORT, Label, ToggleSwitch};
use ckt_model::{Component, ComponentId, LayoutState, SimulationId, SimulationState, Value};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;

// ============================================================================
// Capture Layer
// ============================================================================

#[derive(Debug, Clone)]
struct CapturedSpan {
    name: String,
    fields: HashMap<String, String>,
}

#[derive(Debug, Clone)]
struct CapturedEvent {
    level: tracing::Level,
    target: String,
    message: String,
    parent_span_name: Option<String>,
}

struct SpanCapture {
    spans: Arc<Mutex<Vec<CapturedSpan>>>,
    events: Arc<Mutex<Vec<CapturedEvent>>>,
    span_index: Arc<Mutex<HashMap<u64, usize>>>,
}

struct CaptureHandle {
    spans: Arc<Mutex<Vec<CapturedSpan>>>,
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl CaptureHandle {
    fn spans_named(&self, name: &str) -> Vec<CapturedSpan> {
        self.spans
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.name == name)
            .cloned()
            .collect()
    }

    fn events(&self) -> Vec<CapturedEvent> {
        self.events.lock().unwrap().clone()
    }
}

struct FieldVisitor(Vec<(String, String)>);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.push((field.name().to_string(), format!("{value:?}")));
    }

    fn record_i64(&mut self, field: &tracing::field::Field, value: i64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
}

impl<S> tracing_subscriber::Layer<S> for SpanCapture
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(
        &self,
        attrs: &tracing::span::Attributes<'_>,
        id: &tracing::span::Id,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut visitor = FieldVisitor(Vec::new());
        attrs.record(&mut visitor);
        let mut fields: HashMap<String, String> = visitor.0.into_iter().collect();
        for field in attrs.metadata().fields() {
            fields.entry(field.name().to_string()).or_default();
        }

        let mut spans = self.spans.lock().unwrap();
        let idx = spans.len();
        spans.push(CapturedSpan {
            name: attrs.metadata().name().to_string(),
            fields,
        });
        self.span_index.lock().unwrap().insert(id.into_u64(), idx);
    }

    fn on_record(
        &self,
        id: &tracing::span::Id,
        values: &tracing::span::Record<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut visitor = FieldVisitor(Vec::new());
        values.record(&mut visitor);

        let index = self.span_index.lock().unwrap();
        if let Some(&idx) = index.get(&id.into_u64()) {
            let mut spans = self.spans.lock().unwrap();
            if let Some(span) = spans.get_mut(idx) {
                span.fields.extend(visitor.0);
            }
        }
    }

    fn on_event(&self, event: &tracing::Event<'_>, ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut visitor = FieldVisitor(Vec::new());
        event.record(&mut visitor);
        let message = visitor
            .0
            .iter()
            .find(|(k, _)| k == "message")
            .map(|(_, v)| v.clone())
            .unwrap_or_default();
        let parent_span_name = ctx
            .current_span()
            .id()
            .and_then(|id| ctx.span(id))
            .map(|span_ref| span_ref.name().to_string());

        self.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            target: event.metadata().target().to_string(),
            message,
            parent_span_name,
        });
    }
}

fn with_captured_spans<F>(f: F) -> CaptureHandle
where
    F: FnOnce(),
{
    let spans = Arc::new(Mutex::new(Vec::new()));
    let events = Arc::new(Mutex::new(Vec::new()));
    let layer = SpanCapture {
        spans: spans.clone(),
        events: events.clone(),
        span_index: Arc::new(Mutex::new(HashMap::new())),
    };
    let subscriber = tracing_subscriber::registry()
        .with(tracing_subscriber::filter::LevelFilter::TRACE)
        .with(layer);
    tracing::subscriber::with_default(subscriber, f);
    CaptureHandle { spans, events }
}

fn canvas_with(component: Arc<dyn Component>, at: Location, sim: SimulationState) -> LayoutCanvas {
    let mut layout = LayoutState::new();
    layout.add(component, at);
    LayoutCanvas::new(LayoutCanvasModel::new(
        layout.into_model(),
        sim.into_model(),
    ))
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn dispatch_span_carries_required_fields() {
    let mut canvas = canvas_with(
        Arc::new(ToggleSwitch::new()),
        Location::new(10, 20),
        SimulationState::new(SimulationId::new(1)),
    );
    let handle = with_captured_spans(|| {
        canvas.pointer_down(&PointerEvent::new(15, 28));
    });

    let spans = handle.spans_named("poke.dispatch");
    assert_eq!(spans.len(), 1);
    let fields = &spans[0].fields;
    assert_eq!(fields["kind"], "start");
    assert_eq!(fields["component"], "component#1");
    assert_eq!(fields["local_x"], "5");
    assert_eq!(fields["local_y"], "8");
    assert_eq!(fields["outcome"], "accepted");

    let committed = handle.events().into_iter().any(|e| {
        e.target == "ckt.txn"
            && e.message == "simulation effect committed"
            && e.parent_span_name.as_deref() == Some("poke.dispatch")
    });
    assert!(committed, "effect commit should be logged inside the dispatch span");
}

#[test]
fn reject_after_commit_warns() {
    let mut sim = SimulationState::new(SimulationId::new(1));
    sim.instance_mut(ComponentId::new(1))
        .set_port(LOCK_PORT, Value::HIGH);
    let mut canvas = canvas_with(Arc::new(ToggleSwitch::new()), Location::ORIGIN, sim);

    let handle = with_captured_spans(|| {
        canvas.pointer_down(&PointerEvent::new(3, 3));
    });

    let spans = handle.spans_named("poke.dispatch");
    assert_eq!(spans[0].fields["outcome"], "rejected");
    let warned = handle.events().into_iter().any(|e| {
        e.level == tracing::Level::WARN
            && e.target == "ckt.poke"
            && e.parent_span_name.as_deref() == Some("poke.dispatch")
    });
    assert!(warned);
}

#[test]
fn non_pokeable_target_reports_no_target() {
    let mut canvas = canvas_with(
        Arc::new(Label::new("gnd")),
        Location::ORIGIN,
        SimulationState::new(SimulationId::new(1)),
    );
    let handle = with_captured_spans(|| {
        canvas.pointer_down(&PointerEvent::new(2, 2));
    });

    let spans = handle.spans_named("poke.dispatch");
    assert_eq!(spans.len(), 1);
    assert_eq!(spans[0].fields["outcome"], "no_target");
    assert_eq!(spans[0].fields["local_x"], "");

    let opened_txn = handle.events().into_iter().any(|e| {
        e.target == "ckt.txn" && e.parent_span_name.as_deref() == Some("poke.dispatch")
    });
    assert!(!opened_txn);
}
