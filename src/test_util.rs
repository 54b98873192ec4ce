//! A subscriber layer that records events and spans for assertions.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Id, Record};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::Layer;

#[derive(Debug, Clone)]
pub(crate) struct Recorded {
    pub name: String,
    pub target: String,
    pub level: Level,
    pub fields: BTreeMap<String, String>,
}

impl Recorded {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

#[derive(Debug, Default)]
pub(crate) struct Captured {
    pub events: Vec<Recorded>,
    pub spans: Vec<Recorded>,
}

#[derive(Clone, Default)]
pub(crate) struct Capture(Arc<Mutex<Captured>>);

struct SpanIndex(usize);

struct FieldVisitor<'a>(&'a mut BTreeMap<String, String>);

impl Visit for FieldVisitor<'_> {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.0.insert(field.name().to_string(), format!("{value:?}"));
    }
}

impl<S> Layer<S> for Capture
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        let meta = attrs.metadata();
        let mut fields = BTreeMap::new();
        attrs.record(&mut FieldVisitor(&mut fields));

        let mut captured = self.0.lock().unwrap();
        captured.spans.push(Recorded {
            name: meta.name().to_string(),
            target: meta.target().to_string(),
            level: *meta.level(),
            fields,
        });
        let index = captured.spans.len() - 1;

        if let Some(span) = ctx.span(id) {
            span.extensions_mut().insert(SpanIndex(index));
        }
    }

    fn on_record(&self, id: &Id, values: &Record<'_>, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else { return };
        let extensions = span.extensions();
        let Some(SpanIndex(index)) = extensions.get::<SpanIndex>() else {
            return;
        };

        let mut captured = self.0.lock().unwrap();
        values.record(&mut FieldVisitor(&mut captured.spans[*index].fields));
    }

    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        let mut fields = BTreeMap::new();
        event.record(&mut FieldVisitor(&mut fields));

        self.0.lock().unwrap().events.push(Recorded {
            name: meta.name().to_string(),
            target: meta.target().to_string(),
            level: *meta.level(),
            fields,
        });
    }
}

/// Run `f` with a capturing subscriber installed on this thread.
pub(crate) fn capture<F: FnOnce()>(f: F) -> Captured {
    let capture = Capture::default();
    let subscriber = tracing_subscriber::registry().with(capture.clone());
    tracing::subscriber::with_default(subscriber, f);

    let out = std::mem::take(&mut *capture.0.lock().unwrap());
    out
}
