//! Tracer capability and its `tracing`-backed implementation.

use std::fmt;

use tracing::field;

use crate::logger::{Field, DEFAULT_TARGET};

/// Starts trace spans for driver operations.
pub trait Tracer: Send + Sync {
    /// Start a span named after the operation being traced.
    fn start_span(&self, name: &str) -> Box<dyn Span>;
}

/// A span in progress. Ended by [`Span::finish`].
pub trait Span: Send {
    /// Attach `value` under `key`. Later labels do not replace earlier ones.
    fn set_label(&mut self, key: &str, value: &str);

    /// Mark the span as failed with `err`.
    fn set_error(&mut self, err: &dyn fmt::Display);

    /// End the span, flushing anything collected while it was open.
    fn finish(self: Box<Self>);

    /// Attach a structured field as a label.
    fn set_field(&mut self, field: &Field<'_>) {
        self.set_label(field.key, &field.value.to_string());
    }
}

/// A tracer whose spans do nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullTracer;

impl Tracer for NullTracer {
    fn start_span(&self, _name: &str) -> Box<dyn Span> {
        Box::new(NullSpan)
    }
}

#[derive(Debug)]
struct NullSpan;

impl Span for NullSpan {
    fn set_label(&mut self, _key: &str, _value: &str) {}

    fn set_error(&mut self, _err: &dyn fmt::Display) {}

    fn finish(self: Box<Self>) {}
}

/// Opens a `tracing` span per operation under [`DEFAULT_TARGET`].
///
/// Spans are created under the current span context, so they nest beneath
/// whatever request span is active. Labels are collected while the span is
/// open and recorded as `db.labels` when it finishes.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingTracer;

impl TracingTracer {
    /// A tracer opening `db.sql` spans.
    pub fn new() -> Self {
        Self
    }
}

impl Tracer for TracingTracer {
    fn start_span(&self, name: &str) -> Box<dyn Span> {
        let span = tracing::info_span!(
            target: DEFAULT_TARGET,
            "db.sql",
            otel.name = %name,
            db.labels = field::Empty,
            otel.status_code = field::Empty,
            error.message = field::Empty,
        );

        Box::new(TracingSpan {
            span,
            labels: Vec::new(),
            failed: false,
        })
    }
}

#[derive(Debug)]
struct TracingSpan {
    span: tracing::Span,
    labels: Vec<(String, String)>,
    failed: bool,
}

impl TracingSpan {
    fn rendered_labels(&self) -> String {
        self.labels
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Span for TracingSpan {
    fn set_label(&mut self, key: &str, value: &str) {
        self.labels.push((key.to_string(), value.to_string()));
    }

    fn set_error(&mut self, err: &dyn fmt::Display) {
        self.failed = true;
        self.span.record("otel.status_code", "ERROR");
        self.span.record("error.message", err.to_string().as_str());
    }

    fn finish(self: Box<Self>) {
        if !self.labels.is_empty() {
            self.span.record("db.labels", self.rendered_labels().as_str());
        }
        if !self.failed {
            self.span.record("otel.status_code", "OK");
        }
    }
}
