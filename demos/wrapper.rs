//! Shows how a driver wrapper consumes resolved options.
//!
//! The "driver" here is a stand-in that only echoes statements, so the
//! example focuses on the decisions the wrapper makes per call.
//!
//! Run with: cargo run --example wrapper

use std::sync::Arc;

use instrumented_sql::prelude::*;
use instrumented_sql::{Field, Value};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

struct EchoDriver;

impl EchoDriver {
    fn exec(&self, query: &str, args: &[String]) -> Result<u64, String> {
        if query.trim().is_empty() {
            return Err("empty statement".into());
        }
        Ok(args.len() as u64)
    }

    fn begin(&self) -> Result<u64, String> {
        Ok(0)
    }
}

/// A connection wrapper sharing one set of options with every call.
struct InstrumentedConn {
    inner: EchoDriver,
    options: Arc<Options>,
}

impl InstrumentedConn {
    fn exec(&self, query: &str, args: &[String]) -> Result<u64, String> {
        self.instrument(Op::ConnExec, query, args, || self.inner.exec(query, args))
    }

    fn begin(&self) -> Result<u64, String> {
        self.instrument(Op::TxBegin, "", &[], || self.inner.begin())
    }

    fn instrument<F>(&self, op: Op, query: &str, args: &[String], call: F) -> Result<u64, String>
    where
        F: FnOnce() -> Result<u64, String>,
    {
        if !self.options.should_instrument(op) {
            return call();
        }

        let mut fields = if op.carries_query() {
            self.options.query_fields(query, args)
        } else {
            Vec::new()
        };
        let mut span = self.options.tracer().map(|t| t.start_span(op.as_str()));

        let result = call();

        if let Ok(rows) = &result {
            fields.push(Field::new("rows_affected", Value::Int(*rows as i64)));
        }
        if let Some(logger) = self.options.logger() {
            logger.log(op.as_str(), &fields);
        }
        if let Some(span) = span.as_mut() {
            for field in &fields {
                span.set_field(field);
            }
            if let Err(e) = &result {
                span.set_error(e);
            }
        }
        if let Some(span) = span {
            span.finish();
        }

        result
    }
}

fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let conn = InstrumentedConn {
        inner: EchoDriver,
        options: Arc::new(Options::development([
            with_query_label("sql"),
            with_ops_excluded([Op::TxCommit]),
        ])),
    };

    let args = vec!["42".to_string(), "'alice'".to_string()];
    let result = conn.begin();
    tracing::info!(?result, "begin");
    let result = conn.exec("UPDATE users SET name = $2 WHERE id = $1", &args);
    tracing::info!(?result, "exec");
    let result = conn.exec("   ", &[]);
    tracing::info!(?result, "exec empty statement");

    // Same call with arguments redacted
    let conn = InstrumentedConn {
        inner: EchoDriver,
        options: Arc::new(Options::development([with_omit_args()])),
    };
    let result = conn.exec("UPDATE users SET name = $2 WHERE id = $1", &args);
    tracing::info!(?result, "exec with arguments omitted");
}
