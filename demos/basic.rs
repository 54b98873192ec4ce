//! Basic example showing how to configure instrumented-sql.
//!
//! Run with: cargo run --example basic

use instrumented_sql::prelude::*;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,instrumented_sql=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Option 1: No backends, instrumentation is a no-op
    let options = Options::new([]);
    tracing::info!(noop = options.is_noop(), "Default options");

    // Option 2: Explicit options, applied in order
    let options = Options::new([
        with_logger(TracingLogger::new()),
        with_tracer(TracingTracer::new()),
        with_ops_excluded([Op::RowsNext, Op::RowsClose]),
        with_query_label("db.statement"),
        with_args_label("db.args"),
    ]);

    // Option 3: Production preset with an override on top
    // let options = Options::production([with_query_label("db.statement")]);

    // Option 4: Development preset (logs everything, including arguments)
    // let options = Options::development([]);

    for op in Op::ALL {
        tracing::info!(
            op = %op,
            instrumented = options.should_instrument(op),
            "Operation"
        );
    }

    tracing::info!(
        query_label = options.query_label(),
        args_label = options.args_label(),
        omit_args = options.omit_args(),
        "Field labels"
    );
}
