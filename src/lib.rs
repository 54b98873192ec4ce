//! # instrumented-sql
//!
//! Options for logging and tracing the operations of an instrumented SQL driver.
//!
//! A driver wrapper intercepts connection, statement, transaction and rows
//! calls. This crate decides what the wrapper does with each of them: which
//! backends receive events, which operations are skipped, whether query
//! arguments are attached, and under which field names.
//!
//! ## Features
//!
//! - **Functional Options**: Configuration is an ordered list of [`Opt`]s
//! - **Pluggable Backends**: Any [`Logger`] and [`Tracer`], or none at all
//! - **Selective Instrumentation**: Exclude noisy operations such as row iteration
//! - **Argument Redaction**: Keep bind parameters out of logs and traces
//! - **Custom Labels**: Rename the `query` and `args` fields
//!
//! ## Quick Start
//!
//! ```rust
//! use instrumented_sql::prelude::*;
//!
//! let options = Options::new([
//!     with_logger(TracingLogger::new()),
//!     with_tracer(TracingTracer::new()),
//!     with_ops_excluded([Op::RowsNext, Op::RowsClose]),
//!     with_omit_args(),
//!     with_query_label("db.statement"),
//! ]);
//!
//! assert!(options.should_instrument(Op::ConnQuery));
//! assert!(!options.should_instrument(Op::RowsNext));
//! ```
//!
//! ## Wrapper Contract
//!
//! On every intercepted call a wrapper:
//!
//! 1. Skips all logging and tracing when [`Options::has_op_excluded`] is true.
//! 2. Attaches query text under [`Options::query_label`].
//! 3. Attaches arguments under [`Options::args_label`], unless
//!    [`Options::omit_args`] is set. [`Options::query_fields`] does both.
//!
//! ## Presets
//!
//! | Preset | Logger | Tracer | Arguments | Excluded |
//! |--------|--------|--------|-----------|----------|
//! | [`Options::development`] | `TracingLogger` | `TracingTracer` | included | nothing |
//! | [`Options::production`] | none | `TracingTracer` | omitted | rows/result bookkeeping |

mod config;
mod logger;
mod op;
mod tracer;

#[cfg(test)]
mod test_util;

pub use config::{
    with_args_label, with_include_args, with_logger, with_omit_args, with_ops_excluded,
    with_query_label, with_tracer, Opt, Options,
};
pub use logger::{Field, Logger, NullLogger, TracingLogger, Value, DEFAULT_TARGET};
pub use op::Op;
pub use tracer::{NullTracer, Span, Tracer, TracingTracer};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        with_args_label, with_include_args, with_logger, with_omit_args, with_ops_excluded,
        with_query_label, with_tracer, Logger, Op, Opt, Options, Tracer, TracingLogger,
        TracingTracer,
    };
}
