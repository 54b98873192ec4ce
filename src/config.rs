//! Configuration for an instrumented driver.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use crate::logger::{Field, Logger, TracingLogger, Value, DEFAULT_TARGET};
use crate::op::Op;
use crate::tracer::{Tracer, TracingTracer};

const QUERY_LABEL: &str = "query";
const ARGS_LABEL: &str = "args";

/// Resolved instrumentation options.
///
/// Built once from an ordered list of [`Opt`]s and then only read. Share it
/// behind an `Arc` between every wrapped connection, statement and
/// transaction.
///
/// # Example
///
/// ```rust
/// use instrumented_sql::{with_ops_excluded, with_query_label, Options};
///
/// let options = Options::new([
///     with_query_label("sql"),
///     with_ops_excluded(["begin", "commit"]),
/// ]);
///
/// assert_eq!(options.query_label(), "sql");
/// assert_eq!(options.args_label(), "args");
/// assert!(options.has_op_excluded("begin"));
/// assert!(!options.has_op_excluded("query"));
/// ```
#[derive(Clone, Default)]
pub struct Options {
    logger: Option<Arc<dyn Logger>>,
    tracer: Option<Arc<dyn Tracer>>,
    ops_excluded: Option<HashSet<String>>,
    omit_args: bool,
    label_mapper: Option<HashMap<String, String>>,
}

/// A single configuration change, applied by [`Options::new`] in order.
pub struct Opt(Box<dyn FnOnce(&mut Options) + Send + Sync>);

impl Opt {
    /// Wrap an arbitrary mutation as an option.
    pub fn new<F>(f: F) -> Self
    where
        F: FnOnce(&mut Options) + Send + Sync + 'static,
    {
        Self(Box::new(f))
    }

    fn apply_to(self, options: &mut Options) {
        (self.0)(options)
    }
}

impl fmt::Debug for Opt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Opt")
    }
}

/// Use `logger` for log events, replacing any previous logger.
pub fn with_logger<L>(logger: L) -> Opt
where
    L: Logger + 'static,
{
    let logger: Arc<dyn Logger> = Arc::new(logger);
    Opt::new(move |o| o.logger = Some(logger))
}

/// Use `tracer` for spans, replacing any previous tracer.
pub fn with_tracer<T>(tracer: T) -> Opt
where
    T: Tracer + 'static,
{
    let tracer: Arc<dyn Tracer> = Arc::new(tracer);
    Opt::new(move |o| o.tracer = Some(tracer))
}

/// Skip logging and tracing for the named operations.
///
/// Each call replaces the whole excluded set; exclusions from an earlier
/// `with_ops_excluded` are dropped. Pass every operation in one call.
pub fn with_ops_excluded<I, S>(ops: I) -> Opt
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let ops: HashSet<String> = ops.into_iter().map(Into::into).collect();
    Opt::new(move |o| o.ops_excluded = Some(ops))
}

/// Never attach query arguments to log events or spans.
pub fn with_omit_args() -> Opt {
    Opt::new(|o| o.omit_args = true)
}

/// Attach query arguments to log events and spans.
///
/// This is the default; use it to undo an earlier [`with_omit_args`].
pub fn with_include_args() -> Opt {
    Opt::new(|o| o.omit_args = false)
}

/// Emit query text under `label` instead of `"query"`.
pub fn with_query_label(label: impl Into<String>) -> Opt {
    let label = label.into();
    Opt::new(move |o| o.set_label(QUERY_LABEL, label))
}

/// Emit query arguments under `label` instead of `"args"`.
pub fn with_args_label(label: impl Into<String>) -> Opt {
    let label = label.into();
    Opt::new(move |o| o.set_label(ARGS_LABEL, label))
}

impl Options {
    /// Fold `opts` over the default configuration, in order.
    pub fn new<I>(opts: I) -> Self
    where
        I: IntoIterator<Item = Opt>,
    {
        let options = Self::default().apply_all(opts);

        tracing::debug!(
            target: DEFAULT_TARGET,
            logger = options.logger.is_some(),
            tracer = options.tracer.is_some(),
            ops_excluded = options.ops_excluded.as_ref().map_or(0, HashSet::len),
            omit_args = options.omit_args,
            query_label = options.query_label(),
            args_label = options.args_label(),
            "Instrumentation options resolved"
        );

        options
    }

    /// Apply a single option.
    pub fn apply(mut self, opt: Opt) -> Self {
        opt.apply_to(&mut self);
        self
    }

    fn apply_all<I>(self, opts: I) -> Self
    where
        I: IntoIterator<Item = Opt>,
    {
        opts.into_iter().fold(self, Self::apply)
    }

    /// Log everything through `tracing`: events and spans, with arguments.
    ///
    /// **Warning**: arguments often carry user data. Do not use in production.
    pub fn development<I>(opts: I) -> Self
    where
        I: IntoIterator<Item = Opt>,
    {
        let base = [
            with_logger(TracingLogger::new()),
            with_tracer(TracingTracer::new()),
            with_include_args(),
        ];
        Self::new(base.into_iter().chain(opts))
    }

    /// Spans only, arguments omitted, per-row and result bookkeeping excluded.
    pub fn production<I>(opts: I) -> Self
    where
        I: IntoIterator<Item = Opt>,
    {
        let base = [
            with_tracer(TracingTracer::new()),
            with_omit_args(),
            with_ops_excluded([Op::RowsNext, Op::ResLastInsertId, Op::ResRowsAffected]),
        ];
        Self::new(base.into_iter().chain(opts))
    }

    fn set_label(&mut self, key: &str, label: String) {
        self.label_mapper
            .get_or_insert_with(HashMap::new)
            .insert(key.to_string(), label);
    }

    fn label(&self, key: &'static str) -> &str {
        self.label_mapper
            .as_ref()
            .and_then(|m| m.get(key))
            .map_or(key, String::as_str)
    }

    /// Field name for query text.
    pub fn query_label(&self) -> &str {
        self.label(QUERY_LABEL)
    }

    /// Field name for query arguments.
    pub fn args_label(&self) -> &str {
        self.label(ARGS_LABEL)
    }

    /// Whether `op` was excluded from instrumentation.
    pub fn has_op_excluded(&self, op: impl AsRef<str>) -> bool {
        self.ops_excluded
            .as_ref()
            .is_some_and(|ops| ops.contains(op.as_ref()))
    }

    /// Whether argument values are kept out of log events and spans.
    pub fn omit_args(&self) -> bool {
        self.omit_args
    }

    /// The configured logger, if any.
    pub fn logger(&self) -> Option<&dyn Logger> {
        self.logger.as_deref()
    }

    /// The configured tracer, if any.
    pub fn tracer(&self) -> Option<&dyn Tracer> {
        self.tracer.as_deref()
    }

    /// True when neither a logger nor a tracer is configured.
    pub fn is_noop(&self) -> bool {
        self.logger.is_none() && self.tracer.is_none()
    }

    /// Whether a wrapper should log or trace `op` at all.
    pub fn should_instrument(&self, op: impl AsRef<str>) -> bool {
        !self.is_noop() && !self.has_op_excluded(op)
    }

    /// The fields to attach for a query-carrying call.
    ///
    /// Arguments are left out entirely when arguments are omitted.
    pub fn query_fields<'a>(&'a self, query: &'a str, args: &'a [String]) -> Vec<Field<'a>> {
        let mut fields = vec![Field::new(self.query_label(), Value::Str(query))];
        if !self.omit_args {
            fields.push(Field::new(self.args_label(), Value::Args(args)));
        }
        fields
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("logger", &self.logger.is_some())
            .field("tracer", &self.tracer.is_some())
            .field("ops_excluded", &self.ops_excluded)
            .field("omit_args", &self.omit_args)
            .field("label_mapper", &self.label_mapper)
            .finish()
    }
}
