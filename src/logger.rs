//! Logger capability and the structured event model shared with tracers.

use std::fmt;

use tracing::Level;

/// `tracing` target for every event and span emitted by the built-in backends.
///
/// `tracing` fixes targets at compile time, so filter on this one.
pub const DEFAULT_TARGET: &str = "instrumented_sql";

/// A value attached to a log event or span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Value<'a> {
    Str(&'a str),
    /// Rendered query arguments, in bind order.
    Args(&'a [String]),
    Int(i64),
}

impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => f.write_str(s),
            Value::Args(args) => {
                f.write_str("[")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    f.write_str(arg)?;
                }
                f.write_str("]")
            }
            Value::Int(n) => write!(f, "{n}"),
        }
    }
}

/// A labeled value. The key is whatever name the wrapper resolved, which is
/// why it is a runtime string rather than a static `tracing` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field<'a> {
    pub key: &'a str,
    pub value: Value<'a>,
}

impl<'a> Field<'a> {
    /// Label `value` with `key`.
    pub fn new(key: &'a str, value: Value<'a>) -> Self {
        Self { key, value }
    }
}

/// Renders a field list as `key=value` pairs separated by spaces.
pub(crate) struct DisplayFields<'a, 'b>(pub(crate) &'b [Field<'a>]);

impl fmt::Display for DisplayFields<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, field) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}={}", field.key, field.value)?;
        }
        Ok(())
    }
}

/// Receives structured log events from an instrumented driver.
///
/// Implementations must not panic; the wrapper ignores whatever happens
/// inside `log`.
pub trait Logger: Send + Sync {
    fn log(&self, msg: &str, fields: &[Field<'_>]);
}

/// A logger that discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullLogger;

impl Logger for NullLogger {
    fn log(&self, _msg: &str, _fields: &[Field<'_>]) {}
}

/// Forwards events to the `tracing` ecosystem under [`DEFAULT_TARGET`].
///
/// Fields are rendered into a single `fields` value because their names are
/// only known at runtime.
///
/// # Example
///
/// ```rust
/// use instrumented_sql::TracingLogger;
/// use tracing::Level;
///
/// let logger = TracingLogger::new().with_level(Level::INFO);
/// assert_eq!(logger.level(), Level::INFO);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TracingLogger {
    level: Level,
}

impl Default for TracingLogger {
    fn default() -> Self {
        Self {
            level: Level::DEBUG,
        }
    }
}

impl TracingLogger {
    /// A logger emitting at DEBUG.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the level events are emitted at.
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// The level events are emitted at.
    pub fn level(&self) -> Level {
        self.level
    }
}

impl Logger for TracingLogger {
    fn log(&self, msg: &str, fields: &[Field<'_>]) {
        let fields = DisplayFields(fields);
        // `event!` needs a constant level.
        match self.level {
            Level::ERROR => tracing::error!(target: DEFAULT_TARGET, fields = %fields, "{msg}"),
            Level::WARN => tracing::warn!(target: DEFAULT_TARGET, fields = %fields, "{msg}"),
            Level::INFO => tracing::info!(target: DEFAULT_TARGET, fields = %fields, "{msg}"),
            Level::DEBUG => tracing::debug!(target: DEFAULT_TARGET, fields = %fields, "{msg}"),
            _ => tracing::trace!(target: DEFAULT_TARGET, fields = %fields, "{msg}"),
        }
    }
}
