//! A [`Logger`] that captures the latest traced statement instead of emitting it.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use sea_orm::DbErr;

use crate::error::RecordedError;
use crate::interface::{LogLevel, Logger};

/// The statement most recently seen by a [`Recorder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceRecord {
    /// When the statement started.
    pub begin_at: Instant,
    /// Rendered SQL text.
    pub sql: String,
    /// Affected rows, `-1` when unknown.
    pub rows_affected: i64,
    /// Error the statement ended with, if any.
    pub err: Option<RecordedError>,
}

impl TraceRecord {
    fn starting_now() -> Self {
        Self {
            begin_at: Instant::now(),
            sql: String::new(),
            rows_affected: 0,
            err: None,
        }
    }
}

/// Wraps another [`Logger`] and records the last traced statement.
///
/// `trace` never reaches the wrapped logger: the statement, its row count and
/// its error are stored as-is, without any classification. `info`, `warn`
/// and `error` are forwarded unchanged.
///
/// Only the latest statement is kept. Take a [`Recorder::fresh`] copy per
/// unit of work (a request, a test case) so earlier statements do not leak
/// into it.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use std::time::Instant;
/// use sea_orm_tracing_logger::{Logger, Recorder, TracingLogger};
///
/// let recorder = Recorder::new(Arc::new(TracingLogger::default()));
/// recorder.trace(Instant::now(), &|| ("SELECT 1".to_string(), 1), None);
///
/// assert_eq!(recorder.sql(), "SELECT 1");
/// assert_eq!(recorder.rows_affected(), 1);
/// ```
pub struct Recorder {
    base: Arc<dyn Logger>,
    record: Mutex<TraceRecord>,
}

impl Recorder {
    /// Create a recorder in front of `base`.
    pub fn new(base: Arc<dyn Logger>) -> Self {
        Self {
            base,
            record: Mutex::new(TraceRecord::starting_now()),
        }
    }

    /// A new, empty recorder sharing this one's wrapped logger.
    pub fn fresh(&self) -> Self {
        Self::new(Arc::clone(&self.base))
    }

    /// The wrapped logger.
    pub fn base(&self) -> &Arc<dyn Logger> {
        &self.base
    }

    /// A copy of everything captured so far.
    pub fn record(&self) -> TraceRecord {
        self.lock().clone()
    }

    /// Start of the last statement, or creation time if none was traced.
    pub fn begin_at(&self) -> Instant {
        self.lock().begin_at
    }

    /// SQL of the last statement.
    pub fn sql(&self) -> String {
        self.lock().sql.clone()
    }

    /// Rows affected by the last statement, `-1` when unknown.
    pub fn rows_affected(&self) -> i64 {
        self.lock().rows_affected
    }

    /// Error of the last statement.
    pub fn err(&self) -> Option<RecordedError> {
        self.lock().err.clone()
    }

    fn lock(&self) -> MutexGuard<'_, TraceRecord> {
        // Writers replace the whole record, so a poisoned lock still holds a consistent one.
        self.record.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for Recorder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Recorder")
            .field("record", &*self.lock())
            .finish_non_exhaustive()
    }
}

impl Logger for Recorder {
    fn log_mode(&self, level: LogLevel) -> &dyn Logger {
        self.base.log_mode(level);
        self
    }

    fn info(&self, msg: &str, data: &[&dyn fmt::Debug]) {
        self.base.info(msg, data);
    }

    fn warn(&self, msg: &str, data: &[&dyn fmt::Debug]) {
        self.base.warn(msg, data);
    }

    fn error(&self, msg: &str, data: &[&dyn fmt::Debug]) {
        self.base.error(msg, data);
    }

    fn trace(&self, begin: Instant, fc: &dyn Fn() -> (String, i64), err: Option<&DbErr>) {
        let (sql, rows_affected) = fc();
        let record = TraceRecord {
            begin_at: begin,
            sql,
            rows_affected,
            err: err.map(RecordedError::from),
        };
        *self.lock() = record;
    }
}
