//! The pluggable logging contract used by [`LoggedConnection`](crate::LoggedConnection).

use std::fmt;
use std::time::Instant;

use sea_orm::DbErr;

/// Verbosity requested by the host for a logger.
///
/// Filtering itself is left to the installed `tracing` subscriber, so
/// implementations are free to ignore it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    Silent = 1,
    Error,
    Warn,
    Info,
}

/// Logging contract for database operations.
///
/// Every method is fire and forget. The reporting methods are annotated with
/// `#[track_caller]`, so an implementation calling
/// [`std::panic::Location::caller`] sees the code that invoked the logger,
/// however many forwarding layers sit in between.
pub trait Logger: Send + Sync {
    /// Return the logger to use at the given level.
    fn log_mode(&self, level: LogLevel) -> &dyn Logger;

    /// Report an informational message with arbitrary attached data.
    #[track_caller]
    fn info(&self, msg: &str, data: &[&dyn fmt::Debug]);

    /// Report a warning with arbitrary attached data.
    #[track_caller]
    fn warn(&self, msg: &str, data: &[&dyn fmt::Debug]);

    /// Report an error with arbitrary attached data.
    #[track_caller]
    fn error(&self, msg: &str, data: &[&dyn fmt::Debug]);

    /// Report a finished statement.
    ///
    /// `fc` lazily renders the SQL text and the affected row count, `-1`
    /// meaning the count is unknown. Implementations call it exactly once.
    #[track_caller]
    fn trace(&self, begin: Instant, fc: &dyn Fn() -> (String, i64), err: Option<&DbErr>);
}

/// Whether `err` signals a lookup that found nothing.
pub fn is_record_not_found(err: &DbErr) -> bool {
    matches!(err, DbErr::RecordNotFound(_))
}
