//! `tracing`-backed implementation of the [`Logger`] contract.

use std::fmt;
use std::panic::Location;
use std::time::{Duration, Instant};

use sea_orm::DbErr;
use tracing::{field, Dispatch};

use crate::config::LoggerConfig;
use crate::interface::{is_record_not_found, LogLevel, Logger};

/// Severity chosen for a traced statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceLevel {
    /// The statement failed.
    Error,
    /// The statement succeeded but exceeded the slow threshold.
    SlowQuery,
    /// Anything else.
    Trace,
}

/// A [`Logger`] that turns database log calls into structured `tracing` events.
///
/// Statements are reported at `TRACE` level, with failures escalated to
/// `ERROR` and slow statements to `WARN`. Each event carries the elapsed
/// time, the affected row count (when known) and the location of the code
/// that called the logger.
///
/// By default events go to whichever subscriber is current at the call site.
/// Use [`TracingLogger::with_dispatch`] to pin the logger to a specific one.
///
/// # Example
///
/// ```rust
/// use sea_orm_tracing_logger::{LoggerConfig, TracingLogger};
/// use std::time::Duration;
///
/// let logger = TracingLogger::new(
///     LoggerConfig::default().with_slow_threshold(Duration::from_millis(50)),
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct TracingLogger {
    dispatch: Option<Dispatch>,
    config: LoggerConfig,
}

impl TracingLogger {
    /// Create a logger emitting to the current default subscriber.
    pub fn new(config: LoggerConfig) -> Self {
        Self {
            dispatch: None,
            config,
        }
    }

    /// Create a logger emitting to the given subscriber.
    ///
    /// The dispatcher is a shared handle; it can keep serving other parts of
    /// the application.
    pub fn with_dispatch(dispatch: Dispatch, config: LoggerConfig) -> Self {
        Self {
            dispatch: Some(dispatch),
            config,
        }
    }

    /// Get the logger configuration.
    pub fn config(&self) -> &LoggerConfig {
        &self.config
    }

    /// Decide how a statement that ran for `elapsed` and ended with `err`
    /// is reported.
    ///
    /// Errors win over slowness, so a slow failing statement is an error.
    pub fn classify(&self, elapsed: Duration, err: Option<&DbErr>) -> TraceLevel {
        match err {
            Some(err)
                if !is_record_not_found(err) || !self.config.ignore_record_not_found_error =>
            {
                TraceLevel::Error
            }
            _ if self.config.slow_detection_enabled() && elapsed > self.config.slow_threshold => {
                TraceLevel::SlowQuery
            }
            _ => TraceLevel::Trace,
        }
    }

    fn emit(&self, event: impl FnOnce()) {
        match &self.dispatch {
            Some(dispatch) => tracing::dispatcher::with_default(dispatch, event),
            None => event(),
        }
    }
}

/// `SLOW SQL >= <threshold>`, with the threshold in `Duration`'s debug form
/// (`200ms`, `1.5s`, `60s`).
fn slow_sql_label(threshold: Duration) -> String {
    format!("SLOW SQL >= {threshold:?}")
}

impl Logger for TracingLogger {
    fn log_mode(&self, _level: LogLevel) -> &dyn Logger {
        self
    }

    fn info(&self, msg: &str, data: &[&dyn fmt::Debug]) {
        let caller = Location::caller();
        self.emit(|| tracing::info!(caller = %caller, data = ?data, "{}", msg));
    }

    fn warn(&self, msg: &str, data: &[&dyn fmt::Debug]) {
        let caller = Location::caller();
        self.emit(|| tracing::warn!(caller = %caller, data = ?data, "{}", msg));
    }

    fn error(&self, msg: &str, data: &[&dyn fmt::Debug]) {
        let caller = Location::caller();
        self.emit(|| tracing::error!(caller = %caller, data = ?data, "{}", msg));
    }

    fn trace(&self, begin: Instant, fc: &dyn Fn() -> (String, i64), err: Option<&DbErr>) {
        let elapsed = begin.elapsed();
        let (sql, rows) = fc();
        let caller = Location::caller();
        // -1 means the driver could not tell
        let rows = (rows != -1).then_some(rows);

        match self.classify(elapsed, err) {
            TraceLevel::Error => self.emit(|| {
                tracing::error!(
                    caller = %caller,
                    elapsed = ?elapsed,
                    rows,
                    error = err.map(field::display),
                    "{}",
                    sql
                )
            }),
            TraceLevel::SlowQuery => {
                let slow_sql = slow_sql_label(self.config.slow_threshold);
                self.emit(|| {
                    tracing::warn!(
                        caller = %caller,
                        elapsed = ?elapsed,
                        slow_sql = %slow_sql,
                        rows,
                        "{}",
                        sql
                    )
                })
            }
            TraceLevel::Trace => self.emit(|| {
                tracing::trace!(
                    caller = %caller,
                    elapsed = ?elapsed,
                    rows,
                    "{}",
                    sql
                )
            }),
        }
    }
}
