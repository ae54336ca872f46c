//! Configuration for logger behavior.

use std::time::Duration;

/// Configuration options for [`TracingLogger`](crate::TracingLogger).
///
/// The configuration is copied into each logger and never mutated afterwards.
///
/// # Example
///
/// ```rust
/// use sea_orm_tracing_logger::LoggerConfig;
/// use std::time::Duration;
///
/// let config = LoggerConfig::default()
///     .with_slow_threshold(Duration::from_millis(100))
///     .with_ignore_record_not_found_error(true);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoggerConfig {
    /// Queries running longer than this are logged at WARN level.
    /// A zero duration disables slow-query detection.
    /// Default: 200ms
    pub slow_threshold: Duration,

    /// Whether `DbErr::RecordNotFound` should be logged as a normal trace
    /// instead of an error.
    /// Default: `false`
    pub ignore_record_not_found_error: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            slow_threshold: Duration::from_millis(200),
            ignore_record_not_found_error: false,
        }
    }
}

impl LoggerConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the threshold for slow query warnings.
    pub fn with_slow_threshold(mut self, threshold: Duration) -> Self {
        self.slow_threshold = threshold;
        self
    }

    /// Disable slow query warnings entirely.
    pub fn without_slow_threshold(self) -> Self {
        self.with_slow_threshold(Duration::ZERO)
    }

    /// Treat record-not-found errors as ordinary trace events.
    pub fn with_ignore_record_not_found_error(mut self, ignore: bool) -> Self {
        self.ignore_record_not_found_error = ignore;
        self
    }

    /// Whether slow-query detection is active.
    pub fn slow_detection_enabled(&self) -> bool {
        !self.slow_threshold.is_zero()
    }

    /// Create a development-friendly configuration with an aggressive slow threshold.
    pub fn development() -> Self {
        Self {
            slow_threshold: Duration::from_millis(100),
            ignore_record_not_found_error: false,
        }
    }

    /// Create a production configuration.
    ///
    /// Lookups that find nothing are routine in production, so they are not
    /// reported as errors.
    pub fn production() -> Self {
        Self {
            slow_threshold: Duration::from_secs(1),
            ignore_record_not_found_error: true,
        }
    }
}
