//! # sea-orm-tracing-logger
//!
//! Structured logging for SeaORM database operations, built on `tracing`.
//!
//! The crate defines a small [`Logger`] contract for database log calls and
//! ships two implementations of it:
//!
//! - [`TracingLogger`] turns every call into a structured `tracing` event,
//!   escalating failed statements to `ERROR` and slow ones to `WARN`.
//! - [`Recorder`] keeps the most recent statement in memory instead of
//!   logging it, so tests and middleware can inspect what ran.
//!
//! [`LoggedConnection`] wires a logger into a SeaORM `DatabaseConnection`.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use std::time::Duration;
//! use sea_orm::Database;
//! use sea_orm_tracing_logger::{LoggerConfig, LoggerExt, TracingLogger};
//!
//! let logger = TracingLogger::new(
//!     LoggerConfig::default()
//!         .with_slow_threshold(Duration::from_millis(100))
//!         .with_ignore_record_not_found_error(true),
//! );
//!
//! let db = Database::connect("postgres://localhost/mydb").await?
//!     .with_logger(Arc::new(logger));
//!
//! let users = Users::find().all(&db).await?;
//! ```
//!
//! ## Event Fields
//!
//! | Field | Description |
//! |-------|-------------|
//! | message | Rendered SQL statement |
//! | `elapsed` | Statement duration |
//! | `rows` | Rows returned/affected, omitted when unknown |
//! | `slow_sql` | `SLOW SQL >= <threshold>` on slow statements |
//! | `error` | Error details on failed statements |
//! | `caller` | Source location that invoked the logger |
//!
//! ## Levels
//!
//! | Level | When |
//! |-------|------|
//! | `ERROR` | The statement failed (record-not-found optionally excluded) |
//! | `WARN` | The statement ran longer than the slow threshold |
//! | `TRACE` | Everything else |

mod config;
mod connection;
mod error;
mod interface;
mod logger;
mod parser;
mod recorder;

#[cfg(test)]
mod capture;

pub use config::LoggerConfig;
pub use connection::{LoggedConnection, LoggerExt};
pub use error::RecordedError;
pub use interface::{is_record_not_found, LogLevel, Logger};
pub use logger::{TraceLevel, TracingLogger};
pub use parser::{ParsedSql, SqlOperation};
pub use recorder::{Recorder, TraceRecord};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{LoggedConnection, Logger, LoggerConfig, LoggerExt, Recorder, TracingLogger};
}
