//! Database connection wrapper that reports every statement to a [`Logger`].

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use sea_orm::{
    ConnectionTrait, DatabaseConnection, DbBackend, DbErr, ExecResult, QueryResult, Statement,
};
use tracing::{Instrument, Span};

use crate::interface::Logger;
use crate::logger::TracingLogger;
use crate::parser::ParsedSql;

/// A wrapper around SeaORM's `DatabaseConnection` that logs each statement.
///
/// This wrapper implements `ConnectionTrait`, so it can be passed anywhere a
/// connection is expected. Every statement runs inside a `db.query` span and
/// is then handed to the configured [`Logger`] through
/// [`Logger::trace`]. The SQL text is only rendered if the logger asks for
/// it.
///
/// # Example
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use sea_orm::Database;
/// use sea_orm_tracing_logger::{LoggedConnection, LoggerConfig, TracingLogger};
///
/// let db = Database::connect("postgres://localhost/mydb").await?;
/// let logger = TracingLogger::new(LoggerConfig::production());
/// let logged = LoggedConnection::new(db, Arc::new(logger));
///
/// let users = Users::find().all(&logged).await?;
/// ```
pub struct LoggedConnection {
    inner: DatabaseConnection,
    logger: Arc<dyn Logger>,
}

impl LoggedConnection {
    /// Create a logged connection reporting to `logger`.
    pub fn new(connection: DatabaseConnection, logger: Arc<dyn Logger>) -> Self {
        Self {
            inner: connection,
            logger,
        }
    }

    /// Create a logged connection with a default [`TracingLogger`].
    pub fn wrap(connection: DatabaseConnection) -> Self {
        Self::new(connection, Arc::new(TracingLogger::default()))
    }

    /// Get a reference to the underlying `DatabaseConnection`.
    pub fn inner(&self) -> &DatabaseConnection {
        &self.inner
    }

    /// Get the logger statements are reported to.
    pub fn logger(&self) -> &Arc<dyn Logger> {
        &self.logger
    }

    /// Consume the wrapper and return the inner `DatabaseConnection`.
    pub fn into_inner(self) -> DatabaseConnection {
        self.inner
    }

    fn db_system(&self) -> &'static str {
        match self.inner.get_database_backend() {
            DbBackend::Postgres => "postgresql",
            DbBackend::MySql => "mysql",
            DbBackend::Sqlite => "sqlite",
        }
    }

    fn create_span(&self, sql: &str) -> Span {
        let parsed = ParsedSql::parse(sql);

        tracing::info_span!(
            "db.query",
            otel.name = %parsed.span_name(),
            db.system = %self.db_system(),
            db.operation = %parsed.operation,
            db.sql.table = parsed.table.as_deref(),
        )
    }

    /// Hand a finished statement to the logger, inside its span.
    #[track_caller]
    fn report(
        &self,
        span: &Span,
        begin: Instant,
        fc: &dyn Fn() -> (String, i64),
        err: Option<&DbErr>,
    ) {
        let _entered = span.enter();
        self.logger.trace(begin, fc, err);
    }
}

fn exec_rows(result: &Result<ExecResult, DbErr>) -> i64 {
    result
        .as_ref()
        .map_or(-1, |r| i64::try_from(r.rows_affected()).unwrap_or(i64::MAX))
}

impl fmt::Debug for LoggedConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggedConnection")
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}

impl From<DatabaseConnection> for LoggedConnection {
    fn from(connection: DatabaseConnection) -> Self {
        Self::wrap(connection)
    }
}

impl AsRef<DatabaseConnection> for LoggedConnection {
    fn as_ref(&self) -> &DatabaseConnection {
        &self.inner
    }
}

#[async_trait]
impl ConnectionTrait for LoggedConnection {
    fn get_database_backend(&self) -> DbBackend {
        self.inner.get_database_backend()
    }

    async fn execute(&self, stmt: Statement) -> Result<ExecResult, DbErr> {
        let span = self.create_span(&stmt.sql);
        let rendered = stmt.clone();
        let begin = Instant::now();

        let result = self.inner.execute(stmt).instrument(span.clone()).await;

        let rows = exec_rows(&result);
        self.report(
            &span,
            begin,
            &|| (rendered.to_string(), rows),
            result.as_ref().err(),
        );

        result
    }

    async fn execute_unprepared(&self, sql: &str) -> Result<ExecResult, DbErr> {
        let span = self.create_span(sql);
        let begin = Instant::now();

        let result = self
            .inner
            .execute_unprepared(sql)
            .instrument(span.clone())
            .await;

        let rows = exec_rows(&result);
        self.report(
            &span,
            begin,
            &|| (sql.to_string(), rows),
            result.as_ref().err(),
        );

        result
    }

    async fn query_one(&self, stmt: Statement) -> Result<Option<QueryResult>, DbErr> {
        let span = self.create_span(&stmt.sql);
        let rendered = stmt.clone();
        let begin = Instant::now();

        let result = self.inner.query_one(stmt).instrument(span.clone()).await;

        let rows = result.as_ref().map_or(-1, |row| i64::from(row.is_some()));
        self.report(
            &span,
            begin,
            &|| (rendered.to_string(), rows),
            result.as_ref().err(),
        );

        result
    }

    async fn query_all(&self, stmt: Statement) -> Result<Vec<QueryResult>, DbErr> {
        let span = self.create_span(&stmt.sql);
        let rendered = stmt.clone();
        let begin = Instant::now();

        let result = self.inner.query_all(stmt).instrument(span.clone()).await;

        let rows = result
            .as_ref()
            .map_or(-1, |rows| i64::try_from(rows.len()).unwrap_or(i64::MAX));
        self.report(
            &span,
            begin,
            &|| (rendered.to_string(), rows),
            result.as_ref().err(),
        );

        result
    }

    fn support_returning(&self) -> bool {
        self.inner.support_returning()
    }

    fn is_mock_connection(&self) -> bool {
        self.inner.is_mock_connection()
    }
}

/// Extension trait for wrapping database connections with a logger.
pub trait LoggerExt {
    /// Report every statement on this connection to `logger`.
    fn with_logger(self, logger: Arc<dyn Logger>) -> LoggedConnection;

    /// Report every statement on this connection to a default [`TracingLogger`].
    fn with_default_logger(self) -> LoggedConnection;
}

impl LoggerExt for DatabaseConnection {
    fn with_logger(self, logger: Arc<dyn Logger>) -> LoggedConnection {
        LoggedConnection::new(self, logger)
    }

    fn with_default_logger(self) -> LoggedConnection {
        LoggedConnection::wrap(self)
    }
}
