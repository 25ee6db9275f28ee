//! `SQLite` driver backed by a single rusqlite connection.
//!
//! The connection is opened lazily and every statement runs on the blocking
//! thread pool while holding the connection lock.

mod query;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use crate::clauses::InsertForm;
use crate::config::ConnectionOptions;
use crate::driver::Driver;
use crate::error::SqlChassisError;
use crate::escape::EscapeStyle;
use crate::results::DriverResponse;

pub use query::{execute_statement, sqlite_extract_value};

const IN_MEMORY: &str = ":memory:";

type SharedConnection = Arc<Mutex<Option<rusqlite::Connection>>>;

/// Driver for a `SQLite` database file, or an in-memory database when no
/// `database` option is given.
///
/// Literals follow standard SQL quoting: quotes are doubled and booleans
/// render as `1`/`0`. Inserts use the `(columns) VALUES (...)` form.
pub struct SqliteDriver {
    path: String,
    conn: SharedConnection,
}

impl SqliteDriver {
    /// Driver for the database at `path` (`:memory:` for a private in-memory database).
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            conn: Arc::new(Mutex::new(None)),
        }
    }

    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(IN_MEMORY)
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Run `func` against the open connection on the blocking pool, opening it first if needed.
    ///
    /// # Errors
    /// Returns `SqlChassisError::SqliteError` if the database cannot be opened,
    /// or whatever `func` returns.
    pub async fn with_connection<F, R>(&self, func: F) -> Result<R, SqlChassisError>
    where
        F: FnOnce(&mut rusqlite::Connection) -> Result<R, SqlChassisError> + Send + 'static,
        R: Send + 'static,
    {
        let path = self.path.clone();
        run_blocking(Arc::clone(&self.conn), move |slot| {
            if slot.is_none() {
                debug!(path = %path, "opening sqlite database");
                *slot = Some(rusqlite::Connection::open(&path)?);
            }
            match slot.as_mut() {
                Some(conn) => func(conn),
                None => Err(SqlChassisError::ConnectionError(format!(
                    "sqlite database {path} is not open"
                ))),
            }
        })
        .await
    }
}

async fn run_blocking<F, R>(conn: SharedConnection, func: F) -> Result<R, SqlChassisError>
where
    F: FnOnce(&mut Option<rusqlite::Connection>) -> Result<R, SqlChassisError> + Send + 'static,
    R: Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let mut guard = conn.blocking_lock();
        func(&mut guard)
    })
    .await
    .map_err(|e| SqlChassisError::ExecutionError(format!("sqlite spawn_blocking join error: {e}")))?
}

#[async_trait]
impl Driver for SqliteDriver {
    fn create(options: &ConnectionOptions) -> Result<Self, SqlChassisError> {
        let path = options.database.as_deref().unwrap_or(IN_MEMORY);
        if path.trim().is_empty() {
            return Err(SqlChassisError::ConfigError(
                "sqlite database path must not be empty".into(),
            ));
        }
        Ok(Self::new(path))
    }

    fn name(&self) -> &'static str {
        "sqlite"
    }

    async fn connect(&self) -> Result<(), SqlChassisError> {
        self.with_connection(|_| Ok(())).await
    }

    async fn query(&self, sql: &str) -> Result<DriverResponse, SqlChassisError> {
        let sql = sql.to_string();
        self.with_connection(move |conn| execute_statement(conn, &sql))
            .await
    }

    fn escape_style(&self) -> EscapeStyle {
        EscapeStyle::Standard
    }

    fn insert_form(&self) -> InsertForm {
        InsertForm::Values
    }
}

impl fmt::Debug for SqliteDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteDriver")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}
