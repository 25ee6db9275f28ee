use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SqlChassisError {
    #[cfg(feature = "sqlite")]
    #[error(transparent)]
    SqliteError(#[from] rusqlite::Error),

    #[cfg(feature = "mysql")]
    #[error(transparent)]
    MySqlError(#[from] sqlx::Error),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The driver rejected a statement. `sql` is the exact text that was sent,
    /// after middleware and value binding.
    #[error("Query error: {source} [sql: {sql}]")]
    QueryError {
        #[source]
        source: Box<SqlChassisError>,
        sql: String,
    },

    #[error("Cannot find: {}", path.display())]
    FileNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Middleware error: {0}")]
    MiddlewareError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("SQL execution error: {0}")]
    ExecutionError(String),
}

impl SqlChassisError {
    /// The final SQL text attached to a [`SqlChassisError::QueryError`].
    #[must_use]
    pub fn sql(&self) -> Option<&str> {
        match self {
            SqlChassisError::QueryError { sql, .. } => Some(sql),
            _ => None,
        }
    }

    /// The driver error wrapped by a [`SqlChassisError::QueryError`].
    #[must_use]
    pub fn driver_error(&self) -> Option<&SqlChassisError> {
        match self {
            SqlChassisError::QueryError { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for SqlChassisError {
    fn from(err: serde_json::Error) -> Self {
        SqlChassisError::ConfigError(format!("invalid options document: {err}"))
    }
}
