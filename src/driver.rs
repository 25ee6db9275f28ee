use async_trait::async_trait;

use crate::clauses::InsertForm;
use crate::config::ConnectionOptions;
use crate::error::SqlChassisError;
use crate::escape::{EscapeStyle, escape_value};
use crate::results::DriverResponse;
use crate::types::SqlValue;

/// The database capability a [`crate::Chassis`] delegates to.
///
/// A driver owns one logical connection. It receives fully bound statement
/// text; it never sees placeholders or the value mapping.
#[async_trait]
pub trait Driver: Send + Sync {
    /// Build an unconnected driver from connection options.
    ///
    /// # Errors
    /// Returns `SqlChassisError::ConfigError` if the options cannot describe a connection.
    fn create(options: &ConnectionOptions) -> Result<Self, SqlChassisError>
    where
        Self: Sized;

    /// Short backend name used in log events.
    fn name(&self) -> &'static str;

    /// Establish the connection. Calling it on a connected driver is a no-op.
    ///
    /// # Errors
    /// Returns `SqlChassisError::ConnectionError` (or a backend error) if the server is unreachable.
    async fn connect(&self) -> Result<(), SqlChassisError>;

    /// Run one statement, connecting first if needed.
    ///
    /// # Errors
    /// Returns the backend error if the statement is rejected.
    async fn query(&self, sql: &str) -> Result<DriverResponse, SqlChassisError>;

    fn escape_style(&self) -> EscapeStyle {
        EscapeStyle::MySql
    }

    /// INSERT syntax accepted by the server.
    fn insert_form(&self) -> InsertForm {
        InsertForm::Set
    }

    /// Render a value as a literal in this backend's dialect.
    fn escape(&self, value: &SqlValue) -> String {
        escape_value(value, self.escape_style())
    }
}
