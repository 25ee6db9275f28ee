use tracing::{debug, warn};

use crate::driver::Driver;
use crate::error::SqlChassisError;
use crate::results::{DriverResponse, QueryResult};
use crate::types::Values;

use super::Chassis;

impl<D: Driver> Chassis<D> {
    /// Run a statement through middleware, placeholder binding and the driver.
    ///
    /// Before-query hooks see the SQL as written; after-results hooks see the
    /// same unbound SQL. The returned [`QueryResult`] carries the final,
    /// bound statement text.
    ///
    /// # Errors
    /// Middleware failures are returned as-is. A driver failure is wrapped in
    /// `SqlChassisError::QueryError` together with the final SQL.
    pub async fn query(
        &self,
        sql: &str,
        values: Option<&Values>,
    ) -> Result<QueryResult, SqlChassisError> {
        let no_values = Values::new();
        let rewritten = self
            .middleware
            .apply_before_query(sql, values.unwrap_or(&no_values))?;
        let final_sql = self.bind_values(&rewritten, values).trim().to_string();

        debug!(driver = self.driver.name(), sql = %final_sql, "executing statement");

        let DriverResponse { results, fields } = match self.driver.query(&final_sql).await {
            Ok(response) => response,
            Err(source) => {
                warn!(driver = self.driver.name(), sql = %final_sql, error = %source, "statement failed");
                return Err(SqlChassisError::QueryError {
                    source: Box::new(source),
                    sql: final_sql,
                });
            }
        };

        let results = self.middleware.apply_results(sql, results)?;
        Ok(QueryResult::classify(final_sql, DriverResponse { results, fields }))
    }
}
