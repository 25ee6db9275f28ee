use crate::clauses::{Condition, Fields, assemble, build_insert, quote_identifier};
use crate::driver::Driver;
use crate::error::SqlChassisError;
use crate::results::{QueryResult, ResultSet};
use crate::types::Values;

use super::Chassis;

impl<D: Driver> Chassis<D> {
    /// Run a statement and return only its rows.
    ///
    /// # Errors
    /// See [`Chassis::query`].
    pub async fn select(
        &self,
        sql: &str,
        values: Option<&Values>,
    ) -> Result<ResultSet, SqlChassisError> {
        Ok(self.query(sql, values).await?.into_rows())
    }

    /// `SELECT fields FROM table [WHERE ...]`
    ///
    /// ```rust,no_run
    /// # use sql_chassis::prelude::*;
    /// # async fn demo(db: &Chassis<SqliteDriver>) -> Result<(), SqlChassisError> {
    /// // SELECT `id`, `name` FROM `user` WHERE `id` = 5
    /// let rows = db
    ///     .select_where("id, name", "user", Some(Condition::from(values! { "id" => 5 })))
    ///     .await?;
    /// # let _ = rows; Ok(()) }
    /// ```
    ///
    /// # Errors
    /// See [`Chassis::query`].
    pub async fn select_where(
        &self,
        fields: impl Into<Fields>,
        table: &str,
        condition: Option<Condition>,
    ) -> Result<ResultSet, SqlChassisError> {
        let head = format!(
            "SELECT {} FROM {}",
            fields.into().render(),
            quote_identifier(table)
        );
        let sql = assemble(&head, self.where_clause(condition.as_ref()));
        self.select(&sql, None).await
    }

    /// Insert one row with values run through the transform table.
    ///
    /// The statement follows the driver's [`Driver::insert_form`]:
    /// `INSERT INTO table SET col = value, ...` for MySQL,
    /// `INSERT INTO table (cols) VALUES (...)` for SQLite.
    ///
    /// # Errors
    /// See [`Chassis::query`].
    pub async fn insert(
        &self,
        table: &str,
        values: &Values,
    ) -> Result<QueryResult, SqlChassisError> {
        let sql = build_insert(
            table,
            values,
            &self.settings.transforms,
            |v| self.driver.escape(v),
            self.driver.insert_form(),
        );
        self.query(&sql, None).await
    }

    /// `UPDATE table SET col = value, ... [WHERE ...]`
    ///
    /// An absent or empty condition updates every row.
    ///
    /// # Errors
    /// See [`Chassis::query`].
    pub async fn update(
        &self,
        table: &str,
        values: &Values,
        condition: Option<Condition>,
    ) -> Result<QueryResult, SqlChassisError> {
        let head = format!(
            "UPDATE {} SET {}",
            quote_identifier(table),
            self.assignment_list(values)
        );
        let sql = assemble(&head, self.where_clause(condition.as_ref()));
        self.query(&sql, None).await
    }

    /// `DELETE FROM table [WHERE ...]`
    ///
    /// An absent or empty condition deletes every row.
    ///
    /// # Errors
    /// See [`Chassis::query`].
    pub async fn delete(
        &self,
        table: &str,
        condition: Option<Condition>,
    ) -> Result<QueryResult, SqlChassisError> {
        let head = format!("DELETE FROM {}", quote_identifier(table));
        let sql = assemble(&head, self.where_clause(condition.as_ref()));
        self.query(&sql, None).await
    }
}
