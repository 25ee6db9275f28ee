use rusqlite::types::Value;

use crate::error::SqlChassisError;
use crate::results::{DriverResponse, FieldInfo, ResultSet, WriteMetadata};
use crate::types::SqlValue;

/// Extract a [`SqlValue`] from a `SQLite` row.
///
/// # Errors
/// Returns `SqlChassisError::SqliteError` if the column cannot be read.
pub fn sqlite_extract_value(row: &rusqlite::Row, idx: usize) -> Result<SqlValue, SqlChassisError> {
    let value: Value = row.get(idx)?;
    Ok(match value {
        Value::Null => SqlValue::Null,
        Value::Integer(i) => SqlValue::Int(i),
        Value::Real(f) => SqlValue::Float(f),
        Value::Text(s) => SqlValue::Text(s),
        Value::Blob(b) => SqlValue::Blob(b),
    })
}

/// Run one statement on `conn`.
///
/// Statements that declare result columns return rows; everything else is
/// executed and reports the change count. `insert_id` is only set when the
/// statement moved `last_insert_rowid`.
///
/// # Errors
/// Returns `SqlChassisError::SqliteError` if preparing or running fails.
pub fn execute_statement(
    conn: &mut rusqlite::Connection,
    sql: &str,
) -> Result<DriverResponse, SqlChassisError> {
    let rowid_before = conn.last_insert_rowid();
    let mut stmt = conn.prepare(sql)?;

    if stmt.column_count() == 0 {
        let affected = stmt.execute([])?;
        drop(stmt);
        let rowid_after = conn.last_insert_rowid();
        return Ok(DriverResponse::meta(WriteMetadata {
            affected_rows: affected as u64,
            insert_id: (rowid_after != rowid_before).then_some(rowid_after),
        }));
    }

    let fields: Vec<FieldInfo> = stmt
        .columns()
        .iter()
        .map(|col| FieldInfo {
            name: col.name().to_string(),
            type_name: col.decl_type().map(str::to_string),
        })
        .collect();
    let column_count = fields.len();

    let mut result_set = ResultSet::new(fields.iter().map(|f| f.name.clone()).collect());
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let mut values = Vec::with_capacity(column_count);
        for idx in 0..column_count {
            values.push(sqlite_extract_value(row, idx)?);
        }
        result_set.add_row_values(values);
    }

    Ok(DriverResponse::rows(result_set, fields))
}
