use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value as JsonValue;
use sqlx::mysql::MySqlRow;
use sqlx::{Column, Row, TypeInfo, ValueRef};

use crate::error::SqlChassisError;
use crate::types::SqlValue;

/// Extract a [`SqlValue`] from a `MySQL` row, dispatching on the column's
/// wire type name.
///
/// `DECIMAL`, `TIME` and unknown types come back as text so no precision is lost.
///
/// # Errors
/// Returns `SqlChassisError::MySqlError` if the value does not decode as its
/// declared type.
pub fn mysql_extract_value(row: &MySqlRow, idx: usize) -> Result<SqlValue, SqlChassisError> {
    if row.try_get_raw(idx)?.is_null() {
        return Ok(SqlValue::Null);
    }

    let type_name = row.column(idx).type_info().name();
    let value = match type_name {
        "BOOLEAN" => SqlValue::Bool(row.try_get::<bool, _>(idx)?),
        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" => {
            SqlValue::Int(row.try_get::<i64, _>(idx)?)
        }
        "TINYINT UNSIGNED" | "SMALLINT UNSIGNED" | "MEDIUMINT UNSIGNED" | "INT UNSIGNED"
        | "BIGINT UNSIGNED" => {
            let raw = row.try_get::<u64, _>(idx)?;
            i64::try_from(raw).map_or_else(|_| SqlValue::Text(raw.to_string()), SqlValue::Int)
        }
        "FLOAT" => SqlValue::Float(f64::from(row.try_get::<f32, _>(idx)?)),
        "DOUBLE" => SqlValue::Float(row.try_get::<f64, _>(idx)?),
        "DATETIME" | "TIMESTAMP" => SqlValue::Timestamp(row.try_get::<NaiveDateTime, _>(idx)?),
        "DATE" => SqlValue::Text(row.try_get::<NaiveDate, _>(idx)?.to_string()),
        "JSON" => SqlValue::Json(row.try_get::<JsonValue, _>(idx)?),
        "BINARY" | "VARBINARY" | "TINYBLOB" | "BLOB" | "MEDIUMBLOB" | "LONGBLOB" | "BIT" => {
            SqlValue::Blob(row.try_get::<Vec<u8>, _>(idx)?)
        }
        _ => match row.try_get_unchecked::<String, _>(idx) {
            Ok(text) => SqlValue::Text(text),
            Err(_) => SqlValue::Blob(row.try_get_unchecked::<Vec<u8>, _>(idx)?),
        },
    };
    Ok(value)
}
