use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;

use crate::types::SqlValue;

/// Column name -> position lookup shared by every row of a result set.
#[derive(Debug, Clone, Default)]
struct ColumnIndex {
    names: Arc<Vec<String>>,
    positions: Arc<HashMap<String, usize>>,
}

impl ColumnIndex {
    fn new(names: Vec<String>) -> Self {
        let positions = names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();
        Self {
            names: Arc::new(names),
            positions: Arc::new(positions),
        }
    }
}

/// A row from a database query result
#[derive(Debug, Clone)]
pub struct DbRow {
    columns: ColumnIndex,
    /// The values for this row, in column order
    pub values: Vec<SqlValue>,
}

impl DbRow {
    /// Column names for this row (shared across the result set)
    #[must_use]
    pub fn column_names(&self) -> &[String] {
        &self.columns.names
    }

    #[must_use]
    pub fn get_column_index(&self, column_name: &str) -> Option<usize> {
        self.columns.positions.get(column_name).copied()
    }

    /// Get a value from the row by column name
    ///
    /// When a name appears more than once, the last column wins.
    #[must_use]
    pub fn get(&self, column_name: &str) -> Option<&SqlValue> {
        self.get_column_index(column_name)
            .and_then(|idx| self.values.get(idx))
    }

    #[must_use]
    pub fn get_by_index(&self, index: usize) -> Option<&SqlValue> {
        self.values.get(index)
    }
}

/// Rows returned by a read statement.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    columns: ColumnIndex,
    rows: Vec<DbRow>,
}

impl ResultSet {
    /// An empty result set with the given column names.
    #[must_use]
    pub fn new(column_names: Vec<String>) -> Self {
        Self {
            columns: ColumnIndex::new(column_names),
            rows: Vec::new(),
        }
    }

    #[must_use]
    pub fn column_names(&self) -> &[String] {
        &self.columns.names
    }

    /// Append a row; `values` must follow the column order.
    pub fn add_row_values(&mut self, values: Vec<SqlValue>) {
        self.rows.push(DbRow {
            columns: self.columns.clone(),
            values,
        });
    }

    #[must_use]
    pub fn rows(&self) -> &[DbRow] {
        &self.rows
    }

    #[must_use]
    pub fn into_rows(self) -> Vec<DbRow> {
        self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DbRow> {
        self.rows.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Keep only the rows matching `pred`.
    pub fn retain<F: FnMut(&DbRow) -> bool>(&mut self, pred: F) {
        self.rows.retain(pred);
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a DbRow;
    type IntoIter = std::slice::Iter<'a, DbRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Column metadata reported by the driver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldInfo {
    pub name: String,
    /// Declared or wire type name, when the driver knows it.
    pub type_name: Option<String>,
}

/// What the driver reports for a statement that does not return rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct WriteMetadata {
    pub affected_rows: u64,
    /// Generated key of the last inserted row, if any.
    pub insert_id: Option<i64>,
}

/// Raw driver output, before statement classification.
///
/// This is what after-results middleware sees.
#[derive(Debug, Clone)]
pub enum Results {
    Rows(ResultSet),
    Meta(WriteMetadata),
}

/// A complete driver reply.
#[derive(Debug, Clone)]
pub struct DriverResponse {
    pub results: Results,
    pub fields: Vec<FieldInfo>,
}

impl DriverResponse {
    #[must_use]
    pub fn rows(rows: ResultSet, fields: Vec<FieldInfo>) -> Self {
        Self {
            results: Results::Rows(rows),
            fields,
        }
    }

    #[must_use]
    pub fn meta(metadata: WriteMetadata) -> Self {
        Self {
            results: Results::Meta(metadata),
            fields: Vec::new(),
        }
    }
}

/// The outcome of one executed statement.
///
/// The variant is chosen from the statement text: anything whose trimmed,
/// case-insensitive text starts with `SELECT` is [`QueryResult::Select`];
/// everything else (including `WITH ... SELECT`) is [`QueryResult::Write`].
#[derive(Debug, Clone)]
pub enum QueryResult {
    Select {
        rows: ResultSet,
        fields: Vec<FieldInfo>,
        sql: String,
    },
    Write {
        metadata: WriteMetadata,
        sql: String,
    },
}

impl QueryResult {
    /// Classify a driver reply by the final statement text.
    ///
    /// A `SELECT` that produced write metadata yields empty rows; any other
    /// statement that produced rows yields default metadata.
    #[must_use]
    pub fn classify(sql: String, response: DriverResponse) -> Self {
        let DriverResponse { results, fields } = response;
        if is_select(&sql) {
            let rows = match results {
                Results::Rows(rows) => rows,
                Results::Meta(_) => ResultSet::default(),
            };
            QueryResult::Select { rows, fields, sql }
        } else {
            let metadata = match results {
                Results::Meta(metadata) => metadata,
                Results::Rows(_) => WriteMetadata::default(),
            };
            QueryResult::Write { metadata, sql }
        }
    }

    /// The final statement text that was sent to the driver.
    #[must_use]
    pub fn sql(&self) -> &str {
        match self {
            QueryResult::Select { sql, .. } | QueryResult::Write { sql, .. } => sql,
        }
    }

    #[must_use]
    pub fn rows(&self) -> Option<&ResultSet> {
        match self {
            QueryResult::Select { rows, .. } => Some(rows),
            QueryResult::Write { .. } => None,
        }
    }

    /// Rows of a read statement; empty for anything else.
    #[must_use]
    pub fn into_rows(self) -> ResultSet {
        match self {
            QueryResult::Select { rows, .. } => rows,
            QueryResult::Write { .. } => ResultSet::default(),
        }
    }

    #[must_use]
    pub fn fields(&self) -> &[FieldInfo] {
        match self {
            QueryResult::Select { fields, .. } => fields,
            QueryResult::Write { .. } => &[],
        }
    }

    #[must_use]
    pub fn metadata(&self) -> Option<&WriteMetadata> {
        match self {
            QueryResult::Write { metadata, .. } => Some(metadata),
            QueryResult::Select { .. } => None,
        }
    }

    #[must_use]
    pub fn affected_rows(&self) -> u64 {
        self.metadata().map_or(0, |m| m.affected_rows)
    }

    #[must_use]
    pub fn insert_id(&self) -> Option<i64> {
        self.metadata().and_then(|m| m.insert_id)
    }
}

/// True when the trimmed statement starts with `SELECT`, ignoring case.
#[must_use]
pub fn is_select(sql: &str) -> bool {
    sql.trim_start()
        .get(..6)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("select"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_detection_ignores_case_and_whitespace() {
        assert!(is_select("SELECT 1"));
        assert!(is_select("  select 1"));
        assert!(is_select("\n\tSelect 1"));
        assert!(!is_select("WITH x AS (SELECT 1) SELECT * FROM x"));
        assert!(!is_select("UPDATE t SET a = 1"));
        assert!(!is_select("sel"));
        assert!(!is_select("é"));
    }

    #[test]
    fn classification_by_text() {
        let mut rows = ResultSet::new(vec!["id".into()]);
        rows.add_row_values(vec![SqlValue::Int(1)]);

        let select = QueryResult::classify(
            "select id from t".into(),
            DriverResponse::rows(rows.clone(), Vec::new()),
        );
        assert_eq!(select.rows().map(ResultSet::len), Some(1));
        assert!(select.metadata().is_none());

        let write = QueryResult::classify(
            "PRAGMA table_info(t)".into(),
            DriverResponse::rows(rows, Vec::new()),
        );
        assert_eq!(write.metadata(), Some(&WriteMetadata::default()));

        let write = QueryResult::classify(
            "DELETE FROM t".into(),
            DriverResponse::meta(WriteMetadata {
                affected_rows: 3,
                insert_id: None,
            }),
        );
        assert_eq!(write.affected_rows(), 3);
        assert_eq!(write.sql(), "DELETE FROM t");
    }

    #[test]
    fn rows_lookup_by_name() {
        let mut rows = ResultSet::new(vec!["id".into(), "name".into()]);
        rows.add_row_values(vec![SqlValue::Int(5), SqlValue::from("Ann")]);
        let row = &rows.rows()[0];
        assert_eq!(row.get("name"), Some(&SqlValue::from("Ann")));
        assert_eq!(row.get("missing"), None);
        assert_eq!(row.get_by_index(0), Some(&SqlValue::Int(5)));
        assert_eq!(row.column_names(), ["id", "name"]);
    }
}
