//! Clause builders for the shorthand statements.
//!
//! Identifiers are back-quoted but not validated; only values are escaped.

use crate::transform::TransformTable;
use crate::types::{SqlValue, Values};

/// A WHERE condition for the shorthand builders.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// A hand-written fragment spliced verbatim, including its own `WHERE`.
    Raw(String),
    /// `column = value` pairs joined with `AND`; `Null` values become `IS NULL`.
    Equality(Values),
}

impl From<&str> for Condition {
    fn from(value: &str) -> Self {
        Condition::Raw(value.to_string())
    }
}

impl From<String> for Condition {
    fn from(value: String) -> Self {
        Condition::Raw(value)
    }
}

impl From<Values> for Condition {
    fn from(value: Values) -> Self {
        Condition::Equality(value)
    }
}

/// Column selection for `select_where`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fields {
    /// Comma-delimited names, e.g. `"id, name"`.
    Delimited(String),
    /// One name per entry.
    List(Vec<String>),
}

impl Fields {
    /// Trim and back-quote every field, joined with `", "`.
    ///
    /// `*` gets no special treatment.
    #[must_use]
    pub fn render(&self) -> String {
        let quoted: Vec<String> = match self {
            Fields::Delimited(s) => s.split(',').map(quote_identifier).collect(),
            Fields::List(names) => names.iter().map(|n| quote_identifier(n)).collect(),
        };
        quoted.join(", ")
    }
}

impl From<&str> for Fields {
    fn from(value: &str) -> Self {
        Fields::Delimited(value.to_string())
    }
}

impl From<String> for Fields {
    fn from(value: String) -> Self {
        Fields::Delimited(value)
    }
}

impl From<Vec<String>> for Fields {
    fn from(value: Vec<String>) -> Self {
        Fields::List(value)
    }
}

impl From<Vec<&str>> for Fields {
    fn from(value: Vec<&str>) -> Self {
        Fields::List(value.into_iter().map(str::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Fields {
    fn from(value: [&str; N]) -> Self {
        Fields::List(value.into_iter().map(str::to_string).collect())
    }
}

/// Back-quote a trimmed identifier.
#[must_use]
pub fn quote_identifier(name: &str) -> String {
    format!("`{}`", name.trim())
}

/// `` `col1` = fragment1, `col2` = fragment2 `` with values rendered through
/// the transform table. An empty mapping yields an empty string.
///
/// ```rust
/// use sql_chassis::prelude::*;
///
/// let list = build_assignment_list(
///     &values! { "first_name" => "Brad", "updated" => "NOW()", "nickname" => "" },
///     &TransformTable::default(),
///     |v| escape_value(v, EscapeStyle::MySql),
/// );
/// assert_eq!(list, "`first_name` = 'Brad', `updated` = NOW(), `nickname` = NULL");
/// ```
pub fn build_assignment_list<E>(values: &Values, transforms: &TransformTable, escape: E) -> String
where
    E: Fn(&SqlValue) -> String,
{
    transforms
        .transform_values(values, escape)
        .iter()
        .map(|(column, fragment)| format!("`{column}` = {fragment}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// How a dialect spells a single-row INSERT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InsertForm {
    /// `` INSERT INTO `t` SET `a` = 1, `b` = 2 `` (MySQL).
    #[default]
    Set,
    /// `` INSERT INTO `t` (`a`, `b`) VALUES (1, 2) ``; an empty mapping
    /// becomes `DEFAULT VALUES`.
    Values,
}

/// Render an INSERT for one row, with values run through the transform table.
///
/// ```rust
/// use sql_chassis::prelude::*;
///
/// let row = values! { "name" => "Ann", "nickname" => "" };
/// let escape = |v: &SqlValue| escape_value(v, EscapeStyle::Standard);
/// assert_eq!(
///     build_insert("user", &row, &TransformTable::default(), escape, InsertForm::Values),
///     "INSERT INTO `user` (`name`, `nickname`) VALUES ('Ann', NULL)"
/// );
/// assert_eq!(
///     build_insert("user", &row, &TransformTable::default(), escape, InsertForm::Set),
///     "INSERT INTO `user` SET `name` = 'Ann', `nickname` = NULL"
/// );
/// ```
pub fn build_insert<E>(
    table: &str,
    values: &Values,
    transforms: &TransformTable,
    escape: E,
    form: InsertForm,
) -> String
where
    E: Fn(&SqlValue) -> String,
{
    let table = quote_identifier(table);
    match form {
        InsertForm::Set => format!(
            "INSERT INTO {table} SET {}",
            build_assignment_list(values, transforms, escape)
        ),
        InsertForm::Values if values.is_empty() => format!("INSERT INTO {table} DEFAULT VALUES"),
        InsertForm::Values => {
            let rendered = transforms.transform_values(values, escape);
            let columns: Vec<String> = rendered.keys().map(|c| quote_identifier(c)).collect();
            let fragments: Vec<&str> = rendered.values().map(String::as_str).collect();
            format!(
                "INSERT INTO {table} ({}) VALUES ({})",
                columns.join(", "),
                fragments.join(", ")
            )
        }
    }
}

/// Render a WHERE clause, or `None` when there is nothing to filter on.
///
/// Raw conditions pass through verbatim. Equality values are escaped
/// directly, without the transform table. An empty equality mapping is
/// treated like an absent condition.
pub fn build_where_clause<E>(condition: Option<&Condition>, escape: E) -> Option<String>
where
    E: Fn(&SqlValue) -> String,
{
    match condition? {
        Condition::Raw(fragment) => Some(fragment.clone()),
        Condition::Equality(values) if values.is_empty() => None,
        Condition::Equality(values) => {
            let parts: Vec<String> = values
                .iter()
                .map(|(column, value)| {
                    if value.is_null() {
                        format!("`{column}` IS NULL")
                    } else {
                        format!("`{column}` = {}", escape(value))
                    }
                })
                .collect();
            Some(format!("WHERE {}", parts.join(" AND ")))
        }
    }
}

/// Join statement pieces with single spaces, skipping a missing clause.
pub(crate) fn assemble(head: &str, clause: Option<String>) -> String {
    match clause {
        Some(clause) => format!("{head} {clause}"),
        None => head.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::escape::{EscapeStyle, escape_value};
    use crate::values;

    fn mysql(value: &SqlValue) -> String {
        escape_value(value, EscapeStyle::MySql)
    }

    #[test]
    fn where_null_uses_is_null() {
        let cond = Condition::from(values! { "user_id" => SqlValue::Null });
        assert_eq!(
            build_where_clause(Some(&cond), mysql).as_deref(),
            Some("WHERE `user_id` IS NULL")
        );
    }

    #[test]
    fn where_value_is_escaped_and_joined() {
        let cond = Condition::from(values! { "user_id" => 1, "name" => "a'b" });
        assert_eq!(
            build_where_clause(Some(&cond), mysql).as_deref(),
            Some(r"WHERE `user_id` = 1 AND `name` = 'a\'b'")
        );
    }

    #[test]
    fn where_skips_transform_table() {
        let cond = Condition::from(values! { "created" => "NOW()", "gone" => SqlValue::Absent });
        assert_eq!(
            build_where_clause(Some(&cond), mysql).as_deref(),
            Some("WHERE `created` = 'NOW()' AND `gone` = NULL")
        );
    }

    #[test]
    fn absent_or_empty_condition_has_no_clause() {
        assert_eq!(build_where_clause(None, mysql), None);
        let empty = Condition::Equality(Values::new());
        assert_eq!(build_where_clause(Some(&empty), mysql), None);
    }

    #[test]
    fn raw_condition_passes_through() {
        let cond = Condition::from("WHERE age > 21");
        assert_eq!(
            build_where_clause(Some(&cond), mysql).as_deref(),
            Some("WHERE age > 21")
        );
    }

    #[test]
    fn assignment_list_joins_without_trailing_comma() {
        let list = build_assignment_list(
            &values! { "a" => 1, "b" => SqlValue::Absent },
            &TransformTable::default(),
            mysql,
        );
        assert_eq!(list, "`a` = 1, `b` = NULL");
        let empty = build_assignment_list(&Values::new(), &TransformTable::default(), mysql);
        assert_eq!(empty, "");
    }

    #[test]
    fn insert_values_form_keeps_mapping_order_and_transforms() {
        let row = values! { "b" => 2, "a" => "NOW()", "c" => SqlValue::Absent };
        assert_eq!(
            build_insert("t", &row, &TransformTable::default(), mysql, InsertForm::Values),
            "INSERT INTO `t` (`b`, `a`, `c`) VALUES (2, NOW(), NULL)"
        );
        assert_eq!(
            build_insert("t", &Values::new(), &TransformTable::default(), mysql, InsertForm::Values),
            "INSERT INTO `t` DEFAULT VALUES"
        );
        assert_eq!(
            build_insert("t", &row, &TransformTable::default(), mysql, InsertForm::Set),
            "INSERT INTO `t` SET `b` = 2, `a` = NOW(), `c` = NULL"
        );
    }

    #[test]
    fn fields_are_trimmed_and_quoted() {
        assert_eq!(Fields::from("id,  name ").render(), "`id`, `name`");
        assert_eq!(Fields::from(["id", "email"]).render(), "`id`, `email`");
        assert_eq!(Fields::from("*").render(), "`*`");
    }
}
