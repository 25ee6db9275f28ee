use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::types::{SqlValue, Values};

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r":([A-Za-z0-9_]+)").unwrap_or_else(|e| panic!("invalid placeholder regex: {e}"))
});

/// Replace `:name` placeholders with escaped values from `values`.
///
/// Names are matched exactly (case-sensitive). A placeholder with no entry in
/// `values` is left in place, and a missing mapping returns the template
/// untouched. Only the driver's escaping applies here; the transform table is
/// not consulted.
///
/// There is no escape hatch for a literal `:word` sequence: one appearing in
/// a string literal is replaced too when the mapping has that key.
///
/// Returns a borrowed `Cow` when nothing was replaced.
///
/// ```rust
/// use sql_chassis::prelude::*;
///
/// let sql = bind_values(
///     "SELECT * FROM user WHERE user_id = :user_id AND name = :name",
///     Some(&values! { "user_id" => 1 }),
///     |v| escape_value(v, EscapeStyle::MySql),
/// );
/// assert_eq!(sql, "SELECT * FROM user WHERE user_id = 1 AND name = :name");
/// ```
pub fn bind_values<'a, E>(template: &'a str, values: Option<&Values>, escape: E) -> Cow<'a, str>
where
    E: Fn(&SqlValue) -> String,
{
    let Some(values) = values else {
        return Cow::Borrowed(template);
    };
    if values.is_empty() {
        return Cow::Borrowed(template);
    }

    PLACEHOLDER.replace_all(template, |caps: &Captures<'_>| match values.get(&caps[1]) {
        Some(value) => escape(value),
        None => caps[0].to_string(),
    })
}

/// Names of every placeholder in `template`, in order of appearance.
#[must_use]
pub fn placeholder_names(template: &str) -> Vec<&str> {
    PLACEHOLDER
        .captures_iter(template)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .collect()
}
