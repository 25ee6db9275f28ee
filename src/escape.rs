//! SQL literal escaping.
//!
//! Drivers pick an [`EscapeStyle`]; everything that splices a raw value into
//! statement text goes through [`escape_value`].

use crate::types::SqlValue;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Literal quoting convention of the target server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EscapeStyle {
    /// MySQL: backslash escapes inside single quotes, `true`/`false` booleans.
    #[default]
    MySql,
    /// ANSI/SQLite: embedded quotes doubled, no backslash escapes, `1`/`0` booleans.
    Standard,
}

/// Render `value` as a SQL literal ready to splice into a statement.
///
/// # Examples
/// ```rust
/// use sql_chassis::escape::{EscapeStyle, escape_value};
/// use sql_chassis::types::SqlValue;
///
/// let name = SqlValue::from("O'Brien");
/// assert_eq!(escape_value(&name, EscapeStyle::MySql), r"'O\'Brien'");
/// assert_eq!(escape_value(&name, EscapeStyle::Standard), "'O''Brien'");
/// assert_eq!(escape_value(&SqlValue::Int(5), EscapeStyle::MySql), "5");
/// ```
#[must_use]
pub fn escape_value(value: &SqlValue, style: EscapeStyle) -> String {
    match value {
        SqlValue::Absent | SqlValue::Null => "NULL".to_string(),
        SqlValue::Int(i) => i.to_string(),
        SqlValue::Float(f) if f.is_finite() => f.to_string(),
        SqlValue::Float(_) => "NULL".to_string(),
        SqlValue::Bool(b) => match style {
            EscapeStyle::MySql => b.to_string(),
            EscapeStyle::Standard => u8::from(*b).to_string(),
        },
        SqlValue::Text(s) => quote_string(s, style),
        SqlValue::Timestamp(dt) => quote_string(&dt.format(TIMESTAMP_FORMAT).to_string(), style),
        SqlValue::Json(json) => quote_string(&json.to_string(), style),
        SqlValue::Blob(bytes) => hex_literal(bytes),
    }
}

/// Quote and escape a string literal.
#[must_use]
pub fn quote_string(s: &str, style: EscapeStyle) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    match style {
        EscapeStyle::MySql => {
            for ch in s.chars() {
                match ch {
                    '\0' => out.push_str("\\0"),
                    '\u{8}' => out.push_str("\\b"),
                    '\t' => out.push_str("\\t"),
                    '\n' => out.push_str("\\n"),
                    '\r' => out.push_str("\\r"),
                    '\u{1a}' => out.push_str("\\Z"),
                    '"' => out.push_str("\\\""),
                    '\'' => out.push_str("\\'"),
                    '\\' => out.push_str("\\\\"),
                    other => out.push(other),
                }
            }
        }
        EscapeStyle::Standard => {
            for ch in s.chars() {
                if ch == '\'' {
                    out.push('\'');
                }
                out.push(ch);
            }
        }
    }
    out.push('\'');
    out
}

fn hex_literal(bytes: &[u8]) -> String {
    let hex: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
    format!("X'{hex}'")
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn mysql_escapes_control_and_quote_chars() {
        let value = SqlValue::from("a'b\"c\\d\ne\0");
        assert_eq!(
            escape_value(&value, EscapeStyle::MySql),
            r#"'a\'b\"c\\d\ne\0'"#
        );
    }

    #[test]
    fn standard_doubles_quotes_and_keeps_backslashes() {
        let value = SqlValue::from(r"it's C:\tmp");
        assert_eq!(
            escape_value(&value, EscapeStyle::Standard),
            r"'it''s C:\tmp'"
        );
    }

    #[test]
    fn numbers_render_unquoted() {
        assert_eq!(escape_value(&SqlValue::Int(-42), EscapeStyle::MySql), "-42");
        assert_eq!(escape_value(&SqlValue::Float(1.5), EscapeStyle::MySql), "1.5");
        assert_eq!(escape_value(&SqlValue::Float(f64::NAN), EscapeStyle::MySql), "NULL");
    }

    #[test]
    fn booleans_follow_style() {
        assert_eq!(escape_value(&SqlValue::Bool(true), EscapeStyle::MySql), "true");
        assert_eq!(escape_value(&SqlValue::Bool(false), EscapeStyle::Standard), "0");
    }

    #[test]
    fn null_and_absent_render_null() {
        assert_eq!(escape_value(&SqlValue::Null, EscapeStyle::MySql), "NULL");
        assert_eq!(escape_value(&SqlValue::Absent, EscapeStyle::Standard), "NULL");
    }

    #[test]
    fn timestamps_and_blobs() {
        let dt = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_milli_opt(3, 4, 5, 60)
            .unwrap();
        assert_eq!(
            escape_value(&SqlValue::Timestamp(dt), EscapeStyle::MySql),
            "'2024-01-02 03:04:05.060'"
        );
        assert_eq!(
            escape_value(&SqlValue::Blob(vec![0x00, 0xab, 0x10]), EscapeStyle::MySql),
            "X'00ab10'"
        );
        assert_eq!(
            escape_value(&SqlValue::Blob(Vec::new()), EscapeStyle::Standard),
            "X''"
        );
    }

    #[test]
    fn json_is_a_quoted_document() {
        let value = SqlValue::Json(serde_json::json!({"k": "v"}));
        assert_eq!(escape_value(&value, EscapeStyle::MySql), r#"'{\"k\":\"v\"}'"#);
    }
}
