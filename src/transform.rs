//! The transform table: raw values that render as fixed or computed SQL
//! fragments instead of escaped literals.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::types::{SqlValue, Values};

/// Signature of a computed transform: `(raw value, full value mapping) -> fragment`.
pub type TransformFn = dyn Fn(&SqlValue, &Values) -> String + Send + Sync;

/// The raw values a transform can be keyed on.
///
/// Lookup is by exact identity of the raw value. Only text and the three
/// sentinels participate; `Int(5)` never matches `Text("5")`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TransformKey {
    /// [`SqlValue::Absent`]
    Absent,
    /// [`SqlValue::Null`]
    Null,
    /// `Text("")`
    EmptyString,
    /// Any other text value, matched case-sensitively.
    Text(String),
}

impl TransformKey {
    /// The key a raw value would be looked up under, if any.
    #[must_use]
    pub fn for_value(value: &SqlValue) -> Option<TransformKey> {
        match value {
            SqlValue::Absent => Some(TransformKey::Absent),
            SqlValue::Null => Some(TransformKey::Null),
            SqlValue::Text(s) if s.is_empty() => Some(TransformKey::EmptyString),
            SqlValue::Text(s) => Some(TransformKey::Text(s.clone())),
            _ => None,
        }
    }
}

impl From<&str> for TransformKey {
    fn from(value: &str) -> Self {
        if value.is_empty() {
            TransformKey::EmptyString
        } else {
            TransformKey::Text(value.to_string())
        }
    }
}

/// A single transform table entry.
#[derive(Clone)]
pub enum Transform {
    /// Splice this fragment verbatim.
    Literal(String),
    /// Compute the fragment from the raw value and the whole mapping.
    Computed(Arc<TransformFn>),
}

impl Transform {
    pub fn computed<F>(func: F) -> Self
    where
        F: Fn(&SqlValue, &Values) -> String + Send + Sync + 'static,
    {
        Transform::Computed(Arc::new(func))
    }

    #[must_use]
    pub fn render(&self, raw: &SqlValue, values: &Values) -> String {
        match self {
            Transform::Literal(fragment) => fragment.clone(),
            Transform::Computed(func) => func(raw, values),
        }
    }
}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transform::Literal(fragment) => f.debug_tuple("Literal").field(fragment).finish(),
            Transform::Computed(_) => f.debug_tuple("Computed").field(&"<fn>").finish(),
        }
    }
}

impl From<&str> for Transform {
    fn from(value: &str) -> Self {
        Transform::Literal(value.to_string())
    }
}

impl From<String> for Transform {
    fn from(value: String) -> Self {
        Transform::Literal(value)
    }
}

/// Mapping of raw values to SQL fragments.
///
/// The default table renders absent values and empty strings as `NULL`, and
/// passes `NOW()` and `CURTIME()` through unescaped.
///
/// ```rust
/// use sql_chassis::prelude::*;
///
/// let table = TransformTable::default()
///     .with("TODAY()", "CURDATE()")
///     .with(TransformKey::EmptyString, "DEFAULT");
///
/// let rendered = table.transform_values(
///     &values! { "created" => "TODAY()", "note" => "" },
///     |v| escape_value(v, EscapeStyle::MySql),
/// );
/// assert_eq!(rendered["created"], "CURDATE()");
/// assert_eq!(rendered["note"], "DEFAULT");
/// ```
#[derive(Debug, Clone)]
pub struct TransformTable {
    entries: HashMap<TransformKey, Transform>,
}

impl Default for TransformTable {
    fn default() -> Self {
        Self::empty()
            .with(TransformKey::Absent, "NULL")
            .with(TransformKey::EmptyString, "NULL")
            .with("NOW()", "NOW()")
            .with("CURTIME()", "CURTIME()")
    }
}

impl TransformTable {
    /// A table with no entries; every value is escaped.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Add or override one entry.
    #[must_use]
    pub fn with(mut self, key: impl Into<TransformKey>, transform: impl Into<Transform>) -> Self {
        self.insert(key, transform);
        self
    }

    pub fn insert(&mut self, key: impl Into<TransformKey>, transform: impl Into<Transform>) {
        self.entries.insert(key.into(), transform.into());
    }

    /// Merge `overrides` over this table; entries in `overrides` win.
    pub fn merge(&mut self, overrides: TransformTable) {
        self.entries.extend(overrides.entries);
    }

    #[must_use]
    pub fn get(&self, value: &SqlValue) -> Option<&Transform> {
        TransformKey::for_value(value).and_then(|key| self.entries.get(&key))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render a single value: the matching transform if there is one,
    /// otherwise `escape(value)`.
    pub fn render<E>(&self, value: &SqlValue, values: &Values, escape: E) -> String
    where
        E: Fn(&SqlValue) -> String,
    {
        match self.get(value) {
            Some(transform) => transform.render(value, values),
            None => escape(value),
        }
    }

    /// Map every entry of `values` to a ready-to-splice SQL fragment,
    /// keeping the mapping's key order.
    pub fn transform_values<E>(&self, values: &Values, escape: E) -> indexmap::IndexMap<String, String>
    where
        E: Fn(&SqlValue) -> String,
    {
        values
            .iter()
            .map(|(key, raw)| (key.clone(), self.render(raw, values, &escape)))
            .collect()
    }
}
