use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::SqlChassisError;
use crate::transform::{Transform, TransformKey, TransformTable};

const DEFAULT_SQL_PATH: &str = "./sql";

/// Driver-level connection parameters.
///
/// Unknown keys in a deserialized document land in `extra` and are handed to
/// the driver untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConnectionOptions {
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub database: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, JsonValue>,
}

/// Settings owned by a [`crate::Chassis`]: connection parameters, the
/// statement-file directory, and the transform table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChassisOptions {
    #[serde(flatten)]
    pub connection: ConnectionOptions,
    #[serde(default = "default_sql_path", alias = "sqlPath")]
    pub sql_path: PathBuf,
    #[serde(skip)]
    pub transforms: TransformTable,
}

fn default_sql_path() -> PathBuf {
    PathBuf::from(DEFAULT_SQL_PATH)
}

impl Default for ChassisOptions {
    fn default() -> Self {
        Self {
            connection: ConnectionOptions::default(),
            sql_path: default_sql_path(),
            transforms: TransformTable::default(),
        }
    }
}

impl ChassisOptions {
    #[must_use]
    pub fn builder() -> ChassisOptionsBuilder {
        ChassisOptionsBuilder::default()
    }

    /// Parse options from a JSON document such as
    /// `{"host": "localhost", "user": "app", "database": "shop", "sqlPath": "./queries"}`.
    ///
    /// The transform table always starts from the defaults.
    ///
    /// # Errors
    /// Returns `SqlChassisError::ConfigError` if the document is malformed.
    pub fn from_json(document: &str) -> Result<Self, SqlChassisError> {
        Ok(serde_json::from_str(document)?)
    }
}

/// Fluent builder for [`ChassisOptions`].
///
/// ```rust
/// use sql_chassis::prelude::*;
///
/// let opts = ChassisOptions::builder()
///     .host("localhost")
///     .user("app")
///     .database("shop")
///     .sql_path("./queries")
///     .transform("TODAY()", "CURDATE()")
///     .finish();
/// assert_eq!(opts.connection.password, "");
/// assert_eq!(opts.transforms.len(), 5);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ChassisOptionsBuilder {
    opts: ChassisOptions,
}

impl ChassisOptionsBuilder {
    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.opts.connection.host = Some(host.into());
        self
    }

    #[must_use]
    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.opts.connection.user = Some(user.into());
        self
    }

    #[must_use]
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.opts.connection.password = password.into();
        self
    }

    #[must_use]
    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.opts.connection.database = Some(database.into());
        self
    }

    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.opts.connection.port = Some(port);
        self
    }

    /// Set a driver-specific connection field.
    #[must_use]
    pub fn extra(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.opts.connection.extra.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn sql_path(mut self, sql_path: impl Into<PathBuf>) -> Self {
        self.opts.sql_path = sql_path.into();
        self
    }

    /// Add or override a transform table entry.
    #[must_use]
    pub fn transform(mut self, key: impl Into<TransformKey>, transform: impl Into<Transform>) -> Self {
        self.opts.transforms.insert(key, transform);
        self
    }

    /// Merge a whole table over the defaults.
    #[must_use]
    pub fn transforms(mut self, overrides: TransformTable) -> Self {
        self.opts.transforms.merge(overrides);
        self
    }

    #[must_use]
    pub fn finish(self) -> ChassisOptions {
        self.opts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let opts = ChassisOptions::default();
        assert_eq!(opts.sql_path, PathBuf::from("./sql"));
        assert_eq!(opts.connection.password, "");
        assert_eq!(opts.transforms.len(), 4);
    }

    #[test]
    fn json_document_with_camel_case_sql_path_and_extras() {
        let opts = ChassisOptions::from_json(
            r#"{"host":"db","user":"app","database":"shop","port":3307,
                "sqlPath":"./queries","charset":"utf8mb4"}"#,
        )
        .unwrap();
        assert_eq!(opts.connection.host.as_deref(), Some("db"));
        assert_eq!(opts.connection.port, Some(3307));
        assert_eq!(opts.sql_path, PathBuf::from("./queries"));
        assert_eq!(
            opts.connection.extra.get("charset"),
            Some(&JsonValue::from("utf8mb4"))
        );
        assert_eq!(opts.transforms.len(), 4);
    }

    #[test]
    fn malformed_document_is_config_error() {
        let err = ChassisOptions::from_json("{\"port\": \"not a number\"}").unwrap_err();
        assert!(matches!(err, SqlChassisError::ConfigError(_)));
    }

    #[test]
    fn builder_overrides_default_transform() {
        let opts = ChassisOptions::builder()
            .transform(TransformKey::EmptyString, "''")
            .finish();
        assert_eq!(opts.transforms.len(), 4);
    }
}
