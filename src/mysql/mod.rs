//! `MySQL` driver backed by a single sqlx connection.
//!
//! Statements are sent without bound arguments, so sqlx uses the text
//! protocol and the server sees exactly the bound SQL.

mod decode;

use std::fmt;

use async_trait::async_trait;
use futures_util::TryStreamExt;
use sqlx::mysql::{MySqlColumn, MySqlConnectOptions, MySqlConnection, MySqlRow};
use sqlx::{Column, Connection, Either, Executor, Row, Statement, TypeInfo};
use tokio::sync::Mutex;
use tracing::debug;

use crate::config::ConnectionOptions;
use crate::driver::Driver;
use crate::error::SqlChassisError;
use crate::results::{DriverResponse, FieldInfo, ResultSet, WriteMetadata, is_select};

pub use decode::mysql_extract_value;

const DEFAULT_HOST: &str = "localhost";
const DEFAULT_PORT: u16 = 3306;

pub struct MySqlDriver {
    options: MySqlConnectOptions,
    conn: Mutex<Option<MySqlConnection>>,
}

impl MySqlDriver {
    #[must_use]
    pub fn new(options: MySqlConnectOptions) -> Self {
        Self {
            options,
            conn: Mutex::new(None),
        }
    }

    async fn open(&self) -> Result<MySqlConnection, SqlChassisError> {
        debug!(
            host = self.options.get_host(),
            port = self.options.get_port(),
            "opening mysql connection"
        );
        MySqlConnection::connect_with(&self.options)
            .await
            .map_err(|e| SqlChassisError::ConnectionError(format!("mysql connect failed: {e}")))
    }
}

#[async_trait]
impl Driver for MySqlDriver {
    fn create(options: &ConnectionOptions) -> Result<Self, SqlChassisError> {
        let mut connect = MySqlConnectOptions::new()
            .host(options.host.as_deref().unwrap_or(DEFAULT_HOST))
            .port(options.port.unwrap_or(DEFAULT_PORT))
            .password(&options.password);
        if let Some(user) = &options.user {
            connect = connect.username(user);
        }
        if let Some(database) = &options.database {
            connect = connect.database(database);
        }
        if let Some(charset) = options.extra.get("charset") {
            let charset = charset.as_str().ok_or_else(|| {
                SqlChassisError::ConfigError("mysql charset must be a string".into())
            })?;
            connect = connect.charset(charset);
        }
        if let Some(socket) = options.extra.get("socketPath").and_then(|v| v.as_str()) {
            connect = connect.socket(socket);
        }
        Ok(Self::new(connect))
    }

    fn name(&self) -> &'static str {
        "mysql"
    }

    async fn connect(&self) -> Result<(), SqlChassisError> {
        let mut guard = self.conn.lock().await;
        if guard.is_none() {
            *guard = Some(self.open().await?);
        }
        Ok(())
    }

    async fn query(&self, sql: &str) -> Result<DriverResponse, SqlChassisError> {
        let mut guard = self.conn.lock().await;
        if guard.is_none() {
            *guard = Some(self.open().await?);
        }
        let conn = guard.as_mut().ok_or_else(|| {
            SqlChassisError::ConnectionError("mysql connection is not open".into())
        })?;

        let mut rows: Vec<MySqlRow> = Vec::new();
        let mut metadata = WriteMetadata::default();
        {
            let mut stream = (&mut *conn).fetch_many(sql);
            while let Some(step) = stream.try_next().await? {
                match step {
                    Either::Left(done) => {
                        metadata.affected_rows += done.rows_affected();
                        let id = done.last_insert_id();
                        if id != 0 {
                            metadata.insert_id = i64::try_from(id).ok();
                        }
                    }
                    Either::Right(row) => rows.push(row),
                }
            }
        }

        let Some(first) = rows.first() else {
            if !is_select(sql) {
                return Ok(DriverResponse::meta(metadata));
            }
            // No row to read columns from; ask the server for the statement's shape.
            let statement = (&mut *conn).prepare(sql).await?;
            let fields = field_infos(statement.columns());
            let result_set = ResultSet::new(fields.iter().map(|f| f.name.clone()).collect());
            return Ok(DriverResponse::rows(result_set, fields));
        };

        let fields = field_infos(first.columns());
        let mut result_set = ResultSet::new(fields.iter().map(|f| f.name.clone()).collect());
        for row in &rows {
            let mut values = Vec::with_capacity(fields.len());
            for idx in 0..fields.len() {
                values.push(mysql_extract_value(row, idx)?);
            }
            result_set.add_row_values(values);
        }

        Ok(DriverResponse::rows(result_set, fields))
    }
}

fn field_infos(columns: &[MySqlColumn]) -> Vec<FieldInfo> {
    columns
        .iter()
        .map(|col| FieldInfo {
            name: col.name().to_string(),
            type_name: Some(col.type_info().name().to_string()),
        })
        .collect()
}

impl fmt::Debug for MySqlDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MySqlDriver")
            .field("host", &self.options.get_host())
            .field("port", &self.options.get_port())
            .field("database", &self.options.get_database())
            .finish_non_exhaustive()
    }
}
