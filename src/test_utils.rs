//! In-process driver for exercising a [`crate::Chassis`] without a database.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::clauses::InsertForm;
use crate::config::ConnectionOptions;
use crate::driver::Driver;
use crate::error::SqlChassisError;
use crate::escape::EscapeStyle;
use crate::results::{DriverResponse, ResultSet, WriteMetadata, is_select};

/// Records every statement it receives and replies from a script.
///
/// Scripted replies are consumed in order. Once the script runs out, a
/// `SELECT` gets an empty row set and anything else gets zeroed metadata.
#[derive(Debug, Default)]
pub struct RecordingDriver {
    statements: Mutex<Vec<String>>,
    script: Mutex<VecDeque<Result<DriverResponse, SqlChassisError>>>,
    escape_style: EscapeStyle,
    insert_form: InsertForm,
    connect_error: Option<String>,
}

impl RecordingDriver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_escape_style(mut self, style: EscapeStyle) -> Self {
        self.escape_style = style;
        self
    }

    #[must_use]
    pub fn with_insert_form(mut self, form: InsertForm) -> Self {
        self.insert_form = form;
        self
    }

    /// Make `connect` fail with `message`.
    #[must_use]
    pub fn failing_connect(mut self, message: impl Into<String>) -> Self {
        self.connect_error = Some(message.into());
        self
    }

    #[must_use]
    pub fn reply(self, response: DriverResponse) -> Self {
        self.push(Ok(response));
        self
    }

    #[must_use]
    pub fn reply_error(self, error: SqlChassisError) -> Self {
        self.push(Err(error));
        self
    }

    fn push(&self, reply: Result<DriverResponse, SqlChassisError>) {
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(reply);
    }

    /// Every statement received so far, oldest first.
    #[must_use]
    pub fn statements(&self) -> Vec<String> {
        self.statements
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn last_statement(&self) -> Option<String> {
        self.statements
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }
}

#[async_trait]
impl Driver for RecordingDriver {
    /// An `extra` entry `"connect_error": "<message>"` makes `connect` fail.
    fn create(options: &ConnectionOptions) -> Result<Self, SqlChassisError> {
        let driver = Self::new();
        Ok(match options.extra.get("connect_error").and_then(|v| v.as_str()) {
            Some(message) => driver.failing_connect(message),
            None => driver,
        })
    }

    fn name(&self) -> &'static str {
        "recording"
    }

    async fn connect(&self) -> Result<(), SqlChassisError> {
        match &self.connect_error {
            Some(message) => Err(SqlChassisError::ConnectionError(message.clone())),
            None => Ok(()),
        }
    }

    async fn query(&self, sql: &str) -> Result<DriverResponse, SqlChassisError> {
        self.statements
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(sql.to_string());

        let scripted = self
            .script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();
        match scripted {
            Some(reply) => reply,
            None if is_select(sql) => Ok(DriverResponse::rows(ResultSet::default(), Vec::new())),
            None => Ok(DriverResponse::meta(WriteMetadata::default())),
        }
    }

    fn escape_style(&self) -> EscapeStyle {
        self.escape_style
    }

    fn insert_form(&self) -> InsertForm {
        self.insert_form
    }
}
