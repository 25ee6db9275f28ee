use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use indexmap::IndexMap;
use tracing::{debug, error};

use crate::binding;
use crate::clauses::{self, Condition};
use crate::config::ChassisOptions;
use crate::driver::Driver;
use crate::error::SqlChassisError;
use crate::middleware::MiddlewareRegistry;
use crate::results::Results;
use crate::transform::TransformTable;
use crate::types::{SqlValue, Values};

mod files;
mod query;
mod statements;

pub use files::resolve_sql_file;

/// Library-level settings fixed at construction.
#[derive(Debug, Clone)]
pub struct Settings {
    pub sql_path: PathBuf,
    pub transforms: TransformTable,
}

/// Statement facade over a single driver connection.
///
/// Holds the immutable [`Settings`] and the middleware lists. Statements may
/// be issued concurrently through `&self`; registering middleware needs
/// `&mut self`, so it happens before the facade is shared.
///
/// ```rust,no_run
/// use sql_chassis::prelude::*;
///
/// # async fn demo() -> Result<(), SqlChassisError> {
/// let opts = ChassisOptions::builder()
///     .database("demo.db")
///     .sql_path("./sql")
///     .finish();
/// let mut db = Chassis::<SqliteDriver>::open(opts)?;
/// db.on_before_query(|sql, _| sql.replace("/*tenant*/", "tenant_id = 7 AND"));
///
/// let users = db
///     .select("SELECT * FROM user WHERE /*tenant*/ user_id = :id", Some(&values! { "id" => 1 }))
///     .await?;
/// let _ = users;
/// db.update("user", &values! { "updated_at" => "NOW()" }, Some(values! { "user_id" => 1 }.into()))
///     .await?;
/// # Ok(()) }
/// ```
pub struct Chassis<D: Driver> {
    driver: Arc<D>,
    settings: Settings,
    middleware: MiddlewareRegistry,
}

impl<D: Driver + 'static> Chassis<D> {
    /// Create the driver and start connecting in the background.
    ///
    /// A failed connection attempt is only logged; use
    /// [`Chassis::open_with_error_callback`] to observe it.
    ///
    /// # Errors
    /// Returns `SqlChassisError::ConfigError` if the driver rejects the options
    /// or no tokio runtime is running.
    pub fn open(options: ChassisOptions) -> Result<Self, SqlChassisError> {
        Self::open_with_error_callback(options, |_| {})
    }

    /// Like [`Chassis::open`], invoking `on_error` once if the initial
    /// connection attempt fails.
    ///
    /// # Errors
    /// Returns `SqlChassisError::ConfigError` if the driver rejects the options
    /// or no tokio runtime is running.
    pub fn open_with_error_callback<F>(
        options: ChassisOptions,
        on_error: F,
    ) -> Result<Self, SqlChassisError>
    where
        F: FnOnce(SqlChassisError) + Send + 'static,
    {
        let runtime = tokio::runtime::Handle::try_current().map_err(|e| {
            SqlChassisError::ConfigError(format!("a tokio runtime is required to connect: {e}"))
        })?;

        let ChassisOptions {
            connection,
            sql_path,
            transforms,
        } = options;
        let driver = Arc::new(D::create(&connection)?);

        let handle = Arc::clone(&driver);
        runtime.spawn(async move {
            if let Err(err) = handle.connect().await {
                error!(driver = handle.name(), error = %err, "initial connection attempt failed");
                let err = match err {
                    conn @ SqlChassisError::ConnectionError(_) => conn,
                    other => SqlChassisError::ConnectionError(other.to_string()),
                };
                on_error(err);
            }
        });

        Ok(Self::with_settings(driver, Settings {
            sql_path,
            transforms,
        }))
    }
}

impl<D: Driver> Chassis<D> {
    /// Wrap an existing driver without connecting it.
    #[must_use]
    pub fn from_driver(driver: D, options: ChassisOptions) -> Self {
        Self::with_settings(Arc::new(driver), Settings {
            sql_path: options.sql_path,
            transforms: options.transforms,
        })
    }

    fn with_settings(driver: Arc<D>, settings: Settings) -> Self {
        Self {
            driver,
            settings,
            middleware: MiddlewareRegistry::new(),
        }
    }

    #[must_use]
    pub fn driver(&self) -> &D {
        &self.driver
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[must_use]
    pub fn sql_path(&self) -> &Path {
        &self.settings.sql_path
    }

    #[must_use]
    pub fn middleware(&self) -> &MiddlewareRegistry {
        &self.middleware
    }

    /// Rewrite SQL before binding. Receives the current SQL and the call's values.
    pub fn on_before_query<F>(&mut self, hook: F)
    where
        F: Fn(&str, &Values) -> String + Send + Sync + 'static,
    {
        self.middleware.on_before_query(hook);
        debug!(count = self.middleware.before_query_len(), "registered before-query middleware");
    }

    pub fn try_on_before_query<F>(&mut self, hook: F)
    where
        F: Fn(&str, &Values) -> Result<String, SqlChassisError> + Send + Sync + 'static,
    {
        self.middleware.try_on_before_query(hook);
        debug!(count = self.middleware.before_query_len(), "registered before-query middleware");
    }

    /// Rewrite driver results. Receives the original, unbound SQL.
    pub fn on_results<F>(&mut self, hook: F)
    where
        F: Fn(&str, Results) -> Results + Send + Sync + 'static,
    {
        self.middleware.on_results(hook);
        debug!(count = self.middleware.results_len(), "registered results middleware");
    }

    pub fn try_on_results<F>(&mut self, hook: F)
    where
        F: Fn(&str, Results) -> Result<Results, SqlChassisError> + Send + Sync + 'static,
    {
        self.middleware.try_on_results(hook);
        debug!(count = self.middleware.results_len(), "registered results middleware");
    }

    /// Escape a value the way the driver would.
    #[must_use]
    pub fn escape(&self, value: &SqlValue) -> String {
        self.driver.escape(value)
    }

    /// Substitute `:name` placeholders with escaped values.
    #[must_use]
    pub fn bind_values<'a>(&self, sql: &'a str, values: Option<&Values>) -> Cow<'a, str> {
        binding::bind_values(sql, values, |v| self.driver.escape(v))
    }

    /// Render every value through the transform table.
    #[must_use]
    pub fn transform_values(&self, values: &Values) -> IndexMap<String, String> {
        self.settings
            .transforms
            .transform_values(values, |v| self.driver.escape(v))
    }

    /// `` `col` = fragment `` pairs for INSERT/UPDATE.
    #[must_use]
    pub fn assignment_list(&self, values: &Values) -> String {
        clauses::build_assignment_list(values, &self.settings.transforms, |v| {
            self.driver.escape(v)
        })
    }

    #[must_use]
    pub fn where_clause(&self, condition: Option<&Condition>) -> Option<String> {
        clauses::build_where_clause(condition, |v| self.driver.escape(v))
    }
}

impl<D: Driver> std::fmt::Debug for Chassis<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chassis")
            .field("driver", &self.driver.name())
            .field("settings", &self.settings)
            .field("middleware", &self.middleware)
            .finish()
    }
}
