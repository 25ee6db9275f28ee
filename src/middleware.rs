//! Before-query and after-results hooks.
//!
//! Hooks run synchronously in registration order, each receiving the
//! previous hook's output. There is no way to remove a hook once added.

use std::fmt;
use std::sync::Arc;

use crate::error::SqlChassisError;
use crate::results::Results;
use crate::types::Values;

/// `(current sql, values) -> sql`
pub type BeforeQueryFn = dyn Fn(&str, &Values) -> Result<String, SqlChassisError> + Send + Sync;

/// `(original unbound sql, current results) -> results`
pub type AfterResultsFn = dyn Fn(&str, Results) -> Result<Results, SqlChassisError> + Send + Sync;

/// Ordered hook lists owned by a [`crate::Chassis`].
#[derive(Clone, Default)]
pub struct MiddlewareRegistry {
    before_query: Vec<Arc<BeforeQueryFn>>,
    after_results: Vec<Arc<AfterResultsFn>>,
}

impl MiddlewareRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_before_query<F>(&mut self, hook: F)
    where
        F: Fn(&str, &Values) -> String + Send + Sync + 'static,
    {
        self.before_query.push(Arc::new(move |sql: &str, values: &Values| {
            Ok::<_, SqlChassisError>(hook(sql, values))
        }));
    }

    /// Register a before-query hook that can abort the call.
    pub fn try_on_before_query<F>(&mut self, hook: F)
    where
        F: Fn(&str, &Values) -> Result<String, SqlChassisError> + Send + Sync + 'static,
    {
        self.before_query.push(Arc::new(hook));
    }

    pub fn on_results<F>(&mut self, hook: F)
    where
        F: Fn(&str, Results) -> Results + Send + Sync + 'static,
    {
        self.after_results.push(Arc::new(move |sql: &str, results: Results| {
            Ok::<_, SqlChassisError>(hook(sql, results))
        }));
    }

    /// Register an after-results hook that can abort the call.
    pub fn try_on_results<F>(&mut self, hook: F)
    where
        F: Fn(&str, Results) -> Result<Results, SqlChassisError> + Send + Sync + 'static,
    {
        self.after_results.push(Arc::new(hook));
    }

    /// Thread `sql` through every before-query hook.
    ///
    /// # Errors
    /// Returns the first error raised by a hook; later hooks do not run.
    pub fn apply_before_query(&self, sql: &str, values: &Values) -> Result<String, SqlChassisError> {
        let mut current = sql.to_string();
        for hook in &self.before_query {
            current = hook(&current, values)?;
        }
        Ok(current)
    }

    /// Thread `results` through every after-results hook.
    ///
    /// # Errors
    /// Returns the first error raised by a hook; later hooks do not run.
    pub fn apply_results(&self, sql: &str, results: Results) -> Result<Results, SqlChassisError> {
        let mut current = results;
        for hook in &self.after_results {
            current = hook(sql, current)?;
        }
        Ok(current)
    }

    #[must_use]
    pub fn before_query_len(&self) -> usize {
        self.before_query.len()
    }

    #[must_use]
    pub fn results_len(&self) -> usize {
        self.after_results.len()
    }
}

impl fmt::Debug for MiddlewareRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MiddlewareRegistry")
            .field("before_query", &self.before_query.len())
            .field("after_results", &self.after_results.len())
            .finish()
    }
}
