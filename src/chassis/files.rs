use std::path::{Path, PathBuf};

use tracing::debug;

use crate::driver::Driver;
use crate::error::SqlChassisError;
use crate::results::{QueryResult, ResultSet};
use crate::types::Values;

use super::Chassis;

const SQL_EXTENSION: &str = "sql";

/// Absolute path of a statement file under `sql_path`.
///
/// `.sql` is appended when `name` has no extension, so `get_user` and
/// `get_user.sql` resolve to the same file. Nothing is read or checked here.
///
/// # Errors
/// Returns `SqlChassisError::FileNotFound` if the working directory cannot be
/// determined for a relative `sql_path`.
pub fn resolve_sql_file(sql_path: &Path, name: &str) -> Result<PathBuf, SqlChassisError> {
    let joined = if Path::new(name).extension().is_some() {
        sql_path.join(name)
    } else {
        sql_path.join(format!("{name}.{SQL_EXTENSION}"))
    };
    std::path::absolute(&joined).map_err(|source| SqlChassisError::FileNotFound {
        path: joined,
        source,
    })
}

impl<D: Driver> Chassis<D> {
    /// Load a statement from `sql_path` and run it like [`Chassis::query`].
    ///
    /// The file is read on every call; surrounding whitespace is trimmed.
    ///
    /// # Errors
    /// Returns `SqlChassisError::FileNotFound` if the file cannot be read,
    /// otherwise whatever [`Chassis::query`] returns.
    pub async fn query_file(
        &self,
        name: &str,
        values: Option<&Values>,
    ) -> Result<QueryResult, SqlChassisError> {
        let path = resolve_sql_file(&self.settings.sql_path, name)?;
        debug!(path = %path.display(), "loading statement file");

        let sql = match tokio::fs::read_to_string(&path).await {
            Ok(sql) => sql,
            Err(source) => return Err(SqlChassisError::FileNotFound { path, source }),
        };
        self.query(sql.trim(), values).await
    }

    /// [`Chassis::query_file`], returning only the rows.
    ///
    /// # Errors
    /// See [`Chassis::query_file`].
    pub async fn select_file(
        &self,
        name: &str,
        values: Option<&Values>,
    ) -> Result<ResultSet, SqlChassisError> {
        Ok(self.query_file(name, values).await?.into_rows())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_is_appended_only_when_missing() {
        let base = Path::new("/srv/app/sql");
        assert_eq!(
            resolve_sql_file(base, "get_user").unwrap(),
            resolve_sql_file(base, "get_user.sql").unwrap()
        );
        assert_eq!(
            resolve_sql_file(base, "get_user").unwrap(),
            PathBuf::from("/srv/app/sql/get_user.sql")
        );
        assert_eq!(
            resolve_sql_file(base, "report.tmpl").unwrap(),
            PathBuf::from("/srv/app/sql/report.tmpl")
        );
    }

    #[test]
    fn nested_names_and_relative_base() {
        let resolved = resolve_sql_file(Path::new("./sql"), "reports/daily").unwrap();
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with("sql/reports/daily.sql"));
    }
}
