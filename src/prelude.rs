//! Convenient imports for common functionality.

pub use crate::binding::{bind_values, placeholder_names};
pub use crate::chassis::{Chassis, Settings, resolve_sql_file};
pub use crate::clauses::{
    Condition, Fields, InsertForm, build_assignment_list, build_insert, build_where_clause,
};
pub use crate::config::{ChassisOptions, ChassisOptionsBuilder, ConnectionOptions};
pub use crate::driver::Driver;
pub use crate::error::SqlChassisError;
pub use crate::escape::{EscapeStyle, escape_value};
pub use crate::middleware::MiddlewareRegistry;
pub use crate::results::{
    DbRow, DriverResponse, FieldInfo, QueryResult, ResultSet, Results, WriteMetadata,
};
pub use crate::transform::{Transform, TransformKey, TransformTable};
pub use crate::types::{SqlValue, Values};
pub use crate::values;

#[cfg(feature = "mysql")]
pub use crate::mysql::MySqlDriver;
#[cfg(feature = "sqlite")]
pub use crate::sqlite::SqliteDriver;
#[cfg(feature = "test-utils")]
pub use crate::test_utils::RecordingDriver;
