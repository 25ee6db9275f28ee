//! Named-placeholder SQL templates, shorthand statement builders and query
//! middleware over a pluggable database driver.
//!
//! ```rust,no_run
//! use sql_chassis::prelude::*;
//!
//! # async fn demo() -> Result<(), SqlChassisError> {
//! let db = Chassis::<SqliteDriver>::open(ChassisOptions::builder().database("app.db").finish())?;
//! let users = db
//!     .select("SELECT * FROM user WHERE user_id = :id", Some(&values! { "id" => 1 }))
//!     .await?;
//! for row in &users {
//!     println!("{:?}", row.get("name"));
//! }
//! # Ok(()) }
//! ```

pub mod binding;
pub mod chassis;
pub mod clauses;
pub mod config;
pub mod driver;
pub mod error;
pub mod escape;
pub mod middleware;
pub mod prelude;
pub mod results;
pub mod transform;
pub mod types;

#[cfg(feature = "mysql")]
pub mod mysql;
#[cfg(feature = "sqlite")]
pub mod sqlite;
#[cfg(feature = "test-utils")]
pub mod test_utils;

pub use chassis::Chassis;
pub use error::SqlChassisError;
