#![cfg(feature = "mysql")]

use std::env;

use sql_chassis::prelude::*;

/// Options for a scratch MySQL database, or `None` when `TESTING_MYSQL_DATABASE` is unset.
fn mysql_options() -> Option<ChassisOptions> {
    let database = env::var("TESTING_MYSQL_DATABASE").ok()?;
    let mut builder = ChassisOptions::builder()
        .host(env::var("TESTING_MYSQL_HOST").unwrap_or_else(|_| "localhost".into()))
        .user(env::var("TESTING_MYSQL_USER").unwrap_or_else(|_| "root".into()))
        .password(env::var("TESTING_MYSQL_PASSWORD").unwrap_or_default())
        .database(database);
    if let Some(port) = env::var("TESTING_MYSQL_PORT").ok().and_then(|p| p.parse().ok()) {
        builder = builder.port(port);
    }
    Some(builder.finish())
}

#[tokio::test]
async fn empty_select_still_reports_columns() -> Result<(), Box<dyn std::error::Error>> {
    let Some(options) = mysql_options() else {
        return Ok(());
    };
    let db = Chassis::<MySqlDriver>::open(options)?;

    db.query("DROP TABLE IF EXISTS chassis_empty_select", None).await?;
    db.query(
        "CREATE TABLE chassis_empty_select (id INT PRIMARY KEY, name VARCHAR(20))",
        None,
    )
    .await?;

    let result = db
        .query("SELECT id, name FROM chassis_empty_select WHERE id = :id", Some(&values! { "id" => 1 }))
        .await?;
    let names: Vec<&str> = result.fields().iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, ["id", "name"]);
    assert!(result.into_rows().is_empty());

    let inserted = db
        .insert("chassis_empty_select", &values! { "id" => 7, "name" => "" })
        .await?;
    assert_eq!(inserted.affected_rows(), 1);
    let rows = db
        .select_where("name", "chassis_empty_select", Some(values! { "id" => 7 }.into()))
        .await?;
    assert_eq!(rows.rows()[0].get("name"), Some(&SqlValue::Null));

    db.query("DROP TABLE chassis_empty_select", None).await?;
    Ok(())
}
