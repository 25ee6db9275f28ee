#![cfg(feature = "sqlite")]

use sql_chassis::prelude::*;
use tempfile::tempdir;

async fn seeded() -> Result<Chassis<SqliteDriver>, SqlChassisError> {
    let db = Chassis::from_driver(SqliteDriver::in_memory(), ChassisOptions::default());
    db.query(
        "CREATE TABLE user (user_id INTEGER PRIMARY KEY, name TEXT, nickname TEXT, score REAL)",
        None,
    )
    .await?;
    db.query(
        "INSERT INTO user (user_id, name, nickname, score) VALUES (1, 'Ann', NULL, 1.5), (2, 'Bob', 'bobby', 2.0)",
        None,
    )
    .await?;
    Ok(db)
}

#[tokio::test]
async fn bound_select_returns_rows_and_fields() -> Result<(), Box<dyn std::error::Error>> {
    let db = seeded().await?;
    let result = db
        .query(
            "SELECT user_id, name FROM user WHERE name = :name",
            Some(&values! { "name" => "Bob" }),
        )
        .await?;

    assert_eq!(result.sql(), "SELECT user_id, name FROM user WHERE name = 'Bob'");
    let names: Vec<&str> = result.fields().iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, ["user_id", "name"]);
    let rows = result.into_rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows.rows()[0].get("user_id"), Some(&SqlValue::Int(2)));
    Ok(())
}

#[tokio::test]
async fn select_where_update_and_delete_round_trip() -> Result<(), Box<dyn std::error::Error>> {
    let db = seeded().await?;

    let rows = db
        .select_where("user_id, nickname", "user", Some(values! { "nickname" => SqlValue::Null }.into()))
        .await?;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows.rows()[0].get("user_id"), Some(&SqlValue::Int(1)));

    let updated = db
        .update(
            "user",
            &values! { "nickname" => "", "name" => "Ann O'Neil" },
            Some(values! { "user_id" => 2 }.into()),
        )
        .await?;
    assert_eq!(updated.affected_rows(), 1);
    assert_eq!(updated.insert_id(), None);

    let rows = db
        .select("SELECT name, nickname FROM user WHERE user_id = :id", Some(&values! { "id" => 2 }))
        .await?;
    assert_eq!(rows.rows()[0].get("name"), Some(&SqlValue::from("Ann O'Neil")));
    assert_eq!(rows.rows()[0].get("nickname"), Some(&SqlValue::Null));

    let deleted = db.delete("user", None).await?;
    assert_eq!(deleted.affected_rows(), 2);
    assert!(db.select("SELECT * FROM user", None).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn insert_writes_a_row_with_transformed_values() -> Result<(), Box<dyn std::error::Error>> {
    let db = seeded().await?;

    let inserted = db
        .insert(
            "user",
            &values! { "user_id" => 3, "name" => "Cy", "nickname" => "", "score" => 4.5 },
        )
        .await?;
    assert_eq!(
        inserted.sql(),
        "INSERT INTO `user` (`user_id`, `name`, `nickname`, `score`) VALUES (3, 'Cy', NULL, 4.5)"
    );
    assert_eq!(inserted.affected_rows(), 1);
    assert_eq!(inserted.insert_id(), Some(3));

    let auto = db.insert("user", &values! { "name" => "Dee" }).await?;
    assert_eq!(auto.insert_id(), Some(4));

    let rows = db
        .select_where("name, nickname, score", "user", Some(values! { "user_id" => 3 }.into()))
        .await?;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows.rows()[0].get("name"), Some(&SqlValue::from("Cy")));
    assert_eq!(rows.rows()[0].get("nickname"), Some(&SqlValue::Null));
    assert_eq!(rows.rows()[0].get("score"), Some(&SqlValue::Float(4.5)));
    Ok(())
}

#[tokio::test]
async fn lowercase_and_indented_select_is_classified_as_read() -> Result<(), Box<dyn std::error::Error>> {
    let db = seeded().await?;
    for sql in ["  select 1 AS one", "Select 1 AS one"] {
        let result = db.query(sql, None).await?;
        assert!(matches!(result, QueryResult::Select { .. }), "{sql}");
        assert_eq!(result.into_rows().rows()[0].get("one"), Some(&SqlValue::Int(1)));
    }
    Ok(())
}

#[tokio::test]
async fn sqlite_errors_are_wrapped_with_sql() -> Result<(), Box<dyn std::error::Error>> {
    let db = seeded().await?;
    let err = db
        .query("SELECT * FROM missing WHERE id = :id", Some(&values! { "id" => 1 }))
        .await
        .unwrap_err();
    assert_eq!(err.sql(), Some("SELECT * FROM missing WHERE id = 1"));
    assert!(matches!(err.driver_error(), Some(SqlChassisError::SqliteError(_))));
    Ok(())
}

#[tokio::test]
async fn file_database_is_created_on_open() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("chassis.db");
    let options = ChassisOptions::builder()
        .database(path.to_string_lossy())
        .finish();
    let db = Chassis::<SqliteDriver>::open(options)?;

    db.query("CREATE TABLE kv (k TEXT PRIMARY KEY, v TEXT)", None).await?;
    let inserted = db
        .query("INSERT INTO kv (k, v) VALUES (:k, :v)", Some(&values! { "k" => "a", "v" => "1" }))
        .await?;
    assert_eq!(inserted.affected_rows(), 1);
    assert!(path.exists());
    Ok(())
}
