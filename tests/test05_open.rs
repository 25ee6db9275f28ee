use std::time::Duration;

use sql_chassis::prelude::*;
use tokio::sync::oneshot;
use tokio::time::timeout;

#[tokio::test]
async fn connect_failure_reaches_callback_once() -> Result<(), Box<dyn std::error::Error>> {
    let options = ChassisOptions::builder()
        .extra("connect_error", "access denied for user 'app'")
        .finish();
    let (tx, rx) = oneshot::channel();
    let db = Chassis::<RecordingDriver>::open_with_error_callback(options, move |err| {
        let _ = tx.send(err);
    })?;

    let err = timeout(Duration::from_secs(5), rx).await??;
    assert!(matches!(
        err,
        SqlChassisError::ConnectionError(msg) if msg.contains("access denied")
    ));

    // The facade stays usable; each statement goes to the driver on its own.
    let result = db.query("SELECT 1", None).await?;
    assert!(result.rows().is_some());
    Ok(())
}

#[tokio::test]
async fn successful_connect_never_calls_back() -> Result<(), Box<dyn std::error::Error>> {
    let (tx, rx) = oneshot::channel::<SqlChassisError>();
    let db = Chassis::<RecordingDriver>::open_with_error_callback(ChassisOptions::default(), move |err| {
        let _ = tx.send(err);
    })?;
    // The callback is dropped unused once the connect task finishes.
    assert!(timeout(Duration::from_secs(5), rx).await?.is_err());
    assert_eq!(db.settings().transforms.len(), 4);
    assert_eq!(db.sql_path(), std::path::Path::new("./sql"));
    Ok(())
}

#[test]
fn open_outside_a_runtime_is_a_config_error() {
    let err = Chassis::<RecordingDriver>::open(ChassisOptions::default()).unwrap_err();
    assert!(matches!(err, SqlChassisError::ConfigError(_)));
}

#[test]
fn options_from_json_document() -> Result<(), SqlChassisError> {
    let options = ChassisOptions::from_json(
        r#"{"host": "localhost", "user": "app", "password": "secret", "database": "shop", "sqlPath": "./queries"}"#,
    )?;
    let db = Chassis::from_driver(RecordingDriver::new(), options);
    assert_eq!(db.sql_path(), std::path::Path::new("./queries"));
    Ok(())
}
