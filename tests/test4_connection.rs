#![cfg(feature = "sqlite")]
use sql_facade::prelude::*;
use tokio::runtime::Runtime;

const DDL: &str = "CREATE TABLE IF NOT EXISTS items (id INTEGER PRIMARY KEY, name TEXT);";

// Guards the delegation of the reserved connection's execute path: the call
// must reach the worker-owned native connection and take effect there.
#[test]
fn connection_execute_delegates_to_native_connection() -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::new()?;
    let dir = tempfile::TempDir::new()?;
    let db_path = dir.path().join("test4.db").to_string_lossy().into_owned();

    rt.block_on(async {
        let mut db = SqliteDatabase::open(SqliteOptions::new(db_path.as_str())).await?;
        db.execute_batch(DDL).await?;

        let mut conn = db.connection().await?;
        conn.ping().await?;

        let result = conn
            .execute(
                "INSERT INTO items (name) VALUES (?1)",
                &[Value::from("widget")],
            )
            .await?;
        assert_eq!(result.rows_affected(), 1);
        assert_eq!(result.last_insert_id(), 1);

        // The same reserved connection observes its own write.
        let row = conn
            .query_row("SELECT name FROM items WHERE id = 1", &[])
            .await?;
        assert_eq!(row.get("name").unwrap().as_text(), Some("widget"));

        // And so does the rest of the pool.
        let row = db.query_row("SELECT count(*) AS n FROM items", &[]).await?;
        assert_eq!(row.get("n").unwrap().as_int(), Some(1));

        Ok::<(), Box<dyn std::error::Error>>(())
    })?;

    Ok(())
}

#[test]
fn transactions_work_on_reserved_connections() -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::new()?;
    let dir = tempfile::TempDir::new()?;
    let db_path = dir.path().join("test4_tx.db").to_string_lossy().into_owned();

    rt.block_on(async {
        let mut db = SqliteDatabase::open(SqliteOptions::new(db_path.as_str())).await?;
        db.execute_batch(DDL).await?;

        let mut conn = db.connection().await?;
        let mut tx = conn.begin().await?;
        tx.execute("INSERT INTO items (name) VALUES ('kept')", &[])
            .await?;
        tx.commit().await?;

        let row = conn
            .query_row("SELECT count(*) AS n FROM items", &[])
            .await?;
        assert_eq!(row.get("n").unwrap().as_int(), Some(1));

        Ok::<(), Box<dyn std::error::Error>>(())
    })?;

    Ok(())
}

#[test]
fn closed_handles_fail_with_the_closed_sentinel() -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::new()?;
    let dir = tempfile::TempDir::new()?;
    let db_path = dir.path().join("test4_close.db").to_string_lossy().into_owned();

    rt.block_on(async {
        let mut db = SqliteDatabase::open(SqliteOptions::new(db_path.as_str())).await?;
        db.execute_batch(DDL).await?;

        // A closed reserved connection refuses everything afterwards.
        let mut conn = db.connection().await?;
        conn.close().await?;
        let err = conn.ping().await.unwrap_err();
        assert!(err.is_connection_closed());
        let err = conn.execute("INSERT INTO items (name) VALUES ('x')", &[])
            .await
            .unwrap_err();
        assert!(err.is_connection_closed());

        // Closing the database handle poisons everything derived from the
        // pool afterwards, by identity of the sentinel.
        db.close().await?;
        let err = db.query("SELECT 1", &[]).await.unwrap_err();
        assert!(err.is_connection_closed());
        assert!(matches!(err, SqlFacadeError::ConnectionClosed));
        let err = db.connection().await.unwrap_err();
        assert!(err.is_connection_closed());
        let err = db.begin().await.unwrap_err();
        assert!(err.is_connection_closed());

        Ok::<(), Box<dyn std::error::Error>>(())
    })?;

    Ok(())
}
