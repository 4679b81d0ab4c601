#![cfg(feature = "sqlite")]
use sql_facade::prelude::*;
use tokio::runtime::Runtime;

const DDL: &str = "CREATE TABLE IF NOT EXISTS kv (k TEXT PRIMARY KEY, v INTEGER NOT NULL);";

#[test]
fn pool_statement_reuse() -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::new()?;
    let dir = tempfile::TempDir::new()?;
    let db_path = dir.path().join("test3.db").to_string_lossy().into_owned();

    rt.block_on(async {
        let mut db = SqliteDatabase::builder(db_path.as_str())
            .max_connections(3)
            .build()
            .await?;
        db.execute_batch(DDL).await?;

        let mut insert = db.prepare("INSERT INTO kv (k, v) VALUES (?1, ?2)").await?;
        assert_eq!(insert.sql(), "INSERT INTO kv (k, v) VALUES (?1, ?2)");

        // One handle, many executions, possibly on different pooled
        // connections.
        for (k, v) in [("one", 1_i64), ("two", 2), ("three", 3)] {
            let result = insert.execute(&[Value::from(k), Value::Int(v)]).await?;
            assert_eq!(result.rows_affected(), 1);
        }

        let mut lookup = db.prepare("SELECT v FROM kv WHERE k = ?1").await?;
        let row = lookup.query_row(&[Value::from("two")]).await?;
        assert_eq!(row.get("v").unwrap().as_int(), Some(2));

        let rows = lookup.query(&[Value::from("nope")]).await?;
        assert!(rows.is_empty());
        let err = lookup.query_row(&[Value::from("nope")]).await.unwrap_err();
        assert!(err.is_no_rows());

        // Closing the handle stops further use.
        lookup.close().await?;
        let err = lookup.query_row(&[Value::from("one")]).await.unwrap_err();
        assert!(matches!(err, SqlFacadeError::ExecutionError(_)));

        // Invalid SQL is rejected by the driver at prepare time and passed
        // through untranslated.
        let err = db.prepare("SELEKT * FROM kv").await.unwrap_err();
        assert!(matches!(err, SqlFacadeError::SqliteError(_)));

        Ok::<(), Box<dyn std::error::Error>>(())
    })?;

    Ok(())
}

#[test]
fn connection_statement_is_bound_to_its_connection() -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::new()?;
    let dir = tempfile::TempDir::new()?;
    let db_path = dir.path().join("test3_conn.db").to_string_lossy().into_owned();

    rt.block_on(async {
        let mut db = SqliteDatabase::open(SqliteOptions::new(db_path.as_str())).await?;
        db.execute_batch(DDL).await?;

        let mut conn = db.connection().await?;
        let mut insert = conn.prepare("INSERT INTO kv (k, v) VALUES (?1, ?2)").await?;
        insert.execute(&[Value::from("a"), Value::Int(10)]).await?;
        insert.execute(&[Value::from("b"), Value::Int(20)]).await?;

        let row = conn
            .query_row("SELECT sum(v) AS total FROM kv", &[])
            .await?;
        assert_eq!(row.get("total").unwrap().as_int(), Some(30));

        // Closing the connection kills statements derived from it.
        conn.close().await?;
        let err = insert
            .execute(&[Value::from("c"), Value::Int(30)])
            .await
            .unwrap_err();
        assert!(err.is_connection_closed());

        Ok::<(), Box<dyn std::error::Error>>(())
    })?;

    Ok(())
}
