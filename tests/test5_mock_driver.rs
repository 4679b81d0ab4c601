#![cfg(feature = "test-utils")]
use sql_facade::prelude::*;
use sql_facade::test_utils::MockDriver;
use tokio::runtime::Runtime;

// Application-shaped helper: generic over the seam, knows nothing about
// which driver is behind it.
async fn record_item(
    db: &mut dyn Database,
    name: &str,
) -> Result<ExecResult, SqlFacadeError> {
    let mut conn = db.connection().await?;
    conn.execute(
        "INSERT INTO items (name) VALUES (?1)",
        &[Value::from(name)],
    )
    .await
}

#[test]
fn mock_reports_scripted_exec_outcomes_unchanged() -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::new()?;
    rt.block_on(async {
        let driver = MockDriver::new();
        driver.push_exec(ExecResult::new(3, 42));

        let mut db = driver.database();
        assert_eq!(db.kind(), DatabaseKind::Mock);

        let result = record_item(&mut db, "widget").await?;
        // The driver's reported outcome comes back untouched.
        assert_eq!(result.rows_affected(), 3);
        assert_eq!(result.last_insert_id(), 42);

        // The reserved connection forwarded exactly one execute to the
        // underlying driver, with the SQL and parameters unmodified.
        let calls = driver.calls();
        let executes: Vec<_> = calls
            .iter()
            .filter(|c| c.op == "connection.execute")
            .collect();
        assert_eq!(executes.len(), 1);
        assert_eq!(executes[0].sql, "INSERT INTO items (name) VALUES (?1)");
        assert_eq!(executes[0].params, vec![Value::Text("widget".into())]);

        Ok::<(), Box<dyn std::error::Error>>(())
    })?;
    Ok(())
}

#[test]
fn mock_query_paths_and_sentinels() -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::new()?;
    rt.block_on(async {
        let driver = MockDriver::new();

        let mut scripted = RowSet::new(vec!["id".into(), "name".into()]);
        scripted.push_row(vec![Value::Int(1), Value::Text("Alpha".into())]);
        scripted.push_row(vec![Value::Int(2), Value::Text("Beta".into())]);
        driver.push_rows(scripted);

        let mut db = driver.database();
        let rows = db.query("SELECT id, name FROM items", &[]).await?;
        assert_eq!(rows.len(), 2);
        assert_eq!(rows.rows()[1].get("name").unwrap().as_text(), Some("Beta"));

        // Unscripted single-row queries surface the no-rows sentinel.
        let err = db
            .query_row("SELECT id FROM items WHERE id = 99", &[])
            .await
            .unwrap_err();
        assert!(err.is_no_rows());

        // Scripted failures pass through with their identity intact.
        driver.push_error(SqlFacadeError::ExecutionError("constraint violated".into()));
        let err = db
            .execute("INSERT INTO items (name) VALUES (NULL)", &[])
            .await
            .unwrap_err();
        assert!(matches!(err, SqlFacadeError::ExecutionError(_)));

        Ok::<(), Box<dyn std::error::Error>>(())
    })?;
    Ok(())
}

#[test]
fn mock_transaction_and_close_sentinels() -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::new()?;
    rt.block_on(async {
        let driver = MockDriver::new();
        let mut db = driver.database();

        let mut tx = db.begin().await?;
        tx.execute("DELETE FROM items", &[]).await?;
        tx.rollback().await?;

        let err = tx.execute("DELETE FROM items", &[]).await.unwrap_err();
        assert!(err.is_transaction_finished());
        assert!(matches!(err, SqlFacadeError::TransactionFinished));
        let err = tx.commit().await.unwrap_err();
        assert!(err.is_transaction_finished());

        // Statement rebinding carries the SQL across.
        let mut tx = db.begin().await?;
        let stmt = db.prepare("UPDATE items SET name = ?1").await?;
        let tx_stmt = tx.statement(&*stmt).await?;
        assert_eq!(tx_stmt.sql(), "UPDATE items SET name = ?1");
        tx.commit().await?;

        db.close().await?;
        let err = db.ping().await.unwrap_err();
        assert!(err.is_connection_closed());
        let err = db.query("SELECT 1", &[]).await.unwrap_err();
        assert!(err.is_connection_closed());
        let err = db.connection().await.unwrap_err();
        assert!(err.is_connection_closed());

        Ok::<(), Box<dyn std::error::Error>>(())
    })?;
    Ok(())
}
