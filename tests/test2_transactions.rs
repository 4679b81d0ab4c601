#![cfg(feature = "sqlite")]
use sql_facade::prelude::*;
use tokio::runtime::Runtime;

const DDL: &str = "CREATE TABLE IF NOT EXISTS events (id INTEGER PRIMARY KEY, label TEXT NOT NULL);";

#[test]
fn commit_and_rollback_round_trip() -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::new()?;
    let dir = tempfile::TempDir::new()?;
    let db_path = dir.path().join("test2.db").to_string_lossy().into_owned();

    rt.block_on(async {
        let mut db = SqliteDatabase::open(SqliteOptions::new(db_path.as_str())).await?;
        db.execute_batch(DDL).await?;

        // Committed work is visible to the rest of the pool.
        let mut tx = db.begin().await?;
        let result = tx
            .execute(
                "INSERT INTO events (label) VALUES (?1)",
                &[Value::Text("committed".into())],
            )
            .await?;
        assert_eq!(result.rows_affected(), 1);

        // Reads inside the transaction see its own writes.
        let row = tx
            .query_row("SELECT count(*) AS n FROM events", &[])
            .await?;
        assert_eq!(row.get("n").unwrap().as_int(), Some(1));
        tx.commit().await?;

        let row = db.query_row("SELECT label FROM events", &[]).await?;
        assert_eq!(row.get("label").unwrap().as_text(), Some("committed"));

        // Rolled-back work disappears.
        let mut tx = db.begin_with(TxOptions::new(TxBehavior::Immediate)).await?;
        tx.execute(
            "INSERT INTO events (label) VALUES (?1)",
            &[Value::Text("discarded".into())],
        )
        .await?;
        tx.rollback().await?;

        let row = db.query_row("SELECT count(*) AS n FROM events", &[]).await?;
        assert_eq!(row.get("n").unwrap().as_int(), Some(1));

        // A finished transaction answers with the sentinel, by identity.
        let err = tx
            .execute("INSERT INTO events (label) VALUES ('late')", &[])
            .await
            .unwrap_err();
        assert!(err.is_transaction_finished());
        assert!(matches!(err, SqlFacadeError::TransactionFinished));

        let err = tx.commit().await.unwrap_err();
        assert!(err.is_transaction_finished());

        let err = tx.query("SELECT 1", &[]).await.unwrap_err();
        assert!(err.is_transaction_finished());

        Ok::<(), Box<dyn std::error::Error>>(())
    })?;

    Ok(())
}

#[test]
fn dropped_transaction_rolls_back() -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::new()?;
    let dir = tempfile::TempDir::new()?;
    let db_path = dir.path().join("test2_drop.db").to_string_lossy().into_owned();

    rt.block_on(async {
        let mut db = SqliteDatabase::open(SqliteOptions::new(db_path.as_str())).await?;
        db.execute_batch(DDL).await?;

        // Begin on a reserved connection so the later read is ordered after
        // the implicit rollback on the same worker.
        let mut conn = db.connection().await?;
        {
            let mut tx = conn.begin().await?;
            tx.execute(
                "INSERT INTO events (label) VALUES (?1)",
                &[Value::Text("orphaned".into())],
            )
            .await?;
            // Dropped without commit or rollback.
        }

        let row = conn
            .query_row("SELECT count(*) AS n FROM events", &[])
            .await?;
        assert_eq!(row.get("n").unwrap().as_int(), Some(0));

        Ok::<(), Box<dyn std::error::Error>>(())
    })?;

    Ok(())
}

#[test]
fn statement_rebinds_into_transaction() -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::new()?;
    let dir = tempfile::TempDir::new()?;
    let db_path = dir.path().join("test2_stmt.db").to_string_lossy().into_owned();

    rt.block_on(async {
        let mut db = SqliteDatabase::open(SqliteOptions::new(db_path.as_str())).await?;
        db.execute_batch(DDL).await?;

        let insert = db
            .prepare("INSERT INTO events (label) VALUES (?1)")
            .await?;

        let mut tx = db.begin().await?;
        let mut tx_insert = tx.statement(&*insert).await?;
        assert_eq!(tx_insert.sql(), insert.sql());
        tx_insert
            .execute(&[Value::Text("inside".into())])
            .await?;
        tx.rollback().await?;

        // The rebound statement ran inside the transaction, so its write
        // was rolled back with it.
        let row = db.query_row("SELECT count(*) AS n FROM events", &[]).await?;
        assert_eq!(row.get("n").unwrap().as_int(), Some(0));

        Ok::<(), Box<dyn std::error::Error>>(())
    })?;

    Ok(())
}
