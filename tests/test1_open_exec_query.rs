#![cfg(feature = "sqlite")]
use chrono::NaiveDateTime;
use serde_json::json;
use sql_facade::prelude::*;
use tokio::runtime::Runtime;

const DDL: &str = r"
    CREATE TABLE IF NOT EXISTS test (
        recid INTEGER PRIMARY KEY AUTOINCREMENT,
        a int,
        b text,
        c datetime,
        d real,
        e boolean,
        f blob,
        g json
    );
";

#[test]
fn open_execute_and_query_round_trip() -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::new()?;
    let dir = tempfile::TempDir::new()?;
    let db_path = dir.path().join("test1.db").to_string_lossy().into_owned();

    rt.block_on(async {
        let mut db = SqliteDatabase::builder(db_path.as_str())
            .max_connections(5)
            .build()
            .await?;

        db.execute_batch(DDL).await?;

        let ts = NaiveDateTime::parse_from_str("2024-01-01 08:00:01", "%Y-%m-%d %H:%M:%S")?;
        let insert = "INSERT INTO test (a, b, c, d, e, f, g) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)";
        let result = db
            .execute(
                insert,
                &[
                    Value::Int(1),
                    Value::Text("Alpha".into()),
                    Value::Timestamp(ts),
                    Value::Float(10.5),
                    Value::Bool(true),
                    Value::Blob(b"Blob12".to_vec()),
                    Value::Json(json!({"name": "Alice", "age": 30})),
                ],
            )
            .await?;
        assert_eq!(result.rows_affected(), 1);
        assert_eq!(result.last_insert_id(), 1);

        let result = db
            .execute(
                insert,
                &[
                    Value::Int(2),
                    Value::Text("Beta".into()),
                    Value::Null,
                    Value::Float(20.25),
                    Value::Bool(false),
                    Value::Null,
                    Value::Null,
                ],
            )
            .await?;
        assert_eq!(result.last_insert_id(), 2);

        // Full result set with metadata.
        let mut rows = db
            .query("SELECT * FROM test ORDER BY recid", &[])
            .await?;
        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows.columns(),
            &["recid", "a", "b", "c", "d", "e", "f", "g"]
        );
        let info = rows.column_info();
        assert_eq!(info[0].name(), "recid");
        assert_eq!(info[0].decl_type(), Some("INTEGER"));
        assert_eq!(info[2].name(), "b");
        assert_eq!(info[2].decl_type(), Some("text"));

        let first = rows.next_row().unwrap();
        assert_eq!(first.get("a").unwrap().as_int(), Some(1));
        assert_eq!(first.get("b").unwrap().as_text(), Some("Alpha"));
        assert_eq!(first.get("c").unwrap().as_timestamp(), Some(ts));
        assert_eq!(first.get("d").unwrap().as_float(), Some(10.5));
        assert_eq!(first.get("e").unwrap().as_bool(), Some(true));
        assert_eq!(first.get("f").unwrap().as_blob(), Some(&b"Blob12"[..]));
        assert_eq!(
            first.get("g").unwrap().as_text(),
            Some(r#"{"age":30,"name":"Alice"}"#)
        );

        let second = rows.next_row().unwrap();
        assert!(second.get("c").unwrap().is_null());
        assert_eq!(second.get("e").unwrap().as_bool(), Some(false));
        assert!(rows.next_row().is_none());

        // Single-row query.
        let row = db
            .query_row("SELECT b FROM test WHERE recid = ?1", &[Value::Int(2)])
            .await?;
        assert_eq!(row.get("b").unwrap().as_text(), Some("Beta"));
        assert_eq!(String::try_from(row.get_by_index(0).unwrap())?, "Beta");

        // Zero rows must surface the no-rows sentinel by identity.
        let err = db
            .query_row("SELECT b FROM test WHERE recid = ?1", &[Value::Int(99)])
            .await
            .unwrap_err();
        assert!(err.is_no_rows());
        assert!(matches!(err, SqlFacadeError::NoRows));

        // Handle metadata passes straight through.
        db.ping().await?;
        assert_eq!(db.kind(), DatabaseKind::Sqlite);
        let stats = db.stats();
        assert_eq!(stats.max_size, 5);
        assert!(stats.size >= 1);
        db.resize(8);
        assert_eq!(db.stats().max_size, 8);

        Ok::<(), Box<dyn std::error::Error>>(())
    })?;

    // Read the same file with the driver directly; the facade must not have
    // altered what was stored.
    let raw = rusqlite::Connection::open(&db_path)?;
    let (a, b, d): (i64, String, f64) = raw.query_row(
        "SELECT a, b, d FROM test WHERE recid = 1",
        [],
        |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
    )?;
    assert_eq!(a, 1);
    assert_eq!(b, "Alpha");
    assert_eq!(d, 10.5);
    let count: i64 = raw.query_row("SELECT count(*) FROM test", [], |r| r.get(0))?;
    assert_eq!(count, 2);

    Ok(())
}
