use super::*;

const COLUMNS: [TypedColumn<'static>; 3] = [
    TypedColumn {
        name: "order_id",
        sql_type: "VARCHAR(64)",
    },
    TypedColumn {
        name: "order_date",
        sql_type: "DATE",
    },
    TypedColumn {
        name: "revenue",
        sql_type: "NUMERIC(14,2)",
    },
];

async fn orders_table() -> DuckDbBackend {
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute_batch(
        "CREATE TABLE orders (order_id VARCHAR(64) PRIMARY KEY, order_date DATE, revenue NUMERIC(14,2))",
    )
    .await
    .unwrap();
    db
}

#[tokio::test]
async fn test_in_memory() {
    let db = DuckDbBackend::in_memory().unwrap();
    assert_eq!(db.db_type(), "duckdb");
    assert_eq!(db.dialect(), Dialect::DuckDb);
}

#[tokio::test]
async fn test_query_count() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute_batch("CREATE TABLE nums AS SELECT * FROM range(10) t(n)")
        .await
        .unwrap();

    let count = db.query_count("SELECT * FROM nums").await.unwrap();
    assert_eq!(count, 10);
}

#[tokio::test]
async fn test_execute_batch() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute_batch(
        "CREATE TABLE t1 (id INT); CREATE TABLE t2 (id INT); INSERT INTO t1 VALUES (1);",
    )
    .await
    .unwrap();

    assert!(db.relation_exists("t1").await.unwrap());
    assert!(db.relation_exists("t2").await.unwrap());
    assert!(!db.relation_exists("nonexistent").await.unwrap());
}

#[tokio::test]
async fn test_insert_rows_casts_text() {
    let db = orders_table().await;
    let rows = vec![
        vec![Value::text("ORD1"), Value::text("2024-01-04"), Value::Float(199.99)],
        vec![Value::text("ORD2"), Value::Null, Value::text("50")],
    ];
    let inserted = db.insert_rows("orders", &COLUMNS, &rows).await.unwrap();
    assert_eq!(inserted, 2);

    let out = db
        .query_rows("SELECT order_id, order_date, revenue FROM orders ORDER BY order_id")
        .await
        .unwrap();
    assert_eq!(
        out,
        vec![
            vec![
                Some("ORD1".to_string()),
                Some("2024-01-04".to_string()),
                Some("199.99".to_string())
            ],
            vec![Some("ORD2".to_string()), None, Some("50.00".to_string())],
        ]
    );
}

#[tokio::test]
async fn test_insert_rows_in_chunks() {
    let db = orders_table().await;
    let rows: Vec<Vec<Value>> = (0..1203)
        .map(|i| vec![Value::text(format!("ORD{i}")), Value::text("2024-01-01"), Value::Int(i)])
        .collect();
    let inserted = db.insert_rows("orders", &COLUMNS, &rows).await.unwrap();
    assert_eq!(inserted, 1203);
    assert_eq!(db.query_count("SELECT * FROM orders").await.unwrap(), 1203);
}

#[tokio::test]
async fn test_insert_rows_empty_is_noop() {
    let db = orders_table().await;
    assert_eq!(db.insert_rows("orders", &COLUMNS, &[]).await.unwrap(), 0);
}

#[tokio::test]
async fn test_insert_rows_rejects_bad_shape() {
    let db = orders_table().await;
    let rows = vec![vec![Value::text("ORD1")]];
    let err = db.insert_rows("orders", &COLUMNS, &rows).await.unwrap_err();
    assert!(matches!(err, DbError::RowShape { expected: 3, found: 1, .. }));
}

#[tokio::test]
async fn test_insert_rows_invalid_cast_fails() {
    let db = orders_table().await;
    let rows = vec![vec![Value::text("ORD1"), Value::text("not a date"), Value::Int(1)]];
    assert!(db.insert_rows("orders", &COLUMNS, &rows).await.is_err());
}

#[tokio::test]
async fn test_rollback_discards_changes() {
    let db = orders_table().await;
    let row = vec![vec![Value::text("ORD1"), Value::text("2024-01-01"), Value::Int(1)]];
    db.insert_rows("orders", &COLUMNS, &row).await.unwrap();

    db.begin().await.unwrap();
    db.execute("DELETE FROM orders").await.unwrap();
    db.execute_batch("DROP TABLE orders").await.unwrap();
    db.rollback().await.unwrap();

    assert!(db.relation_exists("orders").await.unwrap());
    assert_eq!(db.query_count("SELECT * FROM orders").await.unwrap(), 1);
}

#[tokio::test]
async fn test_commit_keeps_changes() {
    let db = orders_table().await;
    db.begin().await.unwrap();
    let row = vec![vec![Value::text("ORD1"), Value::text("2024-01-01"), Value::Int(1)]];
    db.insert_rows("orders", &COLUMNS, &row).await.unwrap();
    db.commit().await.unwrap();

    assert_eq!(db.query_count("SELECT * FROM orders").await.unwrap(), 1);
}

#[tokio::test]
async fn test_missing_table_is_classified() {
    let db = DuckDbBackend::in_memory().unwrap();
    let err = db.query_count("SELECT * FROM nope").await.unwrap_err();
    assert!(matches!(err, DbError::TableNotFound(_)));
}

#[tokio::test]
async fn test_file_database_persists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("warehouse.duckdb");
    {
        let db = DuckDbBackend::from_path(&path).unwrap();
        db.execute_batch("CREATE TABLE t (id INT); INSERT INTO t VALUES (1), (2);")
            .await
            .unwrap();
    }
    let db = DuckDbBackend::new(path.to_str().unwrap()).unwrap();
    assert_eq!(db.query_count("SELECT * FROM t").await.unwrap(), 2);
}
