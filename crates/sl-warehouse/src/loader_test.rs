use super::*;
use sl_db::DuckDbBackend;

fn google() -> RecordSet {
    RecordSet::from_rows(
        [
            "campaign_id",
            "campaign_name",
            "campaign_type",
            "status",
            "date",
            "impressions",
            "clicks",
            "cost_micros",
            "conversions",
            "conversion_value",
            "platform",
            "spend",
        ],
        vec![
            vec![
                Value::text("C1"),
                Value::text("Brand"),
                Value::text("SEARCH"),
                Value::text("ENABLED"),
                Value::text("2024-01-01"),
                Value::Int(100),
                Value::Int(5),
                Value::Int(2_500_000),
                Value::Int(1),
                Value::Float(10.5),
                Value::text("google_ads"),
                Value::Float(2.5),
            ],
            vec![
                Value::text("C1"),
                Value::text("Brand (renamed)"),
                Value::text("SEARCH"),
                Value::text("PAUSED"),
                Value::text("not a date"),
                Value::Null,
                Value::Int(1),
                Value::Null,
                Value::Null,
                Value::Null,
                Value::text("google_ads"),
                Value::Float(0.0),
            ],
        ],
    )
    .unwrap()
}

fn facebook() -> RecordSet {
    RecordSet::from_rows(
        [
            "campaign_id",
            "campaign_name",
            "date",
            "impressions",
            "clicks",
            "spend",
            "purchases",
            "purchase_value",
            "reach",
            "frequency",
            "platform",
        ],
        vec![
            vec![
                Value::text("C1"),
                Value::text("Prospecting"),
                Value::text("2024-01-01"),
                Value::Int(1000),
                Value::Int(20),
                Value::Float(15.5),
                Value::Null,
                Value::Float(40.0),
                Value::Int(800),
                Value::Float(1.25),
                Value::text("facebook"),
            ],
            vec![
                Value::text("F2"),
                Value::text("Retargeting"),
                Value::text("2024-01-02"),
                Value::Int(10),
                Value::Int(1),
                Value::Float(1.0),
                Value::Int(2),
                Value::Float(5.0),
                Value::Null,
                Value::Null,
                Value::text("facebook"),
            ],
        ],
    )
    .unwrap()
}

fn crm() -> RecordSet {
    let rows = [
        ["ORD1", "CUST1", "2024-01-04", "199.99", "Facebook", "facebook"],
        ["ORD9", "CUST2", "2024-01-05", "50", "google", "google"],
        ["ORD9", "CUST3", "2024-01-06", "60", "google", "google"],
        ["ORD3", "CUST4", "bogus", "10", "email", "email"],
        ["ORD4", "", "2024-01-07", "abc", "Email", "email"],
    ];
    RecordSet::from_rows(
        [
            "order_id",
            "customer_id",
            "order_date",
            "revenue",
            "channel_attributed",
            "channel_attributed_normalized",
        ],
        rows.iter()
            .map(|r| r.iter().map(|c| Value::text(*c)).collect())
            .collect(),
    )
    .unwrap()
}

#[test]
fn test_dim_campaign_first_seen_wins() {
    let dim = build_dim_campaign(&google(), &facebook());
    assert_eq!(dim.rows.len(), 3);
    assert_eq!(
        dim.rows[0],
        vec![
            Value::text("C1"),
            Value::text("google_ads"),
            Value::text("Brand"),
            Value::text("SEARCH"),
            Value::text("ENABLED"),
        ]
    );
    // Same campaign id on another platform is a separate campaign
    assert_eq!(dim.rows[1][1], Value::text("facebook"));
    assert_eq!(dim.rows[1][3], Value::Null);
    assert_eq!(dim.rows[1][4], Value::Null);
}

#[test]
fn test_ad_performance_maps_both_sources() {
    let perf = build_ad_performance(&google(), &facebook());
    assert_eq!(perf.skipped_dates, 1);
    assert_eq!(perf.rows.len(), 3);

    let spend = FACT_AD_PERFORMANCE.position("spend").unwrap();
    let conversions = FACT_AD_PERFORMANCE.position("conversions").unwrap();
    let reach = FACT_AD_PERFORMANCE.position("reach").unwrap();

    assert_eq!(perf.rows[0][spend], Value::Float(2.5));
    assert_eq!(perf.rows[0][reach], Value::Null);
    // Missing purchases count as zero conversions
    assert_eq!(perf.rows[1][conversions], Value::Int(0));
    assert_eq!(perf.rows[1][reach], Value::Int(800));
    assert_eq!(perf.rows[2][conversions], Value::Int(2));
}

#[test]
fn test_orders_filter_and_dedupe() {
    let orders = build_orders(&crm());
    assert_eq!(orders.skipped_dates, 1);
    assert_eq!(orders.skipped_duplicates, 1);

    let ids: Vec<String> = orders.rows.iter().map(|r| r[0].to_string()).collect();
    assert_eq!(ids, vec!["ORD1", "ORD9", "ORD4"]);
    // Normalized channel is loaded, non-numeric revenue becomes null
    assert_eq!(orders.rows[0][4], Value::text("facebook"));
    assert_eq!(orders.rows[1][1], Value::text("CUST2"));
    assert_eq!(orders.rows[2][3], Value::Null);
}

#[tokio::test]
async fn test_load_populates_all_tables() {
    let db = DuckDbBackend::in_memory().unwrap();
    let summary = load_from_validated(&db, &google(), &facebook(), &crm())
        .await
        .unwrap();

    assert_eq!(summary.dim_campaign, 3);
    assert_eq!(summary.fact_ad_performance, 3);
    assert_eq!(summary.fact_orders, 3);
    assert_eq!(summary.skipped_duplicate_orders, 1);

    assert_eq!(db.query_count("SELECT * FROM dim_campaign").await.unwrap(), 3);
    assert_eq!(db.query_count("SELECT * FROM fact_ad_performance").await.unwrap(), 3);
    assert_eq!(
        db.query_count("SELECT * FROM fact_orders WHERE order_id = 'ORD9'")
            .await
            .unwrap(),
        1
    );

    let spend = db
        .query_rows("SELECT spend FROM fact_ad_performance WHERE platform = 'google_ads'")
        .await
        .unwrap();
    assert_eq!(spend, vec![vec![Some("2.50".to_string())]]);
}

#[tokio::test]
async fn test_reload_is_idempotent() {
    let db = DuckDbBackend::in_memory().unwrap();
    let snapshot_sql = "SELECT date, campaign_id, platform, impressions, clicks, spend \
                        FROM fact_ad_performance";

    let first = load_from_validated(&db, &google(), &facebook(), &crm())
        .await
        .unwrap();
    let mut first_rows = db.query_rows(snapshot_sql).await.unwrap();

    let second = load_from_validated(&db, &google(), &facebook(), &crm())
        .await
        .unwrap();
    let mut second_rows = db.query_rows(snapshot_sql).await.unwrap();
    first_rows.sort();
    second_rows.sort();

    assert_eq!(first, second);
    assert_eq!(first_rows, second_rows);
    assert_eq!(db.query_count("SELECT * FROM fact_orders").await.unwrap(), 3);
}

#[tokio::test]
async fn test_failed_load_keeps_previous_snapshot() {
    let db = DuckDbBackend::in_memory().unwrap();
    load_from_validated(&db, &google(), &facebook(), &crm())
        .await
        .unwrap();

    // A null campaign id violates NOT NULL
    let mut broken = facebook();
    broken.set(0, "campaign_id", Value::Null);
    let err = load_from_validated(&db, &google(), &broken, &crm())
        .await
        .unwrap_err();
    assert!(matches!(err, WarehouseError::Insert { .. }));

    assert_eq!(db.query_count("SELECT * FROM dim_campaign").await.unwrap(), 3);
    assert_eq!(db.query_count("SELECT * FROM fact_ad_performance").await.unwrap(), 3);
    assert_eq!(db.query_count("SELECT * FROM fact_orders").await.unwrap(), 3);
}

#[test]
fn test_out_of_range_names_table_row_and_column() {
    let mut ledger = crm();
    ledger.set(1, "revenue", Value::text("5e12"));
    let orders = build_orders(&ledger);

    let found = out_of_range(&FACT_ORDERS, &orders.rows);
    assert_eq!(
        found,
        vec![OutOfRange {
            table: "fact_orders",
            row: 1,
            column: "revenue",
            sql_type: "NUMERIC(14,2)",
            value: 5e12,
        }]
    );
    assert!(out_of_range(&FACT_ORDERS, &build_orders(&crm()).rows).is_empty());
}

#[tokio::test]
async fn test_out_of_range_value_fails_whole_load() {
    let db = DuckDbBackend::in_memory().unwrap();
    let mut ledger = crm();
    ledger.set(0, "revenue", Value::text("5e12"));

    let err = load_from_validated(&db, &google(), &facebook(), &ledger)
        .await
        .unwrap_err();
    assert!(matches!(err, WarehouseError::Insert { ref table, .. } if table == "fact_orders"));
    assert!(!db.relation_exists("fact_orders").await.unwrap());
}
