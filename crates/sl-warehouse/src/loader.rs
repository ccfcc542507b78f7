//! Full-refresh warehouse loader
//!
//! Maps the three validated record sets onto the star schema. Nothing is
//! written unless all three tables load.

use crate::error::{WarehouseError, WarehouseResult};
use crate::schema::{reset_schema, TableDef, DIM_CAMPAIGN, FACT_AD_PERFORMANCE, FACT_ORDERS};
use sl_core::{normalize_date, RecordSet, Row, Value};
use sl_db::Database;
use std::collections::HashSet;

const NORMALIZED_CHANNEL: &str = "channel_attributed_normalized";

/// Row counts of one load
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub dim_campaign: usize,
    pub fact_ad_performance: usize,
    pub fact_orders: usize,
    /// Performance rows left out for an unparseable date
    pub skipped_performance_dates: usize,
    /// Order rows left out for an unparseable date
    pub skipped_order_dates: usize,
    /// Order rows left out because an earlier row had the same order id
    pub skipped_duplicate_orders: usize,
}

/// A numeric cell its column type cannot hold
#[derive(Debug, Clone, PartialEq)]
pub struct OutOfRange {
    pub table: &'static str,
    pub row: usize,
    pub column: &'static str,
    pub sql_type: &'static str,
    pub value: f64,
}

/// Rows ready for insert, plus what was left out
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableRows {
    pub rows: Vec<Vec<Value>>,
    pub skipped_dates: usize,
    pub skipped_duplicates: usize,
}

/// Replace the warehouse contents with the given validated record sets.
///
/// Schema reset and all inserts share one transaction; on any failure it is
/// rolled back and the previous snapshot stays in place.
pub async fn load_from_validated(
    db: &dyn Database,
    google_ads: &RecordSet,
    facebook: &RecordSet,
    crm: &RecordSet,
) -> WarehouseResult<LoadSummary> {
    let dim = build_dim_campaign(google_ads, facebook);
    let perf = build_ad_performance(google_ads, facebook);
    let orders = build_orders(crm);

    if perf.skipped_dates > 0 {
        log::warn!(
            "Skipping {} ad performance rows with unparseable dates",
            perf.skipped_dates
        );
    }
    if orders.skipped_dates > 0 {
        log::warn!("Skipping {} orders with unparseable dates", orders.skipped_dates);
    }
    if orders.skipped_duplicates > 0 {
        log::warn!(
            "Skipping {} orders with an already loaded order_id",
            orders.skipped_duplicates
        );
    }

    for (table, rows) in [
        (&DIM_CAMPAIGN, &dim.rows),
        (&FACT_AD_PERFORMANCE, &perf.rows),
        (&FACT_ORDERS, &orders.rows),
    ] {
        for cell in out_of_range(table, rows) {
            log::error!(
                "{} row {}: {} = {} exceeds {}, the load will fail",
                cell.table,
                cell.row,
                cell.column,
                cell.value,
                cell.sql_type
            );
        }
    }

    db.begin().await.map_err(WarehouseError::Transaction)?;
    let result = write_all(db, &dim, &perf, &orders).await;
    match result {
        Ok(()) => db.commit().await.map_err(WarehouseError::Transaction)?,
        Err(e) => {
            if let Err(rollback_err) = db.rollback().await {
                log::error!("Rollback failed: {}", rollback_err);
            }
            return Err(e);
        }
    }

    let summary = LoadSummary {
        dim_campaign: dim.rows.len(),
        fact_ad_performance: perf.rows.len(),
        fact_orders: orders.rows.len(),
        skipped_performance_dates: perf.skipped_dates,
        skipped_order_dates: orders.skipped_dates,
        skipped_duplicate_orders: orders.skipped_duplicates,
    };
    log::info!(
        "Loaded warehouse: dim_campaign={} fact_ad_performance={} fact_orders={}",
        summary.dim_campaign,
        summary.fact_ad_performance,
        summary.fact_orders
    );
    Ok(summary)
}

async fn write_all(
    db: &dyn Database,
    dim: &TableRows,
    perf: &TableRows,
    orders: &TableRows,
) -> WarehouseResult<()> {
    reset_schema(db).await?;
    insert(db, &DIM_CAMPAIGN, &dim.rows).await?;
    insert(db, &FACT_AD_PERFORMANCE, &perf.rows).await?;
    insert(db, &FACT_ORDERS, &orders.rows).await?;
    Ok(())
}

async fn insert(db: &dyn Database, table: &TableDef, rows: &[Vec<Value>]) -> WarehouseResult<()> {
    let inserted = db
        .insert_rows(table.name, &table.typed_columns(), rows)
        .await
        .map_err(|source| WarehouseError::Insert {
            table: table.name.to_string(),
            source,
        })?;
    log::debug!("{}: inserted {} rows", table.name, inserted);
    Ok(())
}

/// Numeric cells too large for their column type
pub fn out_of_range(table: &TableDef, rows: &[Vec<Value>]) -> Vec<OutOfRange> {
    let mut found = Vec::new();
    for (row, values) in rows.iter().enumerate() {
        for (column, value) in table.columns.iter().zip(values) {
            let (Some(limit), Some(v)) = (column.max_magnitude(), value.as_f64()) else {
                continue;
            };
            if v.abs() >= limit {
                found.push(OutOfRange {
                    table: table.name,
                    row,
                    column: column.name,
                    sql_type: column.sql_type,
                    value: v,
                });
            }
        }
    }
    found
}

/// Campaigns from both ad sources, first seen wins per (campaign_id, platform)
pub fn build_dim_campaign(google_ads: &RecordSet, facebook: &RecordSet) -> TableRows {
    let mut seen: HashSet<(String, String)> = HashSet::new();
    let mut rows = Vec::new();

    let sources = [(google_ads, true), (facebook, false)];
    for (records, has_metadata) in sources {
        for row in records.rows() {
            let key = (
                row.get("campaign_id").to_string(),
                row.get("platform").to_string(),
            );
            if !seen.insert(key) {
                continue;
            }
            let metadata = |column: &str| {
                if has_metadata {
                    text(row.get(column))
                } else {
                    Value::Null
                }
            };
            rows.push(vec![
                text(row.get("campaign_id")),
                text(row.get("platform")),
                text(row.get("campaign_name")),
                metadata("campaign_type"),
                metadata("status"),
            ]);
        }
    }
    TableRows {
        rows,
        ..TableRows::default()
    }
}

/// Daily metrics from both ad sources, appended independently
pub fn build_ad_performance(google_ads: &RecordSet, facebook: &RecordSet) -> TableRows {
    let mut out = TableRows::default();
    for row in google_ads.rows() {
        let Some(date) = normalize_date(row.get("date")) else {
            out.skipped_dates += 1;
            continue;
        };
        out.rows.push(performance_row(
            date,
            &row,
            "conversions",
            "conversion_value",
            None,
        ));
    }
    for row in facebook.rows() {
        let Some(date) = normalize_date(row.get("date")) else {
            out.skipped_dates += 1;
            continue;
        };
        out.rows.push(performance_row(
            date,
            &row,
            "purchases",
            "purchase_value",
            Some(("reach", "frequency")),
        ));
    }
    out
}

fn performance_row(
    date: String,
    row: &Row<'_>,
    conversions: &str,
    conversion_value: &str,
    reach_frequency: Option<(&str, &str)>,
) -> Vec<Value> {
    let (reach, frequency) = match reach_frequency {
        Some((r, f)) => (optional_int(row.get(r)), optional_number(row.get(f))),
        None => (Value::Null, Value::Null),
    };
    vec![
        Value::text(date),
        text(row.get("campaign_id")),
        text(row.get("platform")),
        count(row.get("impressions")),
        count(row.get("clicks")),
        amount(row.get("spend")),
        count(row.get(conversions)),
        amount(row.get(conversion_value)),
        reach,
        frequency,
    ]
}

/// Orders with a real date, first seen wins per order_id
pub fn build_orders(crm: &RecordSet) -> TableRows {
    let channel = if crm.has_column(NORMALIZED_CHANNEL) {
        NORMALIZED_CHANNEL
    } else {
        "channel_attributed"
    };
    let mut seen: HashSet<String> = HashSet::new();
    let mut out = TableRows::default();

    for row in crm.rows() {
        let Some(date) = normalize_date(row.get("order_date")) else {
            out.skipped_dates += 1;
            continue;
        };
        if !seen.insert(row.get("order_id").to_string()) {
            out.skipped_duplicates += 1;
            continue;
        }
        out.rows.push(vec![
            text(row.get("order_id")),
            text(row.get("customer_id")),
            Value::text(date),
            optional_number(row.get("revenue")),
            text(row.get(channel)),
            text(row.get("campaign_source")),
            text(row.get("product_category")),
            text(row.get("region")),
        ]);
    }
    out
}

fn text(value: &Value) -> Value {
    match value {
        Value::Null => Value::Null,
        other => Value::text(other.to_string()),
    }
}

/// Whole-number metric, zero when absent or non-numeric
fn count(value: &Value) -> Value {
    Value::Int(value.as_f64().map(|v| v.round() as i64).unwrap_or(0))
}

/// Money metric, zero when absent or non-numeric
fn amount(value: &Value) -> Value {
    Value::Float(value.as_f64().unwrap_or(0.0))
}

fn optional_int(value: &Value) -> Value {
    value
        .as_f64()
        .map(|v| Value::Int(v.round() as i64))
        .unwrap_or(Value::Null)
}

fn optional_number(value: &Value) -> Value {
    value.as_f64().map(Value::Float).unwrap_or(Value::Null)
}

#[cfg(test)]
#[path = "loader_test.rs"]
mod tests;
