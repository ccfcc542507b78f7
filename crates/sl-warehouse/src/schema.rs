//! Warehouse table definitions and full-refresh DDL

use crate::error::{WarehouseError, WarehouseResult};
use sl_db::{Database, DbError, Dialect, TypedColumn};

/// One column of a warehouse table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: &'static str,
    pub sql_type: &'static str,
    /// Trailing constraint text, e.g. `NOT NULL DEFAULT 0`
    pub constraint: &'static str,
}

const fn col(name: &'static str, sql_type: &'static str, constraint: &'static str) -> ColumnDef {
    ColumnDef {
        name,
        sql_type,
        constraint,
    }
}

impl ColumnDef {
    /// Largest magnitude the column type can store, for bounded numeric types
    pub fn max_magnitude(&self) -> Option<f64> {
        match self.sql_type {
            "INTEGER" => Some(i32::MAX as f64 + 1.0),
            "BIGINT" => Some(i64::MAX as f64),
            t => {
                let (precision, scale) = t
                    .strip_prefix("NUMERIC(")?
                    .strip_suffix(')')?
                    .split_once(',')?;
                let precision: i32 = precision.trim().parse().ok()?;
                let scale: i32 = scale.trim().parse().ok()?;
                Some(10f64.powi(precision - scale))
            }
        }
    }
}

/// A warehouse table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableDef {
    pub name: &'static str,
    /// Auto-incrementing surrogate key column, if any
    pub surrogate_key: Option<&'static str>,
    /// Loaded columns, in insert order
    pub columns: &'static [ColumnDef],
    /// Table-level primary key over loaded columns
    pub primary_key: &'static [&'static str],
}

pub static DIM_CAMPAIGN: TableDef = TableDef {
    name: "dim_campaign",
    surrogate_key: None,
    columns: &[
        col("campaign_id", "VARCHAR(64)", "NOT NULL"),
        col("platform", "VARCHAR(32)", "NOT NULL"),
        col("campaign_name", "VARCHAR(256)", ""),
        col("campaign_type", "VARCHAR(64)", ""),
        col("status", "VARCHAR(32)", ""),
    ],
    primary_key: &["campaign_id", "platform"],
};

pub static FACT_AD_PERFORMANCE: TableDef = TableDef {
    name: "fact_ad_performance",
    surrogate_key: Some("id"),
    columns: &[
        col("date", "DATE", "NOT NULL"),
        col("campaign_id", "VARCHAR(64)", "NOT NULL"),
        col("platform", "VARCHAR(32)", "NOT NULL"),
        col("impressions", "BIGINT", "NOT NULL DEFAULT 0"),
        col("clicks", "INTEGER", "NOT NULL DEFAULT 0"),
        col("spend", "NUMERIC(14,2)", "NOT NULL DEFAULT 0"),
        col("conversions", "INTEGER", "NOT NULL DEFAULT 0"),
        col("conversion_value", "NUMERIC(14,2)", "NOT NULL DEFAULT 0"),
        col("reach", "BIGINT", ""),
        col("frequency", "NUMERIC(6,2)", ""),
    ],
    primary_key: &[],
};

pub static FACT_ORDERS: TableDef = TableDef {
    name: "fact_orders",
    surrogate_key: None,
    columns: &[
        col("order_id", "VARCHAR(32)", "NOT NULL"),
        col("customer_id", "VARCHAR(32)", ""),
        col("order_date", "DATE", "NOT NULL"),
        col("revenue", "NUMERIC(14,2)", ""),
        col("channel_attributed", "VARCHAR(32)", ""),
        col("campaign_source", "VARCHAR(64)", ""),
        col("product_category", "VARCHAR(128)", ""),
        col("region", "VARCHAR(64)", ""),
    ],
    primary_key: &["order_id"],
};

/// Dependents first
pub static DROP_ORDER: [&TableDef; 3] = [&FACT_ORDERS, &FACT_AD_PERFORMANCE, &DIM_CAMPAIGN];

impl TableDef {
    /// `CREATE TABLE` statement for a dialect
    pub fn create_sql(&self, dialect: Dialect) -> String {
        let mut lines: Vec<String> = Vec::new();
        if let Some(key) = self.surrogate_key {
            lines.push(dialect.surrogate_key(self.name, key));
        }
        for c in self.columns {
            if c.constraint.is_empty() {
                lines.push(format!("{} {}", c.name, c.sql_type));
            } else {
                lines.push(format!("{} {} {}", c.name, c.sql_type, c.constraint));
            }
        }
        if !self.primary_key.is_empty() {
            lines.push(format!("PRIMARY KEY ({})", self.primary_key.join(", ")));
        }
        format!("CREATE TABLE {} (\n    {}\n)", self.name, lines.join(",\n    "))
    }

    /// Columns as bound by the loader
    pub fn typed_columns(&self) -> Vec<TypedColumn<'static>> {
        self.columns
            .iter()
            .map(|c| TypedColumn {
                name: c.name,
                sql_type: c.sql_type,
            })
            .collect()
    }

    /// Index of a loaded column
    pub fn position(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == column)
    }
}

fn schema_err(table: &str) -> impl FnOnce(DbError) -> WarehouseError {
    let table = table.to_string();
    move |source| WarehouseError::Schema { table, source }
}

/// Drop all three tables and recreate them empty.
///
/// Runs inside whatever transaction the caller holds.
pub async fn reset_schema(db: &dyn Database) -> WarehouseResult<()> {
    let dialect = db.dialect();

    for table in DROP_ORDER.iter() {
        db.execute_batch(&dialect.drop_table(table.name))
            .await
            .map_err(schema_err(table.name))?;
        if let Some(teardown) = table
            .surrogate_key
            .and_then(|key| dialect.surrogate_key_teardown(table.name, key))
        {
            db.execute_batch(&teardown)
                .await
                .map_err(schema_err(table.name))?;
        }
    }

    for table in DROP_ORDER.iter().rev() {
        if let Some(setup) = table
            .surrogate_key
            .and_then(|key| dialect.surrogate_key_setup(table.name, key))
        {
            db.execute_batch(&setup)
                .await
                .map_err(schema_err(table.name))?;
        }
        db.execute_batch(&table.create_sql(dialect))
            .await
            .map_err(schema_err(table.name))?;
        log::debug!("Created {}", table.name);
    }
    Ok(())
}

/// Drop and recreate the warehouse tables in their own transaction
pub async fn create_warehouse_schema(db: &dyn Database) -> WarehouseResult<()> {
    db.begin().await.map_err(WarehouseError::Transaction)?;
    match reset_schema(db).await {
        Ok(()) => db.commit().await.map_err(WarehouseError::Transaction),
        Err(e) => {
            if let Err(rollback_err) = db.rollback().await {
                log::error!("Rollback failed: {}", rollback_err);
            }
            Err(e)
        }
    }
}

#[cfg(test)]
#[path = "schema_test.rs"]
mod tests;
