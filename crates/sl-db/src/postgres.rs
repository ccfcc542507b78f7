//! Postgres database backend implementation
//!
//! Holds a single connection so that explicit BEGIN/COMMIT/ROLLBACK
//! statements apply to every call in between.

use crate::dialect::Dialect;
use crate::error::{DbError, DbResult};
use crate::traits::{bind_text, check_shape, insert_statement, Database, TypedColumn, INSERT_CHUNK};
use async_trait::async_trait;
use sl_core::Value;
use sqlx::{Connection, Executor, PgConnection, Row};
use tokio::sync::Mutex;

/// Postgres database backend
pub struct PostgresBackend {
    conn: Mutex<PgConnection>,
}

impl PostgresBackend {
    /// Connect to a `postgres://` or `postgresql://` URL
    pub async fn connect(url: &str) -> DbResult<Self> {
        let conn = PgConnection::connect(url)
            .await
            .map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

#[async_trait]
impl Database for PostgresBackend {
    async fn execute(&self, sql: &str) -> DbResult<usize> {
        let mut conn = self.conn.lock().await;
        let result = conn
            .execute(sqlx::raw_sql(sql))
            .await
            .map_err(|e| DbError::ExecutionError(format!("{}: {}", e, sql)))?;
        Ok(result.rows_affected() as usize)
    }

    async fn execute_batch(&self, sql: &str) -> DbResult<()> {
        let mut conn = self.conn.lock().await;
        conn.execute(sqlx::raw_sql(sql)).await?;
        Ok(())
    }

    async fn insert_rows(
        &self,
        table: &str,
        columns: &[TypedColumn<'_>],
        rows: &[Vec<Value>],
    ) -> DbResult<usize> {
        check_shape(table, columns, rows)?;
        let mut conn = self.conn.lock().await;
        let mut inserted = 0;
        for chunk in rows.chunks(INSERT_CHUNK) {
            let sql = insert_statement(Dialect::Postgres, table, columns, chunk.len());
            let mut query = sqlx::query(&sql);
            for value in chunk.iter().flatten() {
                query = query.bind(bind_text(value));
            }
            let result = query
                .execute(&mut *conn)
                .await
                .map_err(|e| DbError::ExecutionError(format!("insert into {}: {}", table, e)))?;
            inserted += result.rows_affected() as usize;
        }
        Ok(inserted)
    }

    async fn query_rows(&self, sql: &str) -> DbResult<Vec<Vec<Option<String>>>> {
        // The simple query protocol returns every cell in text format.
        let mut conn = self.conn.lock().await;
        let rows = conn.fetch_all(sqlx::raw_sql(sql)).await?;
        rows.iter()
            .map(|row| {
                (0..row.len())
                    .map(|i| row.try_get_unchecked::<Option<String>, _>(i))
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(DbError::from)
            })
            .collect()
    }

    async fn query_count(&self, sql: &str) -> DbResult<usize> {
        let mut conn = self.conn.lock().await;
        let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM ({}) AS q", sql))
            .fetch_one(&mut *conn)
            .await?;
        Ok(count as usize)
    }

    async fn relation_exists(&self, name: &str) -> DbResult<bool> {
        let (schema, table) = match name.rfind('.') {
            Some(pos) => (Some(&name[..pos]), &name[pos + 1..]),
            None => (None, name),
        };
        let mut conn = self.conn.lock().await;
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM information_schema.tables \
             WHERE table_schema = COALESCE($1, current_schema()) AND table_name = $2",
        )
        .bind(schema)
        .bind(table)
        .fetch_one(&mut *conn)
        .await?;
        Ok(count > 0)
    }

    async fn begin(&self) -> DbResult<()> {
        self.execute_batch("BEGIN").await
    }

    async fn commit(&self) -> DbResult<()> {
        self.execute_batch("COMMIT").await
    }

    async fn rollback(&self) -> DbResult<()> {
        self.execute_batch("ROLLBACK").await
    }

    fn dialect(&self) -> Dialect {
        Dialect::Postgres
    }
}
