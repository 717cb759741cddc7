//! SQL capability for the query browser.
//!
//! `SqlConnection` owns a SQLite connection for the lifetime of the console
//! and turns statements into `ResultSet`s. The bundled guitar-shop schema can
//! be loaded into an empty database with `seed()`.

pub mod queries;

use anyhow::{Context, Result};
use rusqlite::Connection;
use rusqlite::types::ValueRef;
use std::path::Path;

use crate::console::{ResultSet, Value};

const GUITAR_SHOP: &str = include_str!("guitar_shop.sql");

pub struct SqlConnection {
    conn: Connection,
    label: String,
}

impl SqlConnection {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        Ok(Self {
            conn,
            label: path.display().to_string(),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
        Ok(Self {
            conn,
            label: ":memory:".to_string(),
        })
    }

    /// Where the connection points, for log lines.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// True when the database has no user tables yet.
    pub fn is_empty(&self) -> Result<bool> {
        let count: i64 = self
            .conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%'",
                [],
                |row| row.get(0),
            )
            .context("Failed to inspect database schema")?;
        Ok(count == 0)
    }

    /// Load the sample schema and rows.
    pub fn seed(&self) -> Result<()> {
        self.conn
            .execute_batch(GUITAR_SHOP)
            .context("Failed to load sample data")
    }

    pub fn query(&self, sql: &str) -> Result<ResultSet> {
        let mut stmt = self
            .conn
            .prepare(sql)
            .context("Error executing query")?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let width = columns.len();

        let mut rows = stmt.query([]).context("Error executing query")?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let mut cells = Vec::with_capacity(width);
            for i in 0..width {
                cells.push(to_value(row.get_ref(i)?));
            }
            out.push(cells);
        }
        Ok(ResultSet::new(columns, out))
    }
}

fn to_value(v: ValueRef<'_>) -> Value {
    match v {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(n) => Value::Integer(n),
        ValueRef::Real(r) => Value::Real(r),
        ValueRef::Text(t) => Value::Text(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => Value::Blob(b.to_vec()),
    }
}
