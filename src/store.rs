//! DuckDB-backed storage for five-year summaries.
//!
//! Owns the `weather_5_years` table. Each almanac run replaces the table's
//! contents in a single transaction; reads go through parameterized queries
//! whose rows are decoded via `serde_json`.

use crate::config::{SUMMARY_SEQUENCE, SUMMARY_TABLE};
use crate::error::{AlmanacError, Result};
use crate::models::FiveYearSummary;
use duckdb::types::{Value, ValueRef};
use duckdb::{params, Connection as DuckDbConnection, Transaction};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::Path;

/// Wraps a DuckDB connection holding the summary table.
pub struct SummaryStore {
    conn: DuckDbConnection,
}

impl SummaryStore {
    /// Open (or create) a database file and ensure the schema exists.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = DuckDbConnection::open(path)?;
        log::info!("Opened summary store at {}", path.display());
        Self::with_connection(conn)
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(DuckDbConnection::open_in_memory()?)
    }

    fn with_connection(conn: DuckDbConnection) -> Result<Self> {
        let store = Self { conn };
        store.ensure_schema()?;
        Ok(store)
    }

    /// Create the sequence and table if they do not exist yet.
    pub fn ensure_schema(&self) -> Result<()> {
        self.conn.execute_batch(&format!(
            "CREATE SEQUENCE IF NOT EXISTS {seq}; \
             CREATE TABLE IF NOT EXISTS {table} (\
                 id INTEGER PRIMARY KEY DEFAULT nextval('{seq}'), \
                 latitude DOUBLE, \
                 longitude DOUBLE, \
                 day INTEGER, \
                 month INTEGER, \
                 year INTEGER, \
                 five_year_avg_temp DOUBLE, \
                 five_year_min_temp DOUBLE, \
                 five_year_max_temp DOUBLE, \
                 five_year_avg_wind_speed DOUBLE, \
                 five_year_min_wind_speed DOUBLE, \
                 five_year_max_wind_speed DOUBLE, \
                 five_year_avg_precip DOUBLE, \
                 five_year_min_precip DOUBLE, \
                 five_year_max_precip DOUBLE\
             )",
            seq = SUMMARY_SEQUENCE,
            table = SUMMARY_TABLE,
        ))?;
        Ok(())
    }

    /// Replace every stored row with `summary`, atomically.
    ///
    /// The delete and insert share one transaction. On any failure the
    /// transaction is rolled back, the previous rows stay in place, and the
    /// error is returned. Returns the summary with its assigned id.
    pub fn replace(&mut self, summary: &FiveYearSummary) -> Result<FiveYearSummary> {
        let tx = self.conn.transaction()?;
        let result = (|| -> Result<i64> {
            let removed = tx.execute(&format!("DELETE FROM {}", SUMMARY_TABLE), [])?;
            log::debug!("Cleared {} previous summary rows", removed);
            insert_row(&tx, summary)
        })();
        let id = finish(tx, result)?;
        log::info!("Aggregated data successfully stored in the database (id={})", id);
        Ok(FiveYearSummary {
            id: Some(id),
            ..summary.clone()
        })
    }

    /// Execute SQL and return results as a `Vec` of `HashMap`s.
    ///
    /// Each row is represented as a `HashMap<String, serde_json::Value>`.
    pub fn execute(
        &self,
        sql: &str,
        params: &[Value],
    ) -> Result<Vec<HashMap<String, serde_json::Value>>> {
        let mut stmt = self.conn.prepare(sql)?;
        let param_values: Vec<&dyn duckdb::ToSql> =
            params.iter().map(|p| p as &dyn duckdb::ToSql).collect();

        let mut rows = stmt.query(param_values.as_slice())?;

        // Column metadata is only available once the statement has run.
        let column_names: Vec<String> = rows
            .as_ref()
            .ok_or_else(|| AlmanacError::InvalidArgument("statement has no columns".into()))?
            .column_names()
            .into_iter()
            .map(|s| s.to_string())
            .collect();

        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let mut map = HashMap::with_capacity(column_names.len());
            for (i, name) in column_names.iter().enumerate() {
                map.insert(name.clone(), convert_value_ref(row.get_ref(i)?));
            }
            out.push(map);
        }
        Ok(out)
    }

    /// Execute SQL and deserialize each row into type `T`.
    pub fn execute_into<T: DeserializeOwned>(&self, sql: &str, params: &[Value]) -> Result<Vec<T>> {
        self.execute(sql, params)?
            .into_iter()
            .map(|row| {
                let value = serde_json::Value::Object(row.into_iter().collect());
                Ok(serde_json::from_value(value)?)
            })
            .collect()
    }

    /// Execute SQL and return the first column of the first row, if any.
    pub fn execute_scalar(&self, sql: &str, params: &[Value]) -> Result<Option<serde_json::Value>> {
        let mut stmt = self.conn.prepare(sql)?;
        let param_values: Vec<&dyn duckdb::ToSql> =
            params.iter().map(|p| p as &dyn duckdb::ToSql).collect();
        let mut rows = stmt.query(param_values.as_slice())?;
        match rows.next()? {
            Some(row) => Ok(Some(convert_value_ref(row.get_ref(0)?))),
            None => Ok(None),
        }
    }

    /// Access the underlying DuckDB connection for advanced usage.
    pub fn raw(&self) -> &DuckDbConnection {
        &self.conn
    }
}

fn insert_row(tx: &Transaction<'_>, s: &FiveYearSummary) -> Result<i64> {
    let id: i64 = tx.query_row(
        &format!(
            "INSERT INTO {} (\
                 latitude, longitude, day, month, year, \
                 five_year_avg_temp, five_year_min_temp, five_year_max_temp, \
                 five_year_avg_wind_speed, five_year_min_wind_speed, five_year_max_wind_speed, \
                 five_year_avg_precip, five_year_min_precip, five_year_max_precip\
             ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING id",
            SUMMARY_TABLE
        ),
        params![
            s.latitude,
            s.longitude,
            s.day as i32,
            s.month as i32,
            s.year,
            s.five_year_avg_temp,
            s.five_year_min_temp,
            s.five_year_max_temp,
            s.five_year_avg_wind_speed,
            s.five_year_min_wind_speed,
            s.five_year_max_wind_speed,
            s.five_year_avg_precip,
            s.five_year_min_precip,
            s.five_year_max_precip,
        ],
        |row| row.get(0),
    )?;
    Ok(id)
}

/// Commit on success, roll back on failure, and return the write error.
fn finish<T>(tx: Transaction<'_>, result: Result<T>) -> Result<T> {
    match result {
        Ok(value) => {
            tx.commit()?;
            Ok(value)
        }
        Err(e) => {
            log::error!("Error while writing to the database: {}", e);
            if let Err(rollback) = tx.rollback() {
                log::error!("Rollback failed: {}", rollback);
            }
            Err(e)
        }
    }
}

/// Convert a DuckDB `ValueRef` to a `serde_json::Value`.
fn convert_value_ref(val: ValueRef<'_>) -> serde_json::Value {
    match val {
        ValueRef::Null => serde_json::Value::Null,
        ValueRef::Boolean(b) => serde_json::Value::Bool(b),
        ValueRef::TinyInt(n) => n.into(),
        ValueRef::SmallInt(n) => n.into(),
        ValueRef::Int(n) => n.into(),
        ValueRef::BigInt(n) => n.into(),
        ValueRef::UTinyInt(n) => n.into(),
        ValueRef::USmallInt(n) => n.into(),
        ValueRef::UInt(n) => n.into(),
        ValueRef::UBigInt(n) => n.into(),
        ValueRef::HugeInt(n) => match i64::try_from(n) {
            Ok(i) => i.into(),
            Err(_) => serde_json::Value::String(n.to_string()),
        },
        ValueRef::Float(f) => serde_json::Number::from_f64(f as f64)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        ValueRef::Double(f) => serde_json::Number::from_f64(f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        ValueRef::Text(bytes) => serde_json::Value::String(String::from_utf8_lossy(bytes).into_owned()),
        _ => serde_json::Value::Null,
    }
}
