//! Reads stored five-year summaries back out of the summary table.

use duckdb::types::Value;

use crate::config::SUMMARY_TABLE;
use crate::error::{AlmanacError, Result};
use crate::models::{FiveYearSummary, LocationDateQuery};
use crate::sql_builder::SqlBuilder;
use crate::store::SummaryStore;

/// Query interface for stored summaries, borrowing a [`SummaryStore`].
pub struct PredictionReader<'a> {
    store: &'a SummaryStore,
}

impl<'a> PredictionReader<'a> {
    pub fn new(store: &'a SummaryStore) -> Self {
        Self { store }
    }

    /// The first stored summary produced for exactly `query`.
    ///
    /// Matches on latitude, longitude, day, month and year, so the result
    /// stays correct if the table ever holds more than one location.
    pub fn read_summary(&self, query: &LocationDateQuery) -> Result<FiveYearSummary> {
        let (sql, params) = SqlBuilder::new(SUMMARY_TABLE)
            .where_eq("latitude", Value::Double(query.latitude()))
            .where_eq("longitude", Value::Double(query.longitude()))
            .where_eq("day", Value::Int(query.day() as i32))
            .where_eq("month", Value::Int(query.month() as i32))
            .where_eq("year", Value::Int(query.year()))
            .order_by(&["id ASC"])
            .limit(1)
            .build();

        self.store
            .execute_into::<FiveYearSummary>(&sql, &params)?
            .into_iter()
            .next()
            .ok_or_else(|| AlmanacError::NotFound(format!("no stored summary for {}", query)))
    }

    /// The first row in the table, whatever query produced it.
    pub fn first(&self) -> Result<Option<FiveYearSummary>> {
        self.one_ordered_by("id ASC")
    }

    /// The most recently inserted row.
    pub fn latest(&self) -> Result<Option<FiveYearSummary>> {
        self.one_ordered_by("id DESC")
    }

    /// Number of stored summaries.
    pub fn count(&self) -> Result<i64> {
        let (sql, params) = SqlBuilder::new(SUMMARY_TABLE)
            .select(&["COUNT(*) AS cnt"])
            .build();
        let cnt = self
            .store
            .execute_scalar(&sql, &params)?
            .and_then(|v| v.as_i64())
            .unwrap_or(0);
        Ok(cnt)
    }

    fn one_ordered_by(&self, order: &str) -> Result<Option<FiveYearSummary>> {
        let (sql, params) = SqlBuilder::new(SUMMARY_TABLE)
            .order_by(&[order])
            .limit(1)
            .build();
        Ok(self
            .store
            .execute_into::<FiveYearSummary>(&sql, &params)?
            .into_iter()
            .next())
    }
}
