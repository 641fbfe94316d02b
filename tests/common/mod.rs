//! Shared test fixtures for the weather almanac integration tests.
//!
//! Provides a canned [`SampleSource`], an offline [`CachedClient`] over a
//! temporary cache directory, and helpers to seed archive responses into it.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::time::Duration;

use chrono::NaiveDate;
use weather_almanac::{
    ArchiveRequest, CachedClient, DailySample, FetchFailure, FiveYearSummary, LocationDateQuery,
    RetryPolicy, SampleSource, Stats, SummaryStore, WeatherVariable,
};

pub const LAT: f64 = 38.889722;
pub const LON: f64 = -77.008889;

pub fn demo_query() -> LocationDateQuery {
    LocationDateQuery::new(LAT, LON, 20, 1, 2024).unwrap()
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

// ---------------------------------------------------------------------------
// StubSource
// ---------------------------------------------------------------------------

/// Returns canned values per (variable, year) and records every call.
///
/// Points without a canned value fail as `Transient`.
#[derive(Default)]
pub struct StubSource {
    values: HashMap<(WeatherVariable, i32), Result<f64, FetchFailure>>,
    pub calls: RefCell<Vec<(WeatherVariable, i32)>>,
}

impl StubSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Values for consecutive years starting at `first_year`.
    pub fn series(mut self, variable: WeatherVariable, first_year: i32, values: &[f64]) -> Self {
        for (i, v) in values.iter().enumerate() {
            self.values
                .insert((variable, first_year + i as i32), Ok(*v));
        }
        self
    }

    pub fn fail(mut self, variable: WeatherVariable, year: i32, failure: FetchFailure) -> Self {
        self.values.insert((variable, year), Err(failure));
        self
    }

    /// The three demo series for 2020..=2024.
    pub fn demo() -> Self {
        Self::new()
            .series(WeatherVariable::MeanTemperature, 2020, &[30.0, 35.0, 40.0, 45.0, 50.0])
            .series(WeatherVariable::MaxWindSpeed, 2020, &[10.0, 12.0, 14.0, 16.0, 20.0])
            .series(WeatherVariable::PrecipitationSum, 2020, &[0.1, 0.2, 0.3, 0.4, 0.5])
    }
}

impl SampleSource for StubSource {
    fn fetch(
        &self,
        variable: WeatherVariable,
        _latitude: f64,
        _longitude: f64,
        day: u32,
        month: u32,
        year: i32,
    ) -> Result<DailySample, FetchFailure> {
        self.calls.borrow_mut().push((variable, year));
        let value = self
            .values
            .get(&(variable, year))
            .cloned()
            .unwrap_or_else(|| Err(FetchFailure::Transient("no canned value".into())))?;
        Ok(DailySample {
            variable,
            date: NaiveDate::from_ymd_opt(year, month, day).unwrap(),
            value,
        })
    }
}

// ---------------------------------------------------------------------------
// Offline client + cache seeding
// ---------------------------------------------------------------------------

/// An offline client over a fresh temp directory.
///
/// The caller must keep the `TempDir` alive for the duration of the test.
pub fn offline_client() -> (CachedClient, tempfile::TempDir) {
    let tmp = tempfile::tempdir().unwrap();
    let client = CachedClient::new(
        Some(tmp.path().to_path_buf()),
        true,
        Duration::from_secs(5),
        RetryPolicy::none(),
    )
    .unwrap();
    (client, tmp)
}

/// A networked client over a fresh temp directory.
pub fn online_client(retry: RetryPolicy) -> (CachedClient, tempfile::TempDir) {
    let tmp = tempfile::tempdir().unwrap();
    let client = CachedClient::new(
        Some(tmp.path().to_path_buf()),
        false,
        Duration::from_secs(5),
        retry,
    )
    .unwrap();
    (client, tmp)
}

/// Write a raw cached body for the request at (variable, lat, lon, date).
pub fn seed_raw(cache: &CachedClient, request: &ArchiveRequest, body: &str) {
    let path = cache.cache_path(&request.cache_key());
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, body).unwrap();
}

/// Seed an archive-shaped response carrying `value` for one day.
pub fn seed_value(cache: &CachedClient, variable: WeatherVariable, date: NaiveDate, value: f64) {
    let request = ArchiveRequest::new(variable, LAT, LON, date);
    let body = serde_json::json!({
        "latitude": LAT,
        "longitude": LON,
        "timezone": "America/New_York",
        "daily": {
            "time": [date.format("%Y-%m-%d").to_string()],
            variable.daily_field(): [value],
        }
    });
    seed_raw(cache, &request, &body.to_string());
}

/// Seed the three demo series for 2020..=2024 on January 20th.
pub fn seed_demo(cache: &CachedClient) {
    let series = [
        (WeatherVariable::MeanTemperature, [30.0, 35.0, 40.0, 45.0, 50.0]),
        (WeatherVariable::MaxWindSpeed, [10.0, 12.0, 14.0, 16.0, 20.0]),
        (WeatherVariable::PrecipitationSum, [0.1, 0.2, 0.3, 0.4, 0.5]),
    ];
    for (variable, values) in series {
        for (i, value) in values.iter().enumerate() {
            let date = NaiveDate::from_ymd_opt(2020 + i as i32, 1, 20).unwrap();
            seed_value(cache, variable, date, *value);
        }
    }
}

/// A summary with distinct, easy-to-check values.
pub fn sample_summary(year: i32) -> FiveYearSummary {
    let query = LocationDateQuery::new(LAT, LON, 20, 1, year).unwrap();
    FiveYearSummary::new(
        &query,
        Stats { avg: 40.0, min: 30.0, max: 50.0 },
        Stats { avg: 15.0, min: 10.0, max: 20.0 },
        Stats { avg: 0.3, min: 0.1, max: 0.5 },
    )
}

/// Append rows with plain SQL. The store itself only ever replaces the table,
/// so this is how tests get more than one row in it.
pub fn append_rows(store: &SummaryStore, summaries: &[FiveYearSummary]) {
    for s in summaries {
        store
            .raw()
            .execute(
                "INSERT INTO weather_5_years (\
                     latitude, longitude, day, month, year, \
                     five_year_avg_temp, five_year_min_temp, five_year_max_temp, \
                     five_year_avg_wind_speed, five_year_min_wind_speed, five_year_max_wind_speed, \
                     five_year_avg_precip, five_year_min_precip, five_year_max_precip\
                 ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                duckdb::params![
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
            )
            .unwrap();
    }
}
