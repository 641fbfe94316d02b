//! Single-day requests against the Open-Meteo historical archive.

use chrono::{Local, NaiveDate};
use serde_json::Value;

use crate::cache::CachedClient;
use crate::config;
pub use crate::error::FetchFailure;
use crate::models::{DailySample, WeatherVariable};

// ---------------------------------------------------------------------------
// SampleSource
// ---------------------------------------------------------------------------

/// Anything that can produce one daily sample for a variable, place and date.
///
/// The aggregator is written against this trait so it can be driven by the
/// archive in production and by canned values in tests.
pub trait SampleSource {
    fn fetch(
        &self,
        variable: WeatherVariable,
        latitude: f64,
        longitude: f64,
        day: u32,
        month: u32,
        year: i32,
    ) -> Result<DailySample, FetchFailure>;
}

// ---------------------------------------------------------------------------
// ArchiveRequest
// ---------------------------------------------------------------------------

/// Parameters of one archive call: one variable, one place, one day.
#[derive(Debug, Clone, PartialEq)]
pub struct ArchiveRequest {
    pub variable: WeatherVariable,
    pub latitude: f64,
    pub longitude: f64,
    pub date: NaiveDate,
    pub timezone: String,
}

impl ArchiveRequest {
    pub fn new(variable: WeatherVariable, latitude: f64, longitude: f64, date: NaiveDate) -> Self {
        Self {
            variable,
            latitude,
            longitude,
            date,
            timezone: config::ARCHIVE_TIMEZONE.to_string(),
        }
    }

    /// Query parameters, in the order they are sent.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let cfg = self.variable.config();
        let date = self.date.format("%Y-%m-%d").to_string();
        vec![
            ("latitude", self.latitude.to_string()),
            ("longitude", self.longitude.to_string()),
            ("start_date", date.clone()),
            ("end_date", date),
            ("daily", cfg.daily_field.to_string()),
            (cfg.unit_param, cfg.unit_value.to_string()),
            ("timezone", self.timezone.clone()),
        ]
    }

    /// Relative cache path, unique per variable, place, day and timezone.
    pub fn cache_key(&self) -> String {
        let tz = self.timezone.replace('/', "_");
        format!(
            "archive/{}/{}_{}_{}_{}.json",
            self.variable.daily_field(),
            self.latitude,
            self.longitude,
            self.date.format("%Y-%m-%d"),
            tz
        )
    }
}

// ---------------------------------------------------------------------------
// ArchiveFetcher
// ---------------------------------------------------------------------------

/// Fetches daily samples from the archive through a [`CachedClient`].
pub struct ArchiveFetcher<'a> {
    client: &'a CachedClient,
    endpoint: String,
}

impl<'a> ArchiveFetcher<'a> {
    /// Create a fetcher against the public archive endpoint.
    pub fn new(client: &'a CachedClient) -> Self {
        Self::with_endpoint(client, config::ARCHIVE_URL)
    }

    pub fn with_endpoint(client: &'a CachedClient, endpoint: &str) -> Self {
        Self {
            client,
            endpoint: endpoint.to_string(),
        }
    }

    /// Build the request for a date, validating that it exists and is not in the future.
    pub fn request(
        &self,
        variable: WeatherVariable,
        latitude: f64,
        longitude: f64,
        day: u32,
        month: u32,
        year: i32,
    ) -> Result<ArchiveRequest, FetchFailure> {
        let formatted = format!("{:04}-{:02}-{:02}", year, month, day);
        let date = NaiveDate::from_ymd_opt(year, month, day)
            .ok_or_else(|| FetchFailure::InvalidDate(formatted.clone()))?;
        if date > Local::now().date_naive() {
            return Err(FetchFailure::InvalidDate(formatted));
        }
        Ok(ArchiveRequest::new(variable, latitude, longitude, date))
    }
}

impl SampleSource for ArchiveFetcher<'_> {
    fn fetch(
        &self,
        variable: WeatherVariable,
        latitude: f64,
        longitude: f64,
        day: u32,
        month: u32,
        year: i32,
    ) -> Result<DailySample, FetchFailure> {
        let request = self.request(variable, latitude, longitude, day, month, year)?;
        self.client.get_json(
            &request.cache_key(),
            &self.endpoint,
            &request.params(),
            |data| parse_sample(variable, request.date, data),
        )
    }
}

/// Extract `daily.<field>[0]` from an archive response.
pub fn parse_sample(
    variable: WeatherVariable,
    date: NaiveDate,
    data: &Value,
) -> Result<DailySample, FetchFailure> {
    let field = variable.daily_field();
    let daily = data
        .get("daily")
        .ok_or_else(|| FetchFailure::Malformed(format!("missing 'daily' in {}", data)))?;
    let values = daily
        .get(field)
        .and_then(|v| v.as_array())
        .ok_or_else(|| FetchFailure::Malformed(format!("missing 'daily.{}' in {}", field, data)))?;
    let value = values
        .first()
        .and_then(|v| v.as_f64())
        .ok_or_else(|| {
            FetchFailure::Malformed(format!("no numeric value in 'daily.{}' for {}", field, date))
        })?;

    Ok(DailySample {
        variable,
        date,
        value,
    })
}
