use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::query::LocationDateQuery;
use super::variable::WeatherVariable;

// ---------------------------------------------------------------------------
// DailySample: one observation returned by the archive
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailySample {
    pub variable: WeatherVariable,
    pub date: NaiveDate,
    pub value: f64,
}

// ---------------------------------------------------------------------------
// Stats: avg/min/max of a non-empty sample sequence
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub avg: f64,
    pub min: f64,
    pub max: f64,
}

impl Stats {
    /// Reduce a sequence of values. Returns `None` for an empty sequence.
    /// The average is clamped into `[min, max]`.
    pub fn from_samples(values: &[f64]) -> Option<Stats> {
        let first = *values.first()?;
        let (min, max, sum) = values.iter().skip(1).fold(
            (first, first, first),
            |(min, max, sum), &v| (min.min(v), max.max(v), sum + v),
        );
        let avg = (sum / values.len() as f64).max(min).min(max);
        Some(Stats { avg, min, max })
    }
}

// ---------------------------------------------------------------------------
// FiveYearSummary: the persisted aggregate row
// ---------------------------------------------------------------------------

/// One row of the `weather_5_years` table.
///
/// Field names match the column names so rows can be decoded straight from
/// query results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FiveYearSummary {
    #[serde(default)]
    pub id: Option<i64>,
    pub latitude: f64,
    pub longitude: f64,
    pub day: u32,
    pub month: u32,
    pub year: i32,

    pub five_year_avg_temp: f64,
    pub five_year_min_temp: f64,
    pub five_year_max_temp: f64,
    pub five_year_avg_wind_speed: f64,
    pub five_year_min_wind_speed: f64,
    pub five_year_max_wind_speed: f64,
    pub five_year_avg_precip: f64,
    pub five_year_min_precip: f64,
    pub five_year_max_precip: f64,
}

impl FiveYearSummary {
    /// Build an unsaved summary (no id) from the query and per-variable stats.
    pub fn new(
        query: &LocationDateQuery,
        temperature: Stats,
        wind_speed: Stats,
        precipitation: Stats,
    ) -> Self {
        Self {
            id: None,
            latitude: query.latitude(),
            longitude: query.longitude(),
            day: query.day(),
            month: query.month(),
            year: query.year(),
            five_year_avg_temp: temperature.avg,
            five_year_min_temp: temperature.min,
            five_year_max_temp: temperature.max,
            five_year_avg_wind_speed: wind_speed.avg,
            five_year_min_wind_speed: wind_speed.min,
            five_year_max_wind_speed: wind_speed.max,
            five_year_avg_precip: precipitation.avg,
            five_year_min_precip: precipitation.min,
            five_year_max_precip: precipitation.max,
        }
    }

    /// Stats stored for one variable.
    pub fn stats(&self, variable: WeatherVariable) -> Stats {
        match variable {
            WeatherVariable::MeanTemperature => Stats {
                avg: self.five_year_avg_temp,
                min: self.five_year_min_temp,
                max: self.five_year_max_temp,
            },
            WeatherVariable::MaxWindSpeed => Stats {
                avg: self.five_year_avg_wind_speed,
                min: self.five_year_min_wind_speed,
                max: self.five_year_max_wind_speed,
            },
            WeatherVariable::PrecipitationSum => Stats {
                avg: self.five_year_avg_precip,
                min: self.five_year_min_precip,
                max: self.five_year_max_precip,
            },
        }
    }

    /// True if this row was produced for exactly this query.
    pub fn matches(&self, query: &LocationDateQuery) -> bool {
        self.latitude == query.latitude()
            && self.longitude == query.longitude()
            && self.day == query.day()
            && self.month == query.month()
            && self.year == query.year()
    }
}
