use chrono::NaiveDate;
use std::fmt;
use std::ops::RangeInclusive;

use crate::config;
use crate::error::{AlmanacError, Result};

// ---------------------------------------------------------------------------
// LocationDateQuery
// ---------------------------------------------------------------------------

/// Anchor point and calendar day for a five-year almanac.
///
/// The day/month pair is validated only for range here. Whether it exists in a
/// particular year (Feb 29) is decided per year by [`date_in`](Self::date_in).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationDateQuery {
    latitude: f64,
    longitude: f64,
    day: u32,
    month: u32,
    year: i32,
}

impl LocationDateQuery {
    /// Create a query, rejecting out-of-range coordinates, day/month values, or a
    /// year whose five-year window cannot be represented as calendar dates.
    pub fn new(latitude: f64, longitude: f64, day: u32, month: u32, year: i32) -> Result<Self> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(AlmanacError::InvalidArgument(format!(
                "latitude must be within [-90, 90], got {}",
                latitude
            )));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(AlmanacError::InvalidArgument(format!(
                "longitude must be within [-180, 180], got {}",
                longitude
            )));
        }
        if !(1..=12).contains(&month) {
            return Err(AlmanacError::InvalidArgument(format!(
                "month must be within 1..=12, got {}",
                month
            )));
        }
        if !(1..=31).contains(&day) {
            return Err(AlmanacError::InvalidArgument(format!(
                "day must be within 1..=31, got {}",
                day
            )));
        }
        // At least one year in 2000 (a leap year) must contain the day.
        if NaiveDate::from_ymd_opt(2000, month, day).is_none() {
            return Err(AlmanacError::InvalidArgument(format!(
                "{:02}-{:02} is not a valid calendar day",
                month, day
            )));
        }
        let first_year = year.checked_sub(config::YEAR_SPAN - 1);
        if first_year
            .and_then(|first| NaiveDate::from_ymd_opt(first, 1, 1))
            .and(NaiveDate::from_ymd_opt(year, 12, 31))
            .is_none()
        {
            return Err(AlmanacError::InvalidArgument(format!(
                "year {} is outside the supported calendar range",
                year
            )));
        }
        Ok(Self {
            latitude,
            longitude,
            day,
            month,
            year,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// The trailing years covered by this query, oldest first.
    pub fn years(&self) -> RangeInclusive<i32> {
        (self.year - (config::YEAR_SPAN - 1))..=self.year
    }

    /// The query's day and month in `year`, or `None` if that date does not exist.
    pub fn date_in(&self, year: i32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(year, self.month, self.day)
    }
}

impl fmt::Display for LocationDateQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}) on {:04}-{:02}-{:02}",
            self.latitude, self.longitude, self.year, self.month, self.day
        )
    }
}
