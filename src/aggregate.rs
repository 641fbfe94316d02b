//! Five-year collection and reduction of daily samples.
//!
//! For each year from `query.year - 4` to `query.year` the aggregator asks its
//! [`SampleSource`] for every [`WeatherVariable`]. A failed point is logged and
//! skipped; only a variable with no samples at all fails the run.

use crate::error::{AlmanacError, FetchFailure, Result};
use crate::fetcher::SampleSource;
use crate::models::{DailySample, FiveYearSummary, LocationDateQuery, Stats, WeatherVariable};

// ---------------------------------------------------------------------------
// SampleSet
// ---------------------------------------------------------------------------

/// Collected values per variable, in collection order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleSet {
    temperature: Vec<f64>,
    wind_speed: Vec<f64>,
    precipitation: Vec<f64>,
}

impl SampleSet {
    pub fn push(&mut self, sample: DailySample) {
        self.values_mut(sample.variable).push(sample.value);
    }

    pub fn values(&self, variable: WeatherVariable) -> &[f64] {
        match variable {
            WeatherVariable::MeanTemperature => &self.temperature,
            WeatherVariable::MaxWindSpeed => &self.wind_speed,
            WeatherVariable::PrecipitationSum => &self.precipitation,
        }
    }

    fn values_mut(&mut self, variable: WeatherVariable) -> &mut Vec<f64> {
        match variable {
            WeatherVariable::MeanTemperature => &mut self.temperature,
            WeatherVariable::MaxWindSpeed => &mut self.wind_speed,
            WeatherVariable::PrecipitationSum => &mut self.precipitation,
        }
    }

    /// Reduce one variable, failing with [`AlmanacError::NoData`] if it has no samples.
    pub fn stats(&self, variable: WeatherVariable) -> Result<Stats> {
        Stats::from_samples(self.values(variable)).ok_or(AlmanacError::NoData { variable })
    }
}

// ---------------------------------------------------------------------------
// SkippedPoint / AggregationRun
// ---------------------------------------------------------------------------

/// A (year, variable) point that produced no sample.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedPoint {
    pub variable: WeatherVariable,
    pub year: i32,
    pub reason: FetchFailure,
}

/// Result of one aggregation: the unsaved summary plus what was skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregationRun {
    pub summary: FiveYearSummary,
    pub samples: SampleSet,
    pub skipped: Vec<SkippedPoint>,
}

// ---------------------------------------------------------------------------
// FiveYearAggregator
// ---------------------------------------------------------------------------

pub struct FiveYearAggregator<'a, S: SampleSource + ?Sized> {
    source: &'a S,
}

impl<'a, S: SampleSource + ?Sized> FiveYearAggregator<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self { source }
    }

    /// Fetch every variable for each of the five years, oldest year first.
    pub fn collect(&self, query: &LocationDateQuery) -> (SampleSet, Vec<SkippedPoint>) {
        let mut samples = SampleSet::default();
        let mut skipped = Vec::new();

        for year in query.years() {
            let formatted = format!("{:04}-{:02}-{:02}", year, query.month(), query.day());
            log::info!("Fetching data for {}", formatted);

            let mut complete = true;
            for variable in WeatherVariable::ALL {
                match self.source.fetch(
                    variable,
                    query.latitude(),
                    query.longitude(),
                    query.day(),
                    query.month(),
                    year,
                ) {
                    Ok(sample) => samples.push(sample),
                    Err(reason) => {
                        log::warn!("Error fetching {} data for {}: {}", variable, formatted, reason);
                        complete = false;
                        skipped.push(SkippedPoint {
                            variable,
                            year,
                            reason,
                        });
                    }
                }
            }
            if complete {
                log::info!("Successfully fetched data for {}", year);
            }
        }

        (samples, skipped)
    }

    /// Collect samples and reduce them into an unsaved [`FiveYearSummary`].
    ///
    /// Fails with [`AlmanacError::NoData`] naming the first variable (in fetch
    /// order) that has no samples.
    pub fn build_summary(&self, query: &LocationDateQuery) -> Result<AggregationRun> {
        let (samples, skipped) = self.collect(query);

        let temperature = samples.stats(WeatherVariable::MeanTemperature)?;
        let wind_speed = samples.stats(WeatherVariable::MaxWindSpeed)?;
        let precipitation = samples.stats(WeatherVariable::PrecipitationSum)?;

        Ok(AggregationRun {
            summary: FiveYearSummary::new(query, temperature, wind_speed, precipitation),
            samples,
            skipped,
        })
    }
}
