//! Five-year weather almanac.
//!
//! Fetches daily mean temperature, max wind speed and precipitation for one
//! place and calendar day across the trailing five years from the Open-Meteo
//! archive, reduces each variable to average / minimum / maximum, and stores
//! the summary in a local DuckDB database. Archive responses are cached on
//! disk, so repeated runs for the same place and day do not hit the network.
//!
//! # Quick start
//!
//! ```no_run
//! use weather_almanac::{LocationDateQuery, WeatherAlmanac};
//!
//! let mut almanac = WeatherAlmanac::builder().build().unwrap();
//! let query = LocationDateQuery::new(38.889722, -77.008889, 20, 1, 2024).unwrap();
//!
//! almanac.almanac_5_years(&query).unwrap();
//! let prediction = almanac.weather_predictor(&query).unwrap();
//! println!("{:.2}", prediction.five_year_avg_temp);
//! ```

pub mod aggregate;
pub mod cache;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod models;
pub mod queries;
pub mod retry;
pub mod sql_builder;
pub mod store;

pub use aggregate::{AggregationRun, FiveYearAggregator, SampleSet, SkippedPoint};
pub use cache::CachedClient;
pub use error::{AlmanacError, FetchFailure, Result};
pub use fetcher::{ArchiveFetcher, ArchiveRequest, SampleSource};
pub use models::{DailySample, FiveYearSummary, LocationDateQuery, Stats, WeatherVariable};
pub use queries::PredictionReader;
pub use retry::RetryPolicy;
pub use sql_builder::SqlBuilder;
pub use store::SummaryStore;

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

// ---------------------------------------------------------------------------
// WeatherAlmanacBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`WeatherAlmanac`].
pub struct WeatherAlmanacBuilder {
    cache_dir: Option<PathBuf>,
    database: Option<PathBuf>,
    in_memory: bool,
    offline: bool,
    timeout: Duration,
    retry: RetryPolicy,
    endpoint: String,
}

impl Default for WeatherAlmanacBuilder {
    fn default() -> Self {
        Self {
            cache_dir: None,
            database: None,
            in_memory: false,
            offline: false,
            timeout: Duration::from_secs(config::DEFAULT_TIMEOUT_SECS),
            retry: RetryPolicy::default(),
            endpoint: config::ARCHIVE_URL.to_string(),
        }
    }
}

impl WeatherAlmanacBuilder {
    /// Set the directory for cached archive responses.
    ///
    /// Defaults to the platform cache directory (e.g. `~/.cache/weather-almanac`).
    pub fn cache_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.cache_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the DuckDB database file. Defaults to `weather_5_years.duckdb`.
    pub fn database<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.database = Some(path.as_ref().to_path_buf());
        self.in_memory = false;
        self
    }

    /// Keep summaries in a private in-memory database instead of a file.
    pub fn in_memory(mut self) -> Self {
        self.in_memory = true;
        self
    }

    /// When offline, only cached archive responses are used.
    pub fn offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    /// Per-request HTTP timeout. Defaults to 30 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Retry policy for archive requests. Defaults to [`RetryPolicy::default`].
    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Override the archive endpoint URL.
    pub fn endpoint(mut self, url: &str) -> Self {
        self.endpoint = url.to_string();
        self
    }

    /// Build the almanac, creating the cache directory and opening the store.
    pub fn build(self) -> Result<WeatherAlmanac> {
        let client = CachedClient::new(self.cache_dir, self.offline, self.timeout, self.retry)?;
        let store = if self.in_memory {
            SummaryStore::open_in_memory()?
        } else {
            SummaryStore::open(self.database.unwrap_or_else(config::default_database_path))?
        };
        Ok(WeatherAlmanac {
            client,
            store,
            endpoint: self.endpoint,
        })
    }
}

// ---------------------------------------------------------------------------
// WeatherAlmanac
// ---------------------------------------------------------------------------

/// Owns the HTTP client and the summary store and runs the almanac pipeline.
pub struct WeatherAlmanac {
    client: CachedClient,
    store: SummaryStore,
    endpoint: String,
}

impl WeatherAlmanac {
    pub fn builder() -> WeatherAlmanacBuilder {
        WeatherAlmanacBuilder::default()
    }

    /// Archive fetcher bound to this almanac's client.
    pub fn fetcher(&self) -> ArchiveFetcher<'_> {
        ArchiveFetcher::with_endpoint(&self.client, &self.endpoint)
    }

    /// Fetch, aggregate and store the five-year summary for `query`.
    ///
    /// Replaces whatever the table held before. Nothing is written if any
    /// variable ends up without samples.
    pub fn almanac_5_years(&mut self, query: &LocationDateQuery) -> Result<AggregationRun> {
        let fetcher = ArchiveFetcher::with_endpoint(&self.client, &self.endpoint);
        aggregate_and_store(&mut self.store, &fetcher, query)
    }

    /// Same as [`almanac_5_years`](Self::almanac_5_years) with a caller-supplied sample source.
    pub fn almanac_5_years_from<S: SampleSource + ?Sized>(
        &mut self,
        source: &S,
        query: &LocationDateQuery,
    ) -> Result<AggregationRun> {
        aggregate_and_store(&mut self.store, source, query)
    }

    /// Read back the stored summary for `query`.
    pub fn weather_predictor(&self, query: &LocationDateQuery) -> Result<FiveYearSummary> {
        self.predictions().read_summary(query)
    }

    pub fn predictions(&self) -> PredictionReader<'_> {
        PredictionReader::new(&self.store)
    }

    pub fn client(&self) -> &CachedClient {
        &self.client
    }
}

fn aggregate_and_store<S: SampleSource + ?Sized>(
    store: &mut SummaryStore,
    source: &S,
    query: &LocationDateQuery,
) -> Result<AggregationRun> {
    let run = FiveYearAggregator::new(source).build_summary(query)?;
    let summary = store.replace(&run.summary)?;
    Ok(AggregationRun { summary, ..run })
}

impl fmt::Display for WeatherAlmanac {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "WeatherAlmanac(cache_dir={}, endpoint={}, offline={})",
            self.client.cache_dir.display(),
            self.endpoint,
            self.client.offline
        )
    }
}
