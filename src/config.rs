use std::path::PathBuf;

pub const ARCHIVE_URL: &str = "https://archive-api.open-meteo.com/v1/archive";

/// Timezone the archive uses to interpret `start_date` / `end_date`.
pub const ARCHIVE_TIMEZONE: &str = "America/New_York";

/// Number of trailing years (anchor year included) covered by one almanac run.
pub const YEAR_SPAN: i32 = 5;

pub const SUMMARY_TABLE: &str = "weather_5_years";
pub const SUMMARY_SEQUENCE: &str = "weather_5_years_id_seq";

pub const DEFAULT_DATABASE_FILE: &str = "weather_5_years.duckdb";

pub const DEFAULT_MAX_RETRIES: u32 = 5;
pub const DEFAULT_BACKOFF_FACTOR_MS: u64 = 200;
pub const DEFAULT_MAX_BACKOFF_MS: u64 = 30_000;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub fn default_cache_dir() -> PathBuf {
    if let Some(cache) = dirs::cache_dir() {
        cache.join("weather-almanac")
    } else {
        PathBuf::from(".weather-almanac-cache")
    }
}

pub fn default_database_path() -> PathBuf {
    PathBuf::from(DEFAULT_DATABASE_FILE)
}
