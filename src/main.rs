use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use weather_almanac::{
    config, AlmanacError, FiveYearSummary, LocationDateQuery, RetryPolicy, WeatherAlmanac,
    WeatherVariable,
};

// U.S. Capitol, inauguration day 2024.
const DEMO_LATITUDE: f64 = 38.889722;
const DEMO_LONGITUDE: f64 = -77.008889;
const DEMO_DAY: u32 = 20;
const DEMO_MONTH: u32 = 1;
const DEMO_YEAR: i32 = 2024;

#[derive(Debug, Parser)]
#[command(about = "Five-year weather almanac for one place and calendar day.")]
struct Cli {
    #[arg(long, env = "WEATHER_ALMANAC_LATITUDE", default_value_t = DEMO_LATITUDE, allow_hyphen_values = true)]
    latitude: f64,
    #[arg(long, env = "WEATHER_ALMANAC_LONGITUDE", default_value_t = DEMO_LONGITUDE, allow_hyphen_values = true)]
    longitude: f64,
    #[arg(long, env = "WEATHER_ALMANAC_DAY", default_value_t = DEMO_DAY)]
    day: u32,
    #[arg(long, env = "WEATHER_ALMANAC_MONTH", default_value_t = DEMO_MONTH)]
    month: u32,
    /// Anchor year; the almanac covers this year and the four before it.
    #[arg(long, env = "WEATHER_ALMANAC_YEAR", default_value_t = DEMO_YEAR)]
    year: i32,
    /// DuckDB database file holding the summary table.
    #[arg(long, env = "WEATHER_ALMANAC_DATABASE", default_value = config::DEFAULT_DATABASE_FILE)]
    database: PathBuf,
    /// Directory for cached archive responses.
    #[arg(long, env = "WEATHER_ALMANAC_CACHE_DIR")]
    cache_dir: Option<PathBuf>,
    /// Only use cached archive responses.
    #[arg(long, env = "WEATHER_ALMANAC_OFFLINE")]
    offline: bool,
    /// HTTP timeout in seconds.
    #[arg(long, env = "WEATHER_ALMANAC_TIMEOUT", default_value_t = config::DEFAULT_TIMEOUT_SECS)]
    timeout: u64,
    /// Retries per archive request on transient failures.
    #[arg(long, env = "WEATHER_ALMANAC_RETRIES", default_value_t = config::DEFAULT_MAX_RETRIES)]
    retries: u32,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), AlmanacError> {
    let query = LocationDateQuery::new(cli.latitude, cli.longitude, cli.day, cli.month, cli.year)?;

    let mut builder = WeatherAlmanac::builder()
        .database(&cli.database)
        .offline(cli.offline)
        .timeout(Duration::from_secs(cli.timeout))
        .retry(RetryPolicy {
            max_retries: cli.retries,
            ..RetryPolicy::default()
        });
    if let Some(dir) = &cli.cache_dir {
        builder = builder.cache_dir(dir);
    }
    let mut almanac = builder.build()?;
    log::debug!("{}", almanac);

    println!("Let's get to work on your weather data for {}.", query);

    let run = almanac.almanac_5_years(&query)?;
    println!("Weather data successfully pulled and stored.");
    if !run.skipped.is_empty() {
        println!("Skipped {} data points:", run.skipped.len());
        for point in &run.skipped {
            println!("  {} {}: {}", point.year, point.variable, point.reason);
        }
    }

    let prediction = almanac.weather_predictor(&query)?;
    println!("Weather prediction successfully calculated.");
    print_summary(&prediction);
    Ok(())
}

fn print_summary(summary: &FiveYearSummary) {
    for variable in WeatherVariable::ALL {
        let cfg = variable.config();
        let stats = summary.stats(variable);
        println!(
            "Average {} of the last 5 years was {:.2} {}.",
            cfg.label, stats.avg, cfg.unit_label
        );
        println!(
            "Lowest {} of the last 5 years was {:.2} {}.",
            cfg.label, stats.min, cfg.unit_label
        );
        println!(
            "Highest {} of the last 5 years was {:.2} {}.",
            cfg.label, stats.max, cfg.unit_label
        );
    }
}
