//! Command-line entry point for running and diagnosing the driver.

use argh::FromArgs;
use std::io::Write;
use tokio::sync::watch;

use crate::config::{load_config_or_default, StationConfig};
use crate::error::DriverError;
use crate::fetcher::ReadingFetcher;
use crate::logger::LogFacade;
use crate::record::epoch_now;
use crate::station::WeatherStation;
use crate::DRIVER_VERSION;

/// Standard CLI arguments for the jsonwx driver.
#[derive(FromArgs, Debug)]
#[argh(description = "Weather station driver for JSON sensor endpoints")]
pub struct DriverArgs {
    /// display driver version
    #[argh(switch)]
    pub version: bool,

    /// print raw readings fetched from this url instead of records
    #[argh(option)]
    pub url: Option<String>,

    /// path to YAML configuration file (defaults are used if it is missing)
    #[argh(option, short = 'c', default = "String::from(\"jsonwx.yaml\")")]
    pub config: String,

    /// print the default configuration stanza
    #[argh(switch)]
    pub print_config: bool,
}

/// Initialize logging with env_logger.
///
/// Respects RUST_LOG environment variable. Defaults to "info" level.
pub fn setup_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

/// Watch channel that fires on Ctrl+C / SIGTERM.
pub fn setup_shutdown() -> Result<watch::Receiver<()>, DriverError> {
    let (shutdown_tx, shutdown_rx) = watch::channel(());
    ctrlc::set_handler(move || {
        log::info!("Received shutdown signal");
        let _ = shutdown_tx.send(());
    })
    .map_err(|e| DriverError::Init(e.to_string()))?;
    Ok(shutdown_rx)
}

/// Run the driver as selected by `args`.
///
/// Records are written to stdout as JSON lines; logs go to stderr.
pub async fn run_driver(args: DriverArgs) -> Result<(), DriverError> {
    if args.version {
        println!("jsonwx driver version {DRIVER_VERSION}");
        return Ok(());
    }

    if args.print_config {
        print!("{}", StationConfig::default_stanza());
        return Ok(());
    }

    log::info!("Loading config from: {}", args.config);
    let mut config: StationConfig = load_config_or_default(&args.config)?;

    let shutdown = setup_shutdown()?;

    match args.url {
        Some(url) => {
            config.url = url;
            print_raw_readings(&config, shutdown).await
        }
        None => run_station(&config, shutdown).await,
    }
}

async fn run_station(
    config: &StationConfig,
    shutdown: watch::Receiver<()>,
) -> Result<(), DriverError> {
    let station = WeatherStation::from_config(config, LogFacade::shared())?;
    log::info!("Station {} running. Press Ctrl+C to stop.", config.hardware_name());

    let stdout = std::io::stdout();
    station
        .run(shutdown, |record| match serde_json::to_string(&record) {
            Ok(line) => {
                if let Err(e) = writeln!(stdout.lock(), "{line}") {
                    log::error!("Failed to write record: {e}");
                }
            }
            Err(e) => log::error!("Failed to encode record: {e}"),
        })
        .await?;

    log::info!("Station stopped");
    Ok(())
}

async fn print_raw_readings(
    config: &StationConfig,
    mut shutdown: watch::Receiver<()>,
) -> Result<(), DriverError> {
    let fetcher = ReadingFetcher::new(config.endpoint()?, LogFacade::shared())?;
    let interval = config.loop_interval()?;
    log::info!("Printing raw readings from {}", fetcher.endpoint().url);

    loop {
        let raw = fetcher.fetch_with_retry().await?;
        writeln!(std::io::stdout().lock(), "{} {}", epoch_now(), raw)?;

        tokio::select! {
            biased;
            _ = shutdown.changed() => break,
            _ = tokio::time::sleep(interval) => {}
        }
    }
    Ok(())
}
