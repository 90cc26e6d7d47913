//! Polling loop: fetch, parse, stamp, emit, sleep.

use futures::stream::{self, Stream};
use std::time::Duration;
use tokio::sync::watch;

use crate::config::StationConfig;
use crate::error::{DriverError, FetchError};
use crate::fetcher::{ReadingFetcher, ReadingSource};
use crate::logger::SharedLog;
use crate::parser::ReadingParser;
use crate::record::{epoch_now, ObservationRecord};
use crate::DRIVER_VERSION;

/// A weather station polled over HTTP.
///
/// Cycles run strictly one after another. A cycle whose reading does not
/// parse is skipped; a cycle whose fetch exhausts its retry budget ends the
/// loop with [`FetchError::RetriesExceeded`].
pub struct WeatherStation<S> {
    source: S,
    parser: ReadingParser,
    interval: Duration,
    log: SharedLog,
    clock: fn() -> i64,
}

impl WeatherStation<ReadingFetcher> {
    /// Build a station from host configuration.
    pub fn from_config(config: &StationConfig, log: SharedLog) -> Result<Self, DriverError> {
        let endpoint = config.endpoint()?;
        let interval = config.loop_interval()?;

        log.info(&format!("driver version is {DRIVER_VERSION}"));
        log.info(&format!("using url {}", endpoint.url));

        let fetcher = ReadingFetcher::new(endpoint, log.clone())?;
        let parser =
            ReadingParser::new(log.clone()).with_direction_offset(config.direction_offset);
        Ok(WeatherStation::new(fetcher, interval, log).with_parser(parser))
    }
}

impl<S: ReadingSource> WeatherStation<S> {
    pub fn new(source: S, interval: Duration, log: SharedLog) -> Self {
        Self {
            source,
            parser: ReadingParser::new(log.clone()),
            interval,
            log,
            clock: epoch_now,
        }
    }

    pub fn with_parser(mut self, parser: ReadingParser) -> Self {
        self.parser = parser;
        self
    }

    /// Replace the epoch-seconds clock used to stamp records.
    pub fn with_clock(mut self, clock: fn() -> i64) -> Self {
        self.clock = clock;
        self
    }

    /// Run a single cycle without sleeping.
    ///
    /// `Ok(None)` means the reading did not parse and the cycle is skipped.
    pub async fn poll_once(&self) -> Result<Option<ObservationRecord>, FetchError> {
        let date_time = (self.clock)();
        let raw = self.source.fetch().await?;
        Ok(self
            .parser
            .parse(&raw)
            .ok()
            .map(|reading| ObservationRecord::new(date_time, reading)))
    }

    /// Records as a stream, one per successful cycle.
    ///
    /// The first cycle runs immediately; later cycles wait `interval` after
    /// the previous one. The stream ends after yielding the first fetch error.
    /// Dropping it stops polling.
    pub fn observations(self) -> impl Stream<Item = Result<ObservationRecord, FetchError>> {
        stream::unfold(Some((self, true)), |state| async move {
            let (station, first) = state?;
            if !first {
                tokio::time::sleep(station.interval).await;
            }
            loop {
                match station.poll_once().await {
                    Ok(Some(record)) => return Some((Ok(record), Some((station, false)))),
                    Ok(None) => tokio::time::sleep(station.interval).await,
                    Err(e) => return Some((Err(e), None)),
                }
            }
        })
    }

    /// Poll until `shutdown` fires, handing each record to `emit`.
    ///
    /// Shutdown is observed between cycles; an in-flight fetch finishes first.
    pub async fn run<F>(
        self,
        mut shutdown: watch::Receiver<()>,
        mut emit: F,
    ) -> Result<(), FetchError>
    where
        F: FnMut(ObservationRecord),
    {
        self.log.info(&format!(
            "polling every {:.1}s",
            self.interval.as_secs_f64()
        ));
        loop {
            if let Some(record) = self.poll_once().await? {
                emit(record);
            }

            tokio::select! {
                biased;
                _ = shutdown.changed() => {
                    self.log.info("shutdown requested, stopping loop");
                    break;
                }
                _ = tokio::time::sleep(self.interval) => {}
            }
        }
        Ok(())
    }
}
