//! jsonwx — weather station driver for JSON sensor endpoints.
//!
//! Polls an HTTP endpoint that reports live windmeter readings (HomeWizard
//! style `get-sensors` JSON), maps the first windmeter onto a fixed
//! observation record, and emits one record per poll cycle.
//!
//! # Architecture
//!
//! ```text
//! endpoint ──► ReadingFetcher ──► ReadingParser ──► WeatherStation ──► host
//!   (HTTP GET,    (bounded retry)    (windmeters[0])    (stamp, emit,
//!    JSON body)                                          sleep)
//! ```
//!
//! # Modules
//!
//! - [`config`] — YAML station configuration and the fetcher's endpoint view.
//! - [`error`] — Error types for transport, fetch, parse and config failures.
//! - [`fetcher`] — Bounded-retry HTTP fetcher behind the [`ReadingSource`] seam.
//! - [`parser`] — Windmeter JSON to [`WindmeterReading`].
//! - [`compass`] — Compass points and angle rotation.
//! - [`record`] — Observation records and the unit system tag.
//! - [`station`] — The polling loop.
//! - [`logger`] — Injected logging capability.
//! - [`runner`] — Command-line entry point.

pub mod compass;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod logger;
pub mod parser;
pub mod record;
pub mod runner;
pub mod station;

/// Driver version reported at startup and by `--version`.
pub const DRIVER_VERSION: &str = env!("CARGO_PKG_VERSION");

pub use compass::{compass_point, rotate};
pub use config::{EndpointConfig, StationConfig};
pub use error::{ConfigError, DriverError, FetchError, ParseError, TransportError};
pub use fetcher::{ReadingFetcher, ReadingSource};
pub use logger::{EventLog, LogFacade, SharedLog};
pub use parser::{direction_degrees, parse_reading, ReadingParser};
pub use record::{ObservationRecord, UnitSystem, WindmeterReading};
pub use station::WeatherStation;
