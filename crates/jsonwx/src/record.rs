//! Observation records handed to the host.

use serde::{Serialize, Serializer};

/// Unit system tag carried by every record.
///
/// Values match the host's `usUnits` codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitSystem {
    Us,
    Metric,
    /// Metric with wind speeds in m/s
    MetricWx,
}

impl UnitSystem {
    pub fn code(self) -> u8 {
        match self {
            UnitSystem::Us => 0x01,
            UnitSystem::Metric => 0x10,
            UnitSystem::MetricWx => 0x11,
        }
    }
}

impl Serialize for UnitSystem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

/// The four quantities read from the first windmeter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindmeterReading {
    /// Degrees
    pub wind_dir: i64,
    /// m/s
    pub wind_speed: f64,
    /// m/s
    pub wind_gust: f64,
    /// °C
    pub out_temp: f64,
}

/// One loop packet: a timestamped, fully populated reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservationRecord {
    pub date_time: i64,
    pub us_units: UnitSystem,
    pub wind_dir: i64,
    pub wind_speed: f64,
    pub wind_gust: f64,
    pub out_temp: f64,
}

impl ObservationRecord {
    /// Units used for every emitted record.
    pub const UNITS: UnitSystem = UnitSystem::MetricWx;

    /// Stamp a reading with an epoch-seconds timestamp.
    pub fn new(date_time: i64, reading: WindmeterReading) -> Self {
        Self {
            date_time,
            us_units: Self::UNITS,
            wind_dir: reading.wind_dir,
            wind_speed: reading.wind_speed,
            wind_gust: reading.wind_gust,
            out_temp: reading.out_temp,
        }
    }
}

/// Current time in whole epoch seconds, rounded to the nearest second.
pub fn epoch_now() -> i64 {
    (chrono::Utc::now().timestamp_millis() + 500).div_euclid(1000)
}
