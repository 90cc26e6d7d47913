//! Maps raw endpoint JSON onto a [`WindmeterReading`].
//!
//! Expected shape:
//!
//! ```text
//! {"response": {"windmeters": [{"dir": "135 deg", "ws": 3.2, "gu": 5.1, "te": 18.4}, ...]}}
//! ```
//!
//! Only the first windmeter is read. Any missing or mistyped field fails the
//! whole parse.

use serde_json::{Map, Value};

use crate::compass::{compass_point, rotate};
use crate::error::ParseError;
use crate::logger::SharedLog;
use crate::record::WindmeterReading;

/// Parse a raw reading into the four windmeter quantities.
pub fn parse_reading(raw: &Value) -> Result<WindmeterReading, ParseError> {
    let response = object(raw.get("response"), "response")?;
    let windmeters = response
        .get("windmeters")
        .ok_or(ParseError::MissingField("windmeters"))?
        .as_array()
        .ok_or(ParseError::WrongType {
            field: "windmeters",
            expected: "an array",
        })?;
    let meter = object(
        Some(windmeters.first().ok_or(ParseError::EmptyWindmeters)?),
        "windmeters[0]",
    )?;

    let dir_text = field(meter, "dir")?
        .as_str()
        .ok_or(ParseError::WrongType {
            field: "dir",
            expected: "a string",
        })?;
    let wind_dir =
        direction_degrees(dir_text).ok_or_else(|| ParseError::NoDirectionDigits(dir_text.into()))?;

    Ok(WindmeterReading {
        wind_dir,
        wind_speed: number(meter, "ws")?,
        wind_gust: number(meter, "gu")?,
        out_temp: number(meter, "te")?,
    })
}

/// First whitespace-separated token made only of ASCII digits, as whole degrees.
///
/// `"135 deg"` and `"SE 135"` both give 135. Tokens such as `"12.5"`, `"-20"`
/// or `"SE135"` are not degree tokens. Returns `None` when no token qualifies
/// or the first one does not fit in an `i64`.
pub fn direction_degrees(text: &str) -> Option<i64> {
    text.split_whitespace()
        .find(|token| token.bytes().all(|b| b.is_ascii_digit()))?
        .parse()
        .ok()
}

fn object<'a>(
    value: Option<&'a Value>,
    name: &'static str,
) -> Result<&'a Map<String, Value>, ParseError> {
    value
        .ok_or(ParseError::MissingField(name))?
        .as_object()
        .ok_or(ParseError::WrongType {
            field: name,
            expected: "an object",
        })
}

fn field<'a>(meter: &'a Map<String, Value>, key: &'static str) -> Result<&'a Value, ParseError> {
    meter.get(key).ok_or(ParseError::MissingField(key))
}

fn number(meter: &Map<String, Value>, key: &'static str) -> Result<f64, ParseError> {
    field(meter, key)?.as_f64().ok_or(ParseError::WrongType {
        field: key,
        expected: "a number",
    })
}

/// Parser stage of the polling loop.
///
/// Applies the configured direction correction and reports failures to the
/// injected log.
pub struct ReadingParser {
    log: SharedLog,
    direction_offset: i64,
}

impl ReadingParser {
    pub fn new(log: SharedLog) -> Self {
        Self {
            log,
            direction_offset: 0,
        }
    }

    /// Degrees added to every parsed direction.
    pub fn with_direction_offset(mut self, offset: i64) -> Self {
        self.direction_offset = offset;
        self
    }

    pub fn parse(&self, raw: &Value) -> Result<WindmeterReading, ParseError> {
        match parse_reading(raw) {
            Ok(mut reading) => {
                reading.wind_dir = rotate(reading.wind_dir, self.direction_offset);
                self.log.debug(&format!(
                    "parsed reading: dir {} ({}), speed {}, gust {}, temp {}",
                    reading.wind_dir,
                    compass_point(reading.wind_dir as f64),
                    reading.wind_speed,
                    reading.wind_gust,
                    reading.out_temp
                ));
                Ok(reading)
            }
            Err(e) => {
                self.log.error(&format!("JSON parsing error: {e}"));
                Err(e)
            }
        }
    }
}
