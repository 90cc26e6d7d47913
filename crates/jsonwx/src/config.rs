//! Driver configuration and YAML loading utilities.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::error::ConfigError;

/// Placeholder endpoint used until the station URL is configured.
pub const DEFAULT_URL: &str = "http://your-ip/password/get-sensors";

/// Name reported when no `model` is configured.
pub const DEFAULT_MODEL: &str = "jsonwx";

/// Seconds between loop packets.
pub const DEFAULT_LOOP_INTERVAL: f64 = 10.0;

/// Fetch attempts per poll cycle.
pub const DEFAULT_MAX_TRIES: u32 = 10;

/// Seconds to wait between failed attempts.
pub const DEFAULT_RETRY_WAIT: f64 = 10.0;

/// Per-attempt request timeout in seconds.
pub const DEFAULT_TIMEOUT: f64 = 10.0;

/// Station configuration, as supplied by the host.
///
/// Every key is optional; missing keys fall back to the defaults above.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct StationConfig {
    /// Hardware name reported to the host
    #[serde(default)]
    pub model: Option<String>,

    /// Seconds between poll cycles
    #[serde(default = "default_loop_interval")]
    pub loop_interval: f64,

    /// JSON endpoint to poll
    #[serde(default = "default_url")]
    pub url: String,

    /// Attempts per poll cycle before giving up
    #[serde(default = "default_max_tries")]
    pub max_tries: u32,

    /// Seconds to sleep between failed attempts
    #[serde(default = "default_retry_wait")]
    pub retry_wait: f64,

    /// Seconds before a single attempt is abandoned
    #[serde(default = "default_timeout")]
    pub timeout: f64,

    /// Degrees added to the reported wind direction (sensor mounting correction)
    #[serde(default)]
    pub direction_offset: i64,
}

fn default_loop_interval() -> f64 {
    DEFAULT_LOOP_INTERVAL
}

fn default_url() -> String {
    DEFAULT_URL.to_string()
}

fn default_max_tries() -> u32 {
    DEFAULT_MAX_TRIES
}

fn default_retry_wait() -> f64 {
    DEFAULT_RETRY_WAIT
}

fn default_timeout() -> f64 {
    DEFAULT_TIMEOUT
}

impl Default for StationConfig {
    fn default() -> Self {
        Self {
            model: None,
            loop_interval: default_loop_interval(),
            url: default_url(),
            max_tries: default_max_tries(),
            retry_wait: default_retry_wait(),
            timeout: default_timeout(),
            direction_offset: 0,
        }
    }
}

impl StationConfig {
    /// Load and validate a station configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config: Self = load_config(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every value is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.url.trim();
        if url.is_empty() {
            return Err(ConfigError::Invalid("url must not be empty".into()));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "url must use http or https: {url}"
            )));
        }
        if self.max_tries == 0 {
            return Err(ConfigError::Invalid("max_tries must be at least 1".into()));
        }
        seconds("loop_interval", self.loop_interval)?;
        seconds("retry_wait", self.retry_wait)?;
        if seconds("timeout", self.timeout)?.is_zero() {
            return Err(ConfigError::Invalid("timeout must be positive".into()));
        }
        Ok(())
    }

    /// The name the host shows for this station.
    pub fn hardware_name(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    /// Interval between poll cycles.
    pub fn loop_interval(&self) -> Result<Duration, ConfigError> {
        seconds("loop_interval", self.loop_interval)
    }

    /// Build the fetcher's endpoint view of this configuration.
    pub fn endpoint(&self) -> Result<EndpointConfig, ConfigError> {
        self.validate()?;
        Ok(EndpointConfig {
            url: self.url.trim().to_string(),
            timeout: seconds("timeout", self.timeout)?,
            max_tries: self.max_tries,
            retry_wait: seconds("retry_wait", self.retry_wait)?,
        })
    }

    /// Commented YAML stanza with every key at its default.
    pub fn default_stanza() -> String {
        format!(
            r#"# jsonwx station configuration
# Name reported for this station.
# model: {DEFAULT_MODEL}
# The time (in seconds) between loop packets.
loop_interval: {DEFAULT_LOOP_INTERVAL}
# The url to get the JSON packet from.
url: {DEFAULT_URL}
# Attempts per poll cycle before giving up.
max_tries: {DEFAULT_MAX_TRIES}
# Seconds to wait between failed attempts.
retry_wait: {DEFAULT_RETRY_WAIT}
# Seconds before a single attempt is abandoned.
timeout: {DEFAULT_TIMEOUT}
# Degrees added to the reported wind direction.
direction_offset: 0
"#
        )
    }
}

fn seconds(name: &str, value: f64) -> Result<Duration, ConfigError> {
    Duration::try_from_secs_f64(value).map_err(|_| {
        ConfigError::Invalid(format!(
            "{name} must be a finite, non-negative number of seconds (got {value})"
        ))
    })
}

/// Immutable view of the endpoint used by the reading fetcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointConfig {
    pub url: String,
    pub timeout: Duration,
    pub max_tries: u32,
    pub retry_wait: Duration,
}

impl EndpointConfig {
    /// Endpoint at `url` with the default budget, timeout and wait.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: Duration::from_secs_f64(DEFAULT_TIMEOUT),
            max_tries: DEFAULT_MAX_TRIES,
            retry_wait: Duration::from_secs_f64(DEFAULT_RETRY_WAIT),
        }
    }

    pub fn with_max_tries(mut self, max_tries: u32) -> Self {
        self.max_tries = max_tries;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retry_wait(mut self, retry_wait: Duration) -> Self {
        self.retry_wait = retry_wait;
        self
    }
}

/// Load configuration from a YAML file.
///
/// # Example
///
/// ```rust,ignore
/// let config: StationConfig = load_config("jsonwx.yaml")?;
/// ```
pub fn load_config<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, ConfigError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::Read(format!("Failed to read {}: {}", path.display(), e)))?;

    serde_yaml::from_str(&contents)
        .map_err(|e| ConfigError::Parse(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Load configuration from a file, or use default if file doesn't exist.
pub fn load_config_or_default<T: DeserializeOwned + Default>(
    path: impl AsRef<Path>,
) -> Result<T, ConfigError> {
    let path = path.as_ref();

    if !path.exists() {
        log::info!("Config file not found, using defaults: {}", path.display());
        return Ok(T::default());
    }

    load_config(path)
}

/// Parse configuration from a YAML string.
pub fn parse_config<T: DeserializeOwned>(yaml: &str) -> Result<T, ConfigError> {
    Ok(serde_yaml::from_str(yaml)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_yaml_uses_defaults() {
        let config: StationConfig = parse_config("{}").unwrap();
        assert_eq!(config, StationConfig::default());
        assert_eq!(config.url, DEFAULT_URL);
        assert_eq!(config.max_tries, 10);
        assert!((config.loop_interval - 10.0).abs() < f64::EPSILON);
        assert!((config.retry_wait - 10.0).abs() < f64::EPSILON);
        assert_eq!(config.hardware_name(), "jsonwx");
    }

    #[test]
    fn test_full_yaml() {
        let yaml = r#"
model: HomeWizard
loop_interval: 2.5
url: "http://192.168.1.20/secret/get-sensors"
max_tries: 3
retry_wait: 0.5
timeout: 4
direction_offset: -15
"#;
        let config: StationConfig = parse_config(yaml).unwrap();
        assert_eq!(config.hardware_name(), "HomeWizard");
        assert_eq!(config.max_tries, 3);
        assert_eq!(config.direction_offset, -15);
        assert_eq!(config.loop_interval().unwrap(), Duration::from_millis(2500));

        let endpoint = config.endpoint().unwrap();
        assert_eq!(endpoint.url, "http://192.168.1.20/secret/get-sensors");
        assert_eq!(endpoint.max_tries, 3);
        assert_eq!(endpoint.timeout, Duration::from_secs(4));
        assert_eq!(endpoint.retry_wait, Duration::from_millis(500));
    }

    #[test]
    fn test_validate_rejects_zero_tries() {
        let config = StationConfig {
            max_tries: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_validate_rejects_bad_url() {
        for url in ["", "   ", "ftp://station/readings", "station.local/readings"] {
            let config = StationConfig {
                url: url.to_string(),
                ..Default::default()
            };
            assert!(config.validate().is_err(), "accepted {url:?}");
        }
    }

    #[test]
    fn test_validate_rejects_bad_durations() {
        let negative = StationConfig {
            loop_interval: -1.0,
            ..Default::default()
        };
        assert!(negative.validate().is_err());

        let nan = StationConfig {
            retry_wait: f64::NAN,
            ..Default::default()
        };
        assert!(nan.validate().is_err());

        let zero_timeout = StationConfig {
            timeout: 0.0,
            ..Default::default()
        };
        assert!(zero_timeout.endpoint().is_err());
    }

    #[test]
    fn test_zero_retry_wait_is_allowed() {
        let config = StationConfig {
            retry_wait: 0.0,
            loop_interval: 0.0,
            ..Default::default()
        };
        assert_eq!(config.endpoint().unwrap().retry_wait, Duration::ZERO);
    }

    #[test]
    fn test_load_missing_file() {
        let result: Result<StationConfig, _> = load_config("/nonexistent/jsonwx.yaml");
        assert!(matches!(result, Err(ConfigError::Read(_))));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config: StationConfig = load_config_or_default("/nonexistent/jsonwx.yaml").unwrap();
        assert_eq!(config, StationConfig::default());
    }

    #[test]
    fn test_load_invalid_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.yaml");
        std::fs::write(&path, "max_tries: [valid: yaml: {{").unwrap();
        let result = StationConfig::load(&path);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jsonwx.yaml");
        std::fs::write(&path, "max_tries: 0\n").unwrap();
        assert!(matches!(
            StationConfig::load(&path),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_default_stanza_parses_to_defaults() {
        let config: StationConfig = parse_config(&StationConfig::default_stanza()).unwrap();
        assert_eq!(config, StationConfig::default());
    }

    #[test]
    fn test_endpoint_builder() {
        let endpoint = EndpointConfig::new("http://127.0.0.1/readings")
            .with_max_tries(3)
            .with_timeout(Duration::from_secs(1))
            .with_retry_wait(Duration::ZERO);
        assert_eq!(endpoint.max_tries, 3);
        assert_eq!(endpoint.timeout, Duration::from_secs(1));
        assert_eq!(endpoint.retry_wait, Duration::ZERO);
        assert_eq!(
            EndpointConfig::new("http://x").max_tries,
            DEFAULT_MAX_TRIES
        );
    }
}
