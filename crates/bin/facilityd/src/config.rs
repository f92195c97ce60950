//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `facilityd.toml` in the working directory unless a path is given
//! on the command line. Every field has a sensible default so the file is
//! optional. Environment variables take precedence over file values.

use std::path::Path;
use std::time::Duration;

use facility_adapter_serial::SerialConfig;
use facility_app::engine::MonitorSettings;
use facility_app::monitors::Cadence;
use facility_domain::error::ValidationError;
use facility_domain::facility::FacilityState;
use facility_domain::time::{TimeOfDay, Timestamp};
use serde::Deserialize;

const DEFAULT_PATH: &str = "facilityd.toml";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Device gateway selection and serial links.
    pub gateway: GatewayConfig,
    /// Start-up regulation band and lighting schedule.
    pub facility: FacilityConfig,
    /// Monitor intervals, backoffs and door timeout.
    pub monitors: MonitorsConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Which gateway implementation drives the devices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GatewayKind {
    #[default]
    Serial,
    Virtual,
}

impl std::str::FromStr for GatewayKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "serial" => Ok(Self::Serial),
            "virtual" => Ok(Self::Virtual),
            other => Err(ConfigError::Validation(format!(
                "unknown gateway kind {other:?}, expected \"serial\" or \"virtual\""
            ))),
        }
    }
}

/// Device gateway configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub kind: GatewayKind,
    pub serial: SerialConfig,
}

/// Initial facility settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct FacilityConfig {
    pub temp_min: f64,
    pub temp_max: f64,
    pub lights_on_time: TimeOfDay,
    pub lights_off_time: TimeOfDay,
}

/// Monitor timings, all in seconds.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct MonitorsConfig {
    pub climate_interval_secs: u64,
    pub climate_backoff_secs: u64,
    pub schedule_interval_secs: u64,
    pub schedule_backoff_secs: u64,
    pub door_interval_secs: u64,
    pub door_backoff_secs: u64,
    pub door_timeout_secs: u64,
    pub energy_interval_secs: u64,
    pub energy_backoff_secs: u64,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

impl Config {
    /// Load configuration from `path`, or from `facilityd.toml` if present,
    /// then apply environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is malformed, if an explicitly given file
    /// cannot be read, or if the result fails validation.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_content(&std::fs::read_to_string(path)?)?,
            None => Self::from_file(Path::new(DEFAULT_PATH))?,
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::from_content(&content),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn from_content(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::Parse)
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if let Some(val) = var("FACILITY_GATEWAY") {
            self.gateway.kind = val.parse()?;
        }
        if let Some(val) = var("FACILITY_LIGHTING_PORT") {
            self.gateway.serial.lighting_port = val;
        }
        if let Some(val) = var("FACILITY_DOOR_PORT") {
            self.gateway.serial.door_port = val;
        }
        if let Some(val) = var("FACILITY_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let serial = &self.gateway.serial;
        if serial.baud_rate == 0 {
            return Err(ConfigError::Validation(
                "baud rate must be non-zero".to_string(),
            ));
        }
        if serial.command_timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "command timeout must be non-zero".to_string(),
            ));
        }
        let facility = &self.facility;
        if !facility.temp_min.is_finite()
            || !facility.temp_max.is_finite()
            || facility.temp_min >= facility.temp_max
        {
            return Err(ConfigError::Validation(format!(
                "temp_min ({}) must be below temp_max ({})",
                facility.temp_min, facility.temp_max
            )));
        }
        let m = &self.monitors;
        for (name, secs) in [
            ("climate_interval_secs", m.climate_interval_secs),
            ("climate_backoff_secs", m.climate_backoff_secs),
            ("schedule_interval_secs", m.schedule_interval_secs),
            ("schedule_backoff_secs", m.schedule_backoff_secs),
            ("door_interval_secs", m.door_interval_secs),
            ("door_backoff_secs", m.door_backoff_secs),
            ("door_timeout_secs", m.door_timeout_secs),
            ("energy_interval_secs", m.energy_interval_secs),
            ("energy_backoff_secs", m.energy_backoff_secs),
        ] {
            if secs == 0 {
                return Err(ConfigError::Validation(format!("{name} must be non-zero")));
            }
        }
        Ok(())
    }
}

impl FacilityConfig {
    /// Start-up state with the configured band and schedule.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidRange`] for an unusable band.
    pub fn initial_state(&self, now: Timestamp) -> Result<FacilityState, ValidationError> {
        let mut state = FacilityState::new(now);
        state.set_temperature_range(self.temp_min, self.temp_max)?;
        state.set_schedule(self.lights_on_time, self.lights_off_time);
        Ok(state)
    }
}

impl MonitorsConfig {
    #[must_use]
    pub fn settings(&self) -> MonitorSettings {
        MonitorSettings {
            climate: Cadence::from_secs(self.climate_interval_secs, self.climate_backoff_secs),
            schedule: Cadence::from_secs(self.schedule_interval_secs, self.schedule_backoff_secs),
            door: Cadence::from_secs(self.door_interval_secs, self.door_backoff_secs),
            door_timeout: Duration::from_secs(self.door_timeout_secs),
            energy: Cadence::from_secs(self.energy_interval_secs, self.energy_backoff_secs),
            ..MonitorSettings::default()
        }
    }
}

impl Default for FacilityConfig {
    fn default() -> Self {
        let state = FacilityState::new(facility_domain::time::now());
        Self {
            temp_min: state.temp_min(),
            temp_max: state.temp_max(),
            lights_on_time: state.lights_on_time(),
            lights_off_time: state.lights_off_time(),
        }
    }
}

impl Default for MonitorsConfig {
    fn default() -> Self {
        Self {
            climate_interval_secs: 10,
            climate_backoff_secs: 30,
            schedule_interval_secs: 30,
            schedule_backoff_secs: 60,
            door_interval_secs: 5,
            door_backoff_secs: 30,
            door_timeout_secs: 10,
            energy_interval_secs: 60,
            energy_backoff_secs: 120,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "facilityd=info,facility=info".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
