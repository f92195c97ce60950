//! Serial link configuration.

use std::time::Duration;

use serde::Deserialize;

/// Ports and timings of the two serial device links.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SerialConfig {
    /// Device path of the lighting controller.
    pub lighting_port: String,
    /// Device path of the door relay controller.
    pub door_port: String,
    /// Line speed shared by both links.
    pub baud_rate: u32,
    /// Upper bound for a single write or reply read, in milliseconds.
    pub command_timeout_ms: u64,
    /// Delay between a door frame and reading its reply, in milliseconds.
    pub door_settle_ms: u64,
    /// Delay after each probe frame, in milliseconds.
    pub probe_settle_ms: u64,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            lighting_port: "/dev/ttyUSB0".to_string(),
            door_port: "/dev/ttyUSB1".to_string(),
            baud_rate: 9600,
            command_timeout_ms: 1000,
            door_settle_ms: 250,
            probe_settle_ms: 100,
        }
    }
}

impl SerialConfig {
    #[must_use]
    pub fn command_timeout(&self) -> Duration {
        Duration::from_millis(self.command_timeout_ms)
    }

    #[must_use]
    pub fn door_settle(&self) -> Duration {
        Duration::from_millis(self.door_settle_ms)
    }

    #[must_use]
    pub fn probe_settle(&self) -> Duration {
        Duration::from_millis(self.probe_settle_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_have_sensible_defaults() {
        let config = SerialConfig::default();
        assert_eq!(config.lighting_port, "/dev/ttyUSB0");
        assert_eq!(config.door_port, "/dev/ttyUSB1");
        assert_eq!(config.baud_rate, 9600);
        assert_eq!(config.command_timeout(), Duration::from_secs(1));
        assert_eq!(config.door_settle(), Duration::from_millis(250));
        assert_eq!(config.probe_settle(), Duration::from_millis(100));
    }

    #[test]
    fn should_deserialize_from_toml() {
        let toml = r#"
            lighting_port = "/dev/ttyS4"
            door_port = "/dev/ttyS5"
            baud_rate = 19200
            command_timeout_ms = 500
            door_settle_ms = 300
            probe_settle_ms = 50
        "#;
        let config: SerialConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.lighting_port, "/dev/ttyS4");
        assert_eq!(config.door_port, "/dev/ttyS5");
        assert_eq!(config.baud_rate, 19200);
        assert_eq!(config.command_timeout_ms, 500);
        assert_eq!(config.door_settle_ms, 300);
        assert_eq!(config.probe_settle_ms, 50);
    }

    #[test]
    fn should_use_defaults_for_missing_fields() {
        let toml = r#"door_port = "COM4""#;
        let config: SerialConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.door_port, "COM4");
        assert_eq!(config.lighting_port, "/dev/ttyUSB0");
        assert_eq!(config.baud_rate, 9600);
    }
}
