//! Operating mode — which automatic policies are active.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Exactly one mode is active at a time. Every mode can be entered from every
/// other mode, including itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperatingMode {
    #[default]
    Manual,
    Auto,
    Schedule,
    EnergySaving,
}

impl OperatingMode {
    pub const ALL: [Self; 4] = [Self::Manual, Self::Auto, Self::Schedule, Self::EnergySaving];

    /// Whether the climate monitor enforces the temperature band.
    #[must_use]
    pub fn auto_regulation(self) -> bool {
        matches!(self, Self::Auto | Self::EnergySaving)
    }

    /// Whether the schedule monitor fires lighting transitions.
    #[must_use]
    pub fn scheduling(self) -> bool {
        matches!(self, Self::Schedule | Self::EnergySaving)
    }
}

impl fmt::Display for OperatingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Manual => f.write_str("Manual"),
            Self::Auto => f.write_str("Auto"),
            Self::Schedule => f.write_str("Schedule"),
            Self::EnergySaving => f.write_str("Energy Saving"),
        }
    }
}

/// Returned when a mode name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown operating mode {0:?}")]
pub struct UnknownModeError(pub String);

impl FromStr for OperatingMode {
    type Err = UnknownModeError;

    /// Case-insensitive; spaces, dashes and underscores are interchangeable.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .flat_map(char::to_lowercase)
            .collect();
        match normalized.as_str() {
            "manual" => Ok(Self::Manual),
            "auto" => Ok(Self::Auto),
            "schedule" => Ok(Self::Schedule),
            "energysaving" => Ok(Self::EnergySaving),
            _ => Err(UnknownModeError(s.to_string())),
        }
    }
}
