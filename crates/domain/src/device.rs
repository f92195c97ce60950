//! Device commands — the logical instructions sent to the lighting
//! controller and the door relay.
//!
//! Wire encoding lives in the adapters; this module only fixes which channels
//! exist and which values they accept.

use serde::{Deserialize, Serialize};

/// Dimmer channels wired to the building lights, in the order they are
/// driven.
pub const LIGHTING_CHANNELS: [u8; 4] = [4, 2, 3, 6];

/// One of the two independent device links.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceChannel {
    Lighting,
    DoorRelay,
}

impl std::fmt::Display for DeviceChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lighting => f.write_str("lighting"),
            Self::DoorRelay => f.write_str("door relay"),
        }
    }
}

/// Brightness requested on a dimmer channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LightLevel {
    On,
    Off,
}

impl LightLevel {
    /// Map a logical on/off flag to a level.
    #[must_use]
    pub fn from_on(on: bool) -> Self {
        if on { Self::On } else { Self::Off }
    }

    /// Percentage sent on the wire.
    #[must_use]
    pub fn percent(self) -> u8 {
        match self {
            Self::On => 100,
            Self::Off => 0,
        }
    }
}

/// Set one dimmer channel to a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LightCommand {
    pub channel: u8,
    pub level: LightLevel,
}

impl LightCommand {
    /// One command per lighting channel, all at `level`.
    #[must_use]
    pub fn all(level: LightLevel) -> Vec<Self> {
        LIGHTING_CHANNELS
            .iter()
            .map(|&channel| Self { channel, level })
            .collect()
    }
}

/// Reply line read back after a lighting frame. `None` when the controller
/// stayed silent.
pub type LightReply = Option<String>;

/// Door relay instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DoorCommand {
    Open,
    Close,
}

impl DoorCommand {
    /// Map a logical open/closed flag to a command.
    #[must_use]
    pub fn from_open(open: bool) -> Self {
        if open { Self::Open } else { Self::Close }
    }

    /// Relay code sent after the `0xFE` command byte.
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            Self::Open => 8,
            Self::Close => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_build_one_command_per_channel_in_wiring_order() {
        let commands = LightCommand::all(LightLevel::On);
        let channels: Vec<u8> = commands.iter().map(|c| c.channel).collect();
        assert_eq!(channels, vec![4, 2, 3, 6]);
        assert!(commands.iter().all(|c| c.level == LightLevel::On));
    }

    #[test]
    fn should_map_levels_to_percentages() {
        assert_eq!(LightLevel::On.percent(), 100);
        assert_eq!(LightLevel::Off.percent(), 0);
        assert_eq!(LightLevel::from_on(true), LightLevel::On);
        assert_eq!(LightLevel::from_on(false), LightLevel::Off);
    }

    #[test]
    fn should_map_door_commands_to_relay_codes() {
        assert_eq!(DoorCommand::Open.code(), 8);
        assert_eq!(DoorCommand::Close.code(), 0);
        assert_eq!(DoorCommand::from_open(true), DoorCommand::Open);
    }

    #[test]
    fn should_display_channel_names() {
        assert_eq!(DeviceChannel::Lighting.to_string(), "lighting");
        assert_eq!(DeviceChannel::DoorRelay.to_string(), "door relay");
    }
}
