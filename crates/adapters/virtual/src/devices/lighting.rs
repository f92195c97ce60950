//! Virtual lighting controller — a dimmer level per channel.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use facility_domain::device::{LIGHTING_CHANNELS, LightCommand};

/// Acknowledgement line returned for every accepted frame.
pub const ACK: &str = "OK";

/// A simulated dimmer controller. Every wired channel starts at 0 %.
pub struct VirtualLighting {
    levels: Mutex<BTreeMap<u8, u8>>,
}

impl Default for VirtualLighting {
    fn default() -> Self {
        Self {
            levels: Mutex::new(LIGHTING_CHANNELS.iter().map(|&c| (c, 0)).collect()),
        }
    }
}

impl VirtualLighting {
    /// Apply one frame and return the controller's reply line.
    pub fn apply(&self, command: LightCommand) -> String {
        self.lock_levels()
            .insert(command.channel, command.level.percent());
        ACK.to_string()
    }

    /// Current level of `channel`, `None` for an unknown channel.
    #[must_use]
    pub fn level(&self, channel: u8) -> Option<u8> {
        self.lock_levels().get(&channel).copied()
    }

    /// `true` when every wired channel is above 0 %.
    #[must_use]
    pub fn all_on(&self) -> bool {
        let levels = self.lock_levels();
        LIGHTING_CHANNELS
            .iter()
            .all(|c| levels.get(c).is_some_and(|&level| level > 0))
    }

    fn lock_levels(&self) -> MutexGuard<'_, BTreeMap<u8, u8>> {
        self.levels.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
