//! Virtual door relay — energised means the door is unlocked.

use std::sync::atomic::{AtomicBool, Ordering};

use facility_domain::device::DoorCommand;

/// A simulated single-channel relay.
#[derive(Default)]
pub struct VirtualDoorRelay {
    energised: AtomicBool,
}

impl VirtualDoorRelay {
    pub fn apply(&self, command: DoorCommand) {
        self.energised
            .store(command == DoorCommand::Open, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_energised(&self) -> bool {
        self.energised.load(Ordering::SeqCst)
    }
}
