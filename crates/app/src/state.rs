//! Shared facility state handle.
//!
//! Every component holds a clone of [`SharedState`]. Access goes through short
//! closures so that the lock is never held across an `.await`.

use std::sync::{Arc, Mutex, PoisonError};

use facility_domain::facility::{FacilitySnapshot, FacilityState};

/// Cloneable handle to the single [`FacilityState`] of the process.
#[derive(Debug, Clone)]
pub struct SharedState {
    inner: Arc<Mutex<FacilityState>>,
}

impl SharedState {
    #[must_use]
    pub fn new(state: FacilityState) -> Self {
        Self {
            inner: Arc::new(Mutex::new(state)),
        }
    }

    /// Run `f` with shared access to the state.
    pub fn read<R>(&self, f: impl FnOnce(&FacilityState) -> R) -> R {
        let guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    /// Run `f` with exclusive access to the state.
    pub fn update<R>(&self, f: impl FnOnce(&mut FacilityState) -> R) -> R {
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    #[must_use]
    pub fn snapshot(&self) -> FacilitySnapshot {
        self.read(FacilityState::snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use facility_domain::time::now;

    #[test]
    fn should_share_updates_between_clones() {
        let state = SharedState::new(FacilityState::new(now()));
        let other = state.clone();
        state.update(|s| s.set_lights(true));
        assert!(other.read(FacilityState::lights_on));
    }

    #[test]
    fn should_return_closure_result() {
        let state = SharedState::new(FacilityState::new(now()));
        let previous = state.update(|s| {
            let before = s.lights_on();
            s.set_lights(true);
            before
        });
        assert!(!previous);
        assert!(state.snapshot().lights_on);
    }

    #[test]
    fn should_recover_from_poisoned_lock() {
        let state = SharedState::new(FacilityState::new(now()));
        let poisoner = state.clone();
        let _ = std::thread::spawn(move || {
            poisoner.update::<()>(|_| panic!("poison"));
        })
        .join();
        state.update(|s| s.set_lights(true));
        assert!(state.snapshot().lights_on);
    }
}
