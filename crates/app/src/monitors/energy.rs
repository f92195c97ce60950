//! Energy accountant — integrate simulated consumption over time.

use std::future::Future;

use facility_domain::error::MonitorTickError;
use facility_domain::time::Timestamp;

use crate::monitors::Monitor;
use crate::state::SharedState;

pub struct EnergyAccountant {
    state: SharedState,
    scaling: f64,
}

impl EnergyAccountant {
    #[must_use]
    pub fn new(state: SharedState, scaling: f64) -> Self {
        Self { state, scaling }
    }
}

impl Monitor for EnergyAccountant {
    fn name(&self) -> &'static str {
        "Energy"
    }

    fn tick(&mut self, now: Timestamp) -> impl Future<Output = Result<(), MonitorTickError>> + Send {
        let (added, total) = self.state.update(|s| {
            let added = s.accrue_energy(now, self.scaling);
            (added, s.energy_usage_kwh())
        });
        tracing::debug!(added_kwh = added, total_kwh = total, "energy accrued");
        async { Ok(()) }
    }
}
