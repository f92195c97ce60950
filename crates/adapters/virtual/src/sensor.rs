//! Simulated climate sensor — a random walk around the previous reading.

use std::future::Future;
use std::sync::{Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use facility_app::ports::SensorSource;
use facility_domain::error::SensorError;
use facility_domain::policy::climate::ClimateReading;

/// Maximum temperature change per reading, °C.
pub const TEMPERATURE_JITTER: f64 = 0.3;
/// Maximum humidity change per reading, %.
pub const HUMIDITY_JITTER: f64 = 1.0;

/// Perturbs each reading by a uniform delta and rounds it to one decimal.
pub struct JitterSensor {
    rng: Mutex<StdRng>,
}

impl Default for JitterSensor {
    fn default() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }
}

impl JitterSensor {
    /// Reproducible sensor for tests and demos.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn next(&self, previous: ClimateReading) -> ClimateReading {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        let temperature =
            previous.temperature + rng.gen_range(-TEMPERATURE_JITTER..=TEMPERATURE_JITTER);
        let humidity = previous.humidity + rng.gen_range(-HUMIDITY_JITTER..=HUMIDITY_JITTER);
        ClimateReading {
            temperature: round_tenth(temperature),
            humidity: round_tenth(humidity),
        }
    }
}

impl SensorSource for JitterSensor {
    fn read(
        &self,
        previous: ClimateReading,
    ) -> impl Future<Output = Result<ClimateReading, SensorError>> + Send {
        let reading = self.next(previous);
        async move { Ok(reading) }
    }
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
