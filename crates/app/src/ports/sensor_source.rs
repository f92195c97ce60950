//! Sensor source port — where climate readings come from.

use std::future::Future;
use std::sync::Arc;

use facility_domain::error::SensorError;
use facility_domain::policy::climate::ClimateReading;

/// Produces the next temperature/humidity reading.
///
/// `previous` is the last recorded reading, so that simulated sources can
/// drift from it. Real sensors are free to ignore it.
pub trait SensorSource: Send + Sync {
    fn read(
        &self,
        previous: ClimateReading,
    ) -> impl Future<Output = Result<ClimateReading, SensorError>> + Send;
}

impl<T: SensorSource> SensorSource for Arc<T> {
    fn read(
        &self,
        previous: ClimateReading,
    ) -> impl Future<Output = Result<ClimateReading, SensorError>> + Send {
        (**self).read(previous)
    }
}
