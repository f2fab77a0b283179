use anyhow::Result;

use crate::NormalizedObservation;

/// Destination for normalized observations
pub trait ObservationSink {
    fn emit(&mut self, observation: &NormalizedObservation) -> Result<()>;
}

impl ObservationSink for Vec<NormalizedObservation> {
    fn emit(&mut self, observation: &NormalizedObservation) -> Result<()> {
        self.push(observation.clone());
        Ok(())
    }
}
