use tracing::debug;

use crate::{
    model::{MeasurementSystem, TempUnit, UnitPreference},
    nlu::UnitEntity,
};

/// Applies unit mentions from a query on top of the caller's defaults.
///
/// Each recognised token overwrites only its own field, later mentions win,
/// and unknown tokens are skipped.
pub fn resolve(defaults: UnitPreference, entities: &[UnitEntity]) -> UnitPreference {
    entities.iter().fold(defaults, |mut acc, entity| {
        match entity.value.trim().to_lowercase().as_str() {
            "fahrenheit" => acc.temp_unit = TempUnit::Fahrenheit,
            "celsius" => acc.temp_unit = TempUnit::Celsius,
            "imperial" => acc.measurement_system = MeasurementSystem::Imperial,
            "metric" => acc.measurement_system = MeasurementSystem::Metric,
            other => debug!(token = other, "ignoring unrecognized unit entity"),
        }
        acc
    })
}
