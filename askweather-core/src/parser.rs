use std::convert::TryFrom;

use tracing::{debug, info};

use crate::{
    error::QueryError,
    intent::{self, Intent},
    model::{UnitPreference, WeatherQueryRequest},
    nlu::{EntityKeys, ExtractedEntities, NluResult},
    units,
};

/// Turns a classifier result into the requests the shell should fetch.
#[derive(Debug, Clone, Default)]
pub struct NluResponseParser {
    keys: EntityKeys,
}

impl NluResponseParser {
    pub fn new(keys: EntityKeys) -> Self {
        Self { keys }
    }

    pub fn keys(&self) -> &EntityKeys {
        &self.keys
    }

    /// Interprets `result` against the caller's default units.
    ///
    /// Returns a non-empty request list in location order, or the reason no
    /// request could be built. Only the top-ranked intent is considered.
    pub fn interpret(
        &self,
        result: &NluResult,
        defaults: UnitPreference,
    ) -> Result<Vec<WeatherQueryRequest>, QueryError> {
        let name = result.top_intent().ok_or(QueryError::UnrecognizedQuery)?;

        let entities = ExtractedEntities::from_result(result, &self.keys);
        let unit = units::resolve(defaults, &entities.units);

        let intent = Intent::try_from(name)?;
        debug!(%intent, ?unit, locations = entities.locations.len(), "routing query");

        let requests = intent::route(intent, &entities, unit)?;
        if requests.is_empty() {
            return Err(QueryError::NoRequestsProduced { intent });
        }

        info!(%intent, count = requests.len(), "query interpreted");
        Ok(requests)
    }
}
