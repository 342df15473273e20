//! NLU payload model and the boundary that turns it into typed entities.
//!
//! The wire types mirror the classifier JSON and keep every field optional.
//! [`ExtractedEntities`] is the only place that looks at those options;
//! everything downstream works with the typed entity structs.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::model::Coordinates;

pub mod wit;

pub use wit::{NluClient, WitClient};

/// Raw classifier output for one query.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NluResult {
    #[serde(default)]
    pub text: Option<String>,
    /// Ordered, highest confidence first.
    #[serde(default)]
    pub intents: Vec<IntentMatch>,
    #[serde(default)]
    pub entities: HashMap<String, Vec<EntityOccurrence>>,
}

impl NluResult {
    /// Name of the highest-ranked intent, if it has one.
    pub fn top_intent(&self) -> Option<&str> {
        self.intents.first().map(|i| i.name.trim()).filter(|name| !name.is_empty())
    }

    pub fn entities_for(&self, key: &str) -> &[EntityOccurrence] {
        self.entities.get(key).map(Vec::as_slice).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentMatch {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub confidence: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntityOccurrence {
    /// The span of query text the entity was extracted from.
    #[serde(default)]
    pub body: Option<String>,
    /// String for most entities, a number for durations.
    #[serde(default)]
    pub value: Option<serde_json::Value>,
    #[serde(default)]
    pub resolved: Option<ResolvedValues>,
    #[serde(default)]
    pub normalized: Option<NormalizedValue>,
}

impl EntityOccurrence {
    pub fn value_str(&self) -> Option<&str> {
        self.value.as_ref().and_then(serde_json::Value::as_str)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResolvedValues {
    #[serde(default)]
    pub values: Vec<ResolvedValue>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResolvedValue {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub coords: Option<RawCoords>,
    #[serde(default)]
    pub external: Option<ExternalRefs>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawCoords {
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub long: Option<f64>,
}

impl RawCoords {
    fn to_coordinates(&self) -> Option<Coordinates> {
        match (self.lat, self.long) {
            (Some(lat), Some(long)) if lat.is_finite() && long.is_finite() => {
                Some(Coordinates::new(lat, long))
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExternalRefs {
    #[serde(default)]
    pub wikipedia: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NormalizedValue {
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub unit: Option<String>,
}

/// Entity-type keys the classifier uses for each entity class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityKeys {
    pub location: String,
    pub duration: String,
    pub unit: String,
    pub celestial_body: String,
}

impl Default for EntityKeys {
    fn default() -> Self {
        Self {
            location: "wit$location:location".to_string(),
            duration: "wit$duration:duration".to_string(),
            unit: "temperature_unit:temperature_unit".to_string(),
            celestial_body: "sun_moon:sun_moon".to_string(),
        }
    }
}

/// One location mention. Only the first resolved value of a mention counts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationEntity {
    pub name: Option<String>,
    pub region: Option<String>,
    pub coords: Option<Coordinates>,
}

impl LocationEntity {
    fn from_occurrence(occurrence: &EntityOccurrence) -> Self {
        let resolved = occurrence.resolved.as_ref().and_then(|r| r.values.first());

        let Some(resolved) = resolved else {
            return Self { name: None, region: occurrence.body.clone(), coords: None };
        };

        let region = resolved
            .external
            .as_ref()
            .and_then(|e| e.wikipedia.clone())
            .filter(|w| !w.is_empty())
            .or_else(|| occurrence.body.clone());

        Self {
            name: resolved.name.clone(),
            region,
            coords: resolved.coords.as_ref().and_then(RawCoords::to_coordinates),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitEntity {
    pub value: String,
}

impl UnitEntity {
    pub fn new(value: impl Into<String>) -> Self {
        Self { value: value.into() }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DurationEntity {
    pub normalized_seconds: Option<f64>,
}

impl DurationEntity {
    pub fn seconds(seconds: f64) -> Self {
        Self { normalized_seconds: Some(seconds) }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CelestialBodyEntity {
    pub value: Option<String>,
}

/// Typed view over the entity classes the router consumes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedEntities {
    pub locations: Vec<LocationEntity>,
    pub durations: Vec<DurationEntity>,
    pub units: Vec<UnitEntity>,
    pub celestial_bodies: Vec<CelestialBodyEntity>,
}

impl ExtractedEntities {
    pub fn from_result(result: &NluResult, keys: &EntityKeys) -> Self {
        let locations = result
            .entities_for(&keys.location)
            .iter()
            .map(LocationEntity::from_occurrence)
            .collect();

        let durations = result
            .entities_for(&keys.duration)
            .iter()
            .map(|o| DurationEntity { normalized_seconds: o.normalized.as_ref().and_then(|n| n.value) })
            .collect();

        // A unit mention without a string value cannot match anything.
        let units = result
            .entities_for(&keys.unit)
            .iter()
            .filter_map(|o| o.value_str().map(UnitEntity::new))
            .collect();

        let celestial_bodies = result
            .entities_for(&keys.celestial_body)
            .iter()
            .map(|o| CelestialBodyEntity { value: o.value_str().map(str::to_string) })
            .collect();

        Self { locations, durations, units, celestial_bodies }
    }
}
