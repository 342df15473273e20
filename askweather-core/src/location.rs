use std::collections::HashSet;

use tracing::debug;

use crate::{model::ResolvedLocation, nlu::LocationEntity};

/// Collapses location mentions into unique locations, keyed by rounded
/// coordinates, in first-seen order.
///
/// Mentions without coordinates are skipped. The first mention of a point
/// claims its key even when it has no usable name, in which case nothing is
/// emitted for that point.
pub fn dedupe(locations: &[LocationEntity]) -> Vec<ResolvedLocation> {
    let mut seen = HashSet::new();
    let mut unique = Vec::new();

    for mention in locations {
        let Some(coords) = mention.coords else {
            debug!(region = ?mention.region, "skipping location without coordinates");
            continue;
        };

        if !seen.insert(coords.key()) {
            debug!(key = %coords.key(), "skipping duplicate location");
            continue;
        }

        let Some(name) = mention.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) else {
            debug!(key = %coords.key(), "skipping location without a name");
            continue;
        };

        unique.push(ResolvedLocation {
            name: name.to_string(),
            region: mention.region.clone(),
            coords,
        });
    }

    unique
}

/// Whether any mention carries a coordinate.
pub fn any_resolved(locations: &[LocationEntity]) -> bool {
    locations.iter().any(|l| l.coords.is_some())
}

impl From<ResolvedLocation> for LocationEntity {
    fn from(location: ResolvedLocation) -> Self {
        Self { name: Some(location.name), region: location.region, coords: Some(location.coords) }
    }
}
