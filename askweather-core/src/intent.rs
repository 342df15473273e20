use std::{convert::TryFrom, fmt};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    duration,
    error::QueryError,
    location,
    model::{CelestialBody, UnitPreference, WeatherQueryRequest},
    nlu::ExtractedEntities,
};

/// Intents the router knows how to serve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    RealtimeWeather,
    WeatherForecast,
    SunMoonPhase,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::RealtimeWeather => "realtime_weather",
            Intent::WeatherForecast => "weather_forecast",
            Intent::SunMoonPhase => "sun_moon_phase",
        }
    }

    pub const fn all() -> &'static [Intent] {
        &[Intent::RealtimeWeather, Intent::WeatherForecast, Intent::SunMoonPhase]
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Intent {
    type Error = QueryError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "realtime_weather" => Ok(Intent::RealtimeWeather),
            "weather_forecast" => Ok(Intent::WeatherForecast),
            "sun_moon_phase" => Ok(Intent::SunMoonPhase),
            _ => Err(QueryError::UnsupportedIntent(value.to_string())),
        }
    }
}

/// Builds the requests for one intent, one per resolved location.
///
/// May return an empty list (unknown celestial body, or no location with a
/// usable name); the parser turns that into [`QueryError::NoRequestsProduced`].
pub fn route(
    intent: Intent,
    entities: &ExtractedEntities,
    unit: UnitPreference,
) -> Result<Vec<WeatherQueryRequest>, QueryError> {
    let has_location = location::any_resolved(&entities.locations);

    let requests = match intent {
        Intent::RealtimeWeather => {
            if !has_location {
                return Err(QueryError::MissingLocation { intent });
            }
            location::dedupe(&entities.locations)
                .into_iter()
                .map(|loc| WeatherQueryRequest::realtime(loc, unit))
                .collect()
        }
        Intent::WeatherForecast => {
            if !has_location {
                return Err(QueryError::MissingLocation { intent });
            }
            // Durations are query-global: one window shared by every location.
            let window = duration::normalize(&entities.durations);
            debug!(days = window.days(), "forecast window");
            location::dedupe(&entities.locations)
                .into_iter()
                .map(|loc| WeatherQueryRequest::forecast(loc, unit, window))
                .collect()
        }
        Intent::SunMoonPhase => {
            let Some(first) = entities.celestial_bodies.first() else {
                return Err(QueryError::MissingCelestialBodyOrLocation);
            };
            if !has_location {
                return Err(QueryError::MissingCelestialBodyOrLocation);
            }
            match first.value.as_deref().and_then(CelestialBody::parse) {
                Some(body) => location::dedupe(&entities.locations)
                    .into_iter()
                    .map(|loc| WeatherQueryRequest::astronomy(body, loc, unit))
                    .collect(),
                None => {
                    debug!(value = ?first.value, "unrecognized celestial body");
                    Vec::new()
                }
            }
        }
    };

    Ok(requests)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        model::{CardKind, Coordinates},
        nlu::{CelestialBodyEntity, DurationEntity, LocationEntity},
    };

    fn mention(name: &str, lat: f64, long: f64) -> LocationEntity {
        LocationEntity {
            name: Some(name.to_string()),
            region: None,
            coords: Some(Coordinates::new(lat, long)),
        }
    }

    fn three_cities() -> Vec<LocationEntity> {
        vec![
            mention("Boston", 42.3601, -71.0589),
            mention("Chicago", 41.8781, -87.6298),
            mention("Atlanta", 33.7490, -84.3880),
        ]
    }

    fn celestial(value: &str) -> Vec<CelestialBodyEntity> {
        vec![CelestialBodyEntity { value: Some(value.to_string()) }]
    }

    #[test]
    fn intent_as_str_roundtrip() {
        for intent in Intent::all() {
            let parsed = Intent::try_from(intent.as_str()).expect("roundtrip should succeed");
            assert_eq!(*intent, parsed);
        }
    }

    #[test]
    fn unknown_intent_is_unsupported() {
        let err = Intent::try_from("air_quality").unwrap_err();
        assert_eq!(err, QueryError::UnsupportedIntent("air_quality".into()));
    }

    #[test]
    fn realtime_emits_one_request_per_location_in_order() {
        let entities = ExtractedEntities { locations: three_cities(), ..Default::default() };
        let requests = route(Intent::RealtimeWeather, &entities, UnitPreference::default()).unwrap();

        assert_eq!(requests.len(), 3);
        assert!(requests.iter().all(|r| r.card_kind() == CardKind::Realtime));
        assert!(requests.iter().all(|r| r.forecast_window().is_none()));
        let names: Vec<_> = requests.iter().map(|r| r.location().name.as_str()).collect();
        assert_eq!(names, vec!["Boston", "Chicago", "Atlanta"]);
    }

    #[test]
    fn forecast_shares_one_window() {
        let entities = ExtractedEntities {
            locations: three_cities(),
            durations: vec![DurationEntity::seconds(86_400.0 * 5.0)],
            ..Default::default()
        };
        let requests = route(Intent::WeatherForecast, &entities, UnitPreference::default()).unwrap();

        assert_eq!(requests.len(), 3);
        for request in &requests {
            assert_eq!(request.card_kind(), CardKind::Forecast);
            assert_eq!(request.forecast_window().map(|w| w.days()), Some(5));
        }
    }

    #[test]
    fn location_intents_require_a_resolved_location() {
        let unresolved = ExtractedEntities {
            locations: vec![LocationEntity { name: Some("Atlantis".into()), ..Default::default() }],
            ..Default::default()
        };

        for intent in [Intent::RealtimeWeather, Intent::WeatherForecast] {
            assert_eq!(
                route(intent, &ExtractedEntities::default(), UnitPreference::default()),
                Err(QueryError::MissingLocation { intent })
            );
            assert_eq!(
                route(intent, &unresolved, UnitPreference::default()),
                Err(QueryError::MissingLocation { intent })
            );
        }
    }

    #[test]
    fn sun_moon_requires_both_entity_classes() {
        let only_body = ExtractedEntities { celestial_bodies: celestial("sun"), ..Default::default() };
        let only_location = ExtractedEntities { locations: three_cities(), ..Default::default() };

        for entities in [only_body, only_location] {
            assert_eq!(
                route(Intent::SunMoonPhase, &entities, UnitPreference::default()),
                Err(QueryError::MissingCelestialBodyOrLocation)
            );
        }
    }

    #[test]
    fn sun_moon_maps_first_body_to_card_kind() {
        for (value, kind) in [("Sun", CardKind::Sun), ("moon", CardKind::Moon), ("Moon Phase", CardKind::MoonPhase)] {
            let mut bodies = celestial(value);
            bodies.push(CelestialBodyEntity { value: Some("sun".into()) });
            let entities = ExtractedEntities {
                locations: three_cities(),
                celestial_bodies: bodies,
                ..Default::default()
            };

            let requests = route(Intent::SunMoonPhase, &entities, UnitPreference::default()).unwrap();
            assert_eq!(requests.len(), 3);
            assert!(requests.iter().all(|r| r.card_kind() == kind));
        }
    }

    #[test]
    fn unknown_celestial_body_yields_no_requests() {
        let entities = ExtractedEntities {
            locations: three_cities(),
            celestial_bodies: celestial("stars"),
            ..Default::default()
        };

        let requests = route(Intent::SunMoonPhase, &entities, UnitPreference::default()).unwrap();
        assert!(requests.is_empty());
    }
}
