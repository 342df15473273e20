//! Classified failures of query interpretation.
//!
//! None of these are fatal: each one maps to a message the user can act on.
//! Network faults from the NLU service or the weather provider are not part
//! of this taxonomy and travel as `anyhow::Error` instead.

use thiserror::Error;

use crate::intent::Intent;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// The classifier returned no intent.
    #[error("query was not recognized")]
    UnrecognizedQuery,

    /// The classifier returned an intent the router does not implement.
    #[error("unsupported intent '{0}'")]
    UnsupportedIntent(String),

    /// The intent needs a location but no mention resolved to coordinates.
    #[error("intent '{intent}' requires a location")]
    MissingLocation { intent: Intent },

    #[error("intent 'sun_moon_phase' requires a celestial body and a location")]
    MissingCelestialBodyOrLocation,

    /// Routing ran without a structural failure but built nothing.
    #[error("intent '{intent}' produced no requests")]
    NoRequestsProduced { intent: Intent },
}

impl QueryError {
    /// Text suitable for showing to the person who typed the query.
    pub fn user_message(&self) -> String {
        match self {
            QueryError::UnrecognizedQuery => {
                "I couldn't understand that query. Please try rephrasing it.".to_string()
            }
            QueryError::UnsupportedIntent(name) => format!(
                "I understood your query as \"{name}\" but I don't have that feature implemented yet."
            ),
            QueryError::MissingLocation { intent: Intent::WeatherForecast } => {
                "Please specify a location for the weather forecast.".to_string()
            }
            QueryError::MissingLocation { .. } => {
                "Please specify a location for the current weather.".to_string()
            }
            QueryError::MissingCelestialBodyOrLocation => {
                "Please specify both a celestial body (sun/moon) and a location.".to_string()
            }
            QueryError::NoRequestsProduced { intent } => match intent {
                Intent::RealtimeWeather => {
                    "I couldn't create any current weather cards with the information provided."
                        .to_string()
                }
                Intent::WeatherForecast => {
                    "I couldn't create any weather forecast cards with the information provided."
                        .to_string()
                }
                Intent::SunMoonPhase => {
                    "I couldn't create any weather cards with the information provided.".to_string()
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_intent_message_names_the_intent() {
        let err = QueryError::UnsupportedIntent("air_quality".into());
        assert!(err.to_string().contains("air_quality"));
        assert!(err.user_message().contains("\"air_quality\""));
    }

    #[test]
    fn missing_location_message_depends_on_intent() {
        let forecast = QueryError::MissingLocation { intent: Intent::WeatherForecast };
        assert!(forecast.user_message().contains("weather forecast"));

        let realtime = QueryError::MissingLocation { intent: Intent::RealtimeWeather };
        assert!(realtime.user_message().contains("current weather"));
    }

    #[test]
    fn no_requests_message_is_not_empty() {
        for intent in Intent::all() {
            let err = QueryError::NoRequestsProduced { intent: *intent };
            assert!(err.user_message().starts_with("I couldn't create any"));
        }
    }
}
