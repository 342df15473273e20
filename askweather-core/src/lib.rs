//! Core library for the `askweather` CLI.
//!
//! This crate defines:
//! - Interpretation of NLU results into weather query requests
//!   (unit resolution, location deduplication, forecast windows, intent routing)
//! - Clients for the NLU service and the weather provider
//! - Configuration & credentials handling
//!
//! The interpretation pipeline is pure; network access lives in [`nlu::wit`]
//! and [`provider`].

pub mod config;
pub mod duration;
pub mod error;
pub mod intent;
pub mod location;
pub mod model;
pub mod nlu;
pub mod parser;
pub mod provider;
pub mod report;
pub mod session;
pub mod units;

pub use config::Config;
pub use error::QueryError;
pub use intent::Intent;
pub use model::{
    CardKind, Coordinates, ForecastWindow, MeasurementSystem, ResolvedLocation, TempUnit,
    UnitPreference, WeatherQueryRequest,
};
pub use nlu::{EntityKeys, NluClient, NluResult, WitClient};
pub use parser::NluResponseParser;
pub use provider::{WeatherProvider, fetch_all};
pub use report::WeatherReport;
pub use session::{SubmissionId, SubmissionTracker};
