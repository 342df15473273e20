//! Provider data for one request, carried in both unit systems so the
//! renderer can pick by [`UnitPreference`](crate::model::UnitPreference).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::{MeasurementSystem, TempUnit};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Temperature {
    pub celsius: f64,
    pub fahrenheit: f64,
}

impl Temperature {
    pub fn value(&self, unit: TempUnit) -> f64 {
        match unit {
            TempUnit::Celsius => self.celsius,
            TempUnit::Fahrenheit => self.fahrenheit,
        }
    }
}

/// A quantity reported in metric and imperial units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measure {
    pub metric: f64,
    pub imperial: f64,
}

impl Measure {
    pub fn value(&self, system: MeasurementSystem) -> f64 {
        match system {
            MeasurementSystem::Metric => self.metric,
            MeasurementSystem::Imperial => self.imperial,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub name: String,
    pub region: String,
    pub country: String,
    pub localtime: String,
}

impl Place {
    pub fn describe(&self) -> String {
        if self.region.is_empty() {
            self.country.clone()
        } else {
            format!("{}, {}", self.region, self.country)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub place: Place,
    pub condition: String,
    pub temperature: Temperature,
    pub feels_like: Temperature,
    /// km/h or mph
    pub wind: Measure,
    pub wind_dir: String,
    pub gust: Measure,
    pub humidity_pct: u8,
    /// km or miles
    pub visibility: Measure,
    /// mm or inches
    pub precipitation: Measure,
    /// mb or inches
    pub pressure: Measure,
    pub uv: f64,
    pub last_updated: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    pub date: NaiveDate,
    pub condition: String,
    pub max_temp: Temperature,
    pub min_temp: Temperature,
    pub max_wind: Measure,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastReport {
    pub place: Place,
    pub days: Vec<ForecastDay>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Astronomy {
    pub place: Place,
    pub sunrise: String,
    pub sunset: String,
    pub moonrise: String,
    pub moonset: String,
    pub moon_phase: String,
    pub moon_illumination: f64,
    pub is_sun_up: bool,
    pub is_moon_up: bool,
}

impl Astronomy {
    pub fn moon_phase_emoji(&self) -> &'static str {
        match self.moon_phase.to_lowercase().as_str() {
            "new moon" => "🌑",
            "waxing crescent" => "🌒",
            "first quarter" => "🌓",
            "waxing gibbous" => "🌔",
            "full moon" => "🌕",
            "waning gibbous" => "🌖",
            "last quarter" => "🌗",
            "waning crescent" => "🌘",
            _ => "🌙",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WeatherReport {
    Current(CurrentConditions),
    Forecast(ForecastReport),
    /// Shared by sun, moon and moon-phase cards.
    Astronomy(Astronomy),
}
