use serde::{Deserialize, Serialize};
use std::fmt;

/// Geographic coordinate as resolved by the NLU service.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub long: f64,
}

impl Coordinates {
    pub fn new(lat: f64, long: f64) -> Self {
        Self { lat, long }
    }

    /// Grid cell of 1e-4 degrees (~11 m) the coordinate falls in, used as
    /// location identity.
    pub fn key(&self) -> LocationKey {
        LocationKey(grid_cell(self.lat), grid_cell(self.long))
    }
}

/// Truncates toward zero at the fourth decimal, so -0.00001 and 0.00001
/// share cell 0. Rounding at the sixth decimal first keeps values like
/// 34.0522 from landing one cell low through float error.
fn grid_cell(degrees: f64) -> i64 {
    ((degrees * 1e6).round() as i64) / 100
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LocationKey(i64, i64);

impl fmt::Display for LocationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4},{:.4}", self.0 as f64 / 1e4, self.1 as f64 / 1e4)
    }
}

/// A deduplicated location a request can be built for.
///
/// Two locations are equal when their coordinates share a grid key,
/// whatever their names say.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedLocation {
    pub name: String,
    pub region: Option<String>,
    pub coords: Coordinates,
}

impl ResolvedLocation {
    pub fn key(&self) -> LocationKey {
        self.coords.key()
    }
}

impl PartialEq for ResolvedLocation {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for ResolvedLocation {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TempUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TempUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            TempUnit::Celsius => "celsius",
            TempUnit::Fahrenheit => "fahrenheit",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            TempUnit::Celsius => "°C",
            TempUnit::Fahrenheit => "°F",
        }
    }
}

impl fmt::Display for TempUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TempUnit::Celsius => f.write_str("Celsius"),
            TempUnit::Fahrenheit => f.write_str("Fahrenheit"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasurementSystem {
    #[default]
    Metric,
    Imperial,
}

impl MeasurementSystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            MeasurementSystem::Metric => "metric",
            MeasurementSystem::Imperial => "imperial",
        }
    }

    pub fn speed_unit(&self) -> &'static str {
        match self {
            MeasurementSystem::Metric => "km/h",
            MeasurementSystem::Imperial => "mph",
        }
    }
}

impl fmt::Display for MeasurementSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeasurementSystem::Metric => f.write_str("Metric"),
            MeasurementSystem::Imperial => f.write_str("Imperial"),
        }
    }
}

/// Units a card is rendered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UnitPreference {
    pub temp_unit: TempUnit,
    pub measurement_system: MeasurementSystem,
}

impl UnitPreference {
    pub fn new(temp_unit: TempUnit, measurement_system: MeasurementSystem) -> Self {
        Self { temp_unit, measurement_system }
    }
}

/// Number of forecast days, always within `MIN_DAYS..=MAX_DAYS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastWindow(u8);

impl ForecastWindow {
    pub const MIN_DAYS: u8 = 2;
    pub const MAX_DAYS: u8 = 14;

    /// Clamps `days` into the supported range.
    pub fn new(days: i64) -> Self {
        let clamped = days.clamp(i64::from(Self::MIN_DAYS), i64::from(Self::MAX_DAYS));
        Self(clamped as u8)
    }

    pub fn days(&self) -> u8 {
        self.0
    }
}

impl Default for ForecastWindow {
    fn default() -> Self {
        Self(Self::MIN_DAYS)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardKind {
    Realtime,
    Forecast,
    Sun,
    Moon,
    MoonPhase,
}

impl CardKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CardKind::Realtime => "realtime",
            CardKind::Forecast => "forecast",
            CardKind::Sun => "sun",
            CardKind::Moon => "moon",
            CardKind::MoonPhase => "moon_phase",
        }
    }
}

impl fmt::Display for CardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully-specified request for one card at one location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherQueryRequest {
    card_kind: CardKind,
    location: ResolvedLocation,
    unit: UnitPreference,
    forecast_window: Option<ForecastWindow>,
}

impl WeatherQueryRequest {
    pub fn realtime(location: ResolvedLocation, unit: UnitPreference) -> Self {
        Self { card_kind: CardKind::Realtime, location, unit, forecast_window: None }
    }

    pub fn forecast(location: ResolvedLocation, unit: UnitPreference, window: ForecastWindow) -> Self {
        Self { card_kind: CardKind::Forecast, location, unit, forecast_window: Some(window) }
    }

    /// Sun, moon and moon-phase cards take no extra parameters.
    pub fn astronomy(body: CelestialBody, location: ResolvedLocation, unit: UnitPreference) -> Self {
        Self { card_kind: body.card_kind(), location, unit, forecast_window: None }
    }

    pub fn card_kind(&self) -> CardKind {
        self.card_kind
    }

    pub fn location(&self) -> &ResolvedLocation {
        &self.location
    }

    pub fn unit(&self) -> UnitPreference {
        self.unit
    }

    pub fn forecast_window(&self) -> Option<ForecastWindow> {
        self.forecast_window
    }
}

/// Celestial bodies the sun/moon intent can ask about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CelestialBody {
    Sun,
    Moon,
    MoonPhase,
}

impl CelestialBody {
    /// Case-insensitive match of an entity value; anything else is `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "sun" => Some(CelestialBody::Sun),
            "moon phase" => Some(CelestialBody::MoonPhase),
            "moon" => Some(CelestialBody::Moon),
            _ => None,
        }
    }

    pub fn card_kind(&self) -> CardKind {
        match self {
            CelestialBody::Sun => CardKind::Sun,
            CelestialBody::Moon => CardKind::Moon,
            CelestialBody::MoonPhase => CardKind::MoonPhase,
        }
    }
}
