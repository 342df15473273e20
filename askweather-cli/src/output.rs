//! Plain-text rendering of weather reports.

use askweather_core::{
    CardKind, MeasurementSystem, UnitPreference, WeatherQueryRequest, WeatherReport,
    report::{Astronomy, CurrentConditions, ForecastReport, Place},
};

pub fn render(request: &WeatherQueryRequest, report: &WeatherReport) -> String {
    let unit = request.unit();
    match (request.card_kind(), report) {
        (CardKind::Realtime, WeatherReport::Current(current)) => realtime(request, current, unit),
        (CardKind::Forecast, WeatherReport::Forecast(forecast)) => {
            self::forecast(request, forecast, unit)
        }
        (CardKind::Sun, WeatherReport::Astronomy(astro)) => sun(request, astro),
        (CardKind::Moon, WeatherReport::Astronomy(astro)) => moon(request, astro),
        (CardKind::MoonPhase, WeatherReport::Astronomy(astro)) => moon_phase(request, astro),
        (kind, _) => format!("No {kind} data available for {}.", request.location().name),
    }
}

pub fn render_failure(request: &WeatherQueryRequest, err: &anyhow::Error) -> String {
    let what = match request.card_kind() {
        CardKind::Realtime => "current weather",
        CardKind::Forecast => "forecast",
        CardKind::Sun => "sun",
        CardKind::Moon => "moon",
        CardKind::MoonPhase => "moon phase",
    };
    format!("Failed to fetch {what} data for {}: {err:#}", request.location().name)
}

fn header(title: &str, place: &Place) -> String {
    format!(
        "== {title} ==\n{}\nLocal time: {}\n",
        place.describe(),
        place.localtime
    )
}

fn realtime(request: &WeatherQueryRequest, c: &CurrentConditions, unit: UnitPreference) -> String {
    let system = unit.measurement_system;
    let (distance, small) = match system {
        MeasurementSystem::Metric => ("km", "mm"),
        MeasurementSystem::Imperial => ("miles", "in"),
    };
    let pressure = match system {
        MeasurementSystem::Metric => "mb",
        MeasurementSystem::Imperial => "in",
    };
    let t = unit.temp_unit.symbol();

    let mut out = header(&format!("Current Weather for {}", request.location().name), &c.place);
    out.push_str(&format!(
        "{}{t} {}\nFeels like: {}{t}\n",
        c.temperature.value(unit.temp_unit),
        c.condition,
        c.feels_like.value(unit.temp_unit),
    ));
    out.push_str(&format!(
        "Wind: {} {} {}\nGusts: {} {}\nHumidity: {}%\nVisibility: {} {distance}\n\
         Precipitation: {} {small}\nPressure: {} {pressure}\nUV index: {}\nLast updated: {}",
        c.wind.value(system),
        system.speed_unit(),
        c.wind_dir,
        c.gust.value(system),
        system.speed_unit(),
        c.humidity_pct,
        c.visibility.value(system),
        c.precipitation.value(system),
        c.pressure.value(system),
        c.uv,
        c.last_updated,
    ));
    out
}

fn forecast(request: &WeatherQueryRequest, f: &ForecastReport, unit: UnitPreference) -> String {
    let days = request.forecast_window().map(|w| w.days()).unwrap_or(f.days.len() as u8);
    let t = unit.temp_unit.symbol();

    let mut out = header(&format!("{days}-day Forecast for {}", request.location().name), &f.place);
    for day in &f.days {
        out.push_str(&format!(
            "{:<12} {:>6}{t} / {:>6}{t}  {:>6} {:<5} {}\n",
            day.date.format("%a, %b %-d").to_string(),
            day.max_temp.value(unit.temp_unit),
            day.min_temp.value(unit.temp_unit),
            day.max_wind.value(unit.measurement_system),
            unit.measurement_system.speed_unit(),
            day.condition,
        ));
    }
    out.trim_end().to_string()
}

fn sun(request: &WeatherQueryRequest, a: &Astronomy) -> String {
    let mut out = header(&format!("Sun information for {}", request.location().name), &a.place);
    out.push_str(&format!(
        "Sunrise: {}\nSunset: {}\nThe sun is currently {}.",
        a.sunrise,
        a.sunset,
        if a.is_sun_up { "up" } else { "down" }
    ));
    out
}

fn moon(request: &WeatherQueryRequest, a: &Astronomy) -> String {
    let mut out = header(&format!("Moon information for {}", request.location().name), &a.place);
    out.push_str(&format!(
        "Moonrise: {}\nMoonset: {}\nThe moon is currently {}.",
        a.moonrise,
        a.moonset,
        if a.is_moon_up { "up" } else { "down" }
    ));
    out
}

fn moon_phase(request: &WeatherQueryRequest, a: &Astronomy) -> String {
    let mut out = header(&format!("Moon Phase for {}", request.location().name), &a.place);
    out.push_str(&format!(
        "{} {}\nIllumination: {}%",
        a.moon_phase_emoji(),
        a.moon_phase,
        a.moon_illumination
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use askweather_core::{
        Coordinates, ForecastWindow, ResolvedLocation, TempUnit,
        model::CelestialBody,
        report::{ForecastDay, Measure, Temperature},
    };
    use chrono::NaiveDate;

    fn place() -> Place {
        Place {
            name: "Boston".into(),
            region: "Massachusetts".into(),
            country: "USA".into(),
            localtime: "2024-05-01 9:00".into(),
        }
    }

    fn boston() -> ResolvedLocation {
        ResolvedLocation { name: "Boston".into(), region: None, coords: Coordinates::new(42.3601, -71.0589) }
    }

    fn astronomy() -> Astronomy {
        Astronomy {
            place: place(),
            sunrise: "05:37 AM".into(),
            sunset: "07:45 PM".into(),
            moonrise: "03:02 AM".into(),
            moonset: "02:14 PM".into(),
            moon_phase: "Full Moon".into(),
            moon_illumination: 99.0,
            is_sun_up: true,
            is_moon_up: false,
        }
    }

    #[test]
    fn forecast_uses_requested_units() {
        let unit = UnitPreference::new(TempUnit::Fahrenheit, MeasurementSystem::Imperial);
        let request = WeatherQueryRequest::forecast(boston(), unit, ForecastWindow::new(2));
        let report = WeatherReport::Forecast(ForecastReport {
            place: place(),
            days: vec![ForecastDay {
                date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
                condition: "Sunny".into(),
                max_temp: Temperature { celsius: 20.0, fahrenheit: 68.0 },
                min_temp: Temperature { celsius: 10.0, fahrenheit: 50.0 },
                max_wind: Measure { metric: 16.0, imperial: 10.0 },
            }],
        });

        let text = render(&request, &report);
        assert!(text.contains("2-day Forecast for Boston"));
        assert!(text.contains("68°F"));
        assert!(text.contains("mph"));
        assert!(text.contains("Wed, May 1"));
        assert!(!text.contains("°C"));
    }

    #[test]
    fn astronomy_cards_show_their_own_fields() {
        let astro = WeatherReport::Astronomy(astronomy());
        let unit = UnitPreference::default();

        let sun = render(&WeatherQueryRequest::astronomy(CelestialBody::Sun, boston(), unit), &astro);
        assert!(sun.contains("Sunset: 07:45 PM"));
        assert!(sun.contains("currently up"));

        let moon = render(&WeatherQueryRequest::astronomy(CelestialBody::Moon, boston(), unit), &astro);
        assert!(moon.contains("Moonrise: 03:02 AM"));

        let phase =
            render(&WeatherQueryRequest::astronomy(CelestialBody::MoonPhase, boston(), unit), &astro);
        assert!(phase.contains("🌕 Full Moon"));
        assert!(phase.contains("Illumination: 99%"));
    }

    #[test]
    fn mismatched_report_is_reported_as_unavailable() {
        let request = WeatherQueryRequest::realtime(boston(), UnitPreference::default());
        let text = render(&request, &WeatherReport::Astronomy(astronomy()));
        assert_eq!(text, "No realtime data available for Boston.");
    }

    #[test]
    fn failure_names_card_and_location() {
        let request = WeatherQueryRequest::realtime(boston(), UnitPreference::default());
        let err = anyhow::anyhow!("status 500");
        assert_eq!(
            render_failure(&request, &err),
            "Failed to fetch current weather data for Boston: status 500"
        );
    }
}
