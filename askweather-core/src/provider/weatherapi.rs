use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use tracing::debug;

use crate::{
    model::{CardKind, WeatherQueryRequest},
    report::{
        Astronomy, CurrentConditions, ForecastDay, ForecastReport, Measure, Place, Temperature,
        WeatherReport,
    },
};

use super::{WeatherProvider, truncate_body};

/// WeatherAPI.com client serving every card kind.
#[derive(Debug, Clone)]
pub struct WeatherApiProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl WeatherApiProvider {
    pub fn new(api_key: String, base_url: impl Into<String>) -> Self {
        Self {
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let url = format!("{}/{endpoint}", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(&[("key", self.api_key.as_str())])
            .query(params)
            .send()
            .await
            .with_context(|| format!("Failed to send request to WeatherAPI.com ({endpoint})"))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .with_context(|| format!("Failed to read WeatherAPI {endpoint} response body"))?;

        if !status.is_success() {
            return Err(anyhow!(
                "WeatherAPI {} request failed with status {}: {}",
                endpoint,
                status,
                truncate_body(&body),
            ));
        }

        serde_json::from_str(&body)
            .with_context(|| format!("Failed to parse WeatherAPI {endpoint} JSON"))
    }

    async fn fetch_current(&self, request: &WeatherQueryRequest) -> Result<CurrentConditions> {
        let parsed: WaCurrentResponse = self
            .get_json("current.json", &[("q", request.location().name.clone())])
            .await?;

        Ok(parsed.into_conditions())
    }

    async fn fetch_forecast(&self, request: &WeatherQueryRequest) -> Result<ForecastReport> {
        let days = request.forecast_window().unwrap_or_default().days();

        let parsed: WaForecastResponse = self
            .get_json(
                "forecast.json",
                &[("q", request.location().name.clone()), ("days", days.to_string())],
            )
            .await?;

        parsed.into_report()
    }

    async fn fetch_astronomy(&self, request: &WeatherQueryRequest) -> Result<Astronomy> {
        let parsed: WaAstronomyResponse = self
            .get_json(
                "astronomy.json",
                &[("q", request.location().name.clone()), ("dt", "today".to_string())],
            )
            .await?;

        Ok(parsed.into_astronomy())
    }
}

#[async_trait]
impl WeatherProvider for WeatherApiProvider {
    async fn fetch(&self, request: &WeatherQueryRequest) -> Result<WeatherReport> {
        debug!(
            card = %request.card_kind(),
            location = %request.location().name,
            "fetching from WeatherAPI"
        );

        match request.card_kind() {
            CardKind::Realtime => self.fetch_current(request).await.map(WeatherReport::Current),
            CardKind::Forecast => self.fetch_forecast(request).await.map(WeatherReport::Forecast),
            CardKind::Sun | CardKind::Moon | CardKind::MoonPhase => {
                self.fetch_astronomy(request).await.map(WeatherReport::Astronomy)
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct WaLocation {
    name: String,
    #[serde(default)]
    region: String,
    #[serde(default)]
    country: String,
    #[serde(default)]
    localtime: String,
}

impl From<WaLocation> for Place {
    fn from(loc: WaLocation) -> Self {
        Place { name: loc.name, region: loc.region, country: loc.country, localtime: loc.localtime }
    }
}

#[derive(Debug, Deserialize)]
struct WaCondition {
    text: String,
}

#[derive(Debug, Deserialize)]
struct WaCurrent {
    #[serde(default)]
    last_updated: String,
    temp_c: f64,
    temp_f: f64,
    feelslike_c: f64,
    feelslike_f: f64,
    condition: WaCondition,
    wind_kph: f64,
    wind_mph: f64,
    #[serde(default)]
    wind_dir: String,
    #[serde(default)]
    gust_kph: f64,
    #[serde(default)]
    gust_mph: f64,
    humidity: u8,
    #[serde(default)]
    vis_km: f64,
    #[serde(default)]
    vis_miles: f64,
    #[serde(default)]
    precip_mm: f64,
    #[serde(default)]
    precip_in: f64,
    #[serde(default)]
    pressure_mb: f64,
    #[serde(default)]
    pressure_in: f64,
    #[serde(default)]
    uv: f64,
}

#[derive(Debug, Deserialize)]
struct WaCurrentResponse {
    location: WaLocation,
    current: WaCurrent,
}

impl WaCurrentResponse {
    fn into_conditions(self) -> CurrentConditions {
        let c = self.current;
        CurrentConditions {
            place: self.location.into(),
            condition: c.condition.text,
            temperature: Temperature { celsius: c.temp_c, fahrenheit: c.temp_f },
            feels_like: Temperature { celsius: c.feelslike_c, fahrenheit: c.feelslike_f },
            wind: Measure { metric: c.wind_kph, imperial: c.wind_mph },
            wind_dir: c.wind_dir,
            gust: Measure { metric: c.gust_kph, imperial: c.gust_mph },
            humidity_pct: c.humidity,
            visibility: Measure { metric: c.vis_km, imperial: c.vis_miles },
            precipitation: Measure { metric: c.precip_mm, imperial: c.precip_in },
            pressure: Measure { metric: c.pressure_mb, imperial: c.pressure_in },
            uv: c.uv,
            last_updated: c.last_updated,
        }
    }
}

#[derive(Debug, Deserialize)]
struct WaDay {
    maxtemp_c: f64,
    maxtemp_f: f64,
    mintemp_c: f64,
    mintemp_f: f64,
    maxwind_kph: f64,
    maxwind_mph: f64,
    condition: WaCondition,
}

#[derive(Debug, Deserialize)]
struct WaForecastDay {
    date: String,
    day: WaDay,
}

#[derive(Debug, Deserialize)]
struct WaForecast {
    forecastday: Vec<WaForecastDay>,
}

#[derive(Debug, Deserialize)]
struct WaForecastResponse {
    location: WaLocation,
    forecast: WaForecast,
}

impl WaForecastResponse {
    fn into_report(self) -> Result<ForecastReport> {
        if self.forecast.forecastday.is_empty() {
            return Err(anyhow!("WeatherAPI response contained no forecastday data"));
        }

        let days = self
            .forecast
            .forecastday
            .into_iter()
            .map(|fd| {
                let date = NaiveDate::parse_from_str(&fd.date, "%Y-%m-%d")
                    .with_context(|| format!("Invalid forecast date '{}'", fd.date))?;
                Ok(ForecastDay {
                    date,
                    condition: fd.day.condition.text,
                    max_temp: Temperature { celsius: fd.day.maxtemp_c, fahrenheit: fd.day.maxtemp_f },
                    min_temp: Temperature { celsius: fd.day.mintemp_c, fahrenheit: fd.day.mintemp_f },
                    max_wind: Measure { metric: fd.day.maxwind_kph, imperial: fd.day.maxwind_mph },
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(ForecastReport { place: self.location.into(), days })
    }
}

#[derive(Debug, Deserialize)]
struct WaAstro {
    #[serde(default)]
    sunrise: String,
    #[serde(default)]
    sunset: String,
    #[serde(default)]
    moonrise: String,
    #[serde(default)]
    moonset: String,
    #[serde(default)]
    moon_phase: String,
    #[serde(default, deserialize_with = "number_or_string")]
    moon_illumination: f64,
    #[serde(default)]
    is_sun_up: u8,
    #[serde(default)]
    is_moon_up: u8,
}

#[derive(Debug, Deserialize)]
struct WaAstronomyInner {
    astro: WaAstro,
}

#[derive(Debug, Deserialize)]
struct WaAstronomyResponse {
    location: WaLocation,
    astronomy: WaAstronomyInner,
}

impl WaAstronomyResponse {
    fn into_astronomy(self) -> Astronomy {
        let astro = self.astronomy.astro;
        Astronomy {
            place: self.location.into(),
            sunrise: astro.sunrise,
            sunset: astro.sunset,
            moonrise: astro.moonrise,
            moonset: astro.moonset,
            moon_phase: astro.moon_phase,
            moon_illumination: astro.moon_illumination,
            is_sun_up: astro.is_sun_up == 1,
            is_moon_up: astro.is_moon_up == 1,
        }
    }
}

/// Older API versions send `moon_illumination` as a string.
fn number_or_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Number(n) => Ok(n.as_f64().unwrap_or_default()),
        serde_json::Value::String(s) => s.trim().parse().map_err(serde::de::Error::custom),
        _ => Ok(0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        CelestialBody, Coordinates, ForecastWindow, ResolvedLocation, UnitPreference,
    };
    use mockito::Matcher;

    fn atlanta() -> ResolvedLocation {
        ResolvedLocation {
            name: "Atlanta".into(),
            region: None,
            coords: Coordinates::new(33.7490, -84.3880),
        }
    }

    const LOCATION: &str = r#"{"name":"Atlanta","region":"Georgia","country":"United States of America","localtime":"2024-05-01 9:30"}"#;

    #[test]
    fn parses_current_response() {
        let body = format!(
            r#"{{"location":{LOCATION},"current":{{"last_updated":"2024-05-01 09:15","temp_c":21.1,"temp_f":70.0,
                "feelslike_c":21.1,"feelslike_f":70.0,"condition":{{"text":"Sunny","icon":"//cdn/113.png"}},
                "wind_kph":9.0,"wind_mph":5.6,"wind_dir":"NW","gust_kph":12.2,"gust_mph":7.6,"humidity":40,
                "vis_km":16.0,"vis_miles":9.0,"precip_mm":0.0,"precip_in":0.0,"pressure_mb":1018.0,
                "pressure_in":30.06,"uv":5.0}}}}"#
        );

        let parsed: WaCurrentResponse = serde_json::from_str(&body).unwrap();
        let conditions = parsed.into_conditions();

        assert_eq!(conditions.place.describe(), "Georgia, United States of America");
        assert_eq!(conditions.condition, "Sunny");
        assert_eq!(conditions.temperature.fahrenheit, 70.0);
        assert_eq!(conditions.wind_dir, "NW");
        assert_eq!(conditions.humidity_pct, 40);
    }

    #[test]
    fn parses_astronomy_with_string_illumination() {
        let body = format!(
            r#"{{"location":{LOCATION},"astronomy":{{"astro":{{"sunrise":"06:48 AM","sunset":"08:21 PM",
                "moonrise":"02:10 AM","moonset":"01:40 PM","moon_phase":"Waning Crescent",
                "moon_illumination":"38","is_moon_up":1,"is_sun_up":0}}}}}}"#
        );

        let parsed: WaAstronomyResponse = serde_json::from_str(&body).unwrap();
        let astro = parsed.into_astronomy();

        assert_eq!(astro.moon_illumination, 38.0);
        assert!(astro.is_moon_up);
        assert!(!astro.is_sun_up);
        assert_eq!(astro.moon_phase_emoji(), "🌘");
    }

    #[test]
    fn empty_forecast_is_an_error() {
        let body = format!(r#"{{"location":{LOCATION},"forecast":{{"forecastday":[]}}}}"#);
        let parsed: WaForecastResponse = serde_json::from_str(&body).unwrap();
        let err = parsed.into_report().unwrap_err();
        assert!(err.to_string().contains("no forecastday"));
    }

    #[tokio::test]
    async fn forecast_requests_window_days() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/forecast.json")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("key".into(), "KEY".into()),
                Matcher::UrlEncoded("q".into(), "Atlanta".into()),
                Matcher::UrlEncoded("days".into(), "3".into()),
            ]))
            .with_status(200)
            .with_body(format!(
                r#"{{"location":{LOCATION},"forecast":{{"forecastday":[
                    {{"date":"2024-05-01","day":{{"maxtemp_c":27.0,"maxtemp_f":80.6,"mintemp_c":15.0,"mintemp_f":59.0,
                      "maxwind_kph":14.0,"maxwind_mph":8.7,"condition":{{"text":"Partly cloudy"}}}}}},
                    {{"date":"2024-05-02","day":{{"maxtemp_c":25.0,"maxtemp_f":77.0,"mintemp_c":16.0,"mintemp_f":60.8,
                      "maxwind_kph":18.0,"maxwind_mph":11.2,"condition":{{"text":"Patchy rain"}}}}}}
                ]}}}}"#
            ))
            .create_async()
            .await;

        let provider = WeatherApiProvider::new("KEY".into(), server.url());
        let request = WeatherQueryRequest::forecast(atlanta(), UnitPreference::default(), ForecastWindow::new(3));

        let report = provider.fetch(&request).await.expect("forecast should succeed");
        mock.assert_async().await;

        let WeatherReport::Forecast(forecast) = report else {
            panic!("expected a forecast report");
        };
        assert_eq!(forecast.days.len(), 2);
        assert_eq!(forecast.days[0].date, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        assert_eq!(forecast.days[1].condition, "Patchy rain");
    }

    #[tokio::test]
    async fn astronomy_cards_hit_astronomy_endpoint() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/astronomy.json")
            .match_query(Matcher::UrlEncoded("dt".into(), "today".into()))
            .with_status(200)
            .with_body(format!(
                r#"{{"location":{LOCATION},"astronomy":{{"astro":{{"sunrise":"06:48 AM","sunset":"08:21 PM",
                    "moon_phase":"Full Moon","moon_illumination":100}}}}}}"#
            ))
            .create_async()
            .await;

        let provider = WeatherApiProvider::new("KEY".into(), server.url());
        let request = WeatherQueryRequest::astronomy(CelestialBody::Sun, atlanta(), UnitPreference::default());

        let WeatherReport::Astronomy(astro) = provider.fetch(&request).await.unwrap() else {
            panic!("expected an astronomy report");
        };
        assert_eq!(astro.sunset, "08:21 PM");
        assert_eq!(astro.moon_illumination, 100.0);
    }

    #[tokio::test]
    async fn non_success_status_is_reported() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/current.json")
            .match_query(Matcher::Any)
            .with_status(400)
            .with_body(r#"{"error":{"code":1006,"message":"No matching location found."}}"#)
            .create_async()
            .await;

        let provider = WeatherApiProvider::new("KEY".into(), server.url());
        let request = WeatherQueryRequest::realtime(atlanta(), UnitPreference::default());

        let err = provider.fetch(&request).await.unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("current.json"));
        assert!(msg.contains("400"));
        assert!(msg.contains("No matching location"));
    }
}
