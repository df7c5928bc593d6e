use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::clock::epoch_from_clock;
use crate::config::Config;
use crate::error::Error;
use crate::model::{CitySearchResult, Coordinate, UnitPreference};
use crate::moon;

use super::{
    CurrentConditions, DailySample, ForecastSnapshot, HourlySample, MoonSample, WeatherProvider,
};

const DEFAULT_BASE_URL: &str = "https://api.weatherapi.com/v1";

/// How many forecast days we request; the upstream caps free plans here
/// anyway.
const FORECAST_DAYS: &str = "7";

/// WeatherAPI.com client. One GET per forecast cycle, one per search.
#[derive(Debug, Clone)]
pub struct WeatherApiProvider {
    api_key: Option<String>,
    base_url: String,
    http: Client,
}

impl WeatherApiProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            base_url: DEFAULT_BASE_URL.to_string(),
            http: Client::new(),
        }
    }

    /// Build from config; a missing key produces a provider whose every
    /// forecast call reports the upstream as unavailable.
    pub fn from_config(config: &Config) -> Self {
        Self {
            api_key: config.api_key().map(str::to_owned),
            base_url: DEFAULT_BASE_URL.to_string(),
            http: Client::new(),
        }
    }

    /// Point the provider at a different host. Test hook.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.is_empty())
    }
}

#[async_trait]
impl WeatherProvider for WeatherApiProvider {
    async fn forecast(
        &self,
        location: Coordinate,
        unit: UnitPreference,
    ) -> Result<ForecastSnapshot, Error> {
        let Some(key) = self.api_key() else {
            tracing::warn!("WeatherAPI key is not configured; treating upstream as unavailable");
            return Err(Error::upstream("no API key configured"));
        };

        let query = format!("{},{}", location.latitude, location.longitude);
        let url = format!("{}/forecast.json", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(&[
                ("key", key),
                ("q", query.as_str()),
                ("days", FORECAST_DAYS),
                ("aqi", "yes"),
                ("alerts", "no"),
            ])
            .send()
            .await
            .map_err(|e| Error::upstream(format!("forecast request failed to send: {e}")))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| Error::upstream(format!("failed to read forecast response body: {e}")))?;

        if !status.is_success() {
            return Err(Error::upstream(format!(
                "forecast request failed with status {}: {}",
                status,
                truncate_body(&body),
            )));
        }

        let parsed: WaForecastResponse = serde_json::from_str(&body)
            .map_err(|e| Error::upstream(format!("failed to parse forecast JSON: {e}")))?;

        snapshot_from_payload(parsed, unit)
    }

    async fn search(&self, query: &str) -> Result<Vec<CitySearchResult>, Error> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Ok(Vec::new());
        }
        let Some(key) = self.api_key() else {
            tracing::warn!("WeatherAPI key is not configured; city search returns nothing");
            return Ok(Vec::new());
        };

        let url = format!("{}/search.json", self.base_url);
        let res = self
            .http
            .get(&url)
            .query(&[("key", key), ("q", trimmed)])
            .send()
            .await
            .map_err(|e| Error::upstream(format!("search request failed to send: {e}")))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| Error::upstream(format!("failed to read search response body: {e}")))?;

        if !status.is_success() {
            return Err(Error::upstream(format!(
                "search request failed with status {}: {}",
                status,
                truncate_body(&body),
            )));
        }

        let parsed: Vec<WaSearchItem> = serde_json::from_str(&body)
            .map_err(|e| Error::upstream(format!("failed to parse search JSON: {e}")))?;

        Ok(parsed
            .into_iter()
            .map(|item| CitySearchResult {
                name: item.name.unwrap_or_else(|| "Unknown".to_string()),
                country: item.country.unwrap_or_default(),
                lat: item.lat,
                lon: item.lon,
            })
            .collect())
    }
}

/// Validate-then-map: everything the pipeline relies on is checked here,
/// so a malformed payload fails as `UpstreamUnavailable` instead of
/// leaking defaults into derived values.
fn snapshot_from_payload(
    payload: WaForecastResponse,
    unit: UnitPreference,
) -> Result<ForecastSnapshot, Error> {
    let imperial = unit == UnitPreference::Imperial;

    let today = payload
        .forecast
        .forecastday
        .first()
        .ok_or_else(|| Error::upstream("forecast response contained no days"))?;

    let daily: Vec<DailySample> = payload
        .forecast
        .forecastday
        .iter()
        .map(|d| {
            let phase = moon::fraction_from_label(d.astro.moon_phase.as_deref().unwrap_or(""));
            let illumination = d
                .astro
                .moon_illumination
                .as_ref()
                .map(NumOrText::as_f64)
                .unwrap_or_else(|| moon::illumination_from_phase(phase));
            DailySample {
                date: d.date_epoch,
                temp_min: if imperial { d.day.mintemp_f } else { d.day.mintemp_c },
                temp_max: if imperial { d.day.maxtemp_f } else { d.day.maxtemp_c },
                condition: d.day.condition.text.clone(),
                moon_phase: phase,
                moon_illumination: illumination,
                sunrise: epoch_from_clock(d.date_epoch, &d.astro.sunrise),
                sunset: epoch_from_clock(d.date_epoch, &d.astro.sunset),
                moonrise: epoch_from_clock(d.date_epoch, &d.astro.moonrise),
                moonset: epoch_from_clock(d.date_epoch, &d.astro.moonset),
                uvi: d.day.uv.unwrap_or(0.0),
                humidity: d.day.avghumidity.unwrap_or(0.0),
            }
        })
        .collect();

    let hourly = today
        .hour
        .iter()
        .take(24)
        .map(|h| HourlySample {
            time: h.time_epoch,
            temp: if imperial { h.temp_f } else { h.temp_c },
            condition: h.condition.text.clone(),
            pop: h.chance_of_rain.as_ref().map(NumOrText::as_f64).unwrap_or(0.0) / 100.0,
            uvi: h.uv.unwrap_or(0.0),
        })
        .collect();

    // first() above guarantees daily[0] exists.
    let today_sample = &daily[0];
    let moon = MoonSample {
        phase: today_sample.moon_phase,
        illumination: today_sample.moon_illumination,
        moonrise: today_sample.moonrise,
        moonset: today_sample.moonset,
    };

    let current = CurrentConditions {
        temp: if imperial { payload.current.temp_f } else { payload.current.temp_c },
        feels_like: if imperial {
            payload.current.feelslike_f
        } else {
            payload.current.feelslike_c
        },
        humidity: payload.current.humidity,
        wind_kph: payload.current.wind_kph,
        uvi: payload.current.uv.unwrap_or(0.0),
        pressure_mb: payload.current.pressure_mb.unwrap_or(0.0),
        aqi_index: payload
            .current
            .air_quality
            .as_ref()
            .and_then(|aq| aq.us_epa_index)
            .map(|index| index.round() as u8),
        condition: payload.current.condition.text,
        sunrise: today_sample.sunrise,
        sunset: today_sample.sunset,
    };

    Ok(ForecastSnapshot { city: payload.location.name, current, hourly, daily, moon })
}

/// WeatherAPI emits some numeric fields as strings depending on plan and
/// endpoint version.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NumOrText {
    Num(f64),
    Text(String),
}

impl NumOrText {
    fn as_f64(&self) -> f64 {
        match self {
            NumOrText::Num(n) => *n,
            NumOrText::Text(s) => s.trim().parse().unwrap_or(0.0),
        }
    }
}

#[derive(Debug, Deserialize)]
struct WaLocation {
    name: String,
}

#[derive(Debug, Deserialize)]
struct WaCondition {
    text: String,
}

#[derive(Debug, Deserialize)]
struct WaCurrent {
    temp_c: f64,
    temp_f: f64,
    feelslike_c: f64,
    feelslike_f: f64,
    humidity: f64,
    wind_kph: f64,
    uv: Option<f64>,
    pressure_mb: Option<f64>,
    air_quality: Option<WaAirQuality>,
    condition: WaCondition,
}

#[derive(Debug, Deserialize)]
struct WaAirQuality {
    #[serde(rename = "us-epa-index")]
    us_epa_index: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct WaDay {
    mintemp_c: f64,
    mintemp_f: f64,
    maxtemp_c: f64,
    maxtemp_f: f64,
    avghumidity: Option<f64>,
    uv: Option<f64>,
    condition: WaCondition,
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
    moon_phase: Option<String>,
    moon_illumination: Option<NumOrText>,
}

#[derive(Debug, Deserialize)]
struct WaHour {
    time_epoch: i64,
    temp_c: f64,
    temp_f: f64,
    chance_of_rain: Option<NumOrText>,
    uv: Option<f64>,
    condition: WaCondition,
}

#[derive(Debug, Deserialize)]
struct WaForecastDay {
    date_epoch: i64,
    day: WaDay,
    astro: WaAstro,
    #[serde(default)]
    hour: Vec<WaHour>,
}

#[derive(Debug, Deserialize)]
struct WaForecast {
    forecastday: Vec<WaForecastDay>,
}

#[derive(Debug, Deserialize)]
struct WaForecastResponse {
    location: WaLocation,
    current: WaCurrent,
    forecast: WaForecast,
}

#[derive(Debug, Deserialize)]
struct WaSearchItem {
    name: Option<String>,
    country: Option<String>,
    lat: f64,
    lon: f64,
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}
