use async_trait::async_trait;
use std::fmt::Debug;

use crate::error::Error;
use crate::model::{CitySearchResult, Coordinate, UnitPreference};

pub mod weatherapi;

/// Normalized upstream forecast, unit-resolved at parse time. This is the
/// intermediate the bundle builder consumes; nothing upstream-specific
/// survives past this point.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastSnapshot {
    pub city: String,
    pub current: CurrentConditions,
    pub hourly: Vec<HourlySample>,
    pub daily: Vec<DailySample>,
    pub moon: MoonSample,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CurrentConditions {
    pub temp: f64,
    pub feels_like: f64,
    pub humidity: f64,
    /// Always km/h regardless of unit preference; display formatting
    /// converts to mph for imperial bundles.
    pub wind_kph: f64,
    pub uvi: f64,
    pub pressure_mb: f64,
    /// US EPA air-quality index, 1 (good) through 6 (hazardous). Absent
    /// when the upstream plan does not include air quality.
    pub aqi_index: Option<u8>,
    pub condition: String,
    /// Wall-clock epochs, see `clock`.
    pub sunrise: i64,
    pub sunset: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HourlySample {
    pub time: i64,
    pub temp: f64,
    pub condition: String,
    /// Probability of precipitation in [0, 1].
    pub pop: f64,
    pub uvi: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DailySample {
    pub date: i64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub condition: String,
    /// Phase fraction in [0, 1).
    pub moon_phase: f64,
    pub moon_illumination: f64,
    pub sunrise: i64,
    pub sunset: i64,
    pub moonrise: i64,
    pub moonset: i64,
    pub uvi: f64,
    pub humidity: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MoonSample {
    pub phase: f64,
    pub illumination: f64,
    pub moonrise: i64,
    pub moonset: i64,
}

/// Abstraction over the upstream weather service.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Fetch current + hourly + daily data for a location. Any network,
    /// HTTP, or payload-shape failure surfaces as
    /// [`Error::UpstreamUnavailable`]; the service layer owns fallback.
    async fn forecast(
        &self,
        location: Coordinate,
        unit: UnitPreference,
    ) -> Result<ForecastSnapshot, Error>;

    /// Free-text city search. Empty queries and a missing credential both
    /// yield an empty result set, never an error.
    async fn search(&self, query: &str) -> Result<Vec<CitySearchResult>, Error>;
}
