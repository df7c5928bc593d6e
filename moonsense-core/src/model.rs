use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A geographic point in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Validates ranges: lat ∈ [-90, 90], lon ∈ [-180, 180].
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, Error> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(Error::InvalidCoordinate { lat: latitude, lon: longitude });
        }
        Ok(Self { latitude, longitude })
    }
}

/// Unit system applied uniformly across a bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitPreference {
    #[default]
    Metric,
    Imperial,
}

impl UnitPreference {
    pub fn temp_symbol(self) -> &'static str {
        match self {
            UnitPreference::Metric => "°C",
            UnitPreference::Imperial => "°F",
        }
    }

    pub fn wind_label(self) -> &'static str {
        match self {
            UnitPreference::Metric => "km/h",
            UnitPreference::Imperial => "mph",
        }
    }
}

impl TryFrom<&str> for UnitPreference {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "metric" | "celsius" | "c" => Ok(UnitPreference::Metric),
            "imperial" | "fahrenheit" | "f" => Ok(UnitPreference::Imperial),
            _ => Err(anyhow::anyhow!(
                "Unknown unit '{value}'. Supported units: metric, imperial."
            )),
        }
    }
}

/// Icon categories the rendering layer knows how to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IconKind {
    Sun,
    SunCloud,
    SunRain,
    Cloud,
    Rain,
    Wind,
    Moon,
}

impl IconKind {
    pub fn as_str(self) -> &'static str {
        match self {
            IconKind::Sun => "sun",
            IconKind::SunCloud => "sun-cloud",
            IconKind::SunRain => "sun-rain",
            IconKind::Cloud => "cloud",
            IconKind::Rain => "rain",
            IconKind::Wind => "wind",
            IconKind::Moon => "moon",
        }
    }
}

/// Semantic tag of a detail card; drives ordering and icon choice downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DetailKind {
    Humidity,
    FeelsLike,
    Wind,
    UvIndex,
    AirQuality,
    Pressure,
    SunriseSunset,
    AirTemp,
    WaterTemp,
    Unknown,
}

impl DetailKind {
    /// Fixed sort priority; lower renders first.
    pub fn priority(self) -> u8 {
        match self {
            DetailKind::FeelsLike => 1,
            DetailKind::Wind => 2,
            DetailKind::UvIndex => 3,
            DetailKind::Humidity => 4,
            DetailKind::AirTemp => 5,
            DetailKind::WaterTemp => 6,
            DetailKind::AirQuality => 7,
            DetailKind::Pressure => 8,
            DetailKind::SunriseSunset => 9,
            DetailKind::Unknown => 99,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderData {
    /// Rounded temperature as a display string, without unit suffix.
    pub temperature: String,
    pub city: String,
    pub description: String,
    /// Rotating line drawn from the fixed whisper pool.
    pub cosmic_whisper: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourlyEntry {
    pub time: String,
    pub icon: IconKind,
    pub temp: String,
    pub uv: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyEntry {
    pub day: String,
    pub date: String,
    pub high: String,
    pub low: String,
    pub icon: IconKind,
    pub humidity: String,
    pub uv: String,
    pub summary: String,
    /// Phase fraction in [0, 1).
    pub moon_phase: f64,
    pub moon_illumination: String,
    pub sunrise: String,
    pub sunset: String,
    pub moonrise: String,
    pub moonset: String,
}

/// One labeled metric card. The semantic `kind` drives both sort order
/// and the icon the rendering layer picks; cards carry no icon of their
/// own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherDetail {
    pub title: String,
    pub value: String,
    pub kind: DetailKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TempTrend {
    pub current: String,
    pub hourly: Vec<String>,
    pub indicator: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaterTemp {
    pub current: String,
    pub suggestion: String,
    pub trend: String,
}

/// Current moon state carried inside a bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoonSnapshot {
    /// Phase fraction in [0, 1).
    pub phase: f64,
    pub illumination: String,
    pub rise_time: String,
    pub set_time: String,
}

/// The canonical normalized output of one fetch cycle.
///
/// Constructed fresh on every request, immutable once returned, replaced
/// wholesale when a newer cycle completes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherBundle {
    pub header: HeaderData,
    pub hourly: Vec<HourlyEntry>,
    pub daily: Vec<DailyEntry>,
    pub details: Vec<WeatherDetail>,
    pub temp_trend: TempTrend,
    pub water_temp: WaterTemp,
    pub advice: String,
    pub moon: MoonSnapshot,
}

/// One row of the multi-day moon table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoonPhaseEntry {
    pub name: String,
    pub illumination: String,
    pub description: String,
    pub energy_suggestion: String,
    pub rise_time: String,
    pub set_time: String,
}

/// Single expanded moon snapshot for the dedicated moon view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoonDetails {
    pub phase_name: String,
    pub illumination: String,
    pub rise_time: String,
    pub set_time: String,
    pub mantra: String,
}

/// Compact per-city reading used by the explore list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitySnapshot {
    pub city: String,
    pub temperature: String,
    pub icon: IconKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CitySearchResult {
    pub name: String,
    pub country: String,
    pub lat: f64,
    pub lon: f64,
}

/// Built-in city presets the app ships with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CityOption {
    pub id: &'static str,
    pub name: &'static str,
    pub country: &'static str,
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: &'static str,
}

impl CityOption {
    /// Preset coordinates are known-valid.
    pub fn coordinate(&self) -> Coordinate {
        Coordinate { latitude: self.latitude, longitude: self.longitude }
    }

    pub fn find(id: &str) -> Option<&'static CityOption> {
        CITY_OPTIONS.iter().find(|c| c.id == id || c.name.eq_ignore_ascii_case(id))
    }
}

pub const CITY_OPTIONS: &[CityOption] = &[
    CityOption { id: "taipei", name: "Taipei", country: "Taiwan", latitude: 25.033, longitude: 121.5654, timezone: "Asia/Taipei" },
    CityOption { id: "new_york", name: "New York", country: "USA", latitude: 40.7128, longitude: -74.006, timezone: "America/New_York" },
    CityOption { id: "london", name: "London", country: "UK", latitude: 51.5072, longitude: -0.1276, timezone: "Europe/London" },
    CityOption { id: "tokyo", name: "Tokyo", country: "Japan", latitude: 35.6762, longitude: 139.6503, timezone: "Asia/Tokyo" },
    CityOption { id: "sydney", name: "Sydney", country: "Australia", latitude: -33.8688, longitude: 151.2093, timezone: "Australia/Sydney" },
    CityOption { id: "paris", name: "Paris", country: "France", latitude: 48.8566, longitude: 2.3522, timezone: "Europe/Paris" },
    CityOption { id: "los_angeles", name: "Los Angeles", country: "USA", latitude: 34.0522, longitude: -118.2437, timezone: "America/Los_Angeles" },
    CityOption { id: "singapore", name: "Singapore", country: "Singapore", latitude: 1.3521, longitude: 103.8198, timezone: "Asia/Singapore" },
];
