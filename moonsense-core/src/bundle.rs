//! The normalization pipeline: pure functions from a [`ForecastSnapshot`]
//! and a unit preference to the canonical [`WeatherBundle`].

use chrono::Utc;

use crate::clock::{day_labels, format_unix_time};
use crate::model::{
    DailyEntry, DetailKind, HeaderData, HourlyEntry, IconKind, MoonSnapshot, TempTrend,
    UnitPreference, WaterTemp, WeatherBundle, WeatherDetail,
};
use crate::provider::ForecastSnapshot;
use crate::units::kph_to_mph;

/// Rotating header lines; one is chosen per bundle.
pub const COSMIC_WHISPERS: [&str; 4] = [
    "Today, the universe invites you to breathe deeply.",
    "A day for calm reflection and quiet moments.",
    "Let the rhythm of the cosmos guide your pace.",
    "Find stillness in the gentle lunar light.",
];

/// Deterministic pick from the whisper pool for a given seed.
pub fn whisper_for(seed: u64) -> &'static str {
    COSMIC_WHISPERS[(seed % COSMIC_WHISPERS.len() as u64) as usize]
}

/// Build a bundle, rotating the whisper on the current clock.
pub fn build_bundle(snapshot: &ForecastSnapshot, unit: UnitPreference) -> WeatherBundle {
    build_bundle_with_seed(snapshot, unit, Utc::now().timestamp().unsigned_abs())
}

/// Seeded variant; pure function of its inputs.
pub fn build_bundle_with_seed(
    snapshot: &ForecastSnapshot,
    unit: UnitPreference,
    whisper_seed: u64,
) -> WeatherBundle {
    let header = HeaderData {
        temperature: round_display(snapshot.current.temp),
        city: snapshot.city.clone(),
        description: describe_condition(&snapshot.current.condition),
        cosmic_whisper: whisper_for(whisper_seed).to_string(),
    };

    let hourly_temps: Vec<f64> = snapshot.hourly.iter().map(|h| h.temp).collect();
    let water_value = estimate_water_temp(snapshot.current.temp, snapshot.current.humidity);

    WeatherBundle {
        header,
        hourly: build_hourly(snapshot),
        daily: build_daily(snapshot),
        details: build_details(snapshot, unit),
        temp_trend: build_temp_trend(&hourly_temps, unit),
        water_temp: build_water_temp(water_value, water_trend(snapshot)),
        advice: advice_for(snapshot.current.temp).to_string(),
        moon: MoonSnapshot {
            phase: snapshot.moon.phase,
            illumination: format!("{}%", snapshot.moon.illumination.round()),
            rise_time: format_unix_time(snapshot.moon.moonrise),
            set_time: format_unix_time(snapshot.moon.moonset),
        },
    }
}

/// Poetic rewording of the upstream condition; unmatched text passes
/// through untouched.
pub fn describe_condition(condition: &str) -> String {
    match condition {
        "Clear" => "Clear sky".to_string(),
        "Rain" => "Rain showers".to_string(),
        "Drizzle" => "Soft drizzle".to_string(),
        "Thunderstorm" => "Thunder rumblings".to_string(),
        "Snow" => "Snow whispers".to_string(),
        "Clouds" => "Moody clouds".to_string(),
        "Mist" | "Fog" => "Fog-wrapped morning".to_string(),
        "" => "Sky in motion".to_string(),
        other => other.to_string(),
    }
}

/// Map free-text condition keywords to an icon category. Unmatched text
/// gets a generic cloud, never an error.
pub fn icon_from_condition(condition: &str, pop: Option<f64>) -> IconKind {
    let lower = condition.to_lowercase();
    if lower.contains("thunder") {
        IconKind::Rain
    } else if lower.contains("rain") || lower.contains("drizzle") {
        IconKind::Rain
    } else if lower.contains("snow") || lower.contains("sleet") || lower.contains("blizzard") {
        IconKind::Moon
    } else if lower.contains("mist") || lower.contains("fog") {
        IconKind::Moon
    } else if lower.contains("cloud") || lower.contains("overcast") {
        if pop.is_some_and(|p| p > 0.4) { IconKind::SunRain } else { IconKind::SunCloud }
    } else if lower.contains("clear") || lower.contains("sunny") {
        IconKind::Sun
    } else {
        IconKind::Cloud
    }
}

/// Dew-point proxy for water temperature. A fixed formula, not a physical
/// model: `round(temp - (100 - humidity) / 5)`.
pub fn estimate_water_temp(temp: f64, humidity: f64) -> i64 {
    (temp - (100.0 - humidity) / 5.0).round() as i64
}

/// Display label for the US EPA air-quality index (1 through 6).
pub fn air_quality_label(index: u8) -> &'static str {
    match index {
        0 => "--",
        1 => "Good",
        2 => "Moderate",
        3 => "Unhealthy for sensitive groups",
        4 => "Unhealthy",
        5 => "Very unhealthy",
        _ => "Hazardous",
    }
}

/// Temperature-banded advisory line; first matching threshold wins.
pub fn advice_for(temp: f64) -> &'static str {
    if temp >= 30.0 {
        "Fire energy high, remember to hydrate and slow your steps."
    } else if temp >= 22.0 {
        "Bright warmth invites confident strides."
    } else if temp >= 15.0 {
        "Gentle air, perfect for reflective walks."
    } else {
        "Bundle up; today favors cozy rituals indoors."
    }
}

/// Short-range trend from the first four hourly samples.
pub fn build_temp_trend(temps: &[f64], unit: UnitPreference) -> TempTrend {
    if temps.is_empty() {
        return TempTrend {
            current: format!("--{}", unit.temp_symbol()),
            hourly: Vec::new(),
            indicator: "No data available.".to_string(),
        };
    }

    let slice = &temps[..temps.len().min(4)];
    let difference = slice[slice.len() - 1] - slice[0];
    let indicator = if difference > 1.0 {
        "Rising through the next hours."
    } else if difference < -1.0 {
        "Cooling slowly, plan layers."
    } else {
        "Temperature holding steady."
    };

    TempTrend {
        current: format!("{}{}", round_display(slice[0]), unit.temp_symbol()),
        hourly: slice.iter().map(|t| format!("{}°", round_display(*t))).collect(),
        indicator: indicator.to_string(),
    }
}

fn build_water_temp(value: i64, trend: String) -> WaterTemp {
    WaterTemp {
        current: format!("{value}°"),
        suggestion: if value > 20 {
            "Invites shoreline walks.".to_string()
        } else {
            "Chilly touch, keep layers handy.".to_string()
        },
        trend,
    }
}

fn water_trend(snapshot: &ForecastSnapshot) -> String {
    match (snapshot.daily.first(), snapshot.daily.get(1)) {
        (Some(today), Some(tomorrow)) if tomorrow.humidity > today.humidity => {
            "Moisture rising".to_string()
        }
        (Some(_), Some(_)) => "Drying out".to_string(),
        _ => "Steady tides".to_string(),
    }
}

fn build_details(snapshot: &ForecastSnapshot, unit: UnitPreference) -> Vec<WeatherDetail> {
    let current = &snapshot.current;
    let water_value = estimate_water_temp(current.temp, current.humidity);
    let wind_value = match unit {
        UnitPreference::Metric => current.wind_kph,
        UnitPreference::Imperial => kph_to_mph(current.wind_kph),
    };

    let mut details = vec![
        WeatherDetail {
            title: "Air Temperature".to_string(),
            value: format!("{}{}", round_display(current.temp), unit.temp_symbol()),
            kind: DetailKind::AirTemp,
        },
        WeatherDetail {
            title: "Feels Like".to_string(),
            value: format!("{}{}", round_display(current.feels_like), unit.temp_symbol()),
            kind: DetailKind::FeelsLike,
        },
        WeatherDetail {
            title: "Humidity".to_string(),
            value: format!("{}%", current.humidity.round()),
            kind: DetailKind::Humidity,
        },
        WeatherDetail {
            title: "Wind".to_string(),
            value: format!("{} {}", round_display(wind_value), unit.wind_label()),
            kind: DetailKind::Wind,
        },
        WeatherDetail {
            title: "UV Index".to_string(),
            value: format!("{:.1}", current.uvi),
            kind: DetailKind::UvIndex,
        },
        WeatherDetail {
            title: "Pressure".to_string(),
            value: format!("{} hPa", current.pressure_mb.round()),
            kind: DetailKind::Pressure,
        },
        WeatherDetail {
            title: "Sunrise & Sunset".to_string(),
            value: format!(
                "{} / {}",
                format_unix_time(current.sunrise),
                format_unix_time(current.sunset)
            ),
            kind: DetailKind::SunriseSunset,
        },
        WeatherDetail {
            title: "Water Temperature".to_string(),
            value: format!("{}{}", water_value, unit.temp_symbol()),
            kind: DetailKind::WaterTemp,
        },
    ];
    if let Some(index) = current.aqi_index {
        details.push(WeatherDetail {
            title: "Air Quality".to_string(),
            value: air_quality_label(index).to_string(),
            kind: DetailKind::AirQuality,
        });
    }
    order_details(&mut details);
    details
}

/// Stable sort by the fixed priority table.
pub fn order_details(details: &mut [WeatherDetail]) {
    details.sort_by_key(|d| d.kind.priority());
}

fn build_hourly(snapshot: &ForecastSnapshot) -> Vec<HourlyEntry> {
    snapshot
        .hourly
        .iter()
        .take(8)
        .map(|entry| HourlyEntry {
            time: format_unix_time(entry.time),
            icon: icon_from_condition(&entry.condition, Some(entry.pop)),
            temp: round_display(entry.temp),
            uv: Some(format!("{:.1}", entry.uvi)),
        })
        .collect()
}

fn build_daily(snapshot: &ForecastSnapshot) -> Vec<DailyEntry> {
    snapshot
        .daily
        .iter()
        .take(6)
        .enumerate()
        .map(|(index, day)| {
            let (day_label, date_label) = day_labels(day.date);
            let lower = day.condition.to_lowercase();
            let summary = if lower.contains("rain") {
                "Rain invites deeper reflection."
            } else if lower.contains("snow") {
                "Snow hush urges calm rituals."
            } else if day.uvi > 6.0 {
                "Sun-drenched hours to celebrate."
            } else {
                "Gentle day to stay curious."
            };

            DailyEntry {
                day: if index == 0 { "Today".to_string() } else { day_label },
                date: date_label,
                high: format!("{}°", round_display(day.temp_max)),
                low: format!("{}°", round_display(day.temp_min)),
                icon: icon_from_condition(&day.condition, None),
                humidity: if day.humidity > 0.0 {
                    format!("{}%", day.humidity.round())
                } else {
                    "--".to_string()
                },
                uv: format!("{:.1}", day.uvi),
                summary: summary.to_string(),
                moon_phase: day.moon_phase,
                moon_illumination: format!("{}%", day.moon_illumination.round()),
                sunrise: format_unix_time(day.sunrise),
                sunset: format_unix_time(day.sunset),
                moonrise: format_unix_time(day.moonrise),
                moonset: format_unix_time(day.moonset),
            }
        })
        .collect()
}

fn round_display(value: f64) -> String {
    format!("{}", value.round() as i64)
}
