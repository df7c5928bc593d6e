//! Deterministic sample data.
//!
//! Served whenever the live path fails, and doubles as the canonical
//! fixture for tests. Every function here is infallible and returns the
//! same literal values on every call.

use crate::model::{
    DailyEntry, DetailKind, HeaderData, HourlyEntry, IconKind, MoonDetails, MoonPhaseEntry,
    MoonSnapshot, TempTrend, WaterTemp, WeatherBundle, WeatherDetail,
};

/// Fixed sample bundle (metric). The whisper is pinned rather than
/// rotated so repeated calls are byte-identical.
pub fn sample_bundle() -> WeatherBundle {
    WeatherBundle {
        header: HeaderData {
            temperature: "26".to_string(),
            city: "Taipei".to_string(),
            description: "Today - Partly Cloudy".to_string(),
            cosmic_whisper: "Let the rhythm of the cosmos guide your pace.".to_string(),
        },
        hourly: vec![
            hourly("9 AM", IconKind::SunCloud, "24"),
            hourly("10 AM", IconKind::SunCloud, "25"),
            hourly("11 AM", IconKind::Cloud, "25"),
            hourly("12 PM", IconKind::Cloud, "26"),
            hourly("1 PM", IconKind::Rain, "24"),
            hourly("2 PM", IconKind::Rain, "23"),
            hourly("3 PM", IconKind::Cloud, "23"),
            hourly("4 PM", IconKind::SunCloud, "24"),
        ],
        daily: vec![
            daily("Today", "Thu, 12 Dec", "27°", "22°", IconKind::SunCloud, "68%", "High",
                "Soft breeze with a bright midday window.", 0.40, "80%"),
            daily("Fri", "13 Dec", "25°", "21°", IconKind::Cloud, "72%", "Moderate",
                "Cloudier morning, ideal for focus.", 0.44, "88%"),
            daily("Sat", "14 Dec", "24°", "20°", IconKind::Rain, "80%", "Low",
                "Light rain invites a slower pace.", 0.47, "94%"),
            daily("Sun", "15 Dec", "26°", "21°", IconKind::Sun, "60%", "High",
                "Golden afternoon perfect for rituals.", 0.50, "100%"),
            daily("Mon", "16 Dec", "23°", "18°", IconKind::Wind, "65%", "Moderate",
                "Crisp winds clear the mind.", 0.55, "90%"),
            daily("Tue", "17 Dec", "22°", "18°", IconKind::Moon, "70%", "Low",
                "Cool twilight great for stargazing.", 0.60, "80%"),
        ],
        // Already in priority order: feels-like, wind, UV, humidity.
        details: vec![
            WeatherDetail { title: "Feels Like".to_string(), value: "28°".to_string(), kind: DetailKind::FeelsLike },
            WeatherDetail { title: "Wind".to_string(), value: "12 km/h".to_string(), kind: DetailKind::Wind },
            WeatherDetail { title: "UV Index".to_string(), value: "High".to_string(), kind: DetailKind::UvIndex },
            WeatherDetail { title: "Humidity".to_string(), value: "75%".to_string(), kind: DetailKind::Humidity },
        ],
        temp_trend: TempTrend {
            current: "26°C".to_string(),
            hourly: vec!["25°".to_string(), "24°".to_string(), "23°".to_string(), "22°".to_string()],
            indicator: "Temperature layer: Stable".to_string(),
        },
        water_temp: WaterTemp {
            current: "20°C".to_string(),
            suggestion: "Suitable for walking, water is a bit cool".to_string(),
            trend: "Slightly decreasing".to_string(),
        },
        advice: "Your pace can be a bit slower; calmly feel the flow of the universe.".to_string(),
        moon: MoonSnapshot {
            phase: 0.375,
            illumination: "76%".to_string(),
            rise_time: "5:58 PM".to_string(),
            set_time: "5:51 AM".to_string(),
        },
    }
}

/// Fixed eight-row moon table.
pub fn sample_moon_phases() -> Vec<MoonPhaseEntry> {
    vec![
        phase("New Moon", "0%", "A new cycle begins.", "Set fresh intentions.", "6:00 AM", "6:00 PM"),
        phase("Waxing Crescent", "25%", "Momentum slowly grows.", "Take small actions.", "9:00 AM", "9:00 PM"),
        phase("First Quarter", "50%", "Energy pushes forward.", "Make clear decisions.", "12:00 PM", "12:00 AM"),
        phase("Waxing Gibbous", "75%", "Approach fullness.", "Refine and polish.", "3:00 PM", "3:00 AM"),
        phase("Full Moon", "100%", "Peak brightness.", "Celebrate and release.", "6:00 PM", "6:00 AM"),
        phase("Waning Gibbous", "75%", "Begin to soften.", "Share and reflect.", "9:00 PM", "9:00 AM"),
        phase("Last Quarter", "50%", "Clear and simplify.", "Let go of what is spent.", "12:00 AM", "12:00 PM"),
        phase("Waning Crescent", "25%", "Prepare for renewal.", "Rest and recover.", "3:00 AM", "3:00 PM"),
    ]
}

/// Fixed single moon snapshot.
pub fn sample_moon_details() -> MoonDetails {
    MoonDetails {
        phase_name: "Waxing Gibbous".to_string(),
        illumination: "76%".to_string(),
        rise_time: "5:58 PM".to_string(),
        set_time: "5:51 AM".to_string(),
        mantra: "Refine what is growing.".to_string(),
    }
}

fn hourly(time: &str, icon: IconKind, temp: &str) -> HourlyEntry {
    HourlyEntry { time: time.to_string(), icon, temp: temp.to_string(), uv: None }
}

#[allow(clippy::too_many_arguments)]
fn daily(
    day: &str,
    date: &str,
    high: &str,
    low: &str,
    icon: IconKind,
    humidity: &str,
    uv: &str,
    summary: &str,
    moon_phase: f64,
    moon_illumination: &str,
) -> DailyEntry {
    DailyEntry {
        day: day.to_string(),
        date: date.to_string(),
        high: high.to_string(),
        low: low.to_string(),
        icon,
        humidity: humidity.to_string(),
        uv: uv.to_string(),
        summary: summary.to_string(),
        moon_phase,
        moon_illumination: moon_illumination.to_string(),
        sunrise: "6:05 AM".to_string(),
        sunset: "7:30 PM".to_string(),
        moonrise: "5:58 PM".to_string(),
        moonset: "5:51 AM".to_string(),
    }
}

fn phase(
    name: &str,
    illumination: &str,
    description: &str,
    energy: &str,
    rise: &str,
    set: &str,
) -> MoonPhaseEntry {
    MoonPhaseEntry {
        name: name.to_string(),
        illumination: illumination.to_string(),
        description: description.to_string(),
        energy_suggestion: energy.to_string(),
        rise_time: rise.to_string(),
        set_time: set.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::COSMIC_WHISPERS;

    #[test]
    fn sample_bundle_is_deterministic() {
        assert_eq!(sample_bundle(), sample_bundle());
        assert_eq!(sample_moon_phases(), sample_moon_phases());
        assert_eq!(sample_moon_details(), sample_moon_details());
    }

    #[test]
    fn sample_bundle_shape() {
        let bundle = sample_bundle();
        assert_eq!(bundle.header.city, "Taipei");
        assert_eq!(bundle.hourly.len(), 8);
        assert_eq!(bundle.daily.len(), 6);
        assert!(COSMIC_WHISPERS.contains(&bundle.header.cosmic_whisper.as_str()));
    }

    #[test]
    fn sample_details_respect_priority_order() {
        let bundle = sample_bundle();
        let priorities: Vec<u8> = bundle.details.iter().map(|d| d.kind.priority()).collect();
        let mut sorted = priorities.clone();
        sorted.sort_unstable();
        assert_eq!(priorities, sorted);
    }

    #[test]
    fn sample_moon_table_has_canonical_cycle() {
        let phases = sample_moon_phases();
        assert_eq!(phases.len(), 8);
        assert_eq!(phases[0].name, "New Moon");
        assert_eq!(phases[4].name, "Full Moon");
        assert_eq!(phases[4].illumination, "100%");
    }
}
