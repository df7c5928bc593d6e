//! Unit conversion.
//!
//! Live bundles are built directly in the requested unit system; these
//! helpers exist for the sample bundle (stored as metric literals) and for
//! anything else that must be re-expressed after the fact. Conversion is
//! all-or-nothing: [`bundle_to_imperial`] touches every temperature and
//! wind-speed field of a bundle, never a subset.

use crate::model::{DetailKind, WeatherBundle};

pub fn c_to_f(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

pub fn f_to_c(fahrenheit: f64) -> f64 {
    (fahrenheit - 32.0) * 5.0 / 9.0
}

pub fn kph_to_mph(kph: f64) -> f64 {
    kph / 1.609344
}

pub fn mph_to_kph(mph: f64) -> f64 {
    mph * 1.609344
}

/// Split a display string into its leading signed integer and whatever
/// suffix follows, e.g. `"26°C"` → `(26, "°C")`, `"28"` → `(28, "")`.
fn split_leading_int(text: &str) -> Option<(i64, &str)> {
    let end = text
        .char_indices()
        .take_while(|&(i, c)| c.is_ascii_digit() || (i == 0 && c == '-'))
        .map(|(i, c)| i + c.len_utf8())
        .last()?;
    let value = text[..end].parse().ok()?;
    Some((value, &text[end..]))
}

/// Convert a display temperature, keeping the shape of its suffix: a bare
/// value stays bare, `"°"` stays `"°"`, and `"°C"` becomes `"°F"`.
fn convert_display_temp(text: &str) -> Option<String> {
    match split_leading_int(text) {
        Some((value, suffix)) => {
            let suffix = if suffix == "°C" { "°F" } else { suffix };
            Some(format!("{}{}", c_to_f(value as f64).round() as i64, suffix))
        }
        // No numeric part ("--°C"): still swap the unit letter.
        None => text.strip_suffix("°C").map(|head| format!("{head}°F")),
    }
}

fn convert_display_speed(text: &str) -> Option<String> {
    let (value, suffix) = split_leading_int(text)?;
    if suffix.trim() != "km/h" {
        return None;
    }
    Some(format!("{} mph", kph_to_mph(value as f64).round() as i64))
}

/// Re-express a metric bundle in imperial units. Every temperature and
/// wind-speed field is converted; everything else passes through
/// untouched.
pub fn bundle_to_imperial(bundle: WeatherBundle) -> WeatherBundle {
    let mut out = bundle;

    if let Some(converted) = convert_display_temp(&out.header.temperature) {
        out.header.temperature = converted;
    }

    for entry in &mut out.hourly {
        if let Some(converted) = convert_display_temp(&entry.temp) {
            entry.temp = converted;
        }
    }

    for detail in &mut out.details {
        let converted = match detail.kind {
            DetailKind::Wind => convert_display_speed(&detail.value),
            _ if detail.value.contains('°') => convert_display_temp(&detail.value),
            _ => None,
        };
        if let Some(value) = converted {
            detail.value = value;
        }
    }

    for day in &mut out.daily {
        if let Some(high) = convert_display_temp(&day.high) {
            day.high = high;
        }
        if let Some(low) = convert_display_temp(&day.low) {
            day.low = low;
        }
    }

    if let Some(current) = convert_display_temp(&out.temp_trend.current) {
        out.temp_trend.current = current;
    }
    out.temp_trend.hourly = out
        .temp_trend
        .hourly
        .iter()
        .map(|t| convert_display_temp(t).unwrap_or_else(|| t.clone()))
        .collect();

    if let Some(current) = convert_display_temp(&out.water_temp.current) {
        out.water_temp.current = current;
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock;

    #[test]
    fn celsius_fahrenheit_round_trip_within_tolerance() {
        for c in -40..=50 {
            let f = c_to_f(f64::from(c)).round();
            let back = f_to_c(f).round();
            assert!((back - f64::from(c)).abs() <= 1.0, "drift for {c}: {back}");
        }
    }

    #[test]
    fn speed_round_trip_within_tolerance() {
        for kph in 0..200 {
            let mph = kph_to_mph(f64::from(kph)).round();
            let back = mph_to_kph(mph).round();
            assert!((back - f64::from(kph)).abs() <= 1.0);
        }
    }

    #[test]
    fn split_leading_int_keeps_suffix() {
        assert_eq!(split_leading_int("26°C"), Some((26, "°C")));
        assert_eq!(split_leading_int("-3°"), Some((-3, "°")));
        assert_eq!(split_leading_int("28"), Some((28, "")));
        assert_eq!(split_leading_int("High"), None);
    }

    #[test]
    fn display_conversion_preserves_suffix_shape() {
        assert_eq!(convert_display_temp("26°C").as_deref(), Some("79°F"));
        assert_eq!(convert_display_temp("28°").as_deref(), Some("82°"));
        assert_eq!(convert_display_temp("24").as_deref(), Some("75"));
        assert_eq!(convert_display_temp("--°C").as_deref(), Some("--°F"));
        assert_eq!(convert_display_temp("High"), None);

        assert_eq!(convert_display_speed("12 km/h").as_deref(), Some("7 mph"));
        assert_eq!(convert_display_speed("7 mph"), None);
    }

    #[test]
    fn sample_bundle_converts_every_temperature() {
        let bundle = mock::sample_bundle();
        let imperial = bundle_to_imperial(bundle);

        // 26 °C header → 79 °F.
        assert_eq!(imperial.header.temperature, "79");
        // 28° feels-like card → 82°.
        let feels = imperial
            .details
            .iter()
            .find(|d| d.title == "Feels Like")
            .map(|d| d.value.as_str());
        assert_eq!(feels, Some("82°"));
        // Humidity stays percent.
        let humidity = imperial
            .details
            .iter()
            .find(|d| d.title == "Humidity")
            .map(|d| d.value.as_str());
        assert_eq!(humidity, Some("75%"));
        // Water temperature 20 °C → 68 °F.
        assert_eq!(imperial.water_temp.current, "68°F");
    }

    #[test]
    fn imperial_fallback_leaves_no_metric_residue() {
        let imperial = bundle_to_imperial(mock::sample_bundle());

        let wind = imperial
            .details
            .iter()
            .find(|d| d.kind == crate::model::DetailKind::Wind)
            .expect("wind card");
        assert_eq!(wind.value, "7 mph");
        assert_eq!(imperial.temp_trend.current, "79°F");
        assert_eq!(imperial.water_temp.current, "68°F");

        // Bare display temperatures stay bare.
        assert_eq!(imperial.header.temperature, "79");
        assert!(imperial.hourly.iter().all(|h| !h.temp.contains('°')));

        let dump = serde_json::to_string(&imperial).expect("serialize");
        assert!(!dump.contains("°C"), "metric temperature left behind: {dump}");
        assert!(!dump.contains("km/h"), "metric wind speed left behind: {dump}");
    }
}
