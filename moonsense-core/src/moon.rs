//! Moon-phase derivation.
//!
//! The canonical upstream contract is the textual `astro.moon_phase` label
//! delivered by WeatherAPI.com. Labels are first converted to a phase
//! fraction in [0, 1), and every downstream consumer buckets that fraction
//! against the single boundary table below.

/// Metadata attached to one phase bucket.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseMeta {
    /// Inclusive upper bound of the bucket.
    pub limit: f64,
    pub name: &'static str,
    pub description: &'static str,
    pub energy: &'static str,
}

/// Ordered bucket table covering [0, 1) with no gaps; values past 0.97
/// wrap back to New Moon.
pub const MOON_PHASE_MAP: &[PhaseMeta] = &[
    PhaseMeta { limit: 0.03, name: "New Moon", description: "A new cycle stirs.", energy: "Set fresh intentions." },
    PhaseMeta { limit: 0.22, name: "Waxing Crescent", description: "Hope flickers awake.", energy: "Take small aligned actions." },
    PhaseMeta { limit: 0.28, name: "First Quarter", description: "Momentum builds.", energy: "Make decisions boldly." },
    PhaseMeta { limit: 0.47, name: "Waxing Gibbous", description: "Refinement time.", energy: "Polish and perfect." },
    PhaseMeta { limit: 0.53, name: "Full Moon", description: "Peak illumination.", energy: "Celebrate and release." },
    PhaseMeta { limit: 0.72, name: "Waning Gibbous", description: "Gratitude window.", energy: "Share and express." },
    PhaseMeta { limit: 0.78, name: "Last Quarter", description: "Simplify gently.", energy: "Let go of what is spent." },
    PhaseMeta { limit: 0.97, name: "Waning Crescent", description: "Restful hush.", energy: "Restore and dream." },
    PhaseMeta { limit: 1.1, name: "New Moon", description: "Circle completes.", energy: "Renew intentions." },
];

/// Resolve the bucket for a phase fraction.
pub fn phase_meta(phase: f64) -> &'static PhaseMeta {
    MOON_PHASE_MAP
        .iter()
        .find(|entry| phase <= entry.limit)
        .unwrap_or(&MOON_PHASE_MAP[0])
}

pub fn phase_name(phase: f64) -> &'static str {
    phase_meta(phase).name
}

/// Illumination percentage derived from a phase fraction: a triangular
/// wave peaking at 100 for the full moon (phase 0.5).
pub fn illumination_from_phase(phase: f64) -> f64 {
    if phase <= 0.5 { phase * 2.0 * 100.0 } else { (1.0 - phase) * 2.0 * 100.0 }
}

/// Convert an upstream textual phase label to a fraction. Unknown labels
/// fall back to 0 (new moon), matching the upstream's own default.
pub fn fraction_from_label(label: &str) -> f64 {
    match label {
        "New Moon" => 0.0,
        "Waxing Crescent" => 0.125,
        "First Quarter" => 0.25,
        "Waxing Gibbous" => 0.375,
        "Full Moon" => 0.5,
        "Waning Gibbous" => 0.625,
        "Last Quarter" | "Third Quarter" => 0.75,
        "Waning Crescent" => 0.875,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CANONICAL_NAMES: [&str; 8] = [
        "New Moon",
        "Waxing Crescent",
        "First Quarter",
        "Waxing Gibbous",
        "Full Moon",
        "Waning Gibbous",
        "Last Quarter",
        "Waning Crescent",
    ];

    #[test]
    fn buckets_cover_unit_interval_without_gaps() {
        // Sweep [0, 1) densely; every fraction must land in exactly one
        // bucket and produce a canonical name.
        for i in 0..1000 {
            let p = i as f64 / 1000.0;
            let name = phase_name(p);
            assert!(CANONICAL_NAMES.contains(&name), "no canonical name for {p}: {name}");
        }
    }

    #[test]
    fn bucket_boundaries_are_monotonic() {
        for pair in MOON_PHASE_MAP.windows(2) {
            assert!(pair[0].limit < pair[1].limit);
        }
    }

    #[test]
    fn boundary_values_resolve_to_expected_buckets() {
        assert_eq!(phase_name(0.0), "New Moon");
        assert_eq!(phase_name(0.03), "New Moon");
        assert_eq!(phase_name(0.031), "Waxing Crescent");
        assert_eq!(phase_name(0.25), "First Quarter");
        assert_eq!(phase_name(0.5), "Full Moon");
        assert_eq!(phase_name(0.75), "Last Quarter");
        assert_eq!(phase_name(0.9), "Waning Crescent");
        // Past the last bucket, wrap back to a fresh cycle.
        assert_eq!(phase_name(0.98), "New Moon");
    }

    #[test]
    fn illumination_is_triangular() {
        assert_eq!(illumination_from_phase(0.0), 0.0);
        assert_eq!(illumination_from_phase(0.5), 100.0);
        assert!(illumination_from_phase(0.999) < 1.0);

        for i in 1..100 {
            let p = i as f64 / 100.0;
            let a = illumination_from_phase(p);
            let b = illumination_from_phase(1.0 - p);
            assert!((a - b).abs() < 1e-9, "asymmetry at {p}: {a} vs {b}");
        }
    }

    #[test]
    fn labels_map_to_fractions() {
        assert_eq!(fraction_from_label("Full Moon"), 0.5);
        assert_eq!(fraction_from_label("Third Quarter"), 0.75);
        assert_eq!(fraction_from_label("Last Quarter"), 0.75);
        assert_eq!(fraction_from_label("garbled"), 0.0);
    }

    #[test]
    fn label_fractions_bucket_back_to_their_own_name() {
        for name in CANONICAL_NAMES {
            let p = fraction_from_label(name);
            assert_eq!(phase_name(p), name);
        }
    }
}
