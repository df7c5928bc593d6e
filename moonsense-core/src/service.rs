//! Fetch orchestration: retry-to-sample policy, batched city snapshots,
//! and last-write-wins cycle tracking.
//!
//! One fetch cycle is one async unit of work. The live path either
//! succeeds or reports [`Error::UpstreamUnavailable`]; this layer owns the
//! decision to substitute the sample bundle and attach the advisory
//! notice. The sample path itself cannot fail.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::bundle::{build_bundle, icon_from_condition};
use crate::clock::format_unix_time;
use crate::config::Config;
use crate::error::Error;
use crate::mock;
use crate::model::{
    CityOption, CitySearchResult, CitySnapshot, Coordinate, IconKind, MoonDetails, MoonPhaseEntry,
    UnitPreference, WeatherBundle,
};
use crate::moon;
use crate::provider::weatherapi::WeatherApiProvider;
use crate::provider::{ForecastSnapshot, WeatherProvider};
use crate::units::bundle_to_imperial;

/// Shown alongside a substituted sample bundle; distinct from a hard error.
pub const SAMPLE_DATA_NOTICE: &str = "Using sample data until live weather is available.";

/// Terminal message for the unreachable case where even the sample path
/// produced nothing to show.
pub const RETRY_MESSAGE: &str = "Update failed, pull to retry";

/// Where a resolved bundle came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BundleSource {
    Live,
    Sample,
}

/// Outcome of one fetch cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedBundle {
    pub bundle: WeatherBundle,
    pub source: BundleSource,
    /// Advisory text when sample data was substituted.
    pub notice: Option<&'static str>,
}

/// The screen-facing entry point: owns a provider and the fetch-cycle
/// generation counter.
#[derive(Debug)]
pub struct WeatherService {
    provider: Arc<dyn WeatherProvider>,
    generation: AtomicU64,
}

impl WeatherService {
    pub fn new(provider: Arc<dyn WeatherProvider>) -> Self {
        Self { provider, generation: AtomicU64::new(0) }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(Arc::new(WeatherApiProvider::from_config(config)))
    }

    /// Start a new fetch cycle, superseding any cycle still in flight.
    /// Returns the cycle id to check with [`Self::is_current`] before a
    /// late result is applied.
    pub fn begin_cycle(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Whether the given cycle is still the latest one. Superseded
    /// cycles discard their results instead of applying them.
    pub fn is_current(&self, cycle: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == cycle
    }

    /// Live path only; the caller decides what to do with a failure.
    pub async fn fetch_bundle(
        &self,
        location: Coordinate,
        unit: UnitPreference,
    ) -> Result<WeatherBundle, Error> {
        let snapshot = self.provider.forecast(location, unit).await?;
        Ok(build_bundle(&snapshot, unit))
    }

    /// Live path with automatic sample substitution. Never fails: on any
    /// upstream problem the sample bundle is returned with its city name
    /// overridden and the advisory notice attached.
    pub async fn fetch_bundle_or_sample(
        &self,
        city_name: Option<&str>,
        location: Coordinate,
        unit: UnitPreference,
    ) -> ResolvedBundle {
        match self.fetch_bundle(location, unit).await {
            Ok(bundle) => ResolvedBundle { bundle, source: BundleSource::Live, notice: None },
            Err(err) => {
                tracing::warn!("live weather fetch failed, serving sample data: {err}");
                let mut bundle = mock::sample_bundle();
                if let Some(name) = city_name {
                    bundle.header.city = name.to_string();
                }
                if unit == UnitPreference::Imperial {
                    bundle = bundle_to_imperial(bundle);
                }
                ResolvedBundle {
                    bundle,
                    source: BundleSource::Sample,
                    notice: Some(SAMPLE_DATA_NOTICE),
                }
            }
        }
    }

    /// Multi-day moon table, sample-backed on failure.
    pub async fn moon_phases(
        &self,
        location: Coordinate,
    ) -> (Vec<MoonPhaseEntry>, Option<&'static str>) {
        match self.provider.forecast(location, UnitPreference::Metric).await {
            Ok(snapshot) => (moon_table(&snapshot), None),
            Err(err) => {
                tracing::warn!("moon table fetch failed, serving sample data: {err}");
                (mock::sample_moon_phases(), Some(SAMPLE_DATA_NOTICE))
            }
        }
    }

    /// Current moon snapshot, sample-backed on failure.
    pub async fn moon_details(
        &self,
        location: Coordinate,
    ) -> (MoonDetails, Option<&'static str>) {
        match self.provider.forecast(location, UnitPreference::Metric).await {
            Ok(snapshot) => {
                let meta = moon::phase_meta(snapshot.moon.phase);
                let details = MoonDetails {
                    phase_name: meta.name.to_string(),
                    illumination: format!("{}%", snapshot.moon.illumination.round()),
                    rise_time: format_unix_time(snapshot.moon.moonrise),
                    set_time: format_unix_time(snapshot.moon.moonset),
                    mantra: meta.energy.to_string(),
                };
                (details, None)
            }
            Err(err) => {
                tracing::warn!("moon details fetch failed, serving sample data: {err}");
                (mock::sample_moon_details(), Some(SAMPLE_DATA_NOTICE))
            }
        }
    }

    /// Fetch one compact snapshot per city, concurrently and
    /// order-preserving. A failed city becomes a placeholder row; the
    /// batch itself never fails.
    pub async fn city_snapshots(
        &self,
        cities: &[CityOption],
        unit: UnitPreference,
    ) -> Vec<CitySnapshot> {
        let handles: Vec<_> = cities
            .iter()
            .map(|city| {
                let provider = Arc::clone(&self.provider);
                let coordinate = city.coordinate();
                tokio::spawn(async move { provider.forecast(coordinate, unit).await })
            })
            .collect();

        let mut snapshots = Vec::with_capacity(cities.len());
        for (city, handle) in cities.iter().zip(handles) {
            let snapshot = match handle.await {
                Ok(Ok(snapshot)) => CitySnapshot {
                    city: snapshot.city.clone(),
                    temperature: format!(
                        "{}{}",
                        snapshot.current.temp.round() as i64,
                        unit.temp_symbol()
                    ),
                    icon: icon_from_condition(&snapshot.current.condition, None),
                },
                Ok(Err(err)) => {
                    tracing::warn!("snapshot fetch failed for {}: {err}", city.name);
                    placeholder_snapshot(city)
                }
                Err(join_err) => {
                    tracing::warn!("snapshot task failed for {}: {join_err}", city.name);
                    placeholder_snapshot(city)
                }
            };
            snapshots.push(snapshot);
        }
        snapshots
    }

    /// City search; failures degrade to an empty list, never an error.
    pub async fn search_cities(&self, query: &str) -> Vec<CitySearchResult> {
        match self.provider.search(query).await {
            Ok(results) => results,
            Err(err) => {
                tracing::warn!("city search failed: {err}");
                Vec::new()
            }
        }
    }
}

fn placeholder_snapshot(city: &CityOption) -> CitySnapshot {
    CitySnapshot {
        city: city.name.to_string(),
        temperature: "--".to_string(),
        icon: IconKind::Cloud,
    }
}

fn moon_table(snapshot: &ForecastSnapshot) -> Vec<MoonPhaseEntry> {
    snapshot
        .daily
        .iter()
        .take(8)
        .map(|day| {
            let meta = moon::phase_meta(day.moon_phase);
            MoonPhaseEntry {
                name: meta.name.to_string(),
                illumination: format!("{}%", day.moon_illumination.round()),
                description: meta.description.to_string(),
                energy_suggestion: meta.energy.to_string(),
                rise_time: format_unix_time(day.moonrise),
                set_time: format_unix_time(day.moonset),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CITY_OPTIONS;
    use crate::provider::weatherapi::tests::FORECAST_FIXTURE;
    use crate::provider::{CurrentConditions, DailySample, MoonSample};
    use async_trait::async_trait;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn live_snapshot(city: &str, temp: f64, humidity: f64) -> ForecastSnapshot {
        let day = 1_702_339_200;
        ForecastSnapshot {
            city: city.to_string(),
            current: CurrentConditions {
                temp,
                feels_like: temp + 2.0,
                humidity,
                wind_kph: 12.0,
                uvi: 5.0,
                pressure_mb: 1012.0,
                aqi_index: None,
                condition: "Sunny".to_string(),
                sunrise: day + 6 * 3600,
                sunset: day + 17 * 3600,
            },
            hourly: Vec::new(),
            daily: vec![DailySample {
                date: day,
                temp_min: temp - 4.0,
                temp_max: temp + 1.0,
                condition: "Sunny".to_string(),
                moon_phase: 0.5,
                moon_illumination: 100.0,
                sunrise: day + 6 * 3600,
                sunset: day + 17 * 3600,
                moonrise: day + 7 * 3600,
                moonset: day + 18 * 3600,
                uvi: 5.0,
                humidity,
            }],
            moon: MoonSample {
                phase: 0.5,
                illumination: 100.0,
                moonrise: day + 7 * 3600,
                moonset: day + 18 * 3600,
            },
        }
    }

    /// Test double that fails for a configurable latitude.
    #[derive(Debug)]
    struct FlakyProvider {
        fail_latitude: Option<f64>,
    }

    #[async_trait]
    impl WeatherProvider for FlakyProvider {
        async fn forecast(
            &self,
            location: Coordinate,
            _unit: UnitPreference,
        ) -> Result<ForecastSnapshot, Error> {
            if self.fail_latitude.is_some_and(|lat| (location.latitude - lat).abs() < 1e-9) {
                return Err(Error::upstream("scripted failure"));
            }
            Ok(live_snapshot("Liveville", 21.0, 55.0))
        }

        async fn search(&self, _query: &str) -> Result<Vec<CitySearchResult>, Error> {
            Err(Error::upstream("scripted failure"))
        }
    }

    fn wiremock_service(server: &MockServer) -> WeatherService {
        let provider = WeatherApiProvider::new("TESTKEY").with_base_url(server.uri());
        WeatherService::new(Arc::new(provider))
    }

    #[tokio::test]
    async fn live_bundle_carries_water_temperature_detail() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/forecast.json"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(FORECAST_FIXTURE, "application/json"),
            )
            .mount(&server)
            .await;

        let service = wiremock_service(&server);
        let coord = Coordinate::new(25.033, 121.5654).expect("valid");
        let resolved =
            service.fetch_bundle_or_sample(Some("Taipei"), coord, UnitPreference::Metric).await;

        assert_eq!(resolved.source, BundleSource::Live);
        assert_eq!(resolved.notice, None);
        assert_eq!(resolved.bundle.header.city, "Taipei");
        let water = resolved
            .bundle
            .details
            .iter()
            .find(|d| d.title == "Water Temperature")
            .expect("water temp card");
        // 26 - (100 - 70) / 5 = 20.
        assert_eq!(water.value, "20°C");
    }

    #[tokio::test]
    async fn http_500_falls_back_to_sample_with_notice() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/forecast.json"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let service = wiremock_service(&server);
        let coord = Coordinate::new(25.033, 121.5654).expect("valid");
        let resolved = service.fetch_bundle_or_sample(None, coord, UnitPreference::Metric).await;

        assert_eq!(resolved.source, BundleSource::Sample);
        assert_eq!(resolved.notice, Some(SAMPLE_DATA_NOTICE));
        assert_eq!(resolved.bundle.header.city, "Taipei");
        assert_eq!(resolved.bundle, mock::sample_bundle());
    }

    #[tokio::test]
    async fn fallback_overrides_city_and_converts_units() {
        let service = WeatherService::new(Arc::new(FlakyProvider { fail_latitude: Some(0.0) }));
        let coord = Coordinate::new(0.0, 0.0).expect("valid");
        let resolved =
            service.fetch_bundle_or_sample(Some("Tokyo"), coord, UnitPreference::Imperial).await;

        assert_eq!(resolved.bundle.header.city, "Tokyo");
        // 26 °C sample header → 79 °F.
        assert_eq!(resolved.bundle.header.temperature, "79");
        // 12 km/h sample wind card → 7 mph.
        let wind = resolved
            .bundle
            .details
            .iter()
            .find(|d| d.kind == crate::model::DetailKind::Wind)
            .expect("wind card");
        assert_eq!(wind.value, "7 mph");
        assert_eq!(resolved.bundle.temp_trend.current, "79°F");
        assert_eq!(resolved.notice, Some(SAMPLE_DATA_NOTICE));
    }

    #[tokio::test]
    async fn moon_details_from_full_moon_phase() {
        let service = WeatherService::new(Arc::new(FlakyProvider { fail_latitude: None }));
        let coord = Coordinate::new(25.033, 121.5654).expect("valid");
        let (details, notice) = service.moon_details(coord).await;

        assert_eq!(notice, None);
        assert_eq!(details.phase_name, "Full Moon");
        assert_eq!(details.illumination, "100%");
        assert_eq!(details.mantra, "Celebrate and release.");
    }

    #[tokio::test]
    async fn moon_phases_fall_back_to_sample_table() {
        let service = WeatherService::new(Arc::new(FlakyProvider { fail_latitude: Some(25.033) }));
        let coord = Coordinate::new(25.033, 121.5654).expect("valid");
        let (phases, notice) = service.moon_phases(coord).await;

        assert_eq!(notice, Some(SAMPLE_DATA_NOTICE));
        assert_eq!(phases, mock::sample_moon_phases());
    }

    #[tokio::test]
    async fn batch_isolates_per_city_failures() {
        let cities = &CITY_OPTIONS[..5];
        // City #3 in the batch is London.
        let london = cities[2];
        let service = WeatherService::new(Arc::new(FlakyProvider {
            fail_latitude: Some(london.latitude),
        }));

        let snapshots = service.city_snapshots(cities, UnitPreference::Metric).await;

        assert_eq!(snapshots.len(), 5);
        assert_eq!(snapshots[2].city, "London");
        assert_eq!(snapshots[2].temperature, "--");
        assert_eq!(snapshots[2].icon, IconKind::Cloud);
        for (i, snapshot) in snapshots.iter().enumerate() {
            if i != 2 {
                assert_eq!(snapshot.temperature, "21°C");
                assert_eq!(snapshot.icon, IconKind::Sun);
            }
        }
    }

    #[tokio::test]
    async fn search_failure_degrades_to_empty() {
        let service = WeatherService::new(Arc::new(FlakyProvider { fail_latitude: None }));
        assert!(service.search_cities("london").await.is_empty());
    }

    #[test]
    fn superseded_cycles_are_discarded() {
        let service = WeatherService::new(Arc::new(FlakyProvider { fail_latitude: None }));
        let first = service.begin_cycle();
        assert!(service.is_current(first));

        let second = service.begin_cycle();
        assert!(!service.is_current(first));
        assert!(service.is_current(second));
    }
}
