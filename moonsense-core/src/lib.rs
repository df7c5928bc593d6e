//! Core library for the moonsense weather app.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The upstream weather provider abstraction (WeatherAPI.com)
//! - The normalization pipeline producing [`WeatherBundle`]s
//! - Moon-phase derivation and the deterministic sample fallback
//! - The fetch orchestration service consumed by rendering layers
//!
//! It is used by `moonsense-cli`, but can also be reused by other binaries
//! or services.

pub mod bundle;
pub mod clock;
pub mod config;
pub mod error;
pub mod mock;
pub mod model;
pub mod moon;
pub mod provider;
pub mod service;
pub mod units;

pub use config::Config;
pub use error::Error;
pub use model::{
    CITY_OPTIONS, CityOption, CitySearchResult, CitySnapshot, Coordinate, MoonDetails,
    MoonPhaseEntry, UnitPreference, WeatherBundle,
};
pub use provider::{WeatherProvider, weatherapi::WeatherApiProvider};
pub use service::{
    BundleSource, RETRY_MESSAGE, ResolvedBundle, SAMPLE_DATA_NOTICE, WeatherService,
};
