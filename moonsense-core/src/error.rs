use thiserror::Error;

/// Failures produced by the weather data pipeline.
///
/// `UpstreamUnavailable` covers every way the live path can go wrong:
/// network errors, non-2xx statuses, and payloads that fail validation.
/// Callers are expected to catch it and substitute the sample bundle.
#[derive(Debug, Error)]
pub enum Error {
    #[error("weather upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("coordinate out of range: lat {lat}, lon {lon}")]
    InvalidCoordinate { lat: f64, lon: f64 },
}

impl Error {
    pub fn upstream(msg: impl Into<String>) -> Self {
        Error::UpstreamUnavailable(msg.into())
    }
}
