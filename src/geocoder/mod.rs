//! Geocoder Adapter
//!
//! Resolves a candidate phrase to coordinates and a country code. Lookups
//! never fail with an error: every problem is reported as
//! [`GeocodeOutcome::NotFound`] so the caller can move on to the next
//! candidate.

pub mod nominatim;
pub mod throttle;

pub use nominatim::NominatimGeocoder;
pub use throttle::RequestThrottle;

use crate::models::GeocodedPoint;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Free-text geocoding capability
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Best match for `query`, or the reason there is none
    async fn resolve(&self, query: &str) -> GeocodeOutcome;
}

/// Result of a single geocoding attempt
#[derive(Debug, Clone, PartialEq)]
pub enum GeocodeOutcome {
    Found(GeocodedPoint),
    NotFound(NotFoundReason),
}

/// Why a phrase could not be geocoded
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NotFoundReason {
    #[error("no match")]
    NoMatch,

    #[error("result has no country code")]
    MissingCountry,

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("rate limited by geocoding service")]
    RateLimited,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}
