//! Query outcome model

use super::{Airport, GeocodedPoint, LocationCandidate};
use crate::error::QueryFailure;
use serde::Serialize;
use std::fmt;

/// A resolved airport together with how it was found
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct LocatedAirport {
    /// Nearest airport in the geocoded country
    pub airport: Airport,
    /// Geodesic distance from the geocoded point in kilometers
    pub distance_km: f64,
    /// Candidate whose geocode succeeded
    pub candidate: LocationCandidate,
    /// Where the candidate was geocoded to
    pub point: GeocodedPoint,
}

impl fmt::Display for LocatedAirport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "The nearest airport is: {}", self.airport)
    }
}

/// Outcome of a single lookup
pub type QueryResult = std::result::Result<LocatedAirport, QueryFailure>;
