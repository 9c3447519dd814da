//! Airport locator - find the nearest airport to a free-text location
//!
//! This library extracts place names from free text, geocodes them and
//! picks the closest airport in the same country from a reference table.

pub mod catalog;
pub mod config;
pub mod error;
pub mod extractor;
pub mod geocoder;
pub mod locator;
pub mod logging;
pub mod models;
pub mod resolver;

// Re-export core types for public API
pub use catalog::{AirportCatalog, CatalogFilter, LoadStats};
pub use config::LocatorConfig;
pub use error::{LocatorError, QueryFailure};
pub use extractor::{EntityExtractor, RuleBasedExtractor};
pub use geocoder::{GeocodeOutcome, Geocoder, NominatimGeocoder, NotFoundReason};
pub use locator::AirportLocator;
pub use models::{
    Airport, EntityLabel, GeocodedPoint, LocatedAirport, LocationCandidate, QueryResult,
};
pub use resolver::{NearestAirport, NoMatch, geodesic_distance_km, nearest};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, LocatorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
