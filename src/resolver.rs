//! Nearest-Airport Resolver
//!
//! Restricts the catalog to the geocoded country and picks the airport with
//! the smallest ellipsoidal (WGS84) geodesic distance.

use crate::catalog::AirportCatalog;
use crate::models::{Airport, GeocodedPoint};
use geo::{Distance, Geodesic, Point};
use std::fmt;

/// Geodesic distance in kilometers between two points on the WGS84 ellipsoid
#[must_use]
pub fn geodesic_distance_km(a: Point<f64>, b: Point<f64>) -> f64 {
    Geodesic.distance(a, b) / 1000.0
}

/// An airport and its distance from the query point
#[derive(Debug, Clone, PartialEq)]
pub struct NearestAirport<'a> {
    pub airport: &'a Airport,
    pub distance_km: f64,
}

/// Why no airport could be selected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoMatch {
    NoAirportsInCountry { country: String },
}

impl fmt::Display for NoMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoMatch::NoAirportsInCountry { .. } => f.write_str("no airports in country"),
        }
    }
}

/// Nearest airport to `point` among the airports of `country_code`.
///
/// Ties go to the airport that appears first in the catalog: the scan runs
/// in catalog order and only a strictly smaller distance replaces the
/// current best.
pub fn nearest<'a>(
    point: &GeocodedPoint,
    country_code: &str,
    catalog: &'a AirportCatalog,
) -> Result<NearestAirport<'a>, NoMatch> {
    let origin = point.point();
    let mut best: Option<NearestAirport<'a>> = None;

    for airport in catalog.airports_in_country(country_code) {
        let distance_km = geodesic_distance_km(origin, airport.point());
        if best.as_ref().is_none_or(|b| distance_km < b.distance_km) {
            best = Some(NearestAirport {
                airport,
                distance_km,
            });
        }
    }

    best.ok_or_else(|| NoMatch::NoAirportsInCountry {
        country: country_code.to_ascii_uppercase(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn airport(name: &str, iata: &str, country: &str, lat: f64, lon: f64) -> Airport {
        Airport {
            name: name.to_string(),
            iata_code: Some(iata.to_string()),
            municipality: name.to_string(),
            country_code: country.to_string(),
            latitude: lat,
            longitude: lon,
        }
    }

    fn catalog() -> AirportCatalog {
        AirportCatalog::from_airports(vec![
            airport("Delhi", "DEL", "IN", 28.5665, 77.1031),
            airport("Mumbai", "BOM", "IN", 19.0887, 72.8679),
            airport("Lahore", "LHE", "PK", 31.5216, 74.4036),
            airport("Twin A", "TWA", "XT", 0.0, 1.0),
            airport("Twin B", "TWB", "XT", 0.0, 1.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_nearest_in_country() {
        let catalog = catalog();
        let gurgaon = GeocodedPoint::new(28.4595, 77.0266, "IN");
        let found = nearest(&gurgaon, "IN", &catalog).unwrap();
        assert_eq!(found.airport.iata_code.as_deref(), Some("DEL"));
        assert!(found.distance_km > 10.0 && found.distance_km < 20.0);
    }

    #[test]
    fn test_country_scoping_beats_raw_distance() {
        // Amritsar is closer to Lahore than to Delhi, but Lahore is in Pakistan
        let catalog = catalog();
        let amritsar = GeocodedPoint::new(31.634, 74.8723, "IN");
        let found = nearest(&amritsar, "IN", &catalog).unwrap();
        assert_eq!(found.airport.iata_code.as_deref(), Some("DEL"));
    }

    #[rstest]
    #[case("FR")]
    #[case("")]
    fn test_no_airports_in_country(#[case] country: &str) {
        let catalog = catalog();
        let point = GeocodedPoint::new(48.8566, 2.3522, country);
        let err = nearest(&point, country, &catalog).unwrap_err();
        assert_eq!(err.to_string(), "no airports in country");
    }

    #[test]
    fn test_tie_goes_to_first_in_catalog() {
        let catalog = catalog();
        let origin = GeocodedPoint::new(0.0, 0.0, "XT");
        let found = nearest(&origin, "XT", &catalog).unwrap();
        assert_eq!(found.airport.name, "Twin A");
    }

    #[test]
    fn test_country_code_case_insensitive() {
        let catalog = catalog();
        let point = GeocodedPoint::new(19.0, 72.8, "in");
        let found = nearest(&point, "in", &catalog).unwrap();
        assert_eq!(found.airport.iata_code.as_deref(), Some("BOM"));
    }

    #[rstest]
    #[case((28.5665, 77.1031), (19.0887, 72.8679))]
    #[case((89.9, 0.0), (-60.0, 170.0))]
    #[case((51.4706, -0.4619), (40.6413, -73.7781))]
    fn test_distance_is_symmetric(#[case] a: (f64, f64), #[case] b: (f64, f64)) {
        let pa = Point::new(a.1, a.0);
        let pb = Point::new(b.1, b.0);
        let ab = geodesic_distance_km(pa, pb);
        let ba = geodesic_distance_km(pb, pa);
        assert!((ab - ba).abs() < 1e-6, "{ab} vs {ba}");
    }

    #[test]
    fn test_distance_uses_ellipsoid() {
        // One degree of latitude at the equator is 110.574 km on WGS84,
        // against 111.195 km on a sphere
        let d = geodesic_distance_km(Point::new(0.0, 0.0), Point::new(0.0, 1.0));
        assert!((d - 110.574).abs() < 0.01, "{d}");
    }
}
