//! Query Orchestrator
//!
//! Runs one query through extraction, geocoding and resolution. The
//! fallback through candidates is an explicit state machine:
//!
//! ```text
//! Start -> ExtractingEntities -> GeocodingCandidate(0) -> ... -> GeocodingCandidate(n)
//!                  |                        |                            |
//!                Failed               Resolving -> Done               Failed
//!                                           \-> Failed
//! ```

use crate::catalog::AirportCatalog;
use crate::error::QueryFailure;
use crate::extractor::EntityExtractor;
use crate::geocoder::{GeocodeOutcome, Geocoder};
use crate::models::{EntityLabel, GeocodedPoint, LocatedAirport, LocationCandidate, QueryResult};
use crate::resolver::{self, NoMatch};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, instrument};

#[derive(Debug)]
enum QueryState {
    Start,
    ExtractingEntities,
    GeocodingCandidate(usize),
    Resolving {
        candidate: usize,
        point: GeocodedPoint,
    },
    Done(LocatedAirport),
    Failed(QueryFailure),
}

impl fmt::Display for QueryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryState::Start => f.write_str("Start"),
            QueryState::ExtractingEntities => f.write_str("ExtractingEntities"),
            QueryState::GeocodingCandidate(i) => write!(f, "GeocodingCandidate({i})"),
            QueryState::Resolving { .. } => f.write_str("Resolving"),
            QueryState::Done(_) => f.write_str("Done"),
            QueryState::Failed(_) => f.write_str("Failed"),
        }
    }
}

/// Finds the nearest airport for free-text location descriptions
pub struct AirportLocator<E, G> {
    catalog: Arc<AirportCatalog>,
    extractor: E,
    geocoder: G,
    fallback_to_full_text: bool,
}

impl<E, G> AirportLocator<E, G>
where
    E: EntityExtractor,
    G: Geocoder,
{
    pub fn new(catalog: Arc<AirportCatalog>, extractor: E, geocoder: G) -> Self {
        Self {
            catalog,
            extractor,
            geocoder,
            fallback_to_full_text: false,
        }
    }

    /// Geocode the whole input when the extractor finds nothing
    #[must_use]
    pub fn with_full_text_fallback(mut self, enabled: bool) -> Self {
        self.fallback_to_full_text = enabled;
        self
    }

    /// Resolve `text` to the nearest airport in the same country as the
    /// first candidate that geocodes
    #[instrument(skip(self))]
    pub async fn locate(&self, text: &str) -> QueryResult {
        let mut candidates: Vec<LocationCandidate> = Vec::new();
        let mut attempted: Vec<String> = Vec::new();
        let mut state = QueryState::Start;

        loop {
            let next = match state {
                QueryState::Start => QueryState::ExtractingEntities,

                QueryState::ExtractingEntities => {
                    candidates = self.extract_candidates(text);
                    if candidates.is_empty() {
                        QueryState::Failed(QueryFailure::ExtractionEmpty)
                    } else {
                        QueryState::GeocodingCandidate(0)
                    }
                }

                QueryState::GeocodingCandidate(i) => {
                    let candidate = &candidates[i];
                    attempted.push(candidate.text.clone());

                    match self.geocoder.resolve(&candidate.text).await {
                        GeocodeOutcome::Found(point) => QueryState::Resolving {
                            candidate: i,
                            point,
                        },
                        GeocodeOutcome::NotFound(reason) => {
                            debug!("Could not geocode the location '{}': {}", candidate.text, reason);
                            if i + 1 < candidates.len() {
                                QueryState::GeocodingCandidate(i + 1)
                            } else {
                                QueryState::Failed(QueryFailure::GeocodeNotFound {
                                    attempted: std::mem::take(&mut attempted),
                                })
                            }
                        }
                    }
                }

                QueryState::Resolving { candidate, point } => {
                    match resolver::nearest(&point, &point.country_code, &self.catalog) {
                        Ok(found) => QueryState::Done(LocatedAirport {
                            airport: found.airport.clone(),
                            distance_km: found.distance_km,
                            candidate: candidates[candidate].clone(),
                            point,
                        }),
                        Err(NoMatch::NoAirportsInCountry { country }) => {
                            QueryState::Failed(QueryFailure::NoAirportInCountry { country })
                        }
                    }
                }

                QueryState::Done(located) => {
                    info!(
                        "Nearest airport for '{}' is {} ({:.1} km)",
                        located.candidate.text, located.airport, located.distance_km
                    );
                    return Ok(located);
                }

                QueryState::Failed(failure) => {
                    info!("Query failed: {}", failure);
                    return Err(failure);
                }
            };

            debug!("Query state -> {}", next);
            state = next;
        }
    }

    fn extract_candidates(&self, text: &str) -> Vec<LocationCandidate> {
        let candidates = self.extractor.extract(text);
        if !candidates.is_empty() || !self.fallback_to_full_text {
            return candidates;
        }

        let trimmed = text.trim();
        if trimmed.is_empty() {
            return candidates;
        }

        debug!("No location keywords found, trying to geocode full text");
        let offset = text.len() - text.trim_start().len();
        vec![LocationCandidate::new(trimmed, EntityLabel::Loc, offset)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::RuleBasedExtractor;
    use crate::geocoder::NotFoundReason;
    use crate::models::Airport;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Geocoder answering from a fixed table and recording every query
    #[derive(Default)]
    struct ScriptedGeocoder {
        answers: HashMap<String, GeocodedPoint>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedGeocoder {
        fn with(mut self, query: &str, point: GeocodedPoint) -> Self {
            self.answers.insert(query.to_lowercase(), point);
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Geocoder for ScriptedGeocoder {
        async fn resolve(&self, query: &str) -> GeocodeOutcome {
            self.calls.lock().unwrap().push(query.to_string());
            match self.answers.get(&query.to_lowercase()) {
                Some(point) => GeocodeOutcome::Found(point.clone()),
                None => GeocodeOutcome::NotFound(NotFoundReason::NoMatch),
            }
        }
    }

    /// Extractor returning a fixed list
    struct FixedExtractor(Vec<&'static str>);

    impl EntityExtractor for FixedExtractor {
        fn extract(&self, _text: &str) -> Vec<LocationCandidate> {
            self.0
                .iter()
                .map(|t| LocationCandidate::new(*t, EntityLabel::Gpe, 0))
                .collect()
        }
    }

    fn catalog() -> Arc<AirportCatalog> {
        let airport = |name: &str, iata: &str, city: &str, country: &str, lat, lon| Airport {
            name: name.to_string(),
            iata_code: Some(iata.to_string()),
            municipality: city.to_string(),
            country_code: country.to_string(),
            latitude: lat,
            longitude: lon,
        };
        Arc::new(
            AirportCatalog::from_airports(vec![
                airport("Indira Gandhi International Airport", "DEL", "New Delhi", "IN", 28.5665, 77.1031),
                airport("Chhatrapati Shivaji International Airport", "BOM", "Mumbai", "IN", 19.0887, 72.8679),
                airport("London Heathrow Airport", "LHR", "London", "GB", 51.4706, -0.4619),
            ])
            .unwrap(),
        )
    }

    #[tokio::test]
    async fn test_gurgaon_resolves_to_delhi() {
        let geocoder =
            ScriptedGeocoder::default().with("gurgaon", GeocodedPoint::new(28.4595, 77.0266, "in"));
        let locator = AirportLocator::new(catalog(), RuleBasedExtractor::default(), geocoder);

        let located = locator.locate("gurgaon sector 56 near E block").await.unwrap();
        assert_eq!(located.airport.iata_code.as_deref(), Some("DEL"));
        assert_eq!(located.candidate.text, "gurgaon");
        assert_eq!(
            located.to_string(),
            "The nearest airport is: Indira Gandhi International Airport (DEL) - New Delhi"
        );
    }

    #[tokio::test]
    async fn test_empty_extraction_never_calls_geocoder() {
        let locator = AirportLocator::new(
            catalog(),
            RuleBasedExtractor::default(),
            ScriptedGeocoder::default(),
        );

        let result = locator.locate("next to store").await;
        assert_eq!(result.unwrap_err(), QueryFailure::ExtractionEmpty);
        assert!(locator.geocoder.calls().is_empty());
    }

    #[tokio::test]
    async fn test_candidates_tried_in_order_until_success() {
        let geocoder = ScriptedGeocoder::default()
            .with("Mumbai", GeocodedPoint::new(19.076, 72.8777, "IN"))
            .with("London", GeocodedPoint::new(51.5072, -0.1276, "GB"));
        let extractor = FixedExtractor(vec!["Atlantis", "Mumbai", "London"]);
        let locator = AirportLocator::new(catalog(), extractor, geocoder);

        let located = locator.locate("ignored").await.unwrap();
        assert_eq!(located.airport.iata_code.as_deref(), Some("BOM"));
        assert_eq!(locator.geocoder.calls(), vec!["Atlantis", "Mumbai"]);
    }

    #[tokio::test]
    async fn test_all_candidates_not_found() {
        let extractor = FixedExtractor(vec!["Atlantis", "Lemuria"]);
        let locator = AirportLocator::new(catalog(), extractor, ScriptedGeocoder::default());

        let failure = locator.locate("ignored").await.unwrap_err();
        assert_eq!(
            failure,
            QueryFailure::GeocodeNotFound {
                attempted: vec!["Atlantis".to_string(), "Lemuria".to_string()]
            }
        );
        assert_eq!(locator.geocoder.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_no_airport_in_country_stops_the_query() {
        let geocoder = ScriptedGeocoder::default()
            .with("Paris", GeocodedPoint::new(48.8566, 2.3522, "FR"))
            .with("London", GeocodedPoint::new(51.5072, -0.1276, "GB"));
        let extractor = FixedExtractor(vec!["Paris", "London"]);
        let locator = AirportLocator::new(catalog(), extractor, geocoder);

        let failure = locator.locate("ignored").await.unwrap_err();
        assert_eq!(
            failure,
            QueryFailure::NoAirportInCountry {
                country: "FR".to_string()
            }
        );
        assert_eq!(locator.geocoder.calls(), vec!["Paris"]);
    }

    #[tokio::test]
    async fn test_full_text_fallback() {
        let geocoder = ScriptedGeocoder::default()
            .with("next to store", GeocodedPoint::new(51.5, -0.12, "GB"));
        let locator = AirportLocator::new(catalog(), RuleBasedExtractor::default(), geocoder)
            .with_full_text_fallback(true);

        let located = locator.locate("  next to store").await.unwrap();
        assert_eq!(located.airport.iata_code.as_deref(), Some("LHR"));
        assert_eq!(located.candidate.offset, 2);
        assert_eq!(locator.geocoder.calls(), vec!["next to store"]);
    }

    #[tokio::test]
    async fn test_repeated_query_is_stable() {
        let geocoder =
            ScriptedGeocoder::default().with("mumbai", GeocodedPoint::new(19.076, 72.8777, "IN"));
        let locator = AirportLocator::new(catalog(), RuleBasedExtractor::default(), geocoder);

        let first = locator.locate("pick me up in mumbai").await.unwrap();
        let second = locator.locate("pick me up in mumbai").await.unwrap();
        assert_eq!(first, second);
    }
}
