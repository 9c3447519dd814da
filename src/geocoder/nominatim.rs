//! Nominatim (OpenStreetMap) geocoding client
//!
//! Requests go through `reqwest-middleware` with exponential backoff for
//! transient failures, a client-side throttle, and an overall timeout per
//! lookup.

use super::{GeocodeOutcome, Geocoder, NotFoundReason, RequestThrottle};
use crate::config::GeocoderConfig;
use crate::models::GeocodedPoint;
use crate::{LocatorError, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use serde::Deserialize;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

/// A single entry of a Nominatim `search` response (format `jsonv2`)
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    display_name: Option<String>,
    #[serde(default)]
    address: Option<NominatimAddress>,
}

#[derive(Debug, Deserialize)]
struct NominatimAddress {
    country_code: Option<String>,
}

impl NominatimPlace {
    fn into_point(self) -> std::result::Result<GeocodedPoint, NotFoundReason> {
        let latitude = self
            .lat
            .parse::<f64>()
            .map_err(|e| NotFoundReason::InvalidResponse(format!("latitude '{}': {e}", self.lat)))?;
        let longitude = self
            .lon
            .parse::<f64>()
            .map_err(|e| NotFoundReason::InvalidResponse(format!("longitude '{}': {e}", self.lon)))?;

        let country_code = self
            .address
            .and_then(|address| address.country_code)
            .map(|code| code.trim().to_string())
            .filter(|code| !code.is_empty())
            .ok_or(NotFoundReason::MissingCountry)?;

        let mut point = GeocodedPoint::new(latitude, longitude, country_code);
        point.display_name = self.display_name;
        Ok(point)
    }
}

/// Interpret the body of a `search` response
pub fn parse_search_response(body: &str) -> GeocodeOutcome {
    let places: Vec<NominatimPlace> = match serde_json::from_str(body) {
        Ok(places) => places,
        Err(e) => return GeocodeOutcome::NotFound(NotFoundReason::InvalidResponse(e.to_string())),
    };

    match places.into_iter().next() {
        None => GeocodeOutcome::NotFound(NotFoundReason::NoMatch),
        Some(place) => match place.into_point() {
            Ok(point) => GeocodeOutcome::Found(point),
            Err(reason) => GeocodeOutcome::NotFound(reason),
        },
    }
}

/// Geocoder backed by a Nominatim-compatible HTTP API
pub struct NominatimGeocoder {
    client: ClientWithMiddleware,
    base_url: String,
    language: String,
    timeout: Duration,
    throttle: RequestThrottle,
}

impl NominatimGeocoder {
    /// Create a new geocoding client
    pub fn new(config: &GeocoderConfig) -> Result<Self> {
        let timeout = Duration::from_secs(config.timeout_seconds.into());

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| LocatorError::api(format!("Failed to create HTTP client: {e}")))?;

        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(config.max_retries);
        let client = ClientBuilder::new(client)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            language: config.language.clone(),
            timeout,
            throttle: RequestThrottle::new(Duration::from_millis(config.min_interval_ms)),
        })
    }

    fn search_url(&self, query: &str) -> String {
        format!(
            "{}/search?q={}&format=jsonv2&addressdetails=1&limit=1&accept-language={}",
            self.base_url,
            urlencoding::encode(query),
            urlencoding::encode(&self.language)
        )
    }

    async fn fetch(&self, query: &str) -> std::result::Result<String, NotFoundReason> {
        self.throttle.wait().await;

        let url = self.search_url(query);
        debug!("Nominatim request URL: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| NotFoundReason::Transport(e.to_string()))?;

        let status = response.status();
        debug!("HTTP response received: {}", status);

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(NotFoundReason::RateLimited);
        }
        if !status.is_success() {
            return Err(NotFoundReason::Transport(format!("HTTP {status}")));
        }

        response
            .text()
            .await
            .map_err(|e| NotFoundReason::Transport(e.to_string()))
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    #[instrument(skip(self))]
    async fn resolve(&self, query: &str) -> GeocodeOutcome {
        let start_time = Instant::now();

        let outcome = match tokio::time::timeout(self.timeout, self.fetch(query)).await {
            Ok(Ok(body)) => parse_search_response(&body),
            Ok(Err(reason)) => GeocodeOutcome::NotFound(reason),
            Err(_) => GeocodeOutcome::NotFound(NotFoundReason::Timeout(self.timeout)),
        };

        match &outcome {
            GeocodeOutcome::Found(point) => info!(
                "Geocoded '{}' to ({}) in {} [{:.3}s]",
                query,
                point.format_coordinates(),
                point.country_code,
                start_time.elapsed().as_secs_f64()
            ),
            GeocodeOutcome::NotFound(reason) => {
                warn!("Could not geocode '{}': {}", query, reason)
            }
        }

        outcome
    }
}
