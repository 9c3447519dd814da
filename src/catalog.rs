//! Airport Catalog
//!
//! Loads the airport reference table (OurAirports CSV layout) once at startup
//! and indexes it by country. The catalog is never mutated after loading.

use crate::config::CatalogConfig;
use crate::models::Airport;
use crate::{LocatorError, Result};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

/// Row filters applied while loading
#[derive(Debug, Clone, Default)]
pub struct CatalogFilter {
    /// Drop rows whose `scheduled_service` is not "yes"
    pub scheduled_only: bool,
    /// Keep only these `type` values (empty keeps all)
    pub airport_types: Vec<String>,
}

impl CatalogFilter {
    /// The filter restricted to columns present in the file. A filter on a
    /// present column rejects rows that leave it blank.
    fn for_headers(&self, headers: &csv::StringRecord) -> Self {
        let has = |column: &str| headers.iter().any(|h| h == column);
        Self {
            scheduled_only: self.scheduled_only && has("scheduled_service"),
            airport_types: if has("type") {
                self.airport_types.clone()
            } else {
                Vec::new()
            },
        }
    }
}

impl From<&CatalogConfig> for CatalogFilter {
    fn from(config: &CatalogConfig) -> Self {
        Self {
            scheduled_only: config.scheduled_only,
            airport_types: config.airport_types.clone(),
        }
    }
}

/// One CSV row. Column names follow OurAirports; the aliases accept the
/// trimmed layout (`latitude`, `longitude`, `country`).
#[derive(Debug, Deserialize)]
struct AirportRecord {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    iata_code: Option<String>,
    #[serde(default)]
    municipality: Option<String>,
    #[serde(default, alias = "country")]
    iso_country: Option<String>,
    #[serde(default, alias = "latitude", deserialize_with = "csv::invalid_option")]
    latitude_deg: Option<f64>,
    #[serde(default, alias = "longitude", deserialize_with = "csv::invalid_option")]
    longitude_deg: Option<f64>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    scheduled_service: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl AirportRecord {
    /// Convert to an `Airport`, or `None` when the row does not qualify
    fn into_airport(self, filter: &CatalogFilter) -> Option<Airport> {
        if filter.scheduled_only
            && !non_empty(self.scheduled_service).is_some_and(|s| s.eq_ignore_ascii_case("yes"))
        {
            return None;
        }

        if !filter.airport_types.is_empty()
            && !non_empty(self.kind).is_some_and(|kind| filter.airport_types.contains(&kind))
        {
            return None;
        }

        let latitude = self.latitude_deg.filter(|lat| (-90.0..=90.0).contains(lat))?;
        let longitude = self
            .longitude_deg
            .filter(|lon| (-180.0..=180.0).contains(lon))?;

        Some(Airport {
            name: non_empty(self.name)?,
            iata_code: Some(non_empty(self.iata_code)?.to_ascii_uppercase()),
            municipality: non_empty(self.municipality).unwrap_or_default(),
            country_code: non_empty(self.iso_country)?.to_ascii_uppercase(),
            latitude,
            longitude,
        })
    }
}

/// Counters reported after a load
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    pub rows: usize,
    pub kept: usize,
    pub filtered: usize,
    pub malformed: usize,
}

/// Read-only airport table indexed by country code
#[derive(Debug, Clone)]
pub struct AirportCatalog {
    airports: Vec<Airport>,
    by_country: HashMap<String, Vec<usize>>,
    stats: LoadStats,
}

impl AirportCatalog {
    /// Load the catalog from a CSV file
    pub fn load(path: impl AsRef<Path>, filter: &CatalogFilter) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading airport catalog from {}", path.display());

        let file = std::fs::File::open(path).map_err(|e| {
            LocatorError::data_load(format!("cannot open {}: {e}", path.display()))
        })?;

        Self::from_reader(file, filter)
    }

    /// Load the catalog from any CSV source
    pub fn from_reader<R: Read>(reader: R, filter: &CatalogFilter) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

        let headers = reader.headers()?.clone();
        for required in ["name", "iata_code"] {
            if !headers.iter().any(|h| h == required) {
                return Err(LocatorError::data_load(format!(
                    "missing required column '{required}'"
                )));
            }
        }

        let filter = filter.for_headers(&headers);
        let mut stats = LoadStats::default();
        let mut airports = Vec::new();

        for (idx, result) in reader.deserialize::<AirportRecord>().enumerate() {
            stats.rows += 1;
            let record = match result {
                Ok(record) => record,
                Err(e) => {
                    // Header is line 1
                    warn!("Skipping malformed airport row {}: {}", idx + 2, e);
                    stats.malformed += 1;
                    continue;
                }
            };

            match record.into_airport(&filter) {
                Some(airport) => airports.push(airport),
                None => stats.filtered += 1,
            }
        }

        stats.kept = airports.len();
        let catalog = Self::build(airports, stats)?;

        info!(
            "Loaded {} airports in {} countries ({} rows read, {} filtered, {} malformed)",
            stats.kept,
            catalog.by_country.len(),
            stats.rows,
            stats.filtered,
            stats.malformed
        );

        Ok(catalog)
    }

    /// Build a catalog from airports already in memory
    pub fn from_airports(airports: Vec<Airport>) -> Result<Self> {
        let stats = LoadStats {
            rows: airports.len(),
            kept: airports.len(),
            ..LoadStats::default()
        };
        Self::build(airports, stats)
    }

    fn build(airports: Vec<Airport>, stats: LoadStats) -> Result<Self> {
        if airports.is_empty() {
            return Err(LocatorError::data_load(
                "no usable airports left after filtering",
            ));
        }

        let mut by_country: HashMap<String, Vec<usize>> = HashMap::new();
        for (idx, airport) in airports.iter().enumerate() {
            if airport.country_code.is_empty() {
                return Err(LocatorError::data_load(format!(
                    "airport '{}' has no country code",
                    airport.name
                )));
            }
            by_country
                .entry(airport.country_code.to_ascii_uppercase())
                .or_default()
                .push(idx);
        }

        Ok(Self {
            airports,
            by_country,
            stats,
        })
    }

    /// Load from the configured path, downloading the dataset first when it
    /// is missing and downloads are enabled
    pub async fn load_or_download(config: &CatalogConfig) -> Result<Self> {
        let filter = CatalogFilter::from(config);

        if !config.path.exists() {
            if !config.download_if_missing {
                return Err(LocatorError::data_load(format!(
                    "dataset not found at {}",
                    config.path.display()
                )));
            }
            Self::download(&config.source_url, &config.path).await?;
        }

        Self::load(&config.path, &filter)
    }

    /// Fetch the dataset over HTTP and store it at `dest`
    pub async fn download(url: &str, dest: &Path) -> Result<()> {
        info!("Downloading airport dataset from {}", url);

        let response = reqwest::get(url)
            .await
            .map_err(|e| LocatorError::api(format!("dataset download failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LocatorError::api(format!(
                "dataset download returned HTTP {status}"
            )));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| LocatorError::api(format!("dataset download interrupted: {e}")))?;

        if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(dest, &body)?;

        info!("Saved {} bytes to {}", body.len(), dest.display());
        Ok(())
    }

    /// Airports in `country_code`, in catalog order
    pub fn airports_in_country(&self, country_code: &str) -> impl ExactSizeIterator<Item = &Airport> {
        self.by_country
            .get(&country_code.trim().to_ascii_uppercase())
            .map(Vec::as_slice)
            .unwrap_or(&[])
            .iter()
            .map(|&idx| &self.airports[idx])
    }

    /// Distinct municipality names, in first-seen order
    pub fn municipalities(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.airports
            .iter()
            .map(|a| a.municipality.as_str())
            .filter(|m| !m.is_empty() && seen.insert(m.to_lowercase()))
            .collect()
    }

    pub fn airports(&self) -> &[Airport] {
        &self.airports
    }

    pub fn len(&self) -> usize {
        self.airports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.airports.is_empty()
    }

    pub fn country_count(&self) -> usize {
        self.by_country.len()
    }

    pub fn stats(&self) -> LoadStats {
        self.stats
    }
}
