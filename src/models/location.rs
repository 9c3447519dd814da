//! Location models: extracted candidates and geocoded points

use geo::Point;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Entity category assigned by the extractor
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntityLabel {
    /// Geo-political entity: city, state, country
    Gpe,
    /// Non-political location: river, mountain, region
    Loc,
    /// Facility: airport, station, mall, stadium
    Fac,
    /// Organisation or unclassified proper noun
    Org,
}

impl EntityLabel {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityLabel::Gpe => "GPE",
            EntityLabel::Loc => "LOC",
            EntityLabel::Fac => "FAC",
            EntityLabel::Org => "ORG",
        }
    }
}

impl fmt::Display for EntityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GPE" => Ok(EntityLabel::Gpe),
            "LOC" => Ok(EntityLabel::Loc),
            "FAC" => Ok(EntityLabel::Fac),
            "ORG" => Ok(EntityLabel::Org),
            other => Err(format!("unknown entity label: {other}")),
        }
    }
}

/// A span of input text that may name a place
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LocationCandidate {
    /// Span text as it appears in the input
    pub text: String,
    /// Entity category
    pub label: EntityLabel,
    /// Byte offset of the span in the input
    pub offset: usize,
}

impl LocationCandidate {
    #[must_use]
    pub fn new(text: impl Into<String>, label: EntityLabel, offset: usize) -> Self {
        Self {
            text: text.into(),
            label,
            offset,
        }
    }

    /// Case-folded, whitespace-collapsed text used for deduplication
    #[must_use]
    pub fn normalized(&self) -> String {
        normalize(&self.text)
    }
}

/// Lower-case and collapse runs of whitespace
#[must_use]
pub fn normalize(text: &str) -> String {
    text.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Coordinates and country returned by the geocoder
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct GeocodedPoint {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Country code (ISO 3166-1 alpha-2, upper case)
    pub country_code: String,
    /// Display name reported by the service
    pub display_name: Option<String>,
}

impl GeocodedPoint {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64, country_code: impl Into<String>) -> Self {
        Self {
            latitude,
            longitude,
            country_code: country_code.into().to_ascii_uppercase(),
            display_name: None,
        }
    }

    /// Position as a `geo` point (x = longitude, y = latitude)
    #[must_use]
    pub fn point(&self) -> Point<f64> {
        Point::new(self.longitude, self.latitude)
    }

    /// Format location as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}
