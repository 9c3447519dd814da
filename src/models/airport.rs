//! Airport reference model

use geo::Point;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An airport from the reference dataset
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Airport {
    /// Airport name
    pub name: String,
    /// Three-letter IATA code
    pub iata_code: Option<String>,
    /// City or town served by the airport
    pub municipality: String,
    /// Country code (ISO 3166-1 alpha-2, upper case)
    pub country_code: String,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl Airport {
    /// Position as a `geo` point (x = longitude, y = latitude)
    #[must_use]
    pub fn point(&self) -> Point<f64> {
        Point::new(self.longitude, self.latitude)
    }
}

/// Renders as `<name> (<IATA>) - <municipality>`
impl fmt::Display for Airport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) - {}",
            self.name,
            self.iata_code.as_deref().unwrap_or("n/a"),
            self.municipality
        )
    }
}
