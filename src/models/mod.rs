//! Data models for the airport locator
//!
//! This module contains the core domain models organized by concern:
//! - Airport: Reference airports loaded from the dataset
//! - Location: Extracted candidates and geocoded points
//! - Query: Outcome of a single lookup

pub mod airport;
pub mod location;
pub mod query;

// Re-export all public types for convenient access
pub use airport::Airport;
pub use location::{EntityLabel, GeocodedPoint, LocationCandidate};
pub use query::{LocatedAirport, QueryResult};
