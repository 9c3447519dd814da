//! Error types and handling for the airport locator

use thiserror::Error;

/// Main error type for the airport locator
#[derive(Error, Debug)]
pub enum LocatorError {
    /// Airport dataset could not be read or held no usable rows
    #[error("Data load error: {message}")]
    DataLoad { message: String },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// API communication errors
    #[error("API error: {message}")]
    Api { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl LocatorError {
    /// Create a new data load error
    pub fn data_load<S: Into<String>>(message: S) -> Self {
        Self::DataLoad {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new API error
    pub fn api<S: Into<String>>(message: S) -> Self {
        Self::Api {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            LocatorError::DataLoad { message } => {
                format!("Unable to load the airport dataset: {message}")
            }
            LocatorError::Config { .. } => {
                "Configuration error. Please check your config file.".to_string()
            }
            LocatorError::Api { .. } => {
                "Unable to connect to external services. Please check your internet connection."
                    .to_string()
            }
            LocatorError::Validation { message } => format!("Invalid input: {message}"),
            LocatorError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}

impl From<csv::Error> for LocatorError {
    fn from(err: csv::Error) -> Self {
        LocatorError::data_load(err.to_string())
    }
}

/// Why a single query did not produce an airport.
///
/// These are reported to the user and never end the session.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryFailure {
    /// The input held no location-like entity
    #[error("no location found in input")]
    ExtractionEmpty,

    /// Every candidate was tried and none could be geocoded
    #[error("could not geocode any of: {}", attempted.join(", "))]
    GeocodeNotFound { attempted: Vec<String> },

    /// The geocoded country has no airport in the catalog
    #[error("no airports in country {country}")]
    NoAirportInCountry { country: String },
}

impl QueryFailure {
    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            QueryFailure::ExtractionEmpty => {
                "No location could be recognised in your input.".to_string()
            }
            QueryFailure::GeocodeNotFound { attempted } => {
                format!("Could not geocode the location: {}", attempted.join(", "))
            }
            QueryFailure::NoAirportInCountry { country } => {
                format!("No nearby airport found (no airports known in {country}).")
            }
        }
    }
}
