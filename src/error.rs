//! Error taxonomy for the lookup pipeline.
//!
//! The `Display` output of every variant is the text shown to the user, so
//! messages are phrased for people rather than for logs.

use std::time::Duration;

use thiserror::Error;

use crate::geolocation::GeolocationError;

/// Everything that can end a lookup early.
///
/// All variants are terminal for the current invocation; nothing is retried.
#[derive(Debug, Error)]
pub enum LookupError {
    /// The remote API answered with a non-2xx status.
    #[error("{message} ({status})")]
    Status { message: String, status: u16 },

    /// The request never completed (DNS failure, connection refused, offline).
    #[error("{0}")]
    Network(String),

    /// The response body was not the JSON shape we expected.
    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The country API answered successfully but with no matching record.
    #[error("Country not found")]
    NotFound,

    /// The primary country has no land borders.
    #[error("No neighbour found!")]
    NoNeighbour,

    /// The timeout guard fired.
    #[error("Request took too long! ({after:?})")]
    Timeout { after: Duration },

    /// The neighbour fetch lost the race or came back empty.
    #[error("Request for neighbouring country timed out!")]
    NeighbourTimedOut,

    /// The geolocation provider refused or failed; passed through as-is.
    #[error(transparent)]
    Geolocation(#[from] GeolocationError),

    /// The reverse geocoder answered with a non-2xx status.
    #[error("Problem getting location data")]
    GeoLookup { status: u16 },

    /// The reverse geocoder did not resolve the position to a country.
    #[error("Problem getting location data")]
    MissingCountryCode,
}

impl From<reqwest::Error> for LookupError {
    fn from(err: reqwest::Error) -> Self {
        LookupError::Network(err.to_string())
    }
}
