//! Geolocation providers.
//!
//! The lookup pipeline never reads a position itself; it asks a
//! [`GeolocationProvider`]. In the served page the browser acquires the fix
//! and reports it (or the browser's error) with the request, which is what
//! [`ReportedPosition`] models.

use std::future::Future;

use serde::Deserialize;
use thiserror::Error;

use crate::model::Coordinates;

/// Why a position could not be obtained.
///
/// Mirrors the three failure codes a browser geolocation API reports.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeolocationError {
    /// The user refused to share their position.
    #[error("User denied Geolocation")]
    PermissionDenied,

    /// No position could be determined.
    #[error("{0}")]
    PositionUnavailable(String),

    /// The provider gave up waiting for a fix.
    #[error("Timeout expired")]
    Timeout,
}

impl GeolocationError {
    /// Build an error from a browser error code and optional message.
    ///
    /// Codes: 1 = permission denied, 2 = position unavailable, 3 = timeout.
    /// Unknown codes are treated as an unavailable position.
    pub fn from_code(code: u16, message: Option<&str>) -> Self {
        match code {
            1 => GeolocationError::PermissionDenied,
            3 => GeolocationError::Timeout,
            _ => GeolocationError::PositionUnavailable(
                message
                    .filter(|m| !m.is_empty())
                    .unwrap_or("Position unavailable")
                    .to_string(),
            ),
        }
    }
}

/// Source of the caller's current position.
pub trait GeolocationProvider: Send + Sync {
    /// Suspend until a fix is available or the provider fails.
    fn current_position(
        &self,
    ) -> impl Future<Output = Result<Coordinates, GeolocationError>> + Send;
}

/// A position (or failure) already acquired by the caller.
#[derive(Debug, Clone)]
pub struct ReportedPosition {
    outcome: Result<Coordinates, GeolocationError>,
}

impl ReportedPosition {
    pub fn found(coordinates: Coordinates) -> Self {
        Self {
            outcome: Ok(coordinates),
        }
    }

    pub fn failed(error: GeolocationError) -> Self {
        Self {
            outcome: Err(error),
        }
    }
}

impl GeolocationProvider for ReportedPosition {
    async fn current_position(&self) -> Result<Coordinates, GeolocationError> {
        self.outcome.clone()
    }
}

/// Query parameters carrying a browser-acquired position.
///
/// Either `lat` and `lng` are present, or `error` holds the browser's
/// geolocation error code (with an optional `message`).
#[derive(Debug, Default, Deserialize)]
pub struct PositionQuery {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub error: Option<u16>,
    pub message: Option<String>,
}

impl From<PositionQuery> for ReportedPosition {
    fn from(query: PositionQuery) -> Self {
        if let Some(code) = query.error {
            return ReportedPosition::failed(GeolocationError::from_code(
                code,
                query.message.as_deref(),
            ));
        }

        match (query.lat, query.lng) {
            (Some(latitude), Some(longitude)) => ReportedPosition::found(Coordinates {
                latitude,
                longitude,
            }),
            _ => ReportedPosition::failed(GeolocationError::PositionUnavailable(
                "No position reported".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_from_browser_codes() {
        assert_eq!(
            GeolocationError::from_code(1, None),
            GeolocationError::PermissionDenied
        );
        assert_eq!(GeolocationError::from_code(3, None), GeolocationError::Timeout);
        assert_eq!(
            GeolocationError::from_code(2, Some("no satellites")),
            GeolocationError::PositionUnavailable("no satellites".to_string())
        );
        assert_eq!(
            GeolocationError::from_code(42, Some("")).to_string(),
            "Position unavailable"
        );
    }

    #[tokio::test]
    async fn test_query_with_coordinates() {
        let provider = ReportedPosition::from(PositionQuery {
            lat: Some(38.7),
            lng: Some(-9.1),
            ..Default::default()
        });

        let coords = provider.current_position().await.unwrap();
        assert_eq!(coords.latitude, 38.7);
        assert_eq!(coords.longitude, -9.1);
    }

    #[tokio::test]
    async fn test_query_error_wins_over_coordinates() {
        let provider = ReportedPosition::from(PositionQuery {
            lat: Some(1.0),
            lng: Some(2.0),
            error: Some(1),
            message: None,
        });

        assert_eq!(
            provider.current_position().await,
            Err(GeolocationError::PermissionDenied)
        );
    }

    #[tokio::test]
    async fn test_query_missing_longitude() {
        let provider = ReportedPosition::from(PositionQuery {
            lat: Some(1.0),
            ..Default::default()
        });

        assert!(matches!(
            provider.current_position().await,
            Err(GeolocationError::PositionUnavailable(_))
        ));
    }
}
