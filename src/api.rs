//! HTTP API handlers for whereami.
//!
//! Each request renders onto its own fresh [`HtmlSurface`]; nothing is
//! shared between requests and nothing is cached.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::get,
};
use tower_http::trace::TraceLayer;
use tracing::{info, instrument};

use crate::finder::CountryFinder;
use crate::geolocation::{PositionQuery, ReportedPosition};
use crate::model::LookupResponse;
use crate::render::HtmlSurface;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub finder: CountryFinder,
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/whereami", get(get_whereami))
        .route("/country/:name", get(get_country))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET / - The page with the "Where am I?" button.
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// GET /whereami - Resolve a browser-reported position and render the country.
///
/// # Query Parameters
///
/// - `lat`, `lng`: the position acquired by the browser
/// - `error` (optional): browser geolocation error code (1, 2 or 3) instead of a position
/// - `message` (optional): browser error message accompanying `error`
///
/// # Response
///
/// ```json
/// {
///     "rendered_at": "2024-01-15T10:30:00Z",
///     "visible": true,
///     "html": "<div class=\"countries\" style=\"opacity: 1\">...</div>"
/// }
/// ```
///
/// Lookup failures are part of the rendered markup, so this always answers 200.
#[instrument(skip(state, query))]
pub async fn get_whereami(
    State(state): State<AppState>,
    Query(query): Query<PositionQuery>,
) -> Json<LookupResponse> {
    let geolocation = ReportedPosition::from(query);
    let mut surface = HtmlSurface::new();

    state
        .finder
        .locate_and_lookup(&geolocation, &mut surface)
        .await;

    info!(visible = surface.is_visible(), "Location lookup served");
    Json(surface.into())
}

/// GET /country/:name - Render a named country and one of its neighbours.
#[instrument(skip(state))]
pub async fn get_country(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Json<LookupResponse> {
    let mut surface = HtmlSurface::new();

    state
        .finder
        .lookup_country_and_neighbour(&name, &mut surface)
        .await;

    info!(country = %name, "Country lookup served");
    Json(surface.into())
}

/// GET /health - Simple health check endpoint.
pub async fn health_check() -> impl IntoResponse {
    StatusCode::OK
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="UTF-8" />
    <title>Where am I?</title>
    <style>
      .countries { display: flex; gap: 2rem; transition: opacity 1s; }
      .country { width: 20rem; border-radius: 0.7rem; box-shadow: 0 2rem 5rem 1rem rgba(0, 0, 0, 0.1); }
      .neighbour { transform: scale(0.8) translateY(1rem); }
      .country__img { width: 100%; }
      .country__data { padding: 1rem 2rem; }
    </style>
  </head>
  <body>
    <button class="btn-country">Where am I?</button>
    <div class="result"></div>
    <script>
      const result = document.querySelector('.result');
      const show = async url => {
        const res = await fetch(url);
        const data = await res.json();
        result.insertAdjacentHTML('beforeend', data.html);
      };
      document.querySelector('.btn-country').addEventListener('click', () => {
        navigator.geolocation.getCurrentPosition(
          pos => show(`/whereami?lat=${pos.coords.latitude}&lng=${pos.coords.longitude}`),
          err => show(`/whereami?error=${err.code}&message=${encodeURIComponent(err.message)}`)
        );
      });
    </script>
  </body>
</html>
"#;

#[cfg(test)]
mod tests {
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use tower::ServiceExt;

    use super::*;
    use crate::finder::FinderConfig;

    fn app() -> Router {
        // Nothing in these tests reaches the upstream APIs.
        let config = FinderConfig {
            countries_base_url: "http://127.0.0.1:1".to_string(),
            geocode_base_url: "http://127.0.0.1:1/reverse".to_string(),
            ..Default::default()
        };
        router(AppState {
            finder: CountryFinder::new(config),
        })
    }

    #[tokio::test]
    async fn test_health_check() {
        let response = app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_whereami_without_position() {
        let response = app()
            .oneshot(Request::get("/whereami").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: LookupResponse = serde_json::from_slice(&bytes).unwrap();
        assert!(!body.visible);
        assert!(body.html.contains("💥💥💥 No position reported"));
    }
}
