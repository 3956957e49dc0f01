//! Lookup orchestration.
//!
//! [`CountryFinder::locate_and_lookup`] turns the caller's position into a
//! country code and hands over to
//! [`CountryFinder::lookup_country_and_neighbour`], which renders the country
//! and one of its neighbours. Both catch every failure of their own chain
//! exactly once and render it; neither returns an error.
//!
//! Only the neighbour fetch is time-bounded. The primary fetch, the
//! geolocation request and the reverse geocode can wait indefinitely.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, instrument, warn};

use crate::error::LookupError;
use crate::fetch::{DataFetcher, ReqwestTransport, Transport};
use crate::geolocation::GeolocationProvider;
use crate::model::{ApiCountry, CountryRecord, RenderRole, ReverseGeocode};
use crate::render::{DisplaySurface, render_country, render_error};
use crate::timeout::race_timeout;

/// Base URL for the REST Countries API.
pub const DEFAULT_COUNTRIES_URL: &str = "https://restcountries.com/v3.1";

/// Reverse geocoding endpoint.
pub const DEFAULT_GEOCODE_URL: &str = "https://api.bigdatacloud.net/data/reverse-geocode-client";

/// How long the neighbour fetch may take before it is abandoned.
pub const DEFAULT_NEIGHBOUR_TIMEOUT: Duration = Duration::from_secs(10);

const COUNTRY_NOT_FOUND: &str = "Country not found";
const LOCATION_PROBLEM: &str = "Problem getting location data";

/// Finder configuration.
#[derive(Debug, Clone)]
pub struct FinderConfig {
    /// Base URL of the country API (`/name/{name}` and `/alpha/{code}` are appended).
    pub countries_base_url: String,

    /// Reverse geocoding endpoint; coordinates are passed as query parameters.
    pub geocode_base_url: String,

    /// Limit for the neighbour fetch.
    pub neighbour_timeout: Duration,

    /// Language requested from the reverse geocoder.
    pub locality_language: String,
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            countries_base_url: DEFAULT_COUNTRIES_URL.to_string(),
            geocode_base_url: DEFAULT_GEOCODE_URL.to_string(),
            neighbour_timeout: DEFAULT_NEIGHBOUR_TIMEOUT,
            locality_language: "en".to_string(),
        }
    }
}

/// Finds countries and renders them onto a display surface.
#[derive(Clone)]
pub struct CountryFinder<T = ReqwestTransport> {
    fetcher: DataFetcher<T>,
    config: Arc<FinderConfig>,
}

impl CountryFinder<ReqwestTransport> {
    /// Create a finder that talks to the network through `reqwest`.
    pub fn new(config: FinderConfig) -> Self {
        Self::with_transport(ReqwestTransport::new(), config)
    }
}

impl<T: Transport> CountryFinder<T> {
    pub fn with_transport(transport: T, config: FinderConfig) -> Self {
        Self {
            fetcher: DataFetcher::new(transport),
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &FinderConfig {
        &self.config
    }

    /// Render `country` and its first neighbour onto `surface`.
    ///
    /// The primary country is rendered as soon as it arrives. The neighbour
    /// fetch is raced against the configured timeout. Any failure is rendered
    /// as a single error message. The surface is made visible again on every
    /// path, exactly once, as the last step.
    #[instrument(skip(self, surface))]
    pub async fn lookup_country_and_neighbour<S: DisplaySurface>(
        &self,
        country: &str,
        surface: &mut S,
    ) {
        match self.render_country_and_neighbour(country, surface).await {
            Ok(neighbour) => info!(neighbour = %neighbour, "Country and neighbour rendered"),
            Err(err) => {
                warn!(error = %err, "Country lookup failed");
                render_error(surface, &format!("Something went wrong: {err}. Try again!"));
            }
        }

        surface.set_visible(true);
        debug!("Display surface restored");
    }

    /// Locate the caller, resolve their country and render it with a neighbour.
    ///
    /// Failures before the hand-over are rendered with an alert marker and
    /// leave the surface's visibility untouched.
    #[instrument(skip(self, geolocation, surface))]
    pub async fn locate_and_lookup<G, S>(&self, geolocation: &G, surface: &mut S)
    where
        G: GeolocationProvider,
        S: DisplaySurface,
    {
        if let Err(err) = self.locate(geolocation, surface).await {
            warn!(error = ?err, "Location lookup failed");
            render_error(surface, &format!("💥💥💥 {err}"));
        }
    }

    async fn locate<G, S>(&self, geolocation: &G, surface: &mut S) -> Result<(), LookupError>
    where
        G: GeolocationProvider,
        S: DisplaySurface,
    {
        let position = geolocation.current_position().await?;
        debug!(
            latitude = position.latitude,
            longitude = position.longitude,
            "Position acquired"
        );

        let url = format!(
            "{}?latitude={}&longitude={}&localityLanguage={}",
            self.config.geocode_base_url,
            position.latitude,
            position.longitude,
            urlencoding::encode(&self.config.locality_language)
        );
        let place: ReverseGeocode = self
            .fetcher
            .fetch_json(&url, LOCATION_PROBLEM)
            .await
            .map_err(|err| match err {
                LookupError::Status { status, .. } => LookupError::GeoLookup { status },
                other => other,
            })?;

        let country_code = place
            .country_code
            .filter(|code| !code.is_empty())
            .ok_or(LookupError::MissingCountryCode)?;
        info!(
            country_code = %country_code,
            country = place.country_name.as_deref().unwrap_or("unknown"),
            city = place.city.as_deref().unwrap_or("unknown"),
            "Position resolved"
        );

        self.lookup_country_and_neighbour(&country_code, surface).await;
        Ok(())
    }

    /// Returns the neighbour's name on success.
    async fn render_country_and_neighbour<S: DisplaySurface>(
        &self,
        country: &str,
        surface: &mut S,
    ) -> Result<String, LookupError> {
        let url = format!(
            "{}/name/{}",
            self.config.countries_base_url,
            urlencoding::encode(country)
        );
        let primary = self
            .fetch_countries(&url)
            .await?
            .ok_or(LookupError::NotFound)?;
        debug!(country = %primary.common_name, "Primary country fetched");

        render_country(surface, &primary, RenderRole::Primary);

        let border = primary.first_border().ok_or(LookupError::NoNeighbour)?;
        let url = format!(
            "{}/alpha/{}",
            self.config.countries_base_url,
            urlencoding::encode(border)
        );

        let neighbour = race_timeout(self.fetch_countries(&url), self.config.neighbour_timeout)
            .await
            .map_err(|err| match err {
                LookupError::Timeout { .. } => LookupError::NeighbourTimedOut,
                other => other,
            })?
            // An empty answer is reported the same way as a timeout.
            .ok_or(LookupError::NeighbourTimedOut)?;

        render_country(surface, &neighbour, RenderRole::Neighbour);
        Ok(neighbour.common_name)
    }

    /// Fetch a country list and keep its first element.
    async fn fetch_countries(&self, url: &str) -> Result<Option<CountryRecord>, LookupError> {
        let countries: Vec<ApiCountry> = self.fetcher.fetch_json(url, COUNTRY_NOT_FOUND).await?;
        Ok(countries.into_iter().next().map(CountryRecord::from))
    }
}
