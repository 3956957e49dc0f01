//! Data models for whereami.
//!
//! Every value here is request-scoped: it is produced during one lookup,
//! consumed by the renderer, and dropped. Nothing is cached or persisted.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A latitude/longitude pair from the geolocation provider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Lookup key for the country API: an alpha code ("PRT") or a free-text name ("portugal").
pub type CountryCode = String;

/// Which visual role a rendered country plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderRole {
    /// The country that was looked up.
    #[default]
    Primary,
    /// A bordering country shown next to the primary one.
    Neighbour,
}

impl RenderRole {
    /// Extra CSS class applied to the rendered fragment, if any.
    pub fn css_class(&self) -> Option<&'static str> {
        match self {
            RenderRole::Primary => None,
            RenderRole::Neighbour => Some("neighbour"),
        }
    }
}

/// The public attributes of one country, ready for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryRecord {
    pub common_name: String,
    pub region: String,
    pub population_count: u64,
    pub flag_image_url: String,
    pub language_names: Vec<String>,
    pub currency_names: Vec<String>,
    /// May be empty (island nations); no neighbour lookup happens then.
    pub border_codes: Vec<CountryCode>,
}

impl CountryRecord {
    /// First bordering country, if any.
    pub fn first_border(&self) -> Option<&str> {
        self.border_codes.first().map(String::as_str)
    }
}

// ============================================================================
// Wire types
// ============================================================================

/// One element of a country API response (`/name/{name}` or `/alpha/{code}`).
#[derive(Debug, Clone, Deserialize)]
pub struct ApiCountry {
    pub name: ApiCountryName,

    #[serde(default)]
    pub region: String,

    #[serde(default)]
    pub population: u64,

    pub flags: ApiFlags,

    /// Language code to language name, e.g. `"por": "Portuguese"`.
    #[serde(default)]
    pub languages: BTreeMap<String, String>,

    /// Currency code to currency details.
    #[serde(default)]
    pub currencies: BTreeMap<String, ApiCurrency>,

    #[serde(default)]
    pub borders: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiCountryName {
    pub common: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiFlags {
    pub svg: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiCurrency {
    #[serde(default)]
    pub name: Option<String>,
}

impl From<ApiCountry> for CountryRecord {
    fn from(api: ApiCountry) -> Self {
        let currency_names = api
            .currencies
            .into_iter()
            .map(|(code, currency)| currency.name.unwrap_or(code))
            .collect();

        Self {
            common_name: api.name.common,
            region: api.region,
            population_count: api.population,
            flag_image_url: api.flags.svg,
            language_names: api.languages.into_values().collect(),
            currency_names,
            border_codes: api.borders,
        }
    }
}

/// Response from the reverse geocoding endpoint.
///
/// Only `countryCode` is needed; the rest is kept for logging.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReverseGeocode {
    #[serde(default, rename = "countryCode")]
    pub country_code: Option<String>,

    #[serde(default, rename = "countryName")]
    pub country_name: Option<String>,

    #[serde(default)]
    pub city: Option<String>,
}

// ============================================================================
// HTTP types
// ============================================================================

/// Body returned by the lookup endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupResponse {
    /// When the surface was rendered.
    pub rendered_at: DateTime<Utc>,

    /// Whether the display surface ended up visible (loading state cleared).
    pub visible: bool,

    /// Rendered markup of the display surface.
    pub html: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn portugal_json() -> serde_json::Value {
        serde_json::json!({
            "name": { "common": "Portugal", "official": "Portuguese Republic" },
            "region": "Europe",
            "population": 10300000,
            "flags": { "png": "https://flagcdn.com/w320/pt.png", "svg": "https://flagcdn.com/pt.svg" },
            "languages": { "por": "Portuguese" },
            "currencies": { "EUR": { "name": "Euro", "symbol": "€" } },
            "borders": ["ESP"]
        })
    }

    #[test]
    fn test_decode_country_record() {
        let api: ApiCountry = serde_json::from_value(portugal_json()).unwrap();
        let record = CountryRecord::from(api);

        assert_eq!(record.common_name, "Portugal");
        assert_eq!(record.region, "Europe");
        assert_eq!(record.population_count, 10_300_000);
        assert_eq!(record.flag_image_url, "https://flagcdn.com/pt.svg");
        assert_eq!(record.language_names, vec!["Portuguese"]);
        assert_eq!(record.currency_names, vec!["Euro"]);
        assert_eq!(record.first_border(), Some("ESP"));
    }

    #[test]
    fn test_missing_borders_decode_as_empty() {
        let mut json = portugal_json();
        json.as_object_mut().unwrap().remove("borders");

        let record = CountryRecord::from(serde_json::from_value::<ApiCountry>(json).unwrap());

        assert!(record.border_codes.is_empty());
        assert_eq!(record.first_border(), None);
    }

    #[test]
    fn test_currency_without_name_falls_back_to_code() {
        let mut json = portugal_json();
        json["currencies"] = serde_json::json!({ "XTS": {} });

        let record = CountryRecord::from(serde_json::from_value::<ApiCountry>(json).unwrap());

        assert_eq!(record.currency_names, vec!["XTS"]);
    }

    #[test]
    fn test_render_role_classes() {
        assert_eq!(RenderRole::default(), RenderRole::Primary);
        assert_eq!(RenderRole::Primary.css_class(), None);
        assert_eq!(RenderRole::Neighbour.css_class(), Some("neighbour"));
    }

    #[test]
    fn test_reverse_geocode_decode() {
        let geo: ReverseGeocode = serde_json::from_value(serde_json::json!({
            "latitude": 38.7,
            "longitude": -9.1,
            "countryCode": "PT",
            "countryName": "Portugal",
            "city": "Lisbon"
        }))
        .unwrap();

        assert_eq!(geo.country_code.as_deref(), Some("PT"));
        assert_eq!(geo.city.as_deref(), Some("Lisbon"));
    }
}
