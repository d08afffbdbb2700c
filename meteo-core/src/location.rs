use serde::Deserialize;

use crate::error::Error;
use crate::model::Location;
use crate::transport::Transport;

/// Open-Meteo geocoding search endpoint.
pub const GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";

/// Translates a place-name query into a [`Location`].
#[derive(Debug, Clone)]
pub struct LocationResolver {
    endpoint: String,
    transport: Transport,
}

impl LocationResolver {
    pub fn new(transport: Transport) -> Self {
        Self::with_endpoint(GEOCODING_URL, transport)
    }

    /// Point the resolver at a non-default endpoint, e.g. a self-hosted
    /// geocoding instance.
    pub fn with_endpoint(endpoint: impl Into<String>, transport: Transport) -> Self {
        Self { endpoint: endpoint.into(), transport }
    }

    /// Resolve a city name (optionally filtered by an ISO country code) to
    /// the single best geocoding match.
    ///
    /// Only the top match is requested; there is no disambiguation across
    /// candidates. An empty result set is `LocationNotFound`, which callers
    /// should treat as "try another spelling" rather than a fault.
    pub async fn resolve(&self, city: &str, country: &str) -> Result<Location, Error> {
        if city.trim().is_empty() {
            return Err(Error::LocationNotFound {
                city: city.to_string(),
                country: country.to_string(),
            });
        }

        let mut params: Vec<(&str, String)> = vec![
            ("name", city.to_string()),
            ("count", "1".to_string()),
            ("language", "en".to_string()),
            ("format", "json".to_string()),
        ];
        // Sent only when non-empty; an empty `country=` would filter out
        // every result.
        if !country.is_empty() {
            params.push(("country", country.to_string()));
        }

        let url = Transport::request_url(&self.endpoint, &params)?;
        let url_str = url.to_string();
        let body = self.transport.execute(url).await?;

        let parsed: GeocodingResponse =
            serde_json::from_str(&body).map_err(|err| Error::InvalidResponse {
                message: format!("geocoding payload rejected: {err}"),
                url: url_str,
            })?;

        let Some(top) = parsed.results.into_iter().next() else {
            return Err(Error::LocationNotFound {
                city: city.to_string(),
                country: country.to_string(),
            });
        };

        Ok(Location {
            latitude: top.latitude,
            longitude: top.longitude,
            name: top.name,
            country: top.country,
            timezone: top.timezone,
            elevation: top.elevation,
        })
    }
}

#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    /// Absent entirely when nothing matches; treated the same as empty.
    #[serde(default)]
    results: Vec<GeocodingResult>,
}

/// One geocoding candidate. Coordinates and name are required; their
/// absence is a provider contract violation and fails deserialization.
#[derive(Debug, Deserialize)]
struct GeocodingResult {
    latitude: f64,
    longitude: f64,
    name: String,
    #[serde(default)]
    country: String,
    #[serde(default)]
    timezone: String,
    #[serde(default)]
    elevation: f64,
}
