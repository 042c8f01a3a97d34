use reqwest::{header::USER_AGENT, Client};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::models::GeoPoint;

/// Errors that can occur when geocoding addresses
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// A resolved address
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeocodedAddress {
    #[serde(flatten)]
    pub location: GeoPoint,
    #[serde(rename = "displayName")]
    pub display_name: String,
}

/// Nominatim returns coordinates as strings
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: String,
}

impl TryFrom<NominatimPlace> for GeocodedAddress {
    type Error = GeocodeError;

    fn try_from(place: NominatimPlace) -> Result<Self, Self::Error> {
        let latitude = place
            .lat
            .parse::<f64>()
            .map_err(|e| GeocodeError::InvalidResponse(format!("Bad latitude {:?}: {}", place.lat, e)))?;
        let longitude = place
            .lon
            .parse::<f64>()
            .map_err(|e| GeocodeError::InvalidResponse(format!("Bad longitude {:?}: {}", place.lon, e)))?;

        Ok(GeocodedAddress {
            location: GeoPoint::new(latitude, longitude),
            display_name: place.display_name,
        })
    }
}

/// Nominatim geocoding client
///
/// Handles:
/// - Resolving a free-text address to a single location
/// - Listing suggestions for partial input
pub struct NominatimClient {
    base_url: String,
    user_agent: String,
    client: Client,
}

impl NominatimClient {
    /// Create a new Nominatim client
    pub fn new(base_url: String, user_agent: String, timeout: Duration) -> Result<Self, GeocodeError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url,
            user_agent,
            client,
        })
    }

    /// Resolve an address to its best match
    ///
    /// Blank input and addresses Nominatim does not know give `Ok(None)`.
    pub async fn geocode(&self, address: &str) -> Result<Option<GeocodedAddress>, GeocodeError> {
        Ok(self.search(address, 1).await?.into_iter().next())
    }

    /// List up to `limit` matches for partial input
    pub async fn suggest(&self, partial: &str, limit: usize) -> Result<Vec<GeocodedAddress>, GeocodeError> {
        self.search(partial, limit).await
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<GeocodedAddress>, GeocodeError> {
        let query = query.trim();
        if query.is_empty() || limit == 0 {
            return Ok(vec![]);
        }

        let url = format!(
            "{}/search?q={}&format=json&limit={}",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(query),
            limit
        );

        tracing::debug!("Geocoding via: {}", url);

        let response = self
            .client
            .get(&url)
            .header(USER_AGENT, &self.user_agent)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GeocodeError::ApiError(format!(
                "Geocoding failed: {}",
                response.status()
            )));
        }

        let places: Vec<NominatimPlace> = response
            .json()
            .await
            .map_err(|e| GeocodeError::InvalidResponse(format!("Failed to parse places: {}", e)))?;

        places.into_iter().map(GeocodedAddress::try_from).collect()
    }
}
