use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::domain::{Candidate, CenterPolicy, GeoPoint, Participant, VenueCategory};

/// Request to estimate the group's center
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CenterRequest {
    #[validate(length(min = 1))]
    pub participants: Vec<Participant>,
    #[serde(default)]
    pub policy: Option<CenterPolicy>,
}

/// Request to rank venues the caller already has
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RankRequest {
    #[validate(length(min = 1))]
    pub participants: Vec<Participant>,
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    #[serde(alias = "show_all", rename = "showAll")]
    pub show_all: bool,
    #[serde(default)]
    pub policy: Option<CenterPolicy>,
}

/// A participant given either by address or by coordinates
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParticipantInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default, alias = "lat")]
    pub latitude: Option<f64>,
    #[serde(default, alias = "lng", alias = "lon")]
    pub longitude: Option<f64>,
}

impl ParticipantInput {
    /// Explicit coordinates, when both are present
    pub fn coordinates(&self) -> Option<GeoPoint> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(GeoPoint::new(latitude, longitude)),
            _ => None,
        }
    }

    /// Non-blank address text
    pub fn address_query(&self) -> Option<&str> {
        self.address
            .as_deref()
            .map(str::trim)
            .filter(|address| !address.is_empty())
    }
}

/// Request to geocode the group, search venues, and rank them
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PlanRequest {
    #[validate(length(min = 1))]
    pub participants: Vec<ParticipantInput>,
    #[serde(default)]
    pub category: VenueCategory,
    #[serde(default)]
    #[serde(alias = "show_all", rename = "showAll")]
    pub show_all: bool,
    #[serde(default)]
    pub policy: Option<CenterPolicy>,
}

/// Geocoding query parameters
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct GeocodeQuery {
    #[validate(length(min = 1))]
    pub q: String,
    #[serde(default)]
    #[validate(range(min = 1, max = 20))]
    pub limit: Option<u8>,
}
