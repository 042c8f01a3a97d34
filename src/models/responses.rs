use serde::{Deserialize, Serialize};

use crate::core::MeetupPlan;
use crate::models::domain::{CenterPolicy, GeoPoint, Participant, RankedCandidate};
use crate::services::GeocodedAddress;

/// Response for the center endpoint
#[derive(Debug, Clone, Serialize)]
pub struct CenterResponse {
    pub center: GeoPoint,
    #[serde(rename = "searchRadiusM")]
    pub search_radius_m: f64,
    pub policy: CenterPolicy,
}

/// Response for the rank and plan endpoints
#[derive(Debug, Clone, Serialize)]
pub struct PlanResponse {
    pub participants: Vec<Participant>,
    pub center: GeoPoint,
    #[serde(rename = "searchRadiusM")]
    pub search_radius_m: f64,
    pub places: Vec<RankedCandidate>,
    #[serde(rename = "nearestPlace")]
    pub nearest_place: Option<RankedCandidate>,
    #[serde(rename = "totalResults")]
    pub total_results: usize,
    #[serde(rename = "totalCandidates")]
    pub total_candidates: usize,
    #[serde(rename = "rejectedCandidates")]
    pub rejected_candidates: usize,
    #[serde(rename = "showingAll")]
    pub showing_all: bool,
}

impl PlanResponse {
    pub fn new(participants: Vec<Participant>, plan: MeetupPlan, showing_all: bool) -> Self {
        Self {
            participants,
            center: plan.center,
            search_radius_m: plan.search_radius_m,
            total_results: plan.ranked.len(),
            places: plan.displayed,
            nearest_place: plan.nearest_to_center,
            total_candidates: plan.total_candidates,
            rejected_candidates: plan.rejected_candidates,
            showing_all,
        }
    }
}

/// Response for the suggestion endpoint
#[derive(Debug, Clone, Serialize)]
pub struct SuggestionsResponse {
    pub query: String,
    pub suggestions: Vec<GeocodedAddress>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
