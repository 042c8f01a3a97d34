// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    label_participants, Candidate, CenterPolicy, EstimatorConfig, GeoPoint, Participant, RadiusPolicy,
    RankedCandidate, RankingOptions, SearchArea, VenueCategory,
};
pub use requests::{CenterRequest, GeocodeQuery, ParticipantInput, PlanRequest, RankRequest};
pub use responses::{CenterResponse, ErrorResponse, HealthResponse, PlanResponse, SuggestionsResponse};
