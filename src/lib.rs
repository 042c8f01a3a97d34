//! Meetup Finder - meeting point estimation and venue ranking
//!
//! This library picks a fair meeting point for a small group and ranks nearby
//! venues by how far everyone has to travel. The geocoding and
//! points-of-interest lookups live in `services`; everything in `core` is pure.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use self::core::{haversine_distance, CenterEstimator, MeetupPlan, MeetupPlanner, PlanError, Ranker};
pub use models::{Candidate, CenterPolicy, GeoPoint, Participant, RankedCandidate, RankingOptions, VenueCategory};
