// Core algorithm exports
pub mod center;
pub mod distance;
pub mod filters;
pub mod planner;
pub mod ranking;

pub use center::{centroid, geometric_median, CenterEstimator};
pub use distance::{haversine_distance, max_pairwise_distance, planar_distance, suggested_search_radius};
pub use filters::{has_valid_address, is_placeholder_address, looks_like_address, within_individual_cap};
pub use planner::{MeetupPlan, MeetupPlanner, PlanError};
pub use ranking::{aggregate_distance, farthest_distance, nearest_to, RankedList, Ranker};
