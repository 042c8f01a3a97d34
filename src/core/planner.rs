use serde::Serialize;
use thiserror::Error;

use crate::core::{
    center::CenterEstimator,
    distance::suggested_search_radius,
    ranking::{nearest_to, Ranker},
};
use crate::models::{
    Candidate, CenterPolicy, EstimatorConfig, GeoPoint, Participant, RadiusPolicy, RankedCandidate,
    RankingOptions, SearchArea,
};

/// Errors the planner reports instead of computing on bad input
#[derive(Debug, Error, PartialEq)]
pub enum PlanError {
    #[error("At least one participant is required")]
    NoParticipants,
}

/// Result of the planning process
#[derive(Debug, Clone, Serialize)]
pub struct MeetupPlan {
    pub center: GeoPoint,
    #[serde(rename = "searchRadiusM")]
    pub search_radius_m: f64,
    /// Every surviving venue, best first
    pub ranked: Vec<RankedCandidate>,
    /// The venues to show: top-k or the full list
    pub displayed: Vec<RankedCandidate>,
    /// Displayed venue closest to the center
    #[serde(rename = "nearestToCenter")]
    pub nearest_to_center: Option<RankedCandidate>,
    #[serde(rename = "totalCandidates")]
    pub total_candidates: usize,
    #[serde(rename = "rejectedCandidates")]
    pub rejected_candidates: usize,
}

/// Meetup orchestrator - combines center estimation, search radius, and ranking
///
/// # Pipeline Stages
/// 1. Center estimation (centroid or geometric median)
/// 2. Search radius from the group's spread
/// 3. Candidate filtering
/// 4. Ranking by total travel distance
#[derive(Debug, Clone, Copy, Default)]
pub struct MeetupPlanner {
    estimator: CenterEstimator,
    radius: RadiusPolicy,
    ranker: Ranker,
}

impl MeetupPlanner {
    pub fn new(estimator: EstimatorConfig, radius: RadiusPolicy, ranking: RankingOptions) -> Self {
        Self {
            estimator: CenterEstimator::new(estimator),
            radius,
            ranker: Ranker::new(ranking),
        }
    }

    /// Same planner with a different center policy
    pub fn with_policy(mut self, policy: CenterPolicy) -> Self {
        self.estimator = self.estimator.with_policy(policy);
        self
    }

    pub fn estimator(&self) -> &CenterEstimator {
        &self.estimator
    }

    pub fn ranker(&self) -> &Ranker {
        &self.ranker
    }

    /// Where to look for venues
    pub fn search_area(&self, participants: &[Participant]) -> Result<SearchArea, PlanError> {
        let points = locations(participants);

        let center = self
            .estimator
            .estimate(&points)
            .ok_or(PlanError::NoParticipants)?;
        let radius_m = suggested_search_radius(&points, &self.radius);

        Ok(SearchArea { center, radius_m })
    }

    /// Rank venues for the group
    ///
    /// # Arguments
    /// * `participants` - The group, at least one person
    /// * `candidates` - Raw venues, typically from the POI service
    /// * `show_all` - Display the full ranking instead of the top-k
    ///
    /// # Returns
    /// MeetupPlan with the center and ranked venues
    pub fn plan(
        &self,
        participants: &[Participant],
        candidates: Vec<Candidate>,
        show_all: bool,
    ) -> Result<MeetupPlan, PlanError> {
        let area = self.search_area(participants)?;
        let points = locations(participants);

        let result = self.ranker.rank(&points, candidates);
        let displayed = result.visible(show_all).to_vec();
        let nearest_to_center = nearest_to(&area.center, &displayed).cloned();
        let rejected_candidates = result.rejected();

        tracing::debug!(
            "Planned meetup at {:?}: {} ranked, {} rejected, {} displayed",
            area.center,
            result.ranked.len(),
            rejected_candidates,
            displayed.len()
        );

        Ok(MeetupPlan {
            center: area.center,
            search_radius_m: area.radius_m,
            ranked: result.ranked,
            displayed,
            nearest_to_center,
            total_candidates: result.total_candidates,
            rejected_candidates,
        })
    }
}

fn locations(participants: &[Participant]) -> Vec<GeoPoint> {
    participants.iter().map(|p| p.location).collect()
}
