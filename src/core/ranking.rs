use crate::core::{
    distance::haversine_distance,
    filters::{has_valid_address, within_individual_cap},
};
use crate::models::{Candidate, GeoPoint, RankedCandidate, RankingOptions};

/// Sum of distances from every participant to `location`, in meters
#[inline]
pub fn aggregate_distance(location: &GeoPoint, participants: &[GeoPoint]) -> f64 {
    participants
        .iter()
        .map(|p| haversine_distance(p, location))
        .sum()
}

/// Distance from the farthest participant to `location`, in meters
#[inline]
pub fn farthest_distance(location: &GeoPoint, participants: &[GeoPoint]) -> f64 {
    participants
        .iter()
        .map(|p| haversine_distance(p, location))
        .fold(0.0, f64::max)
}

/// The ranked venue nearest to `center`
///
/// Ties keep the later venue.
pub fn nearest_to<'a>(center: &GeoPoint, candidates: &'a [RankedCandidate]) -> Option<&'a RankedCandidate> {
    candidates.iter().rev().min_by(|a, b| {
        haversine_distance(center, &a.candidate.location)
            .total_cmp(&haversine_distance(center, &b.candidate.location))
    })
}

/// Outcome of a ranking pass
#[derive(Debug, Clone)]
pub struct RankedList {
    /// Surviving candidates, best first
    pub ranked: Vec<RankedCandidate>,
    /// Number of candidates before filtering
    pub total_candidates: usize,
    top_k: usize,
}

impl RankedList {
    /// Number of candidates dropped by the filters
    pub fn rejected(&self) -> usize {
        self.total_candidates - self.ranked.len()
    }

    /// The collapsed view: at most `top_k` best candidates
    pub fn top(&self) -> &[RankedCandidate] {
        &self.ranked[..self.top_k.min(self.ranked.len())]
    }

    /// Either the collapsed view or the full list
    pub fn visible(&self, show_all: bool) -> &[RankedCandidate] {
        if show_all {
            &self.ranked
        } else {
            self.top()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }
}

/// Filters candidate venues and orders them by total travel distance
#[derive(Debug, Clone, Copy, Default)]
pub struct Ranker {
    options: RankingOptions,
}

impl Ranker {
    pub fn new(options: RankingOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &RankingOptions {
        &self.options
    }

    /// Check a candidate against the enabled filters
    pub fn accepts(&self, candidate: &Candidate, participants: &[GeoPoint]) -> bool {
        if self.options.validate_address && !has_valid_address(candidate) {
            return false;
        }

        match self.options.max_individual_distance_m {
            Some(cap_m) => within_individual_cap(candidate, participants, cap_m),
            None => true,
        }
    }

    /// Filter, score, and sort candidates
    ///
    /// Sorting is stable, so candidates with equal totals keep their input
    /// order. An empty result is not an error.
    pub fn rank(&self, participants: &[GeoPoint], candidates: Vec<Candidate>) -> RankedList {
        let total_candidates = candidates.len();

        let mut ranked: Vec<RankedCandidate> = candidates
            .into_iter()
            .filter(|candidate| self.accepts(candidate, participants))
            .map(|candidate| {
                let total_distance_m = aggregate_distance(&candidate.location, participants);
                let max_distance_m = farthest_distance(&candidate.location, participants);

                RankedCandidate {
                    candidate,
                    total_distance_m,
                    max_distance_m,
                }
            })
            .collect();

        ranked.sort_by(|a, b| a.total_distance_m.total_cmp(&b.total_distance_m));

        tracing::debug!(
            "Ranked {} of {} candidates for {} participants",
            ranked.len(),
            total_candidates,
            participants.len()
        );

        RankedList {
            ranked,
            total_candidates,
            top_k: self.options.top_k,
        }
    }
}
