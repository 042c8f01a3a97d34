use geo::{Centroid, MultiPoint};

use crate::core::distance::planar_distance;
use crate::models::{CenterPolicy, EstimatorConfig, GeoPoint};

/// Arithmetic mean of the latitudes and longitudes
///
/// Returns `None` for an empty slice.
pub fn centroid(points: &[GeoPoint]) -> Option<GeoPoint> {
    let multi_point: MultiPoint<f64> = points.iter().copied().collect();
    multi_point.centroid().map(GeoPoint::from)
}

/// Approximate the geometric median with a fixed number of Weiszfeld steps
///
/// Starts at the centroid and repeatedly re-weights every point by the
/// reciprocal of its planar distance to the current estimate. A zero distance
/// is replaced by `distance_floor`. A single point is returned as-is.
///
/// Returns `None` for an empty slice.
pub fn geometric_median(points: &[GeoPoint], iterations: usize, distance_floor: f64) -> Option<GeoPoint> {
    if let [only] = points {
        return Some(*only);
    }

    let mut estimate = centroid(points)?;

    for _ in 0..iterations {
        let mut weighted_lat = 0.0;
        let mut weighted_lon = 0.0;
        let mut total_weight = 0.0;

        for point in points {
            let distance = planar_distance(&estimate, point);
            let distance = if distance > 0.0 { distance } else { distance_floor };

            weighted_lat += point.latitude / distance;
            weighted_lon += point.longitude / distance;
            total_weight += 1.0 / distance;
        }

        estimate = GeoPoint::new(weighted_lat / total_weight, weighted_lon / total_weight);
    }

    Some(estimate)
}

/// Computes a single meeting target from the participants' locations
#[derive(Debug, Clone, Copy, Default)]
pub struct CenterEstimator {
    config: EstimatorConfig,
}

impl CenterEstimator {
    pub fn new(config: EstimatorConfig) -> Self {
        Self { config }
    }

    /// Same tuning, different policy
    pub fn with_policy(mut self, policy: CenterPolicy) -> Self {
        self.config.policy = policy;
        self
    }

    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    /// Estimate the center, or `None` when there are no points
    pub fn estimate(&self, points: &[GeoPoint]) -> Option<GeoPoint> {
        let center = match self.config.policy {
            CenterPolicy::Centroid => centroid(points),
            CenterPolicy::GeometricMedian => {
                geometric_median(points, self.config.iterations, self.config.distance_floor)
            }
        };

        tracing::trace!(
            "Estimated center {:?} from {} points ({:?})",
            center,
            points.len(),
            self.config.policy
        );

        center
    }
}
