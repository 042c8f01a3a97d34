use crate::models::{GeoPoint, RadiusPolicy};

/// Mean Earth radius in meters
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Calculate the Haversine distance between two points in meters
///
/// # Arguments
/// * `a` - First point in degrees
/// * `b` - Second point in degrees
///
/// # Returns
/// Great-circle distance in meters
#[inline]
pub fn haversine_distance(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let lat1_rad = a.latitude.to_radians();
    let lat2_rad = b.latitude.to_radians();
    let delta_lat = (b.latitude - a.latitude).to_radians();
    let delta_lon = (b.longitude - a.longitude).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_M * c
}

/// Straight-line distance in degree space, ignoring curvature
///
/// Only meaningful for comparing nearby points; used by the iterative
/// center estimator as its weighting distance.
#[inline]
pub fn planar_distance(a: &GeoPoint, b: &GeoPoint) -> f64 {
    (a.latitude - b.latitude).hypot(a.longitude - b.longitude)
}

/// Largest Haversine distance between any two of the given points
///
/// Zero for fewer than two points.
pub fn max_pairwise_distance(points: &[GeoPoint]) -> f64 {
    let mut max_distance: f64 = 0.0;

    for (i, a) in points.iter().enumerate() {
        for b in &points[i + 1..] {
            max_distance = max_distance.max(haversine_distance(a, b));
        }
    }

    max_distance
}

/// Radius to search for venues around the group's center
///
/// The group's widest spread scaled by `policy.factor`, clamped to
/// `[policy.min_m, policy.max_m]`.
pub fn suggested_search_radius(points: &[GeoPoint], policy: &RadiusPolicy) -> f64 {
    let radius = max_pairwise_distance(points) * policy.factor;
    radius.max(policy.min_m).min(policy.max_m)
}
