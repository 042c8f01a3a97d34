use serde::{Deserialize, Serialize};

/// A coordinate in decimal degrees
///
/// Accepts `lat`/`lng`/`lon` as aliases when deserializing so that payloads
/// from map clients can be passed through unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    #[serde(alias = "lat")]
    pub latitude: f64,
    #[serde(alias = "lng", alias = "lon")]
    pub longitude: f64,
}

impl GeoPoint {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

impl From<GeoPoint> for geo::Point<f64> {
    fn from(point: GeoPoint) -> Self {
        geo::Point::new(point.longitude, point.latitude)
    }
}

impl From<geo::Point<f64>> for GeoPoint {
    fn from(point: geo::Point<f64>) -> Self {
        GeoPoint::new(point.y(), point.x())
    }
}

/// A meeting attendee
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    #[serde(default = "new_participant_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub location: GeoPoint,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl Participant {
    pub fn new(name: impl Into<String>, location: GeoPoint) -> Self {
        Self {
            id: new_participant_id(),
            name: name.into(),
            location,
            address: None,
        }
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Label used for participants added without a name (1-based position)
    pub fn default_name(position: usize) -> String {
        format!("Member {}", position)
    }
}

fn new_participant_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Give every unnamed participant its positional label
pub fn label_participants(participants: &mut [Participant]) {
    for (index, participant) in participants.iter_mut().enumerate() {
        if participant.name.trim().is_empty() {
            participant.name = Participant::default_name(index + 1);
        }
    }
}

/// A venue returned by the points-of-interest service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub location: GeoPoint,
    #[serde(default)]
    pub address: Option<String>,
}

impl Candidate {
    pub fn new(id: i64, name: impl Into<String>, location: GeoPoint, address: Option<String>) -> Self {
        Self {
            id,
            name: name.into(),
            location,
            address,
        }
    }
}

/// A candidate that survived filtering, with its distances to the group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCandidate {
    #[serde(flatten)]
    pub candidate: Candidate,
    /// Sum of distances from every participant, in meters
    #[serde(rename = "totalDistanceM")]
    pub total_distance_m: f64,
    /// Distance from the farthest participant, in meters
    #[serde(rename = "maxDistanceM")]
    pub max_distance_m: f64,
}

impl From<RankedCandidate> for Candidate {
    fn from(ranked: RankedCandidate) -> Self {
        ranked.candidate
    }
}

/// Kind of venue to search for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VenueCategory {
    #[default]
    Cafe,
    Restaurant,
    Sports,
    Cinema,
}

impl VenueCategory {
    /// OpenStreetMap tag filter for this category
    pub fn osm_filter(&self) -> &'static str {
        match self {
            VenueCategory::Cafe => r#"["amenity"="cafe"]"#,
            VenueCategory::Restaurant => r#"["amenity"="restaurant"]"#,
            VenueCategory::Sports => r#"["leisure"="pitch"]"#,
            VenueCategory::Cinema => r#"["amenity"="cinema"]"#,
        }
    }
}

/// How the group's center is computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CenterPolicy {
    /// Mean latitude and mean longitude
    Centroid,
    /// Weiszfeld approximation of the point minimizing total distance
    #[default]
    GeometricMedian,
}

/// Center estimator tuning
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EstimatorConfig {
    pub policy: CenterPolicy,
    pub iterations: usize,
    /// Substituted for a zero distance between the estimate and a participant
    pub distance_floor: f64,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            policy: CenterPolicy::GeometricMedian,
            iterations: 50,
            distance_floor: 0.0001,
        }
    }
}

/// Search radius derived from the spread of the group
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadiusPolicy {
    pub factor: f64,
    pub min_m: f64,
    pub max_m: f64,
}

impl Default for RadiusPolicy {
    fn default() -> Self {
        Self {
            factor: 0.5,
            min_m: 800.0,
            max_m: 12_000.0,
        }
    }
}

/// Candidate filters and result view
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankingOptions {
    /// Drop venues whose address does not look like a postal address
    pub validate_address: bool,
    /// Drop venues farther than this from any single participant
    pub max_individual_distance_m: Option<f64>,
    /// Size of the default (collapsed) view
    pub top_k: usize,
}

impl Default for RankingOptions {
    fn default() -> Self {
        Self {
            validate_address: true,
            max_individual_distance_m: None,
            top_k: 5,
        }
    }
}

/// Center and radius to query venues in
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SearchArea {
    pub center: GeoPoint,
    #[serde(rename = "radiusM")]
    pub radius_m: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geo_point_aliases() {
        let point: GeoPoint = serde_json::from_str(r#"{"lat": 10.5, "lng": 106.7}"#).unwrap();
        assert_eq!(point, GeoPoint::new(10.5, 106.7));

        let point: GeoPoint = serde_json::from_str(r#"{"latitude": 1.0, "lon": 2.0}"#).unwrap();
        assert_eq!(point, GeoPoint::new(1.0, 2.0));
    }

    #[test]
    fn test_geo_point_converts_to_xy() {
        let point: geo::Point<f64> = GeoPoint::new(10.0, 20.0).into();
        assert_eq!(point.x(), 20.0);
        assert_eq!(point.y(), 10.0);
        assert_eq!(GeoPoint::from(point), GeoPoint::new(10.0, 20.0));
    }

    #[test]
    fn test_participant_defaults() {
        let participant: Participant =
            serde_json::from_str(r#"{"latitude": 10.8, "longitude": 106.6}"#).unwrap();

        assert!(!participant.id.is_empty());
        assert!(participant.name.is_empty());
        assert_eq!(participant.location, GeoPoint::new(10.8, 106.6));
    }

    #[test]
    fn test_label_participants() {
        let mut participants = vec![
            Participant::new("", GeoPoint::new(0.0, 0.0)),
            Participant::new("Linh", GeoPoint::new(0.0, 0.0)),
            Participant::new("  ", GeoPoint::new(0.0, 0.0)),
        ];

        label_participants(&mut participants);

        assert_eq!(participants[0].name, "Member 1");
        assert_eq!(participants[1].name, "Linh");
        assert_eq!(participants[2].name, "Member 3");
    }

    #[test]
    fn test_category_filters() {
        assert_eq!(VenueCategory::Sports.osm_filter(), r#"["leisure"="pitch"]"#);
        let category: VenueCategory = serde_json::from_str(r#""cinema""#).unwrap();
        assert_eq!(category, VenueCategory::Cinema);
    }
}
