use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

use crate::models::{Candidate, GeoPoint, VenueCategory};

/// Errors that can occur when querying Overpass
#[derive(Debug, Error)]
pub enum OverpassError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Name given to venues mapped without a `name` tag
pub const UNNAMED_VENUE: &str = "Unnamed";

/// Address tags, in display order
const ADDRESS_TAGS: [&[&str]; 5] = [
    &["addr:housenumber"],
    &["addr:street"],
    &["addr:ward", "addr:suburb"],
    &["addr:district"],
    &["addr:city"],
];

#[derive(Debug, Deserialize)]
struct OverpassResponse {
    #[serde(default)]
    elements: Vec<OverpassElement>,
}

#[derive(Debug, Deserialize)]
struct OverpassElement {
    id: i64,
    lat: Option<f64>,
    lon: Option<f64>,
    center: Option<ElementCenter>,
    #[serde(default)]
    tags: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct ElementCenter {
    lat: f64,
    lon: f64,
}

impl OverpassElement {
    /// Nodes carry their own coordinates; ways only have a computed center
    fn location(&self) -> Option<GeoPoint> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some(GeoPoint::new(lat, lon)),
            _ => self.center.as_ref().map(|c| GeoPoint::new(c.lat, c.lon)),
        }
    }

    fn into_candidate(self) -> Option<Candidate> {
        let location = self.location()?;
        let address = format_address(&self.tags);
        let name = self
            .tags
            .get("name")
            .map(|name| name.trim())
            .filter(|name| !name.is_empty())
            .unwrap_or(UNNAMED_VENUE)
            .to_string();

        Some(Candidate::new(self.id, name, location, address))
    }
}

/// Build a postal-style address from OSM `addr:*` tags
///
/// Missing or blank parts are skipped; `None` when nothing is left.
pub fn format_address(tags: &HashMap<String, String>) -> Option<String> {
    let parts: Vec<&str> = ADDRESS_TAGS
        .iter()
        .filter_map(|keys| {
            keys.iter()
                .filter_map(|key| tags.get(*key))
                .map(|value| value.trim())
                .find(|value| !value.is_empty())
        })
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(", "))
    }
}

/// Overpass QL for venues of `category` within `radius_m` of `center`
pub fn build_query(category: VenueCategory, center: &GeoPoint, radius_m: f64) -> String {
    let filter = category.osm_filter();
    let around = format!("(around:{},{},{})", radius_m.round() as u64, center.latitude, center.longitude);

    format!(
        "[out:json];\n(\n  node{filter}{around};\n  way{filter}{around};\n);\nout center tags;\n",
        filter = filter,
        around = around
    )
}

/// Overpass points-of-interest client
pub struct OverpassClient {
    endpoint: String,
    client: Client,
}

impl OverpassClient {
    /// Create a new Overpass client
    pub fn new(endpoint: String, timeout: Duration) -> Result<Self, OverpassError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self { endpoint, client })
    }

    /// Fetch raw venue candidates around a point
    ///
    /// Elements without coordinates are dropped. Addresses are passed through
    /// as found, so callers should still run the structural filter.
    pub async fn find_places(
        &self,
        center: &GeoPoint,
        radius_m: f64,
        category: VenueCategory,
    ) -> Result<Vec<Candidate>, OverpassError> {
        let query = build_query(category, center, radius_m);

        tracing::debug!("Querying Overpass at {}: {}", self.endpoint, query);

        let response = self
            .client
            .post(&self.endpoint)
            .body(query)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(OverpassError::ApiError(format!(
                "Overpass query failed: {}",
                response.status()
            )));
        }

        let body: OverpassResponse = response
            .json()
            .await
            .map_err(|e| OverpassError::InvalidResponse(format!("Failed to parse elements: {}", e)))?;

        let total = body.elements.len();
        let candidates: Vec<Candidate> = body
            .elements
            .into_iter()
            .filter_map(OverpassElement::into_candidate)
            .collect();

        tracing::debug!("Overpass returned {} elements, {} with coordinates", total, candidates.len());

        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MeetupPlanner;
    use crate::models::Participant;

    fn tags(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_format_address_order() {
        let address = format_address(&tags(&[
            ("addr:city", "Ho Chi Minh"),
            ("addr:street", "Le Loi"),
            ("addr:housenumber", "12"),
            ("addr:district", "District 1"),
        ]));

        assert_eq!(address.as_deref(), Some("12, Le Loi, District 1, Ho Chi Minh"));
    }

    #[test]
    fn test_format_address_ward_falls_back_to_suburb() {
        let address = format_address(&tags(&[("addr:street", "Le Loi"), ("addr:suburb", "Ben Nghe")]));
        assert_eq!(address.as_deref(), Some("Le Loi, Ben Nghe"));

        let address = format_address(&tags(&[("addr:ward", "Ben Thanh"), ("addr:suburb", "Ben Nghe")]));
        assert_eq!(address.as_deref(), Some("Ben Thanh"));
    }

    #[test]
    fn test_format_address_empty() {
        assert_eq!(format_address(&tags(&[("name", "Cafe")])), None);
        assert_eq!(format_address(&tags(&[("addr:street", "  ")])), None);
    }

    #[test]
    fn test_build_query() {
        let query = build_query(VenueCategory::Cafe, &GeoPoint::new(10.84, 106.61), 2915.6);

        assert!(query.starts_with("[out:json];"));
        assert!(query.contains(r#"node["amenity"="cafe"](around:2916,10.84,106.61);"#));
        assert!(query.contains(r#"way["amenity"="cafe"](around:2916,10.84,106.61);"#));
        assert!(query.contains("out center tags;"));
    }

    #[test]
    fn test_element_location() {
        let node: OverpassElement =
            serde_json::from_str(r#"{"id": 1, "lat": 10.1, "lon": 106.1, "tags": {"name": "A"}}"#).unwrap();
        assert_eq!(node.location(), Some(GeoPoint::new(10.1, 106.1)));

        let way: OverpassElement =
            serde_json::from_str(r#"{"id": 2, "center": {"lat": 10.2, "lon": 106.2}}"#).unwrap();
        assert_eq!(way.location(), Some(GeoPoint::new(10.2, 106.2)));

        let bare: OverpassElement = serde_json::from_str(r#"{"id": 3}"#).unwrap();
        assert!(bare.into_candidate().is_none());
    }

    #[test]
    fn test_unnamed_element_gets_label() {
        let way: OverpassElement =
            serde_json::from_str(r#"{"id": 2, "center": {"lat": 10.2, "lon": 106.2}, "tags": {"addr:street": "Le Loi"}}"#)
                .unwrap();
        let candidate = way.into_candidate().unwrap();

        assert_eq!(candidate.name, UNNAMED_VENUE);
        assert_eq!(candidate.address.as_deref(), Some("Le Loi"));

        let blank: OverpassElement =
            serde_json::from_str(r#"{"id": 3, "lat": 10.3, "lon": 106.3, "tags": {"name": "  "}}"#).unwrap();
        assert_eq!(blank.into_candidate().unwrap().name, UNNAMED_VENUE);
    }

    #[tokio::test]
    async fn test_unnamed_venue_with_address_is_ranked() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/interpreter")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"elements": [
                    {"id": 1, "lat": 10.8426, "lon": 106.6093,
                     "tags": {"addr:housenumber": "9", "addr:street": "Cong Hoa"}}
                ]}"#,
            )
            .create_async()
            .await;

        let client = OverpassClient::new(format!("{}/api/interpreter", server.url()), Duration::from_secs(5)).unwrap();
        let candidates = client
            .find_places(&GeoPoint::new(10.8426, 106.6093), 1500.0, VenueCategory::Cafe)
            .await
            .unwrap();

        let participants = vec![
            Participant::new("Member 1", GeoPoint::new(10.8169, 106.60383)),
            Participant::new("Member 2", GeoPoint::new(10.86822, 106.61484)),
        ];
        let plan = MeetupPlanner::default().plan(&participants, candidates, false).unwrap();

        assert_eq!(plan.rejected_candidates, 0);
        assert_eq!(plan.ranked.len(), 1);
        assert_eq!(plan.ranked[0].candidate.name, UNNAMED_VENUE);
        assert_eq!(plan.ranked[0].candidate.address.as_deref(), Some("9, Cong Hoa"));
    }

    #[tokio::test]
    async fn test_find_places() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/interpreter")
            .match_body(mockito::Matcher::Regex(r#"\["amenity"="restaurant"\]"#.to_string()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"elements": [
                    {"type": "node", "id": 11, "lat": 10.84, "lon": 106.61,
                     "tags": {"name": "Com Tam", "addr:housenumber": "5", "addr:street": "Quang Trung"}},
                    {"type": "way", "id": 12, "center": {"lat": 10.85, "lon": 106.62},
                     "tags": {"name": "Pho 24"}},
                    {"type": "relation", "id": 13, "tags": {"name": "No coordinates"}}
                ]}"#,
            )
            .create_async()
            .await;

        let client = OverpassClient::new(format!("{}/api/interpreter", server.url()), Duration::from_secs(5)).unwrap();
        let candidates = client
            .find_places(&GeoPoint::new(10.84, 106.61), 1500.0, VenueCategory::Restaurant)
            .await
            .unwrap();

        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].address.as_deref(), Some("5, Quang Trung"));
        assert_eq!(candidates[1].id, 12);
        assert_eq!(candidates[1].address, None);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_find_places_upstream_error() {
        let mut server = mockito::Server::new_async().await;
        server.mock("POST", "/api/interpreter").with_status(429).create_async().await;

        let client = OverpassClient::new(format!("{}/api/interpreter", server.url()), Duration::from_secs(5)).unwrap();
        let err = client
            .find_places(&GeoPoint::new(10.84, 106.61), 1500.0, VenueCategory::Cafe)
            .await
            .unwrap_err();

        assert!(matches!(err, OverpassError::ApiError(_)));
    }
}
