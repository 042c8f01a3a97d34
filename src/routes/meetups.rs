use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use std::sync::Arc;
use validator::Validate;

use crate::core::MeetupPlanner;
use crate::models::{
    label_participants, CenterRequest, CenterResponse, ErrorResponse, GeocodeQuery, HealthResponse, Participant,
    ParticipantInput, PlanRequest, PlanResponse, RankRequest, SuggestionsResponse,
};
use crate::services::{NominatimClient, OverpassClient};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub geocoder: Arc<NominatimClient>,
    pub places: Arc<OverpassClient>,
    pub planner: MeetupPlanner,
    pub suggestion_limit: usize,
}

/// Configure all meetup-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/meetup/center", web::post().to(estimate_center))
        .route("/meetup/rank", web::post().to(rank_places))
        .route("/meetup/plan", web::post().to(plan_meetup))
        .route("/geocode", web::get().to(geocode))
        .route("/geocode/suggest", web::get().to(suggest));
}

fn error_response(status: StatusCode, error: &str, message: impl Into<String>) -> HttpResponse {
    HttpResponse::build(status).json(ErrorResponse {
        error: error.to_string(),
        message: message.into(),
        status_code: status.as_u16(),
    })
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Estimate center endpoint
///
/// POST /api/v1/meetup/center
///
/// Request body:
/// ```json
/// {
///   "participants": [{"lat": 10.8169, "lng": 106.60383}],
///   "policy": "centroid|geometric_median"
/// }
/// ```
async fn estimate_center(state: web::Data<AppState>, req: web::Json<CenterRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return error_response(StatusCode::BAD_REQUEST, "Validation failed", errors.to_string());
    }

    let planner = match req.policy {
        Some(policy) => state.planner.with_policy(policy),
        None => state.planner,
    };

    match planner.search_area(&req.participants) {
        Ok(area) => HttpResponse::Ok().json(CenterResponse {
            center: area.center,
            search_radius_m: area.radius_m,
            policy: planner.estimator().config().policy,
        }),
        Err(e) => error_response(StatusCode::BAD_REQUEST, "Invalid participants", e.to_string()),
    }
}

/// Rank caller-supplied venues
///
/// POST /api/v1/meetup/rank
///
/// Request body:
/// ```json
/// {
///   "participants": [{"name": "An", "lat": 10.8169, "lng": 106.60383}],
///   "candidates": [{"id": 1, "name": "Cafe", "lat": 10.84, "lng": 106.61, "address": "12, Le Loi"}],
///   "showAll": false
/// }
/// ```
async fn rank_places(state: web::Data<AppState>, req: web::Json<RankRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return error_response(StatusCode::BAD_REQUEST, "Validation failed", errors.to_string());
    }

    let RankRequest {
        mut participants,
        candidates,
        show_all,
        policy,
    } = req.into_inner();
    label_participants(&mut participants);

    let planner = match policy {
        Some(policy) => state.planner.with_policy(policy),
        None => state.planner,
    };

    match planner.plan(&participants, candidates, show_all) {
        Ok(plan) => HttpResponse::Ok().json(PlanResponse::new(participants, plan, show_all)),
        Err(e) => error_response(StatusCode::BAD_REQUEST, "Invalid participants", e.to_string()),
    }
}

/// Geocode, search, and rank in one call
///
/// POST /api/v1/meetup/plan
///
/// Request body:
/// ```json
/// {
///   "participants": [{"address": "1 Dai Co Viet, Ha Noi"}, {"lat": 21.02, "lng": 105.83}],
///   "category": "cafe|restaurant|sports|cinema",
///   "showAll": false
/// }
/// ```
async fn plan_meetup(state: web::Data<AppState>, req: web::Json<PlanRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return error_response(StatusCode::BAD_REQUEST, "Validation failed", errors.to_string());
    }

    let mut participants = match resolve_participants(&state.geocoder, &req.participants).await {
        Ok(participants) => participants,
        Err(response) => return response,
    };
    label_participants(&mut participants);

    let planner = match req.policy {
        Some(policy) => state.planner.with_policy(policy),
        None => state.planner,
    };

    let area = match planner.search_area(&participants) {
        Ok(area) => area,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, "Invalid participants", e.to_string()),
    };

    tracing::info!(
        "Searching {:?} venues within {:.0}m of ({}, {}) for {} participants",
        req.category,
        area.radius_m,
        area.center.latitude,
        area.center.longitude,
        participants.len()
    );

    let candidates = match state
        .places
        .find_places(&area.center, area.radius_m, req.category)
        .await
    {
        Ok(candidates) => candidates,
        Err(e) => {
            tracing::error!("Failed to query venues: {}", e);
            return error_response(StatusCode::BAD_GATEWAY, "Failed to query venues", e.to_string());
        }
    };

    match planner.plan(&participants, candidates, req.show_all) {
        Ok(plan) => {
            tracing::info!(
                "Returning {} of {} venues ({} rejected)",
                plan.displayed.len(),
                plan.total_candidates,
                plan.rejected_candidates
            );
            HttpResponse::Ok().json(PlanResponse::new(participants, plan, req.show_all))
        }
        Err(e) => error_response(StatusCode::BAD_REQUEST, "Invalid participants", e.to_string()),
    }
}

/// Turn request inputs into located participants
///
/// Explicit coordinates win over an address. Addresses are geocoded one at a
/// time (Nominatim allows one request per second).
async fn resolve_participants(
    geocoder: &NominatimClient,
    inputs: &[ParticipantInput],
) -> Result<Vec<Participant>, HttpResponse> {
    let mut participants = Vec::with_capacity(inputs.len());

    for (index, input) in inputs.iter().enumerate() {
        let name = input.name.clone().unwrap_or_default();

        if let Some(location) = input.coordinates() {
            let mut participant = Participant::new(name, location);
            participant.address = input.address_query().map(str::to_string);
            participants.push(participant);
            continue;
        }

        let Some(address) = input.address_query() else {
            return Err(error_response(
                StatusCode::BAD_REQUEST,
                "Validation failed",
                format!("Participant {} needs an address or coordinates", index + 1),
            ));
        };

        match geocoder.geocode(address).await {
            Ok(Some(found)) => {
                participants.push(Participant::new(name, found.location).with_address(found.display_name));
            }
            Ok(None) => {
                tracing::warn!("Address not found: {}", address);
                return Err(error_response(
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "Address not found",
                    format!("Could not locate {:?}", address),
                ));
            }
            Err(e) => {
                tracing::error!("Failed to geocode {:?}: {}", address, e);
                return Err(error_response(StatusCode::BAD_GATEWAY, "Failed to geocode address", e.to_string()));
            }
        }
    }

    Ok(participants)
}

/// Geocode a single address
///
/// GET /api/v1/geocode?q={address}
async fn geocode(state: web::Data<AppState>, query: web::Query<GeocodeQuery>) -> impl Responder {
    if let Err(errors) = query.validate() {
        return error_response(StatusCode::BAD_REQUEST, "Validation failed", errors.to_string());
    }

    match state.geocoder.geocode(&query.q).await {
        Ok(Some(found)) => HttpResponse::Ok().json(found),
        Ok(None) => error_response(StatusCode::NOT_FOUND, "Address not found", format!("Could not locate {:?}", query.q)),
        Err(e) => {
            tracing::error!("Failed to geocode {:?}: {}", query.q, e);
            error_response(StatusCode::BAD_GATEWAY, "Failed to geocode address", e.to_string())
        }
    }
}

/// Address suggestions for partial input
///
/// GET /api/v1/geocode/suggest?q={partial}&limit={n}
async fn suggest(state: web::Data<AppState>, query: web::Query<GeocodeQuery>) -> impl Responder {
    if let Err(errors) = query.validate() {
        return error_response(StatusCode::BAD_REQUEST, "Validation failed", errors.to_string());
    }

    let limit = query.limit.map(usize::from).unwrap_or(state.suggestion_limit);

    match state.geocoder.suggest(&query.q, limit).await {
        Ok(suggestions) => HttpResponse::Ok().json(SuggestionsResponse {
            query: query.q.clone(),
            suggestions,
        }),
        Err(e) => {
            tracing::error!("Failed to fetch suggestions for {:?}: {}", query.q, e);
            error_response(StatusCode::BAD_GATEWAY, "Failed to fetch suggestions", e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::configure_routes;
    use actix_web::{test, App};
    use serde_json::{json, Value};
    use std::time::Duration;

    fn create_state(geocoder_url: &str, overpass_url: &str) -> AppState {
        AppState {
            geocoder: Arc::new(
                NominatimClient::new(geocoder_url.to_string(), "meetup-finder/test".to_string(), Duration::from_secs(5))
                    .unwrap(),
            ),
            places: Arc::new(OverpassClient::new(overpass_url.to_string(), Duration::from_secs(5)).unwrap()),
            planner: MeetupPlanner::default(),
            suggestion_limit: 5,
        }
    }

    #[actix_web::test]
    async fn test_health_check() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(create_state("http://127.0.0.1:9", "http://127.0.0.1:9")))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/v1/health").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["status"], "healthy");
    }

    #[actix_web::test]
    async fn test_center_endpoint() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(create_state("http://127.0.0.1:9", "http://127.0.0.1:9")))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/v1/meetup/center")
            .set_json(json!({
                "participants": [{"lat": 10.0, "lng": 106.0}, {"lat": 10.02, "lng": 106.02}],
                "policy": "centroid"
            }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert!((body["center"]["latitude"].as_f64().unwrap() - 10.01).abs() < 1e-9);
        assert_eq!(body["policy"], "centroid");
    }

    #[actix_web::test]
    async fn test_center_rejects_empty_group() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(create_state("http://127.0.0.1:9", "http://127.0.0.1:9")))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/v1/meetup/center")
            .set_json(json!({"participants": []}))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_rank_endpoint() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(create_state("http://127.0.0.1:9", "http://127.0.0.1:9")))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/v1/meetup/rank")
            .set_json(json!({
                "participants": [
                    {"lat": 10.8169, "lng": 106.60383},
                    {"name": "Binh", "lat": 10.86822, "lng": 106.61484}
                ],
                "candidates": [
                    {"id": 1, "name": "Far Cafe", "lat": 10.95, "lng": 106.70, "address": "1, Le Loi"},
                    {"id": 2, "name": "Mid Cafe", "lat": 10.843, "lng": 106.609, "address": "22, Quang Trung"},
                    {"id": 3, "name": "Ghost Cafe", "lat": 10.84, "lng": 106.61, "address": "N/A"}
                ]
            }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["places"][0]["id"], 2);
        assert_eq!(body["places"][1]["id"], 1);
        assert_eq!(body["totalResults"], 2);
        assert_eq!(body["rejectedCandidates"], 1);
        assert_eq!(body["participants"][0]["name"], "Member 1");
        assert_eq!(body["participants"][1]["name"], "Binh");
    }

    #[actix_web::test]
    async fn test_plan_endpoint() {
        let mut nominatim = mockito::Server::new_async().await;
        nominatim
            .mock("GET", "/search")
            .match_query(mockito::Matcher::UrlEncoded("q".into(), "Cho Ben Thanh".into()))
            .with_status(200)
            .with_body(r#"[{"lat": "10.8169", "lon": "106.60383", "display_name": "Cho Ben Thanh"}]"#)
            .create_async()
            .await;

        let mut overpass = mockito::Server::new_async().await;
        overpass
            .mock("POST", "/api/interpreter")
            .with_status(200)
            .with_body(
                r#"{"elements": [
                    {"id": 5, "lat": 10.843, "lon": 106.609,
                     "tags": {"name": "Highlands", "addr:housenumber": "7", "addr:street": "Quang Trung"}},
                    {"id": 6, "lat": 10.844, "lon": 106.610, "tags": {"name": "No Address"}}
                ]}"#,
            )
            .create_async()
            .await;

        let overpass_url = format!("{}/api/interpreter", overpass.url());
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(create_state(&nominatim.url(), &overpass_url)))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/v1/meetup/plan")
            .set_json(json!({
                "participants": [
                    {"address": "Cho Ben Thanh"},
                    {"name": "Binh", "lat": 10.86822, "lng": 106.61484}
                ],
                "category": "cafe"
            }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["participants"][0]["address"], "Cho Ben Thanh");
        assert_eq!(body["places"].as_array().unwrap().len(), 1);
        assert_eq!(body["places"][0]["name"], "Highlands");
        assert_eq!(body["nearestPlace"]["id"], 5);
        assert_eq!(body["totalCandidates"], 2);
    }

    #[actix_web::test]
    async fn test_plan_unknown_address() {
        let mut nominatim = mockito::Server::new_async().await;
        nominatim
            .mock("GET", "/search")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(create_state(&nominatim.url(), "http://127.0.0.1:9")))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/v1/meetup/plan")
            .set_json(json!({"participants": [{"address": "Atlantis"}]}))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[actix_web::test]
    async fn test_plan_requires_location() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(create_state("http://127.0.0.1:9", "http://127.0.0.1:9")))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/v1/meetup/plan")
            .set_json(json!({"participants": [{"name": "Nobody"}]}))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
