//! HTTP handlers for the fleet registry server.

use std::sync::Arc;

use actix_web::{HttpResponse, Responder, delete, error::InternalError, get, post, web};
use fleet_core::{
    FleetError, Ship, ShipDraft, ShipQuery, ShipRepository, ShipService, parse_id,
};
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

use crate::openapi::ApiDoc;

/// Ship service shared across worker threads.
pub type SharedShipService = ShipService<Arc<dyn ShipRepository + Send + Sync>>;

#[derive(Clone)]
/// Shared application state for handlers.
pub struct AppState {
    /// Ship lifecycle service.
    pub ships: SharedShipService,
}

impl AppState {
    /// Wrap `repository` in a ship service.
    pub fn new<R>(repository: R) -> Self
    where
        R: ShipRepository + Send + Sync + 'static,
    {
        let repository: Arc<dyn ShipRepository + Send + Sync> = Arc::new(repository);
        Self {
            ships: ShipService::new(repository),
        }
    }
}

/// Error response payload.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message.
    pub message: String,
}

/// Map a service failure onto its HTTP status.
pub fn error_response(err: &FleetError) -> HttpResponse {
    let body = ErrorResponse {
        message: err.to_string(),
    };
    match err {
        FleetError::InvalidInput(_) => HttpResponse::BadRequest().json(body),
        FleetError::NotFound(_) => HttpResponse::NotFound().json(body),
        FleetError::Storage(_) => {
            log::error!("{err}");
            HttpResponse::InternalServerError().json(body)
        }
    }
}

fn bad_request(message: String) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse { message })
}

/// Query-string extractor settings that report malformed parameters as JSON.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        let response = bad_request(err.to_string());
        InternalError::from_response(err, response).into()
    })
}

/// JSON body extractor settings that report malformed payloads as JSON.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let response = bad_request(err.to_string());
        InternalError::from_response(err, response).into()
    })
}

/// Register extractor settings and every ship endpoint.
///
/// `count_ships` is registered ahead of the `{id}` routes so that
/// `/rest/ships/count` is not read as an identifier.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(query_config())
        .app_data(json_config())
        .service(list_ships)
        .service(count_ships)
        .service(create_ship)
        .service(get_ship)
        .service(update_ship)
        .service(delete_ship)
        .service(openapi_json);
}

async fn run_blocking<T, F>(task: F) -> Result<T, HttpResponse>
where
    F: FnOnce() -> fleet_core::Result<T> + Send + 'static,
    T: Send + 'static,
{
    match web::block(task).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => Err(error_response(&err)),
        Err(err) => Err(HttpResponse::InternalServerError().json(ErrorResponse {
            message: format!("ship task failed: {err}"),
        })),
    }
}

fn ship_id(raw: &str) -> Result<i64, HttpResponse> {
    parse_id(Some(raw)).map_err(|err| error_response(&err))
}

#[utoipa::path(
    get,
    path = "/rest/ships",
    params(ShipQuery),
    responses(
        (status = 200, description = "One sorted page of matching ships", body = Vec<Ship>),
        (status = 400, description = "Invalid filter or paging parameters", body = ErrorResponse)
    ),
    tag = "ships"
)]
#[get("/rest/ships")]
/// List one page of ships matching the query filters.
pub async fn list_ships(
    state: web::Data<AppState>,
    query: web::Query<ShipQuery>,
) -> impl Responder {
    let query = query.into_inner();
    let ships = state.ships.clone();
    let result = run_blocking(move || {
        let filter = query.filter()?;
        let page = query.page_request()?;
        ships.list_page(&filter, &page)
    })
    .await;

    match result {
        Ok(page) => HttpResponse::Ok().json(page.content),
        Err(response) => response,
    }
}

#[utoipa::path(
    get,
    path = "/rest/ships/count",
    params(ShipQuery),
    responses(
        (status = 200, description = "Number of matching ships", body = u64),
        (status = 400, description = "Invalid filter parameters", body = ErrorResponse)
    ),
    tag = "ships"
)]
#[get("/rest/ships/count")]
/// Count ships matching the query filters.
pub async fn count_ships(
    state: web::Data<AppState>,
    query: web::Query<ShipQuery>,
) -> impl Responder {
    let query = query.into_inner();
    let ships = state.ships.clone();
    let result = run_blocking(move || ships.count(&query.filter()?)).await;

    match result {
        Ok(count) => HttpResponse::Ok().json(count),
        Err(response) => response,
    }
}

#[utoipa::path(
    post,
    path = "/rest/ships",
    request_body = ShipDraft,
    responses(
        (status = 200, description = "Created ship", body = Ship),
        (status = 400, description = "Missing or invalid fields", body = ErrorResponse)
    ),
    tag = "ships"
)]
#[post("/rest/ships")]
/// Validate, rate and store a new ship.
pub async fn create_ship(
    state: web::Data<AppState>,
    payload: web::Json<ShipDraft>,
) -> impl Responder {
    let draft = payload.into_inner();
    let ships = state.ships.clone();
    match run_blocking(move || ships.create(draft)).await {
        Ok(ship) => HttpResponse::Ok().json(ship),
        Err(response) => response,
    }
}

#[utoipa::path(
    get,
    path = "/rest/ships/{id}",
    params(
        ("id" = i64, Path, description = "Ship identifier")
    ),
    responses(
        (status = 200, description = "Stored ship", body = Ship),
        (status = 400, description = "Malformed identifier", body = ErrorResponse),
        (status = 404, description = "Unknown ship", body = ErrorResponse)
    ),
    tag = "ships"
)]
#[get("/rest/ships/{id}")]
/// Fetch one ship.
pub async fn get_ship(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let id = match ship_id(&path) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let ships = state.ships.clone();
    match run_blocking(move || ships.get(id)).await {
        Ok(ship) => HttpResponse::Ok().json(ship),
        Err(response) => response,
    }
}

#[utoipa::path(
    post,
    path = "/rest/ships/{id}",
    params(
        ("id" = i64, Path, description = "Ship identifier")
    ),
    request_body = ShipDraft,
    responses(
        (status = 200, description = "Edited ship", body = Ship),
        (status = 400, description = "Malformed identifier or invalid fields", body = ErrorResponse),
        (status = 404, description = "Unknown ship", body = ErrorResponse)
    ),
    tag = "ships"
)]
#[post("/rest/ships/{id}")]
/// Overwrite the supplied fields of a ship.
pub async fn update_ship(
    state: web::Data<AppState>,
    path: web::Path<String>,
    payload: web::Json<ShipDraft>,
) -> impl Responder {
    let id = match ship_id(&path) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let draft = payload.into_inner();
    let ships = state.ships.clone();
    match run_blocking(move || ships.edit(id, draft)).await {
        Ok(ship) => HttpResponse::Ok().json(ship),
        Err(response) => response,
    }
}

#[utoipa::path(
    delete,
    path = "/rest/ships/{id}",
    params(
        ("id" = i64, Path, description = "Ship identifier")
    ),
    responses(
        (status = 200, description = "Ship removed"),
        (status = 400, description = "Malformed identifier", body = ErrorResponse),
        (status = 404, description = "Unknown ship", body = ErrorResponse)
    ),
    tag = "ships"
)]
#[delete("/rest/ships/{id}")]
/// Remove one ship.
pub async fn delete_ship(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let id = match ship_id(&path) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let ships = state.ships.clone();
    match run_blocking(move || ships.delete(id)).await {
        Ok(()) => HttpResponse::Ok().finish(),
        Err(response) => response,
    }
}

#[utoipa::path(
    get,
    path = "/rest/openapi.json",
    responses(
        (status = 200, description = "OpenAPI document", body = serde_json::Value)
    ),
    tag = "system"
)]
#[get("/rest/openapi.json")]
/// Serve the OpenAPI document.
pub async fn openapi_json() -> impl Responder {
    HttpResponse::Ok().json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, http::StatusCode, test};
    use chrono::{TimeZone, Utc};
    use fleet_core::{
        InMemoryShipRepository, NewShip, Page, PageRequest, Result, Ship, ShipFilter, ShipId,
    };
    use serde_json::{Value, json};

    fn memory_state() -> web::Data<AppState> {
        web::Data::new(AppState::new(InMemoryShipRepository::new()))
    }

    fn millis(year: i32, month: u32, day: u32) -> i64 {
        Utc.with_ymd_and_hms(year, month, day, 12, 0, 0)
            .unwrap()
            .timestamp_millis()
    }

    fn ship_payload(name: &str, speed: f64, crew_size: i32) -> Value {
        json!({
            "name": name,
            "planet": "Earth",
            "shipType": "TRANSPORT",
            "prodDate": millis(2800, 1, 1),
            "speed": speed,
            "crewSize": crew_size
        })
    }

    macro_rules! ship_app {
        ($state:expr) => {
            test::init_service(App::new().app_data($state).configure(configure)).await
        };
    }

    #[actix_web::test]
    async fn create_then_get_returns_rated_ship() {
        let app = ship_app!(memory_state());
        let req = test::TestRequest::post()
            .uri("/rest/ships")
            .set_json(ship_payload("Falcon", 0.5, 10))
            .to_request();
        let created: Ship = test::call_and_read_body_json(&app, req).await;

        assert_eq!(created.id, 1);
        assert!(!created.used);
        assert_eq!(created.rating, 0.18);

        let req = test::TestRequest::get()
            .uri(&format!("/rest/ships/{}", created.id))
            .to_request();
        let fetched: Ship = test::call_and_read_body_json(&app, req).await;
        assert_eq!(fetched, created);
    }

    #[actix_web::test]
    async fn create_with_missing_field_is_bad_request() {
        let app = ship_app!(memory_state());
        let mut payload = ship_payload("Falcon", 0.5, 10);
        payload
            .as_object_mut()
            .expect("object payload")
            .remove("crewSize");
        let req = test::TestRequest::post()
            .uri("/rest/ships")
            .set_json(payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: ErrorResponse = test::read_body_json(resp).await;
        assert!(body.message.contains("crewSize"), "{}", body.message);

        let req = test::TestRequest::get().uri("/rest/ships/count").to_request();
        let count: u64 = test::call_and_read_body_json(&app, req).await;
        assert_eq!(count, 0);
    }

    #[actix_web::test]
    async fn malformed_json_is_reported_as_json() {
        let app = ship_app!(memory_state());
        let req = test::TestRequest::post()
            .uri("/rest/ships")
            .insert_header(("content-type", "application/json"))
            .set_payload(r#"{"name": "Falcon", "speed": "fast"}"#)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: ErrorResponse = test::read_body_json(resp).await;
        assert!(!body.message.is_empty());
    }

    #[actix_web::test]
    async fn list_filters_sorts_and_pages() {
        let app = ship_app!(memory_state());
        for (name, speed, crew_size) in [
            ("Alpha", 0.9, 5),
            ("Bravo", 0.2, 50),
            ("Charlie", 0.5, 500),
            ("Delta", 0.3, 5000),
        ] {
            let req = test::TestRequest::post()
                .uri("/rest/ships")
                .set_json(ship_payload(name, speed, crew_size))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::OK);
        }

        let req = test::TestRequest::get().uri("/rest/ships").to_request();
        let ships: Vec<Ship> = test::call_and_read_body_json(&app, req).await;
        let names: Vec<_> = ships.iter().map(|ship| ship.name.as_str()).collect();
        assert_eq!(names, ["Alpha", "Bravo", "Charlie"]);

        let req = test::TestRequest::get()
            .uri("/rest/ships?minCrewSize=10&order=SPEED&pageSize=2")
            .to_request();
        let ships: Vec<Ship> = test::call_and_read_body_json(&app, req).await;
        let names: Vec<_> = ships.iter().map(|ship| ship.name.as_str()).collect();
        assert_eq!(names, ["Bravo", "Delta"]);

        let req = test::TestRequest::get()
            .uri("/rest/ships?minCrewSize=10&order=SPEED&pageSize=2&pageNumber=1")
            .to_request();
        let ships: Vec<Ship> = test::call_and_read_body_json(&app, req).await;
        let names: Vec<_> = ships.iter().map(|ship| ship.name.as_str()).collect();
        assert_eq!(names, ["Charlie"]);

        let req = test::TestRequest::get()
            .uri("/rest/ships/count?minCrewSize=10")
            .to_request();
        let count: u64 = test::call_and_read_body_json(&app, req).await;
        assert_eq!(count, 3);

        let req = test::TestRequest::get()
            .uri("/rest/ships/count?name=ha&shipType=TRANSPORT")
            .to_request();
        let count: u64 = test::call_and_read_body_json(&app, req).await;
        assert_eq!(count, 2);
    }

    #[actix_web::test]
    async fn invalid_paging_and_query_values_are_bad_requests() {
        let app = ship_app!(memory_state());
        for uri in [
            "/rest/ships?pageSize=0",
            "/rest/ships?pageNumber=abc",
            "/rest/ships?order=NAME",
            "/rest/ships/count?after=9223372036854775807",
            "/rest/ships?minSpeed=NaN",
            "/rest/ships/count?maxRating=inf",
        ] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{uri}");
            let body: ErrorResponse = test::read_body_json(resp).await;
            assert!(!body.message.is_empty(), "{uri}");
        }
    }

    #[actix_web::test]
    async fn update_changes_only_supplied_fields() {
        let app = ship_app!(memory_state());
        let req = test::TestRequest::post()
            .uri("/rest/ships")
            .set_json(ship_payload("Falcon", 0.5, 10))
            .to_request();
        let created: Ship = test::call_and_read_body_json(&app, req).await;

        let req = test::TestRequest::post()
            .uri(&format!("/rest/ships/{}", created.id))
            .set_json(json!({ "planet": "Mars", "isUsed": true }))
            .to_request();
        let edited: Ship = test::call_and_read_body_json(&app, req).await;

        assert_eq!(edited.planet, "Mars");
        assert!(edited.used);
        assert_eq!(edited.name, created.name);
        assert_eq!(edited.crew_size, created.crew_size);
        assert_eq!(edited.rating, 0.09);
    }

    #[actix_web::test]
    async fn update_rejects_invalid_fields_and_unknown_ships() {
        let app = ship_app!(memory_state());
        let req = test::TestRequest::post()
            .uri("/rest/ships")
            .set_json(ship_payload("Falcon", 0.5, 10))
            .to_request();
        let created: Ship = test::call_and_read_body_json(&app, req).await;

        let req = test::TestRequest::post()
            .uri(&format!("/rest/ships/{}", created.id))
            .set_json(json!({ "crewSize": 10000 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::post()
            .uri("/rest/ships/99")
            .set_json(json!({ "planet": "Mars" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn delete_removes_ship_once() {
        let app = ship_app!(memory_state());
        let req = test::TestRequest::post()
            .uri("/rest/ships")
            .set_json(ship_payload("Falcon", 0.5, 10))
            .to_request();
        let created: Ship = test::call_and_read_body_json(&app, req).await;
        let uri = format!("/rest/ships/{}", created.id);

        let req = test::TestRequest::delete().uri(&uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        for req in [
            test::TestRequest::get().uri(&uri).to_request(),
            test::TestRequest::delete().uri(&uri).to_request(),
        ] {
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::NOT_FOUND);
            let body: ErrorResponse = test::read_body_json(resp).await;
            assert!(body.message.contains("not found"), "{}", body.message);
        }
    }

    #[actix_web::test]
    async fn malformed_ids_are_bad_requests() {
        let app = ship_app!(memory_state());
        for uri in ["/rest/ships/0", "/rest/ships/abc", "/rest/ships/1.5"] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{uri}");

            let req = test::TestRequest::delete().uri(uri).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{uri}");
        }
    }

    struct BrokenRepository;

    impl ShipRepository for BrokenRepository {
        fn exists_by_id(&self, _id: ShipId) -> Result<bool> {
            Err(FleetError::Storage("connection refused".to_string()))
        }

        fn find_by_id(&self, _id: ShipId) -> Result<Option<Ship>> {
            Err(FleetError::Storage("connection refused".to_string()))
        }

        fn insert(&self, _ship: NewShip) -> Result<Ship> {
            Err(FleetError::Storage("connection refused".to_string()))
        }

        fn update(&self, _ship: Ship) -> Result<Ship> {
            Err(FleetError::Storage("connection refused".to_string()))
        }

        fn delete_by_id(&self, _id: ShipId) -> Result<()> {
            Err(FleetError::Storage("connection refused".to_string()))
        }

        fn find_all(&self, _filter: &ShipFilter) -> Result<Vec<Ship>> {
            Err(FleetError::Storage("connection refused".to_string()))
        }

        fn find_page(&self, _filter: &ShipFilter, _page: &PageRequest) -> Result<Page<Ship>> {
            Err(FleetError::Storage("connection refused".to_string()))
        }

        fn count(&self, _filter: &ShipFilter) -> Result<u64> {
            Err(FleetError::Storage("connection refused".to_string()))
        }
    }

    #[actix_web::test]
    async fn storage_failures_are_internal_errors() {
        let app = ship_app!(web::Data::new(AppState::new(BrokenRepository)));
        for req in [
            test::TestRequest::get().uri("/rest/ships").to_request(),
            test::TestRequest::get().uri("/rest/ships/1").to_request(),
            test::TestRequest::post()
                .uri("/rest/ships")
                .set_json(ship_payload("Falcon", 0.5, 10))
                .to_request(),
        ] {
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
            let body: ErrorResponse = test::read_body_json(resp).await;
            assert!(body.message.contains("connection refused"));
        }
    }

    #[actix_web::test]
    async fn openapi_json_describes_ship_routes() {
        let app = ship_app!(memory_state());
        let req = test::TestRequest::get()
            .uri("/rest/openapi.json")
            .to_request();
        let doc: Value = test::call_and_read_body_json(&app, req).await;
        assert!(doc["paths"]["/rest/ships/{id}"].is_object());
        assert!(doc["components"]["schemas"]["Ship"].is_object());
    }
}
