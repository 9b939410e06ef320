use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use carwash::config::AppConfig;
use carwash::db;
use carwash::routes;
use carwash::state::AppState;

// ── Helpers ──

fn test_config() -> AppConfig {
    AppConfig {
        port: 5000,
        database_url: ":memory:".to_string(),
        environment: "test".to_string(),
        allowed_origins: vec![],
        // high enough to stay out of the way unless a test lowers them
        api_rate_limit: 10_000,
        api_rate_window_secs: 15 * 60,
        create_rate_limit: 10_000,
        create_rate_window_secs: 60 * 60,
    }
}

fn test_state() -> Arc<AppState> {
    test_state_with(test_config())
}

fn test_state_with(config: AppConfig) -> Arc<AppState> {
    let conn = db::init_db(":memory:").unwrap();
    Arc::new(AppState::new(conn, config))
}

fn test_app(state: Arc<AppState>) -> Router {
    routes::router(state)
}

async fn request(
    app: Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(v) => {
            builder = builder.header("Content-Type", "application/json");
            Body::from(v.to_string())
        }
        None => Body::empty(),
    };

    let res = app.oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = res.status();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

fn sample_payload() -> Value {
    json!({
        "customerName": "Jane Doe",
        "carDetails": {"make": "Kia", "model": "Rio", "year": 2021, "type": "sedan"},
        "serviceType": "Basic Wash",
        "date": "2024-03-01",
        "timeslot": "09:00 AM",
        "duration": 30,
        "price": 25
    })
}

/// Create a booking through the API and return the stored record.
async fn create_booking(state: &Arc<AppState>, payload: Value) -> Value {
    let (status, body) = request(
        test_app(state.clone()),
        "POST",
        "/api/bookings",
        Some(payload),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {body}");
    body["data"].clone()
}

// ── Create ──

#[tokio::test]
async fn test_create_booking_returns_stored_record() {
    let state = test_state();
    let (status, body) = request(
        test_app(state),
        "POST",
        "/api/bookings",
        Some(sample_payload()),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Booking created successfully");
    assert!(body["data"]["id"].is_string());
    assert!(body["data"]["createdAt"].is_string());
    assert!(body["data"]["updatedAt"].is_string());
}

#[tokio::test]
async fn test_create_defaults_status_to_pending() {
    let state = test_state();
    let booking = create_booking(&state, sample_payload()).await;
    assert_eq!(booking["status"], "Pending");
    assert_eq!(booking["addons"], json!([]));
}

#[tokio::test]
async fn test_create_rejects_out_of_range_year() {
    let state = test_state();
    for year in [1899, 3000] {
        let mut payload = sample_payload();
        payload["carDetails"]["year"] = json!(year);
        let (status, body) =
            request(test_app(state.clone()), "POST", "/api/bookings", Some(payload)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "year {year}");
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Validation failed");
        let errors = body["errors"].as_array().unwrap();
        assert_eq!(errors[0]["field"], "carDetails.year");
        assert_eq!(errors[0]["value"], json!(year));
    }
}

#[tokio::test]
async fn test_create_reports_every_violation() {
    let state = test_state();
    let (status, body) =
        request(test_app(state), "POST", "/api/bookings", Some(json!({}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"customerName"));
    assert!(fields.contains(&"serviceType"));
    assert!(fields.contains(&"date"));
    assert!(fields.contains(&"price"));
}

#[tokio::test]
async fn test_create_rejects_null_status_and_addons() {
    // null is not an omission for these fields; without a validation error
    // the typed payload would fail to deserialize and surface as a 500
    let state = test_state();
    let mut payload = sample_payload();
    payload["status"] = Value::Null;
    payload["addons"] = Value::Null;

    let (status, body) = request(test_app(state), "POST", "/api/bookings", Some(payload)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Validation failed");
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"status"));
    assert!(fields.contains(&"addons"));
}

#[tokio::test]
async fn test_create_rejects_malformed_json_body() {
    let state = test_state();
    let res = test_app(state)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/bookings")
                .header("Content-Type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["success"], false);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_create_sanitizes_input() {
    let state = test_state();
    let mut payload = sample_payload();
    payload["customerName"] = json!("  Jane Doe  ");
    payload["carDetails"]["make"] = json!(" Kia ");
    payload["carDetails"]["type"] = json!("SUV");

    let booking = create_booking(&state, payload).await;
    assert_eq!(booking["customerName"], "Jane Doe");
    assert_eq!(booking["carDetails"]["make"], "Kia");
    assert_eq!(booking["carDetails"]["type"], "suv");
}

// ── Get / delete ──

#[tokio::test]
async fn test_create_get_delete_round_trip() {
    let state = test_state();
    let created = create_booking(&state, sample_payload()).await;
    let id = created["id"].as_str().unwrap();

    let (status, body) =
        request(test_app(state.clone()), "GET", &format!("/api/bookings/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], created);

    let (status, body) = request(
        test_app(state.clone()),
        "DELETE",
        &format!("/api/bookings/{id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Booking deleted successfully");

    let (status, _) =
        request(test_app(state), "GET", &format!("/api/bookings/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_unknown_id_returns_404() {
    let state = test_state();
    let (status, body) =
        request(test_app(state), "GET", "/api/bookings/no-such-id", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Booking not found");
}

#[tokio::test]
async fn test_delete_unknown_id_returns_404() {
    let state = test_state();
    let (status, _) =
        request(test_app(state), "DELETE", "/api/bookings/no-such-id", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ── Update ──

#[tokio::test]
async fn test_update_replaces_record() {
    let state = test_state();
    let created = create_booking(&state, sample_payload()).await;
    let id = created["id"].as_str().unwrap();

    let mut payload = sample_payload();
    payload["serviceType"] = json!("Full Detailing");
    payload["price"] = json!(120);
    payload["duration"] = json!(120);
    payload["rating"] = json!(5);

    let (status, body) = request(
        test_app(state.clone()),
        "PUT",
        &format!("/api/bookings/{id}"),
        Some(payload),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Booking updated successfully");
    assert_eq!(body["data"]["serviceType"], "Full Detailing");
    assert_eq!(body["data"]["rating"], 5);
    // identifier and creation time survive a full replace
    assert_eq!(body["data"]["id"], created["id"]);
    assert_eq!(body["data"]["createdAt"], created["createdAt"]);
}

#[tokio::test]
async fn test_status_transitions_are_unrestricted() {
    let state = test_state();
    let created = create_booking(&state, sample_payload()).await;
    let id = created["id"].as_str().unwrap().to_string();

    // any status may follow any other, including Completed back to Pending
    for status_name in ["Completed", "Pending", "Cancelled", "Confirmed"] {
        let mut payload = sample_payload();
        payload["status"] = json!(status_name);
        let (status, body) = request(
            test_app(state.clone()),
            "PUT",
            &format!("/api/bookings/{id}"),
            Some(payload),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "transition to {status_name}");
        assert_eq!(body["data"]["status"], status_name);
    }
}

#[tokio::test]
async fn test_update_unknown_id_returns_404() {
    let state = test_state();
    let (status, _) = request(
        test_app(state),
        "PUT",
        "/api/bookings/no-such-id",
        Some(sample_payload()),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_validates_payload() {
    let state = test_state();
    let created = create_booking(&state, sample_payload()).await;
    let id = created["id"].as_str().unwrap();

    let mut payload = sample_payload();
    payload["duration"] = json!(5);
    let (status, body) = request(
        test_app(state),
        "PUT",
        &format!("/api/bookings/{id}"),
        Some(payload),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["field"], "duration");
}

// ── List / filter / paginate ──

async fn seed_listing_fixtures(state: &Arc<AppState>) {
    for (name, service, date, status) in [
        ("Alice", "Basic Wash", "2024-03-01", "Pending"),
        ("Bob", "Deluxe Wash", "2024-03-03", "Confirmed"),
        ("Carol", "Deluxe Wash", "2024-03-05", "Completed"),
        ("Dave", "Full Detailing", "2024-03-07", "Pending"),
    ] {
        let mut payload = sample_payload();
        payload["customerName"] = json!(name);
        payload["serviceType"] = json!(service);
        payload["date"] = json!(date);
        payload["status"] = json!(status);
        create_booking(state, payload).await;
    }
}

#[tokio::test]
async fn test_list_returns_all_sorted_by_date_desc() {
    let state = test_state();
    seed_listing_fixtures(&state).await;

    let (status, body) = request(test_app(state), "GET", "/api/bookings", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["totalBookings"], 4);

    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["customerName"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Dave", "Carol", "Bob", "Alice"]);
}

#[tokio::test]
async fn test_list_filters_by_service_type() {
    let state = test_state();
    seed_listing_fixtures(&state).await;

    let (status, body) = request(
        test_app(state),
        "GET",
        "/api/bookings?serviceType=Deluxe%20Wash",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);
    assert!(data.iter().all(|b| b["serviceType"] == "Deluxe Wash"));
}

#[tokio::test]
async fn test_list_combines_service_and_date_range() {
    let state = test_state();
    seed_listing_fixtures(&state).await;

    // inclusive range keeps Bob (03-03) but the service filter drops Alice
    let (status, body) = request(
        test_app(state),
        "GET",
        "/api/bookings?serviceType=Deluxe%20Wash&dateFrom=2024-03-01&dateTo=2024-03-03",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["customerName"], "Bob");
}

#[tokio::test]
async fn test_list_filters_by_status_and_car_type() {
    let state = test_state();
    seed_listing_fixtures(&state).await;

    let (_, body) =
        request(test_app(state.clone()), "GET", "/api/bookings?status=Pending", None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let (_, body) =
        request(test_app(state.clone()), "GET", "/api/bookings?carType=sedan", None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 4);

    // unknown filter value matches nothing rather than erroring
    let (status, body) =
        request(test_app(state), "GET", "/api/bookings?carType=boat", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_list_rejects_malformed_date_param() {
    let state = test_state();
    let (status, body) = request(
        test_app(state),
        "GET",
        "/api/bookings?dateFrom=yesterday",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_list_rejects_non_numeric_page_with_json_error() {
    let state = test_state();
    let (status, body) =
        request(test_app(state), "GET", "/api/bookings?page=abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_list_pagination_windows() {
    let state = test_state();
    seed_listing_fixtures(&state).await;

    let (_, body) = request(
        test_app(state.clone()),
        "GET",
        "/api/bookings?limit=2&page=2",
        None,
    )
    .await;
    assert_eq!(body["pagination"]["current"], 2);
    assert_eq!(body["pagination"]["total"], 2);
    assert_eq!(body["pagination"]["totalBookings"], 4);
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["customerName"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Bob", "Alice"]);
}

#[tokio::test]
async fn test_list_clamps_limit_and_page() {
    let state = test_state();
    seed_listing_fixtures(&state).await;

    // limit above the cap is clamped to 50
    let (_, body) = request(
        test_app(state.clone()),
        "GET",
        "/api/bookings?limit=9999",
        None,
    )
    .await;
    assert_eq!(body["pagination"]["total"], 1);

    // page below 1 is treated as page 1, never a negative skip
    let (status, body) =
        request(test_app(state), "GET", "/api/bookings?page=0", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["current"], 1);
    assert_eq!(body["data"].as_array().unwrap().len(), 4);
}

// ── Search ──

#[tokio::test]
async fn test_search_matches_name_make_model_case_insensitively() {
    let state = test_state();
    let mut payload = sample_payload();
    payload["carDetails"]["make"] = json!("Toyota");
    payload["carDetails"]["model"] = json!("Corolla");
    create_booking(&state, payload).await;

    for q in ["jane", "JANE", "toyo", "roll"] {
        let (status, body) = request(
            test_app(state.clone()),
            "GET",
            &format!("/api/bookings/search?q={q}"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK, "query {q}");
        assert_eq!(body["data"].as_array().unwrap().len(), 1, "query {q}");
    }

    let (status, body) = request(
        test_app(state),
        "GET",
        "/api/bookings/search?q=tesla",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_search_requires_query() {
    let state = test_state();

    // missing and blank q are both rejected; the literal /search route is
    // matched before the :id wildcard, so this is a 400, not a lookup of
    // a booking with id "search"
    for uri in ["/api/bookings/search", "/api/bookings/search?q=", "/api/bookings/search?q=%20"] {
        let (status, body) = request(test_app(state.clone()), "GET", uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "uri {uri}");
        assert_eq!(body["message"], "Search query is required");
    }
}

// ── Health / catalog / frontend ──

#[tokio::test]
async fn test_health_reports_database_and_uptime() {
    let state = test_state();
    create_booking(&state, sample_payload()).await;

    for uri in ["/health", "/api/health"] {
        let (status, body) = request(test_app(state.clone()), "GET", uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["status"], "OK");
        assert_eq!(body["data"]["database"]["status"], "connected");
        assert_eq!(body["data"]["database"]["totalBookings"], 1);
        assert_eq!(body["data"]["environment"], "test");
    }
}

#[tokio::test]
async fn test_catalog_lists_business_constants() {
    let state = test_state();
    let (status, body) = request(test_app(state), "GET", "/api/catalog", None).await;

    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["serviceTypes"].as_array().unwrap().len(), 3);
    assert_eq!(data["serviceTypes"][0]["name"], "Basic Wash");
    assert_eq!(data["serviceTypes"][0]["basePrice"], 25.0);
    assert_eq!(data["addons"].as_array().unwrap().len(), 5);
    assert_eq!(data["timeslots"].as_array().unwrap().len(), 8);
    assert_eq!(data["carTypes"].as_array().unwrap().len(), 6);
}

#[tokio::test]
async fn test_root_serves_frontend() {
    let state = test_state();
    let app = test_app(state);
    let res = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("Car Wash Bookings"));
}

// ── Rate limiting ──

#[tokio::test]
async fn test_booking_creation_rate_limit() {
    let mut config = test_config();
    config.create_rate_limit = 2;
    let state = test_state_with(config);

    for _ in 0..2 {
        let (status, _) = request(
            test_app(state.clone()),
            "POST",
            "/api/bookings",
            Some(sample_payload()),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = request(
        test_app(state),
        "POST",
        "/api/bookings",
        Some(sample_payload()),
    )
    .await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_general_api_rate_limit() {
    let mut config = test_config();
    config.api_rate_limit = 3;
    let state = test_state_with(config);

    for _ in 0..3 {
        let (status, _) = request(test_app(state.clone()), "GET", "/api/bookings", None).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = request(test_app(state), "GET", "/api/bookings", None).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["message"], "Too many requests, please try again later");
}
