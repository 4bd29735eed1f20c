use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use clinic_booking::auth::{password, JwtManager};
use clinic_booking::config::AppConfig;
use clinic_booking::db::{self, queries};
use clinic_booking::handlers;
use clinic_booking::models::{Role, User};
use clinic_booking::state::AppState;

// ── Helpers ──

fn test_config() -> AppConfig {
    AppConfig {
        port: 5000,
        database_url: ":memory:".to_string(),
        jwt_secret: "test-secret".to_string(),
        jwt_ttl_secs: 3600,
    }
}

fn test_state() -> Arc<AppState> {
    let config = test_config();
    let conn = db::init_db(":memory:").unwrap();
    Arc::new(AppState {
        db: Arc::new(Mutex::new(conn)),
        config,
    })
}

fn test_app(state: Arc<AppState>) -> Router {
    handlers::router(state)
}

fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    match body {
        Some(json) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

/// Register a user through the API and return (token, user_id).
async fn register_user(app: &Router, name: &str, email: &str) -> (String, String) {
    let (status, body) = send(
        app,
        request(
            "POST",
            "/api/auth/register",
            None,
            Some(json!({
                "name": name,
                "email": email,
                "password": "password123",
                "phone": "+15551110000",
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let token = body["token"].as_str().unwrap().to_string();
    let user_id = body["user"]["id"].as_str().unwrap().to_string();
    (token, user_id)
}

/// Insert an admin account directly and mint a token for it.
fn seed_admin(state: &Arc<AppState>) -> String {
    let admin = User {
        id: "admin-1".to_string(),
        name: "Administrator".to_string(),
        email: "admin@clinic.test".to_string(),
        password_hash: password::hash_password("admin123").unwrap(),
        phone: "+15559990000".to_string(),
        role: Role::Admin,
        created_at: chrono::Utc::now().naive_utc(),
    };
    {
        let db = state.db.lock().unwrap();
        queries::create_user(&db, &admin).unwrap();
    }
    JwtManager::new(b"test-secret", 3600)
        .issue(&admin.id, Role::Admin)
        .unwrap()
}

fn booking_body(date: &str, time: &str) -> Value {
    json!({
        "name": "Alice",
        "email": "alice@example.com",
        "phone": "+15551110000",
        "service": "Individual Therapy",
        "date": date,
        "time": time,
    })
}

const FULL_TEMPLATE: [&str; 9] = [
    "09:00", "10:00", "11:00", "12:00", "14:00", "15:00", "16:00", "17:00", "18:00",
];

fn as_str_vec(value: &Value) -> Vec<String> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect()
}

// ── Health ──

#[tokio::test]
async fn test_health() {
    let app = test_app(test_state());
    let (status, body) = send(&app, request("GET", "/health", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

// ── Auth ──

#[tokio::test]
async fn test_register_then_login() {
    let app = test_app(test_state());
    register_user(&app, "Alice", "alice@example.com").await;

    let (status, body) = send(
        &app,
        request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({"email": "alice@example.com", "password": "password123"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["token"].is_string());
    assert_eq!(body["user"]["email"], "alice@example.com");
    assert!(body["user"].get("password_hash").is_none());
}

#[tokio::test]
async fn test_register_missing_fields() {
    let app = test_app(test_state());
    let (status, _) = send(
        &app,
        request(
            "POST",
            "/api/auth/register",
            None,
            Some(json!({"name": "Alice", "email": "alice@example.com"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let app = test_app(test_state());
    register_user(&app, "Alice", "alice@example.com").await;

    let (status, _) = send(
        &app,
        request(
            "POST",
            "/api/auth/register",
            None,
            Some(json!({
                "name": "Other Alice",
                "email": "alice@example.com",
                "password": "different",
                "phone": "+15552220000",
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = test_app(test_state());
    register_user(&app, "Alice", "alice@example.com").await;

    let (status, _) = send(
        &app,
        request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({"email": "alice@example.com", "password": "wrong"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_login_rejects_regular_user() {
    let state = test_state();
    let app = test_app(Arc::clone(&state));
    register_user(&app, "Alice", "alice@example.com").await;

    let (status, _) = send(
        &app,
        request(
            "POST",
            "/api/auth/admin/login",
            None,
            Some(json!({"email": "alice@example.com", "password": "password123"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    seed_admin(&state);
    let (status, body) = send(
        &app,
        request(
            "POST",
            "/api/auth/admin/login",
            None,
            Some(json!({"email": "admin@clinic.test", "password": "admin123"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["role"], "admin");
}

// ── Availability ──

#[tokio::test]
async fn test_available_times_empty_day_full_template() {
    let app = test_app(test_state());
    let (status, body) = send(
        &app,
        request("GET", "/api/bookings/available-times/2025-06-01", None, None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(as_str_vec(&body["availableTimes"]), FULL_TEMPLATE.to_vec());
    assert!(body["bookedTimes"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_available_times_invalid_date() {
    let app = test_app(test_state());
    let (status, _) = send(
        &app,
        request("GET", "/api/bookings/available-times/not-a-date", None, None),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_available_times_normalizes_datetime() {
    let app = test_app(test_state());
    let (token, _) = register_user(&app, "Alice", "alice@example.com").await;

    let (status, _) = send(
        &app,
        request(
            "POST",
            "/api/bookings",
            Some(&token),
            Some(booking_body("2025-06-01", "10:00")),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // Same day addressed with a time-of-day component.
    let (status, body) = send(
        &app,
        request(
            "GET",
            "/api/bookings/available-times/2025-06-01T08:15:00Z",
            None,
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(as_str_vec(&body["bookedTimes"]), vec!["10:00"]);
}

// ── Booking lifecycle ──

#[tokio::test]
async fn test_create_booking_requires_auth() {
    let app = test_app(test_state());
    let (status, _) = send(
        &app,
        request(
            "POST",
            "/api/bookings",
            None,
            Some(booking_body("2025-06-01", "10:00")),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_booking_missing_fields() {
    let app = test_app(test_state());
    let (token, _) = register_user(&app, "Alice", "alice@example.com").await;

    for field in ["name", "email", "phone", "service", "date", "time"] {
        let mut body = booking_body("2025-06-01", "10:00");
        body.as_object_mut().unwrap().remove(field);

        let (status, _) = send(
            &app,
            request("POST", "/api/bookings", Some(&token), Some(body)),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "missing {field}");
    }

    // No record was created by any of the failed attempts.
    let (_, body) = send(
        &app,
        request("GET", "/api/bookings/my-bookings", Some(&token), None),
    )
    .await;
    assert!(body["bookings"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_create_booking_rejects_non_template_time() {
    let app = test_app(test_state());
    let (token, _) = register_user(&app, "Alice", "alice@example.com").await;

    // 13:00 is the lunch break, never offered as a slot.
    let (status, _) = send(
        &app,
        request(
            "POST",
            "/api/bookings",
            Some(&token),
            Some(booking_body("2025-06-01", "13:00")),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = send(
        &app,
        request("GET", "/api/bookings/my-bookings", Some(&token), None),
    )
    .await;
    assert!(body["bookings"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_create_booking_invalid_date() {
    let app = test_app(test_state());
    let (token, _) = register_user(&app, "Alice", "alice@example.com").await;

    let (status, _) = send(
        &app,
        request(
            "POST",
            "/api/bookings",
            Some(&token),
            Some(booking_body("June 1st", "10:00")),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_slot_lifecycle_end_to_end() {
    let app = test_app(test_state());
    let (token_a, _) = register_user(&app, "Alice", "alice@example.com").await;
    let (token_b, _) = register_user(&app, "Bob", "bob@example.com").await;

    // 1. Empty day: all 9 slots free.
    let (status, body) = send(
        &app,
        request("GET", "/api/bookings/available-times/2025-06-01", None, None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(as_str_vec(&body["availableTimes"]).len(), 9);
    assert!(body["bookedTimes"].as_array().unwrap().is_empty());

    // 2. Alice books 10:00.
    let (status, body) = send(
        &app,
        request(
            "POST",
            "/api/bookings",
            Some(&token_a),
            Some(booking_body("2025-06-01", "10:00")),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["booking"]["status"], "pending");
    let booking_id = body["booking"]["id"].as_str().unwrap().to_string();

    // 3. 10:00 is now taken.
    let (_, body) = send(
        &app,
        request("GET", "/api/bookings/available-times/2025-06-01", None, None),
    )
    .await;
    let available = as_str_vec(&body["availableTimes"]);
    assert!(!available.contains(&"10:00".to_string()));
    assert_eq!(as_str_vec(&body["bookedTimes"]), vec!["10:00"]);

    // 4. Bob cannot take the same slot.
    let (status, _) = send(
        &app,
        request(
            "POST",
            "/api/bookings",
            Some(&token_b),
            Some(booking_body("2025-06-01", "10:00")),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // 5. Alice cancels.
    let (status, _) = send(
        &app,
        request(
            "PATCH",
            &format!("/api/bookings/{booking_id}"),
            Some(&token_a),
            Some(json!({"status": "cancelled"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // 6. 10:00 is free again.
    let (_, body) = send(
        &app,
        request("GET", "/api/bookings/available-times/2025-06-01", None, None),
    )
    .await;
    assert!(as_str_vec(&body["availableTimes"]).contains(&"10:00".to_string()));
}

#[tokio::test]
async fn test_deleting_booking_frees_slot() {
    let app = test_app(test_state());
    let (token, _) = register_user(&app, "Alice", "alice@example.com").await;

    let (_, body) = send(
        &app,
        request(
            "POST",
            "/api/bookings",
            Some(&token),
            Some(booking_body("2025-06-01", "14:00")),
        ),
    )
    .await;
    let booking_id = body["booking"]["id"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app,
        request(
            "DELETE",
            &format!("/api/bookings/{booking_id}"),
            Some(&token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(
        &app,
        request("GET", "/api/bookings/available-times/2025-06-01", None, None),
    )
    .await;
    assert!(as_str_vec(&body["availableTimes"]).contains(&"14:00".to_string()));
}

#[tokio::test]
async fn test_reactivating_cancelled_booking_into_taken_slot_conflicts() {
    let app = test_app(test_state());
    let (token_a, _) = register_user(&app, "Alice", "alice@example.com").await;
    let (token_b, _) = register_user(&app, "Bob", "bob@example.com").await;

    let (_, body) = send(
        &app,
        request(
            "POST",
            "/api/bookings",
            Some(&token_a),
            Some(booking_body("2025-06-01", "10:00")),
        ),
    )
    .await;
    let alice_booking = body["booking"]["id"].as_str().unwrap().to_string();

    send(
        &app,
        request(
            "PATCH",
            &format!("/api/bookings/{alice_booking}"),
            Some(&token_a),
            Some(json!({"status": "cancelled"})),
        ),
    )
    .await;

    // Bob takes the freed slot.
    let (status, _) = send(
        &app,
        request(
            "POST",
            "/api/bookings",
            Some(&token_b),
            Some(booking_body("2025-06-01", "10:00")),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // Alice cannot re-activate into the retaken slot.
    let (status, _) = send(
        &app,
        request(
            "PATCH",
            &format!("/api/bookings/{alice_booking}"),
            Some(&token_a),
            Some(json!({"status": "pending"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_double_insert_same_slot_fails_at_store() {
    // The store-level guarantee behind the HTTP 409: even two inserts
    // that both passed an availability check cannot both land.
    let state = test_state();
    let app = test_app(Arc::clone(&state));
    let (_, user_id) = register_user(&app, "Alice", "alice@example.com").await;

    let now = chrono::Utc::now().naive_utc();
    let make = |id: &str| clinic_booking::models::Booking {
        id: id.to_string(),
        user_id: user_id.clone(),
        name: "Alice".to_string(),
        email: "alice@example.com".to_string(),
        phone: "+15551110000".to_string(),
        service: "Individual Therapy".to_string(),
        date: chrono::NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
        time: "10:00".to_string(),
        status: clinic_booking::models::BookingStatus::Pending,
        notes: None,
        created_at: now,
        updated_at: now,
    };

    let db = state.db.lock().unwrap();
    queries::create_booking(&db, &make("b-1")).unwrap();
    let err = queries::create_booking(&db, &make("b-2")).unwrap_err();
    assert!(queries::is_unique_violation(&err));
}

#[tokio::test]
async fn test_status_transitions_are_unrestricted() {
    let app = test_app(test_state());
    let (token, _) = register_user(&app, "Alice", "alice@example.com").await;

    let (_, body) = send(
        &app,
        request(
            "POST",
            "/api/bookings",
            Some(&token),
            Some(booking_body("2025-06-01", "11:00")),
        ),
    )
    .await;
    let id = body["booking"]["id"].as_str().unwrap().to_string();

    for status_name in ["confirmed", "pending", "confirmed", "cancelled"] {
        let (status, body) = send(
            &app,
            request(
                "PATCH",
                &format!("/api/bookings/{id}"),
                Some(&token),
                Some(json!({"status": status_name})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["booking"]["status"], status_name);
    }
}

#[tokio::test]
async fn test_update_rejects_unknown_status() {
    let app = test_app(test_state());
    let (token, _) = register_user(&app, "Alice", "alice@example.com").await;

    let (_, body) = send(
        &app,
        request(
            "POST",
            "/api/bookings",
            Some(&token),
            Some(booking_body("2025-06-01", "11:00")),
        ),
    )
    .await;
    let id = body["booking"]["id"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app,
        request(
            "PATCH",
            &format!("/api/bookings/{id}"),
            Some(&token),
            Some(json!({"status": "completed"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_missing_booking_is_404() {
    let app = test_app(test_state());
    let (token, _) = register_user(&app, "Alice", "alice@example.com").await;

    let (status, _) = send(
        &app,
        request(
            "PATCH",
            "/api/bookings/no-such-id",
            Some(&token),
            Some(json!({"status": "confirmed"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ── Ownership ──

#[tokio::test]
async fn test_non_owner_cannot_modify_booking() {
    let state = test_state();
    let app = test_app(Arc::clone(&state));
    let (token_a, _) = register_user(&app, "Alice", "alice@example.com").await;
    let (token_b, _) = register_user(&app, "Bob", "bob@example.com").await;
    let admin_token = seed_admin(&state);

    let (_, body) = send(
        &app,
        request(
            "POST",
            "/api/bookings",
            Some(&token_a),
            Some(booking_body("2025-06-01", "10:00")),
        ),
    )
    .await;
    let id = body["booking"]["id"].as_str().unwrap().to_string();

    // Bob can neither update nor delete Alice's booking.
    let (status, _) = send(
        &app,
        request(
            "PATCH",
            &format!("/api/bookings/{id}"),
            Some(&token_b),
            Some(json!({"status": "confirmed"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        request("DELETE", &format!("/api/bookings/{id}"), Some(&token_b), None),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // The owner and an admin both succeed.
    let (status, _) = send(
        &app,
        request(
            "PATCH",
            &format!("/api/bookings/{id}"),
            Some(&token_a),
            Some(json!({"notes": "please call ahead"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        request(
            "PATCH",
            &format!("/api/bookings/{id}"),
            Some(&admin_token),
            Some(json!({"status": "confirmed"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        request(
            "DELETE",
            &format!("/api/bookings/{id}"),
            Some(&admin_token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_my_bookings_only_shows_own() {
    let app = test_app(test_state());
    let (token_a, _) = register_user(&app, "Alice", "alice@example.com").await;
    let (token_b, _) = register_user(&app, "Bob", "bob@example.com").await;

    send(
        &app,
        request(
            "POST",
            "/api/bookings",
            Some(&token_a),
            Some(booking_body("2025-06-01", "10:00")),
        ),
    )
    .await;
    send(
        &app,
        request(
            "POST",
            "/api/bookings",
            Some(&token_b),
            Some(booking_body("2025-06-01", "11:00")),
        ),
    )
    .await;

    let (status, body) = send(
        &app,
        request("GET", "/api/bookings/my-bookings", Some(&token_a), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let bookings = body["bookings"].as_array().unwrap();
    assert_eq!(bookings.len(), 1);
    assert_eq!(bookings[0]["time"], "10:00");
}

// ── Admin booking listing ──

#[tokio::test]
async fn test_all_bookings_requires_admin() {
    let state = test_state();
    let app = test_app(Arc::clone(&state));
    let (token, _) = register_user(&app, "Alice", "alice@example.com").await;

    let (status, _) = send(&app, request("GET", "/api/bookings/all", None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        request("GET", "/api/bookings/all", Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_all_bookings_filter_and_pagination() {
    let state = test_state();
    let app = test_app(Arc::clone(&state));
    let admin_token = seed_admin(&state);
    let (token, _) = register_user(&app, "Alice", "alice@example.com").await;

    for (i, time) in ["09:00", "10:00", "11:00"].iter().enumerate() {
        let (status, body) = send(
            &app,
            request(
                "POST",
                "/api/bookings",
                Some(&token),
                Some(booking_body("2025-06-01", time)),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        if i == 0 {
            let id = body["booking"]["id"].as_str().unwrap().to_string();
            send(
                &app,
                request(
                    "PATCH",
                    &format!("/api/bookings/{id}"),
                    Some(&admin_token),
                    Some(json!({"status": "confirmed"})),
                ),
            )
            .await;
        }
    }

    let (status, body) = send(
        &app,
        request("GET", "/api/bookings/all", Some(&admin_token), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["totalBookings"], 3);

    let (_, body) = send(
        &app,
        request(
            "GET",
            "/api/bookings/all?status=confirmed",
            Some(&admin_token),
            None,
        ),
    )
    .await;
    assert_eq!(body["bookings"].as_array().unwrap().len(), 1);

    let (_, body) = send(
        &app,
        request(
            "GET",
            "/api/bookings/all?page=2&limit=2",
            Some(&admin_token),
            None,
        ),
    )
    .await;
    assert_eq!(body["bookings"].as_array().unwrap().len(), 1);
    assert_eq!(body["pagination"]["totalPages"], 2);
}

// ── Services ──

#[tokio::test]
async fn test_services_catalogue() {
    let app = test_app(test_state());

    let (status, body) = send(&app, request("GET", "/api/services", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 6);

    let (status, body) = send(&app, request("GET", "/api/services/2", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Couples Therapy");

    let (status, _) = send(&app, request("GET", "/api/services/99", None, None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ── Contact ──

#[tokio::test]
async fn test_contact_flow() {
    let state = test_state();
    let app = test_app(Arc::clone(&state));
    let admin_token = seed_admin(&state);

    // Open submission.
    let (status, body) = send(
        &app,
        request(
            "POST",
            "/api/contact",
            None,
            Some(json!({
                "name": "Carol",
                "email": "carol@example.com",
                "subject": "Opening hours",
                "message": "Are you open on weekends?",
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["contact"]["id"].as_str().unwrap().to_string();

    // Missing subject is rejected.
    let (status, _) = send(
        &app,
        request(
            "POST",
            "/api/contact",
            None,
            Some(json!({"name": "Carol", "email": "carol@example.com", "message": "hi"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Listing is admin-only.
    let (status, _) = send(&app, request("GET", "/api/contact/admin", None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(
        &app,
        request("GET", "/api/contact/admin", Some(&admin_token), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
    assert_eq!(body["contacts"][0]["status"], "new");

    // Status update.
    let (status, body) = send(
        &app,
        request(
            "PUT",
            &format!("/api/contact/admin/{id}/status"),
            Some(&admin_token),
            Some(json!({"status": "read"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "read");

    // Reply stamps who and when.
    let (status, body) = send(
        &app,
        request(
            "PUT",
            &format!("/api/contact/admin/{id}/reply"),
            Some(&admin_token),
            Some(json!({"adminNotes": "answered by email"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "replied");
    assert_eq!(body["replied_by"], "admin-1");
    assert!(body["replied_at"].is_string());

    // Delete.
    let (status, _) = send(
        &app,
        request(
            "DELETE",
            &format!("/api/contact/admin/{id}"),
            Some(&admin_token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        request(
            "GET",
            &format!("/api/contact/admin/{id}"),
            Some(&admin_token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ── FAQs ──

#[tokio::test]
async fn test_faq_flow() {
    let state = test_state();
    let app = test_app(Arc::clone(&state));
    let admin_token = seed_admin(&state);

    // Creation is admin-only.
    let (status, _) = send(
        &app,
        request(
            "POST",
            "/api/faqs",
            None,
            Some(json!({"question": "Q", "answer": "A"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(
        &app,
        request(
            "POST",
            "/api/faqs",
            Some(&admin_token),
            Some(json!({
                "question": "Do you accept insurance?",
                "answer": "Yes, most major plans.",
                "category": "billing",
                "order": 2,
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let billing_id = body["id"].as_str().unwrap().to_string();

    send(
        &app,
        request(
            "POST",
            "/api/faqs",
            Some(&admin_token),
            Some(json!({
                "question": "Where are you located?",
                "answer": "Downtown.",
                "order": 1,
            })),
        ),
    )
    .await;

    // Public list, ordered by display_order.
    let (status, body) = send(&app, request("GET", "/api/faqs", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    let faqs = body.as_array().unwrap();
    assert_eq!(faqs.len(), 2);
    assert_eq!(faqs[0]["question"], "Where are you located?");

    // Category filter.
    let (_, body) = send(
        &app,
        request("GET", "/api/faqs/category/billing", None, None),
    )
    .await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    // Deactivation hides from the public list.
    let (status, _) = send(
        &app,
        request(
            "PUT",
            &format!("/api/faqs/{billing_id}"),
            Some(&admin_token),
            Some(json!({"isActive": false})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, request("GET", "/api/faqs", None, None)).await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    // Delete.
    let (status, _) = send(
        &app,
        request(
            "DELETE",
            &format!("/api/faqs/{billing_id}"),
            Some(&admin_token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

// ── Blog ──

#[tokio::test]
async fn test_blog_flow() {
    let state = test_state();
    let app = test_app(Arc::clone(&state));
    let admin_token = seed_admin(&state);

    // Draft post.
    let (status, body) = send(
        &app,
        request(
            "POST",
            "/api/blog",
            Some(&admin_token),
            Some(json!({
                "title": "Managing Anxiety",
                "content": "Long form content...",
                "category": "self-help",
                "tags": ["anxiety", "tips"],
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let post_id = body["id"].as_str().unwrap().to_string();
    assert_eq!(body["is_published"], false);

    // Drafts are invisible publicly.
    let (_, body) = send(&app, request("GET", "/api/blog", None, None)).await;
    assert_eq!(body["total"], 0);

    let (status, _) = send(
        &app,
        request("GET", &format!("/api/blog/{post_id}"), None, None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // An admin can still read the draft.
    let (status, _) = send(
        &app,
        request(
            "GET",
            &format!("/api/blog/{post_id}"),
            Some(&admin_token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Publish.
    let (status, body) = send(
        &app,
        request(
            "PUT",
            &format!("/api/blog/{post_id}"),
            Some(&admin_token),
            Some(json!({"isPublished": true})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["published_at"].is_string());

    let (_, body) = send(&app, request("GET", "/api/blog", None, None)).await;
    assert_eq!(body["total"], 1);

    // Tag filter.
    let (_, body) = send(&app, request("GET", "/api/blog?tag=anxiety", None, None)).await;
    assert_eq!(body["total"], 1);
    let (_, body) = send(&app, request("GET", "/api/blog?tag=sleep", None, None)).await;
    assert_eq!(body["total"], 0);

    // Delete.
    let (status, _) = send(
        &app,
        request(
            "DELETE",
            &format!("/api/blog/{post_id}"),
            Some(&admin_token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

// ── Doctors ──

#[tokio::test]
async fn test_doctor_flow() {
    let state = test_state();
    let app = test_app(Arc::clone(&state));
    let admin_token = seed_admin(&state);

    // Creation is admin-only.
    let (status, _) = send(
        &app,
        request(
            "POST",
            "/api/doctors",
            None,
            Some(json!({"name": "Dr. Smith", "specialization": "CBT", "bio": "bio"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Missing bio is rejected.
    let (status, _) = send(
        &app,
        request(
            "POST",
            "/api/doctors",
            Some(&admin_token),
            Some(json!({"name": "Dr. Smith", "specialization": "CBT"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        request(
            "POST",
            "/api/doctors",
            Some(&admin_token),
            Some(json!({
                "name": "Dr. Smith",
                "specialization": "Cognitive Behavioral Therapy",
                "bio": "Fifteen years of clinical practice.",
                "experienceYears": 15,
                "education": "PhD in Clinical Psychology",
                "certificates": [
                    {"name": "CBT Certification", "institution": "Beck Institute", "year": 2012}
                ],
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let doctor_id = body["id"].as_str().unwrap().to_string();
    assert_eq!(body["experience_years"], 15);

    // Public list and get.
    let (status, body) = send(&app, request("GET", "/api/doctors", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, body) = send(
        &app,
        request("GET", &format!("/api/doctors/{doctor_id}"), None, None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["specialization"], "Cognitive Behavioral Therapy");
    assert_eq!(body["certificates"][0]["institution"], "Beck Institute");

    // Partial update leaves untouched fields alone.
    let (status, body) = send(
        &app,
        request(
            "PUT",
            &format!("/api/doctors/{doctor_id}"),
            Some(&admin_token),
            Some(json!({"experienceYears": 16})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["experience_years"], 16);
    assert_eq!(body["name"], "Dr. Smith");

    // Unknown id is 404.
    let (status, _) = send(&app, request("GET", "/api/doctors/no-such-id", None, None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Delete.
    let (status, _) = send(
        &app,
        request(
            "DELETE",
            &format!("/api/doctors/{doctor_id}"),
            Some(&admin_token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, request("GET", "/api/doctors", None, None)).await;
    assert!(body.as_array().unwrap().is_empty());
}

// ── Admin dashboard ──

#[tokio::test]
async fn test_dashboard_stats() {
    let state = test_state();
    let app = test_app(Arc::clone(&state));
    let admin_token = seed_admin(&state);
    let (token, _) = register_user(&app, "Alice", "alice@example.com").await;

    send(
        &app,
        request(
            "POST",
            "/api/bookings",
            Some(&token),
            Some(booking_body("2025-06-01", "10:00")),
        ),
    )
    .await;

    let (status, body) = send(
        &app,
        request("GET", "/api/admin/dashboard/stats", Some(&admin_token), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stats"]["totalUsers"], 1);
    assert_eq!(body["stats"]["totalBookings"], 1);
    assert_eq!(body["stats"]["pendingBookings"], 1);
    assert_eq!(
        body["stats"]["serviceStats"][0]["service"],
        "Individual Therapy"
    );
}

#[tokio::test]
async fn test_admin_users_listing() {
    let state = test_state();
    let app = test_app(Arc::clone(&state));
    let admin_token = seed_admin(&state);
    register_user(&app, "Alice", "alice@example.com").await;
    register_user(&app, "Bob", "bob@example.com").await;

    let (status, body) = send(
        &app,
        request("GET", "/api/admin/users", Some(&admin_token), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let users = body["users"].as_array().unwrap();
    // Admin accounts are excluded from the listing.
    assert_eq!(users.len(), 2);
    for user in users {
        assert!(user.get("password_hash").is_none());
        assert_ne!(user["role"], "admin");
    }
}

// ── Token edge cases ──

#[tokio::test]
async fn test_expired_token_rejected() {
    let state = test_state();
    let app = test_app(Arc::clone(&state));
    let (_, user_id) = register_user(&app, "Alice", "alice@example.com").await;

    let expired = JwtManager::new(b"test-secret", -120)
        .issue(&user_id, Role::User)
        .unwrap();

    let (status, _) = send(
        &app,
        request("GET", "/api/bookings/my-bookings", Some(&expired), None),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_for_deleted_account_is_forbidden() {
    let state = test_state();
    let app = test_app(Arc::clone(&state));
    let (token, user_id) = register_user(&app, "Alice", "alice@example.com").await;

    {
        let db = state.db.lock().unwrap();
        db.execute("DELETE FROM users WHERE id = ?1", [user_id.as_str()])
            .unwrap();
    }

    let (status, _) = send(
        &app,
        request("GET", "/api/bookings/my-bookings", Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
