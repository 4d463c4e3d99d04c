//! End-to-end HTTP tests against a real database

mod helpers;

use axum::http::StatusCode;
use serde_json::json;
use serial_test::serial;

use helpers::*;
use reservehub::models::{ResourceStatus, Role};

#[tokio::test]
#[serial]
async fn test_login_and_register() {
    let db = require_db!();
    let ctx = TestContext::new(db);
    create_test_user(&ctx.state.db, "admin@example.com", Role::Admin).await;

    let (status, body) = ctx.request("POST", "/api/auth/login", None, Some(json!({
        "email": "ADMIN@example.com",
        "password": TEST_PASSWORD
    }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "admin");
    assert!(body.get("password").is_none());

    let (status, body) = ctx.request("POST", "/api/auth/login", None, Some(json!({
        "email": "admin@example.com",
        "password": "wrong"
    }))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Authentication error: Invalid credentials");

    let register = json!({
        "first_name": "New",
        "last_name": "Client",
        "email": "new@example.com",
        "password": "pw"
    });
    let (status, body) = ctx.request("POST", "/api/auth/register", None, Some(register.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["role"], "client");

    let (status, _) = ctx.request("POST", "/api/auth/register", None, Some(register)).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let id = body["id"].as_i64().unwrap();
    let (status, me) = ctx.request("GET", "/api/auth/me", Some(id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["email"], "new@example.com");

    let (status, _) = ctx.request("GET", "/api/auth/me", Some(id + 100), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[serial]
async fn test_overlong_values_are_bad_request() {
    let db = require_db!();
    let ctx = TestContext::new(db);
    let admin = create_test_user(&ctx.state.db, "admin@example.com", Role::Admin).await;

    let (status, body) = ctx.request("POST", "/api/auth/register", None, Some(json!({
        "first_name": "N".repeat(150),
        "last_name": "Client",
        "email": "long@example.com",
        "password": "pw"
    }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("longer than allowed"));

    let (status, _) = ctx.request("POST", "/api/categories", Some(admin.id), Some(json!({
        "name": "c".repeat(150)
    }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let mut settings = serde_json::Map::new();
    settings.insert("k".repeat(150), json!("v"));
    let (status, _) = ctx.request("PUT", "/api/site-config", Some(admin.id), Some(settings.into())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(ctx.database.count_records("users").await.unwrap(), 1);
}

#[tokio::test]
#[serial]
async fn test_role_gates() {
    let db = require_db!();
    let ctx = TestContext::new(db);
    let admin = create_test_user(&ctx.state.db, "admin@example.com", Role::Admin).await;
    let manager = create_test_user(&ctx.state.db, "manager@example.com", Role::Manager).await;
    let client = create_test_user(&ctx.state.db, "client@example.com", Role::Client).await;

    let category = json!({ "name": "Rooms" });
    let (status, _) = ctx.request("POST", "/api/categories", Some(client.id), Some(category.clone())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = ctx.request("POST", "/api/categories", Some(manager.id), Some(category)).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = ctx.request("GET", "/api/users", Some(client.id), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, users) = ctx.request("GET", "/api/users", Some(manager.id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(users.as_array().unwrap().len(), 3);

    // Clients may read themselves but nobody else
    let (status, _) = ctx.request("GET", &format!("/api/users/{}", client.id), Some(client.id), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = ctx.request("GET", &format!("/api/users/{}", admin.id), Some(client.id), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = ctx.request("DELETE", &format!("/api/users/{}", client.id), Some(manager.id), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = ctx.request("GET", "/api/dashboard/stats", Some(client.id), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = ctx.request("PUT", "/api/site-config", Some(manager.id), Some(json!({ "a": "b" }))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
#[serial]
async fn test_user_management() {
    let db = require_db!();
    let ctx = TestContext::new(db);
    let admin = create_test_user(&ctx.state.db, "admin@example.com", Role::Admin).await;
    let client = create_test_user(&ctx.state.db, "client@example.com", Role::Client).await;

    let (status, created) = ctx.request("POST", "/api/users", Some(admin.id), Some(json!({
        "first_name": "Mia",
        "last_name": "Manager",
        "email": "mia@example.com",
        "password": "pw",
        "role": "manager"
    }))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["role"], "manager");

    // Self-service updates may not touch the role
    let uri = format!("/api/users/{}", client.id);
    let (status, _) = ctx.request("PUT", &uri, Some(client.id), Some(json!({ "role": "admin" }))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, updated) = ctx.request("PUT", &uri, Some(client.id), Some(json!({ "phone": "555-0100" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["phone"], "555-0100");
    assert_eq!(updated["first_name"], "Test");

    let (status, _) = ctx.request("DELETE", &format!("/api/users/{}", admin.id), Some(admin.id), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = ctx.request("DELETE", &uri, Some(admin.id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = ctx.request("DELETE", &uri, Some(admin.id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[serial]
async fn test_resources_and_availability() {
    let db = require_db!();
    let ctx = TestContext::new(db);
    let manager = create_test_user(&ctx.state.db, "manager@example.com", Role::Manager).await;
    let client = create_test_user(&ctx.state.db, "client@example.com", Role::Client).await;
    let rooms = create_test_category(&ctx.state.db, "Rooms").await;
    let room_a = create_test_resource(&ctx.state.db, "Room A", Some(rooms.id), ResourceStatus::Available).await;
    create_test_resource(&ctx.state.db, "Room B", Some(rooms.id), ResourceStatus::Available).await;
    create_test_resource(&ctx.state.db, "Van", None, ResourceStatus::Maintenance).await;

    let (status, list) = ctx.request("GET", &format!("/api/resources?category_id={}", rooms.id), Some(client.id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 2);

    let (_, list) = ctx.request("GET", "/api/resources?status=maintenance", Some(client.id), None).await;
    assert_eq!(list[0]["name"], "Van");

    let (status, _) = ctx.request("GET", "/api/resources?status=broken", Some(client.id), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = ctx.request("POST", "/api/resources", Some(manager.id), Some(json!({ "name": "  " }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (start, end) = slot(0, 2);
    let (status, _) = ctx.request("POST", "/api/reservations", Some(client.id), Some(json!({
        "resource_id": room_a.id,
        "start_time": start,
        "end_time": end
    }))).await;
    assert_eq!(status, StatusCode::CREATED);

    let (window_start, window_end) = slot(1, 3);
    let uri = format!(
        "/api/resources/available?start={}&end={}",
        window_start.to_rfc3339().replace('+', "%2B"),
        window_end.to_rfc3339().replace('+', "%2B")
    );
    let (status, available) = ctx.request("GET", &uri, Some(client.id), None).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<_> = available.as_array().unwrap().iter().map(|r| r["name"].clone()).collect();
    assert_eq!(names, vec![json!("Room B")]);

    let (status, reservations) = ctx.request("GET", &format!("/api/resources/{}/reservations", room_a.id), Some(client.id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reservations.as_array().unwrap().len(), 1);

    let (status, updated) = ctx.request("PUT", &format!("/api/resources/{}", room_a.id), Some(manager.id), Some(json!({ "status": "unavailable" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "unavailable");
    assert_eq!(updated["name"], "Room A");
}

#[tokio::test]
#[serial]
async fn test_reservation_endpoints() {
    let db = require_db!();
    let ctx = TestContext::new(db);
    let admin = create_test_user(&ctx.state.db, "admin@example.com", Role::Admin).await;
    let manager = create_test_user(&ctx.state.db, "manager@example.com", Role::Manager).await;
    let alice = create_test_user(&ctx.state.db, "alice@example.com", Role::Client).await;
    let bob = create_test_user(&ctx.state.db, "bob@example.com", Role::Client).await;
    let room = create_test_resource(&ctx.state.db, "Room A", None, ResourceStatus::Available).await;

    let (status, body) = ctx.request("POST", "/api/reservations", Some(alice.id), Some(json!({ "resource_id": room.id }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("required"));

    let (start, end) = slot(0, 2);
    let (status, reservation) = ctx.request("POST", "/api/reservations", Some(alice.id), Some(json!({
        "resource_id": room.id,
        "start_time": start,
        "end_time": end,
        "notes": "team meeting"
    }))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(reservation["status"], "pending");
    let id = reservation["id"].as_i64().unwrap();

    let (status, _) = ctx.request("POST", "/api/reservations", Some(bob.id), Some(json!({
        "resource_id": room.id,
        "start_time": slot(1, 3).0,
        "end_time": slot(1, 3).1
    }))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Clients only ever see their own reservations
    let (_, bobs) = ctx.request("GET", &format!("/api/reservations?user_id={}", alice.id), Some(bob.id), None).await;
    assert!(bobs.as_array().unwrap().is_empty());
    let (status, _) = ctx.request("GET", &format!("/api/reservations/{}", id), Some(bob.id), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (_, mine) = ctx.request("GET", "/api/reservations/mine", Some(alice.id), None).await;
    assert_eq!(mine.as_array().unwrap().len(), 1);
    let (_, all) = ctx.request("GET", "/api/reservations?status=pending", Some(manager.id), None).await;
    assert_eq!(all.as_array().unwrap().len(), 1);

    let status_uri = format!("/api/reservations/{}/status", id);
    let (status, _) = ctx.request("PUT", &status_uri, Some(alice.id), Some(json!({ "status": "confirmed" }))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = ctx.request("PUT", &status_uri, Some(manager.id), Some(json!({ "status": "bogus" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, confirmed) = ctx.request("PUT", &status_uri, Some(manager.id), Some(json!({ "status": "confirmed" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(confirmed["status"], "confirmed");

    // Owners may only edit while pending
    let (status, _) = ctx.request("PUT", &format!("/api/reservations/{}", id), Some(alice.id), Some(json!({ "notes": "x" }))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, cancelled) = ctx.request("PUT", &format!("/api/reservations/{}/cancel", id), Some(alice.id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cancelled["status"], "cancelled");

    let (status, _) = ctx.request("DELETE", &format!("/api/reservations/{}", id), Some(manager.id), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = ctx.request("DELETE", &format!("/api/reservations/{}", id), Some(admin.id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = ctx.request("GET", &format!("/api/reservations/{}", id), Some(admin.id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[serial]
async fn test_events_with_resources() {
    let db = require_db!();
    let ctx = TestContext::new(db);
    let manager = create_test_user(&ctx.state.db, "manager@example.com", Role::Manager).await;
    let room = create_test_resource(&ctx.state.db, "Room A", None, ResourceStatus::Available).await;
    let van = create_test_resource(&ctx.state.db, "Van", None, ResourceStatus::Available).await;

    let (start, end) = slot(0, 8);
    let (status, _) = ctx.request("POST", "/api/events", Some(manager.id), Some(json!({
        "title": "Offsite",
        "start_date": end,
        "end_date": start
    }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, event) = ctx.request("POST", "/api/events", Some(manager.id), Some(json!({
        "title": "Offsite",
        "start_date": start,
        "end_date": end,
        "resource_ids": [room.id]
    }))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(event["status"], "planned");
    assert_eq!(event["organizer_id"], manager.id);
    assert_eq!(event["resources"].as_array().unwrap().len(), 1);
    let id = event["id"].as_i64().unwrap();

    let (status, details) = ctx.request("POST", &format!("/api/events/{}/resources", id), Some(manager.id), Some(json!({ "resource_id": van.id }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(details["resources"].as_array().unwrap().len(), 2);

    let (status, _) = ctx.request("DELETE", &format!("/api/events/{}/resources/{}", id, room.id), Some(manager.id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = ctx.request("DELETE", &format!("/api/events/{}/resources/{}", id, room.id), Some(manager.id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // The merged window is validated, not just the submitted field
    let (status, _) = ctx.request("PUT", &format!("/api/events/{}", id), Some(manager.id), Some(json!({ "start_date": slot(9, 10).0 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, updated) = ctx.request("PUT", &format!("/api/events/{}", id), Some(manager.id), Some(json!({ "status": "ongoing" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "ongoing");

    let (_, list) = ctx.request("GET", "/api/events?status=ongoing", Some(manager.id), None).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[tokio::test]
#[serial]
async fn test_notifications_are_private() {
    let db = require_db!();
    let ctx = TestContext::new(db);
    create_test_user(&ctx.state.db, "manager@example.com", Role::Manager).await;
    let alice = create_test_user(&ctx.state.db, "alice@example.com", Role::Client).await;
    let bob = create_test_user(&ctx.state.db, "bob@example.com", Role::Client).await;
    let room = create_test_resource(&ctx.state.db, "Room A", None, ResourceStatus::Available).await;

    ctx.state.services.reservation_service
        .create(&alice, reservation_request(room.id, 0, 1))
        .await
        .unwrap();

    let (_, count) = ctx.request("GET", "/api/notifications/unread-count", Some(alice.id), None).await;
    assert_eq!(count["count"], 1);

    let (_, list) = ctx.request("GET", "/api/notifications", Some(alice.id), None).await;
    let notification_id = list[0]["id"].as_i64().unwrap();

    let (status, _) = ctx.request("PUT", &format!("/api/notifications/{}/read", notification_id), Some(bob.id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = ctx.request("DELETE", &format!("/api/notifications/{}", notification_id), Some(bob.id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, read) = ctx.request("PUT", &format!("/api/notifications/{}/read", notification_id), Some(alice.id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(read["is_read"], true);

    let (status, result) = ctx.request("PUT", "/api/notifications/read-all", Some(alice.id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["updated"], 0);

    let (status, _) = ctx.request("DELETE", &format!("/api/notifications/{}", notification_id), Some(alice.id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
#[serial]
async fn test_site_config_and_dashboard() {
    let db = require_db!();
    let ctx = TestContext::new(db);
    let admin = create_test_user(&ctx.state.db, "admin@example.com", Role::Admin).await;
    let client = create_test_user(&ctx.state.db, "client@example.com", Role::Client).await;
    let room = create_test_resource(&ctx.state.db, "Room A", None, ResourceStatus::Available).await;

    let (status, config) = ctx.request("GET", "/api/site-config", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(config, json!({}));

    let (status, config) = ctx.request("PUT", "/api/site-config", Some(admin.id), Some(json!({
        "site_name": "ReserveHub",
        "max_days_ahead": 30
    }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(config, json!({ "max_days_ahead": "30", "site_name": "ReserveHub" }));

    let (status, _) = ctx.request("DELETE", "/api/site-config/site_name", Some(admin.id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, config) = ctx.request("GET", "/api/site-config", None, None).await;
    assert_eq!(config, json!({ "max_days_ahead": "30" }));

    ctx.state.services.reservation_service
        .create(&client, reservation_request(room.id, 0, 1))
        .await
        .unwrap();

    let (status, stats) = ctx.request("GET", "/api/dashboard/stats", Some(admin.id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["users"]["total"], 2);
    assert_eq!(stats["resources"]["available"], 1);
    assert_eq!(stats["reservations"]["pending"], 1);
    assert_eq!(stats["events"]["total"], 0);

    let (status, mine) = ctx.request("GET", "/api/dashboard/me", Some(client.id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(mine["reservations"]["total"], 1);
    assert_eq!(mine["unread_notifications"], 1);

    let (status, health) = ctx.request("GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["status"], "ok");
}
