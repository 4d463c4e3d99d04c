//! Test data helpers for creating test records

use chrono::{DateTime, Duration, TimeZone, Utc};

use reservehub::database::DatabaseService;
use reservehub::models::{
    Category, CreateCategoryRequest, CreateReservationRequest, CreateResourceRequest,
    CreateUserRequest, Resource, ResourceStatus, Role, User,
};

pub const TEST_PASSWORD: &str = "password123";

/// Fixed reference point so intervals in assertions are easy to read
pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2030, 6, 1, 9, 0, 0).unwrap()
}

/// `[base + start_h, base + end_h)`
pub fn slot(start_h: i64, end_h: i64) -> (DateTime<Utc>, DateTime<Utc>) {
    let base = base_time();
    (base + Duration::hours(start_h), base + Duration::hours(end_h))
}

pub async fn create_test_user(db: &DatabaseService, email: &str, role: Role) -> User {
    db.users
        .create(CreateUserRequest {
            first_name: "Test".to_string(),
            last_name: role.as_str().to_string(),
            email: email.to_string(),
            password: TEST_PASSWORD.to_string(),
            role: Some(role),
            phone: None,
        })
        .await
        .expect("Failed to create test user")
}

pub async fn create_test_category(db: &DatabaseService, name: &str) -> Category {
    db.categories
        .create(CreateCategoryRequest {
            name: name.to_string(),
            description: None,
        })
        .await
        .expect("Failed to create test category")
}

pub async fn create_test_resource(
    db: &DatabaseService,
    name: &str,
    category_id: Option<i64>,
    status: ResourceStatus,
) -> Resource {
    db.resources
        .create(CreateResourceRequest {
            name: name.to_string(),
            description: Some("Test resource".to_string()),
            category_id,
            location: Some("Building A".to_string()),
            capacity: Some(10),
            status: Some(status),
        })
        .await
        .expect("Failed to create test resource")
}

pub fn reservation_request(resource_id: i64, start_h: i64, end_h: i64) -> CreateReservationRequest {
    let (start, end) = slot(start_h, end_h);
    CreateReservationRequest {
        resource_id: Some(resource_id),
        start_time: Some(start),
        end_time: Some(end),
        event_id: None,
        notes: None,
    }
}
