//! Integration tests for Truckshift

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use std::collections::HashMap;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;
use truckshift::api::{create_router, AppState};
use truckshift::models::{BookingRequest, NewStaff};
use truckshift::{AppConfig, CsvStore, ErrorCode, FoodTruck};

fn config_for(dir: &TempDir) -> AppConfig {
    let vars: HashMap<&str, String> = [
        ("DATA_DIR", dir.path().join("data").display().to_string()),
        ("TRUCK_NAME", "Taco Bus".to_string()),
        ("TRUCK_LOCATION", "Pier 9".to_string()),
    ]
    .into_iter()
    .collect();
    AppConfig::from_lookup(|k| vars.get(k).cloned()).unwrap()
}

fn staff(email: &str, first: &str) -> NewStaff {
    NewStaff {
        email: email.into(),
        password: "pw".into(),
        first: first.into(),
        last: "Lopez".into(),
        ..Default::default()
    }
}

fn booking(email: &str) -> BookingRequest {
    BookingRequest {
        manager: "Sam".into(),
        date: "2025-03-07".into(),
        time: "09:00".into(),
        staff_email: email.into(),
        work_time: "4h".into(),
    }
}

#[test]
fn test_state_from_config_creates_data_files() {
    let dir = TempDir::new().unwrap();
    let config = config_for(&dir);
    let _state = AppState::from_config(&config).unwrap();

    let users = std::fs::read_to_string(dir.path().join("data/users.csv")).unwrap();
    assert_eq!(
        users,
        "Email,Password,First_Name,Last_Name,Mobile_Number,Address,DOB,Sex\n"
    );
    let schedules = std::fs::read_to_string(dir.path().join("data/schedules.csv")).unwrap();
    assert_eq!(schedules, "Manager,Date,Time,staff_Email,staff_Name,work_Time\n");
}

#[test]
fn test_data_survives_restart() {
    let dir = TempDir::new().unwrap();
    let store = CsvStore::new(dir.path());

    {
        let mut truck = FoodTruck::new("T", "L").with_pepper("pepper");
        truck.add_staff(&store, &staff("ana@truck.io", "Ana")).unwrap();
        truck.book_schedule(&store, &booking("ana@truck.io")).unwrap();
    }

    // Fresh process: reload and the slot is still taken
    let mut truck = FoodTruck::new("T", "L").with_pepper("pepper");
    truck.load_staff_from_store(&store).unwrap();
    truck.load_schedules_from_store(&store).unwrap();
    assert_eq!(truck.list_staff().len(), 1);
    assert!(!truck.is_time_slot_available("ana@truck.io", "2025-03-07", "09:00"));

    let err = truck.book_schedule(&store, &booking("ana@truck.io")).unwrap_err();
    assert_eq!(err.code, ErrorCode::ScheduleConflict);
}

#[test]
fn test_legacy_rows_without_digest_load() {
    let dir = TempDir::new().unwrap();
    let store = CsvStore::new(dir.path());
    std::fs::write(
        store.staff_path(),
        "Email,Password,First_Name,Last_Name,Mobile_Number,Address,DOB,Sex\nold@truck.io,plain,Old,Timer,,,,\n",
    )
    .unwrap();

    let mut truck = FoodTruck::new("T", "L");
    truck.load_staff_from_store(&store).unwrap();
    assert_eq!(truck.find_staff("OLD@truck.io").map(|s| s.full_name()), Some("Old Timer".to_string()));
}

#[tokio::test]
async fn test_concurrent_bookings_one_winner() {
    let dir = TempDir::new().unwrap();
    let state = Arc::new(AppState::from_config(&config_for(&dir)).unwrap());
    {
        let mut truck = state.truck.lock().await;
        truck.add_staff(&state.store, &staff("ana@truck.io", "Ana")).unwrap();
    }
    let app = create_router(state.clone());

    let body = r#"{"manager":"Sam","date":"2025-03-07","time":"09:00","staff_email":"ana@truck.io","work_time":"4h"}"#;
    let mut handles = Vec::new();
    for _ in 0..16 {
        let app = app.clone();
        handles.push(tokio::spawn(async move {
            let request = Request::builder()
                .method("POST")
                .uri("/v1/schedules")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body))
                .unwrap();
            app.oneshot(request).await.unwrap().status()
        }));
    }

    let mut created = 0;
    let mut conflicts = 0;
    for handle in handles {
        match handle.await.unwrap() {
            StatusCode::CREATED => created += 1,
            StatusCode::CONFLICT => conflicts += 1,
            other => panic!("unexpected status {}", other),
        }
    }
    assert_eq!(created, 1);
    assert_eq!(conflicts, 15);
    assert_eq!(state.store.load_schedules().unwrap().len(), 1);
}

#[test]
fn test_truck_defaults_from_config() {
    let cfg = AppConfig::from_lookup(|_| None).unwrap();
    let truck = FoodTruck::new(&cfg.truck_name, &cfg.truck_location);
    assert_eq!(truck.intro(), "CS120 Food Truck is serving food at GSU Campus!");
}
