#![allow(dead_code)]

use axum::{body::Body, response::Response, Router};
use http::{header, Request};
use http_body_util::BodyExt;

use mapty::db::{create_memory_pool, DbPool};
use mapty::geolocation::StaticGeolocation;
use mapty::handlers::workouts::WorkoutsState;
use mapty::map::MapScene;
use mapty::migrations::run_migrations_for_tests;
use mapty::repositories::KeyValueRepository;
use mapty::tracker::{Tracker, TrackerSettings};

pub fn setup_test_db() -> DbPool {
    let pool = create_memory_pool().expect("Failed to create test database");
    run_migrations_for_tests(&pool).expect("Failed to run migrations");
    pool
}

pub struct TestApp {
    pub router: Router,
    pub state: WorkoutsState,
}

pub async fn create_test_app_with(pool: DbPool, geolocation: StaticGeolocation) -> TestApp {
    let mut tracker = Tracker::new(
        MapScene::new(),
        KeyValueRepository::new(pool),
        geolocation,
        TrackerSettings::default(),
    );
    let _ = tracker.initialize().await;

    let state = WorkoutsState::new(tracker);
    let router = mapty::routes::create_router(state.clone());

    TestApp { router, state }
}

/// App with the map centered on Madrid.
pub async fn create_test_app(pool: DbPool) -> TestApp {
    create_test_app_with(pool, StaticGeolocation::at(40.4, -3.7)).await
}

pub fn form_request(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub async fn body_string(response: Response) -> String {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8_lossy(&body).to_string()
}
