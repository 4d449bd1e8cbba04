mod common;

use axum::http::StatusCode;
use mapty::geolocation::StaticGeolocation;
use mapty::repositories::KeyValueRepository;
use mapty::storage::Storage;
use mapty::tracker::STORAGE_KEY;
use serde_json::Value;
use tower::ServiceExt;

async fn json(app: &common::TestApp, uri: &str) -> Value {
    let response = app
        .router
        .clone()
        .oneshot(common::get_request(uri))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    serde_json::from_str(&common::body_string(response).await).unwrap()
}

async fn click_map(app: &common::TestApp, lat: f64, lng: f64) -> StatusCode {
    app.router
        .clone()
        .oneshot(common::form_request(
            "/map/click",
            &format!("lat={}&lng={}", lat, lng),
        ))
        .await
        .unwrap()
        .status()
}

#[tokio::test]
async fn test_index_renders_empty_tracker() {
    let pool = common::setup_test_db();
    let app = common::create_test_app(pool).await;

    let response = app
        .router
        .clone()
        .oneshot(common::get_request("/"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_string(response).await;
    assert!(body.contains("form hidden"));
    assert!(!body.contains("data-id="));
    assert!(!body.contains("Map unavailable"));
}

#[tokio::test]
async fn test_log_running_workout() {
    let pool = common::setup_test_db();
    let app = common::create_test_app(pool.clone()).await;

    assert_eq!(click_map(&app, 40.0, -3.7).await, StatusCode::SEE_OTHER);

    let response = app
        .router
        .clone()
        .oneshot(common::form_request(
            "/workouts",
            "type=running&distance=5&duration=25&cadence=180&elevation=",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get("location").unwrap(), "/");

    let workouts = json(&app, "/api/workouts").await;
    let workouts = workouts.as_array().unwrap();
    assert_eq!(workouts.len(), 1);
    assert_eq!(workouts[0]["type"], "running");
    assert_eq!(workouts[0]["pace"], 5.0);
    assert_eq!(workouts[0]["cadence"], 180.0);
    assert_eq!(workouts[0]["coords"], serde_json::json!([40.0, -3.7]));

    let scene = json(&app, "/api/map").await;
    let markers = scene["markers"].as_array().unwrap();
    assert_eq!(markers.len(), 2);
    assert_eq!(markers[1]["coords"], serde_json::json!([40.0, -3.7]));
    assert_eq!(markers[1]["popup"]["options"]["className"], "running-popup");

    let response = app
        .router
        .clone()
        .oneshot(common::get_request("/"))
        .await
        .unwrap();
    let body = common::body_string(response).await;
    assert!(body.contains("class=\"workout workout--running\""));
    assert!(body.contains("Running on"));
    assert!(body.contains(">5.0<"));
    assert!(body.contains(">180<"));
    assert!(body.contains("spm"));
    assert!(body.contains("form hidden"));

    let stored = KeyValueRepository::new(pool).get(STORAGE_KEY).unwrap();
    assert!(stored.unwrap().contains("\"type\":\"running\""));
}

#[tokio::test]
async fn test_log_cycling_workout() {
    let pool = common::setup_test_db();
    let app = common::create_test_app(pool).await;

    click_map(&app, 41.38, 2.17).await;
    let response = app
        .router
        .clone()
        .oneshot(common::form_request(
            "/workouts",
            "type=cycling&distance=20&duration=50&elevation=300",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let workouts = json(&app, "/api/workouts").await;
    assert_eq!(workouts[0]["type"], "cycling");
    assert_eq!(workouts[0]["speed"], 24.0);
    assert_eq!(workouts[0]["elevationGain"], 300.0);
}

#[tokio::test]
async fn test_invalid_workout_keeps_form_open() {
    let pool = common::setup_test_db();
    let app = common::create_test_app(pool.clone()).await;

    click_map(&app, 40.0, -3.7).await;
    let response = app
        .router
        .clone()
        .oneshot(common::form_request(
            "/workouts",
            "type=running&distance=7&duration=0&cadence=180",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = common::body_string(response).await;
    assert!(body.contains("Inputs have to be positive numbers!"));
    assert!(body.contains("value=\"7\""));
    assert!(!body.contains("form hidden"));

    let workouts = json(&app, "/api/workouts").await;
    assert!(workouts.as_array().unwrap().is_empty());
    assert_eq!(KeyValueRepository::new(pool).get(STORAGE_KEY).unwrap(), None);
}

#[tokio::test]
async fn test_submit_without_map_click() {
    let pool = common::setup_test_db();
    let app = common::create_test_app(pool).await;

    let response = app
        .router
        .clone()
        .oneshot(common::form_request(
            "/workouts",
            "type=running&distance=5&duration=25&cadence=180",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_without_position_map_is_unavailable() {
    let pool = common::setup_test_db();
    let app = common::create_test_app_with(pool, StaticGeolocation::unavailable()).await;

    let response = app
        .router
        .clone()
        .oneshot(common::get_request("/"))
        .await
        .unwrap();
    let body = common::body_string(response).await;
    assert!(body.contains("Map unavailable"));
    assert!(body.contains("Could not get your current position."));

    // the alert is shown once
    let response = app
        .router
        .clone()
        .oneshot(common::get_request("/"))
        .await
        .unwrap();
    let body = common::body_string(response).await;
    assert!(!body.contains("Could not get your current position."));

    assert_eq!(click_map(&app, 40.0, -3.7).await, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_select_workout_recenters_map() {
    let pool = common::setup_test_db();
    let app = common::create_test_app(pool).await;

    click_map(&app, 38.5, -0.5).await;
    app.router
        .clone()
        .oneshot(common::form_request(
            "/workouts",
            "type=running&distance=5&duration=25&cadence=180",
        ))
        .await
        .unwrap();
    let workouts = json(&app, "/api/workouts").await;
    let id = workouts[0]["id"].as_str().unwrap().to_string();

    let response = app
        .router
        .clone()
        .oneshot(common::form_request(&format!("/workouts/{}/select", id), ""))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let workouts = json(&app, "/api/workouts").await;
    assert_eq!(workouts[0]["clicks"], 1);
    let scene = json(&app, "/api/map").await;
    assert_eq!(scene["view"]["center"], serde_json::json!([38.5, -0.5]));
    assert_eq!(scene["view"]["options"]["animate"], true);
}

#[tokio::test]
async fn test_select_unknown_workout_returns_404() {
    let pool = common::setup_test_db();
    let app = common::create_test_app(pool).await;

    let response = app
        .router
        .clone()
        .oneshot(common::form_request("/workouts/123/select", ""))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_toggle_form_type() {
    let pool = common::setup_test_db();
    let app = common::create_test_app(pool).await;

    let response = app
        .router
        .clone()
        .oneshot(common::form_request("/form/type", "type=cycling"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let response = app
        .router
        .clone()
        .oneshot(common::get_request("/"))
        .await
        .unwrap();
    let body = common::body_string(response).await;
    assert!(body.contains("value=\"cycling\" selected"));
}

#[tokio::test]
async fn test_restores_persisted_workouts() {
    let pool = common::setup_test_db();
    KeyValueRepository::new(pool.clone())
        .set(
            STORAGE_KEY,
            r#"[{"id":"1713087000","date":"2024-04-14T09:30:00Z","coords":[40.0,-3.7],
                "distance":5,"duration":25,"clicks":2,"type":"running","cadence":180},
               {"id":"bad","type":"cycling"}]"#,
        )
        .unwrap();

    let app = common::create_test_app(pool).await;

    let workouts = json(&app, "/api/workouts").await;
    let workouts = workouts.as_array().unwrap();
    assert_eq!(workouts.len(), 1);
    assert_eq!(workouts[0]["description"], "Running on April 14");
    assert_eq!(workouts[0]["pace"], 5.0);
    assert_eq!(workouts[0]["clicks"], 2);

    let response = app
        .router
        .clone()
        .oneshot(common::get_request("/"))
        .await
        .unwrap();
    let body = common::body_string(response).await;
    assert!(body.contains("data-id=\"1713087000\""));
    assert!(body.contains("Running on April 14"));
}

#[tokio::test]
async fn test_reset_clears_everything() {
    let pool = common::setup_test_db();
    let app = common::create_test_app(pool.clone()).await;

    click_map(&app, 40.0, -3.7).await;
    app.router
        .clone()
        .oneshot(common::form_request(
            "/workouts",
            "type=running&distance=5&duration=25&cadence=180",
        ))
        .await
        .unwrap();

    let response = app
        .router
        .clone()
        .oneshot(common::form_request("/reset", ""))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    assert_eq!(KeyValueRepository::new(pool).get(STORAGE_KEY).unwrap(), None);
    let workouts = json(&app, "/api/workouts").await;
    assert!(workouts.as_array().unwrap().is_empty());
    let scene = json(&app, "/api/map").await;
    assert_eq!(scene["markers"].as_array().unwrap().len(), 1);
    assert_eq!(scene["view"]["center"], serde_json::json!([40.4, -3.7]));
}

#[tokio::test]
async fn test_health_check() {
    let pool = common::setup_test_db();
    let app = common::create_test_app(pool).await;

    let health = json(&app, "/health").await;

    assert_eq!(health["status"], "ok");
    assert_eq!(health["map_loaded"], true);
    assert_eq!(health["workouts"], 0);
    assert!(health["git_version"].is_string());
}

#[tokio::test]
async fn test_reset_without_position_keeps_map_unloaded() {
    let pool = common::setup_test_db();
    let app = common::create_test_app_with(pool, StaticGeolocation::unavailable()).await;

    let response = app
        .router
        .clone()
        .oneshot(common::form_request("/reset", ""))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let tracker = app.state.tracker.lock().await;
    assert!(!tracker.is_map_loaded());
    assert!(tracker.alert().is_some());
}
