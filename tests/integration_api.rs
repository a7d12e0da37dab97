//! Integration tests for the REST API feature.

#![cfg(feature = "api")]

mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::util::ServiceExt;

use solar_sizer::api::{AppState, router};

fn build_api_state() -> Arc<AppState> {
    Arc::new(AppState {
        engine: common::baseline_engine(),
    })
}

async fn send(req: Request<Body>) -> (StatusCode, serde_json::Value) {
    let resp = router(build_api_state()).oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}

fn post(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn policy_endpoint_exposes_defaults() {
    let req = Request::builder().uri("/policy").body(Body::empty()).unwrap();
    let (status, json) = send(req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["panels"]["wattage_w"], 450);
    assert_eq!(json["inverter"]["ladder_kw"].as_array().map(Vec::len), Some(5));
}

#[tokio::test]
async fn size_reference_household() {
    let body = serde_json::to_string(&common::reference_request()).unwrap();
    let (status, json) = send(post("/size", &body)).await;
    assert_eq!(status, StatusCode::OK);

    let total = json["report"]["costs"]["total"].as_f64().unwrap();
    assert!((total - 207_790.0).abs() < 1e-6);
    assert_eq!(json["report"]["battery"]["system_voltage"], 24);
    assert_eq!(json["report"]["battery"]["layout"]["kind"], "strings");
}

#[tokio::test]
async fn size_unknown_location_is_unprocessable() {
    let (status, json) = send(post("/size", r#"{"monthly_kwh": 150.0, "location": "Atlantis"}"#)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["field"], "location");
}

#[tokio::test]
async fn size_rejects_unknown_request_fields() {
    let (status, _) = send(post("/size", r#"{"monthly_kwh": 150.0, "roof": "tin"}"#)).await;
    assert!(status.is_client_error());
}

#[tokio::test]
async fn compare_returns_three_options() {
    let body = serde_json::to_string(&common::reference_request()).unwrap();
    let (status, json) = send(post("/compare", &body)).await;
    assert_eq!(status, StatusCode::OK);

    let options = json["options"].as_array().unwrap();
    assert_eq!(options.len(), 3);
    assert_eq!(options[0]["option"], "conservative");
    assert_eq!(options[2]["option"], "aggressive");
}

#[tokio::test]
async fn compare_batteries_reports_both_families() {
    let body = serde_json::to_string(&common::reference_request()).unwrap();
    let (status, json) = send(post("/compare/batteries", &body)).await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(json["lead_acid"]["bank"]["chemistry"], "lead_acid");
    assert_eq!(json["lithium"]["lifecycle"]["cycle_life"], 6000);
    let lithium = json["lithium"]["lifecycle"]["total_cost"].as_f64().unwrap();
    let lead_acid = json["lead_acid"]["lifecycle"]["total_cost"].as_f64().unwrap();
    let savings = json["savings_with_lithium"].as_f64().unwrap();
    assert!((savings - (lead_acid - lithium)).abs() < 1e-6);
    assert!(json["better"] == "lithium" || json["better"] == "lead_acid");
}

#[tokio::test]
async fn size_from_appliance_list() {
    let body = r#"{
        "appliances": [{"name": "fridge"}, {"name": "tv", "count": 2}],
        "ghi_kwh_m2_day": 5.2
    }"#;
    let (status, json) = send(post("/size", body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["report"]["profile"]["source"], "appliances");
    let daily = json["report"]["profile"]["daily_consumption_kwh"].as_f64().unwrap();
    assert!((daily - 4.24).abs() < 1e-9);
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let req = Request::builder().uri("/nonexistent").body(Body::empty()).unwrap();
    let (status, _) = send(req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
