//! Integration tests for the API handlers.
//!
//! Handlers run against offline state: deterministic model providers for
//! data collection and a stub insight model, so nothing touches the
//! network.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::json;
use uuid::Uuid;

use verdex_analyzer::{Analyzer, StubModel};
use verdex_api::handlers::{self, CreateFieldRequest};
use verdex_api::{AppState, SharedState};
use verdex_core::{AiResponse, Claim};

/// A stub insight that makes no numeric claims, so it validates cleanly
/// against whatever the model providers measured.
fn stub_response() -> AiResponse {
    AiResponse {
        ndvi: Claim::Absent,
        temperature_c: Claim::Absent,
        precipitation_mm: Claim::Absent,
        recommendation: "Keep monitoring soil moisture weekly.".to_string(),
        narrative: "Conditions look stable for the season.".to_string(),
    }
}

fn offline_state() -> SharedState {
    let analyzer = Analyzer::new()
        .unwrap()
        .with_model(Box::new(StubModel::new(stub_response())));
    Arc::new(AppState::offline(analyzer).unwrap())
}

async fn create_field(state: &SharedState, name: &str) -> Uuid {
    let (status, Json(body)) = handlers::create_field(
        State(state.clone()),
        Json(CreateFieldRequest {
            name: name.to_string(),
            latitude: 42.0347,
            longitude: -93.62,
            acres: 150.0,
            crop_type: Some("Corn".to_string()),
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    body["field"]["id"]
        .as_str()
        .and_then(|s| Uuid::parse_str(s).ok())
        .expect("field id in response")
}

#[tokio::test]
async fn test_create_and_list_fields() {
    let state = offline_state();
    create_field(&state, "North Plot").await;
    create_field(&state, "South Plot").await;

    let (status, Json(body)) = handlers::list_fields(State(state.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["fields"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_invalid_coordinates_are_rejected() {
    let state = offline_state();
    let (status, Json(body)) = handlers::create_field(
        State(state),
        Json(CreateFieldRequest {
            name: "Bad".to_string(),
            latitude: 95.0,
            longitude: 0.0,
            acres: 10.0,
            crop_type: None,
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn test_analyze_then_report_round_trip() {
    let state = offline_state();
    let id = create_field(&state, "North Plot").await;

    let (status, Json(body)) = handlers::analyze_field(State(state.clone()), Path(id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["analysis"]["kind"], json!("ai_enhanced"));

    let (status, Json(body)) = handlers::field_report(State(state.clone()), Path(id)).await;
    assert_eq!(status, StatusCode::OK);
    let report = body["report"].as_str().unwrap();
    assert!(report.contains("North Plot"));
    assert!(report.contains("VERDEX FIELD VERIFICATION REPORT"));
}

#[tokio::test]
async fn test_unknown_field_is_404() {
    let state = offline_state();
    let missing = Uuid::new_v4();

    let (status, _) = handlers::analyze_field(State(state.clone()), Path(missing)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = handlers::field_report(State(state.clone()), Path(missing)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = handlers::delete_field(State(state), Path(missing)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_report_requires_prior_analysis() {
    let state = offline_state();
    let id = create_field(&state, "Unanalyzed Plot").await;

    let (status, Json(body)) = handlers::field_report(State(state), Path(id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("Run analysis first"));
}

#[tokio::test]
async fn test_audit_counts_validations() {
    let state = offline_state();
    let id = create_field(&state, "Audited Plot").await;

    handlers::analyze_field(State(state.clone()), Path(id)).await;
    handlers::analyze_field(State(state.clone()), Path(id)).await;

    let (status, Json(body)) = handlers::audit_stats(State(state)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["audit"]["total"], json!(2));
    assert_eq!(body["audit"]["rejected"], json!(0));
}

#[tokio::test]
async fn test_delete_field_removes_analyses() {
    let state = offline_state();
    let id = create_field(&state, "Doomed Plot").await;
    handlers::analyze_field(State(state.clone()), Path(id)).await;

    let (status, _) = handlers::delete_field(State(state.clone()), Path(id)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = handlers::field_report(State(state), Path(id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
