//! API Handlers
use axum::{extract::Path, extract::State, http::StatusCode, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use verdex_core::FieldContext;

use crate::state::SharedState;

#[derive(Debug, Deserialize)]
pub struct CreateFieldRequest {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub acres: f64,
    #[serde(default)]
    pub crop_type: Option<String>,
}

pub async fn health() -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({ "status": "ok", "version": verdex_core::VERDEX_VERSION })),
    )
}

pub async fn list_fields(State(state): State<SharedState>) -> (StatusCode, Json<Value>) {
    let fields = state.fields.read().await;
    let mut all: Vec<&FieldContext> = fields.values().collect();
    all.sort_by_key(|f| f.created_at);

    (
        StatusCode::OK,
        Json(json!({ "success": true, "fields": all })),
    )
}

pub async fn create_field(
    State(state): State<SharedState>,
    Json(request): Json<CreateFieldRequest>,
) -> (StatusCode, Json<Value>) {
    let field = match FieldContext::new(
        request.name,
        request.latitude,
        request.longitude,
        request.acres,
        request.crop_type.unwrap_or_else(|| "Unknown".to_string()),
    ) {
        Ok(field) => field,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "success": false, "error": e.to_string() })),
            );
        }
    };

    state.fields.write().await.insert(field.id, field.clone());

    (
        StatusCode::OK,
        Json(json!({ "success": true, "field": field })),
    )
}

pub async fn delete_field(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> (StatusCode, Json<Value>) {
    if state.fields.write().await.remove(&id).is_some() {
        state.analyses.write().await.remove(&id);
        (StatusCode::OK, Json(json!({ "success": true })))
    } else {
        field_not_found()
    }
}

pub async fn analyze_field(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> (StatusCode, Json<Value>) {
    let field = match state.fields.read().await.get(&id) {
        Some(field) => field.clone(),
        None => return field_not_found(),
    };

    let vegetation = match state.satellite.collect(field.latitude, field.longitude).await {
        Ok(reading) => reading,
        Err(e) => return pipeline_error(e),
    };
    let weather = match state.weather.collect(field.latitude, field.longitude).await {
        Ok(metrics) => metrics,
        Err(e) => return pipeline_error(e),
    };

    let mut sink = state.audit.clone();
    let analysis = match state
        .analyzer
        .analyze(&field, &vegetation, &weather, &mut sink)
        .await
    {
        Ok(analysis) => analysis,
        Err(e) => return pipeline_error(e),
    };

    state
        .analyses
        .write()
        .await
        .entry(id)
        .or_default()
        .push(analysis.clone());

    (
        StatusCode::OK,
        Json(json!({ "success": true, "analysis": analysis })),
    )
}

pub async fn field_report(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> (StatusCode, Json<Value>) {
    let field = match state.fields.read().await.get(&id) {
        Some(field) => field.clone(),
        None => return field_not_found(),
    };

    let latest = state
        .analyses
        .read()
        .await
        .get(&id)
        .and_then(|runs| runs.last().cloned());

    let report = match latest {
        Some(analysis) => state.reports.render_field_report(&field, &analysis),
        None => {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({
                    "success": false,
                    "error": "No analysis found for this field. Run analysis first."
                })),
            );
        }
    };

    match report {
        Ok(text) => (
            StatusCode::OK,
            Json(json!({ "success": true, "report": text })),
        ),
        Err(e) => pipeline_error(e),
    }
}

pub async fn audit_stats(State(state): State<SharedState>) -> (StatusCode, Json<Value>) {
    let stats = state.audit.stats();
    (
        StatusCode::OK,
        Json(json!({ "success": true, "audit": stats })),
    )
}

fn field_not_found() -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "success": false, "error": "Field not found" })),
    )
}

fn pipeline_error(e: verdex_core::VerdexError) -> (StatusCode, Json<Value>) {
    tracing::error!(error = %e, "analysis pipeline failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "success": false, "error": e.to_string() })),
    )
}
