use axum::{
    extract::{Path, Query, State},
    http::{HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::holders::AbnormalStore;
use crate::models::{AbnormalRecord, BatchSummary, ChangeBatch};
use crate::services::RangeResponse;
use crate::{AnalyzerState, ProviderState};

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub timestamp: String,
}

fn health(service: &str) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: service.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

impl IntoResponse for RangeResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut response = (status, self.body).into_response();
        for (name, value) in &self.headers {
            if let (Ok(name), Ok(value)) = (
                HeaderName::try_from(name.as_str()),
                HeaderValue::try_from(value.as_str()),
            ) {
                response.headers_mut().insert(name, value);
            }
        }
        response
    }
}

// Приём пачки событий из потока изменений
pub async fn ingest_events(
    State(state): State<AnalyzerState>,
    Json(batch): Json<ChangeBatch>,
) -> Json<BatchSummary> {
    tracing::debug!("Received batch of {} change events", batch.records.len());
    let outcomes = state.consumer.handle(batch).await;
    Json(BatchSummary::from_outcomes(&outcomes))
}

pub async fn abnormal_values(
    State(state): State<AnalyzerState>,
    Path(patient_id): Path<i64>,
) -> Result<Json<Vec<AbnormalRecord>>, (StatusCode, Json<Value>)> {
    state.store.find_by_patient(patient_id).await.map(Json).map_err(|e| {
        tracing::error!("Failed to read abnormal values: {}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": e.to_string() })),
        )
    })
}

pub async fn range_query(
    State(state): State<ProviderState>,
    Query(query): Query<HashMap<String, String>>,
) -> RangeResponse {
    state.provider.handle_request(&query)
}

pub fn create_analyzer_routes(state: AnalyzerState) -> Router {
    Router::new()
        .route("/", get(|| async { health("pulse-values-analyzer") }))
        .route("/events", post(ingest_events))
        .route("/abnormal/:patient_id", get(abnormal_values))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

pub fn create_provider_routes(state: ProviderState) -> Router {
    Router::new()
        .route("/", get(|| async { health("range-provider") }))
        .route("/range", get(range_query))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
