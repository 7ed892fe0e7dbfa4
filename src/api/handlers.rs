//! Route handlers for `/loans` and `/health`.

use crate::{
    api::AppState,
    core::{
        LoanRequest, ScenarioDetail, ScenarioSummary,
        validation::{FieldError, ValidationError},
    },
    errors::{Error, Result},
};
use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::{Value, json};
use tracing::debug;

fn malformed_body(message: &str) -> Error {
    Error::Validation(ValidationError::Single(message.to_string()))
}

fn parse_loan_request(body: &[u8]) -> Result<LoanRequest> {
    let value: Value = serde_json::from_slice(body).map_err(|e| {
        debug!("Unparsable loan request body: {e}");
        malformed_body("Request body is not valid JSON")
    })?;
    if !value.is_object() {
        return Err(malformed_body("Request body must be a JSON object"));
    }
    serde_json::from_value(value).map_err(|_| malformed_body("Request body must be a JSON object"))
}

fn parse_loan_id(raw: &str) -> Result<i64> {
    raw.parse().map_err(|_| {
        Error::Validation(ValidationError::Batch(vec![FieldError::path(
            "loan_id",
            "Input should be a valid integer, unable to parse string as an integer",
            "int_parsing",
        )]))
    })
}

/// `GET /health`
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// `POST /loans` - validates, computes and stores a scenario.
///
/// The body is parsed here rather than by an extractor so that malformed JSON
/// is reported in the same `{"detail": ...}` shape as field errors.
pub async fn create_loan(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<ScenarioSummary>)> {
    let request = parse_loan_request(&body)?;
    let scenario = state.service.create_scenario(&request).await?;
    Ok((StatusCode::CREATED, Json(ScenarioSummary::from(&scenario))))
}

/// `GET /loans` - every scenario in creation order.
pub async fn list_loans(State(state): State<AppState>) -> Result<Json<Vec<ScenarioSummary>>> {
    Ok(Json(state.service.list_scenarios().await?))
}

/// `GET /loans/:loan_id` - scenario detail with schedule preview.
pub async fn get_loan(
    State(state): State<AppState>,
    Path(loan_id): Path<String>,
) -> Result<Json<ScenarioDetail>> {
    let id = parse_loan_id(&loan_id)?;
    Ok(Json(state.service.get_scenario_detail(id).await?))
}

/// Fallback for unknown routes.
pub async fn not_found() -> (StatusCode, Json<Value>) {
    (StatusCode::NOT_FOUND, Json(json!({ "detail": "Not Found" })))
}
